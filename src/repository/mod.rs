// ==========================================
// Système de prise de mandat - couche persistance
// ==========================================
// Interface étroite vers le magasin de documents externe
// et implémentation SQLite locale
// ==========================================

pub mod error;
pub mod sqlite_store;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use sqlite_store::SqliteStore;
pub use store::{Collection, RecordStore};
