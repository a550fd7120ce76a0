// ==========================================
// Système de prise de mandat - couche domaine
// ==========================================
// Entités et objets-valeurs, sans entrée/sortie
// ==========================================

pub mod draft;
pub mod history;
pub mod lot;
pub mod types;

pub use draft::{Case, ClientRecord, Draft, DraftSnapshot, MandateLine, RecordLockInfo, WorkAddress};
pub use history::{Comment, HistoryEntry};
pub use lot::{ConcordanceRecord, LotOperationRecord};
pub use types::{Actor, DraftStatus, MandateTaskState, UrgencyLevel};
