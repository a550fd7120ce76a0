// ==========================================
// Système de prise de mandat - couche moteur
// ==========================================
// Logique de session du brouillon: verrou d'enregistrement, sauvegarde
// automatique débouncée, audit par diff, allocation des numéros de
// dossier, ouverture de dossier et machine à états du dialogue.
// ==========================================

pub mod autosave;
pub mod case_opening;
pub mod diff_audit;
pub mod error;
pub mod numbering;
pub mod record_lock;
pub mod session;

pub use autosave::AutoSaveEngine;
pub use case_opening::CaseOpeningEngine;
pub use diff_audit::DiffAuditBuilder;
pub use error::{EngineError, EngineResult};
pub use numbering::SequentialNumberAllocator;
pub use record_lock::{LockAttempt, RecordLockService};
pub use session::{DialogState, DraftSession};
