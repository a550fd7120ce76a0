// ==========================================
// Système de prise de mandat - bibliothèque principale
// ==========================================
// Domaine: gestion de dossiers d'arpentage (prise de mandat)
// Pile technique: Rust + SQLite
// Positionnement: moteur de cycle de vie des brouillons
// (verrouillage, sauvegarde automatique, numérotation, import D01)
// ==========================================

// Initialisation du système d'internationalisation
rust_i18n::i18n!("locales", fallback = "fr-CA");

// ==========================================
// Déclaration des modules
// ==========================================

// Couche domaine - entités et types
pub mod domain;

// Couche persistance - magasin de documents
pub mod repository;

// Couche moteur - règles d'affaires
pub mod engine;

// Couche import - fichiers cadastraux externes
pub mod importer;

// Couche configuration
pub mod config;

// Infrastructure base de données (initialisation / PRAGMA unifiés)
pub mod db;

// Journalisation
pub mod logging;

// Internationalisation
pub mod i18n;

// ==========================================
// Réexportation des types principaux
// ==========================================

// Types du domaine
pub use domain::types::{Actor, DraftStatus, MandateTaskState, UrgencyLevel};

// Entités du domaine
pub use domain::{
    Case, ClientRecord, ConcordanceRecord, Draft, DraftSnapshot, HistoryEntry,
    LotOperationRecord, MandateLine, RecordLockInfo, WorkAddress,
};

// Moteurs
pub use engine::{
    AutoSaveEngine, CaseOpeningEngine, DialogState, DiffAuditBuilder, DraftSession, LockAttempt,
    RecordLockService, SequentialNumberAllocator,
};

// Persistance
pub use repository::{Collection, RecordStore, SqliteStore};

// Configuration
pub use config::ConfigManager;

// Import
pub use importer::{CadastreCodeTable, D01Parser};

// ==========================================
// Constantes système
// ==========================================

// Version du système
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Nom du système
pub const APP_NAME: &str = "Système de prise de mandat";

// Délai de sauvegarde automatique par défaut (millisecondes)
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 500;
