// ==========================================
// Système de prise de mandat - erreurs de la couche persistance
// ==========================================
// Outil: macro dérivée thiserror
// ==========================================

use thiserror::Error;

/// Erreurs du magasin de documents
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== Erreurs de données =====
    #[error("Document introuvable: {collection} id={id}")]
    NotFound { collection: String, id: String },

    #[error("Document invalide ({collection} id={id}): {message}")]
    InvalidDocument {
        collection: String,
        id: String,
        message: String,
    },

    // ===== Erreurs base de données =====
    #[error("Connexion à la base de données échouée: {0}")]
    DatabaseConnectionError(String),

    #[error("Verrou de connexion non obtenu: {0}")]
    LockError(String),

    #[error("Requête échouée: {0}")]
    DatabaseQueryError(String),

    #[error("Violation de contrainte d'unicité: {0}")]
    UniqueConstraintViolation(String),

    // ===== Erreurs de sérialisation =====
    #[error("Sérialisation JSON échouée: {0}")]
    SerializationError(String),

    // ===== Erreurs génériques =====
    #[error("Erreur interne: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// Conversion depuis rusqlite::Error
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    StoreError::UniqueConstraintViolation(msg)
                } else {
                    StoreError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
                collection: "inconnue".to_string(),
                id: "inconnu".to_string(),
            },
            _ => StoreError::DatabaseQueryError(err.to_string()),
        }
    }
}

// Conversion depuis serde_json::Error
impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err.to_string())
    }
}

/// Alias de Result pour la couche persistance
pub type StoreResult<T> = Result<T, StoreError>;
