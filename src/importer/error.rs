// ==========================================
// Système de prise de mandat - erreurs du module d'import
// ==========================================
// Outil: macro dérivée thiserror
// ==========================================

use thiserror::Error;

/// Erreurs du module d'import
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Erreurs de fichier =====
    #[error("Fichier introuvable: {0}")]
    FileNotFound(String),

    #[error("Format de fichier non supporté: {0} (seul .d01 est accepté)")]
    UnsupportedFormat(String),

    #[error("Lecture du fichier échouée: {0}")]
    FileReadError(String),

    // ===== Erreurs de contenu =====
    // Flux d'octets illisible: l'import est bloqué, aucune fusion partielle
    #[error("Contenu illisible (encodage invalide): {0}")]
    UnreadableInput(String),

    #[error("Analyse des champs délimités échouée: {0}")]
    DelimitedParseError(String),

    // ===== Erreurs génériques =====
    #[error("Erreur interne: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// Conversion depuis std::io::Error
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// Conversion depuis csv::Error
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::DelimitedParseError(err.to_string())
    }
}

/// Alias de Result pour le module d'import
pub type ImportResult<T> = Result<T, ImportError>;
