// ==========================================
// Système de prise de mandat - erreurs de la couche moteur
// ==========================================
// Taxonomie: conflit de verrou, numéro en double, champ requis
// manquant, transition d'état invalide, erreurs de persistance
// ==========================================

use crate::repository::error::StoreError;
use thiserror::Error;

/// Erreurs de la couche moteur
/// Les erreurs de composant sont retournées comme valeurs explicites;
/// les échecs de persistance de la sauvegarde automatique sont journalisés
/// et reflétés dans l'état de session plutôt que propagés.
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== Verrouillage =====
    /// Une autre identité détient le brouillon (non fatal: lecture seule)
    #[error("Brouillon verrouillé par {holder_name}")]
    LockConflict { holder_name: String },

    // ===== Numérotation =====
    /// Numéro déjà porté par un dossier ou un brouillon à ouvrir;
    /// fatal pour cette soumission, l'usager doit choisir un autre numéro
    #[error("Numéro de dossier en double: {number} (arpenteur {surveyor})")]
    DuplicateNumber { surveyor: String, number: String },

    #[error("Numéro de dossier manquant")]
    MissingCaseNumber,

    // ===== Validation pré-soumission =====
    /// Validé de façon synchrone avant soumission, signalé par champ
    #[error("Champ requis manquant: {field}{}", line_suffix(.line))]
    MissingRequiredField {
        field: String,
        line: Option<usize>,
    },

    // ===== Machine à états du dialogue =====
    #[error("Transition d'état invalide: de {from} vers {to}")]
    InvalidStateTransition { from: String, to: String },

    // ===== Import =====
    #[error("Erreur d'import: {0}")]
    Import(#[from] crate::importer::error::ImportError),

    // ===== Persistance =====
    #[error("Erreur de persistance: {0}")]
    Store(#[from] StoreError),

    #[error("Document mal formé: {0}")]
    MalformedDocument(String),

    // ===== Erreurs génériques =====
    #[error("Erreur interne: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (mandat {})", n + 1),
        None => String::new(),
    }
}

// Conversion depuis serde_json::Error (documents du magasin)
impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::MalformedDocument(err.to_string())
    }
}

/// Alias de Result pour la couche moteur
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_includes_line() {
        let err = EngineError::MissingRequiredField {
            field: "responsable".to_string(),
            line: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("responsable"));
        assert!(msg.contains("mandat 2"));
    }

    #[test]
    fn test_store_error_is_wrapped() {
        let store_err = StoreError::NotFound {
            collection: "prise_mandat".to_string(),
            id: "d1".to_string(),
        };
        let err: EngineError = store_err.into();
        assert!(matches!(err, EngineError::Store(_)));
    }
}
