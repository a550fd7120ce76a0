// ==========================================
// Système de prise de mandat - historique et commentaires
// ==========================================
// Règle: toute écriture détectée doit laisser une trace
// Usage: piste d'audit du brouillon, ordonnée du plus récent au plus ancien
// ==========================================

use crate::domain::types::Actor;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// HistoryEntry - entrée d'audit
// ==========================================
// Créée uniquement par le générateur de diff ou par les actions
// de domaine explicites (changement de statut, ouverture de dossier).
// Jamais modifiée ni supprimée après création.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: String,        // Libellé de l'action (ex.: "Statut")
    pub details: String,       // Détail formaté (ex.: "Nouveau → À ouvrir")
    pub actor_name: String,    // Nom affiché de l'utilisateur
    pub actor_id: String,      // Identifiant de l'utilisateur
    pub timestamp: NaiveDateTime,
}

impl HistoryEntry {
    /// Crée une nouvelle entrée d'audit horodatée à maintenant
    pub fn new(action: impl Into<String>, details: impl Into<String>, actor: &Actor) -> Self {
        Self {
            action: action.into(),
            details: details.into(),
            actor_name: actor.display_name.clone(),
            actor_id: actor.id.clone(),
            timestamp: chrono::Utc::now().naive_utc(),
        }
    }
}

// ==========================================
// Comment - commentaire libre sur le brouillon
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author_id: String,
    pub author_name: String,
    pub text: String,
    pub created_at: NaiveDateTime,
}

impl Comment {
    pub fn new(author: &Actor, text: impl Into<String>) -> Self {
        Self {
            author_id: author.id.clone(),
            author_name: author.display_name.clone(),
            text: text.into(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
