// ==========================================
// Système de prise de mandat - types du domaine
// ==========================================
// Statuts du brouillon, niveaux d'urgence,
// états de tâche et identité de l'utilisateur
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Statut du brouillon (prise de mandat)
// ==========================================
// A_OUVRIR est le statut sentinelle pré-ouverture: les brouillons
// dans ce statut participent à l'allocation des numéros de dossier.
// Format de sérialisation: SCREAMING_SNAKE_CASE (aligné sur les documents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftStatus {
    Nouveau,    // Brouillon fraîchement créé
    AOuvrir,    // Accepté, en attente d'ouverture du dossier
    NonOctroye, // Mandat non octroyé
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Nouveau => "NOUVEAU",
            DraftStatus::AOuvrir => "A_OUVRIR",
            DraftStatus::NonOctroye => "NON_OCTROYE",
        }
    }

    pub fn parse(s: &str) -> DraftStatus {
        match s.trim().to_uppercase().as_str() {
            "A_OUVRIR" => DraftStatus::AOuvrir,
            "NON_OCTROYE" => DraftStatus::NonOctroye,
            _ => DraftStatus::Nouveau,
        }
    }

    /// Libellé affiché à l'opérateur (et dans l'historique)
    pub fn label(&self) -> &'static str {
        match self {
            DraftStatus::Nouveau => "Nouveau",
            DraftStatus::AOuvrir => "À ouvrir",
            DraftStatus::NonOctroye => "Non octroyé",
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Niveau d'urgence
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    Normal, // Délai habituel
    Eleve,  // À traiter en priorité
    Urgent, // Échéance ferme du client
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Normal => "NORMAL",
            UrgencyLevel::Eleve => "ELEVE",
            UrgencyLevel::Urgent => "URGENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyLevel::Normal => "Normal",
            UrgencyLevel::Eleve => "Élevé",
            UrgencyLevel::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// État de tâche d'une ligne de mandat
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MandateTaskState {
    AFaire,  // Pas encore débuté
    EnCours, // Travaux en cours
    Termine, // Livré
}

impl MandateTaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MandateTaskState::AFaire => "A_FAIRE",
            MandateTaskState::EnCours => "EN_COURS",
            MandateTaskState::Termine => "TERMINE",
        }
    }
}

impl fmt::Display for MandateTaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Actor - identité de l'utilisateur courant
// ==========================================
// L'authentification est hors de la portée du moteur:
// l'identité est toujours fournie par l'appelant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub display_name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
