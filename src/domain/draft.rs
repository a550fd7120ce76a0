// ==========================================
// Système de prise de mandat - entités Brouillon et Dossier
// ==========================================
// Le brouillon (prise de mandat) est l'unité de travail mutable;
// le dossier est l'enregistrement numéroté créé à l'ouverture.
// ==========================================

use crate::domain::history::{Comment, HistoryEntry};
use crate::domain::lot::LotOperationRecord;
use crate::domain::types::{Actor, DraftStatus, MandateTaskState, UrgencyLevel};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// WorkAddress - adresse des travaux
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl WorkAddress {
    /// Adresse formatée sur une ligne, telle que suivie par l'audit
    pub fn formatted(&self) -> String {
        [&self.street, &self.city, &self.postal_code]
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ==========================================
// ClientRecord - sous-fiche client / professionnel / adresse
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub professional: String, // Notaire / courtier référent
    pub work_address: WorkAddress,
}

impl ClientRecord {
    /// Nom affiché du client: la raison sociale prime sur le nom de personne
    pub fn display_name(&self) -> String {
        if !self.company.is_empty() {
            return self.company.clone();
        }
        let full = format!("{} {}", self.first_name, self.last_name);
        full.trim().to_string()
    }
}

// ==========================================
// RecordLockInfo - verrou pessimiste porté par le brouillon
// ==========================================
// Aucune expiration ni battement de coeur: un poste qui plante
// laisse le verrou en place jusqu'à une libération explicite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLockInfo {
    pub holder_id: String,
    pub holder_name: String,
    pub acquired_at: NaiveDateTime,
}

impl RecordLockInfo {
    pub fn held_by(actor: &Actor) -> Self {
        Self {
            holder_id: actor.id.clone(),
            holder_name: actor.display_name.clone(),
            acquired_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn is_held_by(&self, actor: &Actor) -> bool {
        self.holder_id == actor.id
    }
}

// ==========================================
// MandateLine - ligne de mandat (un service du brouillon)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandateLine {
    pub id: String,
    pub mandate_type: String,         // Ex.: "Certificat de localisation"
    pub estimated_price: f64,         // Prix estimé avant rabais
    pub rebate: f64,                  // Rabais consenti
    pub assignee: Option<String>,     // Responsable (requis avant ouverture)
    pub task_state: MandateTaskState,
    pub lot: Option<LotOperationRecord>, // Sous-formulaire de lot
}

impl MandateLine {
    pub fn new(mandate_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            mandate_type: mandate_type.into(),
            estimated_price: 0.0,
            rebate: 0.0,
            assignee: None,
            task_state: MandateTaskState::AFaire,
            lot: None,
        }
    }

    /// Fusionne le résultat d'un import D01 dans le sous-formulaire de lot.
    /// Le résultat sème les champs; l'usager peut ensuite les retoucher.
    pub fn apply_lot_import(&mut self, record: LotOperationRecord) {
        self.lot = Some(record);
    }
}

// ==========================================
// DraftSnapshot - projection des champs suivis par l'audit
// ==========================================
// L'égalité se fait par valeur; deux instantanés identiques
// ne produisent aucune entrée d'historique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub status: DraftStatus,
    pub surveyor: String,
    pub urgency: UrgencyLevel,
    pub client_name: String,
    pub work_address: String,
    pub mandate_types: String, // Types de mandat concaténés, dans l'ordre des lignes
    pub estimated_price_total: f64,
    pub rebate_total: f64,
    pub delivery_date: Option<NaiveDate>,
    pub signature_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
}

// ==========================================
// Draft - brouillon de prise de mandat
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub surveyor: String,               // Arpenteur-géomètre responsable
    pub case_number: Option<String>,    // Numéro de dossier pressenti
    pub status: DraftStatus,
    pub urgency: UrgencyLevel,
    pub client: ClientRecord,
    pub mandate_lines: Vec<MandateLine>,
    pub delivery_date: Option<NaiveDate>,
    pub signature_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub lock: Option<RecordLockInfo>,
    pub history: Vec<HistoryEntry>,     // Append-only, du plus récent au plus ancien
    pub comments: Vec<Comment>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl Draft {
    pub fn new(surveyor: impl Into<String>, created_by: &Actor) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            surveyor: surveyor.into(),
            case_number: None,
            status: DraftStatus::Nouveau,
            urgency: UrgencyLevel::Normal,
            client: ClientRecord::default(),
            mandate_lines: vec![],
            delivery_date: None,
            signature_date: None,
            start_date: None,
            lock: None,
            history: vec![],
            comments: vec![],
            created_by: created_by.id.clone(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Projette les champs suivis par l'audit
    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            status: self.status,
            surveyor: self.surveyor.clone(),
            urgency: self.urgency,
            client_name: self.client.display_name(),
            work_address: self.client.work_address.formatted(),
            mandate_types: self
                .mandate_lines
                .iter()
                .map(|l| l.mandate_type.as_str())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            estimated_price_total: self.mandate_lines.iter().map(|l| l.estimated_price).sum(),
            rebate_total: self.mandate_lines.iter().map(|l| l.rebate).sum(),
            delivery_date: self.delivery_date,
            signature_date: self.signature_date,
            start_date: self.start_date,
        }
    }

    /// Ajoute une entrée d'historique en tête (ordre du plus récent au plus ancien)
    pub fn prepend_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
    }
}

// ==========================================
// Case - dossier ouvert (numéroté de façon permanente)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub surveyor: String,
    pub case_number: String,
    pub client: ClientRecord,
    pub mandate_lines: Vec<MandateLine>,
    pub history: Vec<HistoryEntry>,
    pub opened_by: String,
    pub opened_at: NaiveDateTime,
}

impl Case {
    /// Construit le dossier à partir d'un brouillon accepté.
    /// Le numéro doit avoir été validé par l'allocateur au préalable.
    pub fn from_draft(draft: &Draft, case_number: &str, opened_by: &Actor) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            surveyor: draft.surveyor.clone(),
            case_number: case_number.to_string(),
            client: draft.client.clone(),
            mandate_lines: draft.mandate_lines.clone(),
            history: draft.history.clone(),
            opened_by: opened_by.id.clone(),
            opened_at: chrono::Utc::now().naive_utc(),
        }
    }
}
