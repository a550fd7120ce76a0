// ==========================================
// Système de prise de mandat - opération cadastrale
// ==========================================
// Sortie du parseur D01, fusionnée dans le sous-formulaire
// de lot de la ligne de mandat active, puis éditée par l'usager.
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ConcordanceRecord - concordance antérieure
// ==========================================
// Lien entre la désignation courante du lot et une
// désignation cadastrale antérieure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcordanceRecord {
    pub land_registry_district: String, // Circonscription foncière
    pub cadastre: String,               // Désignation du cadastre
    pub lot_number: String,             // Numéro de lot antérieur
    pub rang: String,                   // Rang (ex.: "Rang 7")
    pub is_partial: bool,               // Concordance partielle
}

// ==========================================
// LotOperationRecord - opération sur un lot
// ==========================================
// Objet-valeur transitoire: produit une fois par import,
// jamais persisté tel quel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotOperationRecord {
    pub lot_number: String,             // Numéro du lot visé
    pub land_registry_district: String, // Circonscription foncière
    pub cadastre: String,               // Cadastre du lot
    pub operation_type: String,         // Type d'opération (ex.: "Remplacement")
    pub bpd_date: String,               // Date BPD (AAAA-MM-JJ)
    pub concordances: Vec<ConcordanceRecord>,
}

impl LotOperationRecord {
    /// Vrai si aucune ligne reconnue n'a alimenté l'enregistrement
    pub fn is_empty(&self) -> bool {
        self.lot_number.is_empty()
            && self.land_registry_district.is_empty()
            && self.bpd_date.is_empty()
            && self.concordances.is_empty()
    }
}
