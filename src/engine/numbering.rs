// ==========================================
// Système de prise de mandat - allocateur de numéros de dossier
// ==========================================
// Le prochain numéro libre est dérivé, jamais stocké: maximum des
// suffixes numériques sur deux collections vivantes (dossiers ouverts
// et brouillons au statut pré-ouverture), par arpenteur.
//
// Allocation consultative, non atomique: recalculée à l'affichage et
// revérifiée à la soumission. Deux allocations concurrentes pour le
// même arpenteur peuvent entrer en collision; la vérification de
// soumission transforme la course en rejet visible par l'usager
// plutôt qu'en corruption silencieuse.
// ==========================================

use crate::domain::types::DraftStatus;
use crate::engine::error::EngineResult;
use crate::repository::{Collection, RecordStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub struct SequentialNumberAllocator {
    store: Arc<dyn RecordStore>,
}

impl SequentialNumberAllocator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Prochain numéro libre pour `surveyor`: max numérique des deux
    /// collections + 1, rendu en chaîne. Les numéros absents ou non
    /// numériques comptent pour 0.
    pub async fn next_number(
        &self,
        surveyor: &str,
        excluding_draft_id: Option<&str>,
    ) -> EngineResult<String> {
        let mut max = 0i64;

        for doc in self.store.list(Collection::Case).await? {
            if doc_str(&doc, "surveyor") == surveyor {
                max = max.max(parse_number(doc_str(&doc, "case_number")));
            }
        }

        for doc in self.store.list(Collection::Draft).await? {
            if doc_str(&doc, "surveyor") != surveyor {
                continue;
            }
            if DraftStatus::parse(doc_str(&doc, "status")) != DraftStatus::AOuvrir {
                continue;
            }
            if excluding_draft_id.is_some_and(|id| doc_str(&doc, "id") == id) {
                continue;
            }
            max = max.max(parse_number(doc_str(&doc, "case_number")));
        }

        Ok((max + 1).to_string())
    }

    /// Garde d'unicité pré-soumission: vrai si `number` est déjà porté,
    /// à l'identique, par un dossier ou un brouillon à ouvrir de
    /// `surveyor` autre que `excluding_draft_id`
    pub async fn exists(
        &self,
        surveyor: &str,
        number: &str,
        excluding_draft_id: Option<&str>,
    ) -> EngineResult<bool> {
        for doc in self.store.list(Collection::Case).await? {
            if doc_str(&doc, "surveyor") == surveyor && doc_str(&doc, "case_number") == number {
                return Ok(true);
            }
        }

        for doc in self.store.list(Collection::Draft).await? {
            if doc_str(&doc, "surveyor") != surveyor {
                continue;
            }
            if DraftStatus::parse(doc_str(&doc, "status")) != DraftStatus::AOuvrir {
                continue;
            }
            if excluding_draft_id.is_some_and(|id| doc_str(&doc, "id") == id) {
                continue;
            }
            if doc_str(&doc, "case_number") == number {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Champ texte d'un document JSON, vide si absent ou d'un autre type
fn doc_str<'a>(doc: &'a JsonValue, key: &str) -> &'a str {
    doc.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Suffixe numérique d'un numéro de dossier; 0 si non analysable
fn parse_number(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_tolerates_garbage() {
        assert_eq!(parse_number("42"), 42);
        assert_eq!(parse_number(" 7 "), 7);
        assert_eq!(parse_number(""), 0);
        assert_eq!(parse_number("ancien-dossier"), 0);
    }
}
