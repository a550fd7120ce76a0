// ==========================================
// Système de prise de mandat - ouverture de dossier
// ==========================================
// Soumission d'un brouillon accepté: validation synchrone des champs
// requis, garde d'unicité du numéro, création du dossier, puis retrait
// du brouillon de sa collection.
// ==========================================

use crate::domain::draft::{Case, Draft};
use crate::domain::history::HistoryEntry;
use crate::domain::types::Actor;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::numbering::SequentialNumberAllocator;
use crate::repository::{Collection, RecordStore};
use std::sync::Arc;

pub struct CaseOpeningEngine {
    store: Arc<dyn RecordStore>,
    allocator: SequentialNumberAllocator,
}

impl CaseOpeningEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let allocator = SequentialNumberAllocator::new(store.clone());
        Self { store, allocator }
    }

    /// Validation synchrone avant soumission, signalée par champ:
    /// au moins une ligne de mandat, un responsable sur chaque ligne,
    /// et un numéro de dossier renseigné.
    pub fn validate_for_opening(draft: &Draft) -> EngineResult<()> {
        if draft.mandate_lines.is_empty() {
            return Err(EngineError::MissingRequiredField {
                field: "mandats".to_string(),
                line: None,
            });
        }

        for (index, line) in draft.mandate_lines.iter().enumerate() {
            let missing = line
                .assignee
                .as_deref()
                .map(|a| a.trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(EngineError::MissingRequiredField {
                    field: "responsable".to_string(),
                    line: Some(index),
                });
            }
        }

        match draft.case_number.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => Ok(()),
            _ => Err(EngineError::MissingCaseNumber),
        }
    }

    /// Ouvre le dossier à partir du brouillon.
    ///
    /// Le numéro est revérifié contre les deux collections au moment de
    /// la soumission (le brouillon lui-même est exclu de la vérification):
    /// une collision issue d'une allocation concurrente devient un rejet
    /// explicite, jamais un doublon silencieux.
    pub async fn open_case(&self, draft: &Draft, actor: &Actor) -> EngineResult<Case> {
        Self::validate_for_opening(draft)?;

        let number = match draft.case_number.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return Err(EngineError::MissingCaseNumber),
        };

        if self
            .allocator
            .exists(&draft.surveyor, &number, Some(&draft.id))
            .await?
        {
            tracing::warn!(
                surveyor = %draft.surveyor,
                number = %number,
                "ouverture refusée: numéro de dossier en double"
            );
            return Err(EngineError::DuplicateNumber {
                surveyor: draft.surveyor.clone(),
                number,
            });
        }

        let mut case = Case::from_draft(draft, &number, actor);
        case.history.insert(
            0,
            HistoryEntry::new("Ouverture du dossier", format!("Dossier {}", number), actor),
        );

        let created = self
            .store
            .create(Collection::Case, serde_json::to_value(&case)?)
            .await?;
        let case: Case = serde_json::from_value(created)?;

        // Le brouillon est consommé par l'ouverture; le retirer évite
        // qu'il continue de compter dans l'allocation des numéros
        self.store.delete(Collection::Draft, &draft.id).await?;

        tracing::info!(
            case_id = %case.id,
            number = %case.case_number,
            surveyor = %case.surveyor,
            "dossier ouvert"
        );
        Ok(case)
    }
}
