// ==========================================
// Système de prise de mandat - verrou d'enregistrement
// ==========================================
// Verrou pessimiste porté par le document du brouillon lui-même.
// Un seul rédacteur logique par brouillon, appliqué de façon
// coopérative: il n'existe pas de primitive compare-and-swap côté
// magasin, deux sessions peuvent donc observer lock == null dans le
// même aller-retour et la dernière écriture gagne silencieusement.
// Compromis assumé pour un déploiement mono-organisation à faible
// contention.
// ==========================================

use crate::domain::draft::{Draft, RecordLockInfo};
use crate::domain::types::Actor;
use crate::engine::error::EngineResult;
use crate::repository::{Collection, RecordStore};
use serde_json::json;
use std::sync::Arc;

// ==========================================
// LockAttempt - issue d'une tentative d'acquisition
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockAttempt {
    /// Verrou accordé: la session peut écrire
    Granted,
    /// Verrou détenu par une autre identité: ouverture en lecture seule
    Held {
        holder_id: String,
        holder_name: String,
    },
}

impl LockAttempt {
    pub fn is_granted(&self) -> bool {
        matches!(self, LockAttempt::Granted)
    }
}

// ==========================================
// RecordLockService
// ==========================================
pub struct RecordLockService {
    store: Arc<dyn RecordStore>,
}

impl RecordLockService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Tente d'acquérir le verrou du brouillon pour `actor`.
    ///
    /// Si le verrou persisté est libre ou déjà détenu par `actor`,
    /// il est (ré)écrit avec un nouvel horodatage et la demande est
    /// accordée. Sinon, l'identité du détenteur est retournée pour
    /// affichage du bandeau lecture seule.
    ///
    /// Aucune expiration: un poste déconnecté garde le verrou jusqu'à
    /// libération explicite à la fermeture du dialogue.
    pub async fn acquire(&self, draft_id: &str, actor: &Actor) -> EngineResult<LockAttempt> {
        let doc = self.store.get(Collection::Draft, draft_id).await?;
        let draft: Draft = serde_json::from_value(doc)?;

        if let Some(lock) = &draft.lock {
            if !lock.is_held_by(actor) {
                tracing::info!(
                    draft_id,
                    holder = %lock.holder_name,
                    "acquisition refusée: brouillon déjà verrouillé"
                );
                return Ok(LockAttempt::Held {
                    holder_id: lock.holder_id.clone(),
                    holder_name: lock.holder_name.clone(),
                });
            }
        }

        let lock = RecordLockInfo::held_by(actor);
        self.store
            .update(
                Collection::Draft,
                draft_id,
                json!({ "lock": serde_json::to_value(&lock)? }),
            )
            .await?;

        tracing::debug!(draft_id, holder = %actor.display_name, "verrou acquis");
        Ok(LockAttempt::Granted)
    }

    /// Libère le verrou seulement s'il est détenu par `actor`.
    ///
    /// Sans effet dans tous les autres cas: une session périmée ne doit
    /// jamais libérer le verrou d'un autre usager.
    pub async fn release(&self, draft_id: &str, actor: &Actor) -> EngineResult<()> {
        let doc = self.store.get(Collection::Draft, draft_id).await?;
        let draft: Draft = serde_json::from_value(doc)?;

        match &draft.lock {
            Some(lock) if lock.is_held_by(actor) => {
                self.store
                    .update(Collection::Draft, draft_id, json!({ "lock": null }))
                    .await?;
                tracing::debug!(draft_id, holder = %actor.display_name, "verrou libéré");
            }
            Some(lock) => {
                tracing::warn!(
                    draft_id,
                    holder = %lock.holder_name,
                    requester = %actor.display_name,
                    "libération ignorée: verrou détenu par un autre usager"
                );
            }
            None => {}
        }

        Ok(())
    }

    /// Vrai si le verrou persisté est détenu par `actor`
    pub async fn is_held_by(&self, draft_id: &str, actor: &Actor) -> EngineResult<bool> {
        let doc = self.store.get(Collection::Draft, draft_id).await?;
        let draft: Draft = serde_json::from_value(doc)?;
        Ok(draft.lock.map(|l| l.is_held_by(actor)).unwrap_or(false))
    }
}
