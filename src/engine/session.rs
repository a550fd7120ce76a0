// ==========================================
// Système de prise de mandat - session d'édition et machine à états
// ==========================================
// Le dialogue d'édition d'un brouillon est modélisé par une machine à
// états explicite: fermé, édition, lecture seule, ouverture de dossier,
// import de fichier patrimonial. Toute transition hors de la table est
// rejetée comme erreur, jamais ignorée.
//
// L'édition du client n'est pas ouverte par la session elle-même:
// l'appelant injecte un rappel, la session se contente de le déclencher.
// ==========================================

use crate::config::ConfigManager;
use crate::domain::draft::{Case, ClientRecord, Draft};
use crate::domain::history::Comment;
use crate::domain::lot::LotOperationRecord;
use crate::domain::types::Actor;
use crate::engine::autosave::AutoSaveEngine;
use crate::engine::case_opening::CaseOpeningEngine;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::record_lock::{LockAttempt, RecordLockService};
use crate::importer::d01_parser::D01Parser;
use crate::repository::{Collection, RecordStore};
use std::sync::Arc;
use std::time::Duration;

// ==========================================
// DialogState - états du dialogue d'édition
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// Dialogue fermé (état initial et final)
    Closed,
    /// Édition normale, verrou détenu par la session
    Editing,
    /// Verrou détenu par une autre identité: consultation seulement
    LockedReadOnly,
    /// Soumission pour ouverture de dossier en cours
    OpeningCase,
    /// Import d'un fichier patrimonial en cours
    ImportingLegacyFile,
}

impl DialogState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogState::Closed => "FERME",
            DialogState::Editing => "EDITION",
            DialogState::LockedReadOnly => "LECTURE_SEULE",
            DialogState::OpeningCase => "OUVERTURE_DOSSIER",
            DialogState::ImportingLegacyFile => "IMPORT_FICHIER",
        }
    }

    /// Table des transitions permises.
    /// La fermeture est atteignable depuis tout état actif.
    pub fn can_transition_to(&self, to: DialogState) -> bool {
        use DialogState::*;
        matches!(
            (self, to),
            (Closed, Editing)
                | (Closed, LockedReadOnly)
                | (Editing, ImportingLegacyFile)
                | (Editing, OpeningCase)
                | (Editing, Closed)
                | (LockedReadOnly, Closed)
                | (ImportingLegacyFile, Editing)
                | (ImportingLegacyFile, Closed)
                | (OpeningCase, Editing)
                | (OpeningCase, Closed)
        )
    }
}

// ==========================================
// DraftSession - orchestration d'une session d'édition
// ==========================================
// Une instance par dialogue ouvert. Détient le verrou (ou non), le
// moteur de sauvegarde automatique de la session et l'état courant.
pub struct DraftSession {
    store: Arc<dyn RecordStore>,
    actor: Actor,
    draft_id: String,
    lock_service: RecordLockService,
    autosave: Arc<AutoSaveEngine>,
    parser: D01Parser,
    state: DialogState,
    /// Nom du détenteur du verrou quand la session est en lecture seule
    read_only_holder: Option<String>,
    /// Rappel injecté pour ouvrir l'édition du client
    on_request_edit_client: Option<Box<dyn Fn(&ClientRecord) + Send + Sync>>,
}

impl DraftSession {
    /// Ouvre une session sur `draft_id`: charge le brouillon, tente
    /// d'acquérir le verrou et passe en édition ou en lecture seule
    pub async fn open(
        store: Arc<dyn RecordStore>,
        actor: Actor,
        draft_id: &str,
    ) -> EngineResult<Self> {
        Self::open_with_delay(
            store,
            actor,
            draft_id,
            Duration::from_millis(crate::DEFAULT_AUTOSAVE_DELAY_MS),
        )
        .await
    }

    /// Ouvre une session avec les réglages persistés: délai de
    /// sauvegarde et cadastre par défaut lus dans la table config_kv
    pub async fn open_with_config(
        store: Arc<dyn RecordStore>,
        config: &ConfigManager,
        actor: Actor,
        draft_id: &str,
    ) -> EngineResult<Self> {
        let delay_ms = config
            .get_autosave_delay_ms()
            .map_err(|e| EngineError::InternalError(e.to_string()))?;
        let default_cadastre = config
            .get_default_cadastre()
            .map_err(|e| EngineError::InternalError(e.to_string()))?;

        let mut session =
            Self::open_with_delay(store, actor, draft_id, Duration::from_millis(delay_ms)).await?;
        session.parser = D01Parser::with_default_cadastre(default_cadastre);
        Ok(session)
    }

    /// Variante avec délai de sauvegarde explicite (configuration ou tests)
    pub async fn open_with_delay(
        store: Arc<dyn RecordStore>,
        actor: Actor,
        draft_id: &str,
        autosave_delay: Duration,
    ) -> EngineResult<Self> {
        let doc = store.get(Collection::Draft, draft_id).await?;
        let draft: Draft = serde_json::from_value(doc)?;

        let lock_service = RecordLockService::new(store.clone());
        let attempt = lock_service.acquire(draft_id, &actor).await?;

        let autosave = Arc::new(AutoSaveEngine::with_delay(
            store.clone(),
            actor.clone(),
            &draft,
            autosave_delay,
        ));

        let mut session = Self {
            store,
            actor,
            draft_id: draft_id.to_string(),
            lock_service,
            autosave,
            parser: D01Parser::new(),
            state: DialogState::Closed,
            read_only_holder: None,
            on_request_edit_client: None,
        };

        match attempt {
            LockAttempt::Granted => {
                session.autosave.set_lock_held(true);
                session.transition(DialogState::Editing)?;
            }
            LockAttempt::Held { holder_name, .. } => {
                session.read_only_holder = Some(holder_name);
                session.transition(DialogState::LockedReadOnly)?;
            }
        }

        Ok(session)
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_read_only(&self) -> bool {
        self.state == DialogState::LockedReadOnly
    }

    /// Détenteur du verrou quand la session est en lecture seule
    pub fn read_only_holder(&self) -> Option<&str> {
        self.read_only_holder.as_deref()
    }

    /// Bandeau lecture seule dans la locale courante, s'il y a lieu
    pub fn read_only_banner(&self) -> Option<String> {
        self.read_only_holder
            .as_deref()
            .map(|holder| crate::i18n::t_with_args("lock.held_by", &[("holder", holder)]))
    }

    /// Message d'échec de sauvegarde à afficher à l'opérateur, s'il y a lieu
    pub fn autosave_error_banner(&self) -> Option<String> {
        self.autosave.last_error().map(|reason| {
            crate::i18n::t_with_args("autosave.persist_failed", &[("reason", &reason)])
        })
    }

    pub fn autosave(&self) -> &Arc<AutoSaveEngine> {
        &self.autosave
    }

    /// Relaye une mutation du formulaire vers la sauvegarde automatique
    pub fn on_change(&self, form: Draft) {
        self.autosave.on_change(form);
    }

    /// Sauvegarde immédiate demandée par l'opérateur.
    ///
    /// Refusée en lecture seule, en nommant le détenteur du verrou.
    /// Retourne true si une écriture a eu lieu.
    pub async fn save_now(&self, form: Draft) -> EngineResult<bool> {
        if self.state == DialogState::LockedReadOnly {
            return Err(EngineError::LockConflict {
                holder_name: self.read_only_holder.clone().unwrap_or_default(),
            });
        }
        self.autosave.cancel_pending();
        self.autosave.flush_now(form).await
    }

    fn transition(&mut self, to: DialogState) -> EngineResult<()> {
        if !self.state.can_transition_to(to) {
            return Err(EngineError::InvalidStateTransition {
                from: self.state.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        tracing::debug!(
            draft_id = %self.draft_id,
            from = self.state.as_str(),
            to = to.as_str(),
            "transition d'état du dialogue"
        );
        self.state = to;
        Ok(())
    }

    /// Injecte le rappel d'édition du client
    pub fn set_client_edit_callback<F>(&mut self, callback: F)
    where
        F: Fn(&ClientRecord) + Send + Sync + 'static,
    {
        self.on_request_edit_client = Some(Box::new(callback));
    }

    /// Déclenche le rappel d'édition du client, s'il est injecté
    pub fn request_edit_client(&self, client: &ClientRecord) {
        match &self.on_request_edit_client {
            Some(callback) => callback(client),
            None => {
                tracing::warn!(
                    draft_id = %self.draft_id,
                    "édition du client demandée sans rappel injecté"
                );
            }
        }
    }

    /// Importe un fichier patrimonial dans la ligne de mandat active.
    ///
    /// Entre en état d'import le temps de l'analyse puis revient en
    /// édition, que l'analyse réussisse ou non. Le résultat sème le
    /// sous-formulaire de lot de la ligne visée et est retourné à
    /// l'appelant pour affichage.
    pub fn import_legacy_file(
        &mut self,
        form: &mut Draft,
        line_index: usize,
        bytes: &[u8],
    ) -> EngineResult<LotOperationRecord> {
        self.transition(DialogState::ImportingLegacyFile)?;
        let parsed = self.parser.parse(bytes);
        self.transition(DialogState::Editing)?;

        let record = parsed?;
        let line = form.mandate_lines.get_mut(line_index).ok_or_else(|| {
            EngineError::InternalError(format!("ligne de mandat {} inexistante", line_index))
        })?;
        line.apply_lot_import(record.clone());
        Ok(record)
    }

    /// Ajoute un commentaire au brouillon et le persiste immédiatement
    /// (les commentaires ne passent pas par le débounce: ils ne font pas
    /// partie des champs suivis par l'audit). Refusé en lecture seule.
    pub async fn add_comment(&self, form: &mut Draft, text: &str) -> EngineResult<()> {
        if self.state == DialogState::LockedReadOnly {
            return Err(EngineError::LockConflict {
                holder_name: self.read_only_holder.clone().unwrap_or_default(),
            });
        }

        form.comments.insert(0, Comment::new(&self.actor, text));
        self.store
            .update(
                Collection::Draft,
                &self.draft_id,
                serde_json::json!({ "comments": serde_json::to_value(&form.comments)? }),
            )
            .await?;
        Ok(())
    }

    /// Soumet le brouillon pour ouverture de dossier.
    ///
    /// En cas de rejet (validation, numéro en double) la session revient
    /// en édition; en cas de succès le brouillon n'existe plus et la
    /// session se ferme.
    pub async fn open_case(&mut self, form: &Draft) -> EngineResult<Case> {
        self.transition(DialogState::OpeningCase)?;
        self.autosave.cancel_pending();

        let engine = CaseOpeningEngine::new(self.store.clone());
        match engine.open_case(form, &self.actor).await {
            Ok(case) => {
                // Le document du brouillon est supprimé: plus de verrou à libérer
                self.autosave.set_lock_held(false);
                self.transition(DialogState::Closed)?;
                Ok(case)
            }
            Err(e) => {
                self.transition(DialogState::Editing)?;
                Err(e)
            }
        }
    }

    /// Ferme la session: annule la sauvegarde en attente et libère le
    /// verrou si la session le détient. Sans effet si déjà fermée.
    pub async fn close(&mut self) -> EngineResult<()> {
        if self.state == DialogState::Closed {
            return Ok(());
        }

        self.autosave.cancel_pending();
        if self.autosave.lock_held() {
            self.lock_service.release(&self.draft_id, &self.actor).await?;
            self.autosave.set_lock_held(false);
        }
        self.transition(DialogState::Closed)
    }
}
