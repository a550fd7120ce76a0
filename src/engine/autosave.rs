// ==========================================
// Système de prise de mandat - sauvegarde automatique
// ==========================================
// Pipeline débouncé: chaque mutation du formulaire annule la minuterie
// en attente et en replanifie une nouvelle; à l'échéance, le diff est
// calculé contre le dernier instantané persisté connu et, s'il est non
// vide, le brouillon est persisté avec les nouvelles entrées d'audit
// en tête de l'historique.
//
// Les sauvegardes d'une même session sont sérialisées par la
// coalescence du débounce; aucun compteur de version n'est utilisé
// au-delà du champ de verrou.
// ==========================================

use crate::domain::draft::{Draft, DraftSnapshot};
use crate::domain::history::HistoryEntry;
use crate::domain::types::Actor;
use crate::engine::diff_audit::DiffAuditBuilder;
use crate::engine::error::EngineResult;
use crate::repository::{Collection, RecordStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

// État interne protégé par mutex (sections critiques courtes)
struct AutoSaveState {
    /// Dernier instantané persisté connu de la session
    last_saved: DraftSnapshot,
    /// Historique tel que persisté en dernier (le formulaire n'est pas
    /// la source de vérité pour l'historique pendant la session)
    persisted_history: Vec<HistoryEntry>,
    /// Minuterie de débounce en attente
    pending: Option<JoinHandle<()>>,
    /// Dernière erreur de persistance, affichée à l'opérateur
    last_error: Option<String>,
}

// ==========================================
// AutoSaveEngine - une instance par session d'édition
// ==========================================
pub struct AutoSaveEngine {
    store: Arc<dyn RecordStore>,
    actor: Actor,
    draft_id: String,
    delay: Duration,
    /// La session détient-elle le verrou d'écriture?
    /// Hors verrou, on_change est sans effet (mode lecture seule).
    holds_lock: AtomicBool,
    state: Mutex<AutoSaveState>,
}

impl AutoSaveEngine {
    /// Crée le moteur pour une session ouverte sur `draft` tel que chargé
    /// du magasin (il fournit l'instantané et l'historique de référence)
    pub fn new(store: Arc<dyn RecordStore>, actor: Actor, draft: &Draft) -> Self {
        Self::with_delay(
            store,
            actor,
            draft,
            Duration::from_millis(crate::DEFAULT_AUTOSAVE_DELAY_MS),
        )
    }

    /// Variante avec délai de débounce explicite (configuration ou tests)
    pub fn with_delay(
        store: Arc<dyn RecordStore>,
        actor: Actor,
        draft: &Draft,
        delay: Duration,
    ) -> Self {
        Self {
            store,
            actor,
            draft_id: draft.id.clone(),
            delay,
            holds_lock: AtomicBool::new(false),
            state: Mutex::new(AutoSaveState {
                last_saved: draft.snapshot(),
                persisted_history: draft.history.clone(),
                pending: None,
                last_error: None,
            }),
        }
    }

    /// Indique au moteur si la session détient le verrou d'écriture
    pub fn set_lock_held(&self, held: bool) {
        self.holds_lock.store(held, Ordering::SeqCst);
    }

    pub fn lock_held(&self) -> bool {
        self.holds_lock.load(Ordering::SeqCst)
    }

    /// Délai de débounce effectif de la session
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Dernière erreur de persistance, le cas échéant
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.last_error.clone())
    }

    /// Vrai si une minuterie de débounce est en attente
    pub fn has_pending(&self) -> bool {
        self.state
            .lock()
            .ok()
            .map(|s| s.pending.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Appelé à chaque mutation de champ du formulaire.
    ///
    /// Annule la minuterie en attente puis en replanifie une nouvelle
    /// avec l'état de formulaire le plus récent. Sans effet si la
    /// session ne détient pas le verrou.
    pub fn on_change(self: &Arc<Self>, form: Draft) {
        if !self.lock_held() {
            tracing::trace!(draft_id = %self.draft_id, "édition en lecture seule: sauvegarde ignorée");
            return;
        }

        // Annulation d'abord, planification ensuite: la minuterie
        // précédente ne doit jamais pouvoir expirer pendant que la
        // nouvelle existe déjà.
        let mut state = match self.state.lock() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = state.pending.take() {
            previous.abort();
        }

        let engine = Arc::clone(self);
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(engine.delay).await;
            if let Err(e) = engine.flush_now(form).await {
                // L'état en mémoire n'est pas annulé: la prochaine édition
                // retentera une sauvegarde fraîche.
                tracing::error!(
                    draft_id = %engine.draft_id,
                    error = %e,
                    "échec de la sauvegarde automatique"
                );
            }
        }));
    }

    /// Annule la minuterie en attente (fermeture du dialogue)
    pub fn cancel_pending(&self) {
        let mut state = match self.state.lock() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
    }

    /// Calcule le diff contre le dernier instantané persisté et, s'il est
    /// non vide, persiste les champs du formulaire avec les nouvelles
    /// entrées d'audit en tête de l'historique.
    ///
    /// Retourne true si une écriture a eu lieu.
    pub async fn flush_now(&self, form: Draft) -> EngineResult<bool> {
        let (last_saved, persisted_history) = {
            let state = self
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            (state.last_saved.clone(), state.persisted_history.clone())
        };

        let current = form.snapshot();
        let entries = DiffAuditBuilder::build_entries(&last_saved, &current, &self.actor);
        if entries.is_empty() {
            return Ok(false);
        }

        // Historique: nouvelles entrées devant l'historique persisté
        let mut new_history = entries;
        new_history.extend(persisted_history);

        let mut fields = serde_json::to_value(&form)?;
        if let Some(map) = fields.as_object_mut() {
            // Le verrou n'appartient pas au formulaire: ne jamais
            // l'écraser avec une valeur en mémoire possiblement périmée
            map.remove("lock");
            map.insert("history".to_string(), serde_json::to_value(&new_history)?);
        }

        match self
            .store
            .update(Collection::Draft, &self.draft_id, fields)
            .await
        {
            Ok(_) => {
                let mut state = self
                    .state
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                state.last_saved = current;
                state.persisted_history = new_history;
                state.last_error = None;
                tracing::debug!(draft_id = %self.draft_id, "sauvegarde automatique effectuée");
                Ok(true)
            }
            Err(e) => {
                let mut state = self
                    .state
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                state.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}
