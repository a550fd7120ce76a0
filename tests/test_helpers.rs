// ==========================================
// Aides de test partagées
// ==========================================
// Magasin en mémoire pré-semé, brouillons d'exemple et magasins
// enveloppants (comptage des écritures, pannes simulées).
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use prise_mandat::repository::error::{StoreError, StoreResult};
use prise_mandat::{Actor, Collection, Draft, MandateLine, RecordStore, SqliteStore};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Identité de test par défaut
pub fn actor(id: &str, name: &str) -> Actor {
    Actor::new(id, name)
}

/// Magasin en mémoire vierge, journalisation de test initialisée
pub fn create_test_store() -> Arc<SqliteStore> {
    prise_mandat::logging::init_test();
    Arc::new(SqliteStore::in_memory().unwrap())
}

/// Brouillon d'exemple avec une ligne de mandat tarifée
pub fn sample_draft(surveyor: &str, created_by: &Actor) -> Draft {
    let mut draft = Draft::new(surveyor, created_by);
    let mut line = MandateLine::new("Certificat de localisation");
    line.estimated_price = 1200.0;
    line.assignee = Some("tech-03".to_string());
    draft.mandate_lines.push(line);
    draft.client.first_name = "Marc".to_string();
    draft.client.last_name = "Gagnon".to_string();
    draft
}

/// Insère un brouillon dans le magasin
pub async fn seed_draft(store: &Arc<SqliteStore>, draft: &Draft) {
    store
        .create(Collection::Draft, serde_json::to_value(draft).unwrap())
        .await
        .unwrap();
}

// ==========================================
// CountingStore - compte les écritures effectuées
// ==========================================
pub struct CountingStore {
    inner: Arc<dyn RecordStore>,
    pub update_count: AtomicUsize,
    pub create_count: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            update_count: AtomicUsize::new(0),
            create_count: AtomicUsize::new(0),
        }
    }

    pub fn updates(&self) -> usize {
        self.update_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn list(&self, collection: Collection) -> StoreResult<Vec<JsonValue>> {
        self.inner.list(collection).await
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<JsonValue> {
        self.inner.get(collection, id).await
    }

    async fn create(&self, collection: Collection, fields: JsonValue) -> StoreResult<JsonValue> {
        self.create_count.fetch_add(1, Ordering::SeqCst);
        self.inner.create(collection, fields).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: JsonValue,
    ) -> StoreResult<JsonValue> {
        self.update_count.fetch_add(1, Ordering::SeqCst);
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        self.inner.delete(collection, id).await
    }
}

// ==========================================
// FailingStore - pannes d'écriture commutables
// ==========================================
// Les lectures passent toujours; les écritures échouent tant que le
// drapeau est levé.
pub struct FailingStore {
    inner: Arc<dyn RecordStore>,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::DatabaseQueryError(
                "panne simulée".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn list(&self, collection: Collection) -> StoreResult<Vec<JsonValue>> {
        self.inner.list(collection).await
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<JsonValue> {
        self.inner.get(collection, id).await
    }

    async fn create(&self, collection: Collection, fields: JsonValue) -> StoreResult<JsonValue> {
        self.check()?;
        self.inner.create(collection, fields).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: JsonValue,
    ) -> StoreResult<JsonValue> {
        self.check()?;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        self.check()?;
        self.inner.delete(collection, id).await
    }
}
