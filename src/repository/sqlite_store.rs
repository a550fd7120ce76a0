// ==========================================
// Système de prise de mandat - magasin de documents SQLite
// ==========================================
// Implémentation locale de RecordStore sur une table unique
// document(collection, id, data). Les entités sont stockées en JSON,
// comme le ferait le service documentaire distant.
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::store::{Collection, RecordStore};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Ouvre (ou crée) le magasin sur le fichier donné
    pub fn new(db_path: &str) -> StoreResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| StoreError::DatabaseConnectionError(e.to_string()))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.ensure_table()?;
        Ok(store)
    }

    /// Magasin en mémoire (tests et démonstrations)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::DatabaseConnectionError(e.to_string()))?;
        configure_sqlite_connection(&conn)
            .map_err(|e| StoreError::DatabaseConnectionError(e.to_string()))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.ensure_table()?;
        Ok(store)
    }

    /// Réutilise une connexion existante (PRAGMA réappliqués, idempotent)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> StoreResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| StoreError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)
                .map_err(|e| StoreError::DatabaseConnectionError(e.to_string()))?;
        }
        let store = Self { conn };
        store.ensure_table()?;
        Ok(store)
    }

    fn get_conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> StoreResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS document (
              collection TEXT NOT NULL,
              id TEXT NOT NULL,
              data TEXT NOT NULL,
              created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
              updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
              PRIMARY KEY (collection, id)
            );

            CREATE INDEX IF NOT EXISTS idx_document_collection ON document(collection);
            "#,
        )?;
        Ok(())
    }

    fn read_document(
        conn: &Connection,
        collection: Collection,
        id: &str,
    ) -> StoreResult<Option<JsonValue>> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT data FROM document WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => {
                let value: JsonValue =
                    serde_json::from_str(&text).map_err(|e| StoreError::InvalidDocument {
                        collection: collection.as_str().to_string(),
                        id: id.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn list(&self, collection: Collection) -> StoreResult<Vec<JsonValue>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT data FROM document WHERE collection = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt
            .query_map(params![collection.as_str()], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut docs = Vec::with_capacity(rows.len());
        for raw in rows {
            docs.push(serde_json::from_str(&raw)?);
        }
        Ok(docs)
    }

    async fn get(&self, collection: Collection, id: &str) -> StoreResult<JsonValue> {
        let conn = self.get_conn()?;
        Self::read_document(&conn, collection, id)?.ok_or_else(|| StoreError::NotFound {
            collection: collection.as_str().to_string(),
            id: id.to_string(),
        })
    }

    async fn create(&self, collection: Collection, fields: JsonValue) -> StoreResult<JsonValue> {
        let mut doc = match fields {
            JsonValue::Object(map) => JsonValue::Object(map),
            other => {
                return Err(StoreError::InvalidDocument {
                    collection: collection.as_str().to_string(),
                    id: String::new(),
                    message: format!("objet JSON attendu, reçu {}", other),
                })
            }
        };

        let id = doc
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        doc["id"] = JsonValue::String(id.clone());

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO document (collection, id, data) VALUES (?1, ?2, ?3)",
            params![collection.as_str(), id, serde_json::to_string(&doc)?],
        )?;

        Ok(doc)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: JsonValue,
    ) -> StoreResult<JsonValue> {
        let conn = self.get_conn()?;
        let mut doc =
            Self::read_document(&conn, collection, id)?.ok_or_else(|| StoreError::NotFound {
                collection: collection.as_str().to_string(),
                id: id.to_string(),
            })?;

        // Fusion des champs au premier niveau (l'identifiant ne change jamais)
        if let (Some(target), JsonValue::Object(updates)) = (doc.as_object_mut(), fields) {
            for (key, value) in updates {
                if key == "id" {
                    continue;
                }
                target.insert(key, value);
            }
        }

        conn.execute(
            "UPDATE document SET data = ?1, updated_at = datetime('now', 'localtime')
             WHERE collection = ?2 AND id = ?3",
            params![serde_json::to_string(&doc)?, collection.as_str(), id],
        )?;

        Ok(doc)
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM document WHERE collection = ?1 AND id = ?2",
            params![collection.as_str(), id],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound {
                collection: collection.as_str().to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
