// ==========================================
// Système de prise de mandat - gestionnaire de configuration
// ==========================================
// Responsabilité: lecture et écriture des réglages de l'application
// Stockage: table config_kv (clé-valeur + portée)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Crée un gestionnaire sur le fichier de base `db_path`
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Self::ensure_table(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Crée un gestionnaire sur une connexion existante.
    ///
    /// Les PRAGMA uniformes sont réappliqués (idempotent) pour garantir
    /// un comportement identique quelle que soit l'origine de la connexion.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let guard = conn
                .lock()
                .map_err(|e| format!("Échec d'acquisition du verrou: {}", e))?;
            crate::db::configure_sqlite_connection(&guard)?;
            Self::ensure_table(&guard)?;
        }

        Ok(Self { conn })
    }

    fn ensure_table(conn: &Connection) -> Result<(), Box<dyn Error>> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL,
                key      TEXT NOT NULL,
                value    TEXT NOT NULL,
                PRIMARY KEY (scope_id, key)
            )",
            [],
        )?;
        Ok(())
    }

    /// Lit une valeur de configuration (scope_id = 'global')
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("Échec d'acquisition du verrou: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Lit une valeur de configuration avec valeur par défaut
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Écrit une valeur de configuration (scope_id = 'global', upsert)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("Échec d'acquisition du verrou: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// Délai de débounce de la sauvegarde automatique, en millisecondes
    pub fn get_autosave_delay_ms(&self) -> Result<u64, Box<dyn Error>> {
        let default = crate::DEFAULT_AUTOSAVE_DELAY_MS.to_string();
        let value = self.get_config_or_default(config_keys::AUTOSAVE_DELAY_MS, &default)?;
        Ok(value
            .parse::<u64>()
            .unwrap_or(crate::DEFAULT_AUTOSAVE_DELAY_MS))
    }

    /// Locale de l'interface (fr-CA par défaut)
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::LOCALE, "fr-CA")
    }

    /// Applique la locale configurée au système de messages
    /// (appelé au démarrage de l'application)
    pub fn apply_locale(&self) -> Result<(), Box<dyn Error>> {
        let locale = self.get_locale()?;
        crate::i18n::set_locale(&locale);
        Ok(())
    }

    /// Cadastre par défaut pour l'import de fichiers patrimoniaux
    pub fn get_default_cadastre(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(
            config_keys::DEFAULT_CADASTRE,
            crate::importer::cadastre_codes::DEFAULT_CADASTRE,
        )
    }
}

// ==========================================
// Clés de configuration
// ==========================================
pub mod config_keys {
    // Sauvegarde automatique
    pub const AUTOSAVE_DELAY_MS: &str = "autosave_delay_ms";

    // Interface
    pub const LOCALE: &str = "locale";

    // Import
    pub const DEFAULT_CADASTRE: &str = "default_cadastre";
}
