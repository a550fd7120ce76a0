// ==========================================
// Initialisation des connexions SQLite
// ==========================================
// Objectifs:
// - Unifier le comportement PRAGMA de toutes les connexions
//   (éviter que certains modules activent les clés étrangères et d'autres non)
// - Unifier busy_timeout pour réduire les erreurs busy en écriture concurrente
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// busy_timeout par défaut (millisecondes)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Applique les PRAGMA unifiés sur une connexion SQLite
///
/// Note:
/// - foreign_keys doit être activé sur chaque connexion
/// - busy_timeout doit être configuré sur chaque connexion
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Ouvre une connexion SQLite et applique la configuration unifiée
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Ouvre une connexion SQLite en mémoire (tests et démonstrations)
pub fn open_in_memory_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}
