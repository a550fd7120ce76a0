// ==========================================
// Système de prise de mandat - couche configuration
// ==========================================

pub mod config_manager;

pub use config_manager::{config_keys, ConfigManager};
