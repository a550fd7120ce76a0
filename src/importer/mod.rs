// ==========================================
// Système de prise de mandat - couche import
// ==========================================
// Ingestion du fichier d'échange cadastral hérité (.d01)
// dans le sous-formulaire de lot du brouillon
// ==========================================

pub mod cadastre_codes;
pub mod d01_parser;
pub mod error;

pub use cadastre_codes::{CadastreCodeTable, DEFAULT_CADASTRE};
pub use d01_parser::{D01Parser, OPERATION_TYPE_REMPLACEMENT};
pub use error::{ImportError, ImportResult};
