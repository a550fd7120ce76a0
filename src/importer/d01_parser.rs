// ==========================================
// Système de prise de mandat - parseur de fichier D01
// ==========================================
// Format d'échange cadastral hérité (fournisseur externe):
// texte, un enregistrement par ligne, champs séparés par ";",
// étiquette de deux lettres en tête de ligne (LO / SU / CO).
// ==========================================

use crate::domain::lot::{ConcordanceRecord, LotOperationRecord};
use crate::importer::cadastre_codes::{CadastreCodeTable, DEFAULT_CADASTRE};
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

/// Type d'opération produit par l'import (constante du format)
pub const OPERATION_TYPE_REMPLACEMENT: &str = "Remplacement";

// ==========================================
// D01Parser
// ==========================================
// Règles:
// - première ligne LO: champ 1 = numéro de lot
// - première ligne SU: champ 2 = circonscription foncière,
//   champ 3 = date AAAAMMJJ (convertie en AAAA-MM-JJ)
// - lignes CO strictement entre la première et la deuxième ligne SU:
//   concordances antérieures
// Les lignes malformées sont ignorées plutôt que de faire échouer l'import;
// seul un flux d'octets illisible est une erreur bloquante.
pub struct D01Parser {
    /// Désignation de cadastre par défaut (configurable via config_kv)
    default_cadastre: String,
}

impl D01Parser {
    pub fn new() -> Self {
        Self {
            default_cadastre: DEFAULT_CADASTRE.to_string(),
        }
    }

    /// Parseur avec désignation de cadastre par défaut explicite
    pub fn with_default_cadastre(default_cadastre: impl Into<String>) -> Self {
        Self {
            default_cadastre: default_cadastre.into(),
        }
    }

    /// Analyse le contenu d'un fichier D01
    pub fn parse(&self, bytes: &[u8]) -> ImportResult<LotOperationRecord> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ImportError::UnreadableInput(e.to_string()))?;

        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true) // les lignes n'ont pas toutes la même arité
            .quoting(false)
            .from_reader(text.as_bytes());

        let mut record = LotOperationRecord {
            operation_type: OPERATION_TYPE_REMPLACEMENT.to_string(),
            ..LotOperationRecord::default()
        };

        let mut su_seen = 0usize;
        let mut lo_seen = false;

        for row in reader.records() {
            let row = match row {
                Ok(r) => r,
                // Ligne malformée: ignorée, le reste du fichier est traité
                Err(e) => {
                    tracing::debug!("ligne D01 ignorée: {}", e);
                    continue;
                }
            };

            let tag = row.get(0).map(str::trim).unwrap_or("");
            match tag {
                "LO" if !lo_seen => {
                    lo_seen = true;
                    record.lot_number = field(&row, 1);
                }
                "SU" => {
                    su_seen += 1;
                    if su_seen == 1 {
                        record.land_registry_district = field(&row, 2);
                        record.bpd_date = convert_bpd_date(&field(&row, 3));
                    }
                }
                // Concordances: uniquement entre la première et la deuxième SU
                "CO" if su_seen == 1 => {
                    record.concordances.push(parse_concordance(
                        &row,
                        &record.land_registry_district,
                        &self.default_cadastre,
                    ));
                }
                _ => {}
            }
        }

        // Comportement conservé du logiciel remplacé: le cadastre du lot est
        // toujours forcé à la désignation par défaut, même lorsque les
        // concordances en résolvent un autre.
        record.cadastre = self.default_cadastre.clone();

        Ok(record)
    }

    /// Analyse un fichier D01 sur disque
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<LotOperationRecord> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "d01" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let bytes = std::fs::read(path)?;
        self.parse(&bytes)
    }
}

impl Default for D01Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Champ à l'index donné, vide si absent
fn field(row: &StringRecord, index: usize) -> String {
    row.get(index).map(str::trim).unwrap_or("").to_string()
}

/// Convertit une date AAAAMMJJ (8 chiffres) en AAAA-MM-JJ.
/// Toute autre forme est retournée telle quelle.
fn convert_bpd_date(raw: &str) -> String {
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[0..4], &raw[4..6], &raw[6..8])
    } else {
        raw.to_string()
    }
}

/// Réécrit un code de rang "R<chiffres>" en "Rang <chiffres>"
/// (zéros de tête retirés). Les autres formes passent telles quelles.
fn rewrite_rang(raw: &str) -> String {
    let rest = match raw.strip_prefix('R') {
        Some(rest) if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) => rest,
        _ => return raw.to_string(),
    };
    let digits = rest.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    format!("Rang {}", digits)
}

/// Construit une concordance à partir d'une ligne CO
fn parse_concordance(row: &StringRecord, district: &str, default_cadastre: &str) -> ConcordanceRecord {
    ConcordanceRecord {
        land_registry_district: district.to_string(),
        cadastre: CadastreCodeTable::resolve_with(&field(row, 1), default_cadastre),
        rang: rewrite_rang(&field(row, 2)),
        lot_number: field(row, 3),
        is_partial: field(row, 4) == "O",
    }
}
