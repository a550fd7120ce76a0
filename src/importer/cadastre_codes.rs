// ==========================================
// Système de prise de mandat - table des codes de cadastre
// ==========================================
// Table statique: code numérique du fichier d'échange -> désignation.
// Donnée pure, consommée par le parseur D01; aucune synchronisation requise.
// ==========================================

/// Désignation par défaut lorsque le code est vide ou inconnu
pub const DEFAULT_CADASTRE: &str = "Cadastre du Québec";

// Codes observés dans les fichiers d'échange cadastraux (.d01).
// La table n'est pas exhaustive: un code absent est rendu tel quel.
const CADASTRE_CODES: &[(&str, &str)] = &[
    ("010010", "Paroisse de Havre-aux-Maisons"),
    ("010020", "Paroisse de L'Étang-du-Nord"),
    ("010030", "Île-du-Cap-aux-Meules"),
    ("010040", "Île-de-la-Grande-Entrée"),
    ("010050", "Île-du-Havre-Aubert"),
    ("020010", "Paroisse de Percé"),
    ("020020", "Canton de Gaspé-Baie-Sud"),
    ("020030", "Village de Grande-Rivière"),
    ("030010", "Paroisse de Saint-Germain-de-Rimouski"),
    ("030020", "Paroisse de Sainte-Luce"),
    ("030030", "Canton de Macpès"),
    ("040010", "Paroisse de Saint-Arsène"),
    ("040020", "Paroisse de Cacouna"),
    ("040030", "Ville de Rivière-du-Loup"),
    ("050010", "Paroisse de Saint-Roch-des-Aulnaies"),
    ("050020", "Paroisse de Sainte-Anne-de-la-Pocatière"),
    ("060010", "Paroisse de Saint-Joseph-de-Lévis"),
    ("060020", "Village de Saint-Romuald-d'Etchemin"),
    ("070010", "Canton de Buckingham"),
    ("070020", "Village de Pointe-Gatineau"),
    ("080010", "Canton de Rouyn"),
    ("080020", "Canton de Figuery"),
    ("090010", "Canton de Chicoutimi"),
    ("090020", "Paroisse de Sainte-Anne-de-Chicoutimi"),
];

// ==========================================
// CadastreCodeTable - consultation des codes
// ==========================================
pub struct CadastreCodeTable;

impl CadastreCodeTable {
    /// Retourne la désignation du code, si connue
    pub fn lookup(code: &str) -> Option<&'static str> {
        let code = code.trim();
        CADASTRE_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }

    /// Résout un code en désignation affichable.
    /// Repli: le code brut tel quel, puis la désignation par défaut
    /// si le code est vide.
    pub fn resolve(code: &str) -> String {
        Self::resolve_with(code, DEFAULT_CADASTRE)
    }

    /// Variante de `resolve` avec désignation par défaut explicite
    /// (configurable via la table config_kv)
    pub fn resolve_with(code: &str, default: &str) -> String {
        let code = code.trim();
        if code.is_empty() {
            return default.to_string();
        }
        match Self::lookup(code) {
            Some(name) => name.to_string(),
            None => code.to_string(),
        }
    }
}
