// ==========================================
// Module d'internationalisation (i18n)
// ==========================================
// Utilise la bibliothèque rust-i18n
// Français canadien (défaut) et anglais
// ==========================================
// Note: la macro rust_i18n::i18n! est initialisée dans lib.rs
// ==========================================

/// Retourne la langue courante
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Définit la langue courante
///
/// # Paramètres
/// - locale: code de langue ("fr-CA" ou "en")
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Traduit un message (sans paramètres)
///
/// # Exemple
/// ```no_run
/// use prise_mandat::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Traduit un message (avec paramètres)
///
/// # Exemple
/// ```no_run
/// use prise_mandat::i18n::t_with_args;
/// let msg = t_with_args("lock.held_by", &[("holder", "Julie Tremblay")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
