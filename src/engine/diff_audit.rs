// ==========================================
// Système de prise de mandat - générateur d'audit par diff
// ==========================================
// Compare l'instantané persisté précédent à l'état courant du
// formulaire et produit la liste ordonnée des entrées d'historique.
// Fonction pure: aucune entrée/sortie, aucun effet de bord;
// la persistance appartient à l'appelant.
// ==========================================

use crate::domain::draft::DraftSnapshot;
use crate::domain::history::HistoryEntry;
use crate::domain::types::Actor;
use chrono::NaiveDate;

// Libellés des champs suivis (figurent tels quels dans l'historique)
const LABEL_STATUS: &str = "Statut";
const LABEL_SURVEYOR: &str = "Arpenteur";
const LABEL_URGENCY: &str = "Urgence";
const LABEL_CLIENT: &str = "Client";
const LABEL_ADDRESS: &str = "Adresse des travaux";
const LABEL_MANDATES: &str = "Mandats";
const LABEL_PRICE: &str = "Prix estimé";
const LABEL_REBATE: &str = "Rabais";
const LABEL_DELIVERY: &str = "Date de livraison";
const LABEL_SIGNATURE: &str = "Date de signature";
const LABEL_START: &str = "Date de début";

// ==========================================
// DiffAuditBuilder
// ==========================================
// Garanties:
// - build_entries(s, s) est toujours vide (idempotence)
// - l'ordre d'émission suit la liste de priorité fixe des champs,
//   jamais l'ordre des éditions dans le formulaire
pub struct DiffAuditBuilder;

impl DiffAuditBuilder {
    pub fn build_entries(
        previous: &DraftSnapshot,
        current: &DraftSnapshot,
        actor: &Actor,
    ) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();

        // Ordre de priorité fixe: statut, arpenteur, urgence, client,
        // adresse, mandats, prix, rabais, dates
        if previous.status != current.status {
            push(
                &mut entries,
                LABEL_STATUS,
                previous.status.label(),
                current.status.label(),
                actor,
            );
        }
        if previous.surveyor != current.surveyor {
            push(
                &mut entries,
                LABEL_SURVEYOR,
                &previous.surveyor,
                &current.surveyor,
                actor,
            );
        }
        if previous.urgency != current.urgency {
            push(
                &mut entries,
                LABEL_URGENCY,
                previous.urgency.label(),
                current.urgency.label(),
                actor,
            );
        }
        if previous.client_name != current.client_name {
            push(
                &mut entries,
                LABEL_CLIENT,
                &previous.client_name,
                &current.client_name,
                actor,
            );
        }
        if previous.work_address != current.work_address {
            push(
                &mut entries,
                LABEL_ADDRESS,
                &previous.work_address,
                &current.work_address,
                actor,
            );
        }
        if previous.mandate_types != current.mandate_types {
            push(
                &mut entries,
                LABEL_MANDATES,
                &previous.mandate_types,
                &current.mandate_types,
                actor,
            );
        }
        if previous.estimated_price_total != current.estimated_price_total {
            push(
                &mut entries,
                LABEL_PRICE,
                &render_money(previous.estimated_price_total),
                &render_money(current.estimated_price_total),
                actor,
            );
        }
        if previous.rebate_total != current.rebate_total {
            push(
                &mut entries,
                LABEL_REBATE,
                &render_money(previous.rebate_total),
                &render_money(current.rebate_total),
                actor,
            );
        }
        if previous.delivery_date != current.delivery_date {
            push(
                &mut entries,
                LABEL_DELIVERY,
                &render_date(previous.delivery_date),
                &render_date(current.delivery_date),
                actor,
            );
        }
        if previous.signature_date != current.signature_date {
            push(
                &mut entries,
                LABEL_SIGNATURE,
                &render_date(previous.signature_date),
                &render_date(current.signature_date),
                actor,
            );
        }
        if previous.start_date != current.start_date {
            push(
                &mut entries,
                LABEL_START,
                &render_date(previous.start_date),
                &render_date(current.start_date),
                actor,
            );
        }

        entries
    }
}

/// Ajoute une entrée "<ancien> → <nouveau>", ou "Ajout: <nouveau>"
/// quand l'ancienne valeur est vide
fn push(entries: &mut Vec<HistoryEntry>, label: &str, old: &str, new: &str, actor: &Actor) {
    let details = if old.is_empty() {
        format!("Ajout: {}", new)
    } else {
        format!("{} → {}", old, new)
    };
    entries.push(HistoryEntry::new(label, details, actor));
}

/// Montant rendu à deux décimales; zéro est rendu vide
/// (un total nul est traité comme une valeur absente)
fn render_money(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        format!("{:.2} $", value)
    }
}

fn render_date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
