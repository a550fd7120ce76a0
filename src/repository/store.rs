// ==========================================
// Système de prise de mandat - interface du magasin de documents
// ==========================================
// La persistance réelle (transport, moteur) est un collaborateur
// externe: le moteur ne consomme que cette interface étroite.
// ==========================================

use crate::repository::error::StoreResult;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// Collection - collections connues du moteur
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Brouillons de prise de mandat
    Draft,
    /// Dossiers ouverts
    Case,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Draft => "prise_mandat",
            Collection::Case => "dossier",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// RecordStore - interface get/list/create/update/delete
// ==========================================
// Les documents sont des objets JSON; `update` fusionne les champs
// fournis au premier niveau avec le document existant.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Liste tous les documents d'une collection
    async fn list(&self, collection: Collection) -> StoreResult<Vec<JsonValue>>;

    /// Retourne le document demandé (NotFound s'il n'existe pas)
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<JsonValue>;

    /// Crée un document; si `fields` contient un champ "id" il est utilisé,
    /// sinon un identifiant est généré. Retourne le document créé.
    async fn create(&self, collection: Collection, fields: JsonValue) -> StoreResult<JsonValue>;

    /// Fusionne `fields` (premier niveau) dans le document et retourne
    /// le document résultant
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: JsonValue,
    ) -> StoreResult<JsonValue>;

    /// Supprime le document (NotFound s'il n'existe pas)
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()>;
}
