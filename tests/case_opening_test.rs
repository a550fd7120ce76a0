// ==========================================
// Tests de l'ouverture de dossier
// ==========================================
// Responsabilité: validation de soumission, garde d'unicité du numéro
// et création du dossier à partir du brouillon
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod case_opening_test {
    use prise_mandat::engine::{CaseOpeningEngine, EngineError};
    use prise_mandat::repository::StoreError;
    use prise_mandat::{Collection, RecordStore};
    use serde_json::json;

    use crate::test_helpers::{actor, create_test_store, sample_draft, seed_draft};

    #[tokio::test]
    async fn test_open_case_creates_dossier_and_consumes_draft() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let mut draft = sample_draft("arp-01", &alice);
        draft.case_number = Some("12".to_string());
        seed_draft(&store, &draft).await;

        let engine = CaseOpeningEngine::new(store.clone());
        let case = engine.open_case(&draft, &alice).await.unwrap();

        assert_eq!(case.case_number, "12");
        assert_eq!(case.surveyor, "arp-01");
        assert_eq!(case.opened_by, "u-alice");
        assert_eq!(case.history[0].action, "Ouverture du dossier");
        assert_eq!(case.history[0].details, "Dossier 12");

        // Le dossier est persisté, le brouillon n'existe plus
        let doc = store.get(Collection::Case, &case.id).await.unwrap();
        assert_eq!(doc["case_number"], "12");
        let err = store.get(Collection::Draft, &draft.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_assignee_blocks_submission() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let mut draft = sample_draft("arp-01", &alice);
        draft.case_number = Some("12".to_string());
        draft.mandate_lines[0].assignee = None;
        seed_draft(&store, &draft).await;

        let engine = CaseOpeningEngine::new(store.clone());
        let err = engine.open_case(&draft, &alice).await.unwrap_err();
        match err {
            EngineError::MissingRequiredField { field, line } => {
                assert_eq!(field, "responsable");
                assert_eq!(line, Some(0));
            }
            other => panic!("erreur inattendue: {other}"),
        }

        // Rien n'a été créé ni supprimé
        assert!(store.list(Collection::Case).await.unwrap().is_empty());
        assert!(store.get(Collection::Draft, &draft.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_number_is_rejected() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");

        // Un dossier de arp-01 porte déjà le numéro 12
        store
            .create(
                Collection::Case,
                json!({"id": "c1", "surveyor": "arp-01", "case_number": "12"}),
            )
            .await
            .unwrap();

        let mut draft = sample_draft("arp-01", &alice);
        draft.case_number = Some("12".to_string());
        seed_draft(&store, &draft).await;

        let engine = CaseOpeningEngine::new(store.clone());
        let err = engine.open_case(&draft, &alice).await.unwrap_err();
        assert!(matches!(err, EngineError::DuplicateNumber { .. }));

        // Le brouillon reste intact pour correction
        assert!(store.get(Collection::Draft, &draft.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_same_number_for_another_surveyor_is_accepted() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");

        store
            .create(
                Collection::Case,
                json!({"id": "c1", "surveyor": "arp-02", "case_number": "12"}),
            )
            .await
            .unwrap();

        let mut draft = sample_draft("arp-01", &alice);
        draft.case_number = Some("12".to_string());
        seed_draft(&store, &draft).await;

        let engine = CaseOpeningEngine::new(store.clone());
        let case = engine.open_case(&draft, &alice).await.unwrap();
        assert_eq!(case.case_number, "12");
    }
}
