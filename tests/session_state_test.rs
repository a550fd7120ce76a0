// ==========================================
// Tests de la session d'édition et de sa machine à états
// ==========================================
// Responsabilité: ouverture avec ou sans verrou, transitions du
// dialogue, rappel d'édition du client et fermeture propre
// ==========================================

#[path = "test_helpers.rs"]
mod test_helpers;

#[cfg(test)]
mod session_state_test {
    use prise_mandat::engine::{DialogState, DraftSession, EngineError};
    use prise_mandat::{Collection, RecordStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::test_helpers::{actor, create_test_store, sample_draft, seed_draft};

    const SHORT_DELAY: Duration = Duration::from_millis(25);

    #[tokio::test]
    async fn test_open_grants_lock_and_enters_editing() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let mut session = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();

        assert_eq!(session.state(), DialogState::Editing);
        assert!(!session.is_read_only());
        assert!(session.autosave().lock_held());

        session.close().await.unwrap();
        assert_eq!(session.state(), DialogState::Closed);

        // Le verrou persisté est libéré
        let doc = store.get(Collection::Draft, &draft.id).await.unwrap();
        assert!(doc["lock"].is_null());
    }

    #[tokio::test]
    async fn test_second_session_opens_read_only() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let bob = actor("u-bob", "Bob Lavoie");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let mut first = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();
        let mut second = DraftSession::open(store.clone(), bob, &draft.id)
            .await
            .unwrap();

        assert_eq!(second.state(), DialogState::LockedReadOnly);
        assert_eq!(second.read_only_holder(), Some("Alice Bergeron"));
        assert!(!second.autosave().lock_held());

        // Le bandeau lecture seule nomme le détenteur
        let banner = second.read_only_banner().unwrap();
        assert!(banner.contains("Alice Bergeron"));

        // La fermeture en lecture seule ne libère pas le verrou d'Alice
        second.close().await.unwrap();
        let doc = store.get(Collection::Draft, &draft.id).await.unwrap();
        assert_eq!(doc["lock"]["holder_id"], "u-alice");

        first.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_read_only_edits_are_never_persisted() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let bob = actor("u-bob", "Bob Lavoie");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let _first = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();
        let second = DraftSession::open_with_delay(store.clone(), bob, &draft.id, SHORT_DELAY)
            .await
            .unwrap();

        let mut form = draft.clone();
        form.client.company = "Gestion Lavoie".to_string();
        second.on_change(form);

        tokio::time::sleep(SHORT_DELAY * 8).await;
        let doc = store.get(Collection::Draft, &draft.id).await.unwrap();
        assert_eq!(doc["client"]["company"], "");
    }

    #[tokio::test]
    async fn test_lock_is_available_after_close() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let bob = actor("u-bob", "Bob Lavoie");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let mut first = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();
        first.close().await.unwrap();

        let session = DraftSession::open(store.clone(), bob, &draft.id)
            .await
            .unwrap();
        assert_eq!(session.state(), DialogState::Editing);
    }

    #[tokio::test]
    async fn test_open_case_from_read_only_is_an_invalid_transition() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let bob = actor("u-bob", "Bob Lavoie");
        let mut draft = sample_draft("arp-01", &alice);
        draft.case_number = Some("12".to_string());
        seed_draft(&store, &draft).await;

        let _first = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();
        let mut second = DraftSession::open(store.clone(), bob, &draft.id)
            .await
            .unwrap();

        let err = second.open_case(&draft).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidStateTransition { .. }));
        assert_eq!(second.state(), DialogState::LockedReadOnly);
    }

    #[tokio::test]
    async fn test_manual_save_is_refused_in_read_only() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let bob = actor("u-bob", "Bob Lavoie");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let _first = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();
        let second = DraftSession::open(store.clone(), bob, &draft.id)
            .await
            .unwrap();

        let mut form = draft.clone();
        form.client.company = "Gestion Lavoie".to_string();
        let err = second.save_now(form).await.unwrap_err();
        match err {
            EngineError::LockConflict { holder_name } => {
                assert_eq!(holder_name, "Alice Bergeron");
            }
            other => panic!("erreur inattendue: {other}"),
        }
    }

    #[tokio::test]
    async fn test_failed_opening_returns_to_editing() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let draft = sample_draft("arp-01", &alice); // sans numéro de dossier
        seed_draft(&store, &draft).await;

        let mut session = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();

        let err = session.open_case(&draft).await.unwrap_err();
        assert!(matches!(err, EngineError::MissingCaseNumber));
        assert_eq!(session.state(), DialogState::Editing);
    }

    #[tokio::test]
    async fn test_successful_opening_closes_the_session() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let mut draft = sample_draft("arp-01", &alice);
        draft.case_number = Some("12".to_string());
        seed_draft(&store, &draft).await;

        let mut session = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();

        let case = session.open_case(&draft).await.unwrap();
        assert_eq!(case.case_number, "12");
        assert_eq!(session.state(), DialogState::Closed);

        // Refermer une session déjà fermée est sans effet
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_legacy_import_seeds_the_target_mandate_line() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let mut session = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();

        let mut form = draft.clone();
        let record = session
            .import_legacy_file(&mut form, 0, b"LO;123456\nSU;;05;20230115\n")
            .unwrap();
        assert_eq!(record.lot_number, "123456");
        assert_eq!(session.state(), DialogState::Editing);

        // Le sous-formulaire de lot de la ligne visée est semé
        let lot = form.mandate_lines[0].lot.as_ref().unwrap();
        assert_eq!(lot.lot_number, "123456");
        assert_eq!(lot.bpd_date, "2023-01-15");

        // Une entrée illisible laisse la session en édition, sans fusion
        let err = session
            .import_legacy_file(&mut form, 0, &[0xff, 0xfe])
            .unwrap_err();
        assert!(matches!(err, EngineError::Import(_)));
        assert_eq!(session.state(), DialogState::Editing);
        assert_eq!(form.mandate_lines[0].lot.as_ref().unwrap().lot_number, "123456");

        // Ligne visée inexistante: erreur explicite, session toujours en édition
        let err = session
            .import_legacy_file(&mut form, 5, b"LO;789\n")
            .unwrap_err();
        assert!(matches!(err, EngineError::InternalError(_)));
        assert_eq!(session.state(), DialogState::Editing);
    }

    #[tokio::test]
    async fn test_comments_are_persisted_immediately() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let session = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();

        let mut form = draft.clone();
        session
            .add_comment(&mut form, "Client rappelé ce matin")
            .await
            .unwrap();
        session.add_comment(&mut form, "Plan reçu").await.unwrap();

        // Du plus récent au plus ancien, persisté sans attendre le débounce
        let doc = store.get(Collection::Draft, &draft.id).await.unwrap();
        let comments = doc["comments"].as_array().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0]["text"], "Plan reçu");
        assert_eq!(comments[0]["author_name"], "Alice Bergeron");
        assert_eq!(comments[1]["text"], "Client rappelé ce matin");
    }

    #[tokio::test]
    async fn test_comments_are_refused_in_read_only() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let bob = actor("u-bob", "Bob Lavoie");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let _first = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();
        let second = DraftSession::open(store.clone(), bob, &draft.id)
            .await
            .unwrap();

        let mut form = draft.clone();
        let err = second
            .add_comment(&mut form, "Tentative en lecture seule")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::LockConflict { .. }));

        let doc = store.get(Collection::Draft, &draft.id).await.unwrap();
        assert!(doc["comments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_client_edit_callback_is_invoked() {
        let store = create_test_store();
        let alice = actor("u-alice", "Alice Bergeron");
        let draft = sample_draft("arp-01", &alice);
        seed_draft(&store, &draft).await;

        let mut session = DraftSession::open(store.clone(), alice, &draft.id)
            .await
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        session.set_client_edit_callback(move |client| {
            assert_eq!(client.last_name, "Gagnon");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        session.request_edit_client(&draft.client);
        session.request_edit_client(&draft.client);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
