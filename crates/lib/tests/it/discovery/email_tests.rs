use user_discovery::{
    CancelToken, DiscoveryMode, UserDiscoveryOperation,
    discovery::{Completion, OperationState},
    transport::{DiscoveryRequest, DiscoveryResponse},
};

use crate::helpers::{CallbackLog, MockTransport, response_with, sample_directory, user};

#[tokio::test]
async fn test_all_emails_matched() {
    let transport = MockTransport::replying(response_with(vec![
        user("u2", "b@x.com"),
        user("u1", "a@x.com"),
    ]));

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com", "b@x.com"]);
    assert_eq!(op.mode(), DiscoveryMode::ByEmail);
    let log = CallbackLog::default();
    log.attach(&mut op);

    let outcome = op.execute(&transport, &CancelToken::new()).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.users().len(), 2);
    // Per-user notifications follow response order, not request order
    assert_eq!(log.user_ids(), vec!["u2", "u1"]);

    let (user_ids, error) = log.completion();
    assert_eq!(user_ids, vec!["u2", "u1"]);
    assert!(error.is_none());
    log.assert_completion_last();
    assert_eq!(op.state(), OperationState::Completed(Completion::Success));
}

#[tokio::test]
async fn test_request_carries_emails_in_order() {
    let transport = MockTransport::replying(DiscoveryResponse::default());
    let mut op = UserDiscoveryOperation::by_emails(["z@x.com", "a@x.com"]);

    op.execute(&transport, &CancelToken::new()).await;

    assert_eq!(
        transport.last_request(),
        Some(DiscoveryRequest::ByEmail {
            emails: vec!["z@x.com".to_string(), "a@x.com".to_string()],
            count: false,
        })
    );
}

#[tokio::test]
async fn test_partial_failure_derived_from_users() {
    let transport = MockTransport::replying(response_with(vec![user("u1", "a@x.com")]));

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com", "missing@x.com"]);
    let log = CallbackLog::default();
    log.attach(&mut op);

    let outcome = op.execute(&transport, &CancelToken::new()).await;

    assert!(outcome.is_partial_failure());
    assert_eq!(outcome.users().len(), 1);
    assert_eq!(
        outcome.unmatched_emails(),
        Some(&["missing@x.com".to_string()][..])
    );
    assert_eq!(log.user_ids(), vec!["u1"]);

    let (user_ids, error) = log.completion();
    assert_eq!(user_ids, vec!["u1"]);
    let error = error.expect("partial failure should be reported");
    assert!(error.partial);
    assert!(!error.transport);
    assert_eq!(error.unmatched, Some(vec!["missing@x.com".to_string()]));
    assert_eq!(
        op.state(),
        OperationState::Completed(Completion::PartialFailure)
    );
}

#[tokio::test]
async fn test_partial_failure_from_backend_list() {
    // The backend hides emails of matched users but says which ones failed
    let transport = MockTransport::replying(DiscoveryResponse {
        users: vec![user("u1", "a@x.com").with_email(""), user("u2", "b@x.com")],
        unmatched_emails: Some(vec!["c@x.com".to_string()]),
        total_count: None,
    });

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com", "b@x.com", "c@x.com"]);
    let outcome = op.execute(&transport, &CancelToken::new()).await;

    assert_eq!(outcome.users().len(), 2);
    assert_eq!(outcome.unmatched_emails(), Some(&["c@x.com".to_string()][..]));
}

#[tokio::test]
async fn test_no_email_matched() {
    let transport = MockTransport::replying(DiscoveryResponse::default());

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com", "b@x.com"]);
    let log = CallbackLog::default();
    log.attach(&mut op);

    let outcome = op.execute(&transport, &CancelToken::new()).await;

    assert!(outcome.is_partial_failure());
    assert!(outcome.users().is_empty());
    assert!(log.user_ids().is_empty());
    let (_, error) = log.completion();
    assert_eq!(
        error.and_then(|e| e.unmatched),
        Some(vec!["a@x.com".to_string(), "b@x.com".to_string()])
    );
}

#[tokio::test]
async fn test_empty_email_list_succeeds() {
    let transport = MockTransport::replying(DiscoveryResponse::default());

    let mut op = UserDiscoveryOperation::by_emails(Vec::<String>::new());
    let log = CallbackLog::default();
    log.attach(&mut op);

    let outcome = op.execute(&transport, &CancelToken::new()).await;

    assert!(outcome.is_success());
    assert!(outcome.users().is_empty());
    assert_eq!(transport.calls(), 1);
    let (user_ids, error) = log.completion();
    assert!(user_ids.is_empty());
    assert!(error.is_none());
}

#[tokio::test]
async fn test_blank_email_is_configuration_error() {
    let transport = MockTransport::replying(DiscoveryResponse::default());

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com", ""]);
    let log = CallbackLog::default();
    log.attach(&mut op);

    let outcome = op.execute(&transport, &CancelToken::new()).await;

    assert!(outcome.error().is_some_and(|e| e.is_configuration_error()));
    assert_eq!(transport.calls(), 0);
    let (user_ids, error) = log.completion();
    assert!(user_ids.is_empty());
    assert!(error.is_some_and(|e| e.configuration));
    assert_eq!(
        op.state(),
        OperationState::Completed(Completion::ConfigurationError)
    );
}

#[tokio::test]
async fn test_overall_count_reported_when_requested() {
    let transport = MockTransport::replying(DiscoveryResponse {
        users: vec![user("u1", "a@x.com")],
        unmatched_emails: None,
        total_count: Some(42),
    });

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com"]);
    op.set_requires_overall_count(true).unwrap();
    assert_eq!(op.overall_count(), None);

    op.execute(&transport, &CancelToken::new()).await;

    assert_eq!(op.overall_count(), Some(42));
    assert!(transport.last_request().unwrap().requests_count());
}

#[tokio::test]
async fn test_overall_count_ignored_when_not_requested() {
    let transport = MockTransport::replying(DiscoveryResponse {
        users: vec![user("u1", "a@x.com")],
        unmatched_emails: None,
        total_count: Some(42),
    });

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com"]);
    op.execute(&transport, &CancelToken::new()).await;

    assert_eq!(op.overall_count(), None);
}

#[tokio::test]
async fn test_user_stream_receives_users_then_closes() {
    let transport = MockTransport::replying(response_with(vec![
        user("u1", "a@x.com"),
        user("u2", "b@x.com"),
    ]));

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com", "b@x.com"]);
    let mut stream = op.user_stream().unwrap();

    op.execute(&transport, &CancelToken::new()).await;

    assert_eq!(stream.recv().await.map(|u| u.id), Some("u1".to_string()));
    assert_eq!(stream.recv().await.map(|u| u.id), Some("u2".to_string()));
    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn test_email_lookup_against_directory() {
    let directory = sample_directory().await;

    let mut op = UserDiscoveryOperation::by_emails([
        "Carol@Example.com",
        "nobody@example.com",
        "alice@example.com",
    ]);
    let log = CallbackLog::default();
    log.attach(&mut op);

    let outcome = op.execute(&directory, &CancelToken::new()).await;

    assert_eq!(log.user_ids(), vec!["carol", "alice"]);
    assert_eq!(
        outcome.unmatched_emails(),
        Some(&["nobody@example.com".to_string()][..])
    );
}

#[tokio::test]
async fn test_into_result_rejects_partial_failure() {
    let transport = MockTransport::replying(response_with(vec![user("u1", "a@x.com")]));

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com", "b@x.com"]);
    let err = op
        .execute(&transport, &CancelToken::new())
        .await
        .into_result()
        .unwrap_err();

    assert!(err.is_partial_failure());
    assert_eq!(err.module(), "discovery");
}
