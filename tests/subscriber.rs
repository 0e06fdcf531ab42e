//! Integration tests for the subscriber handler's batch semantics.

use snsrelay::config::{Config, DeliveryMode};
use snsrelay::subscriber::{BatchSummary, SubscriberHandler, SubscriberMode, SubscriberSettings};
use snsrelay::test_utils::FakeChatPoster;
use snsrelay::{NotificationMessage, RelayError};

fn payload(channel: &str, message: &str, mentions: &[&str]) -> String {
    NotificationMessage::new(channel, message)
        .with_mentions(mentions.iter().copied())
        .to_payload()
        .unwrap()
}

fn structured_handler() -> (SubscriberHandler<FakeChatPoster>, FakeChatPoster) {
    let chat = FakeChatPoster::new();
    (
        SubscriberHandler::new(SubscriberMode::Structured, chat.clone()),
        chat,
    )
}

#[tokio::test]
async fn test_mentions_are_rendered_before_body() {
    let (handler, chat) = structured_handler();
    let record = payload("C1", "hello", &["U1", "U2"]);

    let summary = handler.handle_payloads([record.as_str()]).await.unwrap();

    assert_eq!(summary, BatchSummary { posted: 1 });
    assert_eq!(
        chat.posted(),
        vec![("C1".to_string(), "<@U1> <@U2> hello".to_string())]
    );
}

#[tokio::test]
async fn test_no_mentions_posts_body_only() {
    let (handler, chat) = structured_handler();
    let record = payload("C1", "hello", &[]);

    handler.handle_payloads([record.as_str()]).await.unwrap();

    assert_eq!(chat.posted(), vec![("C1".to_string(), "hello".to_string())]);
}

#[tokio::test]
async fn test_missing_channel_fails_validation_without_posting() {
    let (handler, chat) = structured_handler();

    let absent = handler
        .handle_payloads([r#"{"message":"hello"}"#])
        .await;
    let empty = handler
        .handle_payloads([r#"{"channel_id":"","message":"hello"}"#])
        .await;

    assert!(matches!(absent, Err(RelayError::Validation(_))));
    assert!(matches!(empty, Err(RelayError::Validation(_))));
    assert!(chat.attempts().is_empty());
}

#[tokio::test]
async fn test_malformed_payload_fails_decode_without_posting() {
    let (handler, chat) = structured_handler();

    let result = handler.handle_payloads(["{not json"]).await;

    assert!(matches!(result, Err(RelayError::Decode(_))));
    assert!(chat.attempts().is_empty());
}

#[tokio::test]
async fn test_delivery_failure_aborts_remaining_records() {
    let (handler, chat) = structured_handler();
    chat.fail_on_attempt(1);
    let records = [
        payload("C1", "first", &[]),
        payload("C2", "second", &[]),
        payload("C3", "third", &[]),
    ];

    let result = handler
        .handle_payloads(records.iter().map(String::as_str))
        .await;

    match result {
        Err(RelayError::Delivery { channel, .. }) => assert_eq!(channel, "C2"),
        other => panic!("expected delivery error, got {other:?}"),
    }
    assert_eq!(chat.posted(), vec![("C1".to_string(), "first".to_string())]);
    // The third record is never attempted.
    assert_eq!(chat.attempts().len(), 2);
}

#[tokio::test]
async fn test_decode_failure_mid_batch_stops_later_records() {
    let (handler, chat) = structured_handler();
    let first = payload("C1", "first", &[]);
    let third = payload("C3", "third", &[]);

    let result = handler
        .handle_payloads([first.as_str(), "garbage", third.as_str()])
        .await;

    assert!(matches!(result, Err(RelayError::Decode(_))));
    assert_eq!(chat.attempts().len(), 1);
}

#[tokio::test]
async fn test_records_are_posted_in_delivery_order() {
    let (handler, chat) = structured_handler();
    let records: Vec<String> = (0..5)
        .map(|i| payload(&format!("C{i}"), &format!("msg {i}"), &[]))
        .collect();

    let summary = handler
        .handle_payloads(records.iter().map(String::as_str))
        .await
        .unwrap();

    assert_eq!(summary.posted, 5);
    let channels: Vec<String> = chat.posted().into_iter().map(|(c, _)| c).collect();
    assert_eq!(channels, vec!["C0", "C1", "C2", "C3", "C4"]);
}

#[tokio::test]
async fn test_empty_batch_succeeds() {
    let (handler, chat) = structured_handler();

    let summary = handler.handle_payloads(std::iter::empty()).await.unwrap();

    assert_eq!(summary.posted, 0);
    assert!(chat.attempts().is_empty());
}

#[tokio::test]
async fn test_passthrough_posts_raw_text_to_fallback_channel() {
    let chat = FakeChatPoster::new();
    let handler = SubscriberHandler::new(
        SubscriberMode::Passthrough {
            channel_id: "CFALLBACK".to_string(),
        },
        chat.clone(),
    );
    let structured = payload("C1", "hello", &["U1"]);

    handler
        .handle_payloads(["disk almost full", structured.as_str()])
        .await
        .unwrap();

    assert_eq!(
        chat.posted(),
        vec![
            ("CFALLBACK".to_string(), "disk almost full".to_string()),
            ("CFALLBACK".to_string(), structured.clone()),
        ]
    );
}

#[tokio::test]
async fn test_passthrough_rejects_empty_payload() {
    let chat = FakeChatPoster::new();
    let handler = SubscriberHandler::new(
        SubscriberMode::Passthrough {
            channel_id: "CFALLBACK".to_string(),
        },
        chat.clone(),
    );

    let result = handler.handle_payloads([""]).await;

    assert!(matches!(result, Err(RelayError::Validation(_))));
    assert!(chat.attempts().is_empty());
}

#[test]
fn test_missing_credential_fails_before_handler_exists() {
    let mut config = Config::default();
    config.subscriber.mode = DeliveryMode::Passthrough;
    config.subscriber.fallback_channel_id = Some("C1".to_string());

    let result = SubscriberSettings::from_config(&config);

    assert!(matches!(result, Err(RelayError::Configuration(_))));
}
