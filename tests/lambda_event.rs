//! Integration tests for handling a full SNS-triggered Lambda event.

use aws_lambda_events::event::sns::SnsEvent;
use serde_json::json;
use snsrelay::subscriber::{SubscriberHandler, SubscriberMode};
use snsrelay::test_utils::FakeChatPoster;

fn sns_record(message: &str) -> serde_json::Value {
    json!({
        "EventSource": "aws:sns",
        "EventVersion": "1.0",
        "EventSubscriptionArn": "arn:aws:sns:us-east-1:123456789012:relay:2bcfbf39-05c3-41de-beaa-fcfcc21c8f55",
        "Sns": {
            "Type": "Notification",
            "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
            "TopicArn": "arn:aws:sns:us-east-1:123456789012:relay",
            "Subject": null,
            "Message": message,
            "Timestamp": "2024-01-01T12:00:00.000Z",
            "SignatureVersion": "1",
            "Signature": "EXAMPLE",
            "SigningCertUrl": "https://sns.us-east-1.amazonaws.com/SimpleNotificationService.pem",
            "UnsubscribeUrl": "https://sns.us-east-1.amazonaws.com/?Action=Unsubscribe",
            "MessageAttributes": {}
        }
    })
}

fn sns_event(messages: &[&str]) -> SnsEvent {
    let records: Vec<_> = messages.iter().map(|m| sns_record(m)).collect();
    serde_json::from_value(json!({ "Records": records })).unwrap()
}

#[tokio::test]
async fn test_event_records_are_relayed() {
    let chat = FakeChatPoster::new();
    let handler = SubscriberHandler::new(SubscriberMode::Structured, chat.clone());
    let event = sns_event(&[
        r#"{"channel_id":"CXXXXXXXXX","message":"This is a notification with a mention.","mentions":["U12345678","U87654321"]}"#,
    ]);

    let summary = handler.handle_event(&event).await.unwrap();

    assert_eq!(summary.posted, 1);
    assert_eq!(
        chat.posted(),
        vec![(
            "CXXXXXXXXX".to_string(),
            "<@U12345678> <@U87654321> This is a notification with a mention.".to_string()
        )]
    );
}

#[tokio::test]
async fn test_event_with_bad_record_stops_at_it() {
    let chat = FakeChatPoster::new();
    let handler = SubscriberHandler::new(SubscriberMode::Structured, chat.clone());
    let event = sns_event(&[
        r#"{"channel_id":"C1","message":"ok"}"#,
        r#"{"channel_id":"C2"}"#,
        r#"{"channel_id":"C3","message":"never"}"#,
    ]);

    let result = handler.handle_event(&event).await;

    assert!(result.is_err());
    assert_eq!(chat.attempts().len(), 1);
}
