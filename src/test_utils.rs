use crate::{
    core::{ChatPoster, TopicPublisher},
    error::{RelayError, Result},
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Fake chat service for testing
///
/// Records every attempted post, including the ones it was told to fail.
#[derive(Clone, Default)]
pub struct FakeChatPoster {
    attempts: Arc<Mutex<Vec<(String, String)>>>,
    // Zero-based indices of the attempts that should fail.
    failing_attempts: Arc<Mutex<HashSet<usize>>>,
}

impl FakeChatPoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th call (zero-based) to `post_message` fail
    pub fn fail_on_attempt(&self, n: usize) {
        self.failing_attempts.lock().unwrap().insert(n);
    }

    /// Every `(channel, text)` pair that was attempted, in order
    pub fn attempts(&self) -> Vec<(String, String)> {
        self.attempts.lock().unwrap().clone()
    }

    /// Only the posts that succeeded
    pub fn posted(&self) -> Vec<(String, String)> {
        let failing = self.failing_attempts.lock().unwrap();
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(i, _)| !failing.contains(i))
            .map(|(_, post)| post.clone())
            .collect()
    }
}

#[async_trait]
impl ChatPoster for FakeChatPoster {
    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push((channel.to_string(), text.to_string()));
            attempts.len() - 1
        };

        if self.failing_attempts.lock().unwrap().contains(&attempt) {
            return Err(RelayError::Delivery {
                channel: channel.to_string(),
                reason: "fake failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Fake topic for testing the publisher
#[derive(Clone, Default)]
pub struct FakeTopicPublisher {
    published: Arc<Mutex<Vec<(String, String)>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl FakeTopicPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent publish fail with `reason`
    pub fn fail_with(&self, reason: &str) {
        *self.fail_with.lock().unwrap() = Some(reason.to_string());
    }

    /// Every `(topic, payload)` pair accepted so far
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl TopicPublisher for FakeTopicPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<()> {
        if let Some(reason) = self.fail_with.lock().unwrap().clone() {
            return Err(RelayError::Transport {
                topic: topic.to_string(),
                reason,
            });
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}
