//! Chat delivery backends.
//!
//! The subscriber only depends on the [`ChatPoster`](crate::core::ChatPoster)
//! trait; this module holds the concrete Slack implementation.
pub mod slack;

pub use slack::SlackClient;
