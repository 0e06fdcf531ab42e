// src/formatting.rs

/// Wraps a user or group ID in Slack's at-mention markup.
pub fn mention_token(id: &str) -> String {
    format!("<@{}>", id)
}

/// Renders each mention followed by a single space, in order.
pub fn render_mentions(mentions: &[String]) -> String {
    mentions
        .iter()
        .map(|id| format!("{} ", mention_token(id)))
        .collect()
}

/// Builds the posted text: the mention prefix immediately followed by the body.
pub fn render_text(mentions: &[String], message: &str) -> String {
    let mut text = render_mentions(mentions);
    text.push_str(message);
    text
}
