//! Outbound activity construction.

use crate::core::models::Activity;

/// Builds the reply to `inbound` carrying `text`.
///
/// The reply keeps the inbound `conversation`, `channelId` and `serviceUrl`
/// so the connector delivers it to the same place, and swaps `from` with
/// `recipient`.
///
/// # Examples
///
/// ```
/// use teams2go::bot::response_builder::build_reply;
/// use teams2go::core::models::Activity;
///
/// let inbound = Activity {
///     activity_type: "message".into(),
///     service_url: Some("https://smba.trafficmanager.net/emea/".into()),
///     ..Default::default()
/// };
/// let reply = build_reply(&inbound, "Hi there!");
/// assert_eq!(reply.service_url, inbound.service_url);
/// assert_eq!(reply.text.as_deref(), Some("Hi there!"));
/// ```
#[must_use]
pub fn build_reply(inbound: &Activity, text: &str) -> Activity {
    Activity {
        activity_type: "message".to_string(),
        text: Some(text.to_string()),
        text_format: Some("markdown".to_string()),
        from: inbound.recipient.clone(),
        recipient: inbound.from.clone(),
        conversation: inbound.conversation.clone(),
        channel_id: inbound.channel_id.clone(),
        service_url: inbound.service_url.clone(),
        reply_to_id: inbound.id.clone(),
        locale: inbound.locale.clone(),
        ..Default::default()
    }
}
