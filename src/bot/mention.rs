use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::models::Activity;

static LEADING_AT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^\s*<at>.*?</at>").expect("static regex compile"));

/// Removes the mention addressed to the bot from `text`.
///
/// Mention entities naming the recipient are removed wherever they occur.
/// Without such an entity a leading `<at>…</at>` tag or `@BotName` prefix is
/// dropped instead. Mentions of other users are left alone.
#[must_use]
pub fn strip_recipient_mention(activity: &Activity, text: &str) -> String {
    let recipient_id = activity.recipient_id().unwrap_or("");
    let mut cleaned = text.to_string();
    let mut stripped = false;

    for entity in &activity.entities {
        if !entity.entity_type.eq_ignore_ascii_case("mention") {
            continue;
        }
        let names_bot = entity
            .mentioned
            .as_ref()
            .is_some_and(|m| !recipient_id.is_empty() && m.id == recipient_id);
        if let (true, Some(token)) = (names_bot, entity.text.as_deref()) {
            if !token.is_empty() && cleaned.contains(token) {
                cleaned = cleaned.replacen(token, "", 1);
                stripped = true;
            }
        }
    }

    if stripped {
        return cleaned;
    }

    if LEADING_AT_TAG.is_match(&cleaned) {
        return LEADING_AT_TAG.replace(&cleaned, "").into_owned();
    }

    let bot_name = activity
        .recipient
        .as_ref()
        .and_then(|r| r.name.as_deref())
        .filter(|n| !n.is_empty());
    if let Some(name) = bot_name {
        let prefix = format!("@{name}");
        let trimmed = cleaned.trim_start();
        if trimmed.len() >= prefix.len()
            && trimmed.is_char_boundary(prefix.len())
            && trimmed[..prefix.len()].eq_ignore_ascii_case(&prefix)
        {
            let rest = &trimmed[prefix.len()..];
            // Only a whole name counts: `@Botanist` is not `@Bot`.
            if rest.chars().next().is_none_or(char::is_whitespace) {
                return rest.to_string();
            }
        }
    }

    cleaned
}
