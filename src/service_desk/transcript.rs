use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::core::models::CaseMessage;

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Flattens selected messages into a case description.
///
/// Messages are ordered oldest first; ones with unreadable timestamps follow
/// in the order given. Each renders as `[YYYY-MM-DD HH:MM] sender: content`
/// in `tz`, separated by a blank line.
#[must_use]
pub fn format_transcript(messages: &[CaseMessage], tz: Tz) -> String {
    let mut ordered: Vec<(Option<DateTime<Utc>>, &CaseMessage)> = messages
        .iter()
        .map(|m| (parse_timestamp(&m.timestamp), m))
        .collect();
    ordered.sort_by_key(|(ts, _)| (ts.is_none(), *ts));

    ordered
        .into_iter()
        .map(|(ts, msg)| {
            let stamp = ts.map_or_else(
                || msg.timestamp.trim().to_string(),
                |t| t.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string(),
            );
            format!("[{}] {}: {}", stamp, msg.sender.trim(), msg.content.trim())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, content: &str, timestamp: &str) -> CaseMessage {
        CaseMessage {
            id: None,
            sender: sender.into(),
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    #[test]
    fn orders_chronologically_in_local_time() {
        let messages = vec![
            msg("Bob", "second", "2024-01-15T09:05:00Z"),
            msg("Alice", "first", "2024-01-15T09:00:00Z"),
        ];
        let text = format_transcript(&messages, chrono_tz::Europe::Stockholm);
        assert_eq!(
            text,
            "[2024-01-15 10:00] Alice: first\n\n[2024-01-15 10:05] Bob: second"
        );
    }

    #[test]
    fn unparsable_timestamps_go_last() {
        let messages = vec![
            msg("Eve", "undated", "yesterday"),
            msg("Alice", "dated", "2024-01-15T09:00:00Z"),
        ];
        let text = format_transcript(&messages, chrono_tz::UTC);
        assert!(text.starts_with("[2024-01-15 09:00] Alice: dated"));
        assert!(text.ends_with("[yesterday] Eve: undated"));
    }
}
