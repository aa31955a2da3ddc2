//! Activity classification and the reply command table.
//!
//! An inbound activity is first reduced to an [`ActivityKind`], then the
//! kind is matched against the [`CommandTable`] to pick at most one reply.

use serde::Deserialize;

use super::mention::strip_recipient_mention;
use crate::core::models::{Activity, ConversationScope};

pub const GREETING_REPLY: &str = "Hi there! 👋 How can I help?";
pub const HELP_REPLY: &str = "I can create support cases from Teams messages.\n\n\
    • In a **chat**, type **hi** or **help**.\n\
    • In a **team**, mention me: **@2Go Service Desk help**.";
pub const PERSONAL_WELCOME: &str =
    "👋 Welcome to 2Go Service Desk! Type **hi** or **help** to begin.";
pub const TEAM_WELCOME: &str =
    "👋 Hello team! I'm 2Go Service Desk bot. Mention me with **help** to get started.";
pub const EMPTY_ECHO: &str = "(empty)";

const INSTALL_ACTIONS: &[&str] = &["add", "add-upgrade"];

/// What an inbound activity means for the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    /// The bot itself was added to a conversation or installed.
    BotInstalled { scope: ConversationScope },
    /// Someone other than the bot joined a conversation the bot is in.
    MemberJoined { scope: ConversationScope },
    /// A user message; `text` has the bot mention removed and is trimmed.
    Message { text: String },
    Ignored,
}

/// Reduces an activity to the kind that drives the reply decision.
#[must_use]
pub fn classify(activity: &Activity) -> ActivityKind {
    match activity.activity_type.as_str() {
        "conversationUpdate" | "installationUpdate" => classify_membership(activity),
        "message" => match activity.text.as_deref() {
            Some(raw) if !raw.is_empty() => ActivityKind::Message {
                text: strip_recipient_mention(activity, raw).trim().to_string(),
            },
            _ => ActivityKind::Ignored,
        },
        _ => ActivityKind::Ignored,
    }
}

fn classify_membership(activity: &Activity) -> ActivityKind {
    let scope = activity.scope();
    let bot_id = activity.recipient_id().filter(|id| !id.is_empty());

    if activity.activity_type == "installationUpdate" {
        if let Some(action) = activity.action.as_deref() {
            if INSTALL_ACTIONS.contains(&action) {
                return ActivityKind::BotInstalled { scope };
            }
            if activity.members_added.is_empty() {
                return ActivityKind::Ignored;
            }
        }
    }

    let bot_added = bot_id.is_some_and(|bot| activity.members_added.iter().any(|m| m.id == bot));
    if bot_added {
        return ActivityKind::BotInstalled { scope };
    }

    if activity.members_added.is_empty() {
        ActivityKind::Ignored
    } else {
        ActivityKind::MemberJoined { scope }
    }
}

/// Canned replies, either a fixed text or an echo of the cleaned message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "text")]
pub enum Reply {
    Text(String),
    Echo,
}

impl Reply {
    fn render(&self, cleaned: &str) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Echo if cleaned.is_empty() => format!("Echo: {EMPTY_ECHO}"),
            Reply::Echo => format!("Echo: {cleaned}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandRule {
    pub keywords: Vec<String>,
    pub reply: Reply,
}

impl CommandRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && lowered.contains(&k.to_lowercase()))
    }
}

/// Ordered keyword rules; the first rule with a keyword inside the message wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandTable {
    pub rules: Vec<CommandRule>,
    #[serde(default = "default_fallback")]
    pub fallback: Reply,
    #[serde(default = "default_personal_welcome")]
    pub personal_welcome: String,
    #[serde(default = "default_team_welcome")]
    pub team_welcome: String,
}

fn default_fallback() -> Reply {
    Reply::Echo
}

fn default_personal_welcome() -> String {
    PERSONAL_WELCOME.to_string()
}

fn default_team_welcome() -> String {
    TEAM_WELCOME.to_string()
}

impl Default for CommandTable {
    fn default() -> Self {
        Self {
            rules: vec![
                CommandRule {
                    keywords: vec!["hi".into(), "hello".into(), "hej".into()],
                    reply: Reply::Text(GREETING_REPLY.to_string()),
                },
                CommandRule {
                    keywords: vec!["help".into(), "hjälp".into()],
                    reply: Reply::Text(HELP_REPLY.to_string()),
                },
            ],
            fallback: default_fallback(),
            personal_welcome: default_personal_welcome(),
            team_welcome: default_team_welcome(),
        }
    }
}

impl CommandTable {
    /// Parses a table from JSON, e.g.
    /// `{"rules":[{"keywords":["hi"],"reply":{"kind":"text","text":"Hello"}}]}`.
    ///
    /// # Errors
    ///
    /// Returns the serde error message if the JSON does not describe a table.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("invalid command table: {e}"))
    }

    /// Picks the reply for a cleaned message. Every message gets one.
    #[must_use]
    pub fn reply_for_message(&self, cleaned: &str) -> String {
        let lowered = cleaned.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(&self.fallback, |rule| &rule.reply)
            .render(cleaned)
    }

    /// Decides the reply text for a classified activity, if any.
    ///
    /// Teams are greeted once on install; people in 1:1 chats are greeted
    /// whenever they are added.
    #[must_use]
    pub fn decide(&self, kind: &ActivityKind) -> Option<String> {
        match kind {
            ActivityKind::BotInstalled { scope } if scope.is_team() => {
                Some(self.team_welcome.clone())
            }
            ActivityKind::BotInstalled { .. }
            | ActivityKind::MemberJoined {
                scope: ConversationScope::Personal,
            } => Some(self.personal_welcome.clone()),
            ActivityKind::MemberJoined { .. } | ActivityKind::Ignored => None,
            ActivityKind::Message { text } => Some(self.reply_for_message(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_rule_precedes_help() {
        let table = CommandTable::default();
        assert_eq!(table.reply_for_message("Hi Help"), GREETING_REPLY);
        assert_eq!(table.reply_for_message("HELP me please"), HELP_REPLY);
        assert_eq!(table.reply_for_message("Hjälp"), HELP_REPLY);
    }

    #[test]
    fn fallback_echoes_original_casing() {
        let table = CommandTable::default();
        assert_eq!(table.reply_for_message("Printer on Fire"), "Echo: Printer on Fire");
        assert_eq!(table.reply_for_message(""), "Echo: (empty)");
    }

    #[test]
    fn custom_table_from_json() {
        let table = CommandTable::from_json(
            r#"{"rules":[{"keywords":["case"],"reply":{"kind":"text","text":"Use Create case"}}]}"#,
        )
        .expect("table");
        assert_eq!(table.reply_for_message("new CASE please"), "Use Create case");
        assert_eq!(table.reply_for_message("x"), "Echo: x");
        assert_eq!(table.team_welcome, TEAM_WELCOME);
    }

    #[test]
    fn malformed_table_is_rejected() {
        assert!(CommandTable::from_json("{\"rules\": 3}").is_err());
    }
}
