use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_TITLE_CHARS: usize = 100;

static TIMESTAMP_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\w+.*?\d{2}-\d{2}\s+\d{2}:\d{2}\]").expect("static regex compile")
});
static HTML_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(?:[a-zA-Z]+|#\d+);").expect("static regex compile"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("static regex compile"));

fn decode_entity(entity: &str) -> &'static str {
    match entity {
        "&nbsp;" => " ",
        "&amp;" => "&",
        "&lt;" => "<",
        "&gt;" => ">",
        "&quot;" => "\"",
        "&#39;" | "&apos;" => "'",
        _ => "",
    }
}

/// Synthesises a case title from a transcript.
///
/// Timestamp brackets are removed, HTML entities decoded or dropped and
/// whitespace collapsed; the first 100 characters are kept and `...` marks a
/// cut. The same input always yields the same title.
#[must_use]
pub fn derive_title(description: &str) -> String {
    let without_stamps = TIMESTAMP_TOKEN.replace_all(description, "");
    let decoded = HTML_ENTITY.replace_all(&without_stamps, |caps: &regex::Captures<'_>| {
        decode_entity(&caps[0])
    });
    let clean = WHITESPACE_RUN.replace_all(decoded.trim(), " ");

    match clean.char_indices().nth(MAX_TITLE_CHARS) {
        Some((cut, _)) => format!("{}...", clean[..cut].trim_end()),
        None => clean.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_timestamps_and_entities() {
        let title = derive_title("[2024-01-15 10:00] Alice: printer&nbsp;broken &amp; smoking");
        assert_eq!(title, "Alice: printer broken & smoking");
    }

    #[test]
    fn truncates_long_descriptions_with_ellipsis() {
        let description = "ä".repeat(150);
        let title = derive_title(&description);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS + 3);
    }

    #[test]
    fn short_descriptions_are_kept_whole() {
        assert_eq!(derive_title("  issue X \n\n more "), "issue X more");
    }
}
