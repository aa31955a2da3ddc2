//! Case URL extraction from upstream responses.
//!
//! The upstream response schema is vendor-specific, so each known shape is
//! an extractor and a chain tries them in order.

use serde_json::Value;

use crate::api::parsing::{v_array, v_str};

pub const SELF_SERVICE_URL_FIELD: &str = "URL_Selfservice";

pub trait CaseUrlExtractor: Send + Sync {
    fn extract(&self, body: &Value) -> Option<String>;
}

/// easitGO import result:
/// `importItemResult[0].returnValues.returnValue[name == URL_Selfservice].content`.
pub struct ImportItemResult;

impl CaseUrlExtractor for ImportItemResult {
    fn extract(&self, body: &Value) -> Option<String> {
        let first = v_array(body, &["importItemResult"])?.first()?;
        v_array(first, &["returnValues", "returnValue"])?
            .iter()
            .find(|item| v_str(item, &["name"]) == Some(SELF_SERVICE_URL_FIELD))
            .and_then(|item| v_str(item, &["content"]))
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

/// A top-level string field holding the URL.
pub struct FlatField(pub String);

impl CaseUrlExtractor for FlatField {
    fn extract(&self, body: &Value) -> Option<String> {
        v_str(body, &[self.0.as_str()])
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

/// First extractor that yields a URL wins.
pub struct ExtractorChain {
    extractors: Vec<Box<dyn CaseUrlExtractor>>,
}

impl ExtractorChain {
    #[must_use]
    pub fn new(extractors: Vec<Box<dyn CaseUrlExtractor>>) -> Self {
        Self { extractors }
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ImportItemResult),
            Box::new(FlatField(SELF_SERVICE_URL_FIELD.to_string())),
            Box::new(FlatField("caseUrl".to_string())),
        ])
    }
}

impl CaseUrlExtractor for ExtractorChain {
    fn extract(&self, body: &Value) -> Option<String> {
        self.extractors.iter().find_map(|e| e.extract(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_easit_import_result() {
        let body = json!({
            "importItemResult": [{
                "returnValues": {
                    "returnValue": [
                        {"name": "ID", "content": "4711"},
                        {"name": "URL_Selfservice", "content": "https://desk.example/case/4711"}
                    ]
                }
            }]
        });
        assert_eq!(
            ExtractorChain::default().extract(&body).as_deref(),
            Some("https://desk.example/case/4711")
        );
    }

    #[test]
    fn falls_back_to_flat_fields() {
        let chain = ExtractorChain::default();
        assert_eq!(
            chain.extract(&json!({"URL_Selfservice": "https://a"})).as_deref(),
            Some("https://a")
        );
        assert_eq!(
            chain.extract(&json!({"caseUrl": "https://b"})).as_deref(),
            Some("https://b")
        );
        assert_eq!(chain.extract(&json!({"id": 1})), None);
        assert_eq!(chain.extract(&json!("plain text")), None);
    }
}
