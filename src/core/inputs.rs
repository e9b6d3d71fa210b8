//! Input loading.
//!
//! Normalizes the three uploaded artifacts (keyword list, SEO recommendations,
//! Ideal Customer Profile) into [`Inputs`]. Loading is all-or-nothing: the
//! first malformed artifact aborts the whole load.

use std::path::Path;

use serde_json::{Map, Value};

use super::error::{Artifact, PlanError, PlanResult};

/// Field holding the keyword array when keywords are wrapped in an object.
pub const ALL_KEYWORDS_FIELD: &str = "all_keywords";

/// Loaded planning inputs shared by both generation stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    /// Target keywords, in the order they were supplied
    pub keywords: Vec<String>,

    /// Free-form SEO recommendations
    pub seo_insights: String,

    /// Ideal Customer Profile, stored as-is
    pub icp: Map<String, Value>,
}

impl Inputs {
    /// Keywords to weave into an article, excluding its primary keyword.
    ///
    /// Keeps the original order and returns at most `limit` entries.
    pub fn secondary_keywords(&self, primary: &str, limit: usize) -> Vec<String> {
        self.keywords.iter().filter(|k| k.as_str() != primary).take(limit).cloned().collect()
    }

    /// Whether the keyword list contains `keyword` verbatim.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Keywords as pretty-printed JSON.
    pub fn keywords_json(&self) -> String {
        serde_json::to_string_pretty(&self.keywords).unwrap_or_else(|_| "[]".to_string())
    }

    /// ICP profile as pretty-printed JSON.
    pub fn icp_json(&self) -> String {
        serde_json::to_string_pretty(&self.icp).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Extract a flat keyword list from either supported shape.
///
/// Accepts a bare array of strings or an object whose `all_keywords` field
/// holds that array.
pub fn parse_keywords(value: &Value) -> PlanResult<Vec<String>> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get(ALL_KEYWORDS_FIELD) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(PlanError::load(
                    Artifact::Keywords,
                    format!("'{ALL_KEYWORDS_FIELD}' must be an array of strings"),
                ))
            }
            None => {
                return Err(PlanError::load(
                    Artifact::Keywords,
                    format!("object has no '{ALL_KEYWORDS_FIELD}' field"),
                ))
            }
        },
        _ => {
            return Err(PlanError::load(
                Artifact::Keywords,
                "expected an array of strings or an object with 'all_keywords'",
            ))
        }
    };

    list.iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                PlanError::load(Artifact::Keywords, format!("keyword #{} is not a string", i + 1))
            })
        })
        .collect()
}

/// Decode SEO recommendations delivered as raw bytes.
pub fn parse_seo_insights(bytes: &[u8]) -> PlanResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| PlanError::load(Artifact::SeoInsights, e))
}

/// Accept an ICP profile, which must be a JSON object.
pub fn parse_icp(value: Value) -> PlanResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PlanError::load(Artifact::IcpData, "expected a JSON object")),
    }
}

/// Loads and normalizes the three input artifacts.
#[derive(Debug, Default)]
pub struct InputLoader {
    loaded: Vec<Artifact>,
}

impl InputLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts loaded successfully so far, in load order.
    pub fn loaded(&self) -> &[Artifact] {
        &self.loaded
    }

    /// Load inputs from already-read artifact contents.
    pub fn load_bytes(&mut self, keywords: &[u8], seo: &[u8], icp: &[u8]) -> PlanResult<Inputs> {
        self.loaded.clear();

        let keywords = self.keywords(keywords)?;
        let seo_insights = self.seo_insights(seo)?;
        let icp = self.icp(icp)?;

        Ok(Inputs { keywords, seo_insights, icp })
    }

    /// Load inputs from files on disk.
    ///
    /// Each file is read and parsed before the next one is opened.
    pub fn load_files(&mut self, keywords: &Path, seo: &Path, icp: &Path) -> PlanResult<Inputs> {
        self.loaded.clear();

        let keywords = self.keywords(&read_artifact(Artifact::Keywords, keywords)?)?;
        let seo_insights = self.seo_insights(&read_artifact(Artifact::SeoInsights, seo)?)?;
        let icp = self.icp(&read_artifact(Artifact::IcpData, icp)?)?;

        Ok(Inputs { keywords, seo_insights, icp })
    }

    fn keywords(&mut self, bytes: &[u8]) -> PlanResult<Vec<String>> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| PlanError::load(Artifact::Keywords, e))?;
        let keywords = parse_keywords(&value)?;
        self.mark(Artifact::Keywords);
        Ok(keywords)
    }

    fn seo_insights(&mut self, bytes: &[u8]) -> PlanResult<String> {
        let text = parse_seo_insights(bytes)?;
        self.mark(Artifact::SeoInsights);
        Ok(text)
    }

    fn icp(&mut self, bytes: &[u8]) -> PlanResult<Map<String, Value>> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| PlanError::load(Artifact::IcpData, e))?;
        let icp = parse_icp(value)?;
        self.mark(Artifact::IcpData);
        Ok(icp)
    }

    fn mark(&mut self, artifact: Artifact) {
        tracing::debug!(%artifact, "artifact loaded");
        self.loaded.push(artifact);
    }
}

fn read_artifact(artifact: Artifact, path: &Path) -> PlanResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| PlanError::load(artifact, format!("cannot read {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_keyword_array() {
        let keywords = parse_keywords(&json!(["SEO", "content marketing"])).unwrap();
        assert_eq!(keywords, vec!["SEO", "content marketing"]);
    }

    #[test]
    fn test_wrapped_keyword_array() {
        let value = json!({"all_keywords": ["b", "a", "c"], "other": 1});
        let keywords = parse_keywords(&value).unwrap();
        assert_eq!(keywords, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_keywords_reject_other_shapes() {
        for value in [json!("SEO"), json!({"keywords": []}), json!({"all_keywords": "x"})] {
            let err = parse_keywords(&value).unwrap_err();
            assert_eq!(err.artifact(), Some(Artifact::Keywords));
        }
    }

    #[test]
    fn test_keywords_reject_non_strings() {
        let err = parse_keywords(&json!(["ok", 3])).unwrap_err();
        assert!(err.to_string().contains("keyword #2"));
    }

    #[test]
    fn test_icp_must_be_object() {
        assert!(parse_icp(json!({"role": "marketer"})).is_ok());
        let err = parse_icp(json!(["role"])).unwrap_err();
        assert_eq!(err.artifact(), Some(Artifact::IcpData));
    }

    #[test]
    fn test_seo_rejects_invalid_utf8() {
        let err = parse_seo_insights(&[0xff, 0xfe]).unwrap_err();
        assert_eq!(err.artifact(), Some(Artifact::SeoInsights));
    }

    #[test]
    fn test_load_is_fail_fast() {
        let mut loader = InputLoader::new();
        let err = loader.load_bytes(br#"["SEO"]"#, b"tips", b"not json").unwrap_err();
        assert_eq!(err.artifact(), Some(Artifact::IcpData));
        assert_eq!(loader.loaded(), &[Artifact::Keywords, Artifact::SeoInsights]);

        let err = loader.load_bytes(b"{", b"tips", b"{}").unwrap_err();
        assert_eq!(err.artifact(), Some(Artifact::Keywords));
        assert!(loader.loaded().is_empty());
    }

    #[test]
    fn test_load_files_stops_at_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let keywords = dir.path().join("keywords.json");
        std::fs::write(&keywords, r#"["SEO"]"#).unwrap();

        let mut loader = InputLoader::new();
        let err = loader
            .load_files(&keywords, &dir.path().join("seo.txt"), &dir.path().join("icp.json"))
            .unwrap_err();

        assert_eq!(err.artifact(), Some(Artifact::SeoInsights));
        assert!(err.to_string().starts_with("Error loading SEO insights: cannot read"));
        assert_eq!(loader.loaded(), &[Artifact::Keywords]);
    }

    #[test]
    fn test_load_bytes() {
        let mut loader = InputLoader::new();
        let inputs = loader
            .load_bytes(
                br#"{"all_keywords": ["SEO", "content marketing"]}"#,
                b"Focus on long-tail keywords.",
                br#"{"role": "marketer", "company_size": "10-50"}"#,
            )
            .unwrap();

        assert_eq!(inputs.keywords, vec!["SEO", "content marketing"]);
        assert_eq!(inputs.seo_insights, "Focus on long-tail keywords.");
        assert_eq!(inputs.icp["role"], "marketer");
        assert_eq!(loader.loaded().len(), 3);
    }

    #[test]
    fn test_icp_json_preserves_field_order() {
        let inputs = Inputs {
            icp: parse_icp(json!({"zeta": 1, "alpha": 2})).unwrap(),
            ..Inputs::default()
        };
        let rendered = inputs.icp_json();
        assert!(rendered.find("zeta").unwrap() < rendered.find("alpha").unwrap());
        assert!(rendered.contains("\n  \"zeta\": 1"));
    }

    #[test]
    fn test_secondary_keywords() {
        let inputs = Inputs {
            keywords: ["a", "b", "c", "d", "e", "f", "g"].iter().map(|s| s.to_string()).collect(),
            ..Inputs::default()
        };
        assert_eq!(inputs.secondary_keywords("b", 5), vec!["a", "c", "d", "e", "f"]);
        assert_eq!(inputs.secondary_keywords("zzz", 2), vec!["a", "b"]);
    }
}
