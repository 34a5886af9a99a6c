//! Variant selection: an ordered list of rules, first match wins.

use std::fmt;

use super::{SelectedVariant, VideoManifest};
use crate::config::SelectionConfig;
use crate::error::ArtedlError;

/// One step of a selection policy.
pub trait VariantRule: fmt::Debug {
    /// Returns the variant this rule accepts, if any.
    fn select(&self, manifest: &VideoManifest) -> Option<SelectedVariant>;
}

/// Accepts a variant with the given version code, bitrate and media type.
///
/// Among several such records the one with the smallest manifest key wins.
/// Records with an empty URL are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCodeRule {
    pub code: String,
    pub bitrate: i64,
    pub media_type: String,
}

impl VariantRule for VersionCodeRule {
    fn select(&self, manifest: &VideoManifest) -> Option<SelectedVariant> {
        manifest
            .variants
            .iter()
            .find(|(_, v)| {
                v.bitrate == self.bitrate
                    && v.media_type == self.media_type
                    && v.version_code == self.code
                    && !v.url.is_empty()
            })
            .map(|(key, v)| SelectedVariant {
                key: key.clone(),
                url: v.url.clone(),
                version_code: Some(v.version_code.clone()),
            })
    }
}

/// Accepts whatever non-empty record sits at a fixed manifest key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestKeyRule {
    pub key: String,
}

impl VariantRule for ManifestKeyRule {
    fn select(&self, manifest: &VideoManifest) -> Option<SelectedVariant> {
        let v = manifest.variants.get(&self.key)?;
        if v.url.is_empty() {
            return None;
        }
        Some(SelectedVariant {
            key: self.key.clone(),
            url: v.url.clone(),
            version_code: Some(v.version_code.clone()).filter(|c| !c.is_empty()),
        })
    }
}

/// Ordered rules evaluated first to last.
#[derive(Debug)]
pub struct SelectionPolicy {
    rules: Vec<Box<dyn VariantRule>>,
}

impl SelectionPolicy {
    pub fn new(rules: Vec<Box<dyn VariantRule>>) -> Self {
        Self { rules }
    }

    /// Version-code rules for each preferred code, then key rules for each fallback key.
    pub fn from_config(cfg: &SelectionConfig) -> Self {
        let mut rules: Vec<Box<dyn VariantRule>> = Vec::new();
        for code in &cfg.preferred_codes {
            rules.push(Box::new(VersionCodeRule {
                code: code.clone(),
                bitrate: cfg.bitrate,
                media_type: cfg.media_type.clone(),
            }));
        }
        for key in &cfg.fallback_keys {
            rules.push(Box::new(ManifestKeyRule { key: key.clone() }));
        }
        Self::new(rules)
    }

    pub fn rules(&self) -> &[Box<dyn VariantRule>] {
        &self.rules
    }

    pub fn select(&self, manifest: &VideoManifest) -> Result<SelectedVariant, ArtedlError> {
        for rule in &self.rules {
            if let Some(selected) = rule.select(manifest) {
                tracing::debug!(rule = ?rule, key = %selected.key, "variant selected");
                return Ok(selected);
            }
        }
        Err(ArtedlError::NoMatch {
            seen: manifest.version_codes(),
        })
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::from_config(&SelectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(json: &str) -> VideoManifest {
        VideoManifest::from_json(json.as_bytes()).unwrap()
    }

    fn preference_only() -> SelectionPolicy {
        SelectionPolicy::default()
    }

    fn with_fallback_keys() -> SelectionPolicy {
        SelectionPolicy::from_config(&SelectionConfig {
            fallback_keys: vec!["HTTPS_SQ_1".into(), "HTTPS_SQ_2".into()],
            ..SelectionConfig::default()
        })
    }

    #[test]
    fn vf_preferred_over_vo() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "VF":{"bitrate":2200,"mediaType":"mp4","versionCode":"VF","url":"A"},
                "VO":{"bitrate":2200,"mediaType":"mp4","versionCode":"VO","url":"B"}
            }}}"#,
        );
        let s = preference_only().select(&m).unwrap();
        assert_eq!(s.url, "A");
        assert_eq!(s.version_code.as_deref(), Some("VF"));
    }

    #[test]
    fn vo_stf_when_no_vf() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "VO-STF":{"bitrate":2200,"mediaType":"mp4","versionCode":"VO-STF","url":"C"}
            }}}"#,
        );
        let s = preference_only().select(&m).unwrap();
        assert_eq!(s.url, "C");
        assert_eq!(s.version_code.as_deref(), Some("VO-STF"));
    }

    #[test]
    fn wrong_bitrate_or_media_type_is_no_match() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "a":{"bitrate":1500,"mediaType":"mp4","versionCode":"VF","url":"A"},
                "b":{"bitrate":2200,"mediaType":"hls","versionCode":"VO","url":"B"}
            }}}"#,
        );
        match preference_only().select(&m) {
            Err(ArtedlError::NoMatch { seen }) => assert_eq!(seen, vec!["VF", "VO"]),
            other => panic!("expected NoMatch, got {:?}", other),
        }
    }

    #[test]
    fn unknown_code_is_no_match() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "a":{"bitrate":2200,"mediaType":"mp4","versionCode":"VA","url":"A"}
            }}}"#,
        );
        assert!(matches!(
            preference_only().select(&m),
            Err(ArtedlError::NoMatch { .. })
        ));
    }

    #[test]
    fn smallest_key_wins_for_shared_code() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "z":{"bitrate":2200,"mediaType":"mp4","versionCode":"VF","url":"Z"},
                "a":{"bitrate":2200,"mediaType":"mp4","versionCode":"VF","url":"A"}
            }}}"#,
        );
        let s = preference_only().select(&m).unwrap();
        assert_eq!(s.key, "a");
        assert_eq!(s.url, "A");
    }

    #[test]
    fn empty_url_does_not_match() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "a":{"bitrate":2200,"mediaType":"mp4","versionCode":"VF","url":""},
                "b":{"bitrate":2200,"mediaType":"mp4","versionCode":"VO","url":"B"}
            }}}"#,
        );
        assert_eq!(preference_only().select(&m).unwrap().url, "B");
    }

    #[test]
    fn fallback_keys_in_order() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "HTTPS_SQ_1":{},
                "HTTPS_SQ_2":{"url":"second"}
            }}}"#,
        );
        let s = with_fallback_keys().select(&m).unwrap();
        assert_eq!(s.key, "HTTPS_SQ_2");
        assert_eq!(s.url, "second");
        assert!(s.version_code.is_none());
    }

    #[test]
    fn preference_rules_run_before_fallback_keys() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "HTTPS_SQ_1":{"bitrate":1500,"mediaType":"mp4","versionCode":"VA","url":"fallback"},
                "HTTPS_EQ_1":{"bitrate":2200,"mediaType":"mp4","versionCode":"VO","url":"preferred"}
            }}}"#,
        );
        let s = with_fallback_keys().select(&m).unwrap();
        assert_eq!(s.url, "preferred");
    }

    #[test]
    fn default_policy_ignores_fixed_keys() {
        let m = manifest(
            r#"{"videoJsonPlayer":{"VSR":{
                "HTTPS_SQ_1":{"bitrate":1500,"mediaType":"mp4","versionCode":"VA","url":"german-1500"}
            }}}"#,
        );
        match SelectionPolicy::default().select(&m) {
            Err(ArtedlError::NoMatch { seen }) => assert_eq!(seen, vec!["VA"]),
            other => panic!("expected NoMatch, got {:?}", other),
        }
        assert_eq!(with_fallback_keys().select(&m).unwrap().url, "german-1500");
    }

    #[test]
    fn custom_rule_order() {
        let policy = SelectionPolicy::new(vec![
            Box::new(ManifestKeyRule { key: "k2".into() }),
            Box::new(ManifestKeyRule { key: "k1".into() }),
        ]);
        let m = manifest(r#"{"videoJsonPlayer":{"VSR":{"k1":{"url":"1"},"k2":{"url":"2"}}}}"#);
        assert_eq!(policy.select(&m).unwrap().url, "2");
        assert_eq!(policy.rules().len(), 2);
    }

    #[test]
    fn empty_policy_never_matches() {
        let m = manifest(r#"{"videoJsonPlayer":{"VSR":{"k":{"url":"u"}}}}"#);
        assert!(SelectionPolicy::new(vec![]).select(&m).is_err());
    }
}
