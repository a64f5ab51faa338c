//! Grammar configuration: load a tag table override from JSON.
//!
//! ```json
//! {
//!   "extend": true,
//!   "tags": { "since": "version:string", "deprecated": null },
//!   "multi": ["author", "param", "see"]
//! }
//! ```
//!
//! With `extend` the entries are laid over the built-in table, otherwise they
//! replace it. `primary` and `multi` default to the built-in sets, limited to
//! the tags the resulting table defines.

use crate::error::{ConfigError, Result};
use crate::grammar::{TagGrammar, DEFAULT_TAGS, MULTI_TAGS, PRIMARY_TAGS};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarConfig {
    #[serde(default)]
    pub extend: bool,
    /// Tag name → pattern spec, `null` for flag tags.
    #[serde(default)]
    pub tags: BTreeMap<String, Option<String>>,
    pub primary: Option<Vec<String>>,
    pub multi: Option<Vec<String>>,
}

impl GrammarConfig {
    /// Resolve the tag table and compile it.
    pub fn compile(&self) -> Result<TagGrammar> {
        let mut table: BTreeMap<String, Option<String>> = if self.extend {
            DEFAULT_TAGS
                .iter()
                .map(|(tag, spec)| (tag.to_string(), spec.map(str::to_string)))
                .collect()
        } else {
            BTreeMap::new()
        };
        table.extend(self.tags.clone());

        let primary = role_or_default(&self.primary, PRIMARY_TAGS, &table);
        let multi = role_or_default(&self.multi, MULTI_TAGS, &table);

        TagGrammar::compile_with_roles(table, &primary, &multi)
    }
}

fn role_or_default(
    configured: &Option<Vec<String>>,
    builtin: &[&str],
    table: &BTreeMap<String, Option<String>>,
) -> Vec<String> {
    match configured {
        Some(names) => names.clone(),
        None => builtin
            .iter()
            .filter(|name| table.contains_key(**name))
            .map(|name| name.to_string())
            .collect(),
    }
}

/// Read and compile a grammar file.
pub fn load_grammar(path: &Path) -> Result<TagGrammar> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GrammarConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), tags = config.tags.len(), extend = config.extend, "grammar config loaded");
    config.compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::TagRule;
    use std::io::Write;

    fn config(json: &str) -> GrammarConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extend_keeps_builtin_tags() {
        let grammar = config(r#"{"extend": true, "tags": {"since": "version:string", "deprecated": null}}"#)
            .compile()
            .unwrap();
        assert!(grammar.rule("param").is_some());
        assert_eq!(grammar.rule("deprecated"), Some(&TagRule::Flag));
        assert!(matches!(grammar.rule("since"), Some(TagRule::Pattern(_))));
        assert!(grammar.is_primary("class"));
        assert!(grammar.is_multi("param"));
    }

    #[test]
    fn replace_restricts_roles() {
        let grammar = config(r#"{"tags": {"class": "name:string", "note": "text:text"}}"#)
            .compile()
            .unwrap();
        assert!(grammar.rule("param").is_none());
        assert!(grammar.is_primary("class"));
        assert!(!grammar.is_primary("method"));
    }

    #[test]
    fn explicit_roles_are_checked() {
        let err = config(r#"{"tags": {"class": "name:string"}, "multi": ["see"]}"#)
            .compile()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedTag { role: "multi-value", .. }));
    }

    #[test]
    fn bad_kind_is_a_config_error() {
        let err = config(r#"{"extend": true, "tags": {"since": "version:semver"}}"#)
            .compile()
            .unwrap_err();
        assert!(err.to_string().contains("unknown parameter kind 'semver'"));
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(serde_json::from_str::<GrammarConfig>(r#"{"tagz": {}}"#).is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"extend": true, "tags": {"todo": "text:text"}}"#)
            .unwrap();
        let grammar = load_grammar(file.path()).unwrap();
        assert!(grammar.rule("todo").is_some());

        let err = load_grammar(Path::new("/nonexistent/grammar.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
