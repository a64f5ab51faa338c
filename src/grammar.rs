//! Tag grammar: which `@tags` exist and what parameters they take.
//!
//! Each tag maps to a pattern spec written in a small mini-language, or to
//! nothing for flag tags (`@static`). Specs are whitespace separated tokens of
//! the form `[?][name:]kind`:
//!
//! - `text`: rest of the line
//! - `string`: one run of non-whitespace characters
//! - `space`: exactly one whitespace character (not captured)
//! - `spaces`: one or more whitespace characters (not captured)
//!
//! A leading `?` makes the token optional. Unnamed `text`/`string` tokens are
//! consumed and dropped. Specs are compiled once into [`TagPattern`]s; every
//! pattern ends with an implicit overflow slot that collects any text the
//! declared parameters did not consume.

use crate::error::{ConfigError, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static RE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\?)?(?:([A-Za-z_][A-Za-z0-9_-]*):)?([A-Za-z]+)$").unwrap()
});

/// Built-in tag table: tag name → pattern spec (`None` for flag tags).
pub const DEFAULT_TAGS: &[(&str, Option<&str>)] = &[
    ("author", Some("name:string ?spaces ?link:string")),
    ("class", Some("name:string")),
    ("constructor", None),
    ("copyright", Some("text:text")),
    ("extends", Some("name:string")),
    ("license", Some("name:string ?spaces ?text:text")),
    ("link", Some("url:string ?spaces ?text:text")),
    ("method", Some("name:string")),
    ("namespace", Some("name:string")),
    ("param", Some("type:string spaces name:string ?spaces ?text:text")),
    ("private", None),
    ("property", Some("name:string")),
    ("protected", None),
    ("public", None),
    ("return", Some("type:string ?spaces ?text:text")),
    ("source", Some("url:string ?spaces ?text:text")),
    ("static", None),
    ("throw", Some("type:string ?spaces ?text:text")),
    ("type", Some("name:string")),
    ("use", Some("name:string")),
    ("version", Some("number:string ?spaces ?text:text")),
];

/// Tags that give a block its type; at most one per block.
pub const PRIMARY_TAGS: &[&str] = &["class", "constructor", "method", "namespace", "property"];

/// Tags that may repeat inside one block and accumulate into a list.
pub const MULTI_TAGS: &[&str] = &["author", "copyright", "extends", "param", "return", "throw", "use"];

static BUILTIN: LazyLock<TagGrammar> = LazyLock::new(|| {
    TagGrammar::compile(DEFAULT_TAGS.iter().copied()).expect("built-in tag table compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    String,
    Space,
    Spaces,
    /// Implicit trailing slot, never written in a spec.
    Overflow,
}

impl ParamKind {
    fn from_spec(kind: &str) -> Option<Self> {
        match kind {
            "text" => Some(ParamKind::Text),
            "string" => Some(ParamKind::String),
            "space" => Some(ParamKind::Space),
            "spaces" => Some(ParamKind::Spaces),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Text => "text",
            ParamKind::String => "string",
            ParamKind::Space => "space",
            ParamKind::Spaces => "spaces",
            ParamKind::Overflow => "overflow",
        }
    }

    fn is_structural(&self) -> bool {
        matches!(self, ParamKind::Space | ParamKind::Spaces)
    }

    /// Match this kind at the start of `input`, returning the captured value
    /// and the unconsumed tail.
    fn take<'a>(&self, input: &'a str) -> Option<(&'a str, &'a str)> {
        match self {
            ParamKind::String => {
                let end = input.find(char::is_whitespace).unwrap_or(input.len());
                (end > 0).then(|| input.split_at(end))
            }
            ParamKind::Text => {
                let value = input.trim_end();
                (!value.is_empty()).then_some((value, ""))
            }
            ParamKind::Space => {
                let c = input.chars().next().filter(|c| c.is_whitespace())?;
                Some(("", &input[c.len_utf8()..]))
            }
            ParamKind::Spaces => {
                let tail = input.trim_start();
                (tail.len() < input.len()).then_some(("", tail))
            }
            ParamKind::Overflow => {
                let value = input.trim();
                (!value.is_empty()).then_some((value, ""))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub name: Option<String>,
    pub kind: ParamKind,
    pub optional: bool,
}

/// Compiled parameter pattern of one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub tag: String,
    slots: Vec<Slot>,
}

/// Outcome of matching a pattern against a tag remainder.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Binding {
    /// Named parameters in declaration order.
    pub params: Vec<(String, String)>,
    /// First parameter a required token could not provide.
    pub missing: Option<String>,
    /// Text left over once every declared slot was tried.
    pub overflow: Option<String>,
}

impl TagPattern {
    fn compile(tag: &str, spec: &str) -> Result<Self> {
        let mut slots = Vec::new();
        let mut seen = BTreeSet::new();

        for token in spec.split_whitespace() {
            let caps = RE_TOKEN
                .captures(token)
                .ok_or_else(|| ConfigError::MalformedToken {
                    tag: tag.to_string(),
                    token: token.to_string(),
                })?;
            let kind = ParamKind::from_spec(&caps[3]).ok_or_else(|| ConfigError::UnknownKind {
                tag: tag.to_string(),
                kind: caps[3].to_string(),
            })?;
            let name = caps.get(2).map(|m| m.as_str().to_string());

            if let Some(ref name) = name {
                if kind.is_structural() {
                    return Err(ConfigError::StructuralName {
                        tag: tag.to_string(),
                        name: name.clone(),
                        kind: kind.as_str().to_string(),
                    });
                }
                if !seen.insert(name.clone()) {
                    return Err(ConfigError::DuplicateParameter {
                        tag: tag.to_string(),
                        name: name.clone(),
                    });
                }
            }

            slots.push(Slot {
                name,
                kind,
                optional: caps.get(1).is_some(),
            });
        }

        slots.push(Slot {
            name: None,
            kind: ParamKind::Overflow,
            optional: true,
        });

        Ok(Self {
            tag: tag.to_string(),
            slots,
        })
    }

    /// Declared slots, overflow excluded.
    pub fn slots(&self) -> &[Slot] {
        &self.slots[..self.slots.len() - 1]
    }

    /// Names of the captured parameters, in order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.slots().iter().filter_map(|s| s.name.as_deref())
    }

    /// Bind `input` slot by slot. Optional slots that do not match are
    /// skipped; the first required slot that does not match ends binding.
    pub fn bind(&self, input: &str) -> Binding {
        let mut binding = Binding::default();
        let mut rest = input.trim_start();

        for (i, slot) in self.slots.iter().enumerate() {
            match slot.kind.take(rest) {
                Some((value, tail)) => {
                    if slot.kind == ParamKind::Overflow {
                        binding.overflow = Some(value.to_string());
                    } else if let Some(ref name) = slot.name {
                        binding.params.push((name.clone(), value.to_string()));
                    }
                    rest = tail;
                }
                None if slot.optional => {}
                None => {
                    binding.missing = Some(self.first_name_from(i));
                    break;
                }
            }
        }

        binding
    }

    fn first_name_from(&self, index: usize) -> String {
        self.slots()[index..]
            .iter()
            .find_map(|s| s.name.clone())
            .unwrap_or_else(|| self.slots[index].kind.as_str().to_string())
    }
}

/// How a tag takes its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRule {
    /// Presence only.
    Flag,
    Pattern(TagPattern),
}

/// Immutable, compiled tag table shared by every parse.
#[derive(Debug, Clone)]
pub struct TagGrammar {
    rules: BTreeMap<String, TagRule>,
    primary: BTreeSet<String>,
    multi: BTreeSet<String>,
}

impl TagGrammar {
    /// Compile a tag table using the built-in primary and multi-value tag
    /// sets, restricted to the tags the table defines.
    pub fn compile<I, K, V>(table: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let rules = compile_rules(table)?;
        let primary = restrict(PRIMARY_TAGS, &rules);
        let multi = restrict(MULTI_TAGS, &rules);
        Ok(Self {
            rules,
            primary,
            multi,
        })
    }

    /// Compile a tag table with explicit primary and multi-value tag sets.
    /// Every listed tag must be defined by the table.
    pub fn compile_with_roles<I, K, V>(
        table: I,
        primary: &[String],
        multi: &[String],
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let rules = compile_rules(table)?;
        let primary = check_role("primary", primary, &rules)?;
        let multi = check_role("multi-value", multi, &rules)?;
        Ok(Self {
            rules,
            primary,
            multi,
        })
    }

    pub fn rule(&self, tag: &str) -> Option<&TagRule> {
        self.rules.get(tag)
    }

    pub fn is_primary(&self, tag: &str) -> bool {
        self.primary.contains(tag)
    }

    pub fn is_multi(&self, tag: &str) -> bool {
        self.multi.contains(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl Default for TagGrammar {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

fn compile_rules<I, K, V>(table: I) -> Result<BTreeMap<String, TagRule>>
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut rules = BTreeMap::new();
    for (tag, spec) in table {
        let tag = tag.as_ref();
        let rule = match spec {
            None => TagRule::Flag,
            Some(spec) => TagRule::Pattern(TagPattern::compile(tag, spec.as_ref())?),
        };
        rules.insert(tag.to_string(), rule);
    }
    Ok(rules)
}

fn restrict(names: &[&str], rules: &BTreeMap<String, TagRule>) -> BTreeSet<String> {
    names
        .iter()
        .filter(|n| rules.contains_key(**n))
        .map(|n| n.to_string())
        .collect()
}

fn check_role(
    role: &'static str,
    names: &[String],
    rules: &BTreeMap<String, TagRule>,
) -> Result<BTreeSet<String>> {
    names
        .iter()
        .map(|name| {
            if rules.contains_key(name) {
                Ok(name.clone())
            } else {
                Err(ConfigError::UndefinedTag {
                    role,
                    tag: name.clone(),
                })
            }
        })
        .collect()
}
