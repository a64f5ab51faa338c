//! Data model for parsed documentation, language-agnostic.

use crate::diagnostic::Location;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named parameter values of a tag, in grammar order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new(values: Vec<(String, String)>) -> Self {
        Self(values)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// Presence only.
    Flag,
    Params(Params),
}

impl Serialize for TagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TagValue::Flag => serializer.serialize_bool(true),
            TagValue::Params(params) => params.serialize(serializer),
        }
    }
}

impl TagValue {
    pub fn param(&self, name: &str) -> Option<&str> {
        match self {
            TagValue::Flag => None,
            TagValue::Params(params) => params.get(name),
        }
    }
}

/// One parsed `@tag` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: TagValue,
    pub location: Location,
}

/// A tag serializes as its value; the name is the key it is stored under.
impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl Tag {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.value.param(name)
    }
}

/// Stored value of a tag inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagEntry {
    Single(Tag),
    Multi(Vec<Tag>),
}

impl TagEntry {
    /// The single tag, or the last of a list.
    pub fn last(&self) -> Option<&Tag> {
        match self {
            TagEntry::Single(tag) => Some(tag),
            TagEntry::Multi(tags) => tags.last(),
        }
    }

    pub fn as_slice(&self) -> &[Tag] {
        match self {
            TagEntry::Single(tag) => std::slice::from_ref(tag),
            TagEntry::Multi(tags) => tags,
        }
    }
}

pub type TagMap = BTreeMap<String, TagEntry>;

/// Which line number of a block to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBound {
    From,
    To,
}

/// One documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocBlock {
    /// Name of the primary tag; empty while no primary tag was seen.
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    /// Supplementary comment lines merged in after the block closed.
    pub comments: Vec<String>,
    pub tags: TagMap,
    pub from_line: usize,
    pub to_line: usize,
    pub file: Arc<str>,
}

impl DocBlock {
    pub fn new(file: Arc<str>, from_line: usize) -> Self {
        Self {
            kind: String::new(),
            text: String::new(),
            comments: Vec::new(),
            tags: TagMap::new(),
            from_line,
            to_line: from_line,
            file,
        }
    }

    pub fn set_line(&mut self, bound: LineBound, line: usize) {
        match bound {
            LineBound::From => self.from_line = line,
            LineBound::To => self.to_line = line,
        }
    }

    pub fn is_typed(&self) -> bool {
        !self.kind.is_empty()
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name).and_then(TagEntry::last)
    }

    /// First line of the free text.
    pub fn title(&self) -> Option<&str> {
        self.text.lines().next().filter(|l| !l.trim().is_empty())
    }

    /// Free text after the first paragraph.
    pub fn description(&self) -> Option<&str> {
        let (_, rest) = self.text.split_once("\n\n")?;
        let rest = rest.trim();
        (!rest.is_empty()).then_some(rest)
    }
}

/// A documented method or property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub line: usize,
    pub text: String,
    pub comments: Vec<String>,
    pub tags: TagMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntry {
    pub file: Arc<str>,
    /// Line following the class doc comment.
    pub line: usize,
    pub text: String,
    pub comments: Vec<String>,
    /// The class block's own tags, `@class` removed.
    pub tags: TagMap,
    pub methods: BTreeMap<String, Member>,
    pub properties: BTreeMap<String, Member>,
}

/// namespace → class → entry. The root namespace is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymbolTree {
    pub namespaces: BTreeMap<String, BTreeMap<String, ClassEntry>>,
}

impl SymbolTree {
    pub fn class(&self, namespace: &str, name: &str) -> Option<&ClassEntry> {
        self.namespaces.get(namespace)?.get(name)
    }

    pub fn class_count(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> DocBlock {
        let mut b = DocBlock::new(Arc::from("a.php"), 1);
        b.text = text.to_string();
        b
    }

    #[test]
    fn title_and_description() {
        let b = block("Parse a file.\n\n- Extract DocBlocks.\n- Tokenize DocBlocks.");
        assert_eq!(b.title(), Some("Parse a file."));
        assert_eq!(
            b.description(),
            Some("- Extract DocBlocks.\n- Tokenize DocBlocks.")
        );
        assert_eq!(block("One liner.").description(), None);
        assert_eq!(block("").title(), None);
    }

    #[test]
    fn set_line_by_bound() {
        let mut b = block("");
        b.set_line(LineBound::To, 9);
        b.set_line(LineBound::From, 3);
        assert_eq!((b.from_line, b.to_line), (3, 9));
    }

    #[test]
    fn tag_values_serialize_as_json() {
        let flag = TagValue::Flag;
        assert_eq!(serde_json::to_string(&flag).unwrap(), "true");

        let params = TagValue::Params(Params::new(vec![
            ("type".into(), "string".into()),
            ("name".into(), "$name".into()),
        ]));
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"type":"string","name":"$name"}"#
        );
    }
}
