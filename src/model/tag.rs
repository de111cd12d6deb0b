//! Structured tags and caller-supplied tag payloads.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::ids::{OwnerId, TagId};

/// Payload keys that carry tag identity rather than extra metadata.
const TAG_ID_KEYS: [&str; 2] = ["tag", "tagId"];
const TAG_NAME_KEY: &str = "tagName";

/// Record-level keys a payload can never overwrite through its extras.
const RESERVED_KEYS: [&str; 6] = ["tag", "tagId", "tagName", "position", "identifier", "uuid"];

/// A semantic label: an id, a display name, and open caller metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub extra: BTreeMap<String, Value>,
}

impl Tag {
    /// Creates a tag with no extra metadata.
    pub fn new(id: impl Into<TagId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: BTreeMap::new(),
        }
    }

    /// A tag whose id and display name are the same text.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(TagId::new(text.clone()), text)
    }

    /// The synthetic tag of an unlabelled annotation.
    ///
    /// The display name mirrors the id unless `display_name` is given.
    pub fn placeholder(owner: &OwnerId, display_name: Option<&str>) -> Self {
        let id = TagId::placeholder(owner);
        let name = display_name
            .map(str::to_string)
            .unwrap_or_else(|| id.as_str().to_string());
        Self::new(id, name)
    }

    /// Adds an extra metadata entry.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A tag argument as supplied by a caller.
///
/// Mirrors the loosely typed inputs callers hand over: a bare string, a
/// structured object, or anything else (which falls back to the placeholder).
#[derive(Clone, Debug, PartialEq)]
pub enum TagInput {
    /// Sets both id and display name.
    Text(String),
    /// `tag`/`tagId` and `tagName` plus arbitrary extra fields.
    Payload(Map<String, Value>),
    /// Neither a string nor an object.
    Malformed(Value),
}

impl TagInput {
    /// Classifies an arbitrary JSON value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => TagInput::Text(text),
            Value::Object(map) => TagInput::Payload(map),
            other => TagInput::Malformed(other),
        }
    }

    /// Resolves the input into a concrete tag for the annotation `owner`.
    ///
    /// Missing ids fall back to the placeholder; missing display names
    /// mirror the id. Reserved record keys are dropped from the extras.
    pub fn resolve(self, owner: &OwnerId, placeholder_name: Option<&str>) -> Tag {
        match self {
            TagInput::Text(text) if !text.is_empty() => Tag::text(text),
            TagInput::Text(_) => Tag::placeholder(owner, placeholder_name),
            TagInput::Payload(map) => resolve_payload(map, owner, placeholder_name),
            TagInput::Malformed(value) => {
                log::warn!(
                    "tag payload {} is neither a string nor an object, using placeholder",
                    value
                );
                Tag::placeholder(owner, placeholder_name)
            }
        }
    }
}

impl From<&str> for TagInput {
    fn from(text: &str) -> Self {
        TagInput::Text(text.to_string())
    }
}

impl From<String> for TagInput {
    fn from(text: String) -> Self {
        TagInput::Text(text)
    }
}

impl From<Tag> for TagInput {
    fn from(tag: Tag) -> Self {
        let mut map: Map<String, Value> = tag.extra.into_iter().collect();
        map.insert("tag".into(), Value::String(tag.id.as_str().to_string()));
        map.insert(TAG_NAME_KEY.into(), Value::String(tag.name));
        TagInput::Payload(map)
    }
}

fn resolve_payload(
    map: Map<String, Value>,
    owner: &OwnerId,
    placeholder_name: Option<&str>,
) -> Tag {
    let id = TAG_ID_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(scalar_text));
    let name = map.get(TAG_NAME_KEY).and_then(scalar_text);

    let mut tag = match (id, name) {
        (Some(id), Some(name)) => Tag::new(id, name),
        (Some(id), None) => Tag::text(id),
        (None, name) => {
            let mut tag = Tag::placeholder(owner, placeholder_name);
            if let Some(name) = name {
                tag.name = name;
            }
            tag
        }
    };

    tag.extra = map
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .collect();
    tag
}

/// Accepts strings and numbers as tag text; anything else is ignored.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
