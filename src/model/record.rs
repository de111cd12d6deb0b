//! Annotation records: the in-memory shape and its export form.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::coord::{Coord, Unit};
use super::ids::{OwnerId, TagId};
use super::rect::Rect;
use super::space::{Percent, Pixel};
use super::tag::{Tag, TagInput};

/// A stored rectangle: top-left `x`, `y` and bottom-right `x1`, `y1`.
///
/// `x1`/`y1` are corners, not width/height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
    pub x1: Coord,
    pub y1: Coord,
}

impl Position {
    /// A position whose four coordinates are percentages.
    pub fn from_percent(rect: Rect<Percent>) -> Self {
        Self {
            x: Coord::percent(rect.x),
            y: Coord::percent(rect.y),
            x1: Coord::percent(rect.x1),
            y1: Coord::percent(rect.y1),
        }
    }

    /// A position whose four coordinates are pixels.
    pub fn from_pixels(rect: Rect<Pixel>) -> Self {
        Self {
            x: Coord::pixel(rect.x),
            y: Coord::pixel(rect.y),
            x1: Coord::pixel(rect.x1),
            y1: Coord::pixel(rect.y1),
        }
    }

    /// The unit of the position, decided by its `x` coordinate.
    ///
    /// Mixed-unit positions are not supported; the other fields are assumed
    /// to share the unit of `x`.
    pub fn unit(&self) -> Unit {
        self.x.unit
    }

    /// Returns true if every coordinate shares the same unit.
    pub fn has_uniform_unit(&self) -> bool {
        let unit = self.unit();
        self.y.unit == unit && self.x1.unit == unit && self.y1.unit == unit
    }

    /// Returns true if all coordinate values are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Returns true if `x1 >= x` and `y1 >= y`.
    pub fn is_ordered(&self) -> bool {
        self.x1.value >= self.x.value && self.y1.value >= self.y.value
    }

    /// Raw `x1 - x`, in the position's unit.
    pub fn width(&self) -> f64 {
        self.x1.value - self.x.value
    }

    /// Raw `y1 - y`, in the position's unit.
    pub fn height(&self) -> f64 {
        self.y1.value - self.y.value
    }

    /// Reinterprets the raw values as a percentage rectangle.
    pub(crate) fn raw_percent(&self) -> Rect<Percent> {
        Rect::from_xyxy(self.x.value, self.y.value, self.x1.value, self.y1.value)
    }

    /// Reinterprets the raw values as a pixel rectangle.
    pub(crate) fn raw_pixels(&self) -> Rect<Pixel> {
        Rect::from_xyxy(self.x.value, self.y.value, self.x1.value, self.y1.value)
    }
}

/// One annotation: identifier, tag, position and caller metadata.
///
/// The exported JSON uses `identifier`, `tagId`, `tagName` and `position`,
/// with extra tag fields flattened alongside them. `uuid` and `tag` are
/// accepted as input aliases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    /// Unique, immutable for the record's lifetime.
    #[serde(alias = "uuid")]
    pub identifier: OwnerId,

    #[serde(alias = "tag")]
    pub tag_id: TagId,

    pub tag_name: String,

    pub position: Position,

    /// Caller-supplied fields carried verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl AnnotationRecord {
    /// Creates a record from its parts.
    pub fn new(identifier: OwnerId, tag: Tag, position: Position) -> Self {
        Self {
            identifier,
            tag_id: tag.id,
            tag_name: tag.name,
            position,
            extra: tag.extra,
        }
    }

    /// The record's tag, including extra metadata.
    pub fn tag(&self) -> Tag {
        Tag {
            id: self.tag_id.clone(),
            name: self.tag_name.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Rewrites id and display name and merges the tag's extras on top of
    /// the existing ones.
    pub fn apply_tag(&mut self, tag: Tag) {
        self.tag_id = tag.id;
        self.tag_name = tag.name;
        self.extra.extend(tag.extra);
    }
}

/// A record as supplied to a batch render.
///
/// Only `position` is required; a missing identifier is generated and a
/// missing tag falls back to the placeholder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    #[serde(default, alias = "uuid", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<OwnerId>,

    #[serde(default, alias = "tag", skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<TagId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    pub position: Position,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RecordInput {
    /// A bare input with only a position.
    pub fn new(position: Position) -> Self {
        Self {
            identifier: None,
            tag_id: None,
            tag_name: None,
            position,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the tag id and display name.
    pub fn with_tag(mut self, id: impl Into<TagId>, name: impl Into<String>) -> Self {
        self.tag_id = Some(id.into());
        self.tag_name = Some(name.into());
        self
    }

    /// Sets the identifier.
    pub fn with_identifier(mut self, identifier: impl Into<OwnerId>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// The tag payload carried by this input, if it names a tag at all.
    pub fn tag_input(&self) -> Option<TagInput> {
        if self.tag_id.is_none() && self.tag_name.is_none() && self.extra.is_empty() {
            return None;
        }
        let mut map: serde_json::Map<String, Value> = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(id) = &self.tag_id {
            map.insert("tag".into(), Value::String(id.as_str().to_string()));
        }
        if let Some(name) = &self.tag_name {
            map.insert("tagName".into(), Value::String(name.clone()));
        }
        Some(TagInput::Payload(map))
    }
}

impl From<AnnotationRecord> for RecordInput {
    fn from(record: AnnotationRecord) -> Self {
        Self {
            identifier: Some(record.identifier),
            tag_id: Some(record.tag_id),
            tag_name: Some(record.tag_name),
            position: record.position,
            extra: record.extra,
        }
    }
}
