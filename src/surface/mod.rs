//! The visual surface annotations are drawn on.
//!
//! The engine owns the data; a [`Surface`] owns the overlays that show it.
//! Everything the engine tells a surface goes through plain value types
//! ([`Overlay`], [`Label`], [`HandleVisibility`]) so hosts can map them to
//! whatever widget or markup they render with.

mod headless;

pub use headless::{HeadlessSurface, HANDLE_HIT_RADIUS};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::engine::{Options, TagLocation};
use crate::model::{Bounds, OwnerId, Percent, Rect, Tag};
use crate::movement::Handle;

/// Which parts of an overlay's chrome are shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleVisibility {
    /// All eight resize handles plus the tag/delete control.
    All,
    /// Only the tag/delete control.
    ControlsOnly,
    /// Nothing but the rectangle itself.
    Hidden,
}

/// Order of the delete control and the tag label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlOrder {
    LabelFirst,
    DeleteFirst,
}

/// How the tag/delete control is laid out around an overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlLayout {
    pub order: ControlOrder,
    pub location: TagLocation,
}

impl ControlLayout {
    pub fn from_options(options: &Options) -> Self {
        Self {
            order: if options.trash_position_start {
                ControlOrder::DeleteFirst
            } else {
                ControlOrder::LabelFirst
            },
            location: options.tag_location,
        }
    }
}

/// Display text and string attributes of an overlay's tag label.
///
/// This is the translation step between structured tags and whatever
/// attribute mechanism a surface has: `id` and `name` carry the tag id and
/// display name, extra metadata is rendered to strings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub attributes: BTreeMap<String, String>,
}

impl Label {
    pub fn from_tag(tag: &Tag) -> Self {
        let mut attributes: BTreeMap<String, String> = tag
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), attribute_text(value)))
            .collect();
        attributes.insert("id".into(), tag.id.as_str().to_string());
        attributes.insert("name".into(), tag.name.clone());
        Self {
            text: tag.name.clone(),
            attributes,
        }
    }

    /// The tag id this label carries.
    pub fn tag_id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }
}

fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Everything needed to materialize one overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub owner: OwnerId,
    pub rect: Rect<Percent>,
    pub class: String,
    pub label: Label,
    pub handles: HandleVisibility,
    pub layout: ControlLayout,
    pub selected: bool,
}

/// What a pointer-down landed on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum PointerTarget {
    /// A resize handle of an overlay.
    Handle { owner: OwnerId, handle: Handle },
    /// The body of an overlay.
    Body { owner: OwnerId },
    /// Neither; empty surface or unrelated chrome.
    Empty,
}

/// The host's visual surface.
///
/// Overlay geometry is expressed in surface percentages. Calls naming an
/// owner the surface does not know are ignored.
pub trait Surface {
    /// The surface's bounding box, in the frame pointer events use.
    fn bounds(&self) -> Bounds;

    /// Creates the overlay, replacing any existing one for the same owner.
    fn materialize(&mut self, overlay: Overlay);

    fn set_geometry(&mut self, owner: &OwnerId, rect: Rect<Percent>);

    fn set_selected(&mut self, owner: &OwnerId, selected: bool);

    fn set_handles(&mut self, owner: &OwnerId, visibility: HandleVisibility);

    fn set_label(&mut self, owner: &OwnerId, label: Label);

    fn remove(&mut self, owner: &OwnerId);

    /// Removes every overlay.
    fn clear(&mut self);
}
