//! Engine configuration and runtime option patches.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::AnnorectError;

/// Default idle bound after which an abandoned gesture is committed.
pub const DEFAULT_GESTURE_TIMEOUT_MS: u64 = 10_000;

/// Where the tag label sits relative to its overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagLocation {
    /// Inside the overlay, along its top edge.
    #[default]
    InsideTop,
    /// Below the overlay, outside its bounds.
    OutsideBottom,
}

/// Options recognized by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Gates deletion and resize-handle visibility.
    pub editable: bool,

    /// Hide the handles of annotations that are not selected.
    pub blur_other_dots: bool,

    /// With `blur_other_dots`, keep the tag and delete control visible.
    pub blur_other_dots_show_tags: bool,

    /// Put the delete control before the tag label.
    pub trash_position_start: bool,

    pub tag_location: TagLocation,

    /// Class applied to every overlay.
    pub annotation_class: String,

    /// Idle bound for an in-flight gesture; `None` disables expiry.
    pub gesture_timeout_ms: Option<u64>,

    /// Display name of unlabelled annotations; mirrors the placeholder id
    /// when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_tag_name: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            editable: true,
            blur_other_dots: false,
            blur_other_dots_show_tags: false,
            trash_position_start: false,
            tag_location: TagLocation::InsideTop,
            annotation_class: "annotation".to_string(),
            gesture_timeout_ms: Some(DEFAULT_GESTURE_TIMEOUT_MS),
            placeholder_tag_name: None,
        }
    }
}

/// A partial set of options merged over the current ones.
///
/// Keys that are absent leave the current value untouched. For the two
/// optional settings an explicit `null` clears the value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_other_dots: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur_other_dots_show_tags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trash_position_start: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_location: Option<TagLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_class: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub gesture_timeout_ms: Option<Option<u64>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub placeholder_tag_name: Option<Option<String>>,
}

/// Distinguishes a present `null` (`Some(None)`) from an absent key (`None`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Options {
    /// Shallow-merges `patch` over these options.
    pub fn merge(&mut self, patch: &OptionsPatch) {
        if let Some(v) = patch.editable {
            self.editable = v;
        }
        if let Some(v) = patch.blur_other_dots {
            self.blur_other_dots = v;
        }
        if let Some(v) = patch.blur_other_dots_show_tags {
            self.blur_other_dots_show_tags = v;
        }
        if let Some(v) = patch.trash_position_start {
            self.trash_position_start = v;
        }
        if let Some(v) = patch.tag_location {
            self.tag_location = v;
        }
        if let Some(v) = &patch.annotation_class {
            self.annotation_class = v.clone();
        }
        if let Some(v) = patch.gesture_timeout_ms {
            self.gesture_timeout_ms = v;
        }
        if let Some(v) = &patch.placeholder_tag_name {
            self.placeholder_tag_name = v.clone();
        }
    }

    /// Returns the defaults with `patch` applied.
    pub fn with_patch(patch: &OptionsPatch) -> Self {
        let mut options = Self::default();
        options.merge(patch);
        options
    }
}

impl OptionsPatch {
    /// Lays `other` over this patch: keys present in `other` win.
    pub fn overlay(&mut self, other: &OptionsPatch) {
        fn pick<T: Clone>(slot: &mut Option<T>, other: &Option<T>) {
            if other.is_some() {
                slot.clone_from(other);
            }
        }
        pick(&mut self.editable, &other.editable);
        pick(&mut self.blur_other_dots, &other.blur_other_dots);
        pick(
            &mut self.blur_other_dots_show_tags,
            &other.blur_other_dots_show_tags,
        );
        pick(&mut self.trash_position_start, &other.trash_position_start);
        pick(&mut self.tag_location, &other.tag_location);
        pick(&mut self.annotation_class, &other.annotation_class);
        pick(&mut self.gesture_timeout_ms, &other.gesture_timeout_ms);
        pick(&mut self.placeholder_tag_name, &other.placeholder_tag_name);
    }
}

/// Reads an options patch from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_options_json(path: &Path) -> Result<OptionsPatch, AnnorectError> {
    let file = File::open(path).map_err(AnnorectError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| AnnorectError::OptionsParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert!(options.editable);
        assert!(!options.blur_other_dots);
        assert_eq!(options.annotation_class, "annotation");
        assert_eq!(options.gesture_timeout_ms, Some(DEFAULT_GESTURE_TIMEOUT_MS));
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: Options = serde_json::from_value(json!({
            "editable": false,
            "tagLocation": "outside-bottom"
        }))
        .unwrap();
        assert!(!options.editable);
        assert_eq!(options.tag_location, TagLocation::OutsideBottom);
        assert_eq!(options.annotation_class, "annotation");
    }

    #[test]
    fn test_merge_only_touches_present_keys() {
        let mut options = Options::default();
        let patch: OptionsPatch = serde_json::from_value(json!({
            "blurOtherDots": true,
            "annotationClass": "box"
        }))
        .unwrap();
        options.merge(&patch);
        assert!(options.blur_other_dots);
        assert!(options.editable);
        assert_eq!(options.annotation_class, "box");
        assert_eq!(options.gesture_timeout_ms, Some(DEFAULT_GESTURE_TIMEOUT_MS));
    }

    #[test]
    fn test_explicit_null_clears_timeout() {
        let patch: OptionsPatch =
            serde_json::from_value(json!({"gestureTimeoutMs": null})).unwrap();
        assert_eq!(patch.gesture_timeout_ms, Some(None));
        let options = Options::with_patch(&patch);
        assert_eq!(options.gesture_timeout_ms, None);

        let absent: OptionsPatch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.gesture_timeout_ms, None);
    }

    #[test]
    fn test_patch_overlay() {
        let mut base: OptionsPatch =
            serde_json::from_value(json!({"editable": false, "annotationClass": "box"})).unwrap();
        let top: OptionsPatch =
            serde_json::from_value(json!({"annotationClass": "roi", "gestureTimeoutMs": null}))
                .unwrap();
        base.overlay(&top);
        assert_eq!(base.editable, Some(false));
        assert_eq!(base.annotation_class.as_deref(), Some("roi"));
        assert_eq!(base.gesture_timeout_ms, Some(None));
    }

    #[test]
    fn test_read_options_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"editable": false}"#).expect("write options");
        let patch = read_options_json(&path).expect("read options");
        assert_eq!(patch.editable, Some(false));
    }
}
