//! Headless session scripts.
//!
//! A [`Script`] describes a surface, options, an initial batch of records
//! and a list of [`Step`]s. [`replay`] runs the steps through an
//! [`Annotator`] on a [`HeadlessSurface`](crate::surface::HeadlessSurface) and returns the final records plus
//! every lifecycle notification, so whole interaction sessions can be
//! checked without a UI.
//!
//! ```
//! use annorect::script::{from_script_str, replay};
//!
//! let script = from_script_str(r#"{
//!     "surface": {"x": 0, "y": 0, "width": 200, "height": 100},
//!     "steps": [
//!         {"op": "draw", "rect": {"unit": "pixel", "x": 20, "y": 10, "width": 40, "height": 20}}
//!     ]
//! }"#).unwrap();
//!
//! let outcome = replay(&script);
//! assert_eq!(outcome.records.len(), 1);
//! assert_eq!(outcome.records[0].position.x.to_string(), "10.000%");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::engine::{
    Annotator, EventLog, HeadlessAnnotator, LifecycleEvent, Options, OptionsPatch, PointerEvent,
    PointerPhase, RenderReport,
};
use crate::error::AnnorectError;
use crate::model::{
    AnnotationRecord, Bounds, CandidateRect, OwnerId, RecordInput, SequentialIds, Size, TagId,
    TagInput,
};
use crate::surface::PointerTarget;

/// Prefix of generated identifiers when the script does not name one.
pub const DEFAULT_ID_PREFIX: &str = "ann";

/// A replayable interaction session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Bounding box of the surface, in the pointer frame.
    pub surface: Bounds,

    #[serde(default)]
    pub options: OptionsPatch,

    /// Records rendered before the first step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<RecordInput>,

    /// Size the initial records' pixel positions are measured against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_size: Option<Size>,

    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

fn default_id_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

/// One scripted action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "op")]
pub enum Step {
    /// A DOM-style pointer event (`mousedown`, `touchmove`, `pointerup`, ...).
    ///
    /// Without an explicit target, downs are hit-tested against the surface.
    Pointer {
        event: String,
        x: f64,
        y: f64,
        #[serde(default)]
        at: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<PointerTarget>,
    },
    /// A finished drag-to-create rectangle.
    Draw {
        rect: CandidateRect,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<Value>,
    },
    /// Retags the current annotation.
    Retag { tag: Value },
    /// Selects silently by tag id.
    #[serde(rename_all = "camelCase")]
    SelectTag { tag_id: TagId },
    /// Deletes by owner, or the current annotation.
    Delete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner: Option<OwnerId>,
    },
    /// A batch render; an empty list clears everything.
    #[serde(rename_all = "camelCase")]
    Render {
        #[serde(default)]
        records: Vec<RecordInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference_size: Option<Size>,
    },
    /// Advances the clock without pointer input.
    Tick { at: u64 },
    /// Merges an options patch.
    Options { patch: OptionsPatch },
    /// Moves or resizes the surface.
    Resize { bounds: Bounds },
}

/// A step that had no effect.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedStep {
    pub index: usize,
    pub reason: String,
}

/// Everything a replay produced.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ReplayOutcome {
    /// The store's records after the last step.
    pub records: Vec<AnnotationRecord>,
    /// Lifecycle notifications, in order.
    pub events: Vec<LifecycleEvent>,
    /// One report per batch render, the initial one included.
    pub renders: Vec<RenderReport>,
    pub skipped: Vec<SkippedStep>,
}

/// Reads a script from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_script_json(path: &Path) -> Result<Script, AnnorectError> {
    let file = File::open(path).map_err(AnnorectError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| AnnorectError::ScriptParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a script from a JSON string.
pub fn from_script_str(json: &str) -> Result<Script, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses a script from raw bytes.
pub fn from_script_slice(bytes: &[u8]) -> Result<Script, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Replays `script` on a fresh headless annotator.
pub fn replay(script: &Script) -> ReplayOutcome {
    let mut annotator: HeadlessAnnotator<EventLog> = Annotator::headless(
        script.surface,
        Options::with_patch(&script.options),
        EventLog::new(),
    )
    .with_id_generator(SequentialIds::new(script.id_prefix.clone()));

    let mut outcome = ReplayOutcome::default();
    if !script.records.is_empty() {
        outcome
            .renders
            .push(annotator.render_all(script.records.clone(), script.reference_size));
    }

    for (index, step) in script.steps.iter().enumerate() {
        if let Err(reason) = apply_step(&mut annotator, step, &mut outcome) {
            log::debug!("step {} had no effect: {}", index, reason);
            outcome.skipped.push(SkippedStep { index, reason });
        }
    }

    outcome.records = annotator.records().to_vec();
    outcome.events = std::mem::take(&mut annotator.listener_mut().events);
    outcome
}

fn apply_step(
    annotator: &mut HeadlessAnnotator<EventLog>,
    step: &Step,
    outcome: &mut ReplayOutcome,
) -> Result<(), String> {
    match step {
        Step::Pointer {
            event,
            x,
            y,
            at,
            target,
        } => {
            let phase = PointerPhase::from_event_type(event)
                .ok_or_else(|| format!("unknown pointer event '{}'", event))?;
            let target = match (phase, target) {
                (_, Some(target)) => target.clone(),
                (PointerPhase::Down, None) => annotator.surface().hit_test(*x, *y),
                (_, None) => PointerTarget::Empty,
            };
            annotator.handle_pointer(&PointerEvent {
                phase,
                x: *x,
                y: *y,
                target,
                timestamp_ms: *at,
            });
            Ok(())
        }
        Step::Draw { rect, tag } => annotator
            .create(*rect, tag.clone().map(TagInput::from_value))
            .map(|_| ())
            .ok_or_else(|| "rectangle rejected".to_string()),
        Step::Retag { tag } => annotator
            .retag(TagInput::from_value(tag.clone()))
            .then_some(())
            .ok_or_else(|| "no current annotation".to_string()),
        Step::SelectTag { tag_id } => annotator
            .select_by_tag_id(tag_id)
            .then_some(())
            .ok_or_else(|| format!("no annotation carries tag {}", tag_id)),
        Step::Delete { owner } => {
            let removed = match owner {
                Some(owner) => annotator.remove(owner),
                None => annotator.remove_current(),
            };
            removed
                .then_some(())
                .ok_or_else(|| "nothing was removed".to_string())
        }
        Step::Render {
            records,
            reference_size,
        } => {
            outcome
                .renders
                .push(annotator.render_all(records.clone(), *reference_size));
            Ok(())
        }
        Step::Tick { at } => {
            annotator.expire_stale_gesture(*at);
            Ok(())
        }
        Step::Options { patch } => {
            annotator.set_options(patch);
            Ok(())
        }
        Step::Resize { bounds } => {
            annotator.surface_mut().set_bounds(*bounds);
            Ok(())
        }
    }
}
