//! Lifecycle callbacks fired by the engine.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::{AnnotationRecord, OwnerId, Percent, Rect};
use crate::movement::{MoveMode, Movement};

/// A snapshot of the movement bound to the current annotation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeometryHandle {
    pub owner: OwnerId,
    pub mode: MoveMode,
    pub rect: Rect<Percent>,
}

impl GeometryHandle {
    pub fn of<M: Movement>(movement: &M) -> Self {
        Self {
            owner: movement.owner().clone(),
            mode: movement.mode(),
            rect: movement.geometry(),
        }
    }
}

/// Receives lifecycle notifications. Every method defaults to a no-op.
///
/// Callbacks run synchronously inside the operation that triggered them and
/// only see shared borrows of engine state.
pub trait Listener {
    /// After any change to the stored records.
    fn on_updated(&mut self, _records: &[AnnotationRecord], _current: Option<&GeometryHandle>) {}

    /// When an annotation is selected by the user (or a non-silent call).
    ///
    /// `payload` is the current label's attributes overlaid with the matching
    /// record's exported fields.
    fn on_select(&mut self, _payload: &Map<String, Value>) {}

    /// Once per newly created annotation.
    fn on_draw_one(&mut self, _record: &AnnotationRecord, _current: &GeometryHandle) {}

    /// Once after a batch render.
    fn on_data_rendered(&mut self) {}

    /// When a pointer gesture starts (`true`) or ends (`false`).
    fn on_drag_active(&mut self, _active: bool) {}
}

impl Listener for () {}

/// A recorded lifecycle notification.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "event")]
pub enum LifecycleEvent {
    Updated {
        count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        current: Option<OwnerId>,
    },
    Selected {
        payload: Map<String, Value>,
    },
    DrawnOne {
        record: AnnotationRecord,
    },
    DataRendered,
    DragActive {
        active: bool,
    },
}

/// A listener that records every notification in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<LifecycleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `Updated` notifications seen so far.
    pub fn updated_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Updated { .. }))
            .count()
    }

    /// Number of `Selected` notifications seen so far.
    pub fn selected_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::Selected { .. }))
            .count()
    }

    /// Number of `DrawnOne` notifications seen so far.
    pub fn drawn_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::DrawnOne { .. }))
            .count()
    }

    /// Number of `DataRendered` notifications seen so far.
    pub fn rendered_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LifecycleEvent::DataRendered))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Listener for EventLog {
    fn on_updated(&mut self, records: &[AnnotationRecord], current: Option<&GeometryHandle>) {
        self.events.push(LifecycleEvent::Updated {
            count: records.len(),
            current: current.map(|c| c.owner.clone()),
        });
    }

    fn on_select(&mut self, payload: &Map<String, Value>) {
        self.events.push(LifecycleEvent::Selected {
            payload: payload.clone(),
        });
    }

    fn on_draw_one(&mut self, record: &AnnotationRecord, _current: &GeometryHandle) {
        self.events.push(LifecycleEvent::DrawnOne {
            record: record.clone(),
        });
    }

    fn on_data_rendered(&mut self) {
        self.events.push(LifecycleEvent::DataRendered);
    }

    fn on_drag_active(&mut self, active: bool) {
        self.events.push(LifecycleEvent::DragActive { active });
    }
}
