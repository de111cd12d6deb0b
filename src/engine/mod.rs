//! The annotation interaction engine.
//!
//! [`Annotator`] keeps the authoritative [`AnnotationStore`] consistent with
//! the overlays on a [`Surface`] while the user creates, moves, resizes,
//! tags, selects and deletes annotations.
//!
//! Pointer input drives a small state machine:
//!
//! - **Idle**: no gesture. A pointer-down starts *targeting*.
//! - **Targeting** (inside [`Annotator::handle_pointer`] on pointer-down):
//!   the previous selection is blurred, the event target is classified and a
//!   [`Movement`] is bound to it. Empty targets leave the machine idle.
//! - **Dragging**: pointer-moves that pass the bounds filter are forwarded to
//!   the movement as deltas from the last accepted position.
//! - **Committing** (on pointer-up, or when the gesture idles out): the
//!   movement's geometry is written back to the store, then the annotation is
//!   selected.
//!
//! Nothing here returns errors to the caller. Rejected input is logged and
//! shows up only as missing lifecycle callbacks.

mod listener;
mod options;
mod render;
mod selection;

pub use listener::{EventLog, GeometryHandle, LifecycleEvent, Listener};
pub use options::{
    read_options_json, Options, OptionsPatch, TagLocation, DEFAULT_GESTURE_TIMEOUT_MS,
};
pub use render::{RenderFailure, RenderIssue, RenderReport};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;
use crate::model::normalize;
use crate::model::{
    AnnotationRecord, AnnotationStore, Bounds, CandidateRect, IdGenerator, OwnerId, Percent,
    Position, RandomIds, Rect, Tag, TagId, TagInput,
};
use crate::movement::{MoveMode, Movement, MovementFactory, MovementTarget, RectMovementFactory};
use crate::surface::{
    ControlLayout, HandleVisibility, HeadlessSurface, Label, Overlay, PointerTarget, Surface,
};

/// Pointer positions this far past the surface's far edges are ignored.
pub const BOUNDS_MARGIN: f64 = 2.0;

/// Pointer positions with either coordinate below this are ignored.
pub const ORIGIN_DEAD_ZONE: f64 = 5.0;

/// How many fresh identifiers to draw before disambiguating by suffix.
const MAX_ID_ATTEMPTS: usize = 8;

/// The three phases of pointer input, after alias folding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

impl PointerPhase {
    /// Maps a DOM-style event name (mouse, touch or pointer) to its phase.
    ///
    /// Leave and cancel events end a gesture like an up.
    pub fn from_event_type(name: &str) -> Option<Self> {
        match name {
            "mousedown" | "touchstart" | "pointerdown" => Some(PointerPhase::Down),
            "mousemove" | "touchmove" | "pointermove" => Some(PointerPhase::Move),
            "mouseup" | "mouseleave" | "touchend" | "touchcancel" | "pointerup"
            | "pointercancel" | "pointerleave" => Some(PointerPhase::Up),
            _ => None,
        }
    }
}

/// One pointer event in the surface's coordinate frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: f64,
    pub y: f64,
    /// What the host's hit-test found under the pointer. Only read on down.
    pub target: PointerTarget,
    /// Host clock in milliseconds; drives idle-gesture expiry.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, target: PointerTarget) -> Self {
        Self {
            phase: PointerPhase::Down,
            x,
            y,
            target,
            timestamp_ms: 0,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
            y,
            target: PointerTarget::Empty,
            timestamp_ms: 0,
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Up,
            x,
            y,
            target: PointerTarget::Empty,
            timestamp_ms: 0,
        }
    }

    /// Sets the timestamp.
    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }
}

/// Whether a pointer gesture is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
}

impl fmt::Display for GesturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GesturePhase::Idle => write!(f, "idle"),
            GesturePhase::Dragging => write!(f, "dragging"),
        }
    }
}

/// Drag anchor of the gesture in flight.
#[derive(Clone, Copy, Debug)]
struct Gesture {
    last_x: f64,
    last_y: f64,
    last_activity_ms: u64,
}

/// Returns true if a pointer position may move geometry.
///
/// Rejects positions at or beyond the far edges plus [`BOUNDS_MARGIN`] and
/// positions inside the [`ORIGIN_DEAD_ZONE`].
pub fn passes_bounds_filter(bounds: &Bounds, x: f64, y: f64) -> bool {
    !(x >= bounds.x + bounds.width + BOUNDS_MARGIN
        || y >= bounds.y + bounds.height + BOUNDS_MARGIN
        || x < ORIGIN_DEAD_ZONE
        || y < ORIGIN_DEAD_ZONE)
}

/// An annotator on the in-memory surface with the default movement solver.
pub type HeadlessAnnotator<L = ()> = Annotator<HeadlessSurface, RectMovementFactory, L>;

/// The interaction engine for one surface.
pub struct Annotator<S, F, L = ()>
where
    F: MovementFactory,
{
    surface: S,
    movements: F,
    listener: L,
    ids: Box<dyn IdGenerator>,
    options: Options,
    store: AnnotationStore,
    /// The movement bound to the current annotation, if any.
    current: Option<F::Movement>,
    gesture: Option<Gesture>,
}

impl<L: Listener> Annotator<HeadlessSurface, RectMovementFactory, L> {
    /// An engine on a [`HeadlessSurface`] with the given bounds.
    pub fn headless(bounds: Bounds, options: Options, listener: L) -> Self {
        Annotator::new(
            HeadlessSurface::new(bounds),
            RectMovementFactory,
            listener,
            options,
        )
    }
}

impl<S, F, L> Annotator<S, F, L>
where
    S: Surface,
    F: MovementFactory,
    L: Listener,
{
    /// Creates an engine with random identifiers.
    pub fn new(surface: S, movements: F, listener: L, options: Options) -> Self {
        Self {
            surface,
            movements,
            listener,
            ids: Box::new(RandomIds::new()),
            options,
            store: AnnotationStore::new(),
            current: None,
            gesture: None,
        }
    }

    /// Replaces the identifier generator.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// All stored records, in insertion order.
    pub fn records(&self) -> &[AnnotationRecord] {
        self.store.records()
    }

    /// The record carrying `tag_id` and owned by `owner`.
    pub fn record_for(&self, tag_id: &TagId, owner: &OwnerId) -> Option<&AnnotationRecord> {
        self.store.find_by_tag_and_owner(tag_id, owner)
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Merges `patch` over the current options.
    pub fn set_options(&mut self, patch: &OptionsPatch) {
        self.options.merge(patch);
    }

    /// The owner of the current annotation, if any.
    pub fn current_owner(&self) -> Option<&OwnerId> {
        self.current.as_ref().map(|m| m.owner())
    }

    /// A snapshot of the current movement.
    pub fn current_geometry(&self) -> Option<GeometryHandle> {
        self.current.as_ref().map(GeometryHandle::of)
    }

    pub fn phase(&self) -> GesturePhase {
        if self.gesture.is_some() {
            GesturePhase::Dragging
        } else {
            GesturePhase::Idle
        }
    }

    /// Feeds one pointer event through the state machine.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        self.expire_stale_gesture(event.timestamp_ms);
        match event.phase {
            PointerPhase::Down => self.begin_gesture(event),
            PointerPhase::Move => self.drag(event),
            PointerPhase::Up => self.end_gesture(),
        }
    }

    /// Commits a gesture that has seen no pointer activity for longer than
    /// the configured timeout. Returns true if one was expired.
    pub fn expire_stale_gesture(&mut self, now_ms: u64) -> bool {
        let (Some(timeout), Some(gesture)) = (self.options.gesture_timeout_ms, self.gesture) else {
            return false;
        };
        if now_ms.saturating_sub(gesture.last_activity_ms) <= timeout {
            return false;
        }
        log::warn!(
            "gesture idle for {} ms without pointer-up, committing it",
            now_ms - gesture.last_activity_ms
        );
        self.gesture = None;
        self.listener.on_drag_active(false);
        self.commit();
        true
    }

    fn begin_gesture(&mut self, event: &PointerEvent) {
        self.deselect();
        if self.gesture.take().is_some() {
            log::debug!("pointer-down during a gesture, abandoning the previous one");
        }

        let (owner, mode) = match &event.target {
            PointerTarget::Handle { owner, handle } => (owner, MoveMode::Resize(*handle)),
            PointerTarget::Body { owner } => (owner, MoveMode::FreeMove),
            PointerTarget::Empty => {
                self.current = None;
                return;
            }
        };
        let Some(rect) = self.display_rect_of(owner) else {
            log::debug!("pointer-down on {} which has no stored record", owner);
            self.current = None;
            return;
        };

        let bounds = self.surface.bounds();
        let target = MovementTarget {
            owner: owner.clone(),
            rect,
        };
        self.current = Some(self.movements.begin(target, mode, bounds, &self.options));
        self.gesture = Some(Gesture {
            last_x: event.x,
            last_y: event.y,
            last_activity_ms: event.timestamp_ms,
        });
        self.listener.on_drag_active(true);
    }

    fn drag(&mut self, event: &PointerEvent) {
        let (Some(gesture), Some(movement)) = (self.gesture.as_mut(), self.current.as_mut()) else {
            log::trace!("pointer-move without a gesture at ({}, {})", event.x, event.y);
            return;
        };
        gesture.last_activity_ms = event.timestamp_ms;

        let bounds = self.surface.bounds();
        if !passes_bounds_filter(&bounds, event.x, event.y) {
            log::debug!("ignoring pointer-move outside bounds at ({}, {})", event.x, event.y);
            return;
        }

        movement.transform(event.x - gesture.last_x, event.y - gesture.last_y);
        gesture.last_x = event.x;
        gesture.last_y = event.y;
        self.surface
            .set_geometry(movement.owner(), movement.geometry());
    }

    /// Every pointer-up reports the drag as over, gesture or not.
    fn end_gesture(&mut self) {
        self.listener.on_drag_active(false);
        if self.gesture.take().is_none() {
            log::trace!("pointer-up without a gesture");
            return;
        }
        self.commit();
    }

    /// Writes the current movement's geometry into its record, then selects
    /// the annotation.
    fn commit(&mut self) {
        let Some(handle) = self.current_geometry() else {
            return;
        };
        let rect = normalize::round_rect(&handle.rect);
        let position = Position::from_percent(rect);
        let owner = handle.owner.clone();

        let updated = self
            .store
            .update_in_place(|r| r.identifier == owner, |r| r.position = position);
        if updated == 0 {
            log::warn!("gesture on {} ended but its record is gone", owner);
            self.current = None;
            return;
        }
        self.surface.set_geometry(&owner, rect);
        self.listener
            .on_updated(self.store.records(), Some(&handle));
        self.select(true);
    }

    /// Creates an annotation from a freshly drawn rectangle.
    ///
    /// Rectangles spanning one unit or less on either axis are rejected
    /// without any callback. Returns the new annotation's owner.
    pub fn create(&mut self, candidate: CandidateRect, tag: Option<TagInput>) -> Option<OwnerId> {
        let size = self.surface.bounds().size();
        let position = match normalize::candidate_position(&candidate, size) {
            Ok(position) => position,
            Err(err) => {
                log::warn!("rejecting drawn rectangle {:?}: {}", candidate, err);
                return None;
            }
        };
        let owner = self.fresh_identifier();
        let tag = self.resolve_tag(tag, &owner);
        match self.insert_annotation(owner, tag, position) {
            Ok(owner) => Some(owner),
            Err(err) => {
                log::warn!("rejecting drawn annotation: {}", err);
                None
            }
        }
    }

    /// Stores a new record, materializes its overlay and makes it current.
    ///
    /// `position` must already be in percentages.
    fn insert_annotation(
        &mut self,
        owner: OwnerId,
        tag: Tag,
        position: Position,
    ) -> Result<OwnerId, StoreError> {
        let rect = position.raw_percent();
        let label = Label::from_tag(&tag);
        self.store
            .insert(AnnotationRecord::new(owner.clone(), tag, position))?;

        self.deselect();
        self.gesture = None;
        self.surface.materialize(Overlay {
            owner: owner.clone(),
            rect,
            class: self.options.annotation_class.clone(),
            label,
            handles: self.selected_handles(),
            layout: ControlLayout::from_options(&self.options),
            selected: true,
        });

        let bounds = self.surface.bounds();
        let target = MovementTarget {
            owner: owner.clone(),
            rect,
        };
        let movement = self
            .movements
            .begin(target, MoveMode::SelectOnly, bounds, &self.options);
        let handle = GeometryHandle::of(&movement);
        self.current = Some(movement);

        self.listener.on_updated(self.store.records(), None);
        if let Some(record) = self.store.get(&owner) {
            self.listener.on_draw_one(record, &handle);
        }
        Ok(owner)
    }

    /// Removes every record and overlay and forgets the current annotation.
    pub fn reset(&mut self) {
        self.store.reset();
        self.surface.clear();
        self.current = None;
        self.gesture = None;
    }

    fn fresh_identifier(&mut self) -> OwnerId {
        let mut id = self.ids.generate();
        let mut attempts = 1;
        while self.store.contains(&id) {
            id = if attempts < MAX_ID_ATTEMPTS {
                self.ids.generate()
            } else {
                OwnerId::new(format!("{}-{}", id, attempts))
            };
            attempts += 1;
        }
        id
    }

    fn resolve_tag(&self, tag: Option<TagInput>, owner: &OwnerId) -> Tag {
        let placeholder = self.options.placeholder_tag_name.as_deref();
        match tag {
            Some(input) => input.resolve(owner, placeholder),
            None => Tag::placeholder(owner, placeholder),
        }
    }

    /// The stored geometry of `owner` as surface percentages.
    fn display_rect_of(&self, owner: &OwnerId) -> Option<Rect<Percent>> {
        let record = self.store.get(owner)?;
        normalize::display_rect(&record.position, self.surface.bounds().size()).ok()
    }

    /// Handle visibility of the current, selected annotation.
    fn selected_handles(&self) -> HandleVisibility {
        if self.options.editable {
            HandleVisibility::All
        } else {
            HandleVisibility::ControlsOnly
        }
    }

    /// Handle visibility of annotations that are not selected.
    fn resting_handles(&self) -> HandleVisibility {
        if !self.options.blur_other_dots {
            self.selected_handles()
        } else if self.options.blur_other_dots_show_tags {
            HandleVisibility::ControlsOnly
        } else {
            HandleVisibility::Hidden
        }
    }
}
