//! End-to-end interaction scenarios through the public API.

use annorect::engine::{
    Annotator, EventLog, HeadlessAnnotator, LifecycleEvent, Options, OptionsPatch, PointerEvent,
    PointerPhase,
};
use annorect::model::{
    Bounds, CandidateRect, OwnerId, Percent, Position, Rect, RecordInput, SequentialIds, TagId,
    TagInput,
};
use annorect::movement::{MoveMode, Movement, MovementFactory, MovementTarget};
use annorect::surface::{HandleVisibility, Label, Overlay, PointerTarget, Surface};
use serde_json::json;

fn annotator() -> HeadlessAnnotator<EventLog> {
    Annotator::headless(
        Bounds::new(0.0, 0.0, 200.0, 100.0),
        Options::default(),
        EventLog::new(),
    )
    .with_id_generator(SequentialIds::new("t"))
}

fn export(a: &HeadlessAnnotator<EventLog>) -> serde_json::Value {
    serde_json::to_value(a.records()).unwrap()
}

#[test]
fn drag_create_on_200_by_100_surface() {
    let mut a = annotator();
    a.create(CandidateRect::pixels(20.0, 10.0, 40.0, 20.0), None)
        .unwrap();

    let json = export(&a);
    assert_eq!(
        json[0]["position"],
        json!({"x": "10.000%", "y": "10.000%", "x1": "30.000%", "y1": "30.000%"})
    );
}

#[test]
fn degenerate_rectangles_fire_nothing() {
    let mut a = annotator();
    for candidate in [
        CandidateRect::pixels(20.0, 10.0, 1.0, 20.0),
        CandidateRect::pixels(20.0, 10.0, 20.0, 1.0),
        CandidateRect::percent(5.0, 5.0, 0.5, 10.0),
    ] {
        assert!(a.create(candidate, None).is_none());
    }
    assert!(a.records().is_empty());
    assert!(a.listener().events.is_empty());
}

#[test]
fn render_empty_list_clears_and_fires_once() {
    let mut a = annotator();
    a.render_all(
        vec![
            RecordInput::new(Position::from_percent(Rect::from_xyxy(1.0, 1.0, 20.0, 20.0))),
            RecordInput::new(Position::from_percent(Rect::from_xyxy(30.0, 1.0, 50.0, 20.0))),
        ],
        None,
    );
    a.listener_mut().clear();

    a.render_all(Vec::new(), None);
    assert!(a.records().is_empty());
    assert_eq!(a.listener().rendered_count(), 1);
}

#[test]
fn select_missing_tag_is_silent_noop() {
    let mut a = annotator();
    a.create(CandidateRect::pixels(20.0, 10.0, 40.0, 20.0), None)
        .unwrap();
    a.listener_mut().clear();

    assert!(!a.select_by_tag_id(&TagId::new("nope")));
    assert!(a.listener().events.is_empty());
}

#[test]
fn retag_with_current_tag_keeps_record() {
    let mut a = annotator();
    a.create(
        CandidateRect::pixels(20.0, 10.0, 40.0, 20.0),
        Some(TagInput::from_value(
            json!({"tag": "cat", "tagName": "Cat", "source": "model"}),
        )),
    )
    .unwrap();
    let before = export(&a);
    a.listener_mut().clear();

    a.retag(TagInput::from_value(json!({"tag": "cat", "tagName": "Cat"})));
    assert_eq!(export(&a), before);
    assert_eq!(a.listener().updated_count(), 1);
}

#[test]
fn deletion_removes_exactly_one() {
    let mut a = annotator();
    let first = a
        .create(CandidateRect::pixels(20.0, 10.0, 40.0, 20.0), None)
        .unwrap();
    a.create(CandidateRect::pixels(100.0, 10.0, 40.0, 20.0), None)
        .unwrap();

    assert!(a.remove(&first));
    assert_eq!(a.records().len(), 1);
    assert_eq!(a.records()[0].identifier.as_str(), "t-2");

    a.set_options(&OptionsPatch {
        editable: Some(false),
        ..OptionsPatch::default()
    });
    assert!(!a.remove(&OwnerId::new("t-2")));
    assert_eq!(a.records().len(), 1);
}

#[test]
fn dom_event_names_drive_a_gesture() {
    let mut a = annotator();
    a.create(CandidateRect::pixels(20.0, 10.0, 40.0, 20.0), None)
        .unwrap();

    let events = [
        ("touchstart", 30.0, 20.0),
        ("touchmove", 50.0, 30.0),
        ("touchcancel", 50.0, 30.0),
    ];
    for (name, x, y) in events {
        let phase = PointerPhase::from_event_type(name).unwrap();
        let target = match phase {
            PointerPhase::Down => a.surface().hit_test(x, y),
            _ => PointerTarget::Empty,
        };
        a.handle_pointer(&PointerEvent {
            phase,
            x,
            y,
            target,
            timestamp_ms: 0,
        });
    }

    let json = export(&a);
    assert_eq!(json[0]["position"]["x"], "20.000%");
    assert_eq!(json[0]["position"]["y"], "20.000%");
}

#[test]
fn lost_pointer_up_does_not_wedge() {
    let mut a = annotator();
    let owner = a
        .create(CandidateRect::pixels(20.0, 10.0, 40.0, 20.0), None)
        .unwrap();

    a.handle_pointer(&PointerEvent::down(30.0, 20.0, PointerTarget::Body { owner }).at(0));
    a.handle_pointer(&PointerEvent::moved(40.0, 20.0).at(50));
    // No pointer-up. The next down, well after the timeout, finds the
    // machine idle with the gesture committed.
    a.handle_pointer(&PointerEvent::down(150.0, 80.0, PointerTarget::Empty).at(30_000));

    assert_eq!(export(&a)[0]["position"]["x"], "15.000%");
    let drag_events: Vec<&LifecycleEvent> = a
        .listener()
        .events
        .iter()
        .filter(|e| matches!(e, LifecycleEvent::DragActive { .. }))
        .collect();
    assert_eq!(
        drag_events,
        vec![
            &LifecycleEvent::DragActive { active: true },
            &LifecycleEvent::DragActive { active: false }
        ]
    );
}

/// A surface that only records what it is told.
#[derive(Default)]
struct RecordingSurface {
    calls: Vec<String>,
}

impl Surface for RecordingSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(10.0, 10.0, 400.0, 200.0)
    }

    fn materialize(&mut self, overlay: Overlay) {
        self.calls.push(format!(
            "materialize {} {} {:?}",
            overlay.owner, overlay.class, overlay.handles
        ));
    }

    fn set_geometry(&mut self, owner: &OwnerId, rect: Rect<Percent>) {
        self.calls.push(format!("geometry {} {}", owner, rect.x));
    }

    fn set_selected(&mut self, owner: &OwnerId, selected: bool) {
        self.calls.push(format!("selected {} {}", owner, selected));
    }

    fn set_handles(&mut self, owner: &OwnerId, visibility: HandleVisibility) {
        self.calls.push(format!("handles {} {:?}", owner, visibility));
    }

    fn set_label(&mut self, owner: &OwnerId, label: Label) {
        self.calls.push(format!("label {} {}", owner, label.text));
    }

    fn remove(&mut self, owner: &OwnerId) {
        self.calls.push(format!("remove {}", owner));
    }

    fn clear(&mut self) {
        self.calls.push("clear".to_string());
    }
}

/// Moves in whole-percent steps, ignoring resize handles.
struct SnappingMovement {
    owner: OwnerId,
    mode: MoveMode,
    rect: Rect<Percent>,
}

impl Movement for SnappingMovement {
    fn owner(&self) -> &OwnerId {
        &self.owner
    }

    fn mode(&self) -> MoveMode {
        self.mode
    }

    fn transform(&mut self, dx: f64, _dy: f64) {
        if self.mode == MoveMode::FreeMove {
            let step = (dx / 4.0).round();
            self.rect = Rect::from_xyxy(
                self.rect.x + step,
                self.rect.y,
                self.rect.x1 + step,
                self.rect.y1,
            );
        }
    }

    fn geometry(&self) -> Rect<Percent> {
        self.rect
    }
}

struct SnappingFactory;

impl MovementFactory for SnappingFactory {
    type Movement = SnappingMovement;

    fn begin(
        &mut self,
        target: MovementTarget,
        mode: MoveMode,
        _bounds: Bounds,
        _options: &Options,
    ) -> SnappingMovement {
        SnappingMovement {
            owner: target.owner,
            mode,
            rect: target.rect,
        }
    }
}

#[test]
fn custom_surface_and_movement() {
    let options = Options {
        annotation_class: "roi".to_string(),
        ..Options::default()
    };
    let mut a = Annotator::new(
        RecordingSurface::default(),
        SnappingFactory,
        EventLog::new(),
        options,
    )
    .with_id_generator(SequentialIds::new("c"));

    let owner = a
        .create(CandidateRect::percent(10.0, 10.0, 20.0, 20.0), None)
        .unwrap();
    assert_eq!(a.surface().calls, vec!["materialize c-1 roi All"]);

    a.handle_pointer(&PointerEvent::down(100.0, 50.0, PointerTarget::Body { owner }));
    a.handle_pointer(&PointerEvent::moved(120.0, 50.0));
    a.handle_pointer(&PointerEvent::up(120.0, 50.0));

    let json = serde_json::to_value(a.records()).unwrap();
    assert_eq!(json[0]["position"]["x"], "15.000%");
    assert!(a
        .surface()
        .calls
        .iter()
        .any(|c| c == "geometry c-1 15"));
}

