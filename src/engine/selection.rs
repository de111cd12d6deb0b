//! Selection, retagging and removal of annotations.

use serde_json::{Map, Value};

use super::{Annotator, Listener};
use crate::model::{OwnerId, TagId, TagInput};
use crate::movement::{MoveMode, Movement, MovementFactory, MovementTarget};
use crate::surface::{Label, Surface};

impl<S, F, L> Annotator<S, F, L>
where
    S: Surface,
    F: MovementFactory,
    L: Listener,
{
    /// Marks the current annotation as selected.
    ///
    /// With `announce` set, the selection callback receives the tag label's
    /// attributes overlaid with the stored record.
    pub fn select(&mut self, announce: bool) {
        let Some(owner) = self.current_owner().cloned() else {
            return;
        };
        self.surface.set_selected(&owner, true);
        if self.options.blur_other_dots {
            self.surface.set_handles(&owner, self.selected_handles());
        }
        if announce {
            match self.selection_payload(&owner) {
                Some(payload) => self.listener.on_select(&payload),
                None => log::debug!("selected {} has no stored record", owner),
            }
        }
    }

    /// Clears the selected look of the current annotation.
    ///
    /// The annotation stays current.
    pub fn deselect(&mut self) {
        let Some(owner) = self.current_owner().cloned() else {
            return;
        };
        self.surface.set_selected(&owner, false);
        if self.options.blur_other_dots {
            self.surface.set_handles(&owner, self.resting_handles());
        }
    }

    /// Makes the annotation carrying `tag_id` current and selects it without
    /// announcing. Returns false if no record carries that tag.
    pub fn select_by_tag_id(&mut self, tag_id: &TagId) -> bool {
        let Some(owner) = self.store.find_by_tag(tag_id).map(|r| r.identifier.clone()) else {
            log::debug!("no annotation carries tag {}", tag_id);
            return false;
        };
        let Some(rect) = self.display_rect_of(&owner) else {
            return false;
        };

        self.deselect();
        self.gesture = None;
        let bounds = self.surface.bounds();
        let target = MovementTarget { owner, rect };
        self.current = Some(
            self.movements
                .begin(target, MoveMode::SelectOnly, bounds, &self.options),
        );
        self.select(false);
        true
    }

    /// Replaces the tag of the current annotation.
    ///
    /// Returns false, without any callback, when there is no current
    /// annotation or its record is gone.
    pub fn retag(&mut self, input: impl Into<TagInput>) -> bool {
        let Some(owner) = self.current_owner().cloned() else {
            log::debug!("retag without a current annotation");
            return false;
        };
        let Some(old_tag) = self.store.get(&owner).map(|r| r.tag_id.clone()) else {
            log::debug!("retag of {} which has no stored record", owner);
            return false;
        };

        let tag = self.resolve_tag(Some(input.into()), &owner);
        self.store.update_in_place(
            |r| r.tag_id == old_tag && r.identifier == owner,
            |r| r.apply_tag(tag.clone()),
        );

        if let Some(record) = self.store.get(&owner) {
            self.surface.set_label(&owner, Label::from_tag(&record.tag()));
        }
        self.listener.on_updated(self.store.records(), None);
        true
    }

    /// Deletes the annotation owned by `owner`.
    ///
    /// Does nothing when annotations are not editable. The overlay is
    /// removed even if the store had no record for it. Returns true if a
    /// record was deleted.
    pub fn remove(&mut self, owner: &OwnerId) -> bool {
        if !self.options.editable {
            log::debug!("ignoring removal of {} on a read-only surface", owner);
            return false;
        }

        let removed = self.store.remove_by_owner(owner).is_some();
        if removed {
            self.listener.on_updated(self.store.records(), None);
        } else {
            log::debug!("removal of {} found no stored record", owner);
        }
        if self.current_owner() == Some(owner) {
            self.current = None;
            self.gesture = None;
        }
        self.surface.remove(owner);
        removed
    }

    /// Deletes the current annotation, if any.
    pub fn remove_current(&mut self) -> bool {
        match self.current_owner().cloned() {
            Some(owner) => self.remove(&owner),
            None => false,
        }
    }

    fn selection_payload(&self, owner: &OwnerId) -> Option<Map<String, Value>> {
        let record = self.store.get(owner)?;
        let mut payload: Map<String, Value> = Label::from_tag(&record.tag())
            .attributes
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        if let Ok(Value::Object(fields)) = serde_json::to_value(record) {
            payload.extend(fields);
        }
        Some(payload)
    }
}
