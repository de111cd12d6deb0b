//! Batch rendering of externally supplied records.

use serde::Serialize;
use thiserror::Error;

use super::{Annotator, Listener};
use crate::error::{GeometryError, StoreError};
use crate::model::normalize;
use crate::model::{OwnerId, Position, RecordInput, Size};
use crate::movement::MovementFactory;
use crate::surface::{Label, Surface};

/// Why one record of a batch was skipped.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RenderFailure {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Serialize for RenderFailure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A skipped record and its position in the batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderIssue {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<OwnerId>,
    pub reason: RenderFailure,
}

/// What a batch render did.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderReport {
    /// Owners of newly materialized annotations, in batch order.
    pub created: Vec<OwnerId>,
    /// Owners of existing annotations that were updated in place.
    pub updated: Vec<OwnerId>,
    /// Records that could not be rendered.
    pub issues: Vec<RenderIssue>,
    /// Records dropped by an empty batch.
    pub cleared: usize,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl<S, F, L> Annotator<S, F, L>
where
    S: Surface,
    F: MovementFactory,
    L: Listener,
{
    /// Renders a batch of records.
    ///
    /// An empty batch clears every annotation. Otherwise each record is
    /// normalized against `reference` (or the surface's current size) and
    /// either updates the annotation with the same identifier or creates a
    /// new one. A record that fails is reported and skipped; the rest of the
    /// batch still renders. The render-complete callback fires exactly once.
    pub fn render_all(&mut self, records: Vec<RecordInput>, reference: Option<Size>) -> RenderReport {
        let mut report = RenderReport::default();

        if records.is_empty() {
            report.cleared = self.store.len();
            self.reset();
            if report.cleared > 0 {
                self.listener.on_updated(self.store.records(), None);
            }
            self.listener.on_data_rendered();
            return report;
        }

        let size = reference.unwrap_or_else(|| self.surface.bounds().size());
        for (index, input) in records.into_iter().enumerate() {
            let identifier = input.identifier.clone();
            match self.render_one(input, size) {
                Ok(Rendered::Created(owner)) => report.created.push(owner),
                Ok(Rendered::Updated(owner)) => report.updated.push(owner),
                Err(reason) => {
                    log::warn!("skipping record {} of batch: {}", index, reason);
                    report.issues.push(RenderIssue {
                        index,
                        identifier,
                        reason,
                    });
                }
            }
        }

        log::debug!(
            "rendered batch: {} created, {} updated, {} skipped",
            report.created.len(),
            report.updated.len(),
            report.issues.len()
        );
        self.listener.on_data_rendered();
        report
    }

    fn render_one(&mut self, input: RecordInput, size: Size) -> Result<Rendered, RenderFailure> {
        if !input.position.is_finite() {
            return Err(GeometryError::NonFinite.into());
        }
        let position = normalize::normalize_position(&input.position, size)?;
        if position.width() <= 1.0 || position.height() <= 1.0 {
            return Err(GeometryError::Degenerate {
                width: position.width(),
                height: position.height(),
            }
            .into());
        }

        match input.identifier.clone() {
            Some(owner) if self.store.contains(&owner) => {
                self.update_rendered(owner, &input, position)
            }
            identifier => {
                let owner = identifier.unwrap_or_else(|| self.fresh_identifier());
                let tag = self.resolve_tag(input.tag_input(), &owner);
                let owner = self.insert_annotation(owner, tag, position)?;
                Ok(Rendered::Created(owner))
            }
        }
    }

    fn update_rendered(
        &mut self,
        owner: OwnerId,
        input: &RecordInput,
        position: Position,
    ) -> Result<Rendered, RenderFailure> {
        let tag = input
            .tag_input()
            .map(|tag| tag.resolve(&owner, self.options.placeholder_tag_name.as_deref()));
        let updated = self.store.update_in_place(
            |r| r.identifier == owner,
            |r| {
                r.position = position;
                if let Some(tag) = &tag {
                    r.apply_tag(tag.clone());
                }
            },
        );
        if updated == 0 {
            return Err(StoreError::InvalidPosition(owner).into());
        }

        if let Some(record) = self.store.get(&owner) {
            self.surface.set_geometry(&owner, position.raw_percent());
            self.surface.set_label(&owner, Label::from_tag(&record.tag()));
        }
        self.listener.on_updated(self.store.records(), None);
        Ok(Rendered::Updated(owner))
    }
}

enum Rendered {
    Created(OwnerId),
    Updated(OwnerId),
}
