//! The ordered, in-memory collection of annotation records.

use super::ids::{OwnerId, TagId};
use super::record::AnnotationRecord;
use crate::error::StoreError;

/// Authoritative annotation data, in insertion order.
///
/// Every mutation keeps two invariants: identifiers are unique, and every
/// stored position has `x1 >= x` and `y1 >= y`. Lookups are linear scans;
/// the number of annotations on one surface is small.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationStore {
    records: Vec<AnnotationRecord>,
}

impl AnnotationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record.
    ///
    /// # Errors
    /// Rejects duplicate identifiers and inverted or non-finite positions;
    /// the store is left untouched.
    pub fn insert(&mut self, record: AnnotationRecord) -> Result<(), StoreError> {
        if self.contains(&record.identifier) {
            return Err(StoreError::DuplicateIdentifier(record.identifier));
        }
        if !record.position.is_finite() || !record.position.is_ordered() {
            return Err(StoreError::InvalidPosition(record.identifier));
        }
        self.records.push(record);
        Ok(())
    }

    /// Returns true if a record with this identifier exists.
    pub fn contains(&self, owner: &OwnerId) -> bool {
        self.records.iter().any(|r| &r.identifier == owner)
    }

    /// Looks up a record by identifier.
    pub fn get(&self, owner: &OwnerId) -> Option<&AnnotationRecord> {
        self.records.iter().find(|r| &r.identifier == owner)
    }

    /// First record carrying `tag_id` and owned by `owner`.
    pub fn find_by_tag_and_owner(
        &self,
        tag_id: &TagId,
        owner: &OwnerId,
    ) -> Option<&AnnotationRecord> {
        self.records
            .iter()
            .find(|r| &r.tag_id == tag_id && &r.identifier == owner)
    }

    /// First record carrying `tag_id`, regardless of owner.
    pub fn find_by_tag(&self, tag_id: &TagId) -> Option<&AnnotationRecord> {
        self.records.iter().find(|r| &r.tag_id == tag_id)
    }

    /// Applies `mutator` to every record matching `predicate` and returns
    /// how many records changed.
    ///
    /// The identifier is restored after mutation, and a mutation that would
    /// leave an inverted or non-finite position is discarded for that record.
    pub fn update_in_place<P, M>(&mut self, mut predicate: P, mut mutator: M) -> usize
    where
        P: FnMut(&AnnotationRecord) -> bool,
        M: FnMut(&mut AnnotationRecord),
    {
        let mut updated = 0;
        for record in self.records.iter_mut().filter(|r| predicate(r)) {
            let mut next = record.clone();
            mutator(&mut next);
            next.identifier = record.identifier.clone();
            if !next.position.is_finite() || !next.position.is_ordered() {
                log::warn!(
                    "discarding update of {}: position {:?} is not a valid rectangle",
                    record.identifier,
                    next.position
                );
                continue;
            }
            *record = next;
            updated += 1;
        }
        updated
    }

    /// Removes the record owned by `owner`, returning it.
    pub fn remove_by_owner(&mut self, owner: &OwnerId) -> Option<AnnotationRecord> {
        let index = self.records.iter().position(|r| &r.identifier == owner)?;
        Some(self.records.remove(index))
    }

    /// Removes every record.
    pub fn reset(&mut self) {
        self.records.clear();
    }
}
