//! Newtype identifiers and identifier generation.
//!
//! Using newtypes prevents accidentally mixing up the owner identifier of an
//! annotation with the id of the tag assigned to it.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of generated owner identifiers, in hex characters.
const OWNER_ID_LEN: usize = 16;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// The unique identifier correlating a stored record with its overlay.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates a new OwnerId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.0)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        OwnerId::new(id)
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        OwnerId(id)
    }
}

/// The identifier of a tag (semantic label category).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    /// Creates a new TagId.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The synthetic tag assigned to an annotation nobody has labelled yet.
    pub fn placeholder(owner: &OwnerId) -> Self {
        Self(format!("temp@{}", owner))
    }

    /// Returns true if this is a synthetic placeholder tag.
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with("temp@")
    }
}

impl fmt::Debug for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagId({})", self.0)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(id: &str) -> Self {
        TagId::new(id)
    }
}

impl From<String> for TagId {
    fn from(id: String) -> Self {
        TagId(id)
    }
}

/// Source of fresh owner identifiers.
pub trait IdGenerator {
    /// Returns an identifier. Uniqueness against the store is checked by the
    /// caller; generators only need to make collisions unlikely.
    fn generate(&mut self) -> OwnerId;
}

/// Random 16-character hex identifiers.
#[derive(Debug, Default)]
pub struct RandomIds {
    rng: Option<StdRng>,
}

impl RandomIds {
    /// Identifiers drawn from the thread-local generator.
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// Reproducible identifiers from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IdGenerator for RandomIds {
    fn generate(&mut self) -> OwnerId {
        match self.rng.as_mut() {
            Some(rng) => random_hex_id(rng),
            None => random_hex_id(&mut rand::rng()),
        }
    }
}

fn random_hex_id<R: RngExt + ?Sized>(rng: &mut R) -> OwnerId {
    let id: String = (0..OWNER_ID_LEN)
        .map(|_| HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())] as char)
        .collect();
    OwnerId(id)
}

/// Deterministic `<prefix>-<n>` identifiers, used by session replays.
#[derive(Clone, Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&mut self) -> OwnerId {
        let id = OwnerId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
