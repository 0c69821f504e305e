//! Permission levels.

use serde::{Deserialize, Serialize};

/// Integer tier attached to an event, gating which commands may run.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct PermissionLevel(u8);

impl PermissionLevel {
    /// Everyone, including private conversations.
    pub const BASE: Self = Self(0);
    /// Guild administrators.
    pub const ADMINISTRATOR: Self = Self(10);

    /// Wrap a raw level.
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Raw level.
    pub const fn get(self) -> u8 {
        self.0
    }
}
