//! Platform identifiers.
//!
//! Chat platforms hand out opaque ids (Discord snowflakes, Slack ids); they
//! are carried as strings and never interpreted by the core.

use serde::{Deserialize, Serialize};

/// Identifier of a guild (workspace).
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct GuildId(String);

/// Identifier of a conversation: a guild channel or a private channel.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct ContextId(String);

/// Identifier of a user.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct UserId(String);

macro_rules! string_id {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                /// Borrow the raw id.
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl From<String> for $ty {
                fn from(id: String) -> Self {
                    Self(id)
                }
            }

            impl From<&str> for $ty {
                fn from(id: &str) -> Self {
                    Self(id.to_string())
                }
            }
        )*
    };
}

string_id!(GuildId, ContextId, UserId);

/// A message the bot sent, as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    /// Conversation the message lives in
    pub context_id: ContextId,
    /// Platform message id
    pub message_id: String,
}

impl MessageHandle {
    /// Create a new handle.
    pub fn new(context_id: impl Into<ContextId>, message_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            message_id: message_id.into(),
        }
    }
}
