//! Permission elevation for inbound events.

use statbot_interface::{InboundEvent, PermissionLevel};
use tracing::{debug, instrument};

/// Derives a [`PermissionLevel`] from the role metadata the platform attached
/// to an event.
///
/// The policy is binary: an administrator-equivalent role yields
/// `administrator_level`, anything else yields [`PermissionLevel::BASE`].
/// Private conversations carry no roles and always get the base level.
#[derive(Debug, Clone, Copy)]
pub struct PermissionElevation {
    administrator_level: PermissionLevel,
}

impl PermissionElevation {
    /// Create an elevation policy granting `administrator_level` to admins.
    pub fn new(administrator_level: PermissionLevel) -> Self {
        Self {
            administrator_level,
        }
    }

    /// Compute the permission level for `event`.
    #[instrument(level = "debug", skip(self, event), fields(author_id = %event.author_id()))]
    pub fn compute_level(&self, event: &InboundEvent) -> PermissionLevel {
        if !event.is_group_context() {
            return PermissionLevel::BASE;
        }

        let level = if event.role_metadata().administrator {
            self.administrator_level
        } else {
            PermissionLevel::BASE
        };
        debug!(%level, "Computed permission level");
        level
    }
}

impl Default for PermissionElevation {
    fn default() -> Self {
        Self::new(PermissionLevel::ADMINISTRATOR)
    }
}
