//! Session Context
//!
//! Explicit per-session owner of the profile slots and the visible profile
//! count. Created on session start, discarded on session end, and passed to
//! every engine operation; there is no process-global state.

use crate::error::{CoreError, Result};
use crate::profile::ProfileState;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const MIN_PROFILES: usize = 3;
pub const MAX_PROFILES: usize = 10;
pub const DEFAULT_PROFILES: usize = 3;

/// Session-scoped state: profile slots plus the redraw revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Every slot ever created, in creation order ("Employé 1", "Employé 2", …).
    /// Slots past `visible_count` are retained but hidden.
    profiles: Vec<ProfileState>,
    visible_count: usize,
    /// Monotonic counter bumped by every successful mutation; synchronous
    /// front-ends poll it to decide when to redraw.
    revision: u64,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILES)
    }
}

impl SessionContext {
    /// Create a session with `count` profile slots, clamped to
    /// [`MIN_PROFILES`, `MAX_PROFILES`].
    pub fn new(count: usize) -> Self {
        let mut ctx = Self { profiles: Vec::new(), visible_count: 0, revision: 0 };
        ctx.set_profile_count(count);
        ctx
    }

    // ========================
    // Profile Slots
    // ========================

    /// Clamp and apply a new visible profile count; returns the applied value.
    ///
    /// Raising the count lazily creates the missing slots. Lowering it only
    /// shrinks the visible prefix: profiles already created keep their state
    /// and reappear if the count is raised again.
    pub fn set_profile_count(&mut self, count: usize) -> usize {
        let clamped = count.clamp(MIN_PROFILES, MAX_PROFILES);
        if clamped != count {
            warn!("profile count {} out of range, clamped to {}", count, clamped);
        }

        let mut changed = clamped != self.visible_count;
        while self.profiles.len() < clamped {
            let number = self.profiles.len() + 1;
            debug!("creating profile slot {}", number);
            self.profiles.push(ProfileState::new(format!("Employé {}", number)));
            changed = true;
        }

        self.visible_count = clamped;
        if changed {
            self.mark_changed();
        }
        clamped
    }

    /// Number of visible (selectable) profiles.
    pub fn profile_count(&self) -> usize {
        self.visible_count
    }

    /// The visible profiles, in slot order.
    pub fn visible_profiles(&self) -> &[ProfileState] {
        &self.profiles[..self.visible_count]
    }

    /// A visible profile by slot (0-based).
    pub fn profile(&self, slot: usize) -> Result<&ProfileState> {
        self.profiles[..self.visible_count].get(slot).ok_or(CoreError::UnknownProfile(slot))
    }

    pub(crate) fn profile_mut(&mut self, slot: usize) -> Result<&mut ProfileState> {
        let visible = self.visible_count;
        self.profiles[..visible].get_mut(slot).ok_or(CoreError::UnknownProfile(slot))
    }

    // ========================
    // Redraw Signal
    // ========================

    /// Current redraw revision. Only successful mutations move it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn mark_changed(&mut self) {
        self.revision += 1;
    }
}
