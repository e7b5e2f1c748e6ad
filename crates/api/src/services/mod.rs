//! Cross-entity side effects, called explicitly by the mutating handlers.
//!
//! - [`stats`] -- recompute denormalized project and team counters.
//! - [`gamification`] -- award completion points and announce level-ups.
//! - [`tasks`] -- everything that follows a task write.

pub mod gamification;
pub mod stats;
pub mod tasks;
