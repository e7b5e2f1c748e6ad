//! CollabSpace domain core.
//!
//! Pure domain logic shared by the persistence and HTTP layers: closed
//! status/priority/role enums, task status transitions, statistics rollups,
//! gamification, dashboard aggregation, and access predicates. This crate
//! has no database or HTTP dependencies; callers pass pre-loaded data in.

#[macro_use]
mod macros;

pub mod access;
pub mod comment;
pub mod dashboard;
pub mod error;
pub mod gamification;
pub mod notification;
pub mod priority;
pub mod project;
pub mod roles;
pub mod stats;
pub mod task;
pub mod team;
pub mod types;
pub mod user;
