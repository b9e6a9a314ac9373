//! Editing use-case services over the grid document.
//!
//! # Responsibility
//! - Funnel every grid mutation through one validated operation set.
//! - Keep UI/CLI layers decoupled from slot-level mutation details.

pub mod placement;
pub mod transfer;
