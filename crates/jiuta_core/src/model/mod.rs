//! Notation grid domain model.
//!
//! # Responsibility
//! - Define the score hierarchy, the slot variant and placed symbols.
//! - Define instrument palettes and location addressing over the grid.
//!
//! # Invariants
//! - Columns, measures and symbols are identified by stable UUIDs.
//! - Grid shape is fixed per column (4 measures × 4 beats × 2 slots).

pub mod grid;
pub mod instrument;
pub mod location;
pub mod palette;
pub mod symbol;
