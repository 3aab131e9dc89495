//! Layout engine for tether constraints.
//!
//! This crate is the host side of the constraint syntax in `tether-core`: it
//! keeps a registry of regions, activates and deactivates [`Constraint`](tether_core::Constraint)
//! values, and reports the solved frame of every region.
//!
//! # Architecture
//!
//! 1. **Cassowary**: an incremental simplex solver with weighted, non-required constraints
//! 2. **Engine**: maps region attributes onto solver variables and translates constraints
//! 3. **Frames**: reads solved values back as rectangles and baselines
//!
//! # Example
//!
//! ```
//! use tether_constraint::{EngineOptions, LayoutEngine};
//! use tether_core::{LayoutRegion, EQ};
//!
//! let mut engine = LayoutEngine::new(EngineOptions::default());
//! let controller = engine.add_view_controller("root")?;
//! let card = engine.add_view("card")?;
//!
//! engine.activate_all([
//!     card.center_x() | EQ | controller.view.center_x(),
//!     card.top() | EQ | controller.view.top() + 16.0,
//!     card.width() | EQ | controller.view.width() / 2.0,
//!     card.height() | EQ | 120.0,
//! ])?;
//!
//! let frame = engine.frame(card.region_id()).unwrap();
//! assert!((frame.x - 200.0).abs() < 1e-6);
//! # Ok::<(), tether_constraint::LayoutError>(())
//! ```

pub mod cassowary;
mod engine;
mod error;
mod frame;
mod options;

pub use engine::{ConstraintId, LayoutEngine};
pub use error::LayoutError;
pub use frame::{Frame, Layout};
pub use options::{EdgeInsets, EngineOptions, LayoutDirection, Size};
