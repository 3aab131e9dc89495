//! Typed attribute expressions for building layout constraints.
//!
//! This crate is the syntax layer in front of a constraint-based layout engine:
//! - Attribute accessors on layout regions (views, layout guides, legacy layout supports)
//! - Arithmetic on attribute references (`*`, `/`, `+`, `-` with a scalar)
//! - Relations between references of the same axis, producing [`Constraint`] values
//! - Priority annotation of finished constraints
//!
//! Mixing axes (for example `width` against `top`) does not compile, because
//! every [`LayoutItem`] carries its axis in its type.
//!
//! # Example
//!
//! ```
//! use tether_core::{LayoutRegion, Priority, RegionId, View, EQ, GE};
//!
//! let container = View::new(RegionId::new(1));
//! let child = View::new(RegionId::new(2));
//!
//! // child.left == container.left * 1 + 8
//! let pin = child.left() | EQ | container.left() + 8.0;
//! assert_eq!(pin.constant(), 8.0);
//!
//! // child.top >= container.top * 3 + 30, at priority 400
//! let loose = child.top() | GE | container.top() * 3.0 + 30.0 | Priority::new(400.0);
//! assert_eq!(loose.multiplier(), 3.0);
//! assert_eq!(loose.priority(), Priority::new(400.0));
//!
//! // Size attributes can also be related to a literal.
//! let fixed = child.width().equal_to(30.0);
//! assert!(fixed.second_item().is_none());
//! ```

pub mod attribute;
pub mod axis;
pub mod constraint;
pub mod item;
pub mod region;

pub use attribute::*;
pub use axis::*;
pub use constraint::*;
pub use item::*;
pub use region::*;
