//! Relations between attribute references, and the constraints they produce.
//!
//! A constraint reads `first.attribute RELATION multiplier × second.attribute + constant`.
//! Only the right-hand item's multiplier and constant reach the constraint;
//! any arithmetic written on the left-hand item is dropped. Write scaling and
//! offsets on the right.

use std::fmt;
use std::ops::BitOr;

use crate::attribute::Attribute;
use crate::axis::{Axis, Dimension};
use crate::item::LayoutItem;
use crate::region::RegionId;

/// How the two sides of a constraint relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Equal,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl Relation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Equal => "==",
            Relation::GreaterThanOrEqual => ">=",
            Relation::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `lhs | EQ | rhs`
pub const EQ: Relation = Relation::Equal;
/// `lhs | GE | rhs`
pub const GE: Relation = Relation::GreaterThanOrEqual;
/// `lhs | LE | rhs`
pub const LE: Relation = Relation::LessThanOrEqual;

/// Strength hint for the solver, from 0 to 1000. 1000 means required.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority(pub f32);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000.0);
    pub const DEFAULT_HIGH: Priority = Priority(750.0);
    pub const DEFAULT_LOW: Priority = Priority(250.0);
    pub const FITTING_SIZE_LEVEL: Priority = Priority(50.0);

    /// Create a priority, clamped into `0..=1000`.
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, Self::REQUIRED.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn is_required(&self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::REQUIRED
    }
}

impl From<f32> for Priority {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A region attribute named by a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub region: RegionId,
    pub attribute: Attribute,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.region, self.attribute)
    }
}

/// A linear relation between two region attributes, or between a size
/// attribute and a constant.
///
/// Constraints are plain values. Building one has no effect on layout until
/// the host engine activates it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    first: Anchor,
    relation: Relation,
    second: Option<Anchor>,
    multiplier: f64,
    constant: f64,
    priority: Priority,
}

impl Constraint {
    pub fn first(&self) -> Anchor {
        self.first
    }

    pub fn first_item(&self) -> RegionId {
        self.first.region
    }

    pub fn first_attribute(&self) -> Attribute {
        self.first.attribute
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// `None` for constraints against a constant.
    pub fn second(&self) -> Option<Anchor> {
        self.second
    }

    pub fn second_item(&self) -> Option<RegionId> {
        self.second.map(|anchor| anchor.region)
    }

    pub fn second_attribute(&self) -> Option<Attribute> {
        self.second.map(|anchor| anchor.attribute)
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The same constraint at a different priority.
    pub fn with_priority(self, priority: impl Into<Priority>) -> Self {
        Self {
            priority: priority.into(),
            ..self
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.first, self.relation)?;
        match self.second {
            Some(second) => {
                write!(f, "{}", second)?;
                if self.multiplier != 1.0 {
                    write!(f, " * {}", self.multiplier)?;
                }
                if self.constant < 0.0 {
                    write!(f, " - {}", -self.constant)?;
                } else if self.constant != 0.0 {
                    write!(f, " + {}", self.constant)?;
                }
            }
            None => write!(f, "{}", self.constant)?,
        }
        if !self.priority.is_required() {
            write!(f, " @{}", self.priority)?;
        }
        Ok(())
    }
}

/// Something an item of axis `A` can be related to.
///
/// Implemented for items of the same axis, and for plain numbers when the
/// axis is [`Dimension`]. Relating a position to a bare number does not
/// compile.
///
/// ```
/// use tether_core::{LayoutRegion, RegionId, View, EQ};
///
/// let view = View::new(RegionId::new(1));
/// let _ = view.width() | EQ | view.height() * 2.0;
/// let _ = view.width() | EQ | 10.0;
/// let _ = view.left().equal_to(view.right() - 8.0);
/// ```
///
/// Items on different axes cannot be related:
///
/// ```compile_fail
/// use tether_core::{LayoutRegion, RegionId, View, EQ};
///
/// let view = View::new(RegionId::new(1));
/// let _ = view.width() | EQ | view.top();
/// ```
///
/// ```compile_fail
/// use tether_core::{LayoutRegion, RegionId, View};
///
/// let view = View::new(RegionId::new(1));
/// let _ = view.left().equal_to(view.top());
/// ```
///
/// Nor can a position be related to a number:
///
/// ```compile_fail
/// use tether_core::{LayoutRegion, RegionId, View, EQ};
///
/// let view = View::new(RegionId::new(1));
/// let _ = view.left() | EQ | 10.0;
/// ```
pub trait RelationTarget<A: Axis> {
    fn constrain(self, first: LayoutItem<A>, relation: Relation) -> Constraint;
}

impl<A: Axis> RelationTarget<A> for LayoutItem<A> {
    fn constrain(self, first: LayoutItem<A>, relation: Relation) -> Constraint {
        Constraint {
            first: first.anchor(),
            relation,
            second: Some(self.anchor()),
            multiplier: self.multiplier(),
            constant: self.constant(),
            priority: Priority::REQUIRED,
        }
    }
}

impl RelationTarget<Dimension> for f64 {
    fn constrain(self, first: LayoutItem<Dimension>, relation: Relation) -> Constraint {
        Constraint {
            first: first.anchor(),
            relation,
            second: None,
            multiplier: 1.0,
            constant: self,
            priority: Priority::REQUIRED,
        }
    }
}

impl<A: Axis> LayoutItem<A> {
    fn anchor(&self) -> Anchor {
        Anchor {
            region: self.region(),
            attribute: self.attribute(),
        }
    }

    /// Relate this item to `target`. The multiplier and constant of `self`
    /// are discarded.
    pub fn relate<T: RelationTarget<A>>(self, relation: Relation, target: T) -> Constraint {
        target.constrain(self, relation)
    }

    pub fn equal_to<T: RelationTarget<A>>(self, target: T) -> Constraint {
        self.relate(Relation::Equal, target)
    }

    pub fn greater_than_or_equal_to<T: RelationTarget<A>>(self, target: T) -> Constraint {
        self.relate(Relation::GreaterThanOrEqual, target)
    }

    pub fn less_than_or_equal_to<T: RelationTarget<A>>(self, target: T) -> Constraint {
        self.relate(Relation::LessThanOrEqual, target)
    }
}

/// Left half of `lhs | EQ | rhs`, waiting for its right-hand side.
#[derive(Debug, Clone, Copy)]
#[must_use = "a relation needs a right-hand side: `lhs | EQ | rhs`"]
pub struct PendingRelation<A: Axis> {
    first: LayoutItem<A>,
    relation: Relation,
}

impl<A: Axis> BitOr<Relation> for LayoutItem<A> {
    type Output = PendingRelation<A>;

    fn bitor(self, relation: Relation) -> Self::Output {
        PendingRelation {
            first: self,
            relation,
        }
    }
}

impl<A: Axis, T: RelationTarget<A>> BitOr<T> for PendingRelation<A> {
    type Output = Constraint;

    fn bitor(self, target: T) -> Self::Output {
        self.first.relate(self.relation, target)
    }
}

/// `constraint | priority` annotates a finished constraint.
impl BitOr<Priority> for Constraint {
    type Output = Constraint;

    fn bitor(self, priority: Priority) -> Self::Output {
        self.with_priority(priority)
    }
}
