//! Attribute references and their arithmetic.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Sub};

use crate::attribute::Attribute;
use crate::axis::Axis;
use crate::region::RegionId;

/// A reference to one attribute of one region, scaled and offset.
///
/// Reads as `multiplier × region.attribute + constant`. The axis parameter
/// `A` decides which other items it can be related to.
///
/// Multiplying or dividing scales the whole term, multiplier and constant
/// alike; adding or subtracting shifts the constant. Operators apply in the
/// order they are written:
///
/// ```
/// use tether_core::{LayoutRegion, RegionId, View};
///
/// let view = View::new(RegionId::new(1));
///
/// let a = view.left() * 2.0 + 3.0;
/// assert_eq!((a.multiplier(), a.constant()), (2.0, 3.0));
///
/// let b = (view.left() + 3.0) * 2.0;
/// assert_eq!((b.multiplier(), b.constant()), (2.0, 6.0));
/// ```
pub struct LayoutItem<A: Axis> {
    region: RegionId,
    attribute: Attribute,
    multiplier: f64,
    constant: f64,
    axis: PhantomData<A>,
}

impl<A: Axis> LayoutItem<A> {
    /// A bare reference: multiplier 1, constant 0.
    pub(crate) fn new(region: RegionId, attribute: Attribute) -> Self {
        debug_assert_eq!(attribute.axis(), A::KIND);
        Self {
            region,
            attribute,
            multiplier: 1.0,
            constant: 0.0,
            axis: PhantomData,
        }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            multiplier: self.multiplier * factor,
            constant: self.constant * factor,
            ..self
        }
    }

    fn divided(self, divisor: f64) -> Self {
        Self {
            multiplier: self.multiplier / divisor,
            constant: self.constant / divisor,
            ..self
        }
    }

    fn shifted(self, offset: f64) -> Self {
        Self {
            constant: self.constant + offset,
            ..self
        }
    }
}

impl<A: Axis> Clone for LayoutItem<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: Axis> Copy for LayoutItem<A> {}

impl<A: Axis> PartialEq for LayoutItem<A> {
    fn eq(&self, other: &Self) -> bool {
        self.region == other.region
            && self.attribute == other.attribute
            && self.multiplier == other.multiplier
            && self.constant == other.constant
    }
}

impl<A: Axis> fmt::Debug for LayoutItem<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutItem")
            .field("axis", &A::KIND)
            .field("region", &self.region)
            .field("attribute", &self.attribute)
            .field("multiplier", &self.multiplier)
            .field("constant", &self.constant)
            .finish()
    }
}

impl<A: Axis> fmt::Display for LayoutItem<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.region, self.attribute)?;
        if self.multiplier != 1.0 {
            write!(f, " * {}", self.multiplier)?;
        }
        if self.constant < 0.0 {
            write!(f, " - {}", -self.constant)?;
        } else if self.constant != 0.0 {
            write!(f, " + {}", self.constant)?;
        }
        Ok(())
    }
}

impl<A: Axis> Mul<f64> for LayoutItem<A> {
    type Output = LayoutItem<A>;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scaled(rhs)
    }
}

impl<A: Axis> Div<f64> for LayoutItem<A> {
    type Output = LayoutItem<A>;

    // Division by zero is not guarded: it yields infinity or NaN.
    fn div(self, rhs: f64) -> Self::Output {
        self.divided(rhs)
    }
}

impl<A: Axis> Add<f64> for LayoutItem<A> {
    type Output = LayoutItem<A>;

    fn add(self, rhs: f64) -> Self::Output {
        self.shifted(rhs)
    }
}

impl<A: Axis> Sub<f64> for LayoutItem<A> {
    type Output = LayoutItem<A>;

    fn sub(self, rhs: f64) -> Self::Output {
        self.shifted(-rhs)
    }
}
