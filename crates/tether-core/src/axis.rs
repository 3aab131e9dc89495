//! Axis categories for attribute references.
//!
//! The marker types only exist at the type level. A [`LayoutItem`](crate::LayoutItem)
//! tagged with one marker cannot be related to an item tagged with another.

/// Runtime name of an axis category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisKind {
    /// left, right, leading, trailing, centerX
    Horizontal,
    /// top, bottom, centerY, baselines
    Vertical,
    /// width, height
    Size,
}

mod sealed {
    pub trait Sealed {}
}

/// An axis category marker.
///
/// Sealed: the three categories are fixed.
pub trait Axis: sealed::Sealed + Copy + std::fmt::Debug + 'static {
    const KIND: AxisKind;
}

/// Horizontal positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XAxis;

/// Vertical positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YAxis;

/// Sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension;

impl sealed::Sealed for XAxis {}
impl sealed::Sealed for YAxis {}
impl sealed::Sealed for Dimension {}

impl Axis for XAxis {
    const KIND: AxisKind = AxisKind::Horizontal;
}

impl Axis for YAxis {
    const KIND: AxisKind = AxisKind::Vertical;
}

impl Axis for Dimension {
    const KIND: AxisKind = AxisKind::Size;
}
