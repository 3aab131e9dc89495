//! Geometric attributes of a layout region.

use std::fmt;

use crate::axis::AxisKind;

/// One addressable geometric property of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    /// Left in left-to-right layouts, right in right-to-left layouts.
    Leading,
    /// Right in left-to-right layouts, left in right-to-left layouts.
    Trailing,
    Width,
    Height,
    CenterX,
    CenterY,
    FirstBaseline,
    LastBaseline,
}

impl Attribute {
    /// All attributes, in declaration order.
    pub const ALL: [Attribute; 12] = [
        Attribute::Left,
        Attribute::Right,
        Attribute::Top,
        Attribute::Bottom,
        Attribute::Leading,
        Attribute::Trailing,
        Attribute::Width,
        Attribute::Height,
        Attribute::CenterX,
        Attribute::CenterY,
        Attribute::FirstBaseline,
        Attribute::LastBaseline,
    ];

    /// The axis category this attribute belongs to.
    pub fn axis(&self) -> AxisKind {
        match self {
            Attribute::Left
            | Attribute::Right
            | Attribute::Leading
            | Attribute::Trailing
            | Attribute::CenterX => AxisKind::Horizontal,
            Attribute::Top
            | Attribute::Bottom
            | Attribute::CenterY
            | Attribute::FirstBaseline
            | Attribute::LastBaseline => AxisKind::Vertical,
            Attribute::Width | Attribute::Height => AxisKind::Size,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Left => "left",
            Attribute::Right => "right",
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::Leading => "leading",
            Attribute::Trailing => "trailing",
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::CenterX => "centerX",
            Attribute::CenterY => "centerY",
            Attribute::FirstBaseline => "firstBaseline",
            Attribute::LastBaseline => "lastBaseline",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
