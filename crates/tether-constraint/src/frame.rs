//! Solved geometry.

use indexmap::IndexMap;
use tether_core::{Attribute, RegionId};

use crate::options::LayoutDirection;

/// The solved rectangle of one region, plus its baselines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub first_baseline: f64,
    pub last_baseline: f64,
}

impl Frame {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Value of an attribute, resolving leading/trailing with `direction`.
    pub fn value(&self, attribute: Attribute, direction: LayoutDirection) -> f64 {
        match attribute {
            Attribute::Left => self.x,
            Attribute::Right => self.right(),
            Attribute::Top => self.y,
            Attribute::Bottom => self.bottom(),
            Attribute::Width => self.width,
            Attribute::Height => self.height,
            Attribute::CenterX => self.center_x(),
            Attribute::CenterY => self.center_y(),
            Attribute::FirstBaseline => self.first_baseline,
            Attribute::LastBaseline => self.last_baseline,
            Attribute::Leading | Attribute::Trailing => {
                self.value(resolve_direction(attribute, direction), direction)
            }
        }
    }
}

/// Map leading/trailing onto left/right. Other attributes pass through.
pub(crate) fn resolve_direction(attribute: Attribute, direction: LayoutDirection) -> Attribute {
    match (attribute, direction) {
        (Attribute::Leading, LayoutDirection::LeftToRight)
        | (Attribute::Trailing, LayoutDirection::RightToLeft) => Attribute::Left,
        (Attribute::Trailing, LayoutDirection::LeftToRight)
        | (Attribute::Leading, LayoutDirection::RightToLeft) => Attribute::Right,
        (other, _) => other,
    }
}

/// Frames of every registered region, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    pub frames: IndexMap<RegionId, Frame>,
}

impl Layout {
    pub fn frame(&self, region: RegionId) -> Option<Frame> {
        self.frames.get(&region).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Frame)> {
        self.frames.iter().map(|(id, frame)| (*id, frame))
    }
}
