//! Engine configuration.

/// A width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Insets from each edge of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }
}

/// Which physical edge `leading` and `trailing` map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Options for a [`LayoutEngine`](crate::LayoutEngine).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineOptions {
    /// Size of the root view of every view controller
    pub viewport: Size,
    /// Direction used to resolve leading and trailing
    pub layout_direction: LayoutDirection,
    /// Insets applied by safe-area guides and legacy layout supports
    pub safe_area_insets: EdgeInsets,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            viewport: Size::new(800.0, 600.0),
            layout_direction: LayoutDirection::LeftToRight,
            safe_area_insets: EdgeInsets::default(),
        }
    }
}
