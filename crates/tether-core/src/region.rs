//! Layout regions and their attribute accessors.
//!
//! A region is anything the layout engine positions: a view, a layout guide,
//! or one of the legacy top/bottom layout supports of a view controller.
//! Regions are referenced by identity only; an attribute reference never owns
//! or mutates the region it names.

use std::fmt;

use crate::attribute::Attribute;
use crate::axis::{Dimension, XAxis, YAxis};
use crate::item::LayoutItem;

/// Identity of a region known to the host layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionId(pub u64);

impl RegionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of entity a region is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionKind {
    View,
    LayoutGuide,
    /// Legacy top/bottom layout support of a view controller.
    LayoutSupport,
}

/// Capability of being laid out: exposes the full attribute set.
pub trait LayoutRegion {
    fn region_id(&self) -> RegionId;

    fn left(&self) -> LayoutItem<XAxis> {
        LayoutItem::new(self.region_id(), Attribute::Left)
    }

    fn right(&self) -> LayoutItem<XAxis> {
        LayoutItem::new(self.region_id(), Attribute::Right)
    }

    fn leading(&self) -> LayoutItem<XAxis> {
        LayoutItem::new(self.region_id(), Attribute::Leading)
    }

    fn trailing(&self) -> LayoutItem<XAxis> {
        LayoutItem::new(self.region_id(), Attribute::Trailing)
    }

    fn center_x(&self) -> LayoutItem<XAxis> {
        LayoutItem::new(self.region_id(), Attribute::CenterX)
    }

    fn top(&self) -> LayoutItem<YAxis> {
        LayoutItem::new(self.region_id(), Attribute::Top)
    }

    fn bottom(&self) -> LayoutItem<YAxis> {
        LayoutItem::new(self.region_id(), Attribute::Bottom)
    }

    fn center_y(&self) -> LayoutItem<YAxis> {
        LayoutItem::new(self.region_id(), Attribute::CenterY)
    }

    fn first_baseline(&self) -> LayoutItem<YAxis> {
        LayoutItem::new(self.region_id(), Attribute::FirstBaseline)
    }

    fn last_baseline(&self) -> LayoutItem<YAxis> {
        LayoutItem::new(self.region_id(), Attribute::LastBaseline)
    }

    /// Same as [`last_baseline`](LayoutRegion::last_baseline).
    fn baseline(&self) -> LayoutItem<YAxis> {
        self.last_baseline()
    }

    fn width(&self) -> LayoutItem<Dimension> {
        LayoutItem::new(self.region_id(), Attribute::Width)
    }

    fn height(&self) -> LayoutItem<Dimension> {
        LayoutItem::new(self.region_id(), Attribute::Height)
    }
}

/// Legacy layout support: only its top and bottom edges are addressable.
pub trait LayoutSupport {
    fn region_id(&self) -> RegionId;

    #[deprecated(note = "use the view's safe-area layout guide")]
    fn top(&self) -> LayoutItem<YAxis> {
        LayoutItem::new(self.region_id(), Attribute::Top)
    }

    #[deprecated(note = "use the view's safe-area layout guide")]
    fn bottom(&self) -> LayoutItem<YAxis> {
        LayoutItem::new(self.region_id(), Attribute::Bottom)
    }
}

/// A view handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    id: RegionId,
}

impl View {
    pub const fn new(id: RegionId) -> Self {
        Self { id }
    }
}

impl LayoutRegion for View {
    fn region_id(&self) -> RegionId {
        self.id
    }
}

/// A layout guide handle: a rectangle that participates in layout without
/// being a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutGuide {
    id: RegionId,
    owner: RegionId,
}

impl LayoutGuide {
    pub const fn new(id: RegionId, owner: RegionId) -> Self {
        Self { id, owner }
    }

    /// The view this guide belongs to.
    pub fn owner(&self) -> RegionId {
        self.owner
    }
}

impl LayoutRegion for LayoutGuide {
    fn region_id(&self) -> RegionId {
        self.id
    }
}

/// Handle to a legacy top or bottom layout support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSupportGuide {
    id: RegionId,
}

impl LayoutSupportGuide {
    pub const fn new(id: RegionId) -> Self {
        Self { id }
    }
}

impl LayoutSupport for LayoutSupportGuide {
    fn region_id(&self) -> RegionId {
        self.id
    }
}

/// A root view together with its legacy top and bottom layout supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewController {
    pub view: View,
    pub top_layout_guide: LayoutSupportGuide,
    pub bottom_layout_guide: LayoutSupportGuide,
}

#[allow(deprecated)]
impl ViewController {
    #[deprecated(note = "use the view's safe-area layout guide")]
    pub fn top_layout_guide_top(&self) -> LayoutItem<YAxis> {
        self.top_layout_guide.top()
    }

    #[deprecated(note = "use the view's safe-area layout guide")]
    pub fn top_layout_guide_bottom(&self) -> LayoutItem<YAxis> {
        self.top_layout_guide.bottom()
    }

    #[deprecated(note = "use the view's safe-area layout guide")]
    pub fn bottom_layout_guide_top(&self) -> LayoutItem<YAxis> {
        self.bottom_layout_guide.top()
    }

    #[deprecated(note = "use the view's safe-area layout guide")]
    pub fn bottom_layout_guide_bottom(&self) -> LayoutItem<YAxis> {
        self.bottom_layout_guide.bottom()
    }
}
