//! Default sizes and document settings (all stored in base units)

use crate::errors::LayoutError;
use crate::style::{Brush, Color, Pen};
use crate::units::Unit;

const fn mm(val: f64) -> Unit {
    Unit(val * 72.0 / 25.4)
}

/// Horizontal gap between consecutive pages in document space.
pub const PAGE_GAP: Unit = mm(50.0);
/// Distance between two staff lines when a caller doesn't pick one.
pub const STAFF_SPACE: Unit = mm(1.75);
pub const PEN_THICKNESS: Unit = Unit(0.5);
pub const TEXT_SIZE: Unit = Unit(12.0);

/// Physical page: size, margins and binding gutter.
///
/// The gutter is added to the left margin of every page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paper {
    pub width: Unit,
    pub height: Unit,
    pub margin_top: Unit,
    pub margin_right: Unit,
    pub margin_bottom: Unit,
    pub margin_left: Unit,
    pub gutter: Unit,
}

impl Paper {
    pub const A4: Paper = Paper {
        width: mm(210.0),
        height: mm(297.0),
        margin_top: mm(20.0),
        margin_right: mm(20.0),
        margin_bottom: mm(20.0),
        margin_left: mm(20.0),
        gutter: Unit(0.0),
    };

    pub const LETTER: Paper = Paper {
        width: Unit(612.0),
        height: Unit(792.0),
        margin_top: Unit(72.0),
        margin_right: Unit(72.0),
        margin_bottom: Unit(72.0),
        margin_left: Unit(72.0),
        gutter: Unit(0.0),
    };

    pub fn live_width(&self) -> Unit {
        self.width - self.margin_left - self.margin_right - self.gutter
    }

    pub fn live_height(&self) -> Unit {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Offset of the live area's top-left corner from the paper's corner.
    pub fn live_offset(&self) -> (Unit, Unit) {
        (self.margin_left + self.gutter, self.margin_top)
    }

    /// Same paper with equal margins on every side.
    pub fn with_margins(mut self, margin: Unit) -> Self {
        self.margin_top = margin;
        self.margin_right = margin;
        self.margin_bottom = margin;
        self.margin_left = margin;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let (live_width, live_height) = (self.live_width(), self.live_height());
        if !(live_width.0 > 0.0 && live_height.0 > 0.0) || !self.width.is_finite() {
            return Err(LayoutError::InvalidPaper {
                live_width: live_width.0,
                live_height: live_height.0,
            });
        }
        Ok(())
    }
}

impl Default for Paper {
    fn default() -> Self {
        Paper::A4
    }
}

/// Settings shared by everything in one document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentConfig {
    pub paper: Paper,
    pub page_gap: Unit,
    pub staff_space: Unit,
    pub pen: Pen,
    pub brush: Brush,
    pub text_size: Unit,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            paper: Paper::A4,
            page_gap: PAGE_GAP,
            staff_space: STAFF_SPACE,
            pen: Pen::new(Color::BLACK, PEN_THICKNESS),
            brush: Brush::new(Color::BLACK),
            text_size: TEXT_SIZE,
        }
    }
}

impl DocumentConfig {
    pub fn with_paper(mut self, paper: Paper) -> Self {
        self.paper = paper;
        self
    }

    pub fn with_page_gap(mut self, gap: Unit) -> Self {
        self.page_gap = gap;
        self
    }

    pub fn with_staff_space(mut self, staff_space: Unit) -> Self {
        self.staff_space = staff_space;
        self
    }

    pub fn with_pen(mut self, pen: Pen) -> Self {
        self.pen = pen;
        self
    }

    pub fn with_brush(mut self, brush: Brush) -> Self {
        self.brush = brush;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        self.paper.validate()?;
        if !(self.page_gap.0 >= 0.0 && self.page_gap.is_finite()) {
            return Err(LayoutError::InvalidDimension {
                name: "page gap",
                value: self.page_gap.0,
            });
        }
        if !(self.staff_space.0 > 0.0 && self.staff_space.is_finite()) {
            return Err(LayoutError::InvalidDimension {
                name: "staff space",
                value: self.staff_space.0,
            });
        }
        Ok(())
    }
}
