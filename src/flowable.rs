//! Flowable: a logical horizontal strip folded into lines across pages.
//!
//! Content inside a flowable is positioned in *flow space*: x runs along one
//! infinite line, y is the offset from that line's top. The flowable folds
//! flow space onto pages:
//!
//! - line 0 covers `x < first_line_length` (every negative x included) and
//!   starts at the flowable's own position on its page;
//! - line `k > 0` covers `[first + (k-1) * line_length, first + k * line_length)`
//!   and starts at the left edge of a page's live area;
//! - lines are stacked `line_height + line_spacing` apart, filling the start
//!   page below the flowable first and then successive pages from the top.
//!
//! An x past the declared length stays on the last line (the line index is
//! clamped, the offset within the line is not).

use std::ops::RangeInclusive;

use crate::errors::{LayoutError, Result};
use crate::graph::{Document, NodeId};
use crate::graphic::Group;
use crate::log::warn;
use crate::types::Point;
use crate::units::Unit;

/// Dimensions of a flowable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowableConfig {
    /// Total flow length.
    pub length: Unit,
    /// Width of every line after the first.
    pub line_length: Unit,
    pub line_height: Unit,
    /// Vertical gap between consecutive lines on a page.
    pub line_spacing: Unit,
    /// Width of line 0, defaults to `line_length`.
    pub first_line_length: Option<Unit>,
}

impl FlowableConfig {
    pub fn new(length: Unit, line_length: Unit, line_height: Unit) -> Self {
        FlowableConfig {
            length,
            line_length,
            line_height,
            line_spacing: Unit::ZERO,
            first_line_length: None,
        }
    }

    pub fn with_line_spacing(mut self, spacing: Unit) -> Self {
        self.line_spacing = spacing;
        self
    }

    pub fn with_first_line_length(mut self, first: Unit) -> Self {
        self.first_line_length = Some(first);
        self
    }
}

/// Where a flow x lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePosition {
    pub line: usize,
    /// Offset from the start of `line`.
    pub local_x: Unit,
    /// True when x lay past the last line and was kept on it.
    pub clamped: bool,
}

/// Where a line sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePlacement {
    /// Pages after the flowable's own page.
    pub page_offset: usize,
    /// Top-left of the line in its page's live-area space.
    pub origin: Point<Unit>,
}

fn positive(name: &'static str, value: Unit) -> Result<Unit, LayoutError> {
    if value.0 > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::InvalidDimension {
            name,
            value: value.0,
        })
    }
}

fn non_negative(name: &'static str, value: Unit) -> Result<Unit, LayoutError> {
    if value.0 >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(LayoutError::InvalidDimension {
            name,
            value: value.0,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flowable {
    config: FlowableConfig,
}

impl Flowable {
    /// Validate dimensions eagerly.
    pub fn new(config: FlowableConfig) -> Result<Self, LayoutError> {
        let ll = config.line_length;
        if !(ll.0 > 0.0 && ll.is_finite()) {
            return Err(LayoutError::InvalidLineLength { value: ll.0 });
        }
        if let Some(first) = config.first_line_length {
            positive("first line length", first)?;
        }
        non_negative("flowable length", config.length)?;
        positive("line height", config.line_height)?;
        non_negative("line spacing", config.line_spacing)?;
        Ok(Flowable { config })
    }

    pub fn config(&self) -> &FlowableConfig {
        &self.config
    }

    pub fn length(&self) -> Unit {
        self.config.length
    }

    pub fn line_length(&self) -> Unit {
        self.config.line_length
    }

    pub fn first_line_length(&self) -> Unit {
        self.config.first_line_length.unwrap_or(self.config.line_length)
    }

    pub fn line_height(&self) -> Unit {
        self.config.line_height
    }

    /// Vertical distance between the tops of two stacked lines.
    pub fn pitch(&self) -> Unit {
        self.config.line_height + self.config.line_spacing
    }

    pub fn line_count(&self) -> usize {
        let first = self.first_line_length();
        if self.config.length <= first {
            return 1;
        }
        let rest = (self.config.length - first).checked_div(self.config.line_length);
        // float casts saturate; keep the extra line from wrapping
        1usize.saturating_add(rest.map(|r| r.ceil() as usize).unwrap_or(0))
    }

    pub fn last_line(&self) -> usize {
        self.line_count() - 1
    }

    /// Flow x where `line` begins.
    pub fn line_start(&self, line: usize) -> Unit {
        if line == 0 {
            Unit::ZERO
        } else {
            self.first_line_length() + self.config.line_length * (line - 1) as f64
        }
    }

    pub fn line_width(&self, line: usize) -> Unit {
        if line == 0 {
            self.first_line_length()
        } else {
            self.config.line_length
        }
    }

    /// Flow-x span owned by `line`. `None` marks an open side: nothing is
    /// left of line 0 and nothing is right of the last line.
    pub fn line_bounds(&self, line: usize) -> (Option<Unit>, Option<Unit>) {
        let start = (line > 0).then(|| self.line_start(line));
        let end = (line < self.last_line()).then(|| self.line_start(line) + self.line_width(line));
        (start, end)
    }

    /// Which line holds flow position `x`, and where on that line.
    ///
    /// A NaN position has no line; it is kept on line 0 and reported as
    /// clamped.
    pub fn locate(&self, x: Unit) -> LinePosition {
        if x.0.is_nan() {
            warn!("NaN flow position, kept on first line");
            return LinePosition {
                line: 0,
                local_x: x,
                clamped: true,
            };
        }
        let first = self.first_line_length();
        let raw = if x < first {
            0
        } else {
            let past = (x - first)
                .checked_div(self.config.line_length)
                .unwrap_or(0.0);
            1usize.saturating_add(past.floor() as usize)
        };
        let last = self.last_line();
        let clamped = raw > last;
        if clamped {
            warn!(
                x = x.0,
                line = raw,
                last,
                "flow position past the end, kept on last line"
            );
        }
        let line = raw.min(last);
        LinePosition {
            line,
            local_x: x - self.line_start(line),
            clamped,
        }
    }

    /// Lines touched by the flow span `[x0, x1]`, in order.
    pub fn lines_between(&self, x0: Unit, x1: Unit) -> RangeInclusive<usize> {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        self.locate(lo).line..=self.locate(hi).line
    }

    fn rows_fitting(&self, available: Unit) -> usize {
        let spare = available - self.config.line_height;
        if spare.0 < 0.0 {
            return 1;
        }
        spare
            .checked_div(self.pitch())
            .map(|r| (r.floor() as usize).saturating_add(1))
            .unwrap_or(1)
    }

    /// Lines that fit on a page whose live area is `live_height` tall.
    pub fn lines_per_page(&self, live_height: Unit) -> usize {
        self.rows_fitting(live_height)
    }

    /// Lines that fit on the start page below a flowable placed at `start_y`.
    pub fn lines_on_first_page(&self, start_y: Unit, live_height: Unit) -> usize {
        self.rows_fitting(live_height - start_y)
    }

    /// Page and top-left corner of `line` for a flowable whose own position
    /// on its page is `start`.
    pub fn placement(&self, line: usize, start: Point<Unit>, live_height: Unit) -> LinePlacement {
        if line == 0 {
            return LinePlacement {
                page_offset: 0,
                origin: start,
            };
        }
        let first_rows = self.lines_on_first_page(start.y, live_height);
        if line < first_rows {
            return LinePlacement {
                page_offset: 0,
                origin: Point::new(Unit::ZERO, start.y + self.pitch() * line as f64),
            };
        }
        let per_page = self.lines_per_page(live_height);
        let rest = line - first_rows;
        LinePlacement {
            page_offset: 1 + rest / per_page,
            origin: Point::new(Unit::ZERO, self.pitch() * (rest % per_page) as f64),
        }
    }
}

impl Document {
    /// Place a new flowable at `pos` on page `page`, creating the page if
    /// needed. Children of the returned node are positioned in flow space.
    pub fn add_flowable(
        &mut self,
        page: usize,
        pos: Point<Unit>,
        config: FlowableConfig,
    ) -> Result<NodeId> {
        let flowable = Flowable::new(config)?;
        let page = self.page(page);
        let id = self.insert(page, pos, Group)?;
        self.node_mut(id)?.flowable = Some(flowable);
        Ok(id)
    }
}
