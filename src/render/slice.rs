//! Cutting paths into per-line slices.
//!
//! A path inside a flowable may run across several lines. Each slice holds
//! the contiguous run of elements that falls on one line, in coordinates
//! local to that line's top-left corner. Straight segments that cross a line
//! boundary are cut at the boundary: the slice being left gets a `lead_out`
//! to the crossing point and the slice being entered starts from a `lead_in`
//! at the same flow position. Curves are never cut; they are drawn whole in
//! the slice holding their end point and the surface clips them.

use crate::errors::Result;
use crate::flowable::Flowable;
use crate::graph::{Document, NodeId};
use crate::log::{debug, trace};
use crate::path::{ElementKind, ResolvedElement};
use crate::types::Point;
use crate::units::Unit;

/// Horizontal drawing limits in document space. `None` sides are open.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipSpan {
    pub left: Option<Unit>,
    pub right: Option<Unit>,
}

impl ClipSpan {
    pub const OPEN: ClipSpan = ClipSpan {
        left: None,
        right: None,
    };

    pub fn contains(&self, x: Unit) -> bool {
        self.left.is_none_or(|l| x >= l) && self.right.is_none_or(|r| x <= r)
    }
}

/// One independently drawable piece of a path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSlice {
    /// Flowable line, `None` for paths outside any flowable.
    pub line: Option<usize>,
    /// Document-space position that local coordinates are relative to.
    pub origin: Point<Unit>,
    pub clip: ClipSpan,
    /// Added to a local coordinate, gives the path-space coordinate.
    pub offset: Point<Unit>,
    /// Where the pen enters this line, when a segment crosses into it.
    pub lead_in: Option<Point<Unit>>,
    /// Where the pen leaves this line, when a segment crosses out of it.
    pub lead_out: Option<Point<Unit>>,
    /// Elements in local coordinates. Empty for a line a segment only passes through.
    pub elements: Vec<ResolvedElement>,
}

impl PathSlice {
    pub fn to_document(&self, local: Point<Unit>) -> Point<Unit> {
        self.origin + local
    }

    pub fn to_path_space(&self, local: Point<Unit>) -> Point<Unit> {
        local + self.offset
    }

    /// The slice's elements back in the path's own space.
    pub fn path_elements(&self) -> impl Iterator<Item = ResolvedElement> + '_ {
        self.elements
            .iter()
            .map(|e| ResolvedElement::new(e.kind, self.to_path_space(e.pos)))
    }

    pub fn is_pass_through(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Slicing state for a path inside a flowable.
struct Cutter<'a> {
    doc: &'a Document,
    flowable_id: NodeId,
    flowable: &'a Flowable,
    /// Path origin in flow space.
    base: Point<Unit>,
    slices: Vec<PathSlice>,
}

impl Cutter<'_> {
    fn line_of(&self, p: Point<Unit>) -> usize {
        self.flowable.locate(self.base.x + p.x).line
    }

    /// Path-space point in `line`'s local space.
    fn local(&self, p: Point<Unit>, line: usize) -> Point<Unit> {
        Point::new(
            self.base.x + p.x - self.flowable.line_start(line),
            self.base.y + p.y,
        )
    }

    fn open(&mut self, line: usize) -> Result<()> {
        let origin = self.doc.line_origin(self.flowable_id, line)?;
        let (lo, hi) = self.flowable.line_bounds(line);
        let clip = ClipSpan {
            left: lo.map(|_| origin.x),
            right: hi.map(|_| origin.x + self.flowable.line_width(line)),
        };
        self.slices.push(PathSlice {
            line: Some(line),
            origin,
            clip,
            offset: Point::new(self.flowable.line_start(line) - self.base.x, -self.base.y),
            lead_in: None,
            lead_out: None,
            elements: Vec::new(),
        });
        Ok(())
    }

    /// Local y where the segment `from -> to` reaches flow x `bx`.
    fn y_at(&self, from: Point<Unit>, to: Point<Unit>, bx: Unit) -> Unit {
        let x0 = self.base.x + from.x;
        let t = (bx - x0).checked_div(to.x - from.x).unwrap_or(0.0);
        self.base.y + from.y + (to.y - from.y) * t
    }

    /// Cut the straight segment `from -> to` at every boundary between
    /// lines `a` and `b`, opening a slice per line crossed.
    fn cross(&mut self, from: Point<Unit>, to: Point<Unit>, a: usize, b: usize) -> Result<()> {
        let mut line = a;
        while line != b {
            let next = if b > a { line + 1 } else { line - 1 };
            let bx = self.flowable.line_start(line.max(next));
            let y = self.y_at(from, to, bx);
            if let Some(last) = self.slices.last_mut() {
                last.lead_out = Some(Point::new(bx - self.flowable.line_start(line), y));
            }
            self.open(next)?;
            if let Some(last) = self.slices.last_mut() {
                last.lead_in = Some(Point::new(bx - self.flowable.line_start(next), y));
            }
            trace!(from = line, to = next, x = bx.0, "segment crosses line boundary");
            line = next;
        }
        Ok(())
    }
}

impl Document {
    /// Cut path `id` into drawable slices.
    ///
    /// Outside a flowable the whole path is one slice. An empty path has no
    /// slices.
    pub fn slice_path(&self, id: NodeId) -> Result<Vec<PathSlice>> {
        let elements = self.resolve_path(id)?;
        if elements.is_empty() {
            return Ok(Vec::new());
        }
        let Some(flowable_id) = self.flowable_of(id)? else {
            return Ok(vec![PathSlice {
                line: None,
                origin: self.document_position(id)?,
                clip: ClipSpan::OPEN,
                offset: Point::ORIGIN,
                lead_in: None,
                lead_out: None,
                elements,
            }]);
        };

        let mut cutter = Cutter {
            doc: self,
            flowable_id,
            flowable: self.flowable(flowable_id)?,
            base: self.flow_position(id)?,
            slices: Vec::new(),
        };

        // control points travel with the curve they belong to
        let mut lines = vec![0; elements.len()];
        let mut curve_line = None;
        for (i, element) in elements.iter().enumerate().rev() {
            lines[i] = match (element.kind, curve_line) {
                (ElementKind::ControlPoint, Some(line)) => line,
                _ => cutter.line_of(element.pos),
            };
            if element.kind != ElementKind::ControlPoint {
                curve_line = Some(lines[i]);
            }
        }

        let mut current: Option<usize> = None;
        let mut pen: Option<Point<Unit>> = None;
        for (element, &line) in elements.iter().zip(&lines) {
            match (current, pen) {
                (None, _) => cutter.open(line)?,
                (Some(prev_line), Some(from)) if prev_line != line => match element.kind {
                    ElementKind::LineTo => cutter.cross(from, element.pos, prev_line, line)?,
                    ElementKind::ControlPoint | ElementKind::CurveTo => {
                        cutter.open(line)?;
                        let lead_in = cutter.local(from, line);
                        if let Some(last) = cutter.slices.last_mut() {
                            last.lead_in = Some(lead_in);
                        }
                    }
                    ElementKind::MoveTo => cutter.open(line)?,
                },
                (Some(prev_line), None) if prev_line != line => cutter.open(line)?,
                _ => {}
            }
            current = Some(line);
            let local = cutter.local(element.pos, line);
            if let Some(last) = cutter.slices.last_mut() {
                last.elements.push(ResolvedElement::new(element.kind, local));
            }
            if element.kind != ElementKind::ControlPoint {
                pen = Some(element.pos);
            }
        }

        debug!(path = ?id, slices = cutter.slices.len(), "sliced path");
        Ok(cutter.slices)
    }
}
