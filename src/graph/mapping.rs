//! Coordinate mapping between arbitrary nodes.
//!
//! Offsets are summed up each node's chain to the nearest common ancestor.
//! Passing a flowable below that ancestor folds the running flow-space point
//! onto its line and page; when the common ancestor is the flowable itself
//! (or lies inside it) the result stays in flow space.

use super::{Document, NodeId};
use crate::errors::GraphError;
use crate::flowable::Flowable;
use crate::types::{Point, Rect};
use crate::units::Unit;

impl Document {
    /// Position of `from`'s origin in `to`'s local space.
    pub fn map_to(&self, from: NodeId, to: NodeId) -> Result<Point<Unit>, GraphError> {
        self.map_point(from, Point::ORIGIN, to)
    }

    /// `point`, given in `from`'s local space, expressed in `to`'s local space.
    pub fn map_point(
        &self,
        from: NodeId,
        point: Point<Unit>,
        to: NodeId,
    ) -> Result<Point<Unit>, GraphError> {
        self.node(from)?;
        self.node(to)?;
        if from == to {
            return Ok(point);
        }
        let meet = self.common_ancestor(from, to)?;
        let a = self.lift(from, point, meet)?;
        let b = self.lift(to, Point::ORIGIN, meet)?;
        Ok(a - b)
    }

    /// Absolute document-space position of `id`'s origin.
    pub fn document_position(&self, id: NodeId) -> Result<Point<Unit>, GraphError> {
        self.map_to(id, self.root)
    }

    /// Nearest node that is `a` or above it and also `b` or above it.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let above_b: Vec<NodeId> = self.ancestors(b).collect();
        self.ancestors(a)
            .find(|n| above_b.contains(n))
            .ok_or(GraphError::Disconnected { from: a, to: b })
    }

    /// Carry `point` from `id`'s space up into `stop`'s space.
    fn lift(
        &self,
        id: NodeId,
        point: Point<Unit>,
        stop: NodeId,
    ) -> Result<Point<Unit>, GraphError> {
        let mut acc = point;
        let mut cur = id;
        while cur != stop {
            let node = self.node(cur)?;
            acc = match &node.flowable {
                Some(flowable) => self.fold(cur, flowable, acc)?,
                None => acc + node.pos,
            };
            cur = node
                .parent
                .ok_or(GraphError::Disconnected { from: id, to: stop })?;
        }
        Ok(acc)
    }

    /// Flow-space point of flowable `id` into the space of the page holding
    /// the flowable. Lines on later pages land outside that page's bounds.
    fn fold(
        &self,
        id: NodeId,
        flowable: &Flowable,
        p: Point<Unit>,
    ) -> Result<Point<Unit>, GraphError> {
        let (page, start) = self.flowable_anchor(id)?;
        let at = flowable.locate(p.x);
        let placement = flowable.placement(at.line, start, self.paper().live_height());
        let landing = page.saturating_add(placement.page_offset);
        let jump = self.page_origin(landing) - self.page_origin(page);
        Ok(jump + placement.origin + Point::new(at.local_x, p.y))
    }

    fn flowable_anchor(&self, id: NodeId) -> Result<(usize, Point<Unit>), GraphError> {
        let node = self.node(id)?;
        let page = node
            .parent
            .and_then(|p| self.page_index(p))
            .ok_or(GraphError::FlowableOutsidePage { node: id })?;
        Ok((page, node.pos))
    }

    /// The flowable component of `id`.
    pub fn flowable(&self, id: NodeId) -> Result<&Flowable, GraphError> {
        self.node(id)?
            .flowable
            .as_ref()
            .ok_or(GraphError::MissingCapability {
                node: id,
                capability: "flowable",
            })
    }

    /// The flowable `id` lives in, if any.
    pub fn flowable_of(&self, id: NodeId) -> Result<Option<NodeId>, GraphError> {
        self.node(id)?;
        Ok(self.ancestors(id).skip(1).find(|a| {
            self.node(*a)
                .map(|n| n.flowable.is_some())
                .unwrap_or(false)
        }))
    }

    /// Position of `id` in the flow space of its flowable.
    pub fn flow_position(&self, id: NodeId) -> Result<Point<Unit>, GraphError> {
        let flowable = self
            .flowable_of(id)?
            .ok_or(GraphError::NotInFlowable { node: id })?;
        self.lift(id, Point::ORIGIN, flowable)
    }

    /// Position of `dst` relative to `src` in flow space, ignoring any line
    /// or page break between them.
    pub fn map_between_in_flowable(
        &self,
        src: NodeId,
        dst: NodeId,
    ) -> Result<Point<Unit>, GraphError> {
        let a = self
            .flowable_of(src)?
            .ok_or(GraphError::NotInFlowable { node: src })?;
        let b = self
            .flowable_of(dst)?
            .ok_or(GraphError::NotInFlowable { node: dst })?;
        if a != b {
            return Err(GraphError::DifferentFlowables { a: src, b: dst });
        }
        Ok(self.lift(dst, Point::ORIGIN, a)? - self.lift(src, Point::ORIGIN, a)?)
    }

    /// Document-space top-left corner of `line` of flowable `id`.
    pub fn line_origin(&self, id: NodeId, line: usize) -> Result<Point<Unit>, GraphError> {
        let flowable = self.flowable(id)?;
        let (page, start) = self.flowable_anchor(id)?;
        let placement = flowable.placement(line, start, self.paper().live_height());
        Ok(self.page_origin(page.saturating_add(placement.page_offset)) + placement.origin)
    }

    /// Document-space rectangles covered by `extent` (relative to `id`):
    /// one per flowable line it touches, or a single one outside flowables.
    /// Rectangles come back with non-negative sizes.
    pub fn page_space_rects(
        &self,
        id: NodeId,
        extent: Rect<Unit>,
    ) -> Result<Vec<Rect<Unit>>, GraphError> {
        let extent = extent.normalized();
        let Some(fid) = self.flowable_of(id)? else {
            return Ok(vec![extent.translated(self.document_position(id)?)]);
        };
        let flowable = self.flowable(fid)?;
        let at = self.flow_position(id)?;
        let x0 = at.x + extent.x;
        let x1 = x0 + extent.width;
        let lines = flowable.lines_between(x0, x1);
        let several = lines.start() != lines.end();

        let mut rects = Vec::new();
        for line in lines {
            let (lo, hi) = flowable.line_bounds(line);
            let start = lo.map_or(x0, |lo| x0.max(lo));
            let end = hi.map_or(x1, |hi| x1.min(hi));
            if end < start || (several && end == start) {
                continue;
            }
            let origin = self.line_origin(fid, line)?;
            rects.push(Rect::new(
                origin.x + (start - flowable.line_start(line)),
                origin.y + at.y + extent.y,
                end - start,
                extent.height,
            ));
        }
        Ok(rects)
    }
}
