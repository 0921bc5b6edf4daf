//! Vector paths whose points may be anchored to other nodes.
//!
//! Elements are stored flat: a cubic segment is two `ControlPoint` elements
//! followed by a `CurveTo`. Each element's point is relative to its anchor,
//! which defaults to the path node itself.

use crate::errors::{GraphError, PathError, Result};
use crate::graph::{Document, NodeId};
use crate::graphic::Graphic;
use crate::types::Point;
use crate::units::Unit;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    MoveTo,
    LineTo,
    ControlPoint,
    CurveTo,
}

/// A point relative to `anchor`, or to the owning path when `anchor` is `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchoredPoint {
    pub pos: Point<Unit>,
    pub anchor: Option<NodeId>,
}

impl AnchoredPoint {
    pub fn new(pos: Point<Unit>, anchor: Option<NodeId>) -> Self {
        AnchoredPoint { pos, anchor }
    }

    /// `pos` in `anchor`'s local space.
    pub fn on(anchor: NodeId, pos: Point<Unit>) -> Self {
        AnchoredPoint {
            pos,
            anchor: Some(anchor),
        }
    }
}

impl From<Point<Unit>> for AnchoredPoint {
    fn from(pos: Point<Unit>) -> Self {
        AnchoredPoint { pos, anchor: None }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathElement {
    pub kind: ElementKind,
    pub point: AnchoredPoint,
}

/// An element with its point resolved into the path's own space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedElement {
    pub kind: ElementKind,
    pub pos: Point<Unit>,
}

impl ResolvedElement {
    pub fn new(kind: ElementKind, pos: Point<Unit>) -> Self {
        ResolvedElement { kind, pos }
    }
}

/// Path geometry carried by a `Graphic::Path` node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    elements: Vec<PathElement>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn builder(&mut self) -> PathBuilder<'_> {
        PathBuilder::new(self)
    }

    /// Check that every curve has exactly two control points.
    pub fn validate(&self, path: NodeId) -> std::result::Result<(), PathError> {
        let mut pending = 0usize;
        for (index, element) in self.elements.iter().enumerate() {
            match element.kind {
                ElementKind::ControlPoint => pending += 1,
                ElementKind::CurveTo => {
                    if pending != 2 {
                        return Err(PathError::MalformedCurve {
                            path,
                            index,
                            control_points: pending,
                        });
                    }
                    pending = 0;
                }
                ElementKind::MoveTo | ElementKind::LineTo => {
                    if pending > 0 {
                        return Err(PathError::DanglingControlPoint {
                            path,
                            index: index - pending,
                        });
                    }
                }
            }
        }
        if pending > 0 {
            return Err(PathError::DanglingControlPoint {
                path,
                index: self.elements.len() - pending,
            });
        }
        Ok(())
    }
}

/// Appends elements to a path, tracking the current position.
///
/// `line_to` and `cubic_to` on an empty path start with `move_to(origin)`.
#[derive(Debug)]
pub struct PathBuilder<'a> {
    data: &'a mut PathData,
}

impl<'a> PathBuilder<'a> {
    pub fn new(data: &'a mut PathData) -> Self {
        PathBuilder { data }
    }

    fn push(&mut self, kind: ElementKind, point: AnchoredPoint) {
        self.data.elements.push(PathElement { kind, point });
    }

    fn ensure_started(&mut self) {
        if self.data.elements.is_empty() {
            self.push(ElementKind::MoveTo, Point::ORIGIN.into());
        }
    }

    pub fn move_to(&mut self, to: impl Into<AnchoredPoint>) -> &mut Self {
        self.push(ElementKind::MoveTo, to.into());
        self
    }

    pub fn line_to(&mut self, to: impl Into<AnchoredPoint>) -> &mut Self {
        self.ensure_started();
        self.push(ElementKind::LineTo, to.into());
        self
    }

    pub fn cubic_to(
        &mut self,
        c1: impl Into<AnchoredPoint>,
        c2: impl Into<AnchoredPoint>,
        end: impl Into<AnchoredPoint>,
    ) -> &mut Self {
        self.ensure_started();
        self.push(ElementKind::ControlPoint, c1.into());
        self.push(ElementKind::ControlPoint, c2.into());
        self.push(ElementKind::CurveTo, end.into());
        self
    }

    /// Start a new subpath at the path's origin.
    pub fn close_subpath(&mut self) -> &mut Self {
        self.move_to(Point::ORIGIN)
    }

    /// Append an element as-is; structure is checked when the path is resolved.
    pub fn push_raw(&mut self, kind: ElementKind, point: AnchoredPoint) -> &mut Self {
        self.push(kind, point);
        self
    }

    /// The last drawn point, or the origin for an empty path.
    pub fn current_position(&self) -> AnchoredPoint {
        self.data
            .elements
            .iter()
            .rev()
            .find(|e| e.kind != ElementKind::ControlPoint)
            .map(|e| e.point)
            .unwrap_or_else(|| Point::ORIGIN.into())
    }
}

fn not_a_path(node: NodeId) -> GraphError {
    GraphError::MissingCapability {
        node,
        capability: "path",
    }
}

impl Document {
    pub fn add_path(&mut self, parent: NodeId, pos: Point<Unit>, data: PathData) -> Result<NodeId> {
        Ok(self.insert(parent, pos, data)?)
    }

    /// A path with one straight segment from its origin to `end`.
    pub fn straight_line(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        end: impl Into<AnchoredPoint>,
    ) -> Result<NodeId> {
        let mut data = PathData::new();
        data.builder().line_to(end);
        self.add_path(parent, pos, data)
    }

    pub fn path_data(&self, id: NodeId) -> Result<&PathData> {
        match self.node(id)?.graphic() {
            Graphic::Path(data) => Ok(data),
            _ => Err(not_a_path(id).into()),
        }
    }

    /// Builder appending to an existing path node.
    pub fn path_builder(&mut self, id: NodeId) -> Result<PathBuilder<'_>> {
        match self.node_mut(id)?.graphic_mut() {
            Graphic::Path(data) => Ok(PathBuilder::new(data)),
            _ => Err(not_a_path(id).into()),
        }
    }

    /// Element positions in the path's own space, anchors resolved.
    ///
    /// Inside a flowable the positions stay in flow space.
    pub fn resolve_path(&self, id: NodeId) -> Result<Vec<ResolvedElement>> {
        let data = self.path_data(id)?;
        data.validate(id)?;
        let mut resolved = Vec::with_capacity(data.len());
        for element in data.elements() {
            let pos = match element.point.anchor {
                Some(anchor) if anchor != id => self.map_point(anchor, element.point.pos, id)?,
                _ => element.point.pos,
            };
            resolved.push(ResolvedElement::new(element.kind, pos));
        }
        Ok(resolved)
    }

    /// Horizontal extent of the resolved path (max x minus min x).
    pub fn breakable_width(&self, id: NodeId) -> Result<Unit> {
        let resolved = self.resolve_path(id)?;
        let mut xs = resolved.iter().map(|e| e.pos.x);
        let Some(first) = xs.next() else {
            return Ok(Unit::ZERO);
        };
        let (lo, hi) = xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
        Ok(hi - lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn kinds(data: &PathData) -> Vec<ElementKind> {
        data.elements().iter().map(|e| e.kind).collect()
    }

    // ==================== Builder tests ====================

    #[test]
    fn line_to_on_empty_path_starts_at_origin() {
        let mut data = PathData::new();
        data.builder().line_to(Point::xy(5.0, 0.0));
        assert_eq!(kinds(&data), vec![ElementKind::MoveTo, ElementKind::LineTo]);
        assert_eq!(data.elements()[0].point.pos, Point::ORIGIN);
    }

    #[test]
    fn cubic_to_appends_two_control_points() {
        let mut data = PathData::new();
        data.builder()
            .move_to(Point::xy(1.0, 1.0))
            .cubic_to(Point::xy(2.0, 0.0), Point::xy(3.0, 0.0), Point::xy(4.0, 1.0));
        assert_eq!(
            kinds(&data),
            vec![
                ElementKind::MoveTo,
                ElementKind::ControlPoint,
                ElementKind::ControlPoint,
                ElementKind::CurveTo
            ]
        );
    }

    #[test]
    fn current_position_skips_control_points() {
        let mut data = PathData::new();
        let mut builder = data.builder();
        assert_eq!(builder.current_position().pos, Point::ORIGIN);
        builder.cubic_to(Point::xy(2.0, 0.0), Point::xy(3.0, 0.0), Point::xy(4.0, 1.0));
        assert_eq!(builder.current_position().pos, Point::xy(4.0, 1.0));
        builder.close_subpath();
        assert_eq!(builder.current_position().pos, Point::ORIGIN);
    }

    // ==================== Validation tests ====================

    #[test]
    fn curve_needs_exactly_two_control_points() {
        let id = NodeId::new(7, 1);
        let mut data = PathData::new();
        data.builder()
            .move_to(Point::ORIGIN)
            .push_raw(ElementKind::ControlPoint, Point::xy(1.0, 1.0).into())
            .push_raw(ElementKind::CurveTo, Point::xy(2.0, 2.0).into());
        assert_eq!(
            data.validate(id),
            Err(PathError::MalformedCurve {
                path: id,
                index: 2,
                control_points: 1
            })
        );
    }

    #[test]
    fn trailing_control_points_are_dangling() {
        let id = NodeId::new(7, 1);
        let mut data = PathData::new();
        data.builder()
            .move_to(Point::ORIGIN)
            .push_raw(ElementKind::ControlPoint, Point::xy(1.0, 1.0).into())
            .line_to(Point::xy(3.0, 3.0));
        assert_eq!(
            data.validate(id),
            Err(PathError::DanglingControlPoint { path: id, index: 1 })
        );
    }

    // ==================== Resolution tests ====================

    #[test]
    fn anchors_resolve_into_path_space() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let target = doc.add_group(page, Point::xy(100.0, 50.0)).unwrap();
        let mut data = PathData::new();
        data.builder()
            .move_to(Point::xy(0.0, 0.0))
            .line_to(AnchoredPoint::on(target, Point::xy(0.0, 10.0)));
        let path = doc.add_path(page, Point::xy(20.0, 20.0), data).unwrap();
        let resolved = doc.resolve_path(path).unwrap();
        assert_eq!(resolved[1].pos, Point::xy(80.0, 40.0));
        assert_eq!(doc.breakable_width(path).unwrap(), Unit(80.0));

        // anchors follow their node
        doc.set_pos(target, Point::xy(120.0, 50.0)).unwrap();
        assert_eq!(doc.breakable_width(path).unwrap(), Unit(100.0));
    }

    #[test]
    fn resolve_rejects_malformed_paths() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let path = doc.add_path(page, Point::ORIGIN, PathData::new()).unwrap();
        doc.path_builder(path)
            .unwrap()
            .push_raw(ElementKind::CurveTo, Point::xy(1.0, 1.0).into());
        let err = doc.resolve_path(path).unwrap_err();
        assert!(matches!(
            err,
            Error::Path(PathError::MalformedCurve {
                control_points: 0,
                ..
            })
        ));
    }

    #[test]
    fn non_path_nodes_have_no_path_data() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let g = doc.add_group(page, Point::ORIGIN).unwrap();
        assert!(matches!(
            doc.path_data(g),
            Err(Error::Graph(GraphError::MissingCapability {
                capability: "path",
                ..
            }))
        ));
        let empty = doc.add_path(page, Point::ORIGIN, PathData::new()).unwrap();
        assert_eq!(doc.breakable_width(empty).unwrap(), Unit::ZERO);
    }
}
