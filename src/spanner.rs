//! Spanners: items defined by two independently anchored endpoints.
//!
//! The start of a spanner is its node's own origin; the end is an
//! [`AnchoredPoint`] that may sit on any other node, possibly on a different
//! flowable line. Endpoints are resolved on every call, so moving either
//! anchor is reflected immediately.

use glam::DVec2;

use crate::errors::{GraphError, Result};
use crate::graph::{Document, NodeId};
use crate::path::{AnchoredPoint, PathData};
use crate::style::{Brush, Pen};
use crate::types::Point;
use crate::units::Unit;

/// SMuFL fallbacks, in staff spaces, for fonts whose metadata omits them.
const BEAM_THICKNESS: f64 = 0.5;
const SLUR_ENDPOINT_THICKNESS: f64 = 0.1;
const SLUR_MIDPOINT_THICKNESS: f64 = 0.22;

/// Spanner component of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpannerData {
    pub end: AnchoredPoint,
}

impl SpannerData {
    pub fn new(end: impl Into<AnchoredPoint>) -> Self {
        SpannerData { end: end.into() }
    }
}

/// Which end of a hairpin is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HairpinDirection {
    /// Opens toward the end point.
    Crescendo,
    /// Opens toward the start point.
    Diminuendo,
}

/// Which way a slur arches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerticalDirection {
    Up,
    Down,
}

impl VerticalDirection {
    /// Sign of a y offset pointing this way; y grows downwards.
    fn sign(self) -> f64 {
        match self {
            VerticalDirection::Up => -1.0,
            VerticalDirection::Down => 1.0,
        }
    }
}

impl Document {
    /// Give `id` a spanner component ending at `end`.
    pub fn attach_spanner(&mut self, id: NodeId, end: impl Into<AnchoredPoint>) -> Result<()> {
        self.node_mut(id)?.spanner = Some(SpannerData::new(end));
        Ok(())
    }

    pub fn spanner_data(&self, id: NodeId) -> Result<&SpannerData> {
        Ok(self
            .node(id)?
            .spanner()
            .ok_or(GraphError::MissingCapability {
                node: id,
                capability: "spanner",
            })?)
    }

    /// Both endpoints of spanner `id` expressed in `space`'s local space.
    pub fn spanner_endpoints(
        &self,
        id: NodeId,
        space: NodeId,
    ) -> Result<(Point<Unit>, Point<Unit>)> {
        let end = self.spanner_data(id)?.end;
        let start = self.map_to(id, space)?;
        let end = self.map_point(end.anchor.unwrap_or(id), end.pos, space)?;
        Ok((start, end))
    }

    /// End point relative to the spanner's own origin.
    fn spanner_delta(&self, id: NodeId) -> Result<DVec2> {
        let (start, end) = self.spanner_endpoints(id, id)?;
        Ok((end - start).to_dvec2())
    }

    /// Straight-line distance between the endpoints.
    pub fn spanner_length(&self, id: NodeId) -> Result<Unit> {
        Ok(Unit(self.spanner_delta(id)?.length()))
    }

    /// Unit vector from start to end, `None` when both endpoints coincide.
    pub fn spanner_direction(&self, id: NodeId) -> Result<Option<DVec2>> {
        Ok(self.spanner_delta(id)?.try_normalize())
    }

    /// dy / dx of the spanner, `None` when it is vertical.
    pub fn spanner_slope(&self, id: NodeId) -> Result<Option<f64>> {
        let delta = self.spanner_delta(id)?;
        Ok(Unit(delta.y).checked_div(Unit(delta.x)))
    }

    /// A straight path spanning from its own origin to `end`.
    pub fn add_spanner_line(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        end: impl Into<AnchoredPoint>,
    ) -> Result<NodeId> {
        let end = end.into();
        let id = self.straight_line(parent, pos, end)?;
        self.attach_spanner(id, end)?;
        Ok(id)
    }

    /// The three points of a hairpin drawn along spanner `id`: one arm end,
    /// the joint, and the other arm end.
    ///
    /// The arms open by `width` perpendicular to the spanner. Each point is
    /// anchored to the endpoint it belongs to, so the hairpin follows both
    /// anchors.
    pub fn hairpin_points(
        &self,
        id: NodeId,
        direction: HairpinDirection,
        width: Unit,
    ) -> Result<[AnchoredPoint; 3]> {
        let end = self.spanner_data(id)?.end;
        let start = AnchoredPoint::on(id, Point::ORIGIN);
        let end = AnchoredPoint::on(end.anchor.unwrap_or(id), end.pos);
        let (joint, open) = match direction {
            HairpinDirection::Crescendo => (start, end),
            HairpinDirection::Diminuendo => (end, start),
        };

        let (dx, dy) = {
            let delta = self.spanner_delta(id)?;
            (delta.x, delta.y)
        };
        let half = width.0 / 2.0;
        let offset = if dy == 0.0 {
            DVec2::new(0.0, half)
        } else if dx == 0.0 {
            DVec2::new(half, 0.0)
        } else {
            let perpendicular_slope = -dx / dy;
            let ox = half / (1.0 + perpendicular_slope * perpendicular_slope).sqrt();
            DVec2::new(ox, perpendicular_slope * ox)
        };
        let offset = Point::from_dvec2(offset);

        let arm = |sign: f64| AnchoredPoint {
            pos: open.pos + offset * sign,
            anchor: open.anchor,
        };
        Ok([arm(1.0), joint, arm(-1.0)])
    }

    /// A hairpin path from `pos` (relative to `parent`) to `end`.
    pub fn add_hairpin(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        end: impl Into<AnchoredPoint>,
        direction: HairpinDirection,
        width: Unit,
    ) -> Result<NodeId> {
        let id = self.add_path(parent, pos, PathData::new())?;
        self.attach_spanner(id, end)?;
        let [first, joint, last] = self.hairpin_points(id, direction, width)?;
        self.path_builder(id)?
            .move_to(first)
            .line_to(joint)
            .line_to(last);
        self.node_mut(id)?.set_brush(Some(Brush::no_brush()));
        Ok(id)
    }

    /// Engraving default `name` of music font `family` on `parent`'s staff,
    /// or `fallback` staff spaces when the font does not define it.
    fn engraving_default_at(
        &self,
        parent: NodeId,
        family: &str,
        name: &str,
        fallback: f64,
    ) -> Result<Unit> {
        let font = self.music_font_for(parent, family)?;
        Ok(font
            .engraving_default(name)
            .unwrap_or(font.staff_space() * fallback))
    }

    /// A beam from `pos` (relative to `parent`) to `end`.
    ///
    /// The beam is a filled quadrilateral hanging below the line between its
    /// endpoints, as thick as the `beamThickness` of music font `family`.
    /// Its right edge is anchored with `end`.
    pub fn add_beam(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        end: impl Into<AnchoredPoint>,
        family: &str,
    ) -> Result<NodeId> {
        let thickness =
            self.engraving_default_at(parent, family, "beamThickness", BEAM_THICKNESS)?;
        let end = end.into();
        let id = self.add_path(parent, pos, PathData::new())?;
        self.attach_spanner(id, end)?;

        let down = Point::new(Unit::ZERO, thickness);
        self.path_builder(id)?
            .move_to(Point::ORIGIN)
            .line_to(end)
            .line_to(AnchoredPoint {
                pos: end.pos + down,
                anchor: end.anchor,
            })
            .line_to(down)
            .close_subpath();
        self.node_mut(id)?.set_pen(Some(Pen::no_pen()));
        Ok(id)
    }

    /// A slur from `pos` (relative to `parent`) to `end`, arching in
    /// `direction`.
    ///
    /// The slur is a filled crescent of two cubic curves. It is
    /// `slurEndpointThickness` thick at the ends and `slurMidpointThickness`
    /// in the middle. The arch is a sixth of the span, kept between one and
    /// three staff spaces. Control points near the end are anchored with
    /// `end`, so the curve follows both anchors.
    pub fn add_slur(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        end: impl Into<AnchoredPoint>,
        direction: VerticalDirection,
        family: &str,
    ) -> Result<NodeId> {
        let space = self.music_font_for(parent, family)?.staff_space();
        let endpoint = self.engraving_default_at(
            parent,
            family,
            "slurEndpointThickness",
            SLUR_ENDPOINT_THICKNESS,
        )?;
        let midpoint = self.engraving_default_at(
            parent,
            family,
            "slurMidpointThickness",
            SLUR_MIDPOINT_THICKNESS,
        )?;
        let end = end.into();
        let id = self.add_path(parent, pos, PathData::new())?;
        self.attach_spanner(id, end)?;

        let delta = self.spanner_delta(id)?;
        let arch = (Unit(delta.length()) / 6.0).max(space).min(space * 3.0);
        // a cubic reaches 3/4 of its control offset at the middle
        let swell = (midpoint - endpoint) * (4.0 / 3.0);
        let outer = endpoint + arch + swell;

        let sign = direction.sign();
        let quarter = Point::from_dvec2(delta / 4.0);
        let lift = |by: Unit| Point::new(Unit::ZERO, by * sign);
        let near = |by: Unit| AnchoredPoint::from(quarter + lift(by));
        let far = |by: Unit| AnchoredPoint {
            pos: end.pos - quarter + lift(by),
            anchor: end.anchor,
        };
        let cap = AnchoredPoint {
            pos: end.pos + lift(endpoint),
            anchor: end.anchor,
        };

        self.path_builder(id)?
            .move_to(Point::ORIGIN)
            .cubic_to(near(arch), far(arch), end)
            .line_to(cap)
            .cubic_to(far(outer), near(outer), lift(endpoint))
            .close_subpath();
        self.node_mut(id)?.set_pen(Some(Pen::no_pen()));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, FontError};
    use crate::flowable::FlowableConfig;
    use crate::path::ElementKind;
    use crate::render::PathSlice;
    use crate::staff::StaffConfig;
    use crate::units::Mm;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==================== Length tests ====================

    #[test]
    fn three_four_five() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let s = doc
            .add_spanner_line(page, Point::ORIGIN, Point::xy(3.0, 4.0))
            .unwrap();
        assert_eq!(doc.spanner_length(s).unwrap(), Unit(5.0));
    }

    #[test]
    fn length_with_end_on_same_parent() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let s = doc
            .add_spanner_line(
                page,
                Point::xy(1.0, 2.0),
                AnchoredPoint::on(page, Point::xy(5.0, 7.0)),
            )
            .unwrap();
        assert!(close(doc.spanner_length(s).unwrap().0, 41f64.sqrt()));
    }

    #[test]
    fn length_with_end_relative_to_self() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let parent = doc.add_group(page, Point::xy(1.0, 2.0)).unwrap();
        let s = doc
            .add_spanner_line(parent, Point::xy(3.0, 7.0), Point::xy(4.0, 5.0))
            .unwrap();
        assert!(close(doc.spanner_length(s).unwrap().0, 6.4031242374328485));
    }

    #[test]
    fn length_with_end_on_other_parent() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let p1 = doc.add_group(page, Point::xy(1.0, 2.0)).unwrap();
        let p2 = doc.add_group(page, Point::xy(11.0, 12.0)).unwrap();
        let s = doc
            .add_spanner_line(
                p1,
                Point::xy(1.0, 2.0),
                AnchoredPoint::on(p2, Point::xy(4.0, 5.0)),
            )
            .unwrap();
        assert!(close(doc.spanner_length(s).unwrap().0, 18.384776310850235));

        // endpoints follow their anchors
        doc.set_pos(p2, Point::xy(1.0, 3.0)).unwrap();
        assert!(close(doc.spanner_length(s).unwrap().0, 5.0));
    }

    // ==================== Direction tests ====================

    #[test]
    fn direction_and_slope() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let s = doc
            .add_spanner_line(page, Point::ORIGIN, Point::xy(3.0, 4.0))
            .unwrap();
        let dir = doc.spanner_direction(s).unwrap().unwrap();
        assert!(close(dir.x, 0.6) && close(dir.y, 0.8));
        assert!(close(doc.spanner_slope(s).unwrap().unwrap(), 4.0 / 3.0));

        let vertical = doc
            .add_spanner_line(page, Point::ORIGIN, Point::xy(0.0, 4.0))
            .unwrap();
        assert_eq!(doc.spanner_slope(vertical).unwrap(), None);

        let dot = doc
            .add_spanner_line(page, Point::ORIGIN, Point::ORIGIN)
            .unwrap();
        assert_eq!(doc.spanner_direction(dot).unwrap(), None);
    }

    #[test]
    fn endpoints_in_any_space() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let a = doc.add_group(page, Point::xy(10.0, 10.0)).unwrap();
        let b = doc.add_group(page, Point::xy(50.0, 0.0)).unwrap();
        let s = doc
            .add_spanner_line(a, Point::xy(1.0, 1.0), AnchoredPoint::on(b, Point::xy(2.0, 3.0)))
            .unwrap();
        let (start, end) = doc.spanner_endpoints(s, page).unwrap();
        assert_eq!(start, Point::xy(11.0, 11.0));
        assert_eq!(end, Point::xy(52.0, 3.0));
    }

    #[test]
    fn spanner_spans_flowable_lines_in_flow_space() {
        use crate::flowable::FlowableConfig;
        let mut doc = Document::default();
        let flow = doc
            .add_flowable(
                0,
                Point::ORIGIN,
                FlowableConfig::new(Unit(1000.0), Unit(100.0), Unit(20.0)),
            )
            .unwrap();
        let a = doc.add_group(flow, Point::xy(50.0, 0.0)).unwrap();
        let b = doc.add_group(flow, Point::xy(350.0, 0.0)).unwrap();
        let s = doc
            .add_spanner_line(a, Point::ORIGIN, AnchoredPoint::on(b, Point::ORIGIN))
            .unwrap();
        assert_eq!(doc.spanner_length(s).unwrap(), Unit(300.0));
    }

    #[test]
    fn plain_nodes_are_not_spanners() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let g = doc.add_group(page, Point::ORIGIN).unwrap();
        assert!(matches!(
            doc.spanner_length(g),
            Err(Error::Graph(GraphError::MissingCapability {
                capability: "spanner",
                ..
            }))
        ));
    }

    // ==================== Hairpin tests ====================

    /// Two parents at (0, 0) and (10, 2) on one page.
    fn hairpin_doc() -> (Document, NodeId, NodeId) {
        let mut doc = Document::default();
        let page = doc.page(0);
        let left = doc.add_group(page, Point::ORIGIN).unwrap();
        let right = doc.add_group(page, Point::xy(10.0, 2.0)).unwrap();
        (doc, left, right)
    }

    #[test]
    fn horizontal_hairpin_same_parent() {
        let (mut doc, left, _) = hairpin_doc();
        let s = doc
            .add_spanner_line(left, Point::ORIGIN, AnchoredPoint::on(left, Point::xy(10.0, 0.0)))
            .unwrap();
        let cresc = doc
            .hairpin_points(s, HairpinDirection::Crescendo, Unit(2.0))
            .unwrap();
        assert_eq!(
            cresc,
            [
                AnchoredPoint::on(left, Point::xy(10.0, 1.0)),
                AnchoredPoint::on(s, Point::ORIGIN),
                AnchoredPoint::on(left, Point::xy(10.0, -1.0)),
            ]
        );
        let dim = doc
            .hairpin_points(s, HairpinDirection::Diminuendo, Unit(2.0))
            .unwrap();
        assert_eq!(
            dim,
            [
                AnchoredPoint::on(s, Point::xy(0.0, 1.0)),
                AnchoredPoint::on(left, Point::xy(10.0, 0.0)),
                AnchoredPoint::on(s, Point::xy(0.0, -1.0)),
            ]
        );
    }

    #[test]
    fn horizontal_hairpin_different_parents() {
        let (mut doc, left, right) = hairpin_doc();
        let s = doc
            .add_spanner_line(
                left,
                Point::xy(0.0, 2.0),
                AnchoredPoint::on(right, Point::xy(1.0, 0.0)),
            )
            .unwrap();
        let cresc = doc
            .hairpin_points(s, HairpinDirection::Crescendo, Unit(2.0))
            .unwrap();
        assert_eq!(cresc[0], AnchoredPoint::on(right, Point::xy(1.0, 1.0)));
        assert_eq!(cresc[2], AnchoredPoint::on(right, Point::xy(1.0, -1.0)));
        // the joint sits on the start, which is (0, 2) from the left parent
        assert_eq!(doc.map_to(s, left).unwrap(), Point::xy(0.0, 2.0));
    }

    #[test]
    fn vertical_hairpin_different_parents() {
        let (mut doc, left, right) = hairpin_doc();
        let s = doc
            .add_spanner_line(
                left,
                Point::ORIGIN,
                AnchoredPoint::on(right, Point::xy(-10.0, 1.0)),
            )
            .unwrap();
        let cresc = doc
            .hairpin_points(s, HairpinDirection::Crescendo, Unit(2.0))
            .unwrap();
        assert_eq!(cresc[0], AnchoredPoint::on(right, Point::xy(-9.0, 1.0)));
        assert_eq!(cresc[2], AnchoredPoint::on(right, Point::xy(-11.0, 1.0)));

        let dim = doc
            .hairpin_points(s, HairpinDirection::Diminuendo, Unit(2.0))
            .unwrap();
        assert_eq!(dim[0], AnchoredPoint::on(s, Point::xy(1.0, 0.0)));
        assert_eq!(dim[1], AnchoredPoint::on(right, Point::xy(-10.0, 1.0)));
        assert_eq!(dim[2], AnchoredPoint::on(s, Point::xy(-1.0, 0.0)));
    }

    #[test]
    fn diagonal_hairpin_opens_perpendicular() {
        let (mut doc, left, right) = hairpin_doc();
        let s = doc
            .add_spanner_line(left, Point::ORIGIN, AnchoredPoint::on(left, Point::xy(4.0, 4.0)))
            .unwrap();
        for direction in [HairpinDirection::Crescendo, HairpinDirection::Diminuendo] {
            let [a, _, c] = doc.hairpin_points(s, direction, Unit(2.0)).unwrap();
            assert!(close(a.pos.x.0, c.pos.y.0));
            assert!(close(a.pos.y.0, c.pos.x.0));
        }

        let dim = doc
            .add_spanner_line(
                left,
                Point::ORIGIN,
                AnchoredPoint::on(right, Point::xy(-6.0, 2.0)),
            )
            .unwrap();
        let [a, joint, c] = doc
            .hairpin_points(dim, HairpinDirection::Diminuendo, Unit(2.0))
            .unwrap();
        assert_eq!(joint, AnchoredPoint::on(right, Point::xy(-6.0, 2.0)));
        assert!(close(a.pos.x.0, c.pos.y.0));
        assert!(close(a.pos.y.0, c.pos.x.0));
        // arms sit half the width off the open end
        assert!(close(a.pos.distance_to(Point::ORIGIN).0, 1.0));
    }

    #[test]
    fn add_hairpin_draws_three_points() {
        let (mut doc, left, _) = hairpin_doc();
        let h = doc
            .add_hairpin(
                left,
                Point::ORIGIN,
                Point::xy(10.0, 0.0),
                HairpinDirection::Crescendo,
                Unit(2.0),
            )
            .unwrap();
        let resolved: Vec<_> = doc
            .resolve_path(h)
            .unwrap()
            .into_iter()
            .map(|e| e.pos)
            .collect();
        assert_eq!(
            resolved,
            vec![
                Point::xy(10.0, 1.0),
                Point::xy(0.0, 0.0),
                Point::xy(10.0, -1.0)
            ]
        );
        assert_eq!(doc.spanner_length(h).unwrap(), Unit(10.0));
        // stroked only
        assert_eq!(doc.resolved_style(h).unwrap().brush, Brush::no_brush());
    }

    // ==================== Beam and slur tests ====================

    const BRAVURA: &str = r#"{
        "fontName": "Bravura",
        "engravingDefaults": {
            "beamThickness": 0.5,
            "slurEndpointThickness": 0.1,
            "slurMidpointThickness": 0.22
        }
    }"#;

    /// A staff across a flowable with 30mm lines, and two parents on the
    /// staff at (0, 0) and (10, 2).
    fn staff_doc() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::default();
        doc.fonts_mut()
            .register_music_font("Bravura", BRAVURA)
            .unwrap();
        let flow = doc
            .add_flowable(
                0,
                Point::ORIGIN,
                FlowableConfig::new(
                    Mm(10000.0).convert(),
                    Mm(30.0).convert(),
                    Mm(5.0).convert(),
                ),
            )
            .unwrap();
        let staff = doc
            .add_staff(flow, Point::ORIGIN, StaffConfig::new(Mm(5000.0).convert()))
            .unwrap();
        let left = doc.add_group(staff, Point::ORIGIN).unwrap();
        let right = doc.add_group(staff, Point::xy(10.0, 2.0)).unwrap();
        (doc, staff, left, right)
    }

    fn close_pt(a: Point<Unit>, b: Point<Unit>) -> bool {
        close(a.x.0, b.x.0) && close(a.y.0, b.y.0)
    }

    #[test]
    fn beam_shape() {
        let (mut doc, staff, left, right) = staff_doc();
        let end = Point::new(Mm(3.0), Mm(4.0)).to_base();
        let beam = doc
            .add_beam(
                left,
                Point::new(Mm(1.0), Mm(2.0)).to_base(),
                AnchoredPoint::on(right, end),
                "Bravura",
            )
            .unwrap();
        assert_eq!(doc.parent(beam).unwrap(), Some(left));
        assert_eq!(
            doc.node(beam).unwrap().pos(),
            Point::new(Mm(1.0), Mm(2.0)).to_base()
        );

        let thickness = doc.staff(staff).unwrap().staff_space() * 0.5;
        let elements: Vec<_> = doc
            .path_data(beam)
            .unwrap()
            .elements()
            .iter()
            .map(|e| (e.kind, e.point))
            .collect();
        assert_eq!(
            elements,
            vec![
                (ElementKind::MoveTo, AnchoredPoint::from(Point::ORIGIN)),
                (ElementKind::LineTo, AnchoredPoint::on(right, end)),
                (
                    ElementKind::LineTo,
                    AnchoredPoint::on(right, Point::new(end.x, end.y + thickness)),
                ),
                (
                    ElementKind::LineTo,
                    AnchoredPoint::from(Point::new(Unit::ZERO, thickness)),
                ),
                (ElementKind::MoveTo, AnchoredPoint::from(Point::ORIGIN)),
            ]
        );
        let style = doc.resolved_style(beam).unwrap();
        assert!(!style.pen.is_visible());
        assert_eq!(style.brush, doc.config().brush);
    }

    #[test]
    fn beam_thickness_falls_back_without_metadata() {
        let (mut doc, staff, left, right) = staff_doc();
        doc.fonts_mut()
            .register_music_font("Plain", r#"{ "fontName": "Plain" }"#)
            .unwrap();
        let beam = doc
            .add_beam(left, Point::ORIGIN, AnchoredPoint::on(right, Point::ORIGIN), "Plain")
            .unwrap();
        let space = doc.staff(staff).unwrap().staff_space();
        let corner = doc.path_data(beam).unwrap().elements()[3].point.pos;
        assert_eq!(corner, Point::new(Unit::ZERO, space * BEAM_THICKNESS));
    }

    #[test]
    fn beam_needs_a_registered_font() {
        let (mut doc, _, left, right) = staff_doc();
        assert!(matches!(
            doc.add_beam(
                left,
                Point::ORIGIN,
                AnchoredPoint::on(right, Point::ORIGIN),
                "Petaluma"
            ),
            Err(Error::Font(FontError::UnregisteredFont { .. }))
        ));
    }

    #[test]
    fn slur_is_two_anchored_curves() {
        let (mut doc, staff, left, right) = staff_doc();
        let slur = doc
            .add_slur(
                left,
                Point::xy(1.0, 2.0),
                AnchoredPoint::on(right, Point::xy(3.0, 4.0)),
                VerticalDirection::Up,
                "Bravura",
            )
            .unwrap();
        let data = doc.path_data(slur).unwrap();
        let kinds: Vec<_> = data.elements().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::MoveTo,
                ElementKind::ControlPoint,
                ElementKind::ControlPoint,
                ElementKind::CurveTo,
                ElementKind::LineTo,
                ElementKind::ControlPoint,
                ElementKind::ControlPoint,
                ElementKind::CurveTo,
                ElementKind::MoveTo,
            ]
        );
        let anchors: Vec<_> = data.elements().iter().map(|e| e.point.anchor).collect();
        let r = Some(right);
        assert_eq!(anchors, vec![None, None, r, r, r, r, None, None, None]);

        // short span: the arch is one staff space, upwards
        let space = doc.staff(staff).unwrap().staff_space();
        let resolved = doc.resolve_path(slur).unwrap();
        assert!(close_pt(resolved[1].pos, Point::new(Unit(3.0), Unit(1.0) - space)));
        assert!(close_pt(resolved[2].pos, Point::new(Unit(9.0), Unit(3.0) - space)));
        assert!(close_pt(resolved[3].pos, Point::xy(12.0, 4.0)));
        let endpoint = space * SLUR_ENDPOINT_THICKNESS;
        assert!(close_pt(resolved[4].pos, Point::new(Unit(12.0), Unit(4.0) - endpoint)));
        assert!(close_pt(resolved[7].pos, Point::new(Unit::ZERO, -endpoint)));
        // the outer edge arches further than the inner one
        assert!(resolved[6].pos.y < resolved[1].pos.y);
        assert!(!doc.resolved_style(slur).unwrap().pen.is_visible());
    }

    #[test]
    fn slur_direction_flips_the_arch() {
        let (mut doc, _, left, right) = staff_doc();
        let end = AnchoredPoint::on(right, Point::ORIGIN);
        let up = doc
            .add_slur(left, Point::ORIGIN, end, VerticalDirection::Up, "Bravura")
            .unwrap();
        let down = doc
            .add_slur(left, Point::ORIGIN, end, VerticalDirection::Down, "Bravura")
            .unwrap();
        let up = doc.resolve_path(up).unwrap();
        let down = doc.resolve_path(down).unwrap();
        for i in [1, 2, 5, 6] {
            assert!(close(up[i].pos.x.0, down[i].pos.x.0));
        }
        // mirrored about the chord from (0, 0) to (10, 2)
        assert!(close(up[1].pos.y.0 + down[1].pos.y.0, 2.0 * 0.5));
    }

    #[test]
    fn slur_follows_its_end_anchor() {
        let (mut doc, _, left, right) = staff_doc();
        let slur = doc
            .add_slur(
                left,
                Point::ORIGIN,
                AnchoredPoint::on(right, Point::ORIGIN),
                VerticalDirection::Down,
                "Bravura",
            )
            .unwrap();
        let before = doc.resolve_path(slur).unwrap();
        doc.set_pos(right, Point::xy(14.0, 2.0)).unwrap();
        let after = doc.resolve_path(slur).unwrap();
        assert!(close_pt(after[3].pos, before[3].pos + Point::xy(4.0, 0.0)));
        assert!(close_pt(after[2].pos, before[2].pos + Point::xy(4.0, 0.0)));
        assert_eq!(after[1].pos, before[1].pos);
    }

    #[test]
    fn slur_across_a_line_break_is_sliced() {
        let (mut doc, staff, left, _) = staff_doc();
        // 30mm lines: flow x 100 is on line 1
        let next_line = doc.add_group(staff, Point::xy(100.0, 0.0)).unwrap();
        let slur = doc
            .add_slur(
                left,
                Point::xy(60.0, 0.0),
                AnchoredPoint::on(next_line, Point::ORIGIN),
                VerticalDirection::Up,
                "Bravura",
            )
            .unwrap();
        let slices = doc.slice_path(slur).unwrap();
        let lines: Vec<_> = slices.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![Some(0), Some(1), Some(0)]);
        // the return curve starts from the cap on line 1
        assert!(slices[2].lead_in.is_some());

        let rebuilt: Vec<_> = slices.iter().flat_map(PathSlice::path_elements).collect();
        let resolved = doc.resolve_path(slur).unwrap();
        assert_eq!(rebuilt.len(), resolved.len());
        for (a, b) in rebuilt.iter().zip(&resolved) {
            assert_eq!(a.kind, b.kind);
            assert!(close_pt(a.pos, b.pos));
        }
    }
}
