//! What a node draws.
//!
//! A node carries exactly one [`Graphic`]. Spanners, staves and flowables are
//! separate components on the node, so one path can be a staff or a spanner
//! without a type of its own.

use enum_dispatch::enum_dispatch;

use crate::errors::Result;
use crate::font::TextFont;
use crate::graph::{Document, NodeId};
use crate::path::PathData;
use crate::render::RenderItem;
use crate::style::Style;
use crate::types::Point;
use crate::units::Unit;

/// Common behavior for every graphic variant
#[enum_dispatch]
pub trait Draw {
    /// Append the render items of node `id`, whose graphic is `self`.
    ///
    /// Everything emitted is resolved into document space.
    fn draw(
        &self,
        doc: &Document,
        id: NodeId,
        style: Style,
        out: &mut Vec<RenderItem>,
    ) -> Result<()>;
}

#[enum_dispatch(Draw)]
#[derive(Clone, Debug, PartialEq)]
pub enum Graphic {
    Group(Group),
    Path(PathData),
    Glyph(GlyphData),
    Text(TextData),
}

impl Graphic {
    pub fn kind(&self) -> &'static str {
        match self {
            Graphic::Group(_) => "group",
            Graphic::Path(_) => "path",
            Graphic::Glyph(_) => "glyph",
            Graphic::Text(_) => "text",
        }
    }
}

/// A container that draws nothing itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Group;

impl Draw for Group {
    fn draw(&self, _: &Document, _: NodeId, _: Style, _: &mut Vec<RenderItem>) -> Result<()> {
        Ok(())
    }
}

impl Draw for PathData {
    fn draw(
        &self,
        doc: &Document,
        id: NodeId,
        style: Style,
        out: &mut Vec<RenderItem>,
    ) -> Result<()> {
        for slice in doc.slice_path(id)? {
            out.push(RenderItem::Path {
                node: id,
                style,
                slice,
            });
        }
        Ok(())
    }
}

/// One glyph of a font, drawn with its origin at the node's position.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphData {
    pub codepoint: char,
    pub family: String,
    /// Em size.
    pub size: Unit,
}

impl GlyphData {
    pub fn new(codepoint: char, family: impl Into<String>, size: Unit) -> Self {
        GlyphData {
            codepoint,
            family: family.into(),
            size,
        }
    }
}

impl Draw for GlyphData {
    fn draw(
        &self,
        doc: &Document,
        id: NodeId,
        style: Style,
        out: &mut Vec<RenderItem>,
    ) -> Result<()> {
        out.push(RenderItem::Glyph {
            node: id,
            brush: style.brush,
            codepoint: self.codepoint,
            family: self.family.clone(),
            size: self.size,
            pos: doc.document_position(id)?,
        });
        Ok(())
    }
}

/// A run of text, baseline-left at the node's position.
#[derive(Clone, Debug, PartialEq)]
pub struct TextData {
    pub text: String,
    pub family: String,
    pub size: Unit,
}

impl TextData {
    pub fn new(text: impl Into<String>, font: &TextFont) -> Self {
        TextData {
            text: text.into(),
            family: font.family.clone(),
            size: font.size,
        }
    }
}

impl Draw for TextData {
    fn draw(
        &self,
        doc: &Document,
        id: NodeId,
        style: Style,
        out: &mut Vec<RenderItem>,
    ) -> Result<()> {
        out.push(RenderItem::Text {
            node: id,
            brush: style.brush,
            text: self.text.clone(),
            family: self.family.clone(),
            size: self.size,
            pos: doc.document_position(id)?,
        });
        Ok(())
    }
}

impl Document {
    /// Place a raw glyph. See [`Document::add_music_glyph`] for SMuFL names.
    pub fn add_glyph(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        glyph: GlyphData,
    ) -> Result<NodeId> {
        Ok(self.insert(parent, pos, glyph)?)
    }

    /// Pen and brush for `id`, falling back to the document defaults.
    pub fn resolved_style(&self, id: NodeId) -> Result<Style> {
        let node = self.node(id)?;
        Ok(Style {
            pen: node.pen().copied().unwrap_or(self.config().pen),
            brush: node.brush().copied().unwrap_or(self.config().brush),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Brush, Color, Pen};

    #[test]
    fn variants_convert_into_graphic() {
        let g: Graphic = Group.into();
        assert_eq!(g.kind(), "group");
        let g: Graphic = PathData::new().into();
        assert_eq!(g.kind(), "path");
        let g: Graphic = GlyphData::new('\u{E050}', "Bravura", Unit(20.0)).into();
        assert_eq!(g.kind(), "glyph");
    }

    #[test]
    fn style_falls_back_to_document_defaults() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let a = doc.add_group(page, Point::ORIGIN).unwrap();
        assert_eq!(doc.resolved_style(a).unwrap().pen, doc.config().pen);

        let red = Pen::new(Color::rgb(255, 0, 0), Unit(2.0));
        doc.node_mut(a).unwrap().set_pen(Some(red));
        doc.node_mut(a).unwrap().set_brush(Some(Brush::no_brush()));
        let style = doc.resolved_style(a).unwrap();
        assert_eq!(style.pen, red);
        assert_eq!(style.brush, Brush::no_brush());
    }

    #[test]
    fn glyph_draws_at_document_position() {
        let mut doc = Document::default();
        let page = doc.page(0);
        let g = doc
            .add_glyph(
                page,
                Point::xy(10.0, 20.0),
                GlyphData::new('\u{E0A4}', "Bravura", Unit(20.0)),
            )
            .unwrap();
        let style = doc.resolved_style(g).unwrap();
        let mut out = Vec::new();
        doc.node(g)
            .unwrap()
            .graphic()
            .draw(&doc, g, style, &mut out)
            .unwrap();
        let expected = doc.page_origin(0) + Point::xy(10.0, 20.0);
        assert!(matches!(
            &out[..],
            [RenderItem::Glyph { pos, codepoint: '\u{E0A4}', .. }] if *pos == expected
        ));
    }
}
