//! Drawing surfaces.
//!
//! A [`Surface`] receives fully resolved document-space primitives; it never
//! needs to look anything up in the document.

use std::fmt;

use crate::style::{Brush, Style};
use crate::types::Point;
use crate::units::Unit;

use super::slice::ClipSpan;

/// Sink for the primitives of a render pass.
pub trait Surface {
    /// Start a path stroked and filled with `style`, visible only inside `clip`.
    fn begin_path(&mut self, style: &Style, clip: ClipSpan);
    fn move_to(&mut self, to: Point<Unit>);
    fn line_to(&mut self, to: Point<Unit>);
    fn cubic_to(&mut self, c1: Point<Unit>, c2: Point<Unit>, end: Point<Unit>);
    fn end_path(&mut self);
    fn draw_glyph(
        &mut self,
        codepoint: char,
        family: &str,
        size: Unit,
        pos: Point<Unit>,
        brush: &Brush,
    );
    fn draw_text(&mut self, text: &str, family: &str, size: Unit, pos: Point<Unit>, brush: &Brush);
}

/// A primitive captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    BeginPath { style: Style, clip: ClipSpan },
    MoveTo(Point<Unit>),
    LineTo(Point<Unit>),
    CubicTo(Point<Unit>, Point<Unit>, Point<Unit>),
    EndPath,
    Glyph {
        codepoint: char,
        family: String,
        size: Unit,
        pos: Point<Unit>,
        brush: Brush,
    },
    Text {
        text: String,
        family: String,
        size: Unit,
        pos: Point<Unit>,
        brush: Brush,
    },
}

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return if value.is_finite() { "0".to_string() } else { value.to_string() };
    }

    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10_f64.powi(5 - magnitude);
    let rounded = (value * scale).round() / scale;

    let decimals = (5 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

struct Pt(Point<Unit>);

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", fmt_num(self.0.x.0), fmt_num(self.0.y.0))
    }
}

fn fmt_side(side: Option<Unit>) -> String {
    side.map_or_else(|| "-".to_string(), |u| fmt_num(u.0))
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::BeginPath { style, clip } => write!(
                f,
                "path stroke={} width={} {} fill={} clip={}..{}",
                style.pen.color,
                fmt_num(style.pen.thickness.0),
                style.pen.pattern,
                style.brush.color,
                fmt_side(clip.left),
                fmt_side(clip.right),
            ),
            Primitive::MoveTo(p) => write!(f, "  M {}", Pt(*p)),
            Primitive::LineTo(p) => write!(f, "  L {}", Pt(*p)),
            Primitive::CubicTo(c1, c2, end) => {
                write!(f, "  C {} {} {}", Pt(*c1), Pt(*c2), Pt(*end))
            }
            Primitive::EndPath => write!(f, "end"),
            Primitive::Glyph {
                codepoint,
                family,
                size,
                pos,
                brush,
            } => write!(
                f,
                "glyph U+{:04X} {} {} at {} fill={}",
                u32::from(*codepoint),
                family,
                fmt_num(size.0),
                Pt(*pos),
                brush.color,
            ),
            Primitive::Text {
                text,
                family,
                size,
                pos,
                brush,
            } => write!(
                f,
                "text {:?} {} {} at {} fill={}",
                text,
                family,
                fmt_num(size.0),
                Pt(*pos),
                brush.color,
            ),
        }
    }
}

/// Surface that records every primitive, for tests and debugging.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSurface {
    pub primitives: Vec<Primitive>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for RecordingSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for primitive in &self.primitives {
            writeln!(f, "{primitive}")?;
        }
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn begin_path(&mut self, style: &Style, clip: ClipSpan) {
        self.primitives.push(Primitive::BeginPath {
            style: *style,
            clip,
        });
    }

    fn move_to(&mut self, to: Point<Unit>) {
        self.primitives.push(Primitive::MoveTo(to));
    }

    fn line_to(&mut self, to: Point<Unit>) {
        self.primitives.push(Primitive::LineTo(to));
    }

    fn cubic_to(&mut self, c1: Point<Unit>, c2: Point<Unit>, end: Point<Unit>) {
        self.primitives.push(Primitive::CubicTo(c1, c2, end));
    }

    fn end_path(&mut self) {
        self.primitives.push(Primitive::EndPath);
    }

    fn draw_glyph(
        &mut self,
        codepoint: char,
        family: &str,
        size: Unit,
        pos: Point<Unit>,
        brush: &Brush,
    ) {
        self.primitives.push(Primitive::Glyph {
            codepoint,
            family: family.to_string(),
            size,
            pos,
            brush: *brush,
        });
    }

    fn draw_text(&mut self, text: &str, family: &str, size: Unit, pos: Point<Unit>, brush: &Brush) {
        self.primitives.push(Primitive::Text {
            text: text.to_string(),
            family: family.to_string(),
            size,
            pos,
            brush: *brush,
        });
    }
}
