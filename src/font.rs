//! Font registry and SMuFL glyph metadata.
//!
//! Music fonts are described by their SMuFL metadata file; glyph codepoints
//! come from the shared `glyphnames.json`. Metadata values are in staff
//! spaces with y pointing up; everything handed out here is converted to
//! base units with y pointing down.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::{FontError, Result};
use crate::graph::{Document, NodeId};
use crate::graphic::{GlyphData, TextData};
use crate::types::{Point, Rect};
use crate::units::Unit;

/// SMuFL bounding box, corners in staff spaces (y up).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmuflBox {
    #[serde(rename = "bBoxNE")]
    pub north_east: [f64; 2],
    #[serde(rename = "bBoxSW")]
    pub south_west: [f64; 2],
}

/// The parts of a SMuFL font metadata file used for layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmuflMetadata {
    pub font_name: String,
    #[serde(default)]
    pub engraving_defaults: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub glyph_b_boxes: HashMap<String, SmuflBox>,
    #[serde(default)]
    pub glyph_advance_widths: HashMap<String, f64>,
    #[serde(default)]
    pub glyphs_with_anchors: HashMap<String, HashMap<String, [f64; 2]>>,
}

/// One entry of `glyphnames.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlyphName {
    /// `U+E0A4` style codepoint.
    pub codepoint: String,
    #[serde(default)]
    pub description: String,
}

impl GlyphName {
    pub fn to_char(&self) -> Option<char> {
        let hex = self
            .codepoint
            .strip_prefix("U+")
            .or_else(|| self.codepoint.strip_prefix("u+"))?;
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    }
}

/// Fonts known to a document. Filled during setup, read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct FontRegistry {
    music: HashMap<String, SmuflMetadata>,
    text: HashSet<String>,
    glyph_names: HashMap<String, GlyphName>,
}

impl FontRegistry {
    /// Register a music font from its SMuFL metadata JSON.
    pub fn register_music_font(
        &mut self,
        family: &str,
        metadata_json: &str,
    ) -> Result<(), FontError> {
        let metadata: SmuflMetadata =
            serde_json::from_str(metadata_json).map_err(|source| FontError::InvalidMetadata {
                family: family.to_string(),
                source,
            })?;
        self.music.insert(family.to_string(), metadata);
        Ok(())
    }

    pub fn register_text_font(&mut self, family: &str) {
        self.text.insert(family.to_string());
    }

    /// Load the SMuFL glyph name table (`glyphnames.json`).
    pub fn register_glyph_names(&mut self, json: &str) -> Result<(), FontError> {
        let names: HashMap<String, GlyphName> =
            serde_json::from_str(json).map_err(|source| FontError::InvalidMetadata {
                family: "glyphnames".to_string(),
                source,
            })?;
        self.glyph_names.extend(names);
        Ok(())
    }

    pub fn music_metadata(&self, family: &str) -> Option<&SmuflMetadata> {
        self.music.get(family)
    }

    pub fn has_text_font(&self, family: &str) -> bool {
        self.text.contains(family)
    }

    pub fn glyph_name(&self, name: &str) -> Option<&GlyphName> {
        self.glyph_names.get(name)
    }
}

/// Everything known about one glyph, in base units (y down).
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphInfo {
    pub name: String,
    pub codepoint: Option<char>,
    pub description: Option<String>,
    /// Tight box relative to the glyph origin.
    pub bounding_rect: Option<Rect<Unit>>,
    pub advance_width: Option<Unit>,
    pub anchors: BTreeMap<String, Point<Unit>>,
}

/// A registered music font bound to a staff space.
#[derive(Clone, Copy, Debug)]
pub struct MusicFont<'a> {
    family: &'a str,
    metadata: &'a SmuflMetadata,
    registry: &'a FontRegistry,
    staff_space: Unit,
}

impl<'a> MusicFont<'a> {
    pub fn new(
        registry: &'a FontRegistry,
        family: &'a str,
        staff_space: Unit,
    ) -> Result<Self, FontError> {
        let metadata = registry
            .music_metadata(family)
            .ok_or_else(|| FontError::UnregisteredFont {
                family: family.to_string(),
            })?;
        Ok(MusicFont {
            family,
            metadata,
            registry,
            staff_space,
        })
    }

    pub fn family(&self) -> &'a str {
        self.family
    }

    pub fn staff_space(&self) -> Unit {
        self.staff_space
    }

    /// SMuFL fonts are four staff spaces to the em.
    pub fn em_size(&self) -> Unit {
        self.staff_space * 4.0
    }

    fn scale(&self, spaces: f64) -> Unit {
        self.staff_space * spaces
    }

    fn flip(&self, [x, y]: [f64; 2]) -> Point<Unit> {
        Point::new(self.scale(x), self.scale(-y))
    }

    /// A numeric engraving default (e.g. `stemThickness`) scaled to this
    /// font's staff space.
    pub fn engraving_default(&self, name: &str) -> Option<Unit> {
        self.metadata
            .engraving_defaults
            .get(name)
            .and_then(serde_json::Value::as_f64)
            .map(|v| self.scale(v))
    }

    /// Metadata for `name`, or `None` when neither the glyph name table nor
    /// this font knows anything about it.
    pub fn glyph_info(&self, name: &str) -> Option<GlyphInfo> {
        let entry = self.registry.glyph_name(name);
        let bbox = self.metadata.glyph_b_boxes.get(name);
        let advance = self.metadata.glyph_advance_widths.get(name);
        let anchors = self.metadata.glyphs_with_anchors.get(name);
        if entry.is_none() && bbox.is_none() && advance.is_none() && anchors.is_none() {
            return None;
        }

        let bounding_rect = bbox.and_then(|b| {
            Rect::from_points([self.flip(b.north_east), self.flip(b.south_west)])
        });
        let anchors = anchors
            .map(|a| {
                a.iter()
                    .map(|(anchor, pos)| (anchor.clone(), self.flip(*pos)))
                    .collect()
            })
            .unwrap_or_default();
        Some(GlyphInfo {
            name: name.to_string(),
            codepoint: entry.and_then(GlyphName::to_char),
            description: entry.map(|e| e.description.clone()),
            bounding_rect,
            advance_width: advance.map(|w| self.scale(*w)),
            anchors,
        })
    }
}

/// A registered text font at a given size.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFont {
    pub family: String,
    pub size: Unit,
}

impl Document {
    /// A registered text font at the document's default text size.
    pub fn text_font(&self, family: &str) -> Result<TextFont, FontError> {
        if !self.fonts().has_text_font(family) {
            return Err(FontError::UnregisteredFont {
                family: family.to_string(),
            });
        }
        Ok(TextFont {
            family: family.to_string(),
            size: self.config().text_size,
        })
    }

    /// Music font `family` sized for the staff `parent` sits on, or the
    /// document's staff space when there is none.
    pub fn music_font_for<'a>(&'a self, parent: NodeId, family: &'a str) -> Result<MusicFont<'a>> {
        let space = match self.staff_of(parent)? {
            Some(staff) => self.staff(staff)?.staff_space(),
            None => self.config().staff_space,
        };
        Ok(MusicFont::new(self.fonts(), family, space)?)
    }

    /// Place SMuFL glyph `name` from music font `family`.
    pub fn add_music_glyph(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        family: &str,
        name: &str,
    ) -> Result<NodeId> {
        let glyph = {
            let font = self.music_font_for(parent, family)?;
            let codepoint = font
                .glyph_info(name)
                .and_then(|info| info.codepoint)
                .ok_or_else(|| FontError::GlyphNotFound {
                    family: family.to_string(),
                    name: name.to_string(),
                })?;
            GlyphData::new(codepoint, family, font.em_size())
        };
        Ok(self.insert(parent, pos, glyph)?)
    }

    /// Place a line of text.
    pub fn add_text(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        text: impl Into<String>,
        font: &TextFont,
    ) -> Result<NodeId> {
        Ok(self.insert(parent, pos, TextData::new(text, font))?)
    }
}
