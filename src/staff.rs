//! Staves and staff-relative queries.
//!
//! Vertical positions on a staff are counted in half staff spaces from the
//! middle of the staff, positive upward: on a five-line staff the top line is
//! position 4 and the bottom line is -4. Lines sit on every other position
//! from `line_count - 1` down to `-(line_count - 1)`.

use crate::errors::{GraphError, LayoutError, Result};
use crate::graph::{Document, NodeId};
use crate::path::PathData;
use crate::style::Brush;
use crate::types::Point;
use crate::units::{FixedMeasure, StaffUnit, Unit};

/// Parameters for [`Document::add_staff`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaffConfig {
    pub length: Unit,
    pub line_count: u32,
    /// Line spacing, defaults to the document's staff space.
    pub staff_space: Option<Unit>,
}

impl StaffConfig {
    pub fn new(length: Unit) -> Self {
        StaffConfig {
            length,
            line_count: 5,
            staff_space: None,
        }
    }

    pub fn with_line_count(mut self, line_count: u32) -> Self {
        self.line_count = line_count;
        self
    }

    pub fn with_staff_space(mut self, staff_space: Unit) -> Self {
        self.staff_space = Some(staff_space);
        self
    }
}

/// Staff component of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaffContext {
    line_count: u32,
    staff_space: Unit,
    length: Unit,
}

impl StaffContext {
    pub fn new(line_count: u32, staff_space: Unit, length: Unit) -> Result<Self, LayoutError> {
        if line_count == 0 {
            return Err(LayoutError::InvalidDimension {
                name: "staff line count",
                value: 0.0,
            });
        }
        if !(staff_space.0 > 0.0 && staff_space.is_finite()) {
            return Err(LayoutError::InvalidDimension {
                name: "staff space",
                value: staff_space.0,
            });
        }
        if !(length.0 >= 0.0 && length.is_finite()) {
            return Err(LayoutError::InvalidDimension {
                name: "staff length",
                value: length.0,
            });
        }
        Ok(StaffContext {
            line_count,
            staff_space,
            length,
        })
    }

    pub fn line_count(&self) -> u32 {
        self.line_count
    }

    pub fn staff_space(&self) -> Unit {
        self.staff_space
    }

    pub fn length(&self) -> Unit {
        self.length
    }

    /// `value` staff spaces of this staff.
    pub fn unit(&self, value: f64) -> StaffUnit {
        StaffUnit::from_space(value, self.staff_space)
    }

    fn top_position(&self) -> i32 {
        self.line_count as i32 - 1
    }

    /// Distance from the top line to the bottom line; zero for one line.
    pub fn height(&self) -> Unit {
        Unit::from_measure(self.unit(f64::from(self.line_count - 1)))
    }

    pub fn top_line_y(&self) -> Unit {
        Unit::ZERO
    }

    pub fn bottom_line_y(&self) -> Unit {
        self.height()
    }

    pub fn center_y(&self) -> Unit {
        self.height() / 2.0
    }

    /// Half-spaces below the top line for `position`.
    pub fn position_to_top_down(&self, position: i32) -> i32 {
        self.top_position() - position
    }

    /// Local y of `position`, measured down from the top line.
    pub fn y_for_position(&self, position: i32) -> Unit {
        Unit::from_measure(self.unit(f64::from(self.position_to_top_down(position)) / 2.0))
    }

    /// True for positions above the top line or below the bottom line.
    pub fn position_outside_staff(&self, position: i32) -> bool {
        position.abs() > self.top_position()
    }

    /// True for positions outside the staff that fall on a ledger line.
    pub fn position_needs_ledger(&self, position: i32) -> bool {
        self.position_outside_staff(position)
            && (position.abs() - self.top_position()) % 2 == 0
    }

    /// Ledger positions needed to reach `position`, ordered away from the staff.
    pub fn ledgers_needed_from_position(&self, position: i32) -> Vec<i32> {
        if !self.position_outside_staff(position) {
            return Vec::new();
        }
        let first = self.top_position() + 2;
        let sign = position.signum();
        (first..=position.abs())
            .step_by(2)
            .map(|p| p * sign)
            .collect()
    }
}

impl Document {
    /// A staff path at `pos` whose lines run from x = 0 to the staff length,
    /// one staff space apart, top line at y = 0.
    pub fn add_staff(
        &mut self,
        parent: NodeId,
        pos: Point<Unit>,
        config: StaffConfig,
    ) -> Result<NodeId> {
        let space = config.staff_space.unwrap_or(self.config().staff_space);
        let context = StaffContext::new(config.line_count, space, config.length)?;
        let mut data = PathData::new();
        {
            let mut builder = data.builder();
            for line in 0..context.line_count() {
                let y = Unit::from_measure(context.unit(f64::from(line)));
                builder
                    .move_to(Point::new(Unit::ZERO, y))
                    .line_to(Point::new(context.length(), y));
            }
        }
        let id = self.add_path(parent, pos, data)?;
        let node = self.node_mut(id)?;
        node.staff = Some(context);
        node.set_brush(Some(Brush::no_brush()));
        Ok(id)
    }

    pub fn staff(&self, id: NodeId) -> Result<&StaffContext> {
        Ok(self
            .node(id)?
            .staff()
            .ok_or(GraphError::MissingCapability {
                node: id,
                capability: "staff",
            })?)
    }

    /// The nearest staff at or above `id`.
    pub fn staff_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.node(id)?;
        Ok(self.ancestors(id).find(|a| {
            self.node(*a)
                .map(|n| n.staff().is_some())
                .unwrap_or(false)
        }))
    }
}
