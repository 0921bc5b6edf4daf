//! Flowable layout and anchored geometry for music engraving.
//!
//! A [`Document`] owns a tree of positioned nodes. Nodes inside a
//! [`Flowable`](flowable::Flowable) are laid out along one long horizontal
//! strip that is folded into lines and spread across pages; [`Document::map_to`]
//! resolves positions between any two nodes through those folds, and paths
//! that cross a line break are cut into per-line slices at render time.
//!
//! ```
//! use engrave::{Document, FlowableConfig, Point, Unit};
//!
//! let mut doc = Document::default();
//! let flow = doc
//!     .add_flowable(0, Point::ORIGIN, FlowableConfig::new(Unit(2000.0), Unit(400.0), Unit(40.0)))
//!     .unwrap();
//! let a = doc.add_group(flow, Point::xy(100.0, 0.0)).unwrap();
//! let b = doc.add_group(flow, Point::xy(500.0, 0.0)).unwrap();
//! // same flowable: positions stay in flow space
//! assert_eq!(doc.map_to(b, a).unwrap(), Point::xy(400.0, 0.0));
//! ```

pub mod log;

pub mod config;
pub mod errors;
pub mod flowable;
pub mod font;
pub mod graph;
pub mod graphic;
pub mod path;
pub mod render;
pub mod spanner;
pub mod staff;
pub mod style;
pub mod types;
pub mod units;

pub use config::{DocumentConfig, Paper};
pub use errors::{Error, Result};
pub use flowable::FlowableConfig;
pub use graph::{Document, Node, NodeId};
pub use graphic::{Draw, Graphic};
pub use path::{AnchoredPoint, ElementKind, PathData};
pub use render::{Frame, RecordingSurface, Renderer, Surface};
pub use spanner::{HairpinDirection, VerticalDirection};
pub use staff::StaffConfig;
pub use types::{Point, Rect};
pub use units::{Cm, FixedMeasure, Inch, Measure, Mm, StaffUnit, Unit};
