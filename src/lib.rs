//! # annotaria
//!
//! Tools for densifying and re-shaping COCO-style annotation datasets of
//! image sequences.
//!
//! This library provides:
//! - **Track interpolation**: fills unannotated frames between manually
//!   labeled keyframes of each track with cubic-spline fitted boxes and the
//!   track's majority category
//! - **Insertion planning**: a fixed factor per id gap, or exactly the frames
//!   present on disk but missing from the annotations
//! - **Shape classification**: infers point, line, circle, rectangle or
//!   polygon from a stored box and polygon, for export to LabelMe
//!
//! ## Quick Start
//!
//! ```rust
//! use annotaria::config::InterpolationConfig;
//! use annotaria::interpolation::interpolate_dataset;
//! use annotaria::loader::load_from_string;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = load_from_string(r#"{
//!     "annotations": [
//!         {"id": 1, "image_id": 1, "category_id": 1, "bbox": [0, 0, 10, 10], "track_id": 1},
//!         {"id": 2, "image_id": 3, "category_id": 1, "bbox": [20, 0, 10, 10], "track_id": 1}
//!     ],
//!     "categories": [{"id": 1, "name": "car"}]
//! }"#)?;
//!
//! let output = interpolate_dataset(&dataset, &InterpolationConfig::manual(1), None)?;
//! // Gap of 2 ids with factor 1: 3 new frames at 1.5, 2, 2.5
//! assert_eq!(output.dataset.annotations.len(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! ## COCO Format
//!
//! Annotations follow the COCO layout with two optional extensions:
//!
//! ```json
//! {
//!   "id": 1,
//!   "image_id": 1,
//!   "category_id": 1,
//!   "bbox": [x, y, width, height],
//!   "segmentation": [[x0, y0, x1, y1, ...]],
//!   "track_id": 3,           // groups one object across frames
//!   "is_interpolated": false // true for synthesized records
//! }
//! ```

pub mod config;
pub mod error;
pub mod interpolation;
pub mod loader;
pub mod logging;
pub mod shapes;
pub mod stats;
pub mod types;

// Re-export commonly used types and functions
pub use config::{AppConfig, ClassifierConfig, InterpolationConfig, InterpolationMode};
pub use error::{AnnotariaError, Result};
pub use interpolation::{interpolate_dataset, InterpolationOutput};
pub use loader::{load_from_file, load_from_string, save_to_file};
pub use shapes::{classify, coco_to_labelme, ShapeKind, ShapePrimitive};
pub use stats::InterpolationStats;
pub use types::{Annotation, BoundingBox, Category, CocoDataset, FramePosition, Image};
