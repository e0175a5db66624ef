//! Geometric shape classification and LabelMe export.

pub mod classifier;
pub mod geometry;
pub mod labelme;

pub use classifier::{classify, classify_annotation, ShapeKind, ShapePrimitive};
pub use geometry::{centroid, is_circle, is_line, line_extremes, Point};
pub use labelme::{coco_to_labelme, write_labelme_files, LabelMeFile, LabelMeShape, LABELME_VERSION};
