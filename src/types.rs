//! Core data types for COCO annotation datasets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Position of a frame in the sequence.
///
/// Image ids double as frame positions. They are integral in authored
/// datasets but become fractional once manual-mode interpolation inserts
/// frames between two consecutive ids.
pub type FramePosition = f64;

/// Axis-aligned box as stored in COCO `bbox`: left, top, width, height.
///
/// Each of the four fields is fit as an independent series during
/// interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// `width * height`, unrounded.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Get the right coordinate (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom coordinate (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get the center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the bounding box is valid (non-negative dimensions).
    pub fn is_valid(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// Flatten back into the `[x, y, width, height]` layout used on disk.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.x, self.y, self.width, self.height]
    }
}

/// Represents a category in the COCO dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
}

/// Represents an image (frame) in the COCO dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(with = "number")]
    pub id: FramePosition,
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    /// Keys this crate does not interpret, preserved on write.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    /// Create an image record with no extra keys.
    pub fn new(id: FramePosition, file_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            height,
            width,
            extra: Map::new(),
        }
    }
}

/// Represents an annotation in COCO format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    #[serde(with = "number")]
    pub image_id: FramePosition,
    pub category_id: u64,
    /// Bounding box in [x, y, width, height] format
    pub bbox: Vec<f64>,
    /// Polygon rings as flat `[x0, y0, x1, y1, ...]` lists; empty means no polygon
    #[serde(default)]
    pub segmentation: Vec<Vec<f64>>,
    #[serde(
        default,
        with = "optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscrowd: Option<u8>,
    /// Groups annotations describing the same object across frames
    #[serde(default)]
    pub track_id: Option<u64>,
    /// True only for records synthesized by interpolation
    #[serde(default)]
    pub is_interpolated: bool,
    /// Keys this crate does not interpret, preserved on write.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Annotation {
    /// Create a keyframe annotation with no polygon and no track.
    pub fn new(id: u64, image_id: FramePosition, category_id: u64, bbox: BoundingBox) -> Self {
        Self {
            id,
            image_id,
            category_id,
            bbox: bbox.to_vec(),
            segmentation: Vec::new(),
            area: Some(bbox.area()),
            iscrowd: None,
            track_id: None,
            is_interpolated: false,
            extra: Map::new(),
        }
    }

    /// Builder-style setter for the track id.
    pub fn with_track(mut self, track_id: u64) -> Self {
        self.track_id = Some(track_id);
        self
    }

    /// Builder-style setter for a single polygon ring.
    pub fn with_polygon(mut self, polygon: Vec<f64>) -> Self {
        self.segmentation = vec![polygon];
        self
    }

    /// Convert the bbox array to a BoundingBox struct.
    pub fn to_bbox(&self) -> crate::error::Result<BoundingBox> {
        if self.bbox.len() != 4 {
            return Err(crate::error::AnnotariaError::InvalidBoundingBox(format!(
                "Expected 4 values, got {}",
                self.bbox.len()
            )));
        }
        Ok(BoundingBox::new(
            self.bbox[0],
            self.bbox[1],
            self.bbox[2],
            self.bbox[3],
        ))
    }

    /// First polygon ring as `(x, y)` pairs. Empty when there is no polygon.
    ///
    /// A trailing unpaired coordinate is ignored.
    pub fn polygon(&self) -> Vec<(f64, f64)> {
        self.segmentation
            .first()
            .map(|ring| ring.chunks_exact(2).map(|p| (p[0], p[1])).collect())
            .unwrap_or_default()
    }

    /// Stored area, falling back to the bounding box area when absent.
    pub fn stored_area(&self) -> f64 {
        match self.area {
            Some(area) => area,
            None => self.to_bbox().map(|b| b.area()).unwrap_or(0.0),
        }
    }
}

/// Represents a complete COCO dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CocoDataset {
    #[serde(default)]
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
    /// Top-level keys such as `info` and `licenses`, preserved on write.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CocoDataset {
    /// Look up a category name by id.
    pub fn category_name(&self, category_id: u64) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .map(|c| c.name.as_str())
    }
}

/// Writes integral floats as JSON integers so authored ids round-trip unchanged.
mod number {
    use serde::{Deserialize, Deserializer, Serializer};

    const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer)
    }
}

mod optional_number {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::number::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Option::<f64>::deserialize(deserializer)
    }
}
