//! COCO to LabelMe export.
//!
//! Each annotation is classified into a shape primitive and written into the
//! LabelMe file of its image. Images without annotations still get a file
//! with an empty shape list.

use crate::config::ClassifierConfig;
use crate::error::{AnnotariaError, Result};
use crate::shapes::classifier::{classify_annotation, ShapeKind};
use crate::shapes::geometry::Point;
use crate::types::CocoDataset;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// LabelMe format version written into every file.
pub const LABELME_VERSION: &str = "5.5.0";

/// One shape in a LabelMe file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMeShape {
    pub label: String,
    pub points: Vec<Point>,
    /// Track id of the source annotation, if any
    pub group_id: Option<u64>,
    #[serde(default)]
    pub description: String,
    pub shape_type: ShapeKind,
    #[serde(default)]
    pub flags: Map<String, Value>,
    #[serde(default)]
    pub mask: Option<String>,
}

/// A LabelMe annotation file for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMeFile {
    pub version: String,
    #[serde(default)]
    pub flags: Map<String, Value>,
    pub shapes: Vec<LabelMeShape>,
    #[serde(rename = "imagePath")]
    pub image_path: String,
    #[serde(rename = "imageData")]
    pub image_data: Option<String>,
    #[serde(rename = "imageHeight")]
    pub image_height: u32,
    #[serde(rename = "imageWidth")]
    pub image_width: u32,
}

impl LabelMeFile {
    /// Path of the JSON file relative to the output folder: the image path
    /// with its extension replaced by `.json`.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.image_path).with_extension("json")
    }
}

/// Build one LabelMe file per image, in `dataset.images` order.
///
/// # Errors
///
/// [`AnnotariaError::UnknownImage`] or [`AnnotariaError::UnknownCategory`]
/// when an annotation references an id that is not in the dataset, and any
/// error from reading an annotation's bbox.
pub fn coco_to_labelme(dataset: &CocoDataset, config: &ClassifierConfig) -> Result<Vec<LabelMeFile>> {
    let categories: HashMap<u64, &str> = dataset
        .categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();
    let image_index: HashMap<OrderedFloat<f64>, usize> = dataset
        .images
        .iter()
        .enumerate()
        .map(|(i, img)| (OrderedFloat(img.id), i))
        .collect();

    let mut shapes: Vec<Vec<LabelMeShape>> = vec![Vec::new(); dataset.images.len()];
    let mut counts: HashMap<ShapeKind, usize> = HashMap::new();

    for annotation in &dataset.annotations {
        let label = categories
            .get(&annotation.category_id)
            .ok_or(AnnotariaError::UnknownCategory(annotation.category_id))?;
        let &slot = image_index
            .get(&OrderedFloat(annotation.image_id))
            .ok_or_else(|| {
                AnnotariaError::UnknownImage(format!(
                    "image id {} referenced by annotation {}",
                    annotation.image_id, annotation.id
                ))
            })?;

        let primitive = classify_annotation(annotation, config)?;
        *counts.entry(primitive.kind).or_insert(0) += 1;

        shapes[slot].push(LabelMeShape {
            label: label.to_string(),
            points: primitive.points,
            group_id: annotation.track_id,
            description: String::new(),
            shape_type: primitive.kind,
            flags: Map::new(),
            mask: None,
        });
    }

    tracing::debug!(?counts, "classified annotations");

    Ok(dataset
        .images
        .iter()
        .zip(shapes)
        .map(|(img, shapes)| LabelMeFile {
            version: LABELME_VERSION.to_string(),
            flags: Map::new(),
            shapes,
            image_path: img.file_name.clone(),
            image_data: None,
            image_height: img.height,
            image_width: img.width,
        })
        .collect())
}

/// Write every file under `dir` at its [`LabelMeFile::relative_path`].
///
/// Returns the paths written, in input order.
pub fn write_labelme_files<P: AsRef<Path>>(files: &[LabelMeFile], dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let path = dir.join(file.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, file)?;
        writer.flush()?;
        written.push(path);
    }

    tracing::info!(count = written.len(), dir = %dir.display(), "wrote LabelMe files");
    Ok(written)
}
