//! JSON loading and saving utilities for COCO format datasets.

use crate::error::{AnnotariaError, Result};
use crate::types::CocoDataset;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Load a tracked COCO sequence from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
///
/// # Example
///
/// ```no_run
/// use annotaria::loader::load_from_file;
///
/// let dataset = load_from_file("sequence.json").unwrap();
/// let tracked = dataset.annotations.iter().filter(|a| a.track_id.is_some()).count();
/// println!("{} of {} annotations belong to a track", tracked, dataset.annotations.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<CocoDataset> {
    let reader = BufReader::new(File::open(path)?);
    let dataset: CocoDataset = serde_json::from_reader(reader)?;
    validate_dataset(&dataset)?;
    Ok(dataset)
}

/// Load a COCO dataset from a JSON string.
///
/// # Example
///
/// ```
/// use annotaria::loader::load_from_string;
///
/// let dataset = load_from_string(r#"{
///     "annotations": [{"id": 1, "image_id": 2.5, "category_id": 1, "bbox": [0, 0, 4, 4], "track_id": 9}],
///     "categories": [{"id": 1, "name": "cyclist"}]
/// }"#).unwrap();
/// assert_eq!(dataset.annotations[0].image_id, 2.5);
/// ```
pub fn load_from_string(json_str: &str) -> Result<CocoDataset> {
    let dataset: CocoDataset = serde_json::from_str(json_str)?;
    validate_dataset(&dataset)?;
    Ok(dataset)
}

/// Write a dataset as pretty-printed JSON (2-space indent).
pub fn save_to_file<P: AsRef<Path>>(dataset: &CocoDataset, path: P) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dataset)?;
    writer.flush()?;
    Ok(())
}

/// List the file names in `dir` ending with `extension`, sorted lexicographically.
///
/// Lexicographic order is taken to be temporal order in automatic
/// interpolation mode.
pub fn list_frame_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(extension) {
                files.push(name.to_string());
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Read `(width, height)` from an image header without decoding pixels.
pub fn read_image_dimensions<P: AsRef<Path>>(path: P) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}

/// Reject datasets the interpolator and classifier cannot work with.
fn validate_dataset(dataset: &CocoDataset) -> Result<()> {
    if dataset.categories.is_empty() {
        return Err(AnnotariaError::EmptyDataset(
            "Dataset must contain at least one category".to_string(),
        ));
    }

    for annotation in &dataset.annotations {
        if annotation.bbox.len() != 4 {
            return Err(AnnotariaError::InvalidAnnotation(format!(
                "Annotation {} has invalid bbox length: {}",
                annotation.id,
                annotation.bbox.len()
            )));
        }

        if annotation.bbox[2] < 0.0 || annotation.bbox[3] < 0.0 {
            return Err(AnnotariaError::InvalidBoundingBox(format!(
                "Annotation {} has negative dimensions",
                annotation.id
            )));
        }

        if let Some(ring) = annotation.segmentation.iter().find(|r| r.len() % 2 != 0) {
            return Err(AnnotariaError::InvalidAnnotation(format!(
                "Annotation {} has a polygon with an odd number of coordinates: {}",
                annotation.id,
                ring.len()
            )));
        }
    }

    Ok(())
}
