//! Raw-versus-fitted series per track, written out for offline inspection.

use crate::error::Result;
use crate::interpolation::strategies::BoxField;
use crate::types::FramePosition;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// One series per bounding-box field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub width: Vec<f64>,
    pub height: Vec<f64>,
}

impl BoxSeries {
    pub fn field(&self, field: BoxField) -> &[f64] {
        match field {
            BoxField::X => &self.x,
            BoxField::Y => &self.y,
            BoxField::Width => &self.width,
            BoxField::Height => &self.height,
        }
    }

    pub fn field_mut(&mut self, field: BoxField) -> &mut Vec<f64> {
        match field {
            BoxField::X => &mut self.x,
            BoxField::Y => &mut self.y,
            BoxField::Width => &mut self.width,
            BoxField::Height => &mut self.height,
        }
    }
}

/// Keyframe values next to the fitted curve for one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDiagnostics {
    pub track_id: u64,
    pub keyframe_positions: Vec<FramePosition>,
    pub raw: BoxSeries,
    pub positions: Vec<FramePosition>,
    pub fitted: BoxSeries,
}

impl TrackDiagnostics {
    /// File name used by [`write_diagnostics`].
    pub fn file_name(&self) -> String {
        format!("track{}_fit.json", self.track_id)
    }
}

/// Write one JSON file per track into `dir`, creating it if needed.
///
/// Returns the paths written, in input order.
pub fn write_diagnostics<P: AsRef<Path>>(dir: P, diagnostics: &[TrackDiagnostics]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(diagnostics.len());
    for diag in diagnostics {
        let path = dir.join(diag.file_name());
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, diag)?;
        written.push(path);
    }
    tracing::debug!(count = written.len(), dir = %dir.display(), "wrote track diagnostics");
    Ok(written)
}
