//! Insertion-count plans: how many frames to synthesize per keyframe interval.
//!
//! Automatic mode assumes file names sort in capture order. That is a
//! precondition of the caller; nothing here checks it.

use crate::error::Result;
use crate::loader::{list_frame_files, read_image_dimensions};
use crate::types::FramePosition;
use std::collections::HashMap;
use std::path::PathBuf;

/// Supplies the frames available on disk and their dimensions.
///
/// Automatic mode is the only consumer. Implementations decide where the
/// data comes from; the interpolation code itself performs no I/O.
pub trait FrameSource {
    /// File names of every available frame, sorted lexicographically.
    fn frame_files(&self) -> Result<Vec<String>>;

    /// `(width, height)` of the frame stored under `file_name`.
    fn dimensions(&self, file_name: &str) -> Result<(u32, u32)>;
}

/// Frames stored as image files in a directory.
#[derive(Debug, Clone)]
pub struct FrameDirectory {
    pub dir: PathBuf,
    pub extension: String,
}

impl FrameDirectory {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }
}

impl FrameSource for FrameDirectory {
    fn frame_files(&self) -> Result<Vec<String>> {
        list_frame_files(&self.dir, &self.extension)
    }

    fn dimensions(&self, file_name: &str) -> Result<(u32, u32)> {
        read_image_dimensions(self.dir.join(file_name))
    }
}

/// Frames whose dimensions are already known.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFrames {
    frames: HashMap<String, (u32, u32)>,
}

impl InMemoryFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame.
    pub fn insert(&mut self, file_name: impl Into<String>, width: u32, height: u32) {
        self.frames.insert(file_name.into(), (width, height));
    }

    /// Register every name in `names` with the same dimensions.
    pub fn uniform<I, S>(names: I, width: u32, height: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frames = Self::new();
        for name in names {
            frames.insert(name, width, height);
        }
        frames
    }
}

impl FrameSource for InMemoryFrames {
    fn frame_files(&self) -> Result<Vec<String>> {
        let mut files: Vec<String> = self.frames.keys().cloned().collect();
        files.sort();
        Ok(files)
    }

    fn dimensions(&self, file_name: &str) -> Result<(u32, u32)> {
        self.frames
            .get(file_name)
            .copied()
            .ok_or_else(|| crate::error::AnnotariaError::UnknownImage(file_name.to_string()))
    }
}

/// Fixed-factor plan: `(factor + 1) * gap - 1` frames per interval.
///
/// For integral ids this inserts `factor` frames per unit of id gap in
/// addition to the ids already missing. Fractional gaps left by an earlier
/// run are rounded, and negative counts clamp to zero.
///
/// # Example
///
/// ```
/// use annotaria::interpolation::manual_plan;
///
/// assert_eq!(manual_plan(&[1.0, 2.0, 4.0], 3), vec![3, 7]);
/// ```
pub fn manual_plan(positions: &[FramePosition], factor: u32) -> Vec<usize> {
    let scale = f64::from(factor) + 1.0;
    positions
        .windows(2)
        .map(|w| {
            let count = (scale * (w[1] - w[0]) - 1.0).round();
            if count > 0.0 {
                count as usize
            } else {
                0
            }
        })
        .collect()
}

/// Available-frame plan: for each consecutive keyframe pair, the number of
/// available files sorting strictly between the two keyframe files.
///
/// `available` must be sorted.
///
/// # Example
///
/// ```
/// use annotaria::interpolation::auto_plan;
///
/// let plan = auto_plan(&["f001", "f010"], &["f001", "f003", "f005", "f010"]);
/// assert_eq!(plan, vec![2]);
/// ```
pub fn auto_plan<K, A>(keyframe_files: &[K], available: &[A]) -> Vec<usize>
where
    K: AsRef<str>,
    A: AsRef<str>,
{
    keyframe_files
        .windows(2)
        .map(|w| {
            let (lo, hi) = (w[0].as_ref(), w[1].as_ref());
            let start = available.partition_point(|f| f.as_ref() <= lo);
            let end = available.partition_point(|f| f.as_ref() < hi);
            end.saturating_sub(start)
        })
        .collect()
}

/// Available files lying within some keyframe interval, endpoints included,
/// in `available` order.
///
/// When every keyframe file is present in `available`, the result lines up
/// one-to-one with the positions produced by
/// [`generate_indices`](crate::interpolation::generate_indices) for the
/// [`auto_plan`] of the same inputs.
pub fn covered_frames<'a, K, A>(keyframe_files: &[K], available: &'a [A]) -> Vec<&'a str>
where
    K: AsRef<str>,
    A: AsRef<str>,
{
    available
        .iter()
        .map(AsRef::as_ref)
        .filter(|f| {
            keyframe_files
                .windows(2)
                .any(|w| w[0].as_ref() <= *f && *f <= w[1].as_ref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_plan_integral_gaps() {
        assert_eq!(manual_plan(&[0.0, 10.0], 0), vec![9]);
        assert_eq!(manual_plan(&[1.0, 2.0], 3), vec![3]);
        assert_eq!(manual_plan(&[1.0, 2.0, 3.0], 0), vec![0, 0]);
    }

    #[test]
    fn test_manual_plan_fractional_gaps_collapse() {
        assert_eq!(manual_plan(&[1.0, 1.25, 1.5], 0), vec![0, 0]);
        assert_eq!(manual_plan(&[1.0, 1.25, 1.5], 3), vec![0, 0]);
    }

    #[test]
    fn test_auto_plan() {
        let available = ["f001", "f003", "f005", "f010"];
        assert_eq!(auto_plan(&["f001", "f010"], &available), vec![2]);
        assert_eq!(auto_plan(&["f001", "f005", "f010"], &available), vec![1, 0]);
    }

    #[test]
    fn test_auto_plan_keyframes_missing_on_disk() {
        let available = ["f002", "f004"];
        assert_eq!(auto_plan(&["f001", "f005"], &available), vec![2]);
    }

    #[test]
    fn test_auto_plan_dense_is_zero() {
        let available = ["a", "b", "c"];
        assert_eq!(auto_plan(&available, &available), vec![0, 0]);
    }

    #[test]
    fn test_covered_frames() {
        let available = ["f000", "f001", "f003", "f005", "f010", "f011"];
        assert_eq!(
            covered_frames(&["f001", "f005"], &available),
            vec!["f001", "f003", "f005"]
        );
    }

    #[test]
    fn test_in_memory_frames() {
        let frames = InMemoryFrames::uniform(["b.png", "a.png"], 640, 480);
        assert_eq!(frames.frame_files().unwrap(), vec!["a.png", "b.png"]);
        assert_eq!(frames.dimensions("a.png").unwrap(), (640, 480));
        assert!(frames.dimensions("c.png").is_err());
    }
}
