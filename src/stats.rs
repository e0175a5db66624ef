/// Statistics tracking for interpolation runs
///
/// Counts what happened to every track and annotation so a run can be
/// summarized in one log line.

use serde::{Deserialize, Serialize};

/// Statistics collected while interpolating a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationStats {
    /// Number of distinct track ids seen
    pub tracks_seen: usize,

    /// Number of tracks that produced interpolated output
    pub tracks_interpolated: usize,

    /// Number of tracks skipped because they had fewer than two keyframes
    pub degenerate_tracks: usize,

    /// Number of annotations dropped because they carry no track id
    pub untracked_annotations: usize,

    /// Number of keyframes across all interpolated tracks
    pub keyframes: usize,

    /// Number of synthesized (interpolated) records
    pub generated: usize,
}

impl InterpolationStats {
    /// Create a new `InterpolationStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a track that was interpolated
    pub fn add_track(&mut self, keyframes: usize, generated: usize) {
        self.tracks_seen += 1;
        self.tracks_interpolated += 1;
        self.keyframes += keyframes;
        self.generated += generated;
    }

    /// Record a track skipped for lack of keyframes
    pub fn skip_degenerate_track(&mut self) {
        self.tracks_seen += 1;
        self.degenerate_tracks += 1;
    }

    /// Record annotations dropped for lack of a track id
    pub fn skip_untracked(&mut self, count: usize) {
        self.untracked_annotations += count;
    }

    /// Total records emitted (keyframes plus synthesized ones)
    pub fn total_output(&self) -> usize {
        self.keyframes + self.generated
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "InterpolationStats {{ tracks: {}, interpolated: {}, degenerate: {}, untracked: {}, keyframes: {}, generated: {} }}",
            self.tracks_seen,
            self.tracks_interpolated,
            self.degenerate_tracks,
            self.untracked_annotations,
            self.keyframes,
            self.generated
        )
    }
}
