//! Temporal interpolation of tracked bounding boxes.
//!
//! Tracks are built from annotations sharing a `track_id`, an insertion plan
//! is derived per track (fixed factor or available frames on disk), and
//! every generated position gets a spline-fitted box and the mode category.

pub mod diagnostics;
pub mod indices;
pub mod interpolator;
pub mod planner;
pub mod spline;
pub mod strategies;
pub mod track;

pub use diagnostics::{write_diagnostics, BoxSeries, TrackDiagnostics};
pub use indices::generate_indices;
pub use interpolator::{fit_track, interpolate_dataset, interpolate_track, InterpolationOutput, TrackFit};
pub use planner::{auto_plan, covered_frames, manual_plan, FrameDirectory, FrameSource, InMemoryFrames};
pub use spline::CubicSpline;
pub use strategies::{interpolate_categorical, interpolate_continuous, mode_value, BoxField};
pub use track::{extract_tracks, Track};
