//! Per-field interpolation strategies.
//!
//! Categorical fields take the mode of the keyframe values. Continuous
//! fields are fit with one cubic spline each.

use crate::error::Result;
use crate::interpolation::spline::CubicSpline;
use crate::types::{BoundingBox, FramePosition};
use std::collections::BTreeMap;

/// The continuous bounding-box fields, each fit independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxField {
    X,
    Y,
    Width,
    Height,
}

impl BoxField {
    pub const ALL: [BoxField; 4] = [BoxField::X, BoxField::Y, BoxField::Width, BoxField::Height];

    /// Read this field from a box.
    pub fn get(self, bbox: &BoundingBox) -> f64 {
        match self {
            BoxField::X => bbox.x,
            BoxField::Y => bbox.y,
            BoxField::Width => bbox.width,
            BoxField::Height => bbox.height,
        }
    }
}

/// Most frequent value. Ties go to the smallest value.
///
/// Returns `None` for an empty slice.
///
/// # Example
///
/// ```
/// use annotaria::interpolation::mode_value;
///
/// assert_eq!(mode_value(&[1, 1, 2]), Some(1));
/// assert_eq!(mode_value(&[3, 2, 3, 2]), Some(2));
/// ```
pub fn mode_value(values: &[u64]) -> Option<u64> {
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }

    // BTreeMap iterates ascending, so a strict comparison keeps the smallest tie.
    let mut best: Option<(u64, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Broadcast the mode of `values` over `count` positions.
pub fn interpolate_categorical(values: &[u64], count: usize) -> Option<Vec<u64>> {
    mode_value(values).map(|mode| vec![mode; count])
}

/// Fit a spline through `(knots, values)` and evaluate it at `positions`.
pub fn interpolate_continuous(
    knots: &[FramePosition],
    values: &[f64],
    positions: &[FramePosition],
) -> Result<Vec<f64>> {
    let spline = CubicSpline::fit(knots, values)?;
    Ok(spline.evaluate_many(positions))
}
