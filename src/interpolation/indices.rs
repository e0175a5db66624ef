//! Generation of the full position sequence for a chain of keyframes.

use crate::types::FramePosition;

/// Expand keyframe positions with `plan[i]` evenly spaced positions inside
/// interval `i`.
///
/// The first keyframe is emitted once, then each interval contributes
/// `plan[i] + 1` positions, the last of which is the next keyframe itself.
/// Keyframe values are copied rather than recomputed, so they appear in the
/// output bit-exactly and exactly once. The output length is
/// `positions.len() + plan.iter().sum()`.
///
/// `plan` must hold one entry per interval (`positions.len() - 1`); surplus
/// entries are ignored.
///
/// # Example
///
/// ```
/// use annotaria::interpolation::generate_indices;
///
/// let positions = generate_indices(&[0.0, 10.0], &[3]);
/// assert_eq!(positions, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
/// ```
pub fn generate_indices(positions: &[FramePosition], plan: &[usize]) -> Vec<FramePosition> {
    let Some(&first) = positions.first() else {
        return Vec::new();
    };

    let total = positions.len() + plan.iter().take(positions.len().saturating_sub(1)).sum::<usize>();
    let mut out = Vec::with_capacity(total);
    out.push(first);

    for (window, &inserted) in positions.windows(2).zip(plan) {
        let (start, end) = (window[0], window[1]);
        let step = (end - start) / (inserted + 1) as f64;
        out.extend((1..=inserted).map(|j| start + step * j as f64));
        out.push(end);
    }

    out
}
