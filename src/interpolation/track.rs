//! Grouping of annotations into tracks ordered by frame position.

use crate::error::{AnnotariaError, Result};
use crate::types::{Annotation, FramePosition};
use std::collections::BTreeMap;

/// Annotations sharing a track id, sorted by ascending image id.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub track_id: u64,
    pub annotations: Vec<Annotation>,
}

impl Track {
    /// Number of keyframes in the track.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// A track needs at least two keyframes to span an interval.
    pub fn is_interpolable(&self) -> bool {
        self.annotations.len() >= 2
    }

    /// Keyframe positions in ascending order.
    pub fn positions(&self) -> Vec<FramePosition> {
        self.annotations.iter().map(|a| a.image_id).collect()
    }
}

/// Partition annotations by track id and sort each partition by image id.
///
/// Annotations without a track id are left out. Tracks are returned in
/// ascending track id order. Single-member tracks are kept; callers decide
/// what to do with them.
///
/// # Errors
///
/// Returns [`AnnotariaError::NonMonotonicPositions`] when two annotations of
/// one track share an image id, and [`AnnotariaError::InvalidAnnotation`]
/// when an image id is not a finite number.
///
/// # Example
///
/// ```
/// use annotaria::interpolation::extract_tracks;
/// use annotaria::types::{Annotation, BoundingBox};
///
/// let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let annotations = vec![
///     Annotation::new(1, 5.0, 1, bbox).with_track(7),
///     Annotation::new(2, 1.0, 1, bbox).with_track(7),
///     Annotation::new(3, 2.0, 1, bbox),
/// ];
///
/// let tracks = extract_tracks(&annotations).unwrap();
/// assert_eq!(tracks.len(), 1);
/// assert_eq!(tracks[0].positions(), vec![1.0, 5.0]);
/// ```
pub fn extract_tracks(annotations: &[Annotation]) -> Result<Vec<Track>> {
    let mut groups: BTreeMap<u64, Vec<Annotation>> = BTreeMap::new();

    for annotation in annotations {
        let Some(track_id) = annotation.track_id else {
            continue;
        };
        if !annotation.image_id.is_finite() {
            return Err(AnnotariaError::InvalidAnnotation(format!(
                "Annotation {} has a non-finite image_id",
                annotation.id
            )));
        }
        groups.entry(track_id).or_default().push(annotation.clone());
    }

    groups
        .into_iter()
        .map(|(track_id, mut members)| {
            members.sort_by(|a, b| a.image_id.total_cmp(&b.image_id));
            if let Some(pair) = members.windows(2).find(|w| w[0].image_id == w[1].image_id) {
                return Err(AnnotariaError::NonMonotonicPositions(format!(
                    "Track {} has annotations {} and {} on the same image {}",
                    track_id, pair[0].id, pair[1].id, pair[0].image_id
                )));
            }
            Ok(Track {
                track_id,
                annotations: members,
            })
        })
        .collect()
}

/// Number of annotations that carry no track id.
pub fn count_untracked(annotations: &[Annotation]) -> usize {
    annotations.iter().filter(|a| a.track_id.is_none()).count()
}
