//! Track and dataset interpolation.

use crate::config::{InterpolationConfig, InterpolationMode};
use crate::error::{AnnotariaError, Result};
use crate::interpolation::diagnostics::{BoxSeries, TrackDiagnostics};
use crate::interpolation::indices::generate_indices;
use crate::interpolation::planner::{auto_plan, covered_frames, manual_plan, FrameSource};
use crate::interpolation::strategies::{interpolate_continuous, mode_value, BoxField};
use crate::interpolation::track::{count_untracked, extract_tracks, Track};
use crate::stats::InterpolationStats;
use crate::types::{Annotation, BoundingBox, CocoDataset, FramePosition, Image};
use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Fitted values of one track at every generated position.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFit {
    pub track_id: u64,
    pub keyframe_positions: Vec<FramePosition>,
    pub raw: BoxSeries,
    pub positions: Vec<FramePosition>,
    pub category_id: u64,
    pub fitted: BoxSeries,
}

impl TrackFit {
    /// Whether `position` is one of the original keyframes.
    pub fn is_keyframe(&self, position: FramePosition) -> bool {
        self.keyframe_positions
            .binary_search_by(|k| k.total_cmp(&position))
            .is_ok()
    }

    /// Synthesize one record per generated position from `template`.
    ///
    /// Every record carries the fitted box, the mode category, an area of
    /// `width * height` truncated to an integer and no polygon. Ids are left
    /// at 0; the dataset driver assigns them after the global sort.
    pub fn to_annotations(&self, template: &Annotation) -> Vec<Annotation> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                let bbox = BoundingBox::new(
                    self.fitted.x[i],
                    self.fitted.y[i],
                    self.fitted.width[i],
                    self.fitted.height[i],
                );
                let mut record = template.clone();
                record.id = 0;
                record.image_id = position;
                record.category_id = self.category_id;
                record.bbox = bbox.to_vec();
                record.segmentation = Vec::new();
                record.area = Some(bbox.area().trunc());
                record.is_interpolated = !self.is_keyframe(position);
                record
            })
            .collect()
    }

    /// Raw-versus-fitted series for offline inspection.
    pub fn diagnostics(&self) -> TrackDiagnostics {
        TrackDiagnostics {
            track_id: self.track_id,
            keyframe_positions: self.keyframe_positions.clone(),
            raw: self.raw.clone(),
            positions: self.positions.clone(),
            fitted: self.fitted.clone(),
        }
    }
}

/// Fit every field of `track` at the positions implied by `plan`.
///
/// # Errors
///
/// * [`AnnotariaError::DegenerateTrack`] when the track has fewer than two
///   keyframes.
/// * [`AnnotariaError::InvalidAnnotation`] when `plan` does not have one
///   entry per interval or a keyframe bbox is malformed.
pub fn fit_track(track: &Track, plan: &[usize]) -> Result<TrackFit> {
    if !track.is_interpolable() {
        return Err(AnnotariaError::DegenerateTrack {
            track_id: track.track_id,
            keyframes: track.len(),
        });
    }
    if plan.len() != track.len() - 1 {
        return Err(AnnotariaError::InvalidAnnotation(format!(
            "Track {} has {} intervals but the plan has {} entries",
            track.track_id,
            track.len() - 1,
            plan.len()
        )));
    }

    let knots = track.positions();
    let boxes = track
        .annotations
        .iter()
        .map(Annotation::to_bbox)
        .collect::<Result<Vec<_>>>()?;
    let categories: Vec<u64> = track.annotations.iter().map(|a| a.category_id).collect();
    let category_id = mode_value(&categories).ok_or(AnnotariaError::DegenerateTrack {
        track_id: track.track_id,
        keyframes: 0,
    })?;

    let positions = generate_indices(&knots, plan);
    let mut raw = BoxSeries::default();
    let mut fitted = BoxSeries::default();
    for field in BoxField::ALL {
        let values: Vec<f64> = boxes.iter().map(|b| field.get(b)).collect();
        *fitted.field_mut(field) = interpolate_continuous(&knots, &values, &positions)?;
        *raw.field_mut(field) = values;
    }

    Ok(TrackFit {
        track_id: track.track_id,
        keyframe_positions: knots,
        raw,
        positions,
        category_id,
        fitted,
    })
}

/// Interpolate a single track, producing one record per generated position.
pub fn interpolate_track(track: &Track, plan: &[usize]) -> Result<Vec<Annotation>> {
    let fit = fit_track(track, plan)?;
    Ok(fit.to_annotations(&track.annotations[0]))
}

/// Result of [`interpolate_dataset`].
#[derive(Debug, Clone)]
pub struct InterpolationOutput {
    pub dataset: CocoDataset,
    pub stats: InterpolationStats,
    /// Filled only when [`InterpolationConfig::debug`] is set.
    pub diagnostics: Vec<TrackDiagnostics>,
}

/// Densify every track of `dataset`.
///
/// The output holds only track annotations, sorted by image id, with ids
/// reassigned from 1. Tracks with fewer than two keyframes contribute
/// nothing. In automatic mode `frames` supplies the available files and the
/// output `images` list is rebuilt from the frames covered by some track.
///
/// # Errors
///
/// Input errors are fatal: malformed boxes, duplicate positions in a track,
/// keyframes whose image is missing (automatic mode), or a missing frame
/// source in automatic mode.
pub fn interpolate_dataset(
    dataset: &CocoDataset,
    config: &InterpolationConfig,
    frames: Option<&dyn FrameSource>,
) -> Result<InterpolationOutput> {
    let tracks = extract_tracks(&dataset.annotations)?;
    let mut stats = InterpolationStats::new();
    stats.skip_untracked(count_untracked(&dataset.annotations));

    let mut planning = match config.mode {
        InterpolationMode::Manual { factor } => Planning::Manual { factor },
        InterpolationMode::Automatic => {
            let source = frames.ok_or_else(|| {
                AnnotariaError::InvalidConfig("automatic mode requires a frame source".to_string())
            })?;
            Planning::Automatic(AutomaticContext::new(dataset, source)?)
        }
    };

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();

    for track in &tracks {
        let result = match &mut planning {
            Planning::Manual { factor } => {
                let plan = manual_plan(&track.positions(), *factor);
                fit_track(track, &plan)
            }
            Planning::Automatic(ctx) => ctx.interpolate(track),
        };

        match result {
            Ok(fit) => {
                let generated = fit.positions.len() - track.len();
                debug!(
                    track_id = track.track_id,
                    keyframes = track.len(),
                    generated,
                    category_id = fit.category_id,
                    "interpolated track"
                );
                stats.add_track(track.len(), generated);
                records.extend(fit.to_annotations(&track.annotations[0]));
                if config.debug {
                    diagnostics.push(fit.diagnostics());
                }
            }
            Err(AnnotariaError::DegenerateTrack { track_id, keyframes }) => {
                debug!(track_id, keyframes, "skipping track with too few keyframes");
                stats.skip_degenerate_track();
            }
            Err(err) => return Err(err),
        }
    }

    records.sort_by(|a, b| a.image_id.total_cmp(&b.image_id));
    for (idx, record) in records.iter_mut().enumerate() {
        record.id = idx as u64 + 1;
    }

    let images = match planning {
        Planning::Manual { .. } => dataset.images.clone(),
        Planning::Automatic(ctx) => ctx.into_images(),
    };

    info!("{}", stats.summary_string());

    Ok(InterpolationOutput {
        dataset: CocoDataset {
            images,
            annotations: records,
            categories: dataset.categories.clone(),
            extra: dataset.extra.clone(),
        },
        stats,
        diagnostics,
    })
}

/// How insertion counts are derived for each track.
enum Planning<'a> {
    Manual { factor: u32 },
    Automatic(AutomaticContext<'a>),
}

/// State shared across tracks in automatic mode.
struct AutomaticContext<'a> {
    source: &'a dyn FrameSource,
    available: Vec<String>,
    files_by_id: HashMap<OrderedFloat<f64>, String>,
    dimensions: HashMap<String, (u32, u32)>,
    images: BTreeMap<OrderedFloat<f64>, Image>,
}

impl<'a> AutomaticContext<'a> {
    fn new(dataset: &CocoDataset, source: &'a dyn FrameSource) -> Result<Self> {
        let available = source.frame_files()?;
        debug!(frames = available.len(), "listed available frames");
        let files_by_id = dataset
            .images
            .iter()
            .map(|img| (OrderedFloat(img.id), img.file_name.clone()))
            .collect();
        Ok(Self {
            source,
            available,
            files_by_id,
            dimensions: HashMap::new(),
            images: BTreeMap::new(),
        })
    }

    fn keyframe_files(&self, track: &Track) -> Result<Vec<String>> {
        track
            .annotations
            .iter()
            .map(|a| {
                self.files_by_id
                    .get(&OrderedFloat(a.image_id))
                    .cloned()
                    .ok_or_else(|| {
                        AnnotariaError::UnknownImage(format!(
                            "image id {} referenced by annotation {}",
                            a.image_id, a.id
                        ))
                    })
            })
            .collect()
    }

    fn interpolate(&mut self, track: &Track) -> Result<TrackFit> {
        if !track.is_interpolable() {
            return Err(AnnotariaError::DegenerateTrack {
                track_id: track.track_id,
                keyframes: track.len(),
            });
        }

        let keyframe_files = self.keyframe_files(track)?;
        let plan = auto_plan(&keyframe_files, &self.available);
        let fit = fit_track(track, &plan)?;

        let covered: Vec<String> = covered_frames(&keyframe_files, &self.available)
            .into_iter()
            .map(str::to_string)
            .collect();
        if covered.len() != fit.positions.len() {
            warn!(
                track_id = track.track_id,
                positions = fit.positions.len(),
                files = covered.len(),
                "frame files do not line up with interpolated positions; unmatched entries are ignored"
            );
        }
        for (&position, file) in fit.positions.iter().zip(covered) {
            let (width, height) = self.dimensions_of(&file)?;
            self.images
                .insert(OrderedFloat(position), Image::new(position, file, width, height));
        }

        Ok(fit)
    }

    fn dimensions_of(&mut self, file: &str) -> Result<(u32, u32)> {
        if let Some(&dims) = self.dimensions.get(file) {
            return Ok(dims);
        }
        let dims = self.source.dimensions(file)?;
        self.dimensions.insert(file.to_string(), dims);
        Ok(dims)
    }

    fn into_images(self) -> Vec<Image> {
        self.images.into_values().collect()
    }
}
