//! Edge case tests for interpolation and shape classification.

use annotaria::config::{ClassifierConfig, InterpolationConfig};
use annotaria::interpolation::{
    auto_plan, covered_frames, extract_tracks, generate_indices, interpolate_dataset,
    interpolate_track, InMemoryFrames, Track,
};
use annotaria::shapes::{classify, classify_annotation, ShapeKind};
use annotaria::types::{Annotation, BoundingBox, Category, CocoDataset, Image};
use std::f64::consts::PI;

fn dataset(annotations: Vec<Annotation>) -> CocoDataset {
    CocoDataset {
        annotations,
        categories: vec![Category {
            id: 1,
            name: "object".to_string(),
            supercategory: None,
        }],
        ..Default::default()
    }
}

fn tracked(id: u64, image_id: f64, track: u64, x: f64) -> Annotation {
    Annotation::new(id, image_id, 1, BoundingBox::new(x, 0.0, 4.0, 4.0)).with_track(track)
}

#[test]
fn test_single_keyframe_track_contributes_nothing() {
    let ds = dataset(vec![tracked(1, 1.0, 1, 0.0)]);
    let output = interpolate_dataset(&ds, &InterpolationConfig::manual(2), None).unwrap();
    assert!(output.dataset.annotations.is_empty());
    assert_eq!(output.stats.degenerate_tracks, 1);
    assert_eq!(output.stats.tracks_interpolated, 0);
}

#[test]
fn test_degenerate_track_does_not_affect_others() {
    let ds = dataset(vec![
        tracked(1, 1.0, 1, 0.0),
        tracked(2, 1.0, 2, 0.0),
        tracked(3, 2.0, 2, 4.0),
    ]);
    let output = interpolate_dataset(&ds, &InterpolationConfig::manual(1), None).unwrap();
    assert!(output.dataset.annotations.iter().all(|a| a.track_id == Some(2)));
    assert_eq!(output.dataset.annotations.len(), 3);
}

#[test]
fn test_only_untracked_annotations() {
    let ds = dataset(vec![Annotation::new(1, 1.0, 1, BoundingBox::new(0.0, 0.0, 1.0, 1.0))]);
    let output = interpolate_dataset(&ds, &InterpolationConfig::manual(3), None).unwrap();
    assert!(output.dataset.annotations.is_empty());
    assert_eq!(output.stats.untracked_annotations, 1);
    assert_eq!(output.stats.tracks_seen, 0);
}

#[test]
fn test_empty_dataset() {
    let ds = dataset(Vec::new());
    let output = interpolate_dataset(&ds, &InterpolationConfig::manual(1), None).unwrap();
    assert!(output.dataset.annotations.is_empty());
    assert_eq!(output.stats.total_output(), 0);
}

#[test]
fn test_unsorted_input_is_ordered_per_track() {
    let ds = dataset(vec![
        tracked(1, 9.0, 1, 90.0),
        tracked(2, 1.0, 1, 10.0),
        tracked(3, 5.0, 1, 50.0),
    ]);
    let output = interpolate_dataset(&ds, &InterpolationConfig::manual(0), None).unwrap();
    let positions: Vec<f64> = output.dataset.annotations.iter().map(|a| a.image_id).collect();
    assert_eq!(positions, (1..=9).map(|i| i as f64).collect::<Vec<_>>());
    for ann in &output.dataset.annotations {
        assert!((ann.bbox[0] - ann.image_id * 10.0).abs() < 1e-9);
    }
}

#[test]
fn test_adjacent_keyframes_with_factor_zero() {
    let t = Track {
        track_id: 1,
        annotations: vec![tracked(1, 1.0, 1, 0.0), tracked(2, 2.0, 1, 1.0)],
    };
    let records = interpolate_track(&t, &[0]).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.is_interpolated));
}

#[test]
fn test_interpolated_records_drop_polygons() {
    let ds = dataset(vec![
        tracked(1, 1.0, 1, 0.0).with_polygon(vec![0.0, 0.0, 4.0, 0.0, 4.0, 4.0]),
        tracked(2, 3.0, 1, 8.0).with_polygon(vec![8.0, 0.0, 12.0, 0.0, 12.0, 4.0]),
    ]);
    let output = interpolate_dataset(&ds, &InterpolationConfig::manual(0), None).unwrap();
    assert!(output.dataset.annotations.iter().all(|a| a.segmentation.is_empty()));
}

#[test]
fn test_template_fields_are_copied() {
    let mut first = tracked(1, 1.0, 7, 0.0);
    first.iscrowd = Some(0);
    first
        .extra
        .insert("attributes".to_string(), serde_json::json!({"occluded": false}));
    let ds = dataset(vec![first, tracked(2, 2.0, 7, 2.0)]);
    let output = interpolate_dataset(&ds, &InterpolationConfig::manual(1), None).unwrap();
    for ann in &output.dataset.annotations {
        assert_eq!(ann.track_id, Some(7));
        assert_eq!(ann.iscrowd, Some(0));
        assert!(ann.extra.contains_key("attributes"));
    }
}

#[test]
fn test_tie_in_categories_picks_smallest() {
    let mut a = tracked(1, 1.0, 1, 0.0);
    a.category_id = 5;
    let mut b = tracked(2, 2.0, 1, 1.0);
    b.category_id = 3;
    let t = Track {
        track_id: 1,
        annotations: vec![a, b],
    };
    let records = interpolate_track(&t, &[2]).unwrap();
    assert!(records.iter().all(|r| r.category_id == 3));
}

#[test]
fn test_extract_tracks_preserves_singletons() {
    let tracks = extract_tracks(&[tracked(1, 1.0, 4, 0.0)]).unwrap();
    assert_eq!(tracks.len(), 1);
    assert!(!tracks[0].is_interpolable());
}

#[test]
fn test_generate_indices_plan_of_zeroes() {
    let positions = [1.0, 4.0, 9.0];
    assert_eq!(generate_indices(&positions, &[0, 0]), positions.to_vec());
}

#[test]
fn test_auto_plan_non_monotonic_filenames_do_not_panic() {
    // File names out of capture order give undefined plans, but never a panic.
    let available = ["a", "b", "c", "d"];
    assert_eq!(auto_plan(&["d", "a"], &available), vec![0]);
    assert!(covered_frames(&["d", "a"], &available).is_empty());
}

#[test]
fn test_automatic_mode_with_keyframe_missing_on_disk() {
    // f002 has an image record but no file; positions and files no longer line up.
    let frames = InMemoryFrames::uniform(["f001.png", "f003.png"], 10, 10);
    let mut ds = dataset(vec![tracked(1, 1.0, 1, 0.0), tracked(2, 2.0, 1, 4.0)]);
    ds.images = vec![Image::new(1.0, "f001.png", 10, 10), Image::new(2.0, "f002.png", 10, 10)];
    let output = interpolate_dataset(&ds, &InterpolationConfig::automatic(), Some(&frames)).unwrap();
    assert_eq!(output.dataset.annotations.len(), 2);
    assert_eq!(output.dataset.images.len(), 1);
    assert_eq!(output.dataset.images[0].file_name, "f001.png");
}

#[test]
fn test_automatic_mode_images_limited_to_covered_frames() {
    let frames = InMemoryFrames::uniform(["f0.png", "f1.png", "f2.png", "f3.png", "f4.png"], 10, 10);
    let mut ds = dataset(vec![tracked(1, 1.0, 1, 0.0), tracked(2, 2.0, 1, 4.0)]);
    ds.images = vec![
        Image::new(0.0, "f0.png", 10, 10),
        Image::new(1.0, "f1.png", 10, 10),
        Image::new(2.0, "f2.png", 10, 10),
        Image::new(4.0, "f4.png", 10, 10),
    ];
    let output = interpolate_dataset(&ds, &InterpolationConfig::automatic(), Some(&frames)).unwrap();
    let files: Vec<&str> = output.dataset.images.iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(files, vec!["f1.png", "f2.png"]);
}

#[test]
fn test_classifier_area_exactly_at_threshold_is_not_degenerate() {
    let bbox = BoundingBox::new(0.0, 0.0, 1.0, 3.0);
    let shape = classify(&bbox, &[], 3.0, &ClassifierConfig::default());
    assert_eq!(shape.kind, ShapeKind::Rectangle);
}

#[test]
fn test_classifier_triangle_is_polygon() {
    let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let triangle = [(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)];
    let shape = classify(&bbox, &triangle, 50.0, &ClassifierConfig::default());
    assert_eq!(shape.kind, ShapeKind::Polygon);
    assert_eq!(shape.points.len(), 3);
}

#[test]
fn test_classifier_noisy_circle() {
    let points: Vec<(f64, f64)> = (0..24)
        .map(|i| {
            let a = 2.0 * PI * i as f64 / 24.0;
            let r = 30.0 + if i % 2 == 0 { 0.4 } else { -0.4 };
            (100.0 + r * a.cos(), 80.0 + r * a.sin())
        })
        .collect();
    let bbox = BoundingBox::new(70.0, 50.0, 60.0, 60.0);
    let shape = classify(&bbox, &points, 2800.0, &ClassifierConfig::default());
    assert_eq!(shape.kind, ShapeKind::Circle);
    assert!((shape.points[1].0 - shape.points[0].0 - 30.0).abs() < 1e-9);
}

#[test]
fn test_classifier_near_collinear_small_polygon_is_line() {
    let mut ann = Annotation::new(1, 1.0, 1, BoundingBox::new(0.0, 0.0, 10.0, 0.05))
        .with_polygon(vec![0.0, 0.0, 5.0, 0.02, 10.0, 0.0]);
    ann.area = Some(0.5);
    let shape = classify_annotation(&ann, &ClassifierConfig::default()).unwrap();
    assert_eq!(shape.kind, ShapeKind::Line);
    let span = (shape.points[1].0 - shape.points[0].0).abs();
    assert!((span - 10.0).abs() < 1e-3, "span {}", span);
}

#[test]
fn test_classifier_missing_area_uses_bbox() {
    let mut ann = Annotation::new(1, 1.0, 1, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
    ann.area = None;
    let shape = classify_annotation(&ann, &ClassifierConfig::default()).unwrap();
    assert_eq!(shape.kind, ShapeKind::Point);
}
