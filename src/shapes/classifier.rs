//! Inference of the simplest shape primitive implied by a stored annotation.

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::shapes::geometry::{centroid, is_circle, is_line, line_extremes, Point};
use crate::types::{Annotation, BoundingBox};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape primitive kinds, named as in LabelMe's `shape_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Point,
    Line,
    Circle,
    Rectangle,
    Polygon,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::Line => "line",
            ShapeKind::Circle => "circle",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Polygon => "polygon",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shape kind with the minimal points that reconstruct it.
///
/// - Point: the point
/// - Line: the two end points
/// - Circle: center, then one point on the boundary
/// - Rectangle: two opposite corners
/// - Polygon: every vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapePrimitive {
    pub kind: ShapeKind,
    pub points: Vec<Point>,
}

impl ShapePrimitive {
    fn new(kind: ShapeKind, points: Vec<Point>) -> Self {
        Self { kind, points }
    }
}

/// Classify a box with an optional polygon. First matching rule wins:
///
/// 1. `area` below [`ClassifierConfig::degenerate_area`]: a line when the
///    polygon is collinear, a point at the box center otherwise.
/// 2. A polygon is present: a circle when its vertices are equidistant from
///    their centroid, a polygon otherwise.
/// 3. No polygon: a rectangle from the box corners.
///
/// # Example
///
/// ```
/// use annotaria::config::ClassifierConfig;
/// use annotaria::shapes::{classify, ShapeKind};
/// use annotaria::types::BoundingBox;
///
/// let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
/// let shape = classify(&bbox, &[], bbox.area(), &ClassifierConfig::default());
/// assert_eq!(shape.kind, ShapeKind::Rectangle);
/// assert_eq!(shape.points, vec![(10.0, 20.0), (40.0, 60.0)]);
/// ```
pub fn classify(
    bbox: &BoundingBox,
    polygon: &[Point],
    area: f64,
    config: &ClassifierConfig,
) -> ShapePrimitive {
    if area < config.degenerate_area {
        if is_line(polygon, config.line_tolerance) {
            if let Some([start, end]) = line_extremes(polygon) {
                return ShapePrimitive::new(ShapeKind::Line, vec![start, end]);
            }
        }
        return ShapePrimitive::new(ShapeKind::Point, vec![bbox.center()]);
    }

    if !polygon.is_empty() {
        if polygon.len() >= config.circle_min_vertices
            && is_circle(polygon, config.circle_std_threshold)
        {
            if let Some((cx, cy)) = centroid(polygon) {
                let radius = bbox.width.min(bbox.height) / 2.0;
                return ShapePrimitive::new(ShapeKind::Circle, vec![(cx, cy), (cx + radius, cy)]);
            }
        }
        return ShapePrimitive::new(ShapeKind::Polygon, polygon.to_vec());
    }

    ShapePrimitive::new(
        ShapeKind::Rectangle,
        vec![(bbox.x, bbox.y), (bbox.right(), bbox.bottom())],
    )
}

/// Classify an annotation using its bbox, first polygon ring and stored area.
pub fn classify_annotation(annotation: &Annotation, config: &ClassifierConfig) -> Result<ShapePrimitive> {
    let bbox = annotation.to_bbox()?;
    Ok(classify(
        &bbox,
        &annotation.polygon(),
        annotation.stored_area(),
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn cfg() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    #[test]
    fn test_square_is_polygon_not_circle() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let shape = classify(&bbox, &square, 100.0, &cfg());
        assert_eq!(shape.kind, ShapeKind::Polygon);
        assert_eq!(shape.points, square.to_vec());
    }

    #[test]
    fn test_round_polygon_is_circle() {
        let points: Vec<Point> = (0..20)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / 20.0;
                (50.0 + 10.0 * a.cos(), 50.0 + 10.0 * a.sin())
            })
            .collect();
        let bbox = BoundingBox::new(40.0, 40.0, 20.0, 20.0);
        let shape = classify(&bbox, &points, 310.0, &cfg());
        assert_eq!(shape.kind, ShapeKind::Circle);
        let (c, edge) = (shape.points[0], shape.points[1]);
        assert!((c.0 - 50.0).abs() < 1e-9 && (c.1 - 50.0).abs() < 1e-9);
        assert!((edge.0 - 60.0).abs() < 1e-9 && (edge.1 - c.1).abs() < 1e-12);
    }

    #[test]
    fn test_small_collinear_is_line() {
        let bbox = BoundingBox::new(0.0, 0.0, 4.0, 0.0);
        let shape = classify(&bbox, &[(0.0, 0.0), (4.0, 0.0)], 0.0, &cfg());
        assert_eq!(shape.kind, ShapeKind::Line);
        let xs: Vec<f64> = shape.points.iter().map(|p| p.0).collect();
        assert!(xs.iter().any(|x| x.abs() < 1e-9));
        assert!(xs.iter().any(|x| (x - 4.0).abs() < 1e-9));
    }

    #[test]
    fn test_small_without_polygon_is_point() {
        let bbox = BoundingBox::new(10.0, 10.0, 1.0, 1.0);
        let shape = classify(&bbox, &[], 1.0, &cfg());
        assert_eq!(shape.kind, ShapeKind::Point);
        assert_eq!(shape.points, vec![(10.5, 10.5)]);
    }

    #[test]
    fn test_small_blob_is_point() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let blob = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let shape = classify(&bbox, &blob, 1.0, &cfg());
        assert_eq!(shape.kind, ShapeKind::Point);
    }

    #[test]
    fn test_box_only_is_rectangle() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        let shape = classify(&bbox, &[], 12.0, &cfg());
        assert_eq!(shape.kind, ShapeKind::Rectangle);
        assert_eq!(shape.points, vec![(1.0, 2.0), (4.0, 6.0)]);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let bbox = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        let config = ClassifierConfig {
            degenerate_area: 5.0,
            ..ClassifierConfig::default()
        };
        assert_eq!(classify(&bbox, &[], 4.0, &config).kind, ShapeKind::Point);
        assert_eq!(classify(&bbox, &[], 4.0, &cfg()).kind, ShapeKind::Rectangle);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ShapeKind::Circle.to_string(), "circle");
        assert_eq!(serde_json::to_string(&ShapeKind::Rectangle).unwrap(), "\"rectangle\"");
    }
}
