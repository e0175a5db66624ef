//! Point-cloud tests used to tell lines and circles from generic polygons.

use nalgebra::DMatrix;

/// A 2D point as `(x, y)`.
pub type Point = (f64, f64);

/// Arithmetic mean of the points, `None` when empty.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    Some((sx / n, sy / n))
}

/// Principal axis of a point cloud from the SVD of its centered coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PrincipalAxis {
    centroid: Point,
    direction: Point,
    major: f64,
    minor: f64,
}

fn principal_axis(points: &[Point]) -> Option<PrincipalAxis> {
    let centroid = centroid(points)?;
    let centered = DMatrix::from_fn(points.len(), 2, |row, col| {
        let (x, y) = points[row];
        if col == 0 {
            x - centroid.0
        } else {
            y - centroid.1
        }
    });

    let svd = centered.svd(false, true);
    let v_t = svd.v_t?;
    let s = &svd.singular_values;

    // Ordering of singular values is not relied upon.
    let major_row = if s.len() > 1 && s[1] > s[0] { 1 } else { 0 };
    let major = s[major_row];
    let minor = if s.len() > 1 { s[1 - major_row] } else { 0.0 };

    Some(PrincipalAxis {
        centroid,
        direction: (v_t[(major_row, 0)], v_t[(major_row, 1)]),
        major,
        minor,
    })
}

/// Whether the points are collinear within `tolerance`.
///
/// The test compares the second singular value of the centered points to
/// the first. Fewer than two points never form a line; coincident points do.
pub fn is_line(points: &[Point], tolerance: f64) -> bool {
    if points.len() < 2 {
        return false;
    }
    match principal_axis(points) {
        Some(axis) if axis.major == 0.0 => true,
        Some(axis) => axis.minor / axis.major < tolerance,
        None => false,
    }
}

/// End points of the segment spanned by the points along their principal axis.
///
/// Every point is projected onto the axis through the centroid; the extreme
/// projections are returned, smallest first.
pub fn line_extremes(points: &[Point]) -> Option<[Point; 2]> {
    let axis = principal_axis(points)?;
    let (cx, cy) = axis.centroid;
    let (dx, dy) = axis.direction;

    let (t_min, t_max) = points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &(x, y)| {
            let t = (x - cx) * dx + (y - cy) * dy;
            (lo.min(t), hi.max(t))
        },
    );

    Some([
        (cx + t_min * dx, cy + t_min * dy),
        (cx + t_max * dx, cy + t_max * dy),
    ])
}

/// Whether the points lie on a common circle around their centroid.
///
/// Passes when the population standard deviation of the vertex-to-centroid
/// distances is below `std_threshold`. Needs at least three points.
pub fn is_circle(points: &[Point], std_threshold: f64) -> bool {
    if points.len() < 3 {
        return false;
    }
    let Some((cx, cy)) = centroid(points) else {
        return false;
    };

    let distances: Vec<f64> = points
        .iter()
        .map(|&(x, y)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt())
        .collect();
    let n = distances.len() as f64;
    let mean = distances.iter().sum::<f64>() / n;
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;

    variance.sqrt() < std_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn circle(n: usize, cx: f64, cy: f64, r: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / n as f64;
                (cx + r * a.cos(), cy + r * a.sin())
            })
            .collect()
    }

    #[test]
    fn test_centroid() {
        assert_eq!(centroid(&[]), None);
        assert_eq!(centroid(&[(0.0, 0.0), (2.0, 4.0)]), Some((1.0, 2.0)));
    }

    #[test]
    fn test_line_detection() {
        assert!(is_line(&[(0.0, 0.0), (1.0, 1.0)], 0.01));
        assert!(is_line(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.001)], 0.01));
        assert!(!is_line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], 0.01));
    }

    #[test]
    fn test_line_needs_two_points() {
        assert!(!is_line(&[], 0.01));
        assert!(!is_line(&[(1.0, 1.0)], 0.01));
    }

    #[test]
    fn test_coincident_points_are_a_line() {
        assert!(is_line(&[(2.0, 2.0), (2.0, 2.0), (2.0, 2.0)], 0.01));
    }

    #[test]
    fn test_line_extremes() {
        let points = [(1.0, 1.0), (0.0, 0.0), (3.0, 3.0), (2.0, 2.0)];
        let [a, b] = line_extremes(&points).unwrap();
        let (lo, hi) = if a.0 < b.0 { (a, b) } else { (b, a) };
        assert!((lo.0 - 0.0).abs() < 1e-9 && (lo.1 - 0.0).abs() < 1e-9);
        assert!((hi.0 - 3.0).abs() < 1e-9 && (hi.1 - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_detection() {
        assert!(is_circle(&circle(20, 50.0, 50.0, 10.0), 1.0));
        assert!(!is_circle(&[(0.0, 0.0), (1.0, 1.0)], 1.0));
    }

    #[test]
    fn test_elongated_polygon_is_not_circle() {
        let points = [(0.0, 0.0), (40.0, 0.0), (40.0, 4.0), (0.0, 4.0), (20.0, 2.0)];
        assert!(!is_circle(&points, 1.0));
    }
}
