//! Cubic spline interpolation with not-a-knot end conditions.
//!
//! The spline is stored as the second derivative at every knot. On interval
//! `i` with `t = x - x[i]` and `h = x[i+1] - x[i]`:
//!
//! ```text
//! S(x) = y[i] + b[i] t + m[i]/2 t^2 + (m[i+1] - m[i]) / (6h) t^3
//! b[i] = (y[i+1] - y[i]) / h - h (2 m[i] + m[i+1]) / 6
//! ```
//!
//! Not-a-knot makes the third derivative continuous across the second and
//! the second-to-last knot. With two knots this degenerates to a straight
//! line, with three to the single parabola through all of them.

use crate::error::{AnnotariaError, Result};

/// A fitted interpolating cubic spline.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through `(x[i], y[i])`.
    ///
    /// # Errors
    ///
    /// * [`AnnotariaError::InvalidAnnotation`] if fewer than two points are
    ///   given, the slices differ in length, or a value is not finite.
    /// * [`AnnotariaError::NonMonotonicPositions`] if `x` is not strictly
    ///   increasing.
    ///
    /// # Example
    ///
    /// ```
    /// use annotaria::interpolation::CubicSpline;
    ///
    /// let spline = CubicSpline::fit(&[0.0, 10.0], &[0.0, 100.0]).unwrap();
    /// assert_eq!(spline.evaluate(10.0), 100.0);
    /// assert!((spline.evaluate(2.5) - 25.0).abs() < 1e-12);
    /// ```
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(AnnotariaError::InvalidAnnotation(format!(
                "Spline needs as many ordinates as abscissae, got {} and {}",
                y.len(),
                x.len()
            )));
        }
        if x.len() < 2 {
            return Err(AnnotariaError::InvalidAnnotation(format!(
                "Spline needs at least 2 points, got {}",
                x.len()
            )));
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(AnnotariaError::InvalidAnnotation(
                "Spline points must be finite".to_string(),
            ));
        }
        if let Some(w) = x.windows(2).find(|w| w[1] <= w[0]) {
            return Err(AnnotariaError::NonMonotonicPositions(format!(
                "Spline abscissae must be strictly increasing, found {} followed by {}",
                w[0], w[1]
            )));
        }

        let m = second_derivatives(x, y);
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Evaluate the spline at `xq`.
    ///
    /// At a knot the stored ordinate is returned unchanged. Outside the knot
    /// range the first or last polynomial piece is extended.
    pub fn evaluate(&self, xq: f64) -> f64 {
        let n = self.x.len();
        let i = match self.x.binary_search_by(|v| v.total_cmp(&xq)) {
            Ok(k) => return self.y[k],
            Err(idx) => idx.saturating_sub(1).min(n - 2),
        };

        let h = self.x[i + 1] - self.x[i];
        let t = xq - self.x[i];
        let slope = (self.y[i + 1] - self.y[i]) / h - h * (2.0 * self.m[i] + self.m[i + 1]) / 6.0;
        let curvature = self.m[i] / 2.0;
        let jerk = (self.m[i + 1] - self.m[i]) / (6.0 * h);

        self.y[i] + t * (slope + t * (curvature + t * jerk))
    }

    /// Evaluate the spline at every position in `xs`.
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Second derivatives at the knots under not-a-knot end conditions.
fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let d: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

    match n {
        2 => vec![0.0; 2],
        3 => {
            let m = 2.0 * (d[1] - d[0]) / (h[0] + h[1]);
            vec![m; 3]
        }
        _ => {
            // Unknowns m[1..n-1]. The end conditions are substituted into the
            // first and last interior rows, which keeps the system tridiagonal
            // and diagonally dominant.
            let size = n - 2;
            let mut sub = vec![0.0; size];
            let mut diag = vec![0.0; size];
            let mut sup = vec![0.0; size];
            let mut rhs = vec![0.0; size];

            for r in 0..size {
                let i = r + 1;
                let (a, b) = (h[i - 1], h[i]);
                rhs[r] = 6.0 * (d[i] - d[i - 1]);
                sub[r] = a;
                diag[r] = 2.0 * (a + b);
                sup[r] = b;
                if i == 1 {
                    diag[r] = (a + b) * (a + 2.0 * b) / b;
                    sup[r] = (b * b - a * a) / b;
                    sub[r] = 0.0;
                }
                if i == n - 2 {
                    sub[r] = (a * a - b * b) / a;
                    diag[r] = (a + b) * (2.0 * a + b) / a;
                    sup[r] = 0.0;
                }
            }

            let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs);

            let mut m = Vec::with_capacity(n);
            let (h0, h1) = (h[0], h[1]);
            m.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
            m.extend_from_slice(&interior);
            let (ha, hb) = (h[n - 3], h[n - 2]);
            m.push(((ha + hb) * interior[size - 1] - hb * interior[size - 2]) / ha);
            m
        }
    }
}

/// Thomas algorithm. `sub[0]` and `sup[last]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = if i + 1 < n { sup[i] / denom } else { 0.0 };
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d[i] - c[i] * out[i + 1];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_points_is_linear() {
        let s = CubicSpline::fit(&[0.0, 10.0], &[0.0, 100.0]).unwrap();
        let values = s.evaluate_many(&[0.0, 2.5, 5.0, 7.5, 10.0]);
        let expected = [0.0, 25.0, 50.0, 75.0, 100.0];
        for (v, e) in values.iter().zip(expected) {
            assert!((v - e).abs() < 1e-12, "{} vs {}", v, e);
        }
    }

    #[test]
    fn test_three_points_is_parabola() {
        let s = CubicSpline::fit(&[0.0, 1.0, 3.0], &[0.0, 1.0, 9.0]).unwrap();
        assert!((s.evaluate(2.0) - 4.0).abs() < 1e-12);
        assert!((s.evaluate(-1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reproduces_cubic() {
        let x = [0.0, 1.0, 2.5, 3.0, 4.0, 6.0];
        let y: Vec<f64> = x.iter().map(|v| v * v * v - 2.0 * v + 1.0).collect();
        let s = CubicSpline::fit(&x, &y).unwrap();
        for q in [0.5, 1.7, 2.9, 3.5, 5.2] {
            let expected = q * q * q - 2.0 * q + 1.0;
            assert!((s.evaluate(q) - expected).abs() < 1e-8, "at {}: {} vs {}", q, s.evaluate(q), expected);
        }
    }

    #[test]
    fn test_four_points_reproduce_cubic() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 8.0, 27.0];
        let s = CubicSpline::fit(&x, &y).unwrap();
        assert!((s.evaluate(1.5) - 3.375).abs() < 1e-9);
    }

    #[test]
    fn test_knots_exact() {
        let x = [1.0, 2.0, 4.0, 7.0, 8.0];
        let y = [0.3, -1.7, 2.9, 11.1, 0.1];
        let s = CubicSpline::fit(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(y) {
            assert_eq!(s.evaluate(*xi), yi);
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            CubicSpline::fit(&[1.0], &[1.0]),
            Err(AnnotariaError::InvalidAnnotation(_))
        ));
        assert!(matches!(
            CubicSpline::fit(&[1.0, 1.0], &[1.0, 2.0]),
            Err(AnnotariaError::NonMonotonicPositions(_))
        ));
        assert!(matches!(
            CubicSpline::fit(&[1.0, 2.0], &[1.0]),
            Err(AnnotariaError::InvalidAnnotation(_))
        ));
    }
}
