//! Shape descriptors over a single point cloud.
//!
//! Both descriptors are pure functions of an ordered slice of Cartesian
//! coordinates and know nothing about chemistry:
//!
//! - [`globularity`]: ratio of the smallest to the largest principal-axis
//!   variance (1 = spherical, 0 = flat or linear)
//! - [`plane_deviation`]: mean orthogonal distance of the points to their
//!   least-squares plane (the "PBF" descriptor)

use nalgebra::{Matrix3, SymmetricEigen, Vector3};

/// Returned by [`globularity`] when the leading principal axis has zero
/// variance (for example, when every point coincides).
pub const DEGENERATE_GLOBULARITY: f64 = -1.0;

/// Computes the globularity of a point cloud.
///
/// The covariance matrix of the coordinates is diagonalized and the ratio of
/// its smallest to largest eigenvalue is returned.
///
/// # Returns
///
/// - `0.0` for an empty cloud or one containing non-finite coordinates
/// - [`DEGENERATE_GLOBULARITY`] (`-1.0`) when the largest eigenvalue is zero
/// - a value in `[0, 1]` otherwise
pub fn globularity(points: &[[f64; 3]]) -> f64 {
    let Some(moments) = principal_moments(points) else {
        return 0.0;
    };

    let [largest, _, smallest] = moments;
    if largest == 0.0 {
        return DEGENERATE_GLOBULARITY;
    }

    (smallest.max(0.0) / largest).min(1.0)
}

/// Eigenvalues of the coordinate covariance matrix, sorted descending.
///
/// Returns `None` for an empty cloud or non-finite coordinates.
pub fn principal_moments(points: &[[f64; 3]]) -> Option<[f64; 3]> {
    let (_, scatter) = centered_scatter(points)?;
    let covariance = scatter / points.len() as f64;

    if covariance.iter().all(|v| *v == 0.0) {
        return Some([0.0; 3]);
    }

    let eigen = SymmetricEigen::new(covariance);
    let mut values = [
        eigen.eigenvalues[0],
        eigen.eigenvalues[1],
        eigen.eigenvalues[2],
    ];
    values.sort_by(|a, b| b.total_cmp(a));
    Some(values)
}

/// Fits a plane through the centroid of the points and returns its unit
/// normal (the direction of least variance) together with the centroid.
///
/// Returns `None` for an empty cloud or non-finite coordinates.
pub fn best_fit_plane(points: &[[f64; 3]]) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let (centroid, scatter) = centered_scatter(points)?;

    if scatter.iter().all(|v| *v == 0.0) {
        return Some((centroid, Vector3::z()));
    }

    let eigen = SymmetricEigen::new(scatter);
    let minor = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .unwrap_or(2);

    let normal = eigen.eigenvectors.column(minor).into_owned();
    let norm = normal.norm();
    let normal = if norm > 0.0 { normal / norm } else { Vector3::z() };

    Some((centroid, normal))
}

/// Computes the mean absolute distance of the points to their best-fit plane.
///
/// Returns `0.0` for fewer than two points or non-finite coordinates.
pub fn plane_deviation(points: &[[f64; 3]]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let Some((centroid, normal)) = best_fit_plane(points) else {
        return 0.0;
    };

    let total: f64 = points
        .iter()
        .map(|p| (Vector3::from(*p) - centroid).dot(&normal).abs())
        .sum();

    total / points.len() as f64
}

/// Centroid and scatter matrix (sum of outer products of centered points).
///
/// Coordinates are first expressed relative to the first point so that a
/// cloud of identical points yields an exactly zero scatter matrix.
fn centered_scatter(points: &[[f64; 3]]) -> Option<(Vector3<f64>, Matrix3<f64>)> {
    let first = points.first()?;
    if points.iter().flatten().any(|v| !v.is_finite()) {
        return None;
    }

    let origin = Vector3::from(*first);
    let n = points.len() as f64;

    let shifted: Vec<Vector3<f64>> = points
        .iter()
        .map(|p| Vector3::from(*p) - origin)
        .collect();
    let mean = shifted.iter().fold(Vector3::zeros(), |acc, d| acc + d) / n;

    let mut scatter = Matrix3::<f64>::zeros();
    for d in &shifted {
        let centered = d - mean;
        scatter += centered * centered.transpose();
    }

    Some((origin + mean, scatter))
}
