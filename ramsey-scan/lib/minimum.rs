//! Locating the bottom of a fringe.
//!
//! Two estimates are produced for each fringe: the sampled point with the
//! smallest value, and the vertex of a quadratic least-squares fit through all
//! samples. The second resolves shifts well below the sampling grid.

use itertools::Itertools;
use nalgebra::{ DMatrix, DVector };
use crate::error::{ Error, Result };

/// Singular values below this fraction of the largest are treated as zero in
/// least-squares solves.
const SVD_RCOND: f64 = 1e-12;

/// Return the sample `(x, y)` with the smallest `y`.
///
/// Ties go to the first occurrence. Returns `None` if there are no samples or
/// the inputs have different lengths.
pub fn grid_min(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() { return None; }
    ys.iter()
        .position_min_by(|l, r| l.total_cmp(r))
        .map(|k| (xs[k], ys[k]))
}

/// Least-squares fit of a polynomial of degree `degree` to the samples.
///
/// Coefficients are returned in order of increasing power, `[c0, c1, ...,
/// c_degree]`. The abscissae are rescaled to `[-1, 1]` before solving, so
/// samples bunched tightly around a large value fit as well as any others;
/// shift them towards zero first if they are far from the origin.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>> {
    if xs.len() != ys.len() {
        return Err(Error::fit(
            format!("unequal sample lengths {} and {}", xs.len(), ys.len())));
    }
    if xs.len() <= degree {
        return Err(Error::fit(
            format!(
                "{} samples are too few for a degree-{} fit",
                xs.len(), degree,
            )
        ));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(Error::fit("non-finite sample"));
    }
    let scale
        = xs.iter()
        .map(|x| x.abs())
        .fold(0.0_f64, f64::max);
    if scale == 0.0 {
        return Err(Error::fit("all abscissae are zero"));
    }
    let vander
        = DMatrix::from_fn(xs.len(), degree + 1, |i, j| (xs[i] / scale).powi(j as i32));
    let rhs = DVector::from_column_slice(ys);
    let svd = vander.svd(true, true);
    let smax = svd.singular_values.max();
    let smin = svd.singular_values.min();
    if smin <= SVD_RCOND * smax {
        return Err(Error::fit("degenerate abscissae"));
    }
    let coeffs = svd.solve(&rhs, SVD_RCOND * smax).map_err(Error::fit)?;
    Ok(
        coeffs.iter().enumerate()
            .map(|(j, c)| c / scale.powi(j as i32))
            .collect()
    )
}

/// Evaluate a polynomial with coefficients in increasing power at `x`.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Abscissa `-b / 2a` of the vertex of `c + b x + a x²`, from coefficients
/// `[c, b, a]`.
///
/// Returns `None` unless given exactly three coefficients with `a ≠ 0`.
pub fn quadratic_vertex(coeffs: &[f64]) -> Option<f64> {
    match *coeffs {
        [_, b, a] if a != 0.0 => Some(-b / (2.0 * a)),
        _ => None,
    }
}

/// Both estimates of a fringe minimum.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Minimum {
    /// Sampled abscissa with the smallest value.
    pub grid: f64,
    /// Value at `grid`.
    pub grid_value: f64,
    /// Vertex of the quadratic fit.
    pub fit: f64,
}

/// Locate the minimum of a fringe sampled at `xs` around `centre`.
///
/// The quadratic fit is carried out in offsets `x - centre` and the vertex
/// shifted back. Fails if the fit is degenerate or opens downward.
pub fn fringe_minimum(xs: &[f64], ys: &[f64], centre: f64) -> Result<Minimum> {
    let (grid, grid_value)
        = grid_min(xs, ys)
        .ok_or_else(|| Error::fit("empty or mismatched fringe"))?;
    let offsets: Vec<f64> = xs.iter().map(|x| x - centre).collect();
    let coeffs = polyfit(&offsets, ys, 2)?;
    if coeffs[2] <= 0.0 {
        return Err(Error::fit(
            format!("fitted parabola has no minimum (a = {:e})", coeffs[2])));
    }
    let vertex
        = quadratic_vertex(&coeffs)
        .ok_or_else(|| Error::fit("fitted parabola is flat"))?;
    Ok(Minimum { grid, grid_value, fit: vertex + centre })
}
