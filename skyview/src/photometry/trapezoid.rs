//! Trapezoid rule over an explicit sample grid, used for band sums of the
//! blackbody spectrum.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrapezoidError {
    #[error("Need at least 2 sample points, got {0}")]
    InsufficientPoints(usize),

    #[error("Sample points must be strictly ascending")]
    NotAscending,
}

/// Integrate `to_integrate` over the strictly ascending sample points `corners`.
pub fn trap_integrate<F>(corners: &[f64], to_integrate: F) -> Result<f64, TrapezoidError>
where
    F: Fn(f64) -> f64,
{
    if corners.len() < 2 {
        return Err(TrapezoidError::InsufficientPoints(corners.len()));
    }

    if corners.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(TrapezoidError::NotAscending);
    }

    // Evaluate each corner once; adjacent intervals share their edge samples
    let samples: Vec<f64> = corners.iter().map(|&x| to_integrate(x)).collect();

    // ∫[x₁,x₂] f(x)dx ≈ (x₂-x₁) × (f(x₁)+f(x₂))/2
    let integral = corners
        .windows(2)
        .zip(samples.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
        .sum();

    Ok(integral)
}
