use polyfit_rs::polyfit_rs::polyfit;

use crate::stats;

/// One capture's contribution to the temporal trend: the integer day it was
/// taken on and the median of its full power matrix.
#[derive(Clone, Copy, Debug)]
pub struct MedianPowerPoint {
    pub day_id: u32,
    pub median_power: f64,
}

/// Group capture indices by day-id. Groups come back in ascending day order;
/// within a group the indices keep input encounter order.
pub fn group_by_day(points: &[MedianPowerPoint]) -> Vec<(u32, Vec<usize>)> {
    let mut days: Vec<u32> = points.iter().map(|p| p.day_id).collect();
    days.sort_unstable();
    days.dedup();
    days.into_iter()
        .map(|day| {
            let indices = points
                .iter()
                .enumerate()
                .filter(|(_, p)| p.day_id == day)
                .map(|(idx, _)| idx)
                .collect();
            (day, indices)
        })
        .collect()
}

/// Detrend one day group with a degree-1 least-squares fit against the
/// in-group index and return the positions whose residual lies more than
/// `sigma` population standard deviations from the residual mean.
///
/// Groups of fewer than two captures and groups with zero residual spread
/// produce no outliers.
pub fn flag_outliers(median_power: &[f64], sigma: f64) -> Vec<usize> {
    let count = median_power.len();
    if count < 2 {
        return Vec::new();
    }
    let x: Vec<f64> = (0..count).map(|i| i as f64).collect();
    let coeffs = match polyfit(&x, median_power, 1) {
        Ok(c) if c.len() == 2 => c,
        _ => return Vec::new(),
    };
    let residuals: Vec<f64> = median_power
        .iter()
        .zip(&x)
        .map(|(&y, &xi)| y - (coeffs[0] + coeffs[1] * xi))
        .collect();
    let residual_mean = stats::mean(&residuals);
    let residual_std = stats::population_std(&residuals, residual_mean);
    if !(residual_std > 0.0) {
        return Vec::new();
    }
    residuals
        .iter()
        .enumerate()
        .filter(|(_, &r)| (r - residual_mean).abs() / residual_std > sigma)
        .map(|(idx, _)| idx)
        .collect()
}
