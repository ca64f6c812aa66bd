use crate::error::{Error, Result};

/// Integer candidates near `value`: the floor and ceiling of `value - 1`,
/// `value` and `value + 1`, deduplicated and restricted to positive numbers.
///
/// Candidates are ordered by ascending distance from `value`, smaller
/// candidate first on ties, so the scan below always prefers the dimension
/// closest to the ideal scaled size.
fn neighborhood(value: f64) -> Vec<usize> {
    let mut candidates: Vec<i64> = Vec::with_capacity(6);
    for shifted in [value - 1.0, value, value + 1.0] {
        for candidate in [shifted.floor() as i64, shifted.ceil() as i64] {
            if candidate > 0 && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    candidates.sort_by(|a, b| {
        let dist_a = (*a as f64 - value).abs();
        let dist_b = (*b as f64 - value).abs();
        dist_a.total_cmp(&dist_b).then(a.cmp(b))
    });

    candidates.into_iter().map(|c| c as usize).collect()
}

/// Finds an integer `(width, height)` whose product is exactly `target_res`,
/// staying close to the aspect ratio of the original dimensions.
///
/// Both dimensions are scaled by `sqrt(width * height / target_res)` and the
/// integer neighborhoods of the scaled values are scanned for an exact
/// divisor of `target_res`, width candidates first and height candidates
/// second.
/// This is a best-effort search over a handful of candidates; targets with no
/// divisor near the aspect-preserving split fail with [`Error::Rescale`]
/// rather than returning an approximation.
pub fn rescale_size(width: usize, height: usize, target_res: usize) -> Result<(usize, usize)> {
    let scale = ((height * width) as f64 / target_res as f64).sqrt();
    let width_scaled = width as f64 / scale;
    let height_scaled = height as f64 / scale;

    for w in neighborhood(width_scaled) {
        if target_res % w == 0 {
            return Ok((w, target_res / w));
        }
    }
    for h in neighborhood(height_scaled) {
        if target_res % h == 0 {
            return Ok((target_res / h, h));
        }
    }

    Err(Error::Rescale {
        width,
        height,
        target_res,
    })
}
