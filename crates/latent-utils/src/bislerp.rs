use burn::tensor::{Tensor, TensorData, backend::Backend};

// Vector pairs at least this close to parallel are lerped instead of slerped.
const DOT_THRESHOLD: f32 = 0.9995;

/// Resamples `samples` to `[height, width]` by spherical linear interpolation
/// of channel vectors.
///
/// Width is resampled first, then height. Each output position maps to a
/// source coordinate through the half-pixel-center mapping
/// `(i + 0.5) * old / new - 0.5`, clamped to the input range; the two
/// bracketing pixels combine by slerping their normalized channel vectors
/// while interpolating magnitudes linearly. Near-parallel and zero-magnitude
/// pairs degrade to plain linear interpolation.
///
/// The computation runs host-side in f32; the result is rebuilt on the
/// source device.
pub fn bislerp<B: Backend>(samples: Tensor<B, 4>, width: usize, height: usize) -> Tensor<B, 4> {
    let device = samples.device();
    let [batch, channels, in_height, in_width] = samples.dims();

    let values: Vec<f32> = samples.into_data().iter::<f32>().collect();

    // Width pass on the last axis, then the height pass through a transpose
    // round trip so it can reuse the same last-axis kernel.
    let values = resample_last_axis(&values, batch, channels, in_height, in_width, width);
    let values = swap_last_axes(&values, batch, channels, in_height, width);
    let values = resample_last_axis(&values, batch, channels, width, in_height, height);
    let values = swap_last_axes(&values, batch, channels, width, height);

    Tensor::from_data(
        TensorData::new(values, [batch, channels, height, width]),
        &device,
    )
}

/// Resamples the last axis of a `[batch, channels, rows, in_cols]` buffer to
/// `out_cols`, slerping the channel vector at each position.
fn resample_last_axis(
    values: &[f32],
    batch: usize,
    channels: usize,
    rows: usize,
    in_cols: usize,
    out_cols: usize,
) -> Vec<f32> {
    if in_cols == out_cols {
        return values.to_vec();
    }

    let mut out = vec![0.0; batch * channels * rows * out_cols];
    let mut lo_pixel = vec![0.0; channels];
    let mut hi_pixel = vec![0.0; channels];

    for b in 0..batch {
        for row in 0..rows {
            for col in 0..out_cols {
                let (lo, hi, ratio) = source_span(col, in_cols, out_cols);
                for c in 0..channels {
                    let base = ((b * channels + c) * rows + row) * in_cols;
                    lo_pixel[c] = values[base + lo];
                    hi_pixel[c] = values[base + hi];
                }

                let blended = slerp(&lo_pixel, &hi_pixel, ratio);
                for c in 0..channels {
                    let base = ((b * channels + c) * rows + row) * out_cols;
                    out[base + col] = blended[c];
                }
            }
        }
    }

    out
}

/// Transposes the trailing `[rows, cols]` axes of each image in the buffer.
fn swap_last_axes(
    values: &[f32],
    batch: usize,
    channels: usize,
    rows: usize,
    cols: usize,
) -> Vec<f32> {
    let mut out = vec![0.0; values.len()];
    for image in 0..batch * channels {
        let base = image * rows * cols;
        for row in 0..rows {
            for col in 0..cols {
                out[base + col * rows + row] = values[base + row * cols + col];
            }
        }
    }
    out
}

/// Bracketing source indices and the blend ratio for an output position,
/// using half-pixel centers clamped to the input range.
fn source_span(index: usize, in_len: usize, out_len: usize) -> (usize, usize, f32) {
    let scale = in_len as f32 / out_len as f32;
    let center = ((index as f32 + 0.5) * scale - 0.5).clamp(0.0, (in_len - 1) as f32);
    let lo = center.floor() as usize;
    let hi = (lo + 1).min(in_len - 1);
    (lo, hi, center - lo as f32)
}

fn lerp(v0: &[f32], v1: &[f32], ratio: f32) -> Vec<f32> {
    v0.iter()
        .zip(v1)
        .map(|(a, b)| a * (1.0 - ratio) + b * ratio)
        .collect()
}

/// Spherical interpolation of two channel vectors with linearly interpolated
/// magnitudes.
fn slerp(v0: &[f32], v1: &[f32], ratio: f32) -> Vec<f32> {
    let norm0 = v0.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm1 = v1.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm0 == 0.0 || norm1 == 0.0 {
        return lerp(v0, v1, ratio);
    }

    let dot = v0.iter().zip(v1).map(|(a, b)| a * b).sum::<f32>() / (norm0 * norm1);
    if dot.abs() > DOT_THRESHOLD {
        return lerp(v0, v1, ratio);
    }

    let omega = dot.clamp(-1.0, 1.0).acos();
    let sin_omega = omega.sin();
    let weight0 = ((1.0 - ratio) * omega).sin() / sin_omega;
    let weight1 = (ratio * omega).sin() / sin_omega;
    let magnitude = norm0 * (1.0 - ratio) + norm1 * ratio;

    v0.iter()
        .zip(v1)
        .map(|(a, b)| (a / norm0 * weight0 + b / norm1 * weight1) * magnitude)
        .collect()
}
