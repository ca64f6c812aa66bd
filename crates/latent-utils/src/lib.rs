#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Schedule, windowing and latent-scaling helpers for diffusion sampling
//! pipelines built on burn.
//!
//! Everything here is a stateless, synchronous computation: converting
//! `(start, end)` windows between the time domains a sampler understands,
//! testing whether a step's noise level falls inside an active window,
//! finding an integer resolution that matches a target pixel count, parsing
//! block lists, and resampling `[batch, channel, height, width]` latents
//! through a pluggable [`ScaleBackend`].

#[macro_use]
extern crate derive_new;

/// The spherical latent resampler.
pub mod bislerp;
/// Block spec parsing.
pub mod blocks;
/// Crate errors.
pub mod error;
/// Integer resolution search.
pub mod rescale;
/// Latent scaling and backend selection.
pub mod scale;
/// Sigma extraction and time-window checks.
pub mod sigma;
/// Time-domain conversion.
pub mod time;

pub use bislerp::bislerp;
pub use blocks::{BlockIdx, parse_blocks};
pub use error::{Error, Result};
pub use rescale::rescale_size;
pub use scale::{ScaleBackend, ScaleExtension, ScaleMode, UPSCALE_METHODS, scale_samples};
pub use sigma::{
    SIGMAS_KEY, SamplerOptions, SigmaValue, TimeArg, check_time, get_sigma, get_sigma_key,
};
pub use time::{SigmaSchedule, TimeMode, convert_time};

/// Backend for test cases
#[cfg(test)]
pub type TestBackend = burn_ndarray::NdArray<f32>;
