use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use burn::tensor::{
    Tensor,
    backend::Backend,
    module::interpolate,
    ops::{InterpolateMode, InterpolateOptions},
};
use serde::{Deserialize, Serialize};

use crate::bislerp::bislerp;
use crate::error::{Error, Result};

/// Method tags supported by the built-in scaler.
pub const UPSCALE_METHODS: &[&str] = &["bicubic", "bislerp", "bilinear", "nearest"];

/// Algorithm used to resample latents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleMode {
    /// Bicubic interpolation.
    Bicubic,
    /// Spherical linear interpolation of channel vectors.
    Bislerp,
    /// Bilinear interpolation.
    Bilinear,
    /// Nearest-neighbor interpolation.
    Nearest,
}

impl ScaleMode {
    /// The lowercase tag, as listed in [`UPSCALE_METHODS`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleMode::Bicubic => "bicubic",
            ScaleMode::Bislerp => "bislerp",
            ScaleMode::Bilinear => "bilinear",
            ScaleMode::Nearest => "nearest",
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bicubic" => Ok(ScaleMode::Bicubic),
            "bislerp" => Ok(ScaleMode::Bislerp),
            "bilinear" => Ok(ScaleMode::Bilinear),
            "nearest" => Ok(ScaleMode::Nearest),
            _ => Err(Error::InvalidScaleMode(s.to_owned())),
        }
    }
}

/// Optional external latent-scaling capability.
///
/// Implementations bring their own method list and resampler. A `None`
/// version marks the legacy interface, which does not accept a sigma.
pub trait ScaleExtension<B: Backend>: Send + Sync {
    /// Interface version; `None` marks the legacy, sigma-unaware interface.
    fn version(&self) -> Option<u32> {
        None
    }

    /// Method tags the extension accepts.
    fn upscale_methods(&self) -> Vec<String>;

    /// Resamples `samples` to `[height, width]` with the named method.
    fn scale(
        &self,
        samples: Tensor<B, 4>,
        width: usize,
        height: usize,
        mode: &str,
        sigma: Option<f64>,
    ) -> Tensor<B, 4>;
}

/// Latent scaling strategy, fixed once selected.
///
/// Replaces an ambient load-time probe: callers run [`ScaleBackend::select`]
/// during their own setup and pass the value around, so tests can inject any
/// variant directly.
pub enum ScaleBackend<B: Backend> {
    /// burn interpolation plus the [`bislerp`] resampler.
    BuiltIn,
    /// Extension with the legacy interface; sigmas are discarded.
    ExtensionLegacy(Arc<dyn ScaleExtension<B>>),
    /// Extension with the current, sigma-aware interface.
    Extension(Arc<dyn ScaleExtension<B>>),
}

impl<B: Backend> Clone for ScaleBackend<B> {
    fn clone(&self) -> Self {
        match self {
            ScaleBackend::BuiltIn => ScaleBackend::BuiltIn,
            ScaleBackend::ExtensionLegacy(ext) => ScaleBackend::ExtensionLegacy(ext.clone()),
            ScaleBackend::Extension(ext) => ScaleBackend::Extension(ext.clone()),
        }
    }
}

impl<B: Backend> fmt::Debug for ScaleBackend<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaleBackend::BuiltIn => "BuiltIn",
            ScaleBackend::ExtensionLegacy(_) => "ExtensionLegacy",
            ScaleBackend::Extension(_) => "Extension",
        };
        f.write_str(name)
    }
}

impl<B: Backend> ScaleBackend<B> {
    /// Selects the scaling strategy.
    ///
    /// Callers probe for their extension themselves and hand over whatever
    /// they found; `None` (absent, malformed, or opted out) selects the
    /// built-in path. The choice is logged at debug level only and is meant
    /// to be made once, at setup.
    pub fn select(extension: Option<Arc<dyn ScaleExtension<B>>>) -> Self {
        match extension {
            Some(ext) => match ext.version() {
                Some(version) => {
                    log::debug!("scaling latents via extension (version {version})");
                    ScaleBackend::Extension(ext)
                }
                None => {
                    log::debug!("scaling latents via legacy extension");
                    ScaleBackend::ExtensionLegacy(ext)
                }
            },
            None => {
                log::debug!("scaling latents via built-in interpolation");
                ScaleBackend::BuiltIn
            }
        }
    }

    /// Method tags accepted by [`scale_samples`](Self::scale_samples).
    pub fn upscale_methods(&self) -> Vec<String> {
        match self {
            ScaleBackend::BuiltIn => UPSCALE_METHODS.iter().map(|m| (*m).to_owned()).collect(),
            ScaleBackend::ExtensionLegacy(ext) | ScaleBackend::Extension(ext) => {
                ext.upscale_methods()
            }
        }
    }

    /// Resamples `samples` to `[height, width]` using the named method.
    ///
    /// `sigma` reaches sigma-aware extensions only; the legacy interface and
    /// the built-in path ignore it.
    pub fn scale_samples(
        &self,
        samples: Tensor<B, 4>,
        width: usize,
        height: usize,
        mode: &str,
        sigma: Option<f64>,
    ) -> Result<Tensor<B, 4>> {
        match self {
            ScaleBackend::Extension(ext) => Ok(ext.scale(samples, width, height, mode, sigma)),
            ScaleBackend::ExtensionLegacy(ext) => {
                Ok(ext.scale(samples, width, height, mode, None))
            }
            ScaleBackend::BuiltIn => {
                let interpolate_mode = match mode.parse::<ScaleMode>()? {
                    ScaleMode::Bislerp => return Ok(bislerp(samples, width, height)),
                    ScaleMode::Bicubic => InterpolateMode::Bicubic,
                    ScaleMode::Bilinear => InterpolateMode::Bilinear,
                    ScaleMode::Nearest => InterpolateMode::Nearest,
                };
                Ok(interpolate(
                    samples,
                    [height, width],
                    InterpolateOptions::new(interpolate_mode),
                ))
            }
        }
    }
}

/// Resamples `samples` to `[height, width]` through `backend`.
///
/// Free-function mirror of [`ScaleBackend::scale_samples`] for callers that
/// pass the strategy alongside the rest of their sampler state.
pub fn scale_samples<B: Backend>(
    backend: &ScaleBackend<B>,
    samples: Tensor<B, 4>,
    width: usize,
    height: usize,
    mode: &str,
    sigma: Option<f64>,
) -> Result<Tensor<B, 4>> {
    backend.scale_samples(samples, width, height, mode, sigma)
}
