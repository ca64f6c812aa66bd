use std::collections::BTreeMap;

use burn::tensor::{ElementConversion, Tensor, backend::Backend};

/// Options key holding the sampler's current sigmas.
pub const SIGMAS_KEY: &str = "sigmas";

/// A noise-level value stored in [`SamplerOptions`].
#[derive(Debug, Clone)]
pub enum SigmaValue<B: Backend> {
    /// A host-side scalar, used as-is.
    Scalar(f64),
    /// A 1-D tensor of sigmas; resolves to its maximum element.
    Tensor(Tensor<B, 1>),
}

impl<B: Backend> SigmaValue<B> {
    /// The host-resident scalar for this value.
    ///
    /// Tensor values reduce to their maximum, realized host-side.
    pub fn resolve(&self) -> f64 {
        match self {
            SigmaValue::Scalar(sigma) => *sigma,
            SigmaValue::Tensor(sigmas) => sigmas.clone().max().into_scalar().elem(),
        }
    }
}

impl<B: Backend> From<f64> for SigmaValue<B> {
    fn from(sigma: f64) -> Self {
        SigmaValue::Scalar(sigma)
    }
}

impl<B: Backend> From<Tensor<B, 1>> for SigmaValue<B> {
    fn from(sigmas: Tensor<B, 1>) -> Self {
        SigmaValue::Tensor(sigmas)
    }
}

/// String-keyed values handed along by the sampler.
#[derive(Debug, Clone)]
pub struct SamplerOptions<B: Backend> {
    entries: BTreeMap<String, SigmaValue<B>>,
}

impl<B: Backend> SamplerOptions<B> {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SigmaValue<B>>) {
        self.entries.insert(key.into(), value.into());
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&SigmaValue<B>> {
        self.entries.get(key)
    }
}

impl<B: Backend> Default for SamplerOptions<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// The sigma stored under [`SIGMAS_KEY`], resolved to a host scalar.
pub fn get_sigma<B: Backend>(options: &SamplerOptions<B>) -> Option<f64> {
    get_sigma_key(options, SIGMAS_KEY)
}

/// The sigma stored under `key`, resolved to a host scalar.
///
/// A missing key is `None`, never an error.
pub fn get_sigma_key<B: Backend>(options: &SamplerOptions<B>, key: &str) -> Option<f64> {
    options.get(key).map(SigmaValue::resolve)
}

/// Time argument accepted by [`check_time`].
#[derive(Debug, Clone)]
pub enum TimeArg<'a, B: Backend> {
    /// A raw sigma.
    Sigma(f64),
    /// An options container resolved through [`get_sigma`].
    Options(&'a SamplerOptions<B>),
}

impl<B: Backend> From<f64> for TimeArg<'_, B> {
    fn from(sigma: f64) -> Self {
        TimeArg::Sigma(sigma)
    }
}

impl<'a, B: Backend> From<&'a SamplerOptions<B>> for TimeArg<'a, B> {
    fn from(options: &'a SamplerOptions<B>) -> Self {
        TimeArg::Options(options)
    }
}

/// True iff the resolved sigma lies in `[end_sigma, start_sigma]`, both ends
/// inclusive.
///
/// An options container without a resolvable sigma counts as out of window.
/// The `start_sigma >= end_sigma` convention is the caller's responsibility;
/// a reversed interval is simply empty.
pub fn check_time<'a, B, T>(time_arg: T, start_sigma: f64, end_sigma: f64) -> bool
where
    B: Backend,
    T: Into<TimeArg<'a, B>>,
{
    let sigma = match time_arg.into() {
        TimeArg::Sigma(sigma) => Some(sigma),
        TimeArg::Options(options) => get_sigma(options),
    };

    match sigma {
        Some(sigma) => sigma <= start_sigma && sigma >= end_sigma,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestBackend;

    #[test]
    fn missing_key_is_none() {
        let options = SamplerOptions::<TestBackend>::new();
        assert_eq!(get_sigma(&options), None);
    }

    #[test]
    fn scalar_value_passes_through() {
        let mut options = SamplerOptions::<TestBackend>::new();
        options.insert(SIGMAS_KEY, 3.5);
        assert_eq!(get_sigma(&options), Some(3.5));
    }

    #[test]
    fn tensor_value_resolves_to_max() {
        let device = Default::default();
        let sigmas = Tensor::<TestBackend, 1>::from_floats([1.0, 3.0, 2.0], &device);

        let mut options = SamplerOptions::new();
        options.insert(SIGMAS_KEY, sigmas);
        assert_eq!(get_sigma(&options), Some(3.0));
    }

    #[test]
    fn custom_key_lookup() {
        let mut options = SamplerOptions::<TestBackend>::new();
        options.insert("sub_sigmas", 0.7);
        assert_eq!(get_sigma(&options), None);
        assert_eq!(get_sigma_key(&options, "sub_sigmas"), Some(0.7));
    }

    #[test]
    fn check_time_raw_sigma() {
        assert!(check_time::<TestBackend, _>(2.0, 5.0, 1.0));
        assert!(!check_time::<TestBackend, _>(6.0, 5.0, 1.0));
        assert!(!check_time::<TestBackend, _>(0.5, 5.0, 1.0));
    }

    #[test]
    fn check_time_bounds_inclusive() {
        assert!(check_time::<TestBackend, _>(5.0, 5.0, 1.0));
        assert!(check_time::<TestBackend, _>(1.0, 5.0, 1.0));
    }

    #[test]
    fn check_time_unresolvable_is_out_of_window() {
        let options = SamplerOptions::<TestBackend>::new();
        assert!(!check_time(&options, 5.0, 1.0));
    }

    #[test]
    fn check_time_resolves_options() {
        let mut options = SamplerOptions::<TestBackend>::new();
        options.insert(SIGMAS_KEY, 2.0);
        assert!(check_time(&options, 5.0, 1.0));
        assert!(!check_time(&options, 1.5, 1.0));
    }
}
