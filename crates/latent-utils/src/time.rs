use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest timestep index of the training-time noise schedule.
const MAX_TIMESTEP: f64 = 999.0;

/// Time domain of a `(start, end)` window handed to the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeMode {
    /// The native noise-level scale, decreasing over the sampling trajectory.
    Sigma,
    /// Fraction of sampling progress in `[0, 1]`.
    Percent,
    /// Discrete index in `[0, 999]` from the training-time schedule.
    Timestep,
}

impl FromStr for TimeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sigma" => Ok(TimeMode::Sigma),
            "percent" => Ok(TimeMode::Percent),
            "timestep" => Ok(TimeMode::Timestep),
            _ => Err(Error::InvalidTimeMode),
        }
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            TimeMode::Sigma => "sigma",
            TimeMode::Percent => "percent",
            TimeMode::Timestep => "timestep",
        };
        f.write_str(tag)
    }
}

/// Noise schedule capability consumed by [`convert_time`].
pub trait SigmaSchedule {
    /// Sigma at `percent` of sampling progress.
    fn percent_to_sigma(&self, percent: f64) -> f64;
}

fn round4(value: f64) -> f64 {
    (value * 1e4).round() / 1e4
}

/// Converts a `(start, end)` window from `mode` into native sigmas.
///
/// Sigma inputs pass through unchanged. Timestep inputs map through
/// `1 - t / 999` onto the percent scale; percent inputs must lie in `[0, 1]`
/// inclusive. Converted values are rounded to 4 decimal places.
///
/// Ordering of `start_time` and `end_time` is not validated; a reversed pair
/// yields an empty window downstream.
pub fn convert_time<S: SigmaSchedule + ?Sized>(
    schedule: &S,
    mode: TimeMode,
    start_time: f64,
    end_time: f64,
) -> Result<(f64, f64)> {
    let (start, end) = match mode {
        TimeMode::Sigma => return Ok((start_time, end_time)),
        TimeMode::Timestep => (
            1.0 - start_time / MAX_TIMESTEP,
            1.0 - end_time / MAX_TIMESTEP,
        ),
        TimeMode::Percent => {
            if !(0.0..=1.0).contains(&start_time) {
                return Err(Error::PercentOutOfRange {
                    bound: "start",
                    value: start_time,
                });
            }
            if !(0.0..=1.0).contains(&end_time) {
                return Err(Error::PercentOutOfRange {
                    bound: "end",
                    value: end_time,
                });
            }
            (start_time, end_time)
        }
    };

    Ok((
        round4(schedule.percent_to_sigma(start)),
        round4(schedule.percent_to_sigma(end)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LinearSchedule {
        sigma_max: f64,
    }

    impl SigmaSchedule for LinearSchedule {
        fn percent_to_sigma(&self, percent: f64) -> f64 {
            self.sigma_max * (1.0 - percent)
        }
    }

    const SCHEDULE: LinearSchedule = LinearSchedule { sigma_max: 14.6146 };

    #[test]
    fn sigma_mode_passes_through() {
        let window = convert_time(&SCHEDULE, TimeMode::Sigma, 7.25, 0.1).unwrap();
        assert_eq!(window, (7.25, 0.1));
    }

    #[test]
    fn percent_out_of_range_names_bound() {
        let err = convert_time(&SCHEDULE, TimeMode::Percent, 1.5, 0.5).unwrap_err();
        assert!(matches!(
            err,
            Error::PercentOutOfRange { bound: "start", .. }
        ));

        let err = convert_time(&SCHEDULE, TimeMode::Percent, 0.5, -0.1).unwrap_err();
        assert!(matches!(err, Error::PercentOutOfRange { bound: "end", .. }));
    }

    #[test]
    fn timestep_matches_percent() {
        let from_timesteps = convert_time(&SCHEDULE, TimeMode::Timestep, 999.0, 0.0).unwrap();
        let from_percents = convert_time(&SCHEDULE, TimeMode::Percent, 0.0, 1.0).unwrap();
        assert_eq!(from_timesteps, from_percents);
    }

    #[test]
    fn converted_values_round_to_4_decimals() {
        let schedule = LinearSchedule {
            sigma_max: 1.0 / 3.0,
        };
        let (start, end) = convert_time(&schedule, TimeMode::Percent, 0.0, 1.0).unwrap();
        assert_eq!(start, 0.3333);
        assert_eq!(end, 0.0);
    }

    #[test]
    fn unknown_tag_is_invalid() {
        let err = "sideways".parse::<TimeMode>().unwrap_err();
        assert_eq!(err.to_string(), "invalid time mode");
        assert_eq!("timestep".parse::<TimeMode>().unwrap(), TimeMode::Timestep);
    }
}
