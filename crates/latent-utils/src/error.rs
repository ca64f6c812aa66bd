use core::num::ParseIntError;

use thiserror::Error;

/// Errors surfaced by the helpers in this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The time-mode tag is not one of `sigma`, `percent` or `timestep`.
    #[error("invalid time mode")]
    InvalidTimeMode,

    /// A percent bound fell outside `[0, 1]`.
    #[error("invalid value for {bound} percent: {value}")]
    PercentOutOfRange {
        /// Which bound was invalid (`start` or `end`).
        bound: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The scaling method tag is not a known built-in method.
    #[error("invalid scale mode: {0}")]
    InvalidScaleMode(String),

    /// A block spec segment did not parse as an integer.
    #[error("invalid block index: {0}")]
    BlockIndex(#[from] ParseIntError),

    /// Neither candidate neighborhood divides the target pixel count.
    #[error("can't rescale {width} and {height} to fit {target_res}")]
    Rescale {
        /// Original width.
        width: usize,
        /// Original height.
        height: usize,
        /// Requested pixel count.
        target_res: usize,
    },
}

/// Result alias for this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
