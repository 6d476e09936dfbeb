//! Unified error type for deck-input.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.
//!
//! The debounce and decode paths themselves are total; errors only come
//! from the pin boundary and from rejected timing configuration.

/// Top-level error type used across the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A GPIO read through `embedded-hal` failed.
    PinRead,

    /// Encoder timing where the long-press threshold does not exceed the
    /// minimum hold.
    InvalidTiming,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::PinRead => f.write_str("pin read failed"),
            Error::InvalidTiming => f.write_str("long-press threshold must exceed minimum hold"),
        }
    }
}
