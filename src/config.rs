//! Application-wide constants and compile-time configuration.
//!
//! All key bit assignments, timing parameters and polarity choices live
//! here so they can be tuned in one place.

use crate::error::Error;
use crate::pins::KeyPolarity;

// Sampling

/// Period of the sampling tick (ms). All tick-based timings below assume
/// the tick driver fires at exactly this rate.
pub const TICK_MS: u32 = 10;

// Keypad

/// Bit position of each key inside the raw / debounced key masks.
pub const KEY_SELECT_BIT: u8 = 0;
pub const KEY_ABORT_BIT: u8 = 1;
pub const KEY_PREV_BIT: u8 = 2;
pub const KEY_NEXT_BIT: u8 = 3;

/// Hold time before the first auto-repeat (ms). Also the long-press
/// threshold for Select / Abort.
pub const KEY_REPEAT_START_MS: u32 = 500;

/// Steady auto-repeat interval once repeating (ms).
pub const KEY_REPEAT_NEXT_MS: u32 = 200;

/// Electrical polarity of the key inputs.
///
/// HW v2 boards use internal pull-ups, so a pressed key reads low.
#[cfg(not(feature = "active-high-keys"))]
pub const KEY_POLARITY: KeyPolarity = KeyPolarity::ActiveLow;
#[cfg(feature = "active-high-keys")]
pub const KEY_POLARITY: KeyPolarity = KeyPolarity::ActiveHigh;

// Rotary encoder

/// Releases shorter than this are treated as contact noise (ms).
pub const ENCODER_MIN_HOLD_MS: u32 = 64;

/// Holding the encoder button this long fires Abort while still held (ms).
pub const ENCODER_LONG_PRESS_MS: u32 = 256;

// GPIO pin assignments (nRF52840-DK defaults)
//
// Logical names only; the concrete `embassy_nrf::peripherals::*` pins are
// picked in `main.rs`. Adjust for your board.
//
//   Key SELECT     → P0.11
//   Key ABORT      → P0.12
//   Key PREVIOUS   → P0.24
//   Key NEXT       → P0.25
//   Encoder CLK    → P0.03
//   Encoder DT     → P0.04
//   Encoder SW     → P0.28

/// Key repeat timing, expressed in sampling ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyTiming {
    /// Ticks a repeatable key must be held before the first repeat edge.
    pub repeat_start_ticks: u8,
    /// Ticks between subsequent repeat edges.
    pub repeat_next_ticks: u8,
}

impl KeyTiming {
    /// Convert millisecond timings into ticks, clamped to `1..=255`.
    pub const fn from_millis(start_ms: u32, next_ms: u32, tick_ms: u32) -> Self {
        Self {
            repeat_start_ticks: ms_to_ticks(start_ms, tick_ms),
            repeat_next_ticks: ms_to_ticks(next_ms, tick_ms),
        }
    }
}

impl Default for KeyTiming {
    fn default() -> Self {
        Self::from_millis(KEY_REPEAT_START_MS, KEY_REPEAT_NEXT_MS, TICK_MS)
    }
}

/// Round a duration down to whole ticks; never zero, never above `u8::MAX`.
pub const fn ms_to_ticks(ms: u32, tick_ms: u32) -> u8 {
    if tick_ms == 0 {
        return 1;
    }
    let ticks = ms / tick_ms;
    if ticks == 0 {
        1
    } else if ticks > u8::MAX as u32 {
        u8::MAX
    } else {
        ticks as u8
    }
}

/// Encoder push-button timing (ms).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderTiming {
    /// Minimum hold for a release to count as a Select.
    pub min_hold_ms: u32,
    /// Hold time that fires Abort while the button is still down.
    pub long_press_ms: u32,
}

impl EncoderTiming {
    /// Validated constructor: the long-press threshold must exceed the
    /// minimum hold, otherwise no short press could ever be observed.
    pub fn new(min_hold_ms: u32, long_press_ms: u32) -> Result<Self, Error> {
        if long_press_ms <= min_hold_ms {
            return Err(Error::InvalidTiming);
        }
        Ok(Self {
            min_hold_ms,
            long_press_ms,
        })
    }
}

impl Default for EncoderTiming {
    fn default() -> Self {
        Self {
            min_hold_ms: ENCODER_MIN_HOLD_MS,
            long_press_ms: ENCODER_LONG_PRESS_MS,
        }
    }
}
