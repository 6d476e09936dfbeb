//! Input boundary: raw pin reads for both variants.
//!
//! The core logic only ever sees a key mask or an [`EncoderLines`] sample
//! with polarity already applied. The adapters here do that translation
//! over `embedded-hal` 1.0 [`InputPin`]s, so any HAL (or a mock) can feed
//! the engine.
//!
//! Pin direction / pull-up setup is left to the HAL at construction time.

use embedded_hal::digital::InputPin;

use crate::encoder::EncoderLines;
use crate::error::Error;
use crate::keys::Key;

/// Electrical level that means "pressed".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyPolarity {
    /// Pressed reads high (external pull-down).
    ActiveHigh,
    /// Pressed reads low (internal pull-up).
    ActiveLow,
}

impl KeyPolarity {
    pub const fn is_pressed(self, level_high: bool) -> bool {
        match self {
            KeyPolarity::ActiveHigh => level_high,
            KeyPolarity::ActiveLow => !level_high,
        }
    }

    /// Translate a whole port read into a pressed mask. Callers mask off
    /// bits that are not keys.
    pub const fn apply_mask(self, levels: u8) -> u8 {
        match self {
            KeyPolarity::ActiveHigh => levels,
            KeyPolarity::ActiveLow => !levels,
        }
    }
}

/// Source of raw key samples (1 = pressed).
pub trait KeyInputs {
    fn read_raw_keys(&mut self) -> Result<u8, Error>;
}

/// Source of encoder line samples.
pub trait EncoderInputs {
    fn read_lines(&mut self) -> Result<EncoderLines, Error>;
}

fn read_level<P: InputPin>(pin: &mut P) -> Result<bool, Error> {
    pin.is_high().map_err(|_| Error::PinRead)
}

/// Four key pins mapped onto the Select / Abort / Previous / Next bits.
pub struct KeyPins<S, A, P, N> {
    select: S,
    abort: A,
    previous: P,
    next: N,
    polarity: KeyPolarity,
}

impl<S, A, P, N> KeyPins<S, A, P, N>
where
    S: InputPin,
    A: InputPin,
    P: InputPin,
    N: InputPin,
{
    pub fn new(select: S, abort: A, previous: P, next: N, polarity: KeyPolarity) -> Self {
        Self {
            select,
            abort,
            previous,
            next,
            polarity,
        }
    }

    /// Give the pins back.
    pub fn release(self) -> (S, A, P, N) {
        (self.select, self.abort, self.previous, self.next)
    }
}

impl<S, A, P, N> KeyInputs for KeyPins<S, A, P, N>
where
    S: InputPin,
    A: InputPin,
    P: InputPin,
    N: InputPin,
{
    fn read_raw_keys(&mut self) -> Result<u8, Error> {
        let levels = [
            (Key::Select, read_level(&mut self.select)?),
            (Key::Abort, read_level(&mut self.abort)?),
            (Key::Previous, read_level(&mut self.previous)?),
            (Key::Next, read_level(&mut self.next)?),
        ];

        let mut mask = 0;
        for (key, high) in levels {
            if self.polarity.is_pressed(high) {
                mask |= key.mask();
            }
        }
        Ok(mask)
    }
}

/// Quadrature lines plus the integrated push-button.
///
/// CLK and DT are passed through as raw levels; only the button goes
/// through `button_polarity`.
pub struct EncoderPins<C, D, B> {
    clk: C,
    dt: D,
    button: B,
    button_polarity: KeyPolarity,
}

impl<C, D, B> EncoderPins<C, D, B>
where
    C: InputPin,
    D: InputPin,
    B: InputPin,
{
    pub fn new(clk: C, dt: D, button: B, button_polarity: KeyPolarity) -> Self {
        Self {
            clk,
            dt,
            button,
            button_polarity,
        }
    }

    pub fn release(self) -> (C, D, B) {
        (self.clk, self.dt, self.button)
    }
}

impl<C, D, B> EncoderInputs for EncoderPins<C, D, B>
where
    C: InputPin,
    D: InputPin,
    B: InputPin,
{
    fn read_lines(&mut self) -> Result<EncoderLines, Error> {
        let clk = read_level(&mut self.clk)?;
        let dt = read_level(&mut self.dt)?;
        let button = self.button_polarity.is_pressed(read_level(&mut self.button)?);
        Ok(EncoderLines { clk, dt, button })
    }
}
