//! The input engine: one object per build that owns the debounce / decode
//! state and the command slot.
//!
//! Exactly one variant is used in a given firmware image. Both implement
//! [`InputSource`], so the sampling driver and the main loop are written
//! once against the trait.
//!
//! State shared between the sampling context (`on_tick`, interrupt
//! priority) and the main context (`interpret`, `take_command`) sits behind
//! a critical-section mutex. Every method takes `&self`, so a single
//! `'static` instance can be handed to both contexts.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::command::{Command, CommandSlot};
use crate::config::{EncoderTiming, KeyTiming};
use crate::encoder::{EncoderDecoder, EncoderLines};
use crate::error::Error;
use crate::keys::{classify, KeyDebouncer};
use crate::pins::{EncoderInputs, KeyInputs};

/// Common capability of both input variants.
pub trait InputSource {
    /// Sample the inputs once. Must be called at a fixed period
    /// ([`crate::config::TICK_MS`]) without gaps or duplicates.
    fn on_tick(&self, now_ms: u32) -> Result<(), Error>;

    /// Turn pending edges into commands. Runs in the main loop.
    fn interpret(&self);

    fn slot(&self) -> &CommandSlot;

    /// Read the pending command and reset the slot to `Idle`.
    fn take_command(&self) -> Command {
        self.slot().take()
    }

    /// Read the pending command without consuming it.
    fn peek_command(&self) -> Command {
        self.slot().peek()
    }
}

fn publish_all<const N: usize>(slot: &CommandSlot, cmds: Vec<Command, N>) {
    for cmd in cmds {
        #[cfg(feature = "defmt")]
        defmt::debug!("input: {}", cmd);
        slot.publish(cmd);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Matrix-key variant
// ═══════════════════════════════════════════════════════════════════════════

struct Keypad<I> {
    inputs: I,
    keys: KeyDebouncer,
}

/// Four-key pad with debounce, auto-repeat and short / long discrimination.
pub struct KeypadSource<I> {
    state: Mutex<CriticalSectionRawMutex, RefCell<Keypad<I>>>,
    slot: CommandSlot,
}

impl<I: KeyInputs> KeypadSource<I> {
    pub const fn new(inputs: I, timing: KeyTiming) -> Self {
        Self {
            state: Mutex::new(RefCell::new(Keypad {
                inputs,
                keys: KeyDebouncer::new(timing),
            })),
            slot: CommandSlot::new(),
        }
    }

    /// Feed a raw mask (1 = pressed) directly, for drivers that read the
    /// key port themselves. Same timing contract as `on_tick`.
    pub fn sample_raw(&self, raw: u8) {
        self.state.lock(|cell| cell.borrow_mut().keys.sample(raw));
    }

    /// Debounced key levels.
    pub fn held_keys(&self) -> u8 {
        self.state.lock(|cell| cell.borrow().keys.state())
    }

    /// Change the steady auto-repeat interval (ticks).
    pub fn set_repeat_interval(&self, ticks: u8) {
        self.state
            .lock(|cell| cell.borrow_mut().keys.set_repeat_interval(ticks));
        #[cfg(feature = "defmt")]
        defmt::debug!("keypad: repeat interval {} ticks", ticks);
    }
}

impl<I: KeyInputs> InputSource for KeypadSource<I> {
    fn on_tick(&self, _now_ms: u32) -> Result<(), Error> {
        self.state.lock(|cell| {
            let pad = &mut *cell.borrow_mut();
            let raw = pad.inputs.read_raw_keys()?;
            pad.keys.sample(raw);
            Ok(())
        })
    }

    fn interpret(&self) {
        let cmds = self.state.lock(|cell| classify(&mut cell.borrow_mut().keys));
        publish_all(&self.slot, cmds);
    }

    fn slot(&self) -> &CommandSlot {
        &self.slot
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Rotary-encoder variant
// ═══════════════════════════════════════════════════════════════════════════

struct Encoder<I> {
    inputs: I,
    decoder: EncoderDecoder,
}

/// Rotary encoder with integrated push-button. Commands are emitted from
/// the tick itself; `interpret` has nothing to do.
pub struct EncoderSource<I> {
    state: Mutex<CriticalSectionRawMutex, RefCell<Encoder<I>>>,
    slot: CommandSlot,
}

impl<I: EncoderInputs> EncoderSource<I> {
    pub const fn new(inputs: I, timing: EncoderTiming) -> Self {
        Self {
            state: Mutex::new(RefCell::new(Encoder {
                inputs,
                decoder: EncoderDecoder::new(timing),
            })),
            slot: CommandSlot::new(),
        }
    }

    /// Re-seed the decoder from the current line levels. Call once after
    /// the pins are configured so the resting level is not read as a turn.
    pub fn resync(&self) -> Result<(), Error> {
        self.state.lock(|cell| {
            let enc = &mut *cell.borrow_mut();
            let lines = enc.inputs.read_lines()?;
            enc.decoder = EncoderDecoder::with_initial(lines, enc.decoder.timing());
            Ok(())
        })
    }

    /// Feed one sample directly. Same timing contract as `on_tick`.
    pub fn sample_lines(&self, lines: EncoderLines, now_ms: u32) {
        let cmds = self
            .state
            .lock(|cell| cell.borrow_mut().decoder.sample(lines, now_ms));
        publish_all(&self.slot, cmds);
    }
}

impl<I: EncoderInputs> InputSource for EncoderSource<I> {
    fn on_tick(&self, now_ms: u32) -> Result<(), Error> {
        let cmds = self.state.lock(|cell| {
            let enc = &mut *cell.borrow_mut();
            let lines = enc.inputs.read_lines()?;
            Ok::<_, Error>(enc.decoder.sample(lines, now_ms))
        })?;
        publish_all(&self.slot, cmds);
        Ok(())
    }

    fn interpret(&self) {}

    fn slot(&self) -> &CommandSlot {
        &self.slot
    }
}
