//! Rotary-encoder variant: quadrature direction decode and the push-button
//! short / long state machine.
//!
//! Direction is decided on every edge of the CLK line by comparing DT with
//! the new CLK level. No position is accumulated; each edge emits one
//! `Next` or `Previous` directly.
//!
//! The integrated button has no repeat: a click emits `Select` on release,
//! a hold past the long threshold emits `Abort` while still held.

use heapless::Vec;

use crate::command::{emit, Command};
use crate::config::EncoderTiming;

/// One sample of the three encoder lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderLines {
    /// Primary quadrature line (A / CLK), raw level.
    pub clk: bool,
    /// Secondary quadrature line (B / DT), raw level.
    pub dt: bool,
    /// Push-button, `true` = pressed (polarity already applied).
    pub button: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Released,
    Pressed {
        /// Timestamp of the press edge (ms).
        since_ms: u32,
    },
}

#[derive(Clone, Debug)]
pub struct EncoderDecoder {
    prev_clk: bool,
    prev_button: bool,
    button: ButtonState,
    timing: EncoderTiming,
}

impl EncoderDecoder {
    pub const fn new(timing: EncoderTiming) -> Self {
        Self {
            prev_clk: false,
            prev_button: false,
            button: ButtonState::Released,
            timing,
        }
    }

    /// Seed the previous levels from a first read so the power-on level of
    /// CLK is not mistaken for an edge and a button held at boot does not
    /// count as a press.
    pub const fn with_initial(lines: EncoderLines, timing: EncoderTiming) -> Self {
        Self {
            prev_clk: lines.clk,
            prev_button: lines.button,
            button: ButtonState::Released,
            timing,
        }
    }

    /// Process one tick. Returns the commands emitted this tick, rotation
    /// first; the button command (if any) is the one left in the slot.
    /// At most one rotation and one button command per tick.
    pub fn sample(&mut self, lines: EncoderLines, now_ms: u32) -> Vec<Command, 2> {
        let mut out = Vec::new();
        if let Some(cmd) = self.decode_rotation(lines.clk, lines.dt) {
            emit(&mut out, cmd);
        }
        if let Some(cmd) = self.update_button(lines.button, now_ms) {
            emit(&mut out, cmd);
        }
        out
    }

    fn decode_rotation(&mut self, clk: bool, dt: bool) -> Option<Command> {
        // Any CLK edge counts; the full 2-bit sequence is not validated.
        let cmd = if clk != self.prev_clk {
            if dt == clk {
                Some(Command::Previous)
            } else {
                Some(Command::Next)
            }
        } else {
            None
        };
        self.prev_clk = clk;
        cmd
    }

    fn update_button(&mut self, active: bool, now_ms: u32) -> Option<Command> {
        let press_edge = active && !self.prev_button;
        self.prev_button = active;

        match self.button {
            ButtonState::Released => {
                if press_edge {
                    self.button = ButtonState::Pressed { since_ms: now_ms };
                }
                None
            }
            ButtonState::Pressed { since_ms } => {
                let held_ms = now_ms.wrapping_sub(since_ms);
                if active {
                    if held_ms >= self.timing.long_press_ms {
                        self.button = ButtonState::Released;
                        return Some(Command::Abort);
                    }
                    None
                } else {
                    self.button = ButtonState::Released;
                    // Shorter releases are contact bounce.
                    (held_ms >= self.timing.min_hold_ms).then_some(Command::Select)
                }
            }
        }
    }

    pub fn button_state(&self) -> ButtonState {
        self.button
    }

    pub fn timing(&self) -> EncoderTiming {
        self.timing
    }
}

impl Default for EncoderDecoder {
    fn default() -> Self {
        Self::new(EncoderTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(clk: bool, dt: bool, button: bool) -> EncoderLines {
        EncoderLines { clk, dt, button }
    }

    /// Drive the button alone for `ms` at 10 ms ticks starting at `start`.
    fn hold_button(dec: &mut EncoderDecoder, active: bool, start: u32, ms: u32) -> Vec<Command, 8> {
        let mut out = Vec::new();
        let mut t = start;
        while t < start + ms {
            for cmd in dec.sample(lines(false, false, active), t) {
                out.push(cmd).unwrap();
            }
            t += 10;
        }
        out
    }

    // ════════════════════════════════════════════════════════════════════════
    // Quadrature Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn rising_edge_direction() {
        let mut dec = EncoderDecoder::default();
        assert_eq!(&dec.sample(lines(true, true, false), 0)[..], &[Command::Previous]);

        let mut dec = EncoderDecoder::default();
        assert_eq!(&dec.sample(lines(true, false, false), 0)[..], &[Command::Next]);
    }

    #[test]
    fn falling_edge_direction() {
        let start = lines(true, false, false);

        let mut dec = EncoderDecoder::with_initial(start, EncoderTiming::default());
        assert_eq!(&dec.sample(lines(false, false, false), 0)[..], &[Command::Previous]);

        let mut dec = EncoderDecoder::with_initial(start, EncoderTiming::default());
        assert_eq!(&dec.sample(lines(false, true, false), 0)[..], &[Command::Next]);
    }

    #[test]
    fn dt_changes_alone_emit_nothing() {
        let mut dec = EncoderDecoder::default();
        assert!(dec.sample(lines(false, true, false), 0).is_empty());
        assert!(dec.sample(lines(false, false, false), 10).is_empty());
        assert!(dec.sample(lines(false, true, false), 20).is_empty());
    }

    #[test]
    fn opposite_edges_in_sequence() {
        let mut dec = EncoderDecoder::default();
        assert_eq!(&dec.sample(lines(true, false, false), 0)[..], &[Command::Next]);
        assert_eq!(&dec.sample(lines(false, false, false), 10)[..], &[Command::Previous]);
        assert!(dec.sample(lines(false, false, false), 20).is_empty());
    }

    #[test]
    fn initial_level_is_not_an_edge() {
        let mut dec = EncoderDecoder::with_initial(lines(true, true, false), EncoderTiming::default());
        assert!(dec.sample(lines(true, true, false), 0).is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Button State Machine Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn click_emits_select_on_release() {
        let mut dec = EncoderDecoder::default();
        let mut out = hold_button(&mut dec, true, 0, 150);
        assert!(out.is_empty());
        assert!(matches!(dec.button_state(), ButtonState::Pressed { since_ms: 0 }));

        out.extend(hold_button(&mut dec, false, 150, 100));
        assert_eq!(&out[..], &[Command::Select]);
        assert_eq!(dec.button_state(), ButtonState::Released);
    }

    #[test]
    fn long_hold_emits_abort_while_held_and_nothing_on_release() {
        let mut dec = EncoderDecoder::default();
        let mut out = hold_button(&mut dec, true, 0, 250);
        assert!(out.is_empty());

        // 260 ms is the first tick past the 256 ms threshold.
        out.extend(hold_button(&mut dec, true, 250, 1000));
        assert_eq!(&out[..], &[Command::Abort]);

        out.extend(hold_button(&mut dec, false, 1250, 100));
        assert_eq!(&out[..], &[Command::Abort]);
    }

    #[test]
    fn bounce_shorter_than_min_hold_is_ignored() {
        let mut dec = EncoderDecoder::default();
        let mut out = hold_button(&mut dec, true, 0, 30);
        out.extend(hold_button(&mut dec, false, 30, 500));
        assert!(out.is_empty());
        assert_eq!(dec.button_state(), ButtonState::Released);
    }

    #[test]
    fn release_exactly_at_min_hold_counts() {
        let mut dec = EncoderDecoder::new(EncoderTiming::new(60, 250).unwrap());
        assert!(dec.sample(lines(false, false, true), 1000).is_empty());
        assert_eq!(&dec.sample(lines(false, false, false), 1060)[..], &[Command::Select]);
    }

    #[test]
    fn hold_exactly_at_long_press_is_abort() {
        let mut dec = EncoderDecoder::new(EncoderTiming::default());
        assert!(dec.sample(lines(false, false, true), 0).is_empty());
        assert!(dec.sample(lines(false, false, true), 255).is_empty());
        assert_eq!(&dec.sample(lines(false, false, true), 256)[..], &[Command::Abort]);
        assert_eq!(dec.button_state(), ButtonState::Released);
        assert!(dec.sample(lines(false, false, false), 300).is_empty());
    }

    #[test]
    fn held_at_boot_is_not_a_press() {
        let mut dec = EncoderDecoder::with_initial(lines(false, false, true), EncoderTiming::default());
        let mut out = hold_button(&mut dec, true, 0, 1000);
        out.extend(hold_button(&mut dec, false, 1000, 100));
        assert!(out.is_empty());
    }

    #[test]
    fn elapsed_time_survives_clock_wrap() {
        let mut dec = EncoderDecoder::default();
        let start = u32::MAX - 20;
        assert!(dec.sample(lines(false, false, true), start).is_empty());
        let later = start.wrapping_add(100);
        assert_eq!(&dec.sample(lines(false, false, false), later)[..], &[Command::Select]);
    }

    #[test]
    fn rotation_and_button_in_one_tick() {
        let mut dec = EncoderDecoder::default();
        assert!(dec.sample(lines(false, false, true), 0).is_empty());
        let out = dec.sample(lines(true, false, false), 100);
        assert_eq!(&out[..], &[Command::Next, Command::Select]);
    }
}
