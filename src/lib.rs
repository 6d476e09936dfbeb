//! Human-input front end for a playback-control device.
//!
//! Turns noisy digital-pin readings from either a 4-key pad or a rotary
//! encoder with push-button into debounced player commands (`Next`,
//! `Previous`, `Select`, `SelectLong`, `Abort`, `AbortLong`), delivered
//! through a single overwrite-on-write [`CommandSlot`].
//!
//! Everything in here is `no_std` and hardware-independent, so the whole
//! engine runs under `cargo test` on the host. The firmware binary
//! (`main.rs`, `embedded` feature) only wires pins, timers and executors
//! around it.
//!
//! ```text
//! raw pins ─► on_tick (debounce / decode) ─► edges ─► interpret ─► CommandSlot ─► player
//! ```

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod config;
pub mod encoder;
pub mod error;
pub mod keys;
pub mod pins;
pub mod source;

pub use command::{Command, CommandSlot};
pub use config::{EncoderTiming, KeyTiming};
pub use encoder::{ButtonState, EncoderDecoder, EncoderLines};
pub use error::Error;
pub use keys::{classify, Key, KeyDebouncer};
pub use pins::{EncoderInputs, EncoderPins, KeyInputs, KeyPins, KeyPolarity};
pub use source::{EncoderSource, InputSource, KeypadSource};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::config::*;
    use super::*;

    // ════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn default_key_timing_in_ticks() {
        let timing = KeyTiming::default();
        assert_eq!(timing.repeat_start_ticks, 50);
        assert_eq!(timing.repeat_next_ticks, 20);
    }

    #[test]
    fn ms_to_ticks_clamps() {
        assert_eq!(ms_to_ticks(0, 10), 1);
        assert_eq!(ms_to_ticks(5, 10), 1);
        assert_eq!(ms_to_ticks(95, 10), 9);
        assert_eq!(ms_to_ticks(10_000, 10), u8::MAX);
        assert_eq!(ms_to_ticks(100, 0), 1);
    }

    #[test]
    fn encoder_timing_rejects_inverted_thresholds() {
        assert_eq!(EncoderTiming::new(64, 64), Err(Error::InvalidTiming));
        assert_eq!(EncoderTiming::new(300, 256), Err(Error::InvalidTiming));
        let timing = EncoderTiming::new(64, 256).unwrap();
        assert_eq!(timing, EncoderTiming::default());
    }

    #[test]
    fn key_bits_are_distinct() {
        let mut seen = 0u8;
        for key in Key::ALL {
            assert_eq!(seen & key.mask(), 0);
            seen |= key.mask();
        }
        assert_eq!(seen, keys::REPEAT_MASK);
    }

    #[test]
    fn error_messages() {
        assert_eq!(Error::PinRead.to_string(), "pin read failed");
        assert!(Error::InvalidTiming.to_string().contains("long-press"));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Input Source Tests
    // ════════════════════════════════════════════════════════════════════════

    struct FailingKeys;

    impl KeyInputs for FailingKeys {
        fn read_raw_keys(&mut self) -> Result<u8, Error> {
            Err(Error::PinRead)
        }
    }

    #[test]
    fn keypad_tick_reports_pin_failure_without_touching_state() {
        let source = KeypadSource::new(FailingKeys, KeyTiming::default());
        assert_eq!(source.on_tick(0), Err(Error::PinRead));
        assert_eq!(source.held_keys(), 0);
        assert_eq!(source.take_command(), Command::Idle);
    }

    #[test]
    fn keypad_sample_raw_drives_commands() {
        let source = KeypadSource::new(FailingKeys, KeyTiming::default());
        for _ in 0..4 {
            source.sample_raw(Key::Next.mask());
        }
        assert_eq!(source.held_keys(), Key::Next.mask());
        source.interpret();
        assert_eq!(source.peek_command(), Command::Next);
        assert_eq!(source.take_command(), Command::Next);
        assert_eq!(source.take_command(), Command::Idle);
    }
}
