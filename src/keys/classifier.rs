//! Classification pass: turns pending key edges into player commands.
//!
//! Runs in the main context, independent of the tick rate. Select and Abort
//! distinguish short from long presses; Previous and Next fire on the
//! press and again on every repeat while held.

use heapless::Vec;

use super::{Key, KeyDebouncer};
use crate::command::{emit, Command};

/// Upper bound on commands a single pass can produce: one per rule below.
/// Adding a rule means raising this.
pub const MAX_COMMANDS_PER_PASS: usize = 6;

/// Consume pending edges and return the commands they map to, in emission
/// order. When several fire in one pass the last one is the one that ends
/// up in the command slot.
pub fn classify(keys: &mut KeyDebouncer) -> Vec<Command, MAX_COMMANDS_PER_PASS> {
    let mut out = Vec::new();

    if keys.take_short(Key::Select.mask()) != 0 {
        emit(&mut out, Command::Select);
    }
    if keys.take_short(Key::Abort.mask()) != 0 {
        emit(&mut out, Command::Abort);
    }
    if keys.take_long(Key::Select.mask()) != 0 {
        emit(&mut out, Command::SelectLong);
    }
    if keys.take_long(Key::Abort.mask()) != 0 {
        emit(&mut out, Command::AbortLong);
    }

    // A pending repeat is left for the next pass when the press edge fired.
    if keys.take_press(Key::Previous.mask()) != 0 || keys.take_repeat(Key::Previous.mask()) != 0 {
        emit(&mut out, Command::Previous);
    }
    if keys.take_press(Key::Next.mask()) != 0 || keys.take_repeat(Key::Next.mask()) != 0 {
        emit(&mut out, Command::Next);
    }

    out
}
