//! Matrix-key variant: two-counter debounce filter, repeat timer and
//! read-and-clear edge accessors.
//!
//! Up to eight momentary keys are sampled as one bit mask per tick. The
//! filter works on all bits at once with a 2-bit "vertical" counter per
//! key (`ct1:ct0`), so a candidate transition is accepted only after it has
//! been seen on four consecutive ticks and any tick without it resets the
//! counter.
//!
//! Press and repeat edges accumulate in `key_press` / `key_rpt` until the
//! classification pass consumes them; see [`classify`].

mod classifier;


pub use classifier::{classify, MAX_COMMANDS_PER_PASS};

use crate::config::{KeyTiming, KEY_ABORT_BIT, KEY_NEXT_BIT, KEY_PREV_BIT, KEY_SELECT_BIT};

/// The four semantic keys of the pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Select,
    Abort,
    Previous,
    Next,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Select, Key::Abort, Key::Previous, Key::Next];

    /// Bit of this key inside a raw / debounced mask.
    pub const fn mask(self) -> u8 {
        match self {
            Key::Select => 1 << KEY_SELECT_BIT,
            Key::Abort => 1 << KEY_ABORT_BIT,
            Key::Previous => 1 << KEY_PREV_BIT,
            Key::Next => 1 << KEY_NEXT_BIT,
        }
    }
}

/// Keys that take part in auto-repeat. Select / Abort need it for the
/// long-press distinction, Previous / Next for continuous stepping.
pub const REPEAT_MASK: u8 =
    Key::Select.mask() | Key::Abort.mask() | Key::Previous.mask() | Key::Next.mask();

/// Debounced key state plus pending press / repeat edges.
#[derive(Clone, Debug)]
pub struct KeyDebouncer {
    /// Debounced level, one bit per key (1 = pressed).
    key_state: u8,
    /// Released→pressed edges not yet consumed.
    key_press: u8,
    /// Repeat edges not yet consumed.
    key_rpt: u8,
    ct0: u8,
    ct1: u8,
    /// Repeat countdown in ticks.
    rpt: u8,
    timing: KeyTiming,
}

impl KeyDebouncer {
    pub const fn new(timing: KeyTiming) -> Self {
        Self {
            key_state: 0,
            key_press: 0,
            key_rpt: 0,
            // Idle counter value: a key held at power-on still needs the
            // full run of consistent samples.
            ct0: 0xFF,
            ct1: 0xFF,
            rpt: timing.repeat_start_ticks,
            timing,
        }
    }

    /// Feed one raw sample (1 = pressed, polarity already applied).
    ///
    /// Must be called once per tick; the debounce window and repeat
    /// timings are counted in calls.
    pub fn sample(&mut self, raw: u8) {
        // Bits that differ from the accepted state.
        let mut changed = self.key_state ^ raw;

        self.ct0 = !(self.ct0 & changed);
        self.ct1 = self.ct0 ^ (self.ct1 & changed);
        // Counter rolled over: the change has been stable long enough.
        changed &= self.ct0 & self.ct1;

        self.key_state ^= changed;
        self.key_press |= self.key_state & changed;

        self.update_repeat();
    }

    fn update_repeat(&mut self) {
        let held = self.key_state & REPEAT_MASK;
        if held == 0 {
            self.rpt = self.timing.repeat_start_ticks.max(1);
            return;
        }

        self.rpt = self.rpt.saturating_sub(1);
        if self.rpt == 0 {
            self.rpt = self.timing.repeat_next_ticks.max(1);
            self.key_rpt |= held;
        }
    }

    /// Read and clear pending press edges in `mask`.
    pub fn take_press(&mut self, mask: u8) -> u8 {
        let hit = mask & self.key_press;
        self.key_press ^= hit;
        hit
    }

    /// Read and clear pending repeat edges in `mask`.
    pub fn take_repeat(&mut self, mask: u8) -> u8 {
        let hit = mask & self.key_rpt;
        self.key_rpt ^= hit;
        hit
    }

    /// Press edges of keys in `mask` that are no longer held: a press that
    /// was released before its first repeat fired.
    pub fn take_short(&mut self, mask: u8) -> u8 {
        self.take_press(!self.key_state & mask)
    }

    /// Press edges of keys in `mask` whose first repeat has fired. Later
    /// repeats of the same hold return nothing because the press edge has
    /// already been consumed.
    pub fn take_long(&mut self, mask: u8) -> u8 {
        let repeated = self.take_repeat(mask);
        self.take_press(repeated)
    }

    /// Debounced key levels.
    pub fn state(&self) -> u8 {
        self.key_state
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.key_state & key.mask() != 0
    }

    /// Change the steady repeat interval. Takes effect at the next reload
    /// of the countdown.
    pub fn set_repeat_interval(&mut self, ticks: u8) {
        self.timing.repeat_next_ticks = ticks.max(1);
    }
}

impl Default for KeyDebouncer {
    fn default() -> Self {
        Self::new(KeyTiming::default())
    }
}
