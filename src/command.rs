//! Player commands and the single-slot channel that carries them.
//!
//! The input engine never queues: every new event overwrites whatever the
//! consumer has not read yet. The device has at most one outstanding user
//! action at a time, so losing an unread command is acceptable.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use heapless::Vec;

/// Discrete command handed to the player / menu state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Nothing pending.
    #[default]
    Idle = 0,
    /// Step forward (Next key, clockwise rotation).
    Next = 1,
    /// Step back (Previous key, counter-clockwise rotation).
    Previous = 2,
    /// Short press on Select, or encoder button click.
    Select = 3,
    /// Select held past the repeat threshold.
    SelectLong = 4,
    /// Short press on Abort, or encoder button long hold.
    Abort = 5,
    /// Abort held past the repeat threshold.
    AbortLong = 6,
}

impl Command {
    /// Decode a raw command code. Unknown codes decode as `Idle` so a
    /// corrupted value can never be mistaken for a user action.
    pub const fn from_raw(code: u8) -> Self {
        match code {
            1 => Command::Next,
            2 => Command::Previous,
            3 => Command::Select,
            4 => Command::SelectLong,
            5 => Command::Abort,
            6 => Command::AbortLong,
            _ => Command::Idle,
        }
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn is_idle(self) -> bool {
        matches!(self, Command::Idle)
    }

    /// Short stable name for logs and displays.
    pub const fn name(self) -> &'static str {
        match self {
            Command::Idle => "idle",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Select => "select",
            Command::SelectLong => "select-long",
            Command::Abort => "abort",
            Command::AbortLong => "abort-long",
        }
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<u8> for Command {
    fn from(code: u8) -> Self {
        Command::from_raw(code)
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd.as_raw()
    }
}

/// Append `cmd` to a per-pass result buffer. Callers size `N` to the number
/// of rules that can fire in one pass.
pub(crate) fn emit<const N: usize>(out: &mut Vec<Command, N>, cmd: Command) {
    let pushed = out.push(cmd);
    debug_assert!(pushed.is_ok(), "per-pass command buffer overflow");
}

/// Last-command cell shared between the sampling context and the consumer.
///
/// Every access runs inside a critical section, so the slot may live in a
/// `static` and be written from an interrupt-priority task.
pub struct CommandSlot {
    cell: Mutex<CriticalSectionRawMutex, Cell<Command>>,
    notify: Signal<CriticalSectionRawMutex, ()>,
}

impl CommandSlot {
    pub const fn new() -> Self {
        Self {
            cell: Mutex::new(Cell::new(Command::Idle)),
            notify: Signal::new(),
        }
    }

    /// Store `cmd`, discarding any unread command. Publishing `Idle` does
    /// nothing; use [`CommandSlot::clear`] to drop a pending command.
    pub fn publish(&self, cmd: Command) {
        if cmd.is_idle() {
            return;
        }
        self.cell.lock(|c| c.set(cmd));
        self.notify.signal(());
    }

    /// Read the pending command and reset the slot to `Idle`.
    pub fn take(&self) -> Command {
        self.cell.lock(|c| c.replace(Command::Idle))
    }

    /// Read the pending command without consuming it.
    pub fn peek(&self) -> Command {
        self.cell.lock(|c| c.get())
    }

    pub fn clear(&self) {
        self.cell.lock(|c| c.set(Command::Idle));
        self.notify.reset();
    }

    /// Wait until a command is pending, then take it.
    pub async fn wait(&self) -> Command {
        loop {
            let cmd = self.take();
            if !cmd.is_idle() {
                return cmd;
            }
            self.notify.wait().await;
        }
    }
}

impl Default for CommandSlot {
    fn default() -> Self {
        Self::new()
    }
}
