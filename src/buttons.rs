//! Button identifiers for the five-colour keypad
//!
//! The keypad is laid out as a diamond plus one extra key:
//!
//! ```text
//!         Blue
//!   Green       Yellow    Black
//!         Red
//! ```
//!
//! Each identifier doubles as the payload of a button event, so the numeric
//! codes are part of the external contract and must not be reordered.

use core::fmt;

/// A keypad button, or `Idle` when nothing is pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonId {
    /// No button pressed (resting voltage or an unrecognised reading)
    Idle = 0,
    Red = 1,
    Green = 2,
    Blue = 3,
    Yellow = 4,
    Black = 5,
}

impl ButtonId {
    /// Every pressable button, in declaration order
    pub const ALL: [ButtonId; 5] = [
        ButtonId::Red,
        ButtonId::Green,
        ButtonId::Blue,
        ButtonId::Yellow,
        ButtonId::Black,
    ];

    /// Event payload encoding of this button
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode an event payload, returning `None` for unknown codes
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ButtonId::Idle),
            1 => Some(ButtonId::Red),
            2 => Some(ButtonId::Green),
            3 => Some(ButtonId::Blue),
            4 => Some(ButtonId::Yellow),
            5 => Some(ButtonId::Black),
            _ => None,
        }
    }

    /// True for every variant except `Idle`
    pub const fn is_pressed(self) -> bool {
        !matches!(self, ButtonId::Idle)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ButtonId::Idle => "idle",
            ButtonId::Red => "red",
            ButtonId::Green => "green",
            ButtonId::Blue => "blue",
            ButtonId::Yellow => "yellow",
            ButtonId::Black => "black",
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
