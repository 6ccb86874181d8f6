//! Board services consumed by the keypad monitor
//!
//! The monitor never touches hardware directly. It resolves ports, enables
//! analog inputs and reads samples through a [`Board`], so the same monitor
//! runs against the ESP32 ADC on the device and against a scripted board on
//! the host.

use core::fmt;

use crate::config::pins;

#[cfg(target_os = "espidf")]
pub mod esp;

/// A GPIO pin, identified by its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId(u8);

impl PinId {
    pub const fn new(gpio: u8) -> Self {
        Self(gpio)
    }

    pub const fn gpio(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Connector on the carrier board a keypad can be plugged into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    P0,
    P1,
    P2,
    P3,
}

/// Hardware services needed to sample the keypad
pub trait Board: Send + 'static {
    /// Resolve a carrier-board port to the pin wired behind it
    fn resolve_pin(&self, port: Port) -> anyhow::Result<PinId> {
        Ok(pins::port_pin(port))
    }

    /// Prepare `pin` for analog reads
    fn enable_analog_input(&mut self, pin: PinId) -> anyhow::Result<()>;

    /// Read one sample from `pin`, scaled to `0..=config::bands::ADC_MAX`
    fn read_analog(&mut self, pin: PinId) -> anyhow::Result<u16>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullBoard;

    impl Board for NullBoard {
        fn enable_analog_input(&mut self, _pin: PinId) -> anyhow::Result<()> {
            Ok(())
        }

        fn read_analog(&mut self, _pin: PinId) -> anyhow::Result<u16> {
            Ok(0)
        }
    }

    #[test]
    fn test_default_port_resolution() {
        let board = NullBoard;
        assert_eq!(board.resolve_pin(Port::P0).unwrap(), pins::DEFAULT_PIN);
        assert_eq!(board.resolve_pin(Port::P3).unwrap(), PinId::new(4));
    }

    #[test]
    fn test_pin_display() {
        assert_eq!(PinId::new(7).to_string(), "GPIO7");
    }
}
