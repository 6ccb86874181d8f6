//! Compile-time keypad configuration
//!
//! All tuning lives here as constants: the voltage bands of the resistor
//! ladder, the sampling cadence, the sampling task parameters and the pin
//! assignment of the carrier board. Nothing is reconfigurable at runtime.
//!
//! Readings use a 10-bit scale (0..=1023) regardless of the ADC's native
//! resolution; board implementations rescale before classification.

//=============================================================================
// EVENTS
//=============================================================================

pub mod events {
    /// Event id reserved for keypad button notifications
    ///
    /// The event payload is the pressed button's code (see `ButtonId::code`).
    pub const BUTTON_EVENT_ID: u16 = 0x8100;
}

//=============================================================================
// VOLTAGE BANDS
//=============================================================================

/// Raw-reading bands of the default five-button keypad
pub mod bands {
    use crate::buttons::ButtonId;
    use crate::classifier::{Band, VoltageRange};

    /// Largest reading on the normalised scale
    pub const ADC_MAX: u16 = 1023;

    /// Resting voltage with no button held (roughly mid-rail)
    pub const IDLE: Band = Band::new(480, 510);

    /// Button bands, in classification order
    ///
    /// Order only matters if bands overlap; the defaults are disjoint.
    pub const RANGES: [VoltageRange; 5] = [
        VoltageRange::new(ButtonId::Red, 230, 290),
        VoltageRange::new(ButtonId::Green, 0, 60),
        VoltageRange::new(ButtonId::Blue, 116, 166),
        VoltageRange::new(ButtonId::Yellow, 330, 390),
        VoltageRange::new(ButtonId::Black, 420, 470),
    ];
}

//=============================================================================
// TIMING
//=============================================================================

pub mod timing {
    /// Sampling period of the monitor loop in milliseconds
    ///
    /// **Range**: 5-100ms. Shorter periods waste CPU, longer ones miss quick taps.
    pub const POLL_PERIOD_MS: u64 = 20;
}

//=============================================================================
// SAMPLING TASK
//=============================================================================

pub mod task {
    /// Thread name of the sampling loop (shows up in FreeRTOS task lists)
    pub const NAME: &str = "keypad5";

    /// Stack size of the sampling thread in bytes
    ///
    /// Button handlers run on this thread, so leave room for their frames.
    pub const STACK_SIZE: usize = 8 * 1024;
}

//=============================================================================
// PINS
//=============================================================================

/// Pin assignment of the carrier board
///
/// | Port | GPIO   | ADC1 channel |
/// |------|--------|--------------|
/// | P0   | GPIO1  | 0            |
/// | P1   | GPIO2  | 1            |
/// | P2   | GPIO3  | 2            |
/// | P3   | GPIO4  | 3            |
pub mod pins {
    use crate::board::{PinId, Port};

    /// Pin read before any init call (the pin behind port P0)
    pub const DEFAULT_PIN: PinId = PinId::new(1);

    /// Pin wired to a carrier-board port
    pub const fn port_pin(port: Port) -> PinId {
        match port {
            Port::P0 => PinId::new(1),
            Port::P1 => PinId::new(2),
            Port::P2 => PinId::new(3),
            Port::P3 => PinId::new(4),
        }
    }
}

//=============================================================================
// VALIDATION
//=============================================================================

#[allow(unused)]
mod validation {
    use super::*;
    use crate::classifier::Band;

    const fn band_is_valid(band: &Band) -> bool {
        band.min <= band.max && band.max <= bands::ADC_MAX
    }

    const fn ranges_are_valid() -> bool {
        let mut i = 0;
        while i < bands::RANGES.len() {
            if !band_is_valid(&bands::RANGES[i].band) {
                return false;
            }
            i += 1;
        }
        true
    }

    const fn ranges_are_disjoint() -> bool {
        let mut i = 0;
        while i < bands::RANGES.len() {
            let band = &bands::RANGES[i].band;
            if band.overlaps(&bands::IDLE) {
                return false;
            }
            let mut j = i + 1;
            while j < bands::RANGES.len() {
                if band.overlaps(&bands::RANGES[j].band) {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }

    const _: () = assert!(band_is_valid(&bands::IDLE), "Idle band out of range");
    const _: () = assert!(ranges_are_valid(), "Button band out of range");
    const _: () = assert!(ranges_are_disjoint(), "Default bands overlap");

    const _: () = assert!(timing::POLL_PERIOD_MS >= 5, "Poll period too short (min 5ms)");
    const _: () = assert!(timing::POLL_PERIOD_MS <= 100, "Poll period too long (max 100ms)");
    const _: () = assert!(task::STACK_SIZE >= 4096, "Sampling stack too small");
}
