//! ESP32-S3 board backed by the ADC1 oneshot driver
//!
//! Samples come from ADC1 at 12-bit width with 11 dB attenuation (roughly
//! 0-3.1V full scale) and are rescaled to the 10-bit range the band table
//! uses. Only GPIO1..=GPIO10 are routed to ADC1 on the S3; ADC2 is avoided
//! because it is shared with the radio.

use esp_idf_sys::{self as sys, esp};
use log::debug;

use super::{Board, PinId};
use crate::config::bands::ADC_MAX;

/// `ADC_WIDTH_BIT_12`
const ADC_WIDTH_BIT_12: sys::adc_bits_width_t = 3;
/// `ADC_ATTEN_DB_11`
const ADC_ATTEN_DB_11: sys::adc_atten_t = 3;
/// Full-scale raw reading at 12-bit width
const RAW_MAX: u32 = 4095;

/// First and last GPIO routed to ADC1
const ADC1_FIRST_GPIO: u8 = 1;
const ADC1_LAST_GPIO: u8 = 10;

/// Keypad board on the ESP32-S3 ADC1 peripheral
pub struct EspBoard {
    _private: (),
}

impl EspBoard {
    /// Configure ADC1 sample width
    pub fn new() -> anyhow::Result<Self> {
        esp!(unsafe { sys::adc1_config_width(ADC_WIDTH_BIT_12) })?;
        Ok(Self { _private: () })
    }
}

/// ADC1 channel behind `pin`, if it has one
fn adc1_channel(pin: PinId) -> Option<sys::adc1_channel_t> {
    match pin.gpio() {
        gpio @ ADC1_FIRST_GPIO..=ADC1_LAST_GPIO => {
            Some((gpio - ADC1_FIRST_GPIO) as sys::adc1_channel_t)
        }
        _ => None,
    }
}

fn channel_for(pin: PinId) -> anyhow::Result<sys::adc1_channel_t> {
    match adc1_channel(pin) {
        Some(channel) => Ok(channel),
        None => anyhow::bail!("{} is not an ADC1 input", pin),
    }
}

impl Board for EspBoard {
    fn enable_analog_input(&mut self, pin: PinId) -> anyhow::Result<()> {
        let channel = channel_for(pin)?;
        esp!(unsafe { sys::adc1_config_channel_atten(channel, ADC_ATTEN_DB_11) })?;
        debug!("{} enabled as ADC1 channel {}", pin, channel);
        Ok(())
    }

    fn read_analog(&mut self, pin: PinId) -> anyhow::Result<u16> {
        let channel = channel_for(pin)?;
        let raw = unsafe { sys::adc1_get_raw(channel) };
        if raw < 0 {
            anyhow::bail!("ADC1 read on {} failed", pin);
        }

        Ok((raw as u32 * ADC_MAX as u32 / RAW_MAX) as u16)
    }
}
