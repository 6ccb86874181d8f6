//! keypad5 firmware
//!
//! On the device, samples the keypad plugged into port P0 and reports every
//! press over the log and as one JSON line on stdout. On the host, the same
//! monitor runs against a scripted board replaying a short demo.

use keypad5::{Board, ButtonId, KeypadMonitor};
use log::info;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_svc::log::EspLogger;
    use keypad5::board::esp::EspBoard;
    use keypad5::Port;

    // Initialize ESP-IDF
    esp_idf_sys::link_patches();
    EspLogger::initialize_default();

    info!("keypad5 v{} starting", env!("CARGO_PKG_VERSION"));

    let monitor = KeypadMonitor::new(EspBoard::new()?);
    monitor.init_simple(Port::P0)?;
    register_handlers(&monitor)?;

    info!("Waiting for keypad presses");

    // Sampling and dispatch happen on the keypad thread
    loop {
        FreeRtos::delay_ms(1000);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use keypad5::config::{pins, timing};
    use keypad5::sim::ScriptedBoard;
    use std::time::Duration;

    /// Idle, red held, idle, green, straight to blue, release
    const DEMO: [u16; 12] = [500, 500, 250, 250, 250, 495, 30, 30, 140, 140, 500, 500];

    info!("keypad5 v{} starting (simulated)", env!("CARGO_PKG_VERSION"));

    let monitor = KeypadMonitor::new(ScriptedBoard::new(DEMO));
    monitor.init_advanced(pins::DEFAULT_PIN)?;
    register_handlers(&monitor)?;

    let ticks = DEMO.len() as u64 + 5;
    std::thread::sleep(Duration::from_millis(timing::POLL_PERIOD_MS * ticks));
    Ok(())
}

/// Report every colour the same way
fn register_handlers<B: Board>(monitor: &KeypadMonitor<B>) -> anyhow::Result<()> {
    for button in ButtonId::ALL {
        monitor.on_button_pressed(button, move || report_press(button))?;
    }
    Ok(())
}

fn report_press(button: ButtonId) {
    info!("Button pressed: {}", button);

    // Machine-readable output (JSON-ish for easy parsing)
    println!(
        "{{\"button\":\"{}\",\"code\":{}}}",
        button,
        button.code()
    );
}
