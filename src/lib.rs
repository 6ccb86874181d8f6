//! keypad5 - five-button resistor-ladder keypad monitor
//!
//! A single analog pin is wired to a keypad whose buttons each pull the line
//! to a distinct voltage. The monitor samples the pin in the background and
//! raises a button event on every fresh press:
//!
//! 1. Read a sample through the [`Board`](board::Board)
//! 2. Classify it against the idle band and the button bands
//! 3. Notify handlers when the classification changes to a pressed button
//!
//! Hardware access sits behind the `Board` trait, so everything except
//! `board::esp` builds and runs on the host.

pub mod board;
pub mod buttons;
pub mod classifier;
pub mod config;
pub mod events;
pub mod monitor;
pub mod sim;

pub use board::{Board, PinId, Port};
pub use buttons::ButtonId;
pub use classifier::{classify, Band, VoltageRange};
pub use events::EventBus;
pub use monitor::KeypadMonitor;
