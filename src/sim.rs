//! Scripted board for host runs and tests
//!
//! Replays a fixed sequence of samples, one per read, then keeps returning
//! the last sample as if the button were held. Clones share the same script,
//! so a test can keep a handle after moving the board into a monitor.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::board::{Board, PinId};
use crate::config::bands;

/// Reading returned before any scripted sample has been consumed
const RESTING_SAMPLE: u16 = (bands::IDLE.min + bands::IDLE.max) / 2;

#[derive(Debug)]
struct Script {
    samples: VecDeque<u16>,
    held: u16,
    enabled: Vec<PinId>,
    reads: Vec<PinId>,
    rejected: Vec<PinId>,
    failing_reads: usize,
}

/// Host-side [`Board`] fed from a sample script
#[derive(Debug, Clone)]
pub struct ScriptedBoard {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBoard {
    pub fn new(samples: impl IntoIterator<Item = u16>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                samples: samples.into_iter().collect(),
                held: RESTING_SAMPLE,
                enabled: Vec::new(),
                reads: Vec::new(),
                rejected: Vec::new(),
                failing_reads: 0,
            })),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append samples to the end of the script
    pub fn push_samples(&self, samples: impl IntoIterator<Item = u16>) {
        self.script().samples.extend(samples);
    }

    /// Make `enable_analog_input` fail for `pin`
    pub fn reject_pin(&self, pin: PinId) {
        self.script().rejected.push(pin);
    }

    /// Make the next `count` reads fail without consuming samples
    pub fn fail_reads(&self, count: usize) {
        self.script().failing_reads += count;
    }

    /// Pins enabled so far, in call order
    pub fn enabled_pins(&self) -> Vec<PinId> {
        self.script().enabled.clone()
    }

    /// Pins read so far, in call order
    pub fn read_pins(&self) -> Vec<PinId> {
        self.script().reads.clone()
    }
}

impl Board for ScriptedBoard {
    fn enable_analog_input(&mut self, pin: PinId) -> anyhow::Result<()> {
        let mut script = self.script();
        if script.rejected.contains(&pin) {
            anyhow::bail!("{} cannot be used as an analog input", pin);
        }
        script.enabled.push(pin);
        Ok(())
    }

    fn read_analog(&mut self, pin: PinId) -> anyhow::Result<u16> {
        let mut script = self.script();
        script.reads.push(pin);

        if script.failing_reads > 0 {
            script.failing_reads -= 1;
            anyhow::bail!("Simulated read failure on {}", pin);
        }

        if let Some(sample) = script.samples.pop_front() {
            script.held = sample;
        }
        Ok(script.held)
    }
}
