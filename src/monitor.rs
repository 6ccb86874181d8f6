//! Keypad monitor: sampling loop and press notifications
//!
//! One background thread samples the keypad pin every
//! [`POLL_PERIOD_MS`](crate::config::timing::POLL_PERIOD_MS), classifies the
//! reading and raises a button event whenever the classification changes to
//! a pressed button. Holding a button fires once; releasing fires nothing.
//! There is no debouncing beyond the periodic re-sampling.
//!
//! The monitor is a cheap handle around shared state. Clones refer to the
//! same pin, the same event registry and the same sampling thread.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::board::{Board, PinId, Port};
use crate::buttons::ButtonId;
use crate::classifier::classify;
use crate::config::{events::BUTTON_EVENT_ID, pins, task, timing};
use crate::events::EventBus;

struct Shared<B> {
    board: Mutex<B>,
    input_pin: AtomicU8,
    last_button: AtomicU8,
    started: AtomicBool,
    events: EventBus,
}

/// Five-button analog keypad monitor
pub struct KeypadMonitor<B: Board> {
    shared: Arc<Shared<B>>,
}

impl<B: Board> Clone for KeypadMonitor<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: Board> KeypadMonitor<B> {
    /// Create an idle monitor reading from [`pins::DEFAULT_PIN`]
    ///
    /// Nothing is sampled until the first handler is registered or
    /// [`start`](Self::start) is called.
    pub fn new(board: B) -> Self {
        Self {
            shared: Arc::new(Shared {
                board: Mutex::new(board),
                input_pin: AtomicU8::new(pins::DEFAULT_PIN.gpio()),
                last_button: AtomicU8::new(ButtonId::Idle.code()),
                started: AtomicBool::new(false),
                events: EventBus::new(),
            }),
        }
    }

    fn board(&self) -> MutexGuard<'_, B> {
        self.shared
            .board
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Use the keypad plugged into a carrier-board port
    pub fn init_simple(&self, port: Port) -> anyhow::Result<()> {
        let pin = self.board().resolve_pin(port)?;
        self.init_advanced(pin)
    }

    /// Use the keypad wired to `pin`
    ///
    /// May be called again later; the sampling loop picks up the new pin on
    /// its next tick. If the pin cannot be enabled the current pin is kept.
    pub fn init_advanced(&self, pin: PinId) -> anyhow::Result<()> {
        self.board().enable_analog_input(pin)?;
        self.shared.input_pin.store(pin.gpio(), Ordering::SeqCst);
        info!("Keypad input on {}", pin);
        Ok(())
    }

    /// Call `handler` every time `button` is freshly pressed
    ///
    /// Starts the sampling loop if it is not running yet. Handlers for the
    /// same button run in registration order on the sampling thread.
    pub fn on_button_pressed<F>(&self, button: ButtonId, handler: F) -> anyhow::Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.start()?;
        self.shared
            .events
            .on_event(BUTTON_EVENT_ID, button.code().into(), handler)
    }

    /// Launch the sampling thread
    ///
    /// Only the first call launches anything and returns `true`; later calls
    /// return `false`. If the thread cannot be spawned the monitor stays
    /// stopped and the error is returned.
    pub fn start(&self) -> anyhow::Result<bool> {
        if self
            .shared
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(false);
        }

        let monitor = self.clone();
        let spawned = thread::Builder::new()
            .name(task::NAME.into())
            .stack_size(task::STACK_SIZE)
            .spawn(move || monitor.run());

        if let Err(e) = spawned {
            self.shared.started.store(false, Ordering::SeqCst);
            return Err(e.into());
        }

        info!(
            "Keypad sampling started on {} every {}ms",
            self.input_pin(),
            timing::POLL_PERIOD_MS
        );
        Ok(true)
    }

    fn run(self) {
        let period = Duration::from_millis(timing::POLL_PERIOD_MS);
        loop {
            self.poll();
            thread::sleep(period);
        }
    }

    /// Run one sampling tick
    ///
    /// Returns the button notified on this tick, if any. A failed read skips
    /// the tick entirely and leaves the last observed button untouched.
    pub fn poll(&self) -> Option<ButtonId> {
        let pin = self.input_pin();
        let reading = self.board().read_analog(pin);
        let sample = match reading {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Keypad read on {} failed: {:#}", pin, e);
                return None;
            }
        };

        let current = classify(sample);
        let fresh = current.is_pressed() && current != self.last_button();

        if fresh {
            debug!("Keypad {} pressed (sample {})", current, sample);
            self.shared
                .events
                .raise_event(BUTTON_EVENT_ID, current.code().into());
        }

        self.shared
            .last_button
            .store(current.code(), Ordering::SeqCst);

        fresh.then_some(current)
    }

    /// Pin sampled on the next tick
    pub fn input_pin(&self) -> PinId {
        PinId::new(self.shared.input_pin.load(Ordering::SeqCst))
    }

    /// Classification of the most recent successful tick
    pub fn last_button(&self) -> ButtonId {
        ButtonId::from_code(self.shared.last_button.load(Ordering::SeqCst))
            .unwrap_or(ButtonId::Idle)
    }

    pub fn is_started(&self) -> bool {
        self.shared.started.load(Ordering::SeqCst)
    }

    /// Event registry the monitor raises button events on
    pub fn events(&self) -> &EventBus {
        &self.shared.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedBoard;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    const IDLE: u16 = 500;
    const RED: u16 = 250;
    const GREEN: u16 = 30;

    fn monitor_with(samples: &[u16]) -> (KeypadMonitor<ScriptedBoard>, ScriptedBoard) {
        let board = ScriptedBoard::new(samples.iter().copied());
        (KeypadMonitor::new(board.clone()), board)
    }

    fn poll_all(monitor: &KeypadMonitor<ScriptedBoard>, ticks: usize) -> Vec<Option<ButtonId>> {
        (0..ticks).map(|_| monitor.poll()).collect()
    }

    fn wait_for(timeout: Duration, condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    #[test]
    fn test_fresh_press_sequence() {
        let (monitor, _) = monitor_with(&[IDLE, RED, RED, IDLE, RED]);

        assert_eq!(
            poll_all(&monitor, 5),
            vec![None, Some(ButtonId::Red), None, None, Some(ButtonId::Red)]
        );
    }

    #[test]
    fn test_raises_events_with_button_payload() {
        let (monitor, _) = monitor_with(&[IDLE, RED, RED, IDLE, RED]);
        let presses = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&presses);
        monitor
            .events()
            .on_event(BUTTON_EVENT_ID, ButtonId::Red.code().into(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        poll_all(&monitor, 5);
        assert_eq!(presses.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_release_is_silent_and_band_changes_fire() {
        let (monitor, _) = monitor_with(&[RED, GREEN, RED, IDLE, IDLE]);

        assert_eq!(
            poll_all(&monitor, 5),
            vec![
                Some(ButtonId::Red),
                Some(ButtonId::Green),
                Some(ButtonId::Red),
                None,
                None
            ]
        );
        assert_eq!(monitor.last_button(), ButtonId::Idle);
    }

    #[test]
    fn test_unmatched_reading_counts_as_release() {
        let (monitor, _) = monitor_with(&[RED, 800, RED]);

        assert_eq!(
            poll_all(&monitor, 3),
            vec![Some(ButtonId::Red), None, Some(ButtonId::Red)]
        );
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let (monitor, _) = monitor_with(&[IDLE, RED]);
        let calls = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let calls = Arc::clone(&calls);
            monitor
                .events()
                .on_event(BUTTON_EVENT_ID, ButtonId::Red.code().into(), move || {
                    calls.lock().unwrap().push(name)
                })
                .unwrap();
        }

        poll_all(&monitor, 2);
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_reinit_switches_pin() {
        let (monitor, board) = monitor_with(&[]);
        let pin_a = PinId::new(2);
        let pin_b = PinId::new(3);

        monitor.init_advanced(pin_a).unwrap();
        monitor.poll();
        monitor.init_advanced(pin_b).unwrap();
        monitor.poll();

        assert_eq!(board.enabled_pins(), vec![pin_a, pin_b]);
        assert_eq!(board.read_pins(), vec![pin_a, pin_b]);
        assert_eq!(monitor.input_pin(), pin_b);
    }

    #[test]
    fn test_init_simple_resolves_port() {
        let (monitor, board) = monitor_with(&[]);

        assert_eq!(monitor.input_pin(), pins::DEFAULT_PIN);
        monitor.init_simple(Port::P2).unwrap();

        assert_eq!(monitor.input_pin(), pins::port_pin(Port::P2));
        assert_eq!(board.enabled_pins(), vec![pins::port_pin(Port::P2)]);
    }

    #[test]
    fn test_failed_enable_keeps_pin() {
        let (monitor, board) = monitor_with(&[]);
        let bad = PinId::new(40);
        board.reject_pin(bad);

        assert!(monitor.init_advanced(bad).is_err());
        assert_eq!(monitor.input_pin(), pins::DEFAULT_PIN);
    }

    #[test]
    fn test_failed_read_skips_tick() {
        let (monitor, board) = monitor_with(&[RED, RED]);

        assert_eq!(monitor.poll(), Some(ButtonId::Red));
        board.fail_reads(1);
        assert_eq!(monitor.poll(), None);
        assert_eq!(monitor.last_button(), ButtonId::Red);
        // still held, so no second notification
        assert_eq!(monitor.poll(), None);
    }

    #[test]
    fn test_start_is_idempotent() {
        let (monitor, _) = monitor_with(&[]);

        assert!(!monitor.is_started());
        assert!(monitor.start().unwrap());
        assert!(!monitor.start().unwrap());
        assert!(!monitor.clone().start().unwrap());
        assert!(monitor.is_started());
    }

    #[test]
    fn test_held_button_notifies_once_from_background() {
        // leave a few idle ticks so the handler is in place before the press
        let mut samples = vec![IDLE; 10];
        samples.push(RED);
        let (monitor, _) = monitor_with(&samples);
        let presses = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&presses);
        monitor
            .on_button_pressed(ButtonId::Red, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert!(!monitor.start().unwrap());

        assert!(wait_for(Duration::from_secs(2), || {
            presses.load(Ordering::SeqCst) == 1
        }));

        thread::sleep(Duration::from_millis(timing::POLL_PERIOD_MS * 5));
        assert_eq!(presses.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.last_button(), ButtonId::Red);
    }
}
