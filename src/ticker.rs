use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default tick interval in milliseconds (countdown resolution)
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Cancelable tick subscription
///
/// A background thread sends the current instant every `interval` until the
/// ticker is cancelled or dropped.
pub struct Ticker {
    ticks: Receiver<Instant>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(interval: Duration) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if tick_tx.send(Instant::now()).is_err() {
                        break;
                    }
                }
                // Explicit stop or the ticker was dropped
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        Self {
            ticks: tick_rx,
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Block until the next tick. `None` once the ticker is cancelled.
    pub fn recv(&self) -> Option<Instant> {
        if self.is_cancelled() {
            return None;
        }
        self.ticks.recv().ok()
    }

    /// Next pending tick, if one already arrived
    pub fn try_recv(&self) -> Option<Instant> {
        self.ticks.try_recv().ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.is_none()
    }

    /// Stop the background thread; no ticks are sent afterwards
    pub fn cancel(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        // Discard ticks that raced with the stop
        while self.try_recv().is_some() {}
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let duration = tick_duration();
        assert_eq!(duration, Duration::from_secs(1));
    }

    #[test]
    fn test_ticker_delivers_ticks() {
        let ticker = Ticker::start(Duration::from_millis(10));
        let first = ticker.recv().unwrap();
        let second = ticker.recv().unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut ticker = Ticker::start(Duration::from_millis(10));
        ticker.recv().unwrap();

        ticker.cancel();
        assert!(ticker.is_cancelled());
        assert!(ticker.recv().is_none());
        thread::sleep(Duration::from_millis(30));
        assert!(ticker.try_recv().is_none());
    }

    #[test]
    fn test_cancel_is_prompt() {
        let started = Instant::now();
        let mut ticker = Ticker::start(Duration::from_secs(60));
        ticker.cancel();
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
