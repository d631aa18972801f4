//! Redraw coalescing and timer primitives for the UI loop.
//!
//! - `RedrawScheduler`: a pending flag that folds any number of redraw
//!   requests within one frame into a single redraw.
//! - `Debouncer`: trailing-edge delay, restarted by every trigger.
//! - `Ticker`: periodic event, replaced wholesale on restart.
//!
//! Timers run as tokio tasks and report back over an mpsc channel; the UI loop
//! drains the channel, so all state changes still happen on the UI task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Coalesces redraw requests into at most one pending frame.
#[derive(Debug)]
pub struct RedrawScheduler {
    pending: bool,
    frames: u64,
}

impl Default for RedrawScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RedrawScheduler {
    /// A new scheduler starts with a frame pending so the first pass draws.
    pub fn new() -> Self {
        Self {
            pending: true,
            frames: 0,
        }
    }

    /// Request a redraw. Returns `true` if this call queued a new frame and
    /// `false` if one was already pending.
    pub fn schedule(&mut self) -> bool {
        if self.pending {
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Called by the loop right before drawing. Clears the flag first, so a
    /// request made while the frame is being drawn queues another frame.
    pub fn begin_frame(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            self.frames += 1;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of frames started so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// A spawned timer task. Dropping or cancelling the handle aborts the task.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    fn spawn<F>(future: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }

    pub fn cancel(self) {
        // Drop aborts.
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Trailing-edge debouncer: the event is delivered `delay` after the last
/// trigger. Every trigger cancels the pending delivery and restarts the delay.
#[derive(Debug)]
pub struct Debouncer<E> {
    delay: Duration,
    tx: mpsc::Sender<E>,
    pending: Option<TimerHandle>,
}

impl<E: Send + 'static> Debouncer<E> {
    pub fn new(delay: Duration, tx: mpsc::Sender<E>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    pub fn trigger(&mut self, event: E) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(TimerHandle::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(event).await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Periodic timer delivering a clone of `event` every `period`.
#[derive(Debug)]
pub struct Ticker<E> {
    period: Duration,
    event: E,
    tx: mpsc::Sender<E>,
    running: Option<TimerHandle>,
}

impl<E: Clone + Send + 'static> Ticker<E> {
    pub fn new(period: Duration, event: E, tx: mpsc::Sender<E>) -> Self {
        Self {
            period,
            event,
            tx,
            running: None,
        }
    }

    /// Start ticking, cancelling any previous timer first. The first event
    /// arrives one period after the call.
    pub fn start(&mut self) {
        self.stop();
        let tx = self.tx.clone();
        let event = self.event.clone();
        let period = self.period.max(Duration::from_millis(1));
        debug!(?period, "Starting ticker");
        self.running = Some(TimerHandle::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(event.clone()).await.is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.running.take() {
            handle.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|h| !h.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_requests_in_one_frame_draw_once() {
        let mut redraw = RedrawScheduler::new();
        assert!(redraw.begin_frame());
        assert!(!redraw.begin_frame());

        assert!(redraw.schedule());
        assert!(!redraw.schedule());
        assert!(redraw.begin_frame());
        assert!(!redraw.begin_frame());
        assert_eq!(redraw.frames(), 2);
    }

    #[test]
    fn test_request_during_frame_queues_another() {
        let mut redraw = RedrawScheduler::new();
        assert!(redraw.begin_frame());
        // A mutation made while drawing
        assert!(redraw.schedule());
        assert!(redraw.is_pending());
        assert!(redraw.begin_frame());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_delivers_last_event_once() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut debouncer = Debouncer::new(Duration::from_millis(300), tx);

        debouncer.trigger("d");
        time::advance(Duration::from_millis(200)).await;
        debouncer.trigger("da");
        time::advance(Duration::from_millis(200)).await;
        debouncer.trigger("dan");
        assert!(debouncer.is_pending());

        assert_eq!(rx.recv().await, Some("dan"));
        let nothing = time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_cancel() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut debouncer = Debouncer::new(Duration::from_millis(100), tx);
        debouncer.trigger(1);
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        let nothing = time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_restart_and_stop() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut ticker = Ticker::new(Duration::from_secs(1), "tick", tx);

        ticker.start();
        assert_eq!(rx.recv().await, Some("tick"));
        assert_eq!(rx.recv().await, Some("tick"));

        ticker.start();
        assert!(ticker.is_running());
        assert_eq!(rx.recv().await, Some("tick"));

        ticker.stop();
        assert!(!ticker.is_running());
        let nothing = time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(nothing.is_err());
    }
}
