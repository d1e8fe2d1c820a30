//! Timed playback of a movie on a background thread.
//!
//! The player shows frame 0 straight away, then waits one delay before each
//! following frame. There is no wait after the last frame. A stop request
//! interrupts the current wait and abandons the rest of the movie; the movie
//! itself is never modified.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::models::Model;

/// Default delay of the slow speed, in milliseconds
pub const DEFAULT_SLOW_MS: u64 = 500;

/// Default delay of the medium speed, in milliseconds
pub const DEFAULT_MEDIUM_MS: u64 = 200;

/// Default delay of the fast speed, in milliseconds
pub const DEFAULT_FAST_MS: u64 = 100;

/// Delays behind the three named speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedPresets {
    pub slow: Duration,
    pub medium: Duration,
    pub fast: Duration,
}

impl Default for SpeedPresets {
    fn default() -> Self {
        Self {
            slow: Duration::from_millis(DEFAULT_SLOW_MS),
            medium: Duration::from_millis(DEFAULT_MEDIUM_MS),
            fast: Duration::from_millis(DEFAULT_FAST_MS),
        }
    }
}

/// How long to wait between frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
    Custom(Duration),
}

impl PlaybackSpeed {
    pub fn delay(self, presets: &SpeedPresets) -> Duration {
        match self {
            PlaybackSpeed::Slow => presets.slow,
            PlaybackSpeed::Medium => presets.medium,
            PlaybackSpeed::Fast => presets.fast,
            PlaybackSpeed::Custom(delay) => delay,
        }
    }

    /// Next named speed, for a single "change speed" key.
    /// Custom speeds cycle back to slow.
    pub fn cycle(self) -> Self {
        match self {
            PlaybackSpeed::Slow => PlaybackSpeed::Medium,
            PlaybackSpeed::Medium => PlaybackSpeed::Fast,
            PlaybackSpeed::Fast | PlaybackSpeed::Custom(_) => PlaybackSpeed::Slow,
        }
    }

    pub fn label(self) -> String {
        match self {
            PlaybackSpeed::Slow => "slow".to_string(),
            PlaybackSpeed::Medium => "medium".to_string(),
            PlaybackSpeed::Fast => "fast".to_string(),
            PlaybackSpeed::Custom(delay) => format!("{}ms", delay.as_millis()),
        }
    }
}

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Every frame was shown
    Completed,
    /// A stop request cut the run short
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// This frame index is now the one on screen
    Frame(usize),
    /// Sent exactly once, after the last `Frame` event
    Finished(PlaybackOutcome),
}

/// Handle to a running playback thread.
///
/// Dropping the handle asks the thread to stop without waiting for it.
pub struct Player {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<PlaybackOutcome>>,
}

impl Player {
    /// Start playing `model` with `delay` between frames.
    ///
    /// Frame changes arrive on the returned receiver.
    pub fn start(model: Arc<Model>, delay: Duration) -> (Self, Receiver<PlaybackEvent>) {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let (event_tx, event_rx) = crossbeam_channel::unbounded();

        log::debug!(
            "Starting playback of {} frames, {}ms apart",
            model.total_frames(),
            delay.as_millis()
        );
        let handle = thread::spawn(move || {
            let outcome = run(&model, delay, &stop_rx, &event_tx);
            let _ = event_tx.send(PlaybackEvent::Finished(outcome));
            log::debug!("Playback finished: {outcome:?}");
            outcome
        });

        (
            Self {
                stop_tx,
                handle: Some(handle),
            },
            event_rx,
        )
    }

    /// True once the playback thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|handle| handle.is_finished())
    }

    /// Stop playback and wait for the thread to exit
    pub fn stop(mut self) -> PlaybackOutcome {
        let _ = self.stop_tx.try_send(());
        self.join_thread()
    }

    /// Wait for playback to run to its end
    pub fn wait(mut self) -> PlaybackOutcome {
        self.join_thread()
    }

    fn join_thread(&mut self) -> PlaybackOutcome {
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or(PlaybackOutcome::Stopped),
            None => PlaybackOutcome::Stopped,
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.stop_tx.try_send(());
        }
    }
}

fn run(
    model: &Model,
    delay: Duration,
    stop_rx: &Receiver<()>,
    events: &Sender<PlaybackEvent>,
) -> PlaybackOutcome {
    let total_frames = model.total_frames();
    if total_frames == 0 {
        return PlaybackOutcome::Completed;
    }

    if events.send(PlaybackEvent::Frame(0)).is_err() {
        return PlaybackOutcome::Stopped;
    }

    for index in 1..total_frames {
        match stop_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return PlaybackOutcome::Stopped,
        }
        // Nobody is listening any more
        if events.send(PlaybackEvent::Frame(index)).is_err() {
            return PlaybackOutcome::Stopped;
        }
    }

    PlaybackOutcome::Completed
}
