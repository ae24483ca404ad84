// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Shortest period a poller accepts; shorter ones are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    Visible,
    Hidden,
    Stopped,
}

/// A refresh job re-run on a fixed period until stopped.
///
/// The job runs once right away. While hidden, ticks are skipped. Turning
/// visible again refreshes immediately and restarts the period.
pub struct Poller {
    name: &'static str,
    state: watch::Sender<PollState>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn start<F, Fut>(name: &'static str, period: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if period < MIN_PERIOD {
            warn!(poller = name, ?period, "period too short, using {:?}", MIN_PERIOD);
        }
        let period = period.max(MIN_PERIOD);
        let (state, mut rx) = watch::channel(PollState::Visible);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let visible = *rx.borrow() == PollState::Visible;
                        if visible {
                            job().await;
                        } else {
                            debug!(poller = name, "hidden, skipping tick");
                        }
                    }
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let current = *rx.borrow_and_update();
                        match current {
                            PollState::Stopped => break,
                            PollState::Visible => {
                                job().await;
                                ticker.reset();
                            }
                            PollState::Hidden => {}
                        }
                    }
                }
            }
            debug!(poller = name, "stopped");
        });

        info!(poller = name, period_secs = period.as_secs(), "polling started");
        Self {
            name,
            state,
            handle: Some(handle),
        }
    }

    pub fn set_visible(&self, visible: bool) {
        let next = if visible {
            PollState::Visible
        } else {
            PollState::Hidden
        };
        self.state.send_if_modified(|current| {
            if *current == next || *current == PollState::Stopped {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    /// Stop polling and wait for an in-flight job to finish.
    pub async fn stop(mut self) {
        self.state.send_replace(PollState::Stopped);
        if let Some(handle) = self.handle.take() {
            handle.await.ok();
        }
        info!(poller = self.name, "polling stopped");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
