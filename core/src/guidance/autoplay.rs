use crate::guidance::sequencer::{Advance, GuidanceFrame, GuidanceSequencer};
use crate::sync::lock;
use log::debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Time spent on each step before moving on.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(3000);

/// Background task advancing a shared sequencer every dwell.
///
/// Every step gets a full dwell: a manual step taken through [`Autoplay::step`]
/// re-arms the schedule. The task ends once the walk becomes inactive, whether
/// it arrived or was stopped; dropping the handle cancels it.
pub struct Autoplay {
    sequencer: Arc<Mutex<GuidanceSequencer>>,
    rearm: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl Autoplay {
    /// Starts the walk and schedules the first advance one dwell from now.
    ///
    /// `on_step` receives a frame after every scheduled change, including the final one.
    pub fn start<F>(sequencer: Arc<Mutex<GuidanceSequencer>>, dwell: Duration, mut on_step: F) -> Self
    where
        F: FnMut(GuidanceFrame) + Send + 'static,
    {
        lock(&sequencer).start();
        let rearm = Arc::new(Notify::new());
        let shared = sequencer.clone();
        let signal = rearm.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = signal.notified() => {
                        if !lock(&shared).is_active() {
                            break;
                        }
                        continue;
                    }
                    _ = tokio::time::sleep(dwell) => {}
                }
                let (advance, frame) = {
                    let mut guard = lock(&shared);
                    let advance = guard.advance();
                    (advance, guard.render())
                };
                match advance {
                    Advance::Moved(index) => {
                        debug!("guidance moved to step {index}");
                        on_step(frame);
                    }
                    Advance::Arrived => {
                        debug!("guidance arrived");
                        on_step(frame);
                        break;
                    }
                    Advance::Idle => break,
                }
            }
        });
        Self {
            sequencer,
            rearm,
            handle: Some(handle),
        }
    }

    /// Advances by hand and restarts the dwell for the new step.
    pub fn step(&self) -> Advance {
        let advance = lock(&self.sequencer).advance();
        self.rearm.notify_one();
        advance
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        self.cancel();
    }
}
