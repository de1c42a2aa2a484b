//! Per-job control signals.

use tokio::sync::watch;

/// The latched control request a job's executor obeys between batch
/// dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    Run,
    Pause,
    Cancel,
}

/// Sender side of a job's control channels.
///
/// Two watches: the control signal proper, observed by the executor
/// between dispatches, and a cancel flag that reaches into in-flight
/// subprocess runs so cancel can interrupt them mid-batch. Pause never
/// touches a live subprocess; it only delays the next dispatch.
#[derive(Debug)]
pub struct JobControl {
    signal: watch::Sender<ControlSignal>,
    cancel: watch::Sender<bool>,
}

impl JobControl {
    pub fn new() -> Self {
        Self {
            signal: watch::channel(ControlSignal::Run).0,
            cancel: watch::channel(false).0,
        }
    }

    pub fn set_pause(&self) {
        self.signal.send_replace(ControlSignal::Pause);
    }

    pub fn set_run(&self) {
        self.signal.send_replace(ControlSignal::Run);
    }

    pub fn request_cancel(&self) {
        self.signal.send_replace(ControlSignal::Cancel);
        self.cancel.send_replace(true);
    }

    pub fn subscribe(&self) -> watch::Receiver<ControlSignal> {
        self.signal.subscribe()
    }

    pub fn subscribe_cancel(&self) -> watch::Receiver<bool> {
        self.cancel.subscribe()
    }
}

impl Default for JobControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Block while the signal reads `Pause`; return the signal that ended
/// the wait. A closed channel counts as cancel so an orphaned executor
/// cannot wait forever.
pub(crate) async fn wait_for_resume(rx: &mut watch::Receiver<ControlSignal>) -> ControlSignal {
    loop {
        let current = *rx.borrow_and_update();
        if current != ControlSignal::Pause {
            return current;
        }
        if rx.changed().await.is_err() {
            return ControlSignal::Cancel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_immediately_when_running() {
        let control = JobControl::new();
        let mut rx = control.subscribe();
        assert_eq!(wait_for_resume(&mut rx).await, ControlSignal::Run);
    }

    #[tokio::test]
    async fn test_wait_blocks_until_resume() {
        let control = JobControl::new();
        control.set_pause();
        let mut rx = control.subscribe();

        let waiter = tokio::spawn(async move { wait_for_resume(&mut rx).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        control.set_run();
        assert_eq!(waiter.await.unwrap(), ControlSignal::Run);
    }

    #[tokio::test]
    async fn test_cancel_wakes_paused_wait() {
        let control = JobControl::new();
        control.set_pause();
        let mut rx = control.subscribe();

        let waiter = tokio::spawn(async move { wait_for_resume(&mut rx).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        control.request_cancel();
        assert_eq!(waiter.await.unwrap(), ControlSignal::Cancel);
        assert!(*control.subscribe_cancel().borrow());
    }
}
