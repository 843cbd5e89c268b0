use crate::api::ApiError;
use std::sync::mpsc::{channel, Receiver, Sender};

type Tagged<T> = (u64, Result<T, ApiError>);

/// Runs one background fetch at a time per page slot.
///
/// Every `start` bumps the generation; answers from older generations are
/// dropped on arrival, so a slow request can't overwrite a newer one.
pub struct Loader<T> {
    tx: Sender<Tagged<T>>,
    rx: Receiver<Tagged<T>>,
    generation: u64,
    pending: bool,
}

impl<T: Send + 'static> Loader<T> {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            generation: 0,
            pending: false,
        }
    }

    /// Returns false when no worker could be spawned; nothing is pending then.
    pub fn start<F>(&mut self, job: F) -> bool
    where
        F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    {
        self.generation += 1;
        self.pending = true;

        let generation = self.generation;
        let tx = self.tx.clone();
        let spawned = std::thread::Builder::new()
            .name("veglytics-load".into())
            .spawn(move || {
                // Receiver gone means the page was dropped
                let _ = tx.send((generation, job()));
            });

        self.track_spawn(spawned.map(drop))
    }

    fn track_spawn(&mut self, spawned: std::io::Result<()>) -> bool {
        match spawned {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("could not spawn load thread: {}", e);
                self.pending = false;
                false
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Non-blocking. Returns the current generation's answer once.
    pub fn poll(&mut self) -> Option<Result<T, ApiError>> {
        while let Ok((generation, result)) = self.rx.try_recv() {
            if let Some(r) = self.accept(generation, result) {
                return Some(r);
            }
        }
        None
    }

    fn accept(&mut self, generation: u64, result: Result<T, ApiError>) -> Option<Result<T, ApiError>> {
        if self.pending && generation == self.generation {
            self.pending = false;
            Some(result)
        } else {
            tracing::debug!(generation, current = self.generation, "dropping stale response");
            None
        }
    }

    #[cfg(test)]
    pub fn wait(&mut self, timeout: std::time::Duration) -> Option<Result<T, ApiError>> {
        let deadline = std::time::Instant::now() + timeout;
        while let Some(left) = deadline.checked_duration_since(std::time::Instant::now()) {
            let (generation, result) = self.rx.recv_timeout(left).ok()?;
            if let Some(r) = self.accept(generation, result) {
                return Some(r);
            }
        }
        None
    }
}

impl<T: Send + 'static> Default for Loader<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::sync_channel;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn delivers_result_once() {
        let mut loader: Loader<u32> = Loader::new();
        assert!(loader.start(|| Ok(7)));
        assert!(loader.is_pending());

        assert_eq!(loader.wait(WAIT).unwrap().unwrap(), 7);
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn failed_spawn_leaves_nothing_pending() {
        let mut loader: Loader<u32> = Loader::new();
        loader.generation = 1;
        loader.pending = true;

        let started = loader.track_spawn(Err(std::io::Error::other("no threads left")));

        assert!(!started);
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn errors_are_delivered_too() {
        let mut loader: Loader<u32> = Loader::new();
        loader.start(|| Err(ApiError::Transport("down".into())));
        assert!(matches!(loader.wait(WAIT), Some(Err(ApiError::Transport(_)))));
    }

    #[test]
    fn older_generation_is_discarded() {
        let mut loader: Loader<&'static str> = Loader::new();

        let (release_tx, release_rx) = sync_channel::<()>(0);
        loader.start(move || {
            release_rx.recv().ok();
            Ok("slow and stale")
        });
        loader.start(|| Ok("fresh"));

        assert_eq!(loader.wait(WAIT).unwrap().unwrap(), "fresh");

        release_tx.send(()).unwrap();
        assert!(loader.wait(Duration::from_millis(300)).is_none());
        assert!(!loader.is_pending());
    }
}
