use log::{debug, error};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

const EXIT_POLL: Duration = Duration::from_millis(10);

/// Sent when a worker's closure returns or unwinds.
struct ExitSignal(Sender<()>);

impl Drop for ExitSignal {
    fn drop(&mut self) {
        let _ = self.0.send(());
    }
}

/// Tracks per-connection worker threads. At most `max_workers` are alive at
/// once; spawning into a full set waits until any one of them exits, so a
/// single stuck worker only holds its own slot.
pub struct WorkerSet {
    handles: VecDeque<JoinHandle<()>>,
    max_workers: usize,
    spawned: u64,
    exited_tx: Sender<()>,
    exited_rx: Receiver<()>,
}

impl WorkerSet {
    pub fn new(max_workers: usize) -> Self {
        let (exited_tx, exited_rx) = mpsc::channel();

        WorkerSet {
            handles: VecDeque::new(),
            max_workers: max_workers.max(1),
            spawned: 0,
            exited_tx,
            exited_rx,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    fn reap_finished(&mut self) {
        let (finished, running): (VecDeque<_>, VecDeque<_>) = self
            .handles
            .drain(..)
            .partition(|handle| handle.is_finished());

        self.handles = running;
        finished.into_iter().for_each(join_worker);
    }

    pub fn spawn<F>(&mut self, work: F) -> std::io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.reap_finished();

        if self.handles.len() >= self.max_workers {
            debug!("Worker limit of {} reached, waiting", self.max_workers);
        }
        while self.handles.len() >= self.max_workers {
            // the signal fires just before the thread itself ends, so keep polling
            let _ = self.exited_rx.recv_timeout(EXIT_POLL);
            self.reap_finished();
        }

        self.spawned += 1;
        let exit_signal = ExitSignal(self.exited_tx.clone());
        let handle = std::thread::Builder::new()
            .name(format!("connection-{}", self.spawned))
            .spawn(move || {
                let _exit_signal = exit_signal;
                work();
            })?;
        self.handles.push_back(handle);

        Ok(())
    }

    pub fn join_all(&mut self) {
        self.handles.drain(..).for_each(join_worker);
    }
}

fn join_worker(handle: JoinHandle<()>) {
    let name = handle.thread().name().unwrap_or("worker").to_string();

    if handle.join().is_err() {
        error!("Worker {name} panicked");
    }
}
