use std::sync::mpsc;
use std::time::Duration;

/// Runs `f` on its own thread and panics if it has not finished within `duration`.
pub fn panic_after<T, F>(duration: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    let handle = std::thread::spawn(move || {
        let value = f();
        let _ = done_tx.send(());

        value
    });

    match done_rx.recv_timeout(duration) {
        Ok(()) => handle.join().expect("Test thread panicked"),
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("Test took longer than {duration:?}"),
        Err(mpsc::RecvTimeoutError::Disconnected) => match handle.join() {
            Ok(value) => value,
            Err(panic) => std::panic::resume_unwind(panic),
        },
    }
}
