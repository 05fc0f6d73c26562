use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Terminate,
}

/// Serialized completion context: one worker thread running posted jobs in
/// FIFO order. Collaborators signal completions from here.
pub struct CompletionQueue {
    sender: mpsc::Sender<Message>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CompletionQueue {
    pub fn new(name: &str) -> std::io::Result<CompletionQueue> {
        let (sender, receiver) = mpsc::channel::<Message>();
        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(Message::Run(job)) = receiver.recv() {
                    // A panicking job must not take the jobs queued behind it down too.
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                        log::error!(
                            target: "Completion",
                            "Completion job panicked: {}",
                            panic_message(payload.as_ref())
                        );
                    }
                }
            })?;

        Ok(CompletionQueue {
            sender,
            worker: Some(worker),
        })
    }

    /// Queue a job. If the worker is gone the job runs on the calling thread,
    /// so a completion is never lost.
    pub fn post<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(mpsc::SendError(Message::Run(job))) = self.sender.send(Message::Run(Box::new(f))) {
            job();
        }
    }

    /// Block until every job posted so far has run.
    /// Must not be called from a job on this queue.
    pub fn flush(&self) {
        let (tx, rx) = mpsc::channel();
        self.post(move || {
            let _ = tx.send(());
        });
        let _ = rx.recv();
    }

    fn on_worker(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| w.thread().id() == thread::current().id())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic>"
    }
}

impl Drop for CompletionQueue {
    fn drop(&mut self) {
        let _ = self.sender.send(Message::Terminate);

        // Dropped from inside one of its own jobs: the worker exits on its own.
        if self.on_worker() {
            return;
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
