//! Submission-ordered operation queue for the async cursor
//!
//! Each operation takes a [`Ticket`] synchronously when it is submitted. A
//! ticket is linked to the one submitted before it through a oneshot
//! channel, and [`Ticket::wait`] resolves once every earlier ticket has been
//! released. Releasing happens on drop, so a failed or abandoned operation
//! never stalls the queue.
//!
//! A ticket dropped before its turn forwards its own pending link to its
//! successor, which keeps the chain intact.

use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Forwarded link to a still-pending predecessor
#[derive(Debug)]
struct Link(oneshot::Receiver<Link>);

/// Tail of the operation chain
#[derive(Debug, Default)]
pub(crate) struct OpQueue {
    tail: Mutex<Option<oneshot::Receiver<Link>>>,
}

impl OpQueue {
    /// Take the next place in line
    pub(crate) fn enqueue(&self) -> Ticket {
        let (done, next) = oneshot::channel();
        let prev = self.tail.lock().replace(next);
        Ticket {
            prev,
            done: Some(done),
        }
    }
}

/// A place in an [`OpQueue`]
#[derive(Debug)]
pub(crate) struct Ticket {
    prev: Option<oneshot::Receiver<Link>>,
    done: Option<oneshot::Sender<Link>>,
}

impl Ticket {
    /// Wait until all earlier tickets have been released
    pub(crate) async fn wait(&mut self) {
        while let Some(prev) = self.prev.as_mut() {
            let result = prev.await;
            match result {
                Ok(Link(forwarded)) => self.prev = Some(forwarded),
                Err(_) => self.prev = None,
            }
        }
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if let (Some(prev), Some(done)) = (self.prev.take(), self.done.take()) {
            // Our successor has to wait for whatever we were still waiting on.
            let _ = done.send(Link(prev));
        }
    }
}
