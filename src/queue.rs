use std::time::Duration;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};


/// Unbounded multi-producer mailbox through which workers report finished
/// chunks to the coordinating thread.
///
/// The queue owns both ends of the channel, so it never disconnects while it
/// is alive: pushes always succeed and a blocking pop only returns once an
/// item arrives. Arrival order across producers is unspecified; consumers key
/// results by the chunk index carried inside the message.
pub struct CompletionQueue<T> {
    snd: Sender<T>,
    rcv: Receiver<T>,
}

impl<T> CompletionQueue<T> {
    pub fn new() -> CompletionQueue<T> {
        let (snd, rcv) = unbounded();
        CompletionQueue { snd, rcv }
    }

    /// Appends an item and wakes one waiter.
    pub fn push(&self, item: T) {
        // Cannot fail, `self.rcv` keeps the channel connected.
        let _ = self.snd.send(item);
    }

    pub fn try_pop(&self) -> Option<T> {
        self.rcv.try_recv().ok()
    }

    /// Blocks until an item is available.
    pub fn wait_and_pop(&self) -> T {
        match self.rcv.recv() {
            Ok(item) => item,
            Err(_) => unreachable!("completion queue disconnected while holding its own sender"),
        }
    }

    /// Like `wait_and_pop`, but gives up after `timeout`.
    pub fn wait_and_pop_timeout(&self, timeout: Duration) -> Option<T> {
        match self.rcv.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.rcv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rcv.is_empty()
    }
}

impl<T> Default for CompletionQueue<T> {
    fn default() -> CompletionQueue<T> {
        CompletionQueue::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn try_pop_on_empty() {
        let queue: CompletionQueue<usize> = CompletionQueue::new();
        assert_eq!(queue.try_pop(), None);
        assert!(queue.is_empty());
        assert_eq!(queue.wait_and_pop_timeout(Duration::from_millis(5)), None);
    }

    #[test]
    fn single_thread_fifo() {
        let queue = CompletionQueue::new();
        queue.push(1);
        queue.push(2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_pop(), Some(1));
        assert_eq!(queue.wait_and_pop(), 2);
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn many_producers_one_consumer() {
        let queue = CompletionQueue::new();
        let producers = 8;
        let per_producer = 1000;
        let seen = crossbeam::scope(|scope| {
            for p in 0..producers {
                let queue = &queue;
                scope.spawn(move |_| {
                    for i in 0..per_producer {
                        queue.push((p, i));
                    }
                });
            }
            let mut seen = BTreeSet::new();
            for _ in 0..producers * per_producer {
                assert!(seen.insert(queue.wait_and_pop()));
            }
            seen
        }).unwrap();
        assert_eq!(seen.len(), producers * per_producer);
        assert!(queue.is_empty());
    }

    #[test]
    fn blocking_pop_wakes_on_push() {
        let queue = CompletionQueue::new();
        let got = crossbeam::scope(|scope| {
            let queue = &queue;
            scope.spawn(move |_| {
                std::thread::sleep(Duration::from_millis(20));
                queue.push((3usize, vec![b"x".to_vec()]));
            });
            queue.wait_and_pop()
        }).unwrap();
        assert_eq!(got, (3, vec![b"x".to_vec()]));
    }
}
