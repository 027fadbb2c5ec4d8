use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// Blocking FIFO queue of discovered URLs.
///
/// Multiple producers (downloaders discovering links, external callers via
/// `put_new`) and multiple consumers (downloaders long-polling `next_url`)
/// share one instance. The monitor contract guarantees that no URL is
/// delivered to two consumers and none is lost under concurrent access.
///
/// There is deliberately no deduplication at this layer: the same URL may be
/// enqueued many times, and the visited-check happens at the downloader.
pub struct Frontier {
    items: Mutex<VecDeque<String>>,
    available: Notify,
}

impl Frontier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
        })
    }

    /// Appends a URL unconditionally. Never blocks beyond the queue lock.
    pub async fn enqueue(&self, url: String) {
        {
            let mut items = self.items.lock().await;
            items.push_back(url);
        }
        self.available.notify_one();
    }

    /// Removes and returns exactly one URL, FIFO order, suspending the caller
    /// until an item is available.
    pub async fn dequeue(&self) -> String {
        loop {
            {
                let mut items = self.items.lock().await;
                if let Some(url) = items.pop_front() {
                    return url;
                }
            }
            // notify_one stores a permit when nobody is waiting yet, so an
            // enqueue racing with this await cannot be missed.
            self.available.notified().await;
        }
    }

    /// Approximate, non-authoritative emptiness snapshot.
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Approximate queue length.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }
}
