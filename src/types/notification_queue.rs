use std::{
    collections::{HashSet, VecDeque},
    sync::{Mutex, MutexGuard},
};

use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Default)]
struct Items {
    order: VecDeque<Uuid>,
    queued: HashSet<Uuid>,
}

/// FIFO of subscription ids waiting for a Telegram alert.
///
/// An id is held at most once until it is popped.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: Mutex<Items>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Items>, Error> {
        self.items
            .lock()
            .map_err(|e| Error::TaskError(e.to_string()))
    }

    /// Returns `false` when the id is already waiting.
    pub fn push_back(&self, id: Uuid) -> Result<bool, Error> {
        let mut items = self.lock()?;
        if !items.queued.insert(id) {
            return Ok(false);
        }
        items.order.push_back(id);
        Ok(true)
    }

    /// Used when Telegram asks us to retry later.
    pub fn push_front(&self, id: Uuid) -> Result<bool, Error> {
        let mut items = self.lock()?;
        if !items.queued.insert(id) {
            return Ok(false);
        }
        items.order.push_front(id);
        Ok(true)
    }

    pub fn pop_front(&self) -> Result<Option<Uuid>, Error> {
        let mut items = self.lock()?;
        let id = items.order.pop_front();
        if let Some(id) = &id {
            items.queued.remove(id);
        }
        Ok(id)
    }

    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.lock()?.order.len())
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_order() {
        let queue = NotificationQueue::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let retried = Uuid::new_v4();

        queue.push_back(first).unwrap();
        queue.push_back(second).unwrap();
        queue.push_front(retried).unwrap();

        assert_eq!(queue.len().unwrap(), 3);
        assert_eq!(queue.pop_front().unwrap(), Some(retried));
        assert_eq!(queue.pop_front().unwrap(), Some(first));
        assert_eq!(queue.pop_front().unwrap(), Some(second));
        assert_eq!(queue.pop_front().unwrap(), None);
        assert!(queue.is_empty().unwrap());
    }

    #[test]
    fn test_queued_id_is_not_duplicated() {
        let queue = NotificationQueue::new();
        let id = Uuid::new_v4();

        assert!(queue.push_back(id).unwrap());
        assert!(!queue.push_back(id).unwrap());
        assert!(!queue.push_front(id).unwrap());
        assert_eq!(queue.len().unwrap(), 1);

        assert_eq!(queue.pop_front().unwrap(), Some(id));
        assert!(queue.push_back(id).unwrap());
    }
}
