use std::collections::VecDeque;

/// A strict first-in first-out queue.
///
/// Used to walk a [`QuadTree`](crate::QuadTree) in level order. The codec
/// only ever stores borrowed nodes in it, so dropping a queue never drops a
/// tree node.
#[derive(Debug)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Add an item to the back of the queue.
    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Remove the item at the front of the queue, if any.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_in_first_out() {
        let mut queue = Queue::new();
        assert!(queue.is_empty());

        queue.enqueue(1);
        queue.enqueue(2);
        assert_eq!(queue.dequeue(), Some(1));

        queue.enqueue(3);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), Some(3));

        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn holds_borrows() {
        let values = [String::from("a"), String::from("b")];

        let mut queue = Queue::default();
        for v in &values {
            queue.enqueue(v);
        }
        drop(queue);

        assert_eq!(values.len(), 2);
    }
}
