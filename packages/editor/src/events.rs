//! # Change Notifications
//!
//! Mutations never notify observers directly. Each committed mutation
//! pushes its events onto an outbound queue, and the host drains the queue
//! once its own follow-up work (summary recomputation, re-rendering) has
//! run against the already mutated tree. Events are delivered in the order
//! the mutations were applied.

use msdesc_tree::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeMethod {
    Insert,
    Delete,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: NodeKind,
    pub method: ChangeMethod,
    pub id: NodeId,
}

impl ChangeEvent {
    pub fn new(kind: NodeKind, method: ChangeMethod, id: NodeId) -> Self {
        Self { kind, method, id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&ChangeEvent)>;

/// FIFO queue of committed changes plus the observers they go to
#[derive(Default)]
pub struct EventQueue {
    pending: VecDeque<ChangeEvent>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns whether the subscription existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn push(&mut self, events: impl IntoIterator<Item = ChangeEvent>) {
        self.pending.extend(events);
    }

    /// Events waiting for delivery, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deliver every pending event to every subscriber, oldest first.
    ///
    /// Returns the delivered events.
    pub fn drain(&mut self) -> Vec<ChangeEvent> {
        let events: Vec<ChangeEvent> = self.pending.drain(..).collect();
        for event in &events {
            for (_, subscriber) in &mut self.subscribers {
                subscriber(event);
            }
        }
        events
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("pending", &self.pending)
            .field("subscribers", &format!("{} subscribers", self.subscribers.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msdesc_tree::Kind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(method: ChangeMethod, id: &str) -> ChangeEvent {
        ChangeEvent::new(NodeKind::Element(Kind::MsItem), method, NodeId::new(id))
    }

    #[test]
    fn test_drain_delivers_in_order() {
        let mut queue = EventQueue::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        queue.subscribe(move |e| sink.borrow_mut().push(e.id.clone()));

        queue.push([event(ChangeMethod::Insert, "a"), event(ChangeMethod::Delete, "b")]);
        assert!(seen.borrow().is_empty());
        assert_eq!(queue.len(), 2);

        let delivered = queue.drain();
        assert_eq!(delivered.len(), 2);
        assert_eq!(*seen.borrow(), vec![NodeId::new("a"), NodeId::new("b")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut queue = EventQueue::new();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let id = queue.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(queue.unsubscribe(id));
        assert!(!queue.unsubscribe(id));
        queue.push([event(ChangeMethod::Edit, "a")]);
        queue.drain();
        assert_eq!(*count.borrow(), 0);
    }
}
