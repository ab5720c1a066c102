//! Change notifications for presentation layers.

use crate::model::note::NoteId;

/// State change published after a store operation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A note was appended at `index`.
    NoteCreated { note_id: NoteId, index: usize },
    /// The note at `index` received new text from a committed edit.
    NoteUpdated { note_id: NoteId, index: usize },
    /// An edit slot was opened on the note at `index`.
    EditStarted {
        note_id: NoteId,
        index: usize,
        /// A previous slot with a modified draft was thrown away.
        replaced_unsaved_draft: bool,
    },
    /// The draft text of the open edit changed.
    DraftChanged { note_id: NoteId },
    /// The open edit was dropped because its note is gone.
    EditDiscarded { note_id: NoteId },
    /// The pending input text changed.
    InputChanged,
}

/// Subscriber to store events.
pub trait StoreObserver {
    fn on_event(&mut self, event: &StoreEvent);
}

impl<F> StoreObserver for F
where
    F: FnMut(&StoreEvent),
{
    fn on_event(&mut self, event: &StoreEvent) {
        self(event)
    }
}

/// Handle returned by `NoteStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn StoreObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn StoreObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn publish(&mut self, event: &StoreEvent) {
        for (_, observer) in &mut self.observers {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ObserverRegistry, StoreEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unsubscribe_stops_delivery_and_reports_unknown_ids() {
        let seen = Rc::new(RefCell::new(0_usize));
        let counter = Rc::clone(&seen);
        let mut registry = ObserverRegistry::default();
        let id = registry.subscribe(Box::new(move |_: &StoreEvent| *counter.borrow_mut() += 1));

        registry.publish(&StoreEvent::InputChanged);
        assert!(registry.unsubscribe(id));
        registry.publish(&StoreEvent::InputChanged);

        assert_eq!(*seen.borrow(), 1);
        assert!(!registry.unsubscribe(id));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn subscription_ids_are_not_reused() {
        let mut registry = ObserverRegistry::default();
        let first = registry.subscribe(Box::new(|_: &StoreEvent| {}));
        registry.unsubscribe(first);
        let second = registry.subscribe(Box::new(|_: &StoreEvent| {}));
        assert_ne!(first, second);
    }
}
