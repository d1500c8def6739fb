use crate::dom::{ElementId, IntersectionEntry, Point};

/// Input delivered to the interaction controller by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click(ElementId),
    PointerMove(Point),
    Intersection(Vec<IntersectionEntry>),
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Click(_) => EventKind::Click,
            UiEvent::PointerMove(_) => EventKind::PointerMove,
            UiEvent::Intersection(_) => EventKind::Intersection,
        }
    }

    fn target(&self) -> Option<ElementId> {
        match self {
            UiEvent::Click(target) => Some(*target),
            UiEvent::PointerMove(_) | UiEvent::Intersection(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    PointerMove,
    Intersection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone)]
struct Subscription<L> {
    id: SubscriptionId,
    kind: EventKind,
    target: Option<ElementId>,
    listener: L,
}

/// Registered listeners, in subscription order.
///
/// A subscription with a `target` only receives events aimed at that
/// element; one without receives every event of its kind.
#[derive(Debug, Clone)]
pub struct Subscriptions<L> {
    next_id: u64,
    entries: Vec<Subscription<L>>,
}

impl<L> Default for Subscriptions<L> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<L: Clone> Subscriptions<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        target: Option<ElementId>,
        listener: L,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push(Subscription {
            id,
            kind,
            target,
            listener,
        });
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubscriptionId, EventKind, Option<ElementId>)> + '_ {
        self.entries.iter().map(|s| (s.id, s.kind, s.target))
    }

    /// Listeners that should receive `event`.
    pub fn listeners_for(&self, event: &UiEvent) -> Vec<L> {
        let kind = event.kind();
        let target = event.target();
        self.entries
            .iter()
            .filter(|s| s.kind == kind && (s.target.is_none() || s.target == target))
            .map(|s| s.listener.clone())
            .collect()
    }
}
