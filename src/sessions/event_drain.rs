use std::collections::vec_deque::Drain;
use std::iter::FusedIterator;

use crate::ArenaEvent;

/// A zero-allocation opaque iterator that drains events from a session.
///
/// Wraps the internal event queue drain so the public API does not expose
/// `std::collections::vec_deque::Drain` directly. Implements [`Iterator`],
/// [`DoubleEndedIterator`], [`ExactSizeIterator`], and [`FusedIterator`].
///
/// Obtain one by calling [`MatchSession::events`].
///
/// # Examples
///
/// ```ignore
/// for event in session.events() {
///     match event {
///         ArenaEvent::RoundStarted { round, emotion } => {
///             println!("round {round}: show {emotion}");
///         }
///         _ => { /* handle other events */ }
///     }
/// }
/// ```
///
/// [`MatchSession::events`]: crate::MatchSession::events
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct EventDrain<'a> {
    inner: Drain<'a, ArenaEvent>,
}

impl<'a> EventDrain<'a> {
    pub(crate) fn from_drain(drain: Drain<'a, ArenaEvent>) -> Self {
        Self { inner: drain }
    }
}

impl Iterator for EventDrain<'_> {
    type Item = ArenaEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for EventDrain<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for EventDrain<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl FusedIterator for EventDrain<'_> {}

impl std::fmt::Debug for EventDrain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDrain")
            .field("remaining", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::iter_with_drain)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn make_event(remaining: u32) -> ArenaEvent {
        ArenaEvent::CountdownTick { remaining }
    }

    #[test]
    fn drain_yields_all_events_in_order() {
        let mut queue: VecDeque<ArenaEvent> = VecDeque::new();
        queue.push_back(make_event(3));
        queue.push_back(make_event(2));
        queue.push_back(make_event(1));

        let drain = EventDrain::from_drain(queue.drain(..));
        let events: Vec<_> = drain.collect();
        assert_eq!(events, vec![make_event(3), make_event(2), make_event(1)]);
    }

    #[test]
    fn drain_is_fused() {
        let mut queue: VecDeque<ArenaEvent> = VecDeque::new();
        queue.push_back(make_event(1));

        let mut drain = EventDrain::from_drain(queue.drain(..));
        assert!(drain.next().is_some());
        assert!(drain.next().is_none());
        assert!(drain.next().is_none());
    }

    #[test]
    fn double_ended_iteration() {
        let mut queue: VecDeque<ArenaEvent> = VecDeque::new();
        queue.push_back(make_event(1));
        queue.push_back(make_event(2));
        queue.push_back(make_event(3));

        let mut drain = EventDrain::from_drain(queue.drain(..));
        assert_eq!(drain.next_back(), Some(make_event(3)));
        assert_eq!(drain.next(), Some(make_event(1)));
        assert_eq!(drain.next_back(), Some(make_event(2)));
        assert!(drain.next().is_none());
    }

    #[test]
    fn exact_size_is_accurate() {
        let mut queue: VecDeque<ArenaEvent> = VecDeque::new();
        queue.push_back(make_event(1));
        queue.push_back(make_event(2));

        let mut drain = EventDrain::from_drain(queue.drain(..));
        assert_eq!(drain.len(), 2);
        let _ = drain.next();
        assert_eq!(drain.len(), 1);
        let _ = drain.next();
        assert_eq!(drain.len(), 0);
    }

    #[test]
    fn debug_format_shows_remaining_count() {
        let mut queue: VecDeque<ArenaEvent> = VecDeque::new();
        queue.push_back(make_event(1));
        queue.push_back(make_event(2));
        let drain = EventDrain::from_drain(queue.drain(..));
        assert_eq!(format!("{drain:?}"), "EventDrain { remaining: 2 }");
    }
}
