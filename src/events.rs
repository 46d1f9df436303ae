//! Named-event subscription used by every component.
//!
//! Handlers run synchronously, in subscription order. A handler that returns
//! an error is logged and the remaining handlers still run; [`Emitter::trigger`]
//! reports how many failed.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// An event value that knows which named channel it belongs to.
pub trait Event {
    /// Channel identifier used for subscription.
    type Kind: Copy + Eq + Hash + fmt::Debug;

    /// Channel this event is delivered on.
    fn kind(&self) -> Self::Kind;
}

/// Outcome of a single handler invocation.
pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

type Handler<E> = Box<dyn FnMut(&E) -> HandlerResult>;

/// Opaque token returned by [`Emitter::on`], used to unsubscribe one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Subscribe/unsubscribe/trigger table for one component.
pub struct Emitter<E: Event> {
    handlers: FxHashMap<E::Kind, Vec<(HandlerId, Handler<E>)>>,
    next_id: u64,
}

impl<E: Event> Emitter<E> {
    /// Create an emitter with no subscriptions.
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Attach a handler to `kind`.
    pub fn on(
        &mut self,
        kind: E::Kind,
        handler: impl FnMut(&E) -> HandlerResult + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove one handler, or every handler of `kind` when `id` is `None`.
    pub fn off(&mut self, kind: E::Kind, id: Option<HandlerId>) {
        match id {
            Some(id) => {
                if let Some(list) = self.handlers.get_mut(&kind) {
                    list.retain(|(existing, _)| *existing != id);
                }
            }
            None => {
                let _ = self.handlers.remove(&kind);
            }
        }
    }

    /// Deliver `event` to its subscribers. Returns the number of handlers
    /// that reported an error.
    pub fn trigger(&mut self, event: &E) -> usize {
        let kind = event.kind();
        let Some(list) = self.handlers.get_mut(&kind) else {
            return 0;
        };
        let mut failures = 0;
        for (id, handler) in list.iter_mut() {
            if let Err(e) = handler(event) {
                failures += 1;
                log::warn!("handler {id:?} for {kind:?} failed: {e}");
            }
        }
        failures
    }

    /// Number of handlers subscribed to `kind`.
    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

impl<E: Event> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: FxHashMap<_, _> = self
            .handlers
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("Emitter").field("handlers", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Ping,
        Pong,
    }

    #[derive(Debug)]
    struct Msg(Kind, u32);

    impl Event for Msg {
        type Kind = Kind;

        fn kind(&self) -> Kind {
            self.0
        }
    }

    fn recorder() -> (Rc<RefCell<Vec<String>>>, Emitter<Msg>) {
        (Rc::new(RefCell::new(Vec::new())), Emitter::new())
    }

    #[test]
    fn handlers_run_in_subscription_order() {
        let (log, mut emitter) = recorder();
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            let _ = emitter.on(Kind::Ping, move |msg: &Msg| {
                log.borrow_mut().push(format!("{tag}{}", msg.1));
                Ok(())
            });
        }

        assert_eq!(emitter.trigger(&Msg(Kind::Ping, 7)), 0);
        assert_eq!(*log.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn events_only_reach_their_channel() {
        let (log, mut emitter) = recorder();
        let sink = Rc::clone(&log);
        let _ = emitter.on(Kind::Pong, move |_: &Msg| {
            sink.borrow_mut().push("pong".to_owned());
            Ok(())
        });

        let _ = emitter.trigger(&Msg(Kind::Ping, 1));
        assert!(log.borrow().is_empty());
        let _ = emitter.trigger(&Msg(Kind::Pong, 1));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn off_with_id_removes_only_that_handler() {
        let (log, mut emitter) = recorder();
        let first = Rc::clone(&log);
        let id = emitter.on(Kind::Ping, move |_: &Msg| {
            first.borrow_mut().push("first".to_owned());
            Ok(())
        });
        let second = Rc::clone(&log);
        let _ = emitter.on(Kind::Ping, move |_: &Msg| {
            second.borrow_mut().push("second".to_owned());
            Ok(())
        });

        emitter.off(Kind::Ping, Some(id));
        let _ = emitter.trigger(&Msg(Kind::Ping, 0));
        assert_eq!(*log.borrow(), vec!["second"]);
    }

    #[test]
    fn off_without_id_clears_channel() {
        let (_, mut emitter) = recorder();
        let _ = emitter.on(Kind::Ping, |_: &Msg| Ok(()));
        let _ = emitter.on(Kind::Ping, |_: &Msg| Ok(()));
        let _ = emitter.on(Kind::Pong, |_: &Msg| Ok(()));

        emitter.off(Kind::Ping, None);
        assert_eq!(emitter.listener_count(Kind::Ping), 0);
        assert_eq!(emitter.listener_count(Kind::Pong), 1);
        // Clearing an unknown channel is harmless.
        emitter.off(Kind::Ping, None);
    }

    #[test]
    fn failing_handler_does_not_stop_the_rest() {
        let (log, mut emitter) = recorder();
        let _ = emitter.on(Kind::Ping, |_: &Msg| Err("boom".into()));
        let sink = Rc::clone(&log);
        let _ = emitter.on(Kind::Ping, move |_: &Msg| {
            sink.borrow_mut().push("ran".to_owned());
            Ok(())
        });

        assert_eq!(emitter.trigger(&Msg(Kind::Ping, 0)), 1);
        assert_eq!(*log.borrow(), vec!["ran"]);
    }
}
