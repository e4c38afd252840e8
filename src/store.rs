//! Single-writer state container.
//!
//! A [`Store`] owns the current state of one [`Reducer`], replaces it on
//! every dispatch and then notifies its listeners in subscription order.
//!
//! Dispatching from inside a listener does not recurse: the intent is queued
//! and applied (with its own notification round) after the current round
//! finishes, before the outermost `dispatch` call returns. A dispatch from
//! another thread waits for the round in progress, then runs its own; a
//! listener must not block on such a dispatch.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use crate::ui::mvi::Reducer;

/// Zero-argument callback run after each dispatch.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

type ListenerList = Mutex<Vec<(u64, Listener)>>;

pub struct Store<R: Reducer> {
    state: Mutex<Arc<R::State>>,
    listeners: Arc<ListenerList>,
    next_listener: AtomicU64,
    /// Held by the thread running a dispatch round; the flag is set while
    /// that round is in progress.
    round: ReentrantMutex<Cell<bool>>,
    /// Intents dispatched by listeners of the round in progress.
    pending: Mutex<VecDeque<R::Intent>>,
}

impl<R: Reducer> Store<R> {
    /// Creates a store and applies the default intent to `initial`.
    pub fn new(initial: R::State) -> Self {
        let state = R::reduce(initial, R::Intent::default());
        Self {
            state: Mutex::new(Arc::new(state)),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicU64::new(0),
            round: ReentrantMutex::new(Cell::new(false)),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Current state snapshot. Readers must not expect it to change.
    pub fn get_state(&self) -> Arc<R::State> {
        Arc::clone(&self.state.lock())
    }

    /// Registers `listener`, returning the capability that removes it.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Applies `intent` and notifies every listener registered at the
    /// start of the notification round.
    ///
    /// If a listener panics the panic propagates to the caller, intents
    /// queued during that round are dropped and the store stays usable.
    pub fn dispatch(&self, intent: R::Intent) {
        let round = self.round.lock();
        if round.get() {
            tracing::trace!("dispatch from a listener queued behind the current round");
            self.pending.lock().push_back(intent);
            return;
        }

        round.set(true);
        let _round_end = scopeguard::guard(&round, |round| {
            round.set(false);
            if std::thread::panicking() {
                self.pending.lock().clear();
            }
        });

        self.apply(intent);
        while let Some(intent) = self.next_pending() {
            self.apply(intent);
        }
    }

    /// Capability handed to views so they can dispatch without owning the
    /// store type.
    pub fn dispatcher(self: &Arc<Self>) -> Dispatcher<R::Intent>
    where
        R: 'static,
    {
        let store = Arc::downgrade(self);
        Dispatcher::new(move |intent| match store.upgrade() {
            Some(store) => store.dispatch(intent),
            None => tracing::debug!(?intent, "store dropped, intent discarded"),
        })
    }

    fn next_pending(&self) -> Option<R::Intent> {
        self.pending.lock().pop_front()
    }

    fn apply(&self, intent: R::Intent) {
        tracing::debug!(?intent, "dispatch");
        {
            let mut state = self.state.lock();
            let next = R::reduce(R::State::clone(&state), intent);
            *state = Arc::new(next);
        }

        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}

/// Removes one listener from its store.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    /// Removes the listener. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Cloneable dispatch capability.
pub struct Dispatcher<I> {
    sink: Arc<dyn Fn(I) + Send + Sync>,
}

impl<I> Clone for Dispatcher<I> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<I> Dispatcher<I> {
    pub fn new(sink: impl Fn(I) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    pub fn dispatch(&self, intent: I) {
        (self.sink)(intent)
    }
}
