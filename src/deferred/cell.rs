//! Deferred - single-shot, race-free carrier of a value or an error.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::DataError;

use super::executor::{Delivery, Executor};
use super::latch::Latch;
use super::resolver::Resolver;

/// The eventual content of a cell: exactly a value or an error, never both.
pub(crate) type Outcome<T> = Result<T, DataError>;

pub(crate) type Consumer<T> = Box<dyn FnOnce(Outcome<T>) + Send>;
type Interceptor<T> = Box<dyn FnOnce(&mut Outcome<T>) + Send>;

/// Observable lifecycle of a [`Deferred`].
///
/// Transitions are monotonic: `Blank` to either waiting state, then `Sent`.
/// `Sent` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredState {
    /// Neither result nor consumer present.
    Blank,
    /// Result present, no consumer yet.
    WaitingThen,
    /// Consumer present, no result yet.
    WaitingContent,
    /// Result delivered; terminal.
    Sent,
}

pub(crate) struct Inner<T> {
    state: Mutex<State<T>>,
}

struct State<T> {
    stage: DeferredState,
    /// Set the moment a resolving call wins the race, before the interceptor
    /// runs. Later resolving calls observe it and become no-ops.
    claimed: bool,
    outcome: Option<Outcome<T>>,
    consumer: Option<Consumer<T>>,
    interceptor: Option<Interceptor<T>>,
    delivery: Delivery,
    latch: Option<Arc<Latch>>,
    /// Keeps chained upstream cells alive until delivery.
    parent: Option<Arc<dyn Any + Send + Sync>>,
}

impl<T> State<T> {
    fn blank() -> Self {
        State {
            stage: DeferredState::Blank,
            claimed: false,
            outcome: None,
            consumer: None,
            interceptor: None,
            delivery: Delivery::Inline,
            latch: None,
            parent: None,
        }
    }
}

/// A single-shot asynchronous result cell.
///
/// Every operation in the crate returns one. A `Deferred` is resolved at
/// most once (later resolutions are silent no-ops) and consumed at most
/// once: installing a consumer or blocking on [`result`](Deferred::result)
/// takes the cell by value, and the runtime panics on the contract
/// violations that ownership cannot rule out.
///
/// ```
/// use strata::Deferred;
///
/// let doubled = Deferred::of_value(21).map(|n| n * 2);
/// assert_eq!(doubled.result(), Ok(42));
/// ```
pub struct Deferred<T> {
    pub(crate) inner: Arc<Inner<T>>,
}

impl<T: Send + 'static> Deferred<T> {
    /// An unresolved cell.
    pub fn new() -> Self {
        Deferred {
            inner: Arc::new(Inner {
                state: Mutex::new(State::blank()),
            }),
        }
    }

    /// A cell already resolved with `value`.
    pub fn of_value(value: T) -> Self {
        Self::of_result(Ok(value))
    }

    /// A cell already resolved with `error`.
    pub fn of_error(error: DataError) -> Self {
        Self::of_result(Err(error))
    }

    /// A cell already resolved with `result`.
    pub fn of_result(result: Result<T, DataError>) -> Self {
        let deferred = Self::new();
        {
            let mut state = deferred.lock();
            state.stage = DeferredState::WaitingThen;
            state.claimed = true;
            state.outcome = Some(result);
        }
        deferred
    }

    /// Build a cell and hand its [`Resolver`] to `produce` before returning.
    pub fn new_with<F>(produce: F) -> Self
    where
        F: FnOnce(Resolver<T>),
    {
        let deferred = Self::new();
        produce(deferred.resolver());
        deferred
    }

    /// A non-owning handle that can resolve this cell from elsewhere.
    pub fn resolver(&self) -> Resolver<T> {
        Resolver::new(Arc::downgrade(&self.inner))
    }

    /// Current lifecycle stage.
    pub fn state(&self) -> DeferredState {
        self.lock().stage
    }

    /// Resolve with a value. No-op if already resolved or sent.
    pub fn set(&self, value: T) {
        self.complete(Ok(value));
    }

    /// Resolve with an error. No-op if already resolved or sent.
    pub fn set_error(&self, error: DataError) {
        self.complete(Err(error));
    }

    /// Adopt the eventual result of `other`. Keeps `other`'s chain alive
    /// until this cell delivers.
    pub fn set_from(&self, other: Deferred<T>) {
        {
            let mut state = self.lock();
            if state.claimed || state.stage == DeferredState::Sent {
                return;
            }
            state.parent = Some(other.inner.clone() as Arc<dyn Any + Send + Sync>);
        }
        let target = self.alias();
        other.install(Box::new(move |outcome| target.complete(outcome)));
    }

    /// Register an interceptor that may rewrite the pending result at the
    /// moment of resolution, before any consumer observes it.
    ///
    /// At most one is active; a later registration replaces the earlier
    /// one. Never invoked once the cell is resolved.
    pub fn on_set<F>(&self, intercept: F)
    where
        F: FnOnce(&mut Result<T, DataError>) + Send + 'static,
    {
        let mut state = self.lock();
        if state.stage == DeferredState::Sent {
            return;
        }
        state.interceptor = Some(Box::new(intercept));
    }

    /// Bind a delivery executor: consumer callbacks dispatch on it instead
    /// of the resolving thread.
    pub fn on(self, executor: Arc<dyn Executor>) -> Self {
        self.with_delivery(Delivery::Queue(executor))
    }

    /// Bind an explicit delivery policy.
    pub fn with_delivery(self, delivery: Delivery) -> Self {
        self.lock().delivery = delivery;
        self
    }

    /// Install the value-side consumer. The returned child carries the
    /// result onward: the value untouched after `on_value` ran, or the
    /// error unobserved.
    pub fn then<F>(self, on_value: F) -> Deferred<T>
    where
        F: FnOnce(&T) + Send + 'static,
    {
        let next = self.child::<T>();
        let target = next.alias();
        self.install(Box::new(move |outcome| match outcome {
            Ok(value) => {
                on_value(&value);
                target.complete(Ok(value));
            }
            Err(error) => target.complete(Err(error)),
        }));
        next
    }

    /// Install the error-side consumer. Mirror of [`then`](Deferred::then).
    pub fn fail<F>(self, on_error: F) -> Deferred<T>
    where
        F: FnOnce(&DataError) + Send + 'static,
    {
        let next = self.child::<T>();
        let target = next.alias();
        self.install(Box::new(move |outcome| match outcome {
            Ok(value) => target.complete(Ok(value)),
            Err(error) => {
                on_error(&error);
                target.complete(Err(error));
            }
        }));
        next
    }

    /// Block the calling thread until resolution and return the result.
    ///
    /// An unresolved cell parks on a lazily-created latch. Panics if a
    /// consumer was already installed on this cell.
    pub fn result(self) -> Result<T, DataError> {
        let latch = {
            let mut state = self.lock();
            match state.stage {
                DeferredState::WaitingContent | DeferredState::Sent => {
                    panic!("blocking read on a deferred that already has a consumer")
                }
                DeferredState::Blank | DeferredState::WaitingThen => {
                    if let Some(outcome) = state.outcome.take() {
                        state.stage = DeferredState::Sent;
                        state.parent = None;
                        return outcome;
                    }
                    state
                        .latch
                        .get_or_insert_with(|| Arc::new(Latch::new()))
                        .clone()
                }
            }
        };

        // The latch opens only after the outcome is stored, so at most one
        // wait round-trip happens here.
        loop {
            latch.wait();
            let mut state = self.lock();
            if let Some(outcome) = state.outcome.take() {
                state.stage = DeferredState::Sent;
                state.parent = None;
                return outcome;
            }
        }
    }

    /// Return the cell to `Blank`, releasing any stored result, consumer,
    /// and interceptor.
    pub fn clear(&self) {
        *self.lock() = State::blank();
    }

    /// Resolve with `outcome`, running the interceptor and delivering to
    /// the consumer if one is installed. Later calls are no-ops.
    pub(crate) fn complete(&self, mut outcome: Outcome<T>) {
        let interceptor = {
            let mut state = self.lock();
            if state.claimed || state.stage == DeferredState::Sent {
                return;
            }
            state.claimed = true;
            if state.stage == DeferredState::Blank {
                state.stage = DeferredState::WaitingThen;
            }
            state.interceptor.take()
        };

        // User code runs with the state lock released.
        if let Some(intercept) = interceptor {
            intercept(&mut outcome);
        }

        let mut state = self.lock();
        if let Some(consumer) = state.consumer.take() {
            state.stage = DeferredState::Sent;
            state.parent = None;
            let delivery = state.delivery.clone();
            drop(state);
            delivery.dispatch(move || consumer(outcome));
        } else {
            state.outcome = Some(outcome);
            state.stage = DeferredState::WaitingThen;
            if let Some(latch) = state.latch.take() {
                latch.open();
            }
        }
    }

    /// Install the single consumer. Delivers immediately when the result is
    /// already present; panics on double installation.
    pub(crate) fn install(&self, consumer: Consumer<T>) {
        let mut state = self.lock();
        if state.latch.is_some() {
            panic!("consumer installed while a blocking read is in progress");
        }
        if state.stage == DeferredState::Sent {
            panic!("consumer installed on a deferred that was already delivered");
        }
        if state.consumer.is_some() || state.stage == DeferredState::WaitingContent {
            panic!("deferred already has a then/fail pair installed");
        }
        if let Some(outcome) = state.outcome.take() {
            state.stage = DeferredState::Sent;
            state.parent = None;
            let delivery = state.delivery.clone();
            drop(state);
            delivery.dispatch(move || consumer(outcome));
        } else {
            // Blank, or claimed with the interceptor still rewriting;
            // either way complete() delivers to this consumer later.
            state.consumer = Some(consumer);
            if state.stage == DeferredState::Blank {
                state.stage = DeferredState::WaitingContent;
            }
        }
    }

    /// Another handle to the same cell, for internal wiring only.
    pub(crate) fn alias(&self) -> Deferred<T> {
        Deferred {
            inner: Arc::clone(&self.inner),
        }
    }

    /// A fresh cell holding this one alive as its parent.
    pub(crate) fn child<U: Send + 'static>(&self) -> Deferred<U> {
        let child = Deferred::<U>::new();
        child.lock().parent = Some(self.inner.clone() as Arc<dyn Any + Send + Sync>);
        child
    }

    pub(crate) fn from_inner(inner: Arc<Inner<T>>) -> Self {
        Deferred { inner }
    }

    // The state lock is never held across user code, so a poisoned guard
    // still holds a structurally sound state.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + 'static> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("state", &self.state())
            .finish()
    }
}
