//! Transformation and aggregation combinators over [`Deferred`].
//!
//! Each combinator consumes its receiver (the one consumer slot), returns a
//! fresh cell parented to it, and is non-blocking: the returned cell
//! resolves whenever the chain upstream does.

use crate::error::DataError;

use super::cell::Deferred;

impl<T: Send + 'static> Deferred<T> {
    /// On value, deliver `transform(value)`; on error, propagate.
    pub fn map<U, F>(self, transform: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let mapped = self.child::<U>();
        let target = mapped.alias();
        self.install(Box::new(move |outcome| match outcome {
            Ok(value) => target.complete(Ok(transform(value))),
            Err(error) => target.complete(Err(error)),
        }));
        mapped
    }

    /// Transform the error payload; values pass through untouched.
    pub fn map_err<F>(self, transform: F) -> Deferred<T>
    where
        F: FnOnce(DataError) -> DataError + Send + 'static,
    {
        let mapped = self.child::<T>();
        let target = mapped.alias();
        self.install(Box::new(move |outcome| match outcome {
            Ok(value) => target.complete(Ok(value)),
            Err(error) => target.complete(Err(transform(error))),
        }));
        mapped
    }

    /// On value, adopt the eventual result of `continuation(value)`; on
    /// error, propagate. The second step begins only after this cell
    /// delivers a value.
    pub fn flat_map<U, F>(self, continuation: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Deferred<U> + Send + 'static,
    {
        let chained = self.child::<U>();
        let target = chained.alias();
        self.install(Box::new(move |outcome| match outcome {
            Ok(value) => target.set_from(continuation(value)),
            Err(error) => target.complete(Err(error)),
        }));
        chained
    }

    /// On error, substitute the cell produced by `rescue`; on value,
    /// propagate.
    pub fn recover<F>(self, rescue: F) -> Deferred<T>
    where
        F: FnOnce(DataError) -> Deferred<T> + Send + 'static,
    {
        let rescued = self.child::<T>();
        let target = rescued.alias();
        self.install(Box::new(move |outcome| match outcome {
            Ok(value) => target.complete(Ok(value)),
            Err(error) => target.set_from(rescue(error)),
        }));
        rescued
    }

    /// Observe the value without changing it; errors pass through
    /// unobserved.
    pub fn and_then<F>(self, observe: F) -> Deferred<T>
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.then(observe)
    }

    /// Observe both outcomes without changing them.
    pub fn on_completion<F>(self, observe: F) -> Deferred<T>
    where
        F: FnOnce(&Result<T, DataError>) + Send + 'static,
    {
        let observed = self.child::<T>();
        let target = observed.alias();
        self.install(Box::new(move |outcome| {
            observe(&outcome);
            target.complete(outcome);
        }));
        observed
    }

    /// On value, fail with the error the predicate returns, if any;
    /// otherwise pass the value through.
    pub fn filter<F>(self, predicate: F) -> Deferred<T>
    where
        F: FnOnce(&T) -> Option<DataError> + Send + 'static,
    {
        let filtered = self.child::<T>();
        let target = filtered.alias();
        self.install(Box::new(move |outcome| match outcome {
            Ok(value) => match predicate(&value) {
                Some(error) => target.complete(Err(error)),
                None => target.complete(Ok(value)),
            },
            Err(error) => target.complete(Err(error)),
        }));
        filtered
    }

    /// Pair this cell's value with another's. Left-to-right: `other` is
    /// only consulted after `self` delivers a value, so `self`'s error
    /// wins ties.
    pub fn zip<U>(self, other: Deferred<U>) -> Deferred<(T, U)>
    where
        U: Send + 'static,
    {
        self.flat_map(move |first| other.map(move |second| (first, second)))
    }

    /// Three-way aggregation; fails fast on the first error left-to-right.
    pub fn zip3<U, V>(self, second: Deferred<U>, third: Deferred<V>) -> Deferred<(T, U, V)>
    where
        U: Send + 'static,
        V: Send + 'static,
    {
        self.zip(second)
            .zip(third)
            .map(|((first, second), third)| (first, second, third))
    }

    /// Four-way aggregation; fails fast on the first error left-to-right.
    pub fn zip4<U, V, W>(
        self,
        second: Deferred<U>,
        third: Deferred<V>,
        fourth: Deferred<W>,
    ) -> Deferred<(T, U, V, W)>
    where
        U: Send + 'static,
        V: Send + 'static,
        W: Send + 'static,
    {
        self.zip3(second, third)
            .zip(fourth)
            .map(|((first, second, third), fourth)| (first, second, third, fourth))
    }
}
