use std::sync::Weak;

use crate::error::DataError;

use super::cell::{Deferred, Inner};

/// A non-owning handle that resolves a [`Deferred`] from outside its
/// constructor closure.
///
/// The resolver upgrades its weak reference on every call; when the
/// consumer has dropped the cell, resolving becomes a silent no-op and the
/// produced result is discarded.
pub struct Resolver<T> {
    cell: Weak<Inner<T>>,
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Resolver {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Send + 'static> Resolver<T> {
    pub(crate) fn new(cell: Weak<Inner<T>>) -> Self {
        Resolver { cell }
    }

    /// Resolve with a value. No-op if the cell was dropped or already
    /// resolved.
    pub fn set(&self, value: T) {
        if let Some(cell) = self.upgrade() {
            cell.set(value);
        }
    }

    /// Resolve with an error. No-op if the cell was dropped or already
    /// resolved.
    pub fn set_error(&self, error: DataError) {
        if let Some(cell) = self.upgrade() {
            cell.set_error(error);
        }
    }

    /// Adopt the eventual result of `other`.
    pub fn set_from(&self, other: Deferred<T>) {
        if let Some(cell) = self.upgrade() {
            cell.set_from(other);
        }
    }

    /// Whether the consumer side still holds the cell.
    pub fn is_attached(&self) -> bool {
        self.cell.strong_count() > 0
    }

    fn upgrade(&self) -> Option<Deferred<T>> {
        self.cell.upgrade().map(Deferred::from_inner)
    }
}
