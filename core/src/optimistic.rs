//! Reversible optimistic updates over keyed lists.
//!
//! An optimistic update has four steps: snapshot the entry, apply the
//! speculative value, run the remote operation, then either replace the entry
//! with the server-confirmed value or restore the snapshot. [`Speculation`]
//! carries everything needed for the last step, so a reducer can park it in
//! state while the remote call is in flight.
//!
//! Only the entry the speculation was opened for is touched on commit or
//! rollback. Other entries may have changed in the meantime and are left as
//! they are.
//!
//! # Example
//!
//! ```
//! use optimist_core::optimistic::{Keyed, Speculation};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Item { id: u32, done: bool }
//!
//! impl Keyed for Item {
//!     type Key = u32;
//!     fn key(&self) -> u32 { self.id }
//! }
//!
//! let mut items = vec![Item { id: 1, done: false }];
//! let (speculation, speculative) =
//!     Speculation::modify(&mut items, &1, |item| item.done = true).unwrap();
//! assert!(speculative.done);
//! assert!(items[0].done);
//!
//! // The server rejected the change
//! speculation.rollback(&mut items);
//! assert!(!items[0].done);
//! ```

use std::fmt::Debug;

/// An entry that can be located in a list by key
pub trait Keyed {
    /// Identity of the entry
    type Key: Clone + PartialEq + Debug;

    /// Returns the entry's key
    fn key(&self) -> Self::Key;
}

/// A speculative change to one entry of a list, with the value to restore
///
/// `prior` is `None` when the speculation inserted a provisional entry; in
/// that case rolling back removes the entry again.
#[derive(Clone, Debug, PartialEq)]
pub struct Speculation<T: Keyed> {
    key: T::Key,
    prior: Option<T>,
}

impl<T: Keyed + Clone> Speculation<T> {
    /// Append a provisional entry
    pub fn insert(items: &mut Vec<T>, provisional: T) -> Self {
        let key = provisional.key();
        items.push(provisional);
        Self { key, prior: None }
    }

    /// Apply `change` in place to the entry with `key`
    ///
    /// Returns the speculation and a copy of the speculative value, or `None`
    /// when no entry has that key.
    pub fn modify<F>(items: &mut [T], key: &T::Key, change: F) -> Option<(Self, T)>
    where
        F: FnOnce(&mut T),
    {
        let entry = items.iter_mut().find(|item| item.key() == *key)?;
        let prior = entry.clone();
        change(entry);

        Some((
            Self {
                key: key.clone(),
                prior: Some(prior),
            },
            entry.clone(),
        ))
    }

    /// Key of the entry this speculation was opened for
    #[must_use]
    pub const fn key(&self) -> &T::Key {
        &self.key
    }

    /// Value the entry had before the speculative change
    #[must_use]
    pub const fn prior(&self) -> Option<&T> {
        self.prior.as_ref()
    }

    /// Replace the speculative entry with the confirmed value
    ///
    /// The confirmed value may carry a different key (a server-assigned id
    /// replacing a provisional one). Returns `false` when the entry is no
    /// longer in the list.
    pub fn commit(self, items: &mut [T], confirmed: T) -> bool {
        match items.iter_mut().find(|item| item.key() == self.key) {
            Some(entry) => {
                *entry = confirmed;
                true
            },
            None => false,
        }
    }

    /// Undo the speculative change
    ///
    /// Restores the prior value, or removes a provisional entry. Returns
    /// `false` when the entry is no longer in the list.
    pub fn rollback(self, items: &mut Vec<T>) -> bool {
        let Some(position) = items.iter().position(|item| item.key() == self.key) else {
            return false;
        };

        match self.prior {
            Some(prior) => items[position] = prior,
            None => {
                items.remove(position);
            },
        }
        true
    }
}
