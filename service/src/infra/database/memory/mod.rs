//! In-memory [`Database`] implementation.
//!
//! All the data lives in a single [`Storage`] guarded by a reader/writer
//! lock: [`NonTx`] operations lock it for each single operation, while a
//! [`Tx`] holds the exclusive lock from [`Transact`] until [`Commit`] (or
//! until dropped). Writes inside a [`Tx`] are applied to the [`Storage`]
//! immediately, so callers are expected to validate everything before the
//! first write.
//!
//! [`Commit`]: common::operations::Commit
//! [`Transact`]: common::operations::Transact

pub mod client;
mod impls;

use derive_more::{Deref, Display, Error as StdError};
use indexmap::IndexMap;

use crate::domain::{listing, Listing};
#[cfg(doc)]
use crate::infra::Database;

pub use self::client::{Connection, NonTx, Tx};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Data stored in a [`Memory`] database.
#[derive(Debug, Default)]
pub struct Storage {
    /// [`Listing`]s in their insertion order.
    listings: IndexMap<listing::Id, Listing>,

    /// Greatest [`listing::Id`] ever stored, even if deleted already.
    last_id: Option<listing::Id>,
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Operation is performed on an already committed [`Tx`].
    #[display("`Tx` is already committed")]
    TxCommitted,

    /// [`Listing`] with the same [`listing::Id`] is stored already.
    #[display("`Listing(id: {_0})` already exists")]
    UniqueViolation(#[error(not(source))] listing::Id),

    /// [`Listing`] to be updated is not stored.
    #[display("`Listing(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] listing::Id),

    /// No more [`listing::Id`]s can be assigned.
    #[display("`listing::Id`s are exhausted")]
    IdsExhausted,
}

impl Error {
    /// Checks whether this [`Error`] is a unique violation of a
    /// [`listing::Id`].
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }
}
