//! [`Memory`] database client definitions.

use std::{future::Future, sync::Arc};

use common::operations::{Commit, Transact};
use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock};
use tracerr::Traced;

use crate::infra::{
    database::{self, memory},
    Database,
};

use super::{Memory, Storage};

/// Generic access to a [`Storage`].
pub trait Connection {
    /// Runs the provided function with a shared access to the [`Storage`].
    ///
    /// # Errors
    ///
    /// If the [`Storage`] cannot be accessed.
    fn read<R>(
        &self,
        f: impl FnOnce(&Storage) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Runs the provided function with an exclusive access to the
    /// [`Storage`].
    ///
    /// # Errors
    ///
    /// If the [`Storage`] cannot be accessed.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut Storage) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

/// Non-transactional [`Memory`] client, locking the [`Storage`] for each
/// operation separately.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Shared [`Storage`].
    storage: Arc<RwLock<Storage>>,
}

impl Connection for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&Storage) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&*self.storage.read().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Storage) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&mut *self.storage.write().await))
    }
}

/// Transactional [`Memory`] client, holding the exclusive lock of the
/// [`Storage`] until committed.
#[derive(Debug)]
pub struct Tx {
    /// Exclusive lock of the [`Storage`], released on [`Commit`].
    guard: Mutex<Option<OwnedRwLockWriteGuard<Storage>>>,
}

impl Connection for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&Storage) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.write(|s| f(s)).await
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Storage) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let mut guard = self.guard.lock().await;
        let storage = guard
            .as_deref_mut()
            .ok_or(memory::Error::TxCommitted)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(f(storage))
    }
}

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let guard = Arc::clone(&self.storage).write_owned().await;
        Ok(Memory(Tx {
            guard: Mutex::new(Some(guard)),
        }))
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.guard
            .lock()
            .await
            .take()
            .map(drop)
            .ok_or(memory::Error::TxCommitted)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{Commit, Transact};
    use tokio::time;

    use crate::infra::{
        database::{self, memory},
        Database as _, Memory,
    };

    use super::Connection as _;

    #[tokio::test]
    async fn tx_excludes_other_access() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        assert!(
            time::timeout(Duration::from_millis(50), db.read(|_| ()))
                .await
                .is_err(),
            "read must wait for the `Tx` to commit",
        );

        tx.execute(Commit).await.unwrap();
        time::timeout(Duration::from_millis(50), db.read(|_| ()))
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn committed_tx_is_closed() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Commit).await.unwrap();

        let err = tx.read(|_| ()).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(memory::Error::TxCommitted),
        ));
        assert!(tx.execute(Commit).await.is_err());
    }

    #[tokio::test]
    async fn dropped_tx_releases_lock() {
        let db = Memory::new();

        drop(db.execute(Transact).await.unwrap());
        time::timeout(Duration::from_millis(50), db.write(|_| ()))
            .await
            .unwrap()
            .unwrap();
    }
}
