//! [`Command`] for deleting a [`Listing`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{listing, Listing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Listing`].
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteListing {
    /// ID of the [`Listing`] to be deleted.
    pub id: listing::Id,
}

impl<Db> Command<DeleteListing> for Service<Db>
where
    Db: Database<
        Delete<By<Option<Listing>, listing::Id>>,
        Ok = Option<Listing>,
        Err = Traced<database::Error>,
    >,
{
    /// [`Listing`] as it was right before the deletion.
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteListing) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteListing { id } = cmd;

        let listing = self
            .database()
            .execute(Delete(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(id))
            .map_err(tracerr::wrap!())?;

        log::debug!("`Listing(id: {id})` deleted");

        Ok(listing)
    }
}

/// Error of [`DeleteListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Listing`] doesn't exist.
    #[display("`Listing(id: {_0})` does not exist")]
    #[from(ignore)]
    ListingNotExists(#[error(not(source))] listing::Id),
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::{
        command::{CreateListing, DeleteListing},
        domain::listing,
        infra::Memory,
        query,
        read::listing::All,
        Command as _, Config, Service,
    };

    use super::ExecutionError;

    #[tokio::test]
    async fn returns_deleted_listing() {
        let svc = Service::new(Config::default(), Memory::new());
        let serde_json::Value::Object(payload) = json!({
            "id": 40285,
            "name": "Treehouse",
            "host_id": 3,
            "room_type": "Entire home/apt",
        }) else {
            unreachable!()
        };
        let created = svc.execute(CreateListing { payload }).await.unwrap();

        let deleted = svc
            .execute(DeleteListing::from(listing::Id::from(40285)))
            .await
            .unwrap();
        assert_eq!(deleted, created);

        assert!(svc
            .execute(query::listing::ById::by(listing::Id::from(40285)))
            .await
            .unwrap()
            .is_none());
        assert!(svc
            .execute(query::listings::All::by(All))
            .await
            .unwrap()
            .is_empty());

        let err = svc
            .execute(DeleteListing::from(listing::Id::from(40285)))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ListingNotExists(_)));
    }
}
