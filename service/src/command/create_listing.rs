//! [`Command`] for creating a new [`Listing`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{listing, Listing},
    infra::{database, Database},
    read::listing::NextId,
    Service,
};

use super::{Command, Payload};

/// [`Command`] for creating a new [`Listing`] out of a raw [`Payload`].
///
/// The [`Payload`] must contain all the [`Listing::REQUIRED_FIELDS`], except
/// `id` when [`Config::auto_assign_ids`] is enabled.
///
/// [`Config::auto_assign_ids`]: crate::Config::auto_assign_ids
#[derive(Clone, Debug, From)]
pub struct CreateListing {
    /// Fields of a new [`Listing`].
    pub payload: Payload,
}

impl<Db> Command<CreateListing> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Listing>, listing::Id>>,
            Ok = Option<Listing>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<listing::Id, NextId>>,
            Ok = listing::Id,
            Err = Traced<database::Error>,
        > + Database<Insert<Listing>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Listing;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateListing) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateListing { mut payload } = cmd;

        let assign_id = self.config().auto_assign_ids
            && payload.get("id").map_or(true, serde_json::Value::is_null);
        let missing = Listing::REQUIRED_FIELDS
            .into_iter()
            .filter(|&field| !(assign_id && field == "id"))
            .filter(|&field| {
                payload.get(field).map_or(true, serde_json::Value::is_null)
            })
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(tracerr::new!(E::IncompleteData(missing)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if assign_id {
            let id = tx
                .execute(Select(By::<listing::Id, _>::new(NextId)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            drop(payload.insert("id".into(), i64::from(id).into()));
        }

        let listing = serde_json::from_value::<Listing>(payload.into())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let existing = tx
            .execute(Select(By::<Option<Listing>, _>::new(listing.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::ListingExists(listing.id)));
        }

        tx.execute(Insert(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::debug!("`Listing(id: {})` created", listing.id);

        Ok(listing)
    }
}

/// Error of [`CreateListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Some of the required [`Listing`] fields are not provided.
    #[display("Required `Listing` fields are missing: {}", _0.join(", "))]
    #[from(ignore)]
    IncompleteData(#[error(not(source))] Vec<&'static str>),

    /// Provided fields don't form a valid [`Listing`].
    #[display("Invalid `Listing` data: {_0}")]
    InvalidData(serde_json::Error),

    /// [`Listing`] with the same [`listing::Id`] exists already.
    #[display("`Listing(id: {_0})` already exists")]
    #[from(ignore)]
    ListingExists(#[error(not(source))] listing::Id),
}
