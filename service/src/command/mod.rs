//! [`Command`] definition.

pub mod create_listing;
pub mod delete_listing;
pub mod update_listing;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_listing::CreateListing, delete_listing::DeleteListing,
    update_listing::UpdateListing,
};

/// Raw fields of a [`Listing`] as provided by a client.
///
/// [`Listing`]: crate::domain::Listing
pub type Payload = serde_json::Map<String, serde_json::Value>;
