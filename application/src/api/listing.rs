//! Listing-related REST API handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _, Payload},
    domain::{listing, Listing},
    query,
    read,
};

use crate::{define_error, error::RequestError, AsError, Error, Service};

define_error! {
    /// Shared by all the listing handlers.
    enum ListingError {
        #[code = "LISTING_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Listing not found"]
        NotFound,

        #[code = "INCOMPLETE_DATA"]
        #[status = BAD_REQUEST]
        #[message = "Incomplete data provided"]
        IncompleteData,

        #[code = "INVALID_DATA"]
        #[status = BAD_REQUEST]
        #[message = "Invalid data provided"]
        InvalidData,

        #[code = "LISTING_ALREADY_EXISTS"]
        #[status = CONFLICT]
        #[message = "Listing already exists"]
        AlreadyExists,
    }
}

/// Result of a successful listing mutation.
#[derive(Debug, Serialize)]
pub struct Mutated {
    /// Human-readable outcome of the mutation.
    pub message: &'static str,

    /// Listing as it is after the mutation (or right before the deletion).
    pub listing: Listing,
}

/// Body of a listing search request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchRequest {
    /// Terms every found listing must contain.
    #[serde(default)]
    pub search_terms: Option<Vec<String>>,
}

/// Parses a [`listing::Id`] out of the raw path segment.
///
/// Non-integer IDs cannot identify any listing.
fn parse_id(raw: &str) -> Result<listing::Id, Error> {
    raw.parse().map_err(|_| ListingError::NotFound.into())
}

/// Lists all the listings in their insertion order.
#[tracing::instrument(skip_all, fields(http.handler = "list_listings"))]
pub async fn list(
    Extension(service): Extension<Service>,
) -> Result<Json<Vec<Listing>>, Error> {
    service
        .execute(query::listings::All::by(read::listing::All))
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Returns the listing with the provided ID.
///
/// # Errors
///
/// Possible error codes:
/// - `LISTING_NOT_FOUND` - no listing with the provided ID exists.
#[tracing::instrument(
    skip_all,
    fields(http.handler = "get_listing", id = %id),
)]
pub async fn get(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, Error> {
    let id = parse_id(&id)?;
    service
        .execute(query::listing::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(Json)
        .ok_or_else(|| ListingError::NotFound.into())
}

/// Lists the listings exactly matching all the provided query parameters.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_QUERY_PARAMETERS` - a parameter is not a filterable field.
#[tracing::instrument(skip_all, fields(http.handler = "filter_listings"))]
pub async fn filter(
    Extension(service): Extension<Service>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Listing>>, Error> {
    let Query(params) = params.map_err(AsError::into_error)?;
    service
        .execute(query::listings::Filter { params })
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Lists the listings containing all the provided search terms.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_JSON_BODY` - request body is not a valid [`SearchRequest`];
/// - `SEARCH_TERMS_NOT_PROVIDED` - no non-blank search terms are provided.
#[tracing::instrument(skip_all, fields(http.handler = "search_listings"))]
pub async fn search(
    Extension(service): Extension<Service>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<Vec<Listing>>, Error> {
    let Json(SearchRequest { search_terms }) =
        body.map_err(AsError::into_error)?;
    service
        .execute(query::listings::Search {
            terms: search_terms,
        })
        .await
        .map(Json)
        .map_err(AsError::into_error)
}

/// Creates a new listing out of the provided fields.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_JSON_BODY` - request body is not a JSON object;
/// - `INCOMPLETE_DATA` - some of the required fields are missing;
/// - `INVALID_DATA` - some of the fields have invalid values;
/// - `LISTING_ALREADY_EXISTS` - listing with the provided ID exists already.
#[tracing::instrument(skip_all, fields(http.handler = "create_listing"))]
pub async fn create(
    Extension(service): Extension<Service>,
    body: Result<Json<Payload>, JsonRejection>,
) -> Result<(http::StatusCode, Json<Mutated>), Error> {
    let Json(payload) = body.map_err(AsError::into_error)?;
    let listing = service
        .execute(command::CreateListing { payload })
        .await
        .map_err(AsError::into_error)?;

    Ok((
        http::StatusCode::CREATED,
        Json(Mutated {
            message: "Listing created successfully",
            listing,
        }),
    ))
}

/// Overwrites the provided fields of the listing with the provided ID.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_JSON_BODY` - request body is not a JSON object;
/// - `LISTING_NOT_FOUND` - no listing with the provided ID exists;
/// - `INVALID_DATA` - some of the fields have invalid values.
#[tracing::instrument(
    skip_all,
    fields(http.handler = "update_listing", id = %id),
)]
pub async fn update(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
    body: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<Mutated>, Error> {
    let id = parse_id(&id)?;
    let Json(patch) = body.map_err(AsError::into_error)?;
    let listing = service
        .execute(command::UpdateListing { id, patch })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Mutated {
        message: "Listing updated successfully",
        listing,
    }))
}

/// Deletes the listing with the provided ID.
///
/// # Errors
///
/// Possible error codes:
/// - `LISTING_NOT_FOUND` - no listing with the provided ID exists.
#[tracing::instrument(
    skip_all,
    fields(http.handler = "delete_listing", id = %id),
)]
pub async fn delete(
    Extension(service): Extension<Service>,
    Path(id): Path<String>,
) -> Result<Json<Mutated>, Error> {
    let id = parse_id(&id)?;
    let listing = service
        .execute(command::DeleteListing { id })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Mutated {
        message: "Listing deleted successfully",
        listing,
    }))
}

impl AsError for command::create_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::IncompleteData(_) => Some(ListingError::IncompleteData.into()),
            Self::InvalidData(_) => Some(ListingError::InvalidData.into()),
            Self::ListingExists(_) => Some(ListingError::AlreadyExists.into()),
        }
    }
}

impl AsError for command::update_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => Some(ListingError::NotFound.into()),
            Self::InvalidData(_) => Some(ListingError::InvalidData.into()),
        }
    }
}

impl AsError for command::delete_listing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ListingNotExists(_) => Some(ListingError::NotFound.into()),
        }
    }
}

impl AsError for query::listings::FilterError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidQuery(_) => {
                Some(RequestError::InvalidQueryParameters.into())
            }
        }
    }
}

impl AsError for query::listings::SearchError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "SEARCH_TERMS_NOT_PROVIDED"]
                #[status = BAD_REQUEST]
                #[message = "Search terms not provided"]
                MissingSearchTerms,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::MissingSearchTerms => Some(Error::MissingSearchTerms.into()),
        }
    }
}
