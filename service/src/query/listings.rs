//! [`Query`] collection related to multiple [`Listing`]s.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::Listing,
    infra::{database, Database},
    read::listing::{self as read, filter, search},
    Service,
};

use super::{DatabaseQuery, Query};

/// Queries all the [`Listing`]s in their insertion order.
pub type All = DatabaseQuery<By<Vec<Listing>, read::All>>;

/// Queries [`Listing`]s exactly matching all the provided key-value
/// parameters.
///
/// Only [`filter::Field`]s are allowed as keys.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Raw key-value parameters to filter by.
    pub params: Vec<(String, String)>,
}

impl<Db> Query<Filter> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Listing>, filter::Criteria>>,
        Ok = Vec<Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Listing>;
    type Err = Traced<FilterError>;

    async fn execute(&self, query: Filter) -> Result<Self::Ok, Self::Err> {
        let criteria = filter::Criteria::parse(query.params)
            .map_err(tracerr::from_and_wrap!(=> FilterError))?;

        self.database()
            .execute(Select(By::new(criteria)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> FilterError))
    }
}

/// Error of [`Filter`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum FilterError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Filter parameters refer a non-filterable field.
    #[display("Invalid query parameters: {_0}")]
    InvalidQuery(filter::UnknownField),
}

/// Queries [`Listing`]s containing all the provided terms in their text
/// fields.
#[derive(Clone, Debug, Default)]
pub struct Search {
    /// Terms to search for, if provided.
    pub terms: Option<Vec<String>>,
}

impl<Db> Query<Search> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Listing>, search::Terms>>,
        Ok = Vec<Listing>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Listing>;
    type Err = Traced<SearchError>;

    async fn execute(&self, query: Search) -> Result<Self::Ok, Self::Err> {
        let terms = search::Terms::new(query.terms.into_iter().flatten())
            .ok_or(SearchError::MissingSearchTerms)
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Select(By::new(terms)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> SearchError))
    }
}

/// Error of [`Search`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum SearchError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// No search terms are provided.
    #[display("Search terms not provided")]
    #[from(ignore)]
    MissingSearchTerms,
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::{
        command::CreateListing,
        domain::Listing,
        infra::Memory,
        read::listing::All,
        Command as _, Config, Service,
    };

    use super::{Filter, FilterError, Search, SearchError};

    async fn service() -> Service<Memory> {
        let svc = Service::new(Config::default(), Memory::new());
        for listing in [
            json!({
                "id": 323733,
                "name": "Guesthouse in Austin · ★4.92 · 1 bedroom · 2 beds · 1 bath",
                "host_id": 1798084,
                "host_name": "Sarah",
                "neighbourhood": 78704,
                "room_type": "Entire home/apt",
            }),
            json!({
                "id": 325889,
                "name": "Home in Austin · 2 bedrooms · 3 beds · 2 baths",
                "host_id": 1798084,
                "host_name": "Sarah",
                "neighbourhood": 78704,
                "room_type": "Private room",
            }),
            json!({
                "id": 40285,
                "name": "Guesthouse in Austin · 1 bedroom · 1 bed · 1 bath",
                "host_id": 172536,
                "host_name": "Mark",
                "neighbourhood": 78702,
                "room_type": "Entire home/apt",
            }),
        ] {
            let serde_json::Value::Object(payload) = listing else {
                unreachable!()
            };
            drop(svc.execute(CreateListing { payload }).await.unwrap());
        }
        svc
    }

    fn ids(listings: &[Listing]) -> Vec<i64> {
        listings.iter().map(|l| l.id.into()).collect()
    }

    fn params(pairs: &[(&str, &str)]) -> Filter {
        Filter {
            params: pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn filters_by_all_criteria() {
        let svc = service().await;

        let found = svc
            .execute(params(&[
                ("neighbourhood", "78704"),
                ("host_id", "1798084"),
                ("room_type", "Entire home/apt"),
            ]))
            .await
            .unwrap();
        assert_eq!(ids(&found), [323733]);

        let found = svc
            .execute(params(&[
                ("neighbourhood", "78704"),
                ("host_id", "1798084"),
                ("room_type", "Entire home"),
            ]))
            .await
            .unwrap();
        assert!(found.is_empty());

        let found = svc
            .execute(params(&[("room_type", "Entire home/apt")]))
            .await
            .unwrap();
        assert_eq!(ids(&found), [323733, 40285]);
    }

    #[tokio::test]
    async fn empty_filter_lists_all() {
        let svc = service().await;

        let filtered = svc.execute(Filter::default()).await.unwrap();
        let all = svc
            .execute(super::All::by(All))
            .await
            .unwrap();
        assert_eq!(filtered, all);
        assert_eq!(ids(&all), [323733, 325889, 40285]);
    }

    #[tokio::test]
    async fn rejects_unknown_filter_params() {
        let svc = service().await;

        for pairs in [
            &[("invalid_param", "value")][..],
            &[("host_id", "1798084"), ("price", "150")][..],
        ] {
            let err = svc.execute(params(pairs)).await.unwrap_err();
            assert!(matches!(err.as_ref(), FilterError::InvalidQuery(_)));
        }
    }

    #[tokio::test]
    async fn searches_by_all_terms() {
        let svc = service().await;

        let found = svc
            .execute(Search {
                terms: Some(
                    ["Guesthouse", "1 bedroom", "2 beds", "1 bath"]
                        .map(String::from)
                        .to_vec(),
                ),
            })
            .await
            .unwrap();
        assert_eq!(ids(&found), [323733]);

        let found = svc
            .execute(Search {
                terms: Some(vec!["sarah".into()]),
            })
            .await
            .unwrap();
        assert_eq!(ids(&found), [323733, 325889]);

        let found = svc
            .execute(Search {
                terms: Some(vec!["sarah".into(), "castle".into()]),
            })
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn adding_terms_never_widens_results() {
        let svc = service().await;

        let mut terms = Vec::new();
        let mut previous = usize::MAX;
        for term in ["austin", "guesthouse", "1 bath", "2 beds"] {
            terms.push(term.to_owned());
            let found = svc
                .execute(Search {
                    terms: Some(terms.clone()),
                })
                .await
                .unwrap();
            assert!(found.len() <= previous);
            previous = found.len();
        }
    }

    #[tokio::test]
    async fn requires_search_terms() {
        let svc = service().await;

        for terms in [None, Some(vec![]), Some(vec![" ".to_owned()])] {
            let err = svc.execute(Search { terms }).await.unwrap_err();
            assert!(matches!(err.as_ref(), SearchError::MissingSearchTerms));
        }
    }
}
