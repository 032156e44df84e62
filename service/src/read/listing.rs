//! [`Listing`]-related read definitions.

#[cfg(doc)]
use crate::domain::Listing;

/// Selector of all the [`Listing`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct All;

/// Selector of the [`Id`] to assign to a new [`Listing`].
///
/// [`Id`]: crate::domain::listing::Id
#[derive(Clone, Copy, Debug, Default)]
pub struct NextId;

pub mod filter {
    //! [`Listing`] filter definitions.

    use derive_more::{Display, Error};
    use strum::{Display as StrumDisplay, EnumString};

    use crate::domain::Listing;

    /// [`Listing`] field allowed to be filtered by.
    #[derive(Clone, Copy, Debug, EnumString, Eq, Hash, PartialEq, StrumDisplay)]
    #[strum(serialize_all = "snake_case")]
    pub enum Field {
        /// [`Listing::neighbourhood`] field.
        Neighbourhood,

        /// [`Listing::host_id`] field.
        HostId,

        /// [`Listing::room_type`] field.
        RoomType,
    }

    /// Single exact-match [`Criteria`] condition.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Criterion {
        /// [`Field`] to match.
        pub field: Field,

        /// Value the [`Field`] must be equal to.
        pub value: String,
    }

    impl Criterion {
        /// Checks whether the provided [`Listing`] satisfies this
        /// [`Criterion`].
        #[must_use]
        pub fn matches(&self, listing: &Listing) -> bool {
            match self.field {
                Field::Neighbourhood => listing
                    .neighbourhood
                    .as_option()
                    .is_some_and(|n| n.to_string() == self.value),
                Field::HostId => listing.host_id.to_string() == self.value,
                Field::RoomType => {
                    self.value == AsRef::<str>::as_ref(&listing.room_type)
                }
            }
        }
    }

    /// Set of [`Criterion`]s all of which a [`Listing`] must satisfy.
    ///
    /// Empty [`Criteria`] match any [`Listing`].
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub struct Criteria(Vec<Criterion>);

    impl Criteria {
        /// Parses [`Criteria`] out of the provided key-value pairs.
        ///
        /// Pairs with an empty value impose no condition.
        ///
        /// # Errors
        ///
        /// If any of the keys is not a filterable [`Field`], even with an
        /// empty value. No partial [`Criteria`] are produced in such case.
        pub fn parse<K, V>(
            pairs: impl IntoIterator<Item = (K, V)>,
        ) -> Result<Self, UnknownField>
        where
            K: AsRef<str>,
            V: Into<String>,
        {
            pairs
                .into_iter()
                .filter_map(|(key, value)| {
                    let key = key.as_ref();
                    let Ok(field) = key.parse::<Field>() else {
                        return Some(Err(UnknownField(key.to_owned())));
                    };
                    let value = value.into();
                    (!value.is_empty()).then_some(Ok(Criterion { field, value }))
                })
                .collect::<Result<_, _>>()
                .map(Self)
        }

        /// Indicates whether these [`Criteria`] have no conditions.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        /// Checks whether the provided [`Listing`] satisfies all these
        /// [`Criteria`].
        #[must_use]
        pub fn matches(&self, listing: &Listing) -> bool {
            self.0.iter().all(|c| c.matches(listing))
        }
    }

    /// Error of [`Criteria`] referring a non-filterable field.
    #[derive(Clone, Debug, Display, Error)]
    #[display("`{_0}` is not a filterable `Listing` field")]
    pub struct UnknownField(#[error(not(source))] pub String);
}

pub mod search {
    //! [`Listing`] full-text search definitions.

    use crate::domain::Listing;

    /// Non-empty set of lowercased search terms.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Terms(Vec<String>);

    impl Terms {
        /// Creates new [`Terms`] out of the provided ones, ignoring blank
        /// terms.
        ///
        /// [`None`] is returned if no non-blank terms are provided.
        #[must_use]
        pub fn new<T: AsRef<str>>(
            terms: impl IntoIterator<Item = T>,
        ) -> Option<Self> {
            let terms = terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>();
            (!terms.is_empty()).then_some(Self(terms))
        }

        /// Checks whether every term of these [`Terms`] is contained
        /// (case-insensitively) in at least one text field of the provided
        /// [`Listing`].
        #[must_use]
        pub fn matches(&self, listing: &Listing) -> bool {
            let fields = listing
                .text_fields()
                .map(str::to_lowercase)
                .collect::<Vec<_>>();
            self.0
                .iter()
                .all(|term| fields.iter().any(|f| f.contains(term.as_str())))
        }
    }
}
