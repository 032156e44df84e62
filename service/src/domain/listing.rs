//! [`Listing`] definitions.

use std::fmt;

use common::{Date, Nullable, Numeric};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// Short-term rental listing.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// [`Name`] of this [`Listing`].
    pub name: Name,

    /// ID of the host offering this [`Listing`].
    pub host_id: HostId,

    /// Name of the host offering this [`Listing`].
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub host_name: Nullable<String>,

    /// [`Neighbourhood`] this [`Listing`] is located in.
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub neighbourhood: Nullable<Neighbourhood>,

    /// Latitude of this [`Listing`] location.
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub latitude: Nullable<Numeric>,

    /// Longitude of this [`Listing`] location.
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub longitude: Nullable<Numeric>,

    /// [`RoomType`] of this [`Listing`].
    pub room_type: RoomType,

    /// Price of a night in this [`Listing`].
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub price: Nullable<Numeric>,

    /// Minimum number of nights to book this [`Listing`] for.
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub minimum_nights: Nullable<i64>,

    /// Number of reviews left for this [`Listing`].
    ///
    /// Missing or `null` value means no reviews.
    #[serde(default, deserialize_with = "or_default")]
    pub number_of_reviews: u64,

    /// [`Date`] of the last review left for this [`Listing`].
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub last_review: Nullable<Date>,

    /// Number of days this [`Listing`] is available within a year.
    #[serde(default, skip_serializing_if = "Nullable::is_missing")]
    pub availability_365: Nullable<i64>,

    /// Any other [`Listing`] fields, kept as is.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Listing {
    /// Names of the fields required for a [`Listing`] to exist.
    pub const REQUIRED_FIELDS: [&'static str; 4] =
        ["id", "name", "host_id", "room_type"];

    /// Applies the provided [`Patch`] to this [`Listing`].
    ///
    /// Only the fields present in the [`Patch`] are overwritten.
    pub fn apply(&mut self, patch: Patch) {
        let Patch {
            name,
            host_id,
            host_name,
            neighbourhood,
            latitude,
            longitude,
            room_type,
            price,
            minimum_nights,
            number_of_reviews,
            last_review,
            availability_365,
            extra,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(host_id) = host_id {
            self.host_id = host_id;
        }
        if let Some(room_type) = room_type {
            self.room_type = room_type;
        }
        if let Some(number_of_reviews) = number_of_reviews {
            self.number_of_reviews = number_of_reviews;
        }
        self.host_name.merge(host_name);
        self.neighbourhood.merge(neighbourhood);
        self.latitude.merge(latitude);
        self.longitude.merge(longitude);
        self.price.merge(price);
        self.minimum_nights.merge(minimum_nights);
        self.last_review.merge(last_review);
        self.availability_365.merge(availability_365);
        self.extra.extend(extra);
    }

    /// Returns all the text fields of this [`Listing`] being searchable.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [
            Some::<&str>(self.name.as_ref()),
            Some(self.room_type.as_ref()),
            self.host_name.as_option().map(String::as_str),
            self.neighbourhood.as_option().and_then(Neighbourhood::as_name),
        ]
        .into_iter()
        .flatten()
        .chain(self.extra.values().filter_map(serde_json::Value::as_str))
    }
}

/// Unknown [`Listing`] fields.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Partial update of a [`Listing`].
///
/// Required [`Listing`] fields may be omitted, but never `null`ed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Patch {
    /// New [`Name`] of a [`Listing`].
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Name>,

    /// New [`HostId`] of a [`Listing`].
    #[serde(default, deserialize_with = "present")]
    pub host_id: Option<HostId>,

    /// New host name of a [`Listing`].
    #[serde(default)]
    pub host_name: Nullable<String>,

    /// New [`Neighbourhood`] of a [`Listing`].
    #[serde(default)]
    pub neighbourhood: Nullable<Neighbourhood>,

    /// New latitude of a [`Listing`].
    #[serde(default)]
    pub latitude: Nullable<Numeric>,

    /// New longitude of a [`Listing`].
    #[serde(default)]
    pub longitude: Nullable<Numeric>,

    /// New [`RoomType`] of a [`Listing`].
    #[serde(default, deserialize_with = "present")]
    pub room_type: Option<RoomType>,

    /// New price of a [`Listing`].
    #[serde(default)]
    pub price: Nullable<Numeric>,

    /// New minimum number of nights of a [`Listing`].
    #[serde(default)]
    pub minimum_nights: Nullable<i64>,

    /// New number of reviews of a [`Listing`].
    ///
    /// `null` leaves the current value untouched.
    #[serde(default)]
    pub number_of_reviews: Option<u64>,

    /// New last review [`Date`] of a [`Listing`].
    #[serde(default)]
    pub last_review: Nullable<Date>,

    /// New availability of a [`Listing`].
    #[serde(default)]
    pub availability_365: Nullable<i64>,

    /// Any other fields to set.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Deserializes a value, falling back to its default on `null`.
fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

/// Deserializes a value which must not be `null` once provided.
fn present<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}

/// ID of a [`Listing`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct Id(i64);

impl Id {
    /// Returns the [`Id`] following this one.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

/// ID of a [`Listing`] host.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[serde(transparent)]
pub struct HostId(i64);

/// Name of a [`Listing`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        !name.as_ref().trim().is_empty()
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Self::new(String::deserialize(d)?).ok_or_else(|| {
            serde::de::Error::custom("`name` must not be empty")
        })
    }
}

/// Room type of a [`Listing`], like `Entire home/apt` or `Private room`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(forward)]
#[serde(transparent)]
pub struct RoomType(String);

impl RoomType {
    /// Creates a new [`RoomType`] if the given `kind` is valid.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Option<Self> {
        let kind = kind.into();
        Self::check(&kind).then_some(Self(kind))
    }

    /// Checks whether the given `kind` is a valid [`RoomType`].
    fn check(kind: impl AsRef<str>) -> bool {
        !kind.as_ref().trim().is_empty()
    }
}

impl FromStr for RoomType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `RoomType`")
    }
}

impl<'de> Deserialize<'de> for RoomType {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Self::new(String::deserialize(d)?).ok_or_else(|| {
            serde::de::Error::custom("`room_type` must not be empty")
        })
    }
}

/// Neighbourhood of a [`Listing`], either a numeric code (like a zip code)
/// or a name.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Neighbourhood {
    /// Numeric neighbourhood code.
    Code(i64),

    /// Neighbourhood name.
    Name(String),
}

impl Neighbourhood {
    /// Returns the name of this [`Neighbourhood`], if it's a named one.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Code(_) => None,
        }
    }
}

impl fmt::Display for Neighbourhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Nullable;
    use serde_json::json;

    use super::{Listing, Neighbourhood, Patch};

    fn listing() -> Listing {
        serde_json::from_value(json!({
            "id": 9999,
            "name": "New Listing",
            "host_id": 12345,
            "host_name": "John Doe",
            "neighbourhood": 78701,
            "latitude": "30.12345",
            "longitude": "-97.98765",
            "room_type": "Entire home/apt",
            "price": 150,
            "minimum_nights": 3,
            "number_of_reviews": 0,
            "last_review": null,
            "availability_365": 365,
        }))
        .unwrap()
    }

    #[test]
    fn echoes_json_as_is() {
        let input = json!({
            "id": 9999,
            "name": "New Listing",
            "host_id": 12345,
            "host_name": "John Doe",
            "neighbourhood": 78701,
            "latitude": "30.12345",
            "longitude": "-97.98765",
            "room_type": "Entire home/apt",
            "price": 150,
            "minimum_nights": 3,
            "number_of_reviews": 0,
            "last_review": null,
            "availability_365": 365,
            "license": "STR-123",
        });

        let listing: Listing = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(listing.last_review, Nullable::Null);
        assert_eq!(listing.neighbourhood, Nullable::Present(Neighbourhood::Code(78701)));
        assert_eq!(listing.extra["license"], json!("STR-123"));

        assert_eq!(serde_json::to_value(&listing).unwrap(), input);
    }

    #[test]
    fn defaults_number_of_reviews() {
        let listing: Listing = serde_json::from_value(json!({
            "id": 1,
            "name": "Cozy room",
            "host_id": 2,
            "room_type": "Private room",
        }))
        .unwrap();

        assert_eq!(listing.number_of_reviews, 0);
        assert!(listing.host_name.is_missing());
        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            json!({
                "id": 1,
                "name": "Cozy room",
                "host_id": 2,
                "room_type": "Private room",
                "number_of_reviews": 0,
            }),
        );
    }

    #[test]
    fn null_number_of_reviews_means_none() {
        let listing: Listing = serde_json::from_value(json!({
            "id": 1,
            "name": "Cozy room",
            "host_id": 2,
            "room_type": "Private room",
            "number_of_reviews": null,
        }))
        .unwrap();
        assert_eq!(listing.number_of_reviews, 0);

        let mut reviewed = listing.clone();
        reviewed.number_of_reviews = 7;
        reviewed.apply(
            serde_json::from_value(json!({"number_of_reviews": null})).unwrap(),
        );
        assert_eq!(reviewed.number_of_reviews, 7);

        assert!(serde_json::from_value::<Listing>(json!({
            "id": 1,
            "name": "Cozy room",
            "host_id": 2,
            "room_type": "Private room",
            "number_of_reviews": -1,
        }))
        .is_err());
    }

    #[test]
    fn rejects_invalid_fields() {
        for input in [
            json!({"id": 1, "name": "", "host_id": 2, "room_type": "Private room"}),
            json!({"id": 1, "name": "A", "host_id": "x", "room_type": "Private room"}),
            json!({"id": 1, "name": "A", "host_id": 2, "room_type": " "}),
            json!({"id": "1", "name": "A", "host_id": 2, "room_type": "Private room"}),
            json!({"id": 1, "name": "A", "host_id": 2, "room_type": "Private room", "last_review": "yesterday"}),
        ] {
            assert!(serde_json::from_value::<Listing>(input).is_err());
        }
    }

    #[test]
    fn applies_only_patched_fields() {
        let mut listing = listing();
        let before = listing.clone();

        let patch: Patch = serde_json::from_value(json!({
            "price": 175.5,
            "minimum_nights": 5,
            "host_name": null,
            "license": "STR-456",
        }))
        .unwrap();
        listing.apply(patch);

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["price"], json!(175.5));
        assert_eq!(json["minimum_nights"], json!(5));
        assert_eq!(json["host_name"], json!(null));
        assert_eq!(json["license"], json!("STR-456"));

        assert_eq!(listing.id, before.id);
        assert_eq!(listing.name, before.name);
        assert_eq!(listing.latitude, before.latitude);
        assert_eq!(listing.availability_365, before.availability_365);
        assert_eq!(json["latitude"], json!("30.12345"));
    }

    #[test]
    fn patch_cannot_null_required_fields() {
        for input in [
            json!({"name": null}),
            json!({"host_id": null}),
            json!({"room_type": null}),
            json!({"name": ""}),
        ] {
            assert!(serde_json::from_value::<Patch>(input).is_err());
        }
    }

    #[test]
    fn text_fields() {
        let mut listing = listing();
        listing.neighbourhood = Nullable::Present(Neighbourhood::Name("Zilker".into()));
        drop(listing.extra.insert("summary".into(), json!("Quiet street")));
        drop(listing.extra.insert("beds".into(), json!(2)));

        assert_eq!(
            listing.text_fields().collect::<Vec<_>>(),
            ["New Listing", "Entire home/apt", "John Doe", "Zilker", "Quiet street"],
        );
    }
}
