//! [`Date`]-related definitions.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
use time::{format_description::FormatItem, macros::format_description};

/// Format of a [`Date`] string.
const FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date without a time part, like `2019-11-22`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

#[cfg(test)]
impl Date {
    /// Creates a new [`Date`] out of the provided `year`, `month` and `day`.
    ///
    /// [`None`] is returned if the provided components don't form a valid
    /// date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, FORMAT).map(Self).map_err(ParseError)
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `Date`: {_0}")]
pub struct ParseError(time::error::Parse);

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::Date;

    impl Serialize for Date {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Date {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let s = <std::borrow::Cow<'de, str>>::deserialize(d)?;
            s.parse().map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Date;

    #[test]
    fn from_str() {
        assert_eq!(
            Date::from_str("2019-11-22").unwrap(),
            Date::from_ymd(2019, 11, 22).unwrap(),
        );

        assert!(Date::from_str("2019-02-30").is_err());
        assert!(Date::from_str("22.11.2019").is_err());
        assert!(Date::from_str("2019-11-22T00:00:00Z").is_err());
        assert!(Date::from_str("").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(Date::from_ymd(2019, 11, 22).unwrap().to_string(), "2019-11-22");
        assert_eq!(Date::from_ymd(2023, 1, 5).unwrap().to_string(), "2023-01-05");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_string() {
        use serde_json::json;

        let date: Date = serde_json::from_value(json!("2023-01-05")).unwrap();
        assert_eq!(serde_json::to_value(date).unwrap(), json!("2023-01-05"));
        assert!(serde_json::from_value::<Date>(json!(20230105)).is_err());
    }
}
