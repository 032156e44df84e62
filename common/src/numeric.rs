//! [`Numeric`]-related definitions.

use std::{cmp::Ordering, fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Decimal number remembering the [`Repr`]esentation it was given in.
///
/// Equality and ordering only consider the numeric value, so `150`, `150.0`
/// and `"150"` are all equal.
#[derive(Clone, Copy, Debug)]
pub struct Numeric {
    /// Value of this [`Numeric`].
    value: Decimal,

    /// [`Repr`]esentation of this [`Numeric`].
    repr: Repr,
}

/// Representation of a [`Numeric`] value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Repr {
    /// Integer number, like `150`.
    Integer,

    /// Floating-point number, like `30.5`.
    Float,

    /// Number written as a string, like `"30.12345"`.
    Text,
}

impl Numeric {
    /// Creates a new [`Numeric`] out of the provided `value` and [`Repr`].
    #[must_use]
    pub fn new(value: Decimal, repr: Repr) -> Self {
        Self { value, repr }
    }

    /// Returns the value of this [`Numeric`].
    #[must_use]
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns the [`Repr`]esentation of this [`Numeric`].
    #[must_use]
    pub fn repr(&self) -> Repr {
        self.repr
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::new(value.into(), Repr::Integer)
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Numeric {}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Numeric {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Integer => match self.value.to_i128() {
                Some(v) if self.value.is_integer() => write!(f, "{v}"),
                _ => write!(f, "{}", self.value),
            },
            Repr::Float => write!(f, "{}", self.value.normalize()),
            Repr::Text => write!(f, "{}", self.value),
        }
    }
}

impl FromStr for Numeric {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(|v| Self::new(v, Repr::Text))
            .map_err(|_| "invalid number")
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::fmt;

    use rust_decimal::{prelude::ToPrimitive as _, Decimal};
    use serde::{
        de::{self, Visitor},
        Deserialize, Deserializer, Serialize, Serializer,
    };

    use super::{Numeric, Repr};

    impl Serialize for Numeric {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            match self.repr {
                Repr::Integer => match self.value.to_i64() {
                    Some(v) if self.value.is_integer() => s.serialize_i64(v),
                    _ => s.serialize_str(&self.value.to_string()),
                },
                Repr::Float => match self.value.to_f64() {
                    Some(v) => s.serialize_f64(v),
                    None => s.serialize_str(&self.value.to_string()),
                },
                Repr::Text => s.serialize_str(&self.value.to_string()),
            }
        }
    }

    impl<'de> Deserialize<'de> for Numeric {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            d.deserialize_any(NumericVisitor)
        }
    }

    /// [`Visitor`] of a [`Numeric`].
    struct NumericVisitor;

    impl Visitor<'_> for NumericVisitor {
        type Value = Numeric;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Numeric::new(v.into(), Repr::Integer))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Numeric::new(v.into(), Repr::Integer))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Decimal::try_from(v)
                .map(|v| Numeric::new(v, Repr::Float))
                .map_err(|_| E::invalid_value(de::Unexpected::Float(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Numeric, Repr};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Numeric::from_str("30.12345").unwrap(),
            Numeric::new(decimal("30.12345"), Repr::Text),
        );
        assert_eq!(
            Numeric::from_str("-97.98765").unwrap().value(),
            decimal("-97.98765"),
        );
        assert_eq!(Numeric::from_str("150").unwrap().repr(), Repr::Text);

        assert!(Numeric::from_str("").is_err());
        assert!(Numeric::from_str("abc").is_err());
        assert!(Numeric::from_str("1.2.3").is_err());
    }

    #[test]
    fn equality_ignores_repr() {
        assert_eq!(
            Numeric::new(decimal("150"), Repr::Integer),
            Numeric::new(decimal("150.0"), Repr::Float),
        );
        assert_eq!(Numeric::from(150), Numeric::from_str("150").unwrap());
        assert_ne!(Numeric::from(150), Numeric::from(151));
    }

    #[test]
    fn to_string() {
        assert_eq!(Numeric::from(150).to_string(), "150");
        assert_eq!(
            Numeric::new(decimal("30.50"), Repr::Float).to_string(),
            "30.5",
        );
        assert_eq!(
            Numeric::new(decimal("30.12345"), Repr::Text).to_string(),
            "30.12345",
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn keeps_json_representation() {
        use serde_json::json;

        for input in [json!(150), json!("30.12345"), json!(-97.5)] {
            let num: Numeric = serde_json::from_value(input.clone()).unwrap();
            assert_eq!(serde_json::to_value(num).unwrap(), input);
        }

        assert!(serde_json::from_value::<Numeric>(json!("abc")).is_err());
        assert!(serde_json::from_value::<Numeric>(json!(true)).is_err());
    }
}
