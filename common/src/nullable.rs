//! [`Nullable`] field definitions.

/// Optional field distinguishing a missing value from an explicit `null`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Nullable<T> {
    /// Value is not provided at all.
    Missing,

    /// Value is explicitly provided as `null`.
    Null,

    /// Value is provided.
    Present(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> Nullable<T> {
    /// Indicates whether this [`Nullable`] is [`Nullable::Missing`].
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Indicates whether this [`Nullable`] holds a value.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns the value of this [`Nullable`], if any.
    #[must_use]
    pub const fn as_option(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Missing | Self::Null => None,
        }
    }

    /// Converts this [`Nullable`] into an [`Option`], treating both
    /// [`Nullable::Missing`] and [`Nullable::Null`] as [`None`].
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Missing | Self::Null => None,
        }
    }

    /// Overwrites this [`Nullable`] with the provided `patch`, unless it's
    /// [`Nullable::Missing`].
    pub fn merge(&mut self, patch: Self) {
        if !patch.is_missing() {
            *self = patch;
        }
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Present)
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.
    //!
    //! [`Nullable::Missing`] fields are expected to be skipped with
    //! `#[serde(default, skip_serializing_if = "Nullable::is_missing")]`.

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Nullable;

    impl<T: Serialize> Serialize for Nullable<T> {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Present(v) => s.serialize_some(v),
                Self::Missing | Self::Null => s.serialize_none(),
            }
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            Option::<T>::deserialize(d).map(Into::into)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Nullable;

    #[test]
    fn merge_keeps_value_on_missing_patch() {
        let mut field = Nullable::Present(1);
        field.merge(Nullable::Missing);
        assert_eq!(field, Nullable::Present(1));

        field.merge(Nullable::Present(2));
        assert_eq!(field, Nullable::Present(2));

        field.merge(Nullable::Null);
        assert_eq!(field, Nullable::Null);
    }

    #[test]
    fn into_option() {
        assert_eq!(Nullable::Present(1).into_option(), Some(1));
        assert_eq!(Nullable::<i32>::Null.into_option(), None);
        assert_eq!(Nullable::<i32>::Missing.into_option(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn distinguishes_null_from_missing() {
        use serde::{Deserialize, Serialize};
        use serde_json::json;

        #[derive(Deserialize, Serialize)]
        struct Record {
            #[serde(default, skip_serializing_if = "Nullable::is_missing")]
            field: Nullable<i32>,
        }

        for input in [json!({}), json!({"field": null}), json!({"field": 3})] {
            let record: Record = serde_json::from_value(input.clone()).unwrap();
            assert_eq!(serde_json::to_value(&record).unwrap(), input);
        }
    }
}
