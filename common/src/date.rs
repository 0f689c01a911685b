//! Calendar date utilities.

use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use derive_more::{Debug, Display, Error};

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date in the `YYYY-MM-DD` format.
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`DateOf`] from its calendar components.
    ///
    /// # Errors
    ///
    /// Errors if the components do not form a valid date.
    pub fn from_calendar(
        year: i32,
        month: u8,
        day: u8,
    ) -> Result<Self, ParseError> {
        let month =
            time::Month::try_from(month).map_err(ParseError::ComponentRange)?;
        time::Date::from_calendar_date(year, month, day)
            .map(Self::from)
            .map_err(ParseError::ComponentRange)
    }

    /// Parses a [`DateOf`] from its `YYYY-MM-DD` representation.
    ///
    /// # Errors
    ///
    /// Errors if the `input` is not a valid `YYYY-MM-DD` date.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut parts = input.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseError::Format);
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(ParseError::Format);
        }

        Self::from_calendar(
            year.parse().map_err(|_| ParseError::Format)?,
            month.parse().map_err(|_| ParseError::Format)?,
            day.parse().map_err(|_| ParseError::Format)?,
        )
    }

    /// Coerces one kind of [`DateOf`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Input is not in the `YYYY-MM-DD` format.
    #[display("date must be in `YYYY-MM-DD` format")]
    Format,

    /// Parsed date has an out of range component.
    #[display("invalid date: {_0}")]
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> From<time::Date> for DateOf<Of> {
    fn from(inner: time::Date) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}

impl<Of: ?Sized> FromStr for DateOf<Of> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<Of: ?Sized> fmt::Display for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.inner.year(),
            u8::from(self.inner.month()),
            self.inner.day(),
        )
    }
}

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use std::borrow::Cow;

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::DateOf;

    impl<Of: ?Sized> Serialize for DateOf<Of> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de, Of: ?Sized> Deserialize<'de> for DateOf<Of> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Cow::<'de, str>::deserialize(deserializer)?;
            Self::parse(&raw).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    #[test]
    fn parses_calendar_dates() {
        let date = Date::parse("2003-01-01").unwrap();
        assert_eq!(date, Date::from_calendar(2003, 1, 1).unwrap());
        assert_eq!(date.to_string(), "2003-01-01");

        assert!(Date::parse("2024-02-29").is_ok());
        assert!(Date::parse("2023-02-29").is_err());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Date::parse("").is_err());
        assert!(Date::parse("2003-1-1").is_err());
        assert!(Date::parse("2003/01/01").is_err());
        assert!(Date::parse("2003-01-01-01").is_err());
        assert!(Date::parse("03-01-01").is_err());
        assert!(Date::parse("2003-13-01").is_err());
    }

    #[test]
    fn orders_chronologically() {
        let earlier = Date::parse("2003-01-01").unwrap();
        let later = Date::parse("2003-01-02").unwrap();
        assert!(earlier < later);
    }
}
