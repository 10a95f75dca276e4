//! Domain primitives for the catalog.
//!
//! [`UserId`] carries the authenticated account through the services, and
//! [`ContentType`] replaces the raw `1`/`2` discriminator stored in
//! `movies.content_type`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an end user (`user_web.id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of catalog item.
///
/// Stored as an integer: `1` for films, `2` for series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Film,
    Series,
}

impl ContentType {
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Film => 1,
            Self::Series => 2,
        }
    }

    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Film),
            2 => Some(Self::Series),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Film => "movie",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `status` value of an item or banner that is visible to the public API.
pub const STATUS_ACTIVE: i32 = 1;

/// `status` value of a hidden item or banner.
pub const STATUS_INACTIVE: i32 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_serializes_as_plain_integer() {
        let id = UserId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn content_type_round_trip() {
        assert_eq!(ContentType::from_i32(1), Some(ContentType::Film));
        assert_eq!(ContentType::from_i32(2), Some(ContentType::Series));
        assert_eq!(ContentType::from_i32(3), None);
        assert_eq!(ContentType::Series.as_i32(), 2);
        assert_eq!(ContentType::Film.to_string(), "movie");
    }
}
