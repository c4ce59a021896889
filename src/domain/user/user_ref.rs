//! Reference to a user either by id or by username

use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use super::entity::UserId;

/// A user reference as supplied by a client.
///
/// Digit-only strings and JSON integers are ids, anything else is a username.
/// Usernames may never be digit-only, so the two shapes cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserRef {
    ById(UserId),
    ByName(String),
}

impl UserRef {
    pub fn id(id: i64) -> Self {
        Self::ById(UserId::new(id))
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    /// Classify raw client input
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = trimmed.parse::<i64>() {
                return Self::id(id);
            }
        }

        Self::ByName(raw.to_string())
    }
}

impl FromStr for UserRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for UserRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ById(id) => write!(f, "{}", id),
            Self::ByName(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for UserRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::ById(id) => serializer.serialize_i64(id.value()),
            Self::ByName(name) => serializer.serialize_str(name),
        }
    }
}

struct UserRefVisitor;

impl Visitor<'_> for UserRefVisitor {
    type Value = UserRef;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a user id or a username")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<UserRef, E> {
        Ok(UserRef::id(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<UserRef, E> {
        i64::try_from(v)
            .map(UserRef::id)
            .map_err(|_| E::custom("user id is out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<UserRef, E> {
        if v.is_empty() {
            return Err(E::custom("user reference cannot be empty"));
        }

        Ok(UserRef::parse(v))
    }
}

impl<'de> Deserialize<'de> for UserRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UserRefVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_is_id() {
        assert_eq!("42".parse::<UserRef>().unwrap(), UserRef::id(42));
    }

    #[test]
    fn test_parse_name() {
        assert_eq!("alice".parse::<UserRef>().unwrap(), UserRef::name("alice"));
        assert_eq!("1a".parse::<UserRef>().unwrap(), UserRef::name("1a"));
    }

    #[test]
    fn test_parse_overflowing_digits_is_name() {
        let huge = "99999999999999999999999";
        assert_eq!(huge.parse::<UserRef>().unwrap(), UserRef::name(huge));
    }

    #[test]
    fn test_deserialize_from_json() {
        let by_id: UserRef = serde_json::from_str("5").unwrap();
        assert_eq!(by_id, UserRef::id(5));

        let by_numeric_string: UserRef = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(by_numeric_string, UserRef::id(5));

        let by_name: UserRef = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(by_name, UserRef::name("bob"));
    }

    #[test]
    fn test_deserialize_rejects_other_shapes() {
        assert!(serde_json::from_str::<UserRef>("\"\"").is_err());
        assert!(serde_json::from_str::<UserRef>("true").is_err());
        assert!(serde_json::from_str::<UserRef>("[1]").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(UserRef::id(3).to_string(), "3");
        assert_eq!(UserRef::name("carol").to_string(), "carol");
    }
}
