use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform-assigned numeric user id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// True when the token looks like an id rather than a username.
    pub fn looks_numeric(token: &str) -> bool {
        !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !Self::looks_numeric(s) {
            return Err(UserIdError::NotNumeric(s.to_string()));
        }
        match s.parse::<u64>() {
            Ok(0) => Err(UserIdError::Zero),
            Ok(id) => Ok(Self(id)),
            Err(_) => Err(UserIdError::OutOfRange(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    #[error("invalid user id: {0} (expected digits only)")]
    NotNumeric(String),
    #[error("user id out of range: {0}")]
    OutOfRange(String),
    #[error("user id must not be 0")]
    Zero,
}

/// Display data fetched from the chat platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub name: String,
}

impl Profile {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_digits_only() {
        assert_eq!("42".parse::<UserId>(), Ok(UserId::new(42)));
        assert_eq!(" 7 ".parse::<UserId>(), Ok(UserId::new(7)));
        assert!(matches!(
            "alice".parse::<UserId>(),
            Err(UserIdError::NotNumeric(_))
        ));
        assert!(matches!("-1".parse::<UserId>(), Err(UserIdError::NotNumeric(_))));
        assert!(matches!(
            "99999999999999999999999".parse::<UserId>(),
            Err(UserIdError::OutOfRange(_))
        ));
    }

    #[test]
    fn zero_is_not_an_id() {
        assert_eq!("0".parse::<UserId>(), Err(UserIdError::Zero));
        assert_eq!("000".parse::<UserId>(), Err(UserIdError::Zero));
    }
}
