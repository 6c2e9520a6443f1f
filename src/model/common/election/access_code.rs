use std::fmt::{Display, Formatter};

use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

/// Length of every generated access code.
pub const ACCESS_CODE_LENGTH: usize = 6;

/// A short token that lets anyone find an election without it being listed.
///
/// Codes are stored in upper case; comparisons ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessCode(String);

impl AccessCode {
    /// Canonicalise a user-entered code: surrounding whitespace is removed and
    /// letters are upper-cased. Returns `None` for a blank code.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.is_empty() {
            None
        } else {
            Some(Self(code.to_ascii_uppercase()))
        }
    }

    /// Case-insensitive comparison against another code.
    pub fn matches(&self, other: &AccessCode) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccessCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromIterator<char> for AccessCode {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().map(|c| c.to_ascii_uppercase()).collect())
    }
}

impl From<AccessCode> for Bson {
    fn from(code: AccessCode) -> Self {
        Bson::String(code.0)
    }
}
