use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

/// Who can discover an election.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Listed for everyone.
    #[default]
    Public,
    /// Only discoverable through its access code.
    Private,
}

impl From<Visibility> for Bson {
    fn from(visibility: Visibility) -> Self {
        to_bson(&visibility).expect("Serialisation is infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_as_lowercase_strings() {
        assert_eq!(Bson::from(Visibility::Public), Bson::String("public".to_string()));
        assert_eq!(Bson::from(Visibility::Private), Bson::String("private".to_string()));
    }
}
