use serde::{Deserialize, Serialize};

/// A single candidate on the ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

impl Candidate {
    /// Trim every field. Returns `None` if the name is blank.
    pub fn normalised(self) -> Option<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
        })
    }
}

/// Example test data.
#[cfg(test)]
mod examples {
    use super::*;

    impl Candidate {
        pub fn example1() -> Self {
            Self {
                name: "Chris Riches".to_string(),
                description: "Captain for three seasons running.".to_string(),
                image_url: "https://example.com/chris.jpg".to_string(),
            }
        }

        pub fn example2() -> Self {
            Self {
                name: "Parry Hotter".to_string(),
                description: "Seeker, occasionally finds the snitch.".to_string(),
                image_url: String::new(),
            }
        }

        pub fn example3() -> Self {
            Self {
                name: "Jane Doe".to_string(),
                description: String::new(),
                image_url: String::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalising_trims_fields() {
        let candidate = Candidate {
            name: "  Jane Doe ".to_string(),
            description: " Treasurer\n".to_string(),
            image_url: " https://example.com/jane.png ".to_string(),
        };
        let candidate = candidate.normalised().unwrap();
        assert_eq!(candidate.name, "Jane Doe");
        assert_eq!(candidate.description, "Treasurer");
        assert_eq!(candidate.image_url, "https://example.com/jane.png");
    }

    #[test]
    fn blank_name_is_dropped() {
        let candidate = Candidate {
            name: "   ".to_string(),
            description: "Has a description but no name".to_string(),
            image_url: String::new(),
        };
        assert!(candidate.normalised().is_none());
    }
}
