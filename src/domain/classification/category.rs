use std::fmt;

use serde::{Deserialize, Serialize};

/// URL security classes the model is asked to choose from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlCategory {
    Benign,
    Phishing,
    Malware,
    Defacement,
}

impl UrlCategory {
    pub const ALL: [UrlCategory; 4] = [
        UrlCategory::Benign,
        UrlCategory::Phishing,
        UrlCategory::Malware,
        UrlCategory::Defacement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Benign => "benign",
            Self::Phishing => "phishing",
            Self::Malware => "malware",
            Self::Defacement => "defacement",
        }
    }

    /// Map a free-form model answer onto a known class.
    ///
    /// Accepts the bare class name in any case, optionally wrapped in quotes,
    /// markdown emphasis or trailing punctuation.
    pub fn parse(answer: &str) -> Option<Self> {
        let normalized = answer
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphabetic())
            .to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }

    /// Whether the class describes a threat
    pub fn is_malicious(&self) -> bool {
        !matches!(self, Self::Benign)
    }
}

impl fmt::Display for UrlCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
