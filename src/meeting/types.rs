use crate::normalizer::NormalizeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of meeting classifications accepted downstream.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Advisory Committee")]
    AdvisoryCommittee,
    Board,
    #[serde(rename = "City Council")]
    CityCouncil,
    Commission,
    Committee,
    Forum,
    #[serde(rename = "Police Beat")]
    PoliceBeat,
    #[serde(rename = "Not Classified")]
    NotClassified,
}

impl Classification {
    pub const ALL: [Classification; 8] = [
        Classification::AdvisoryCommittee,
        Classification::Board,
        Classification::CityCouncil,
        Classification::Commission,
        Classification::Committee,
        Classification::Forum,
        Classification::PoliceBeat,
        Classification::NotClassified,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Classification::AdvisoryCommittee => "Advisory Committee",
            Classification::Board => "Board",
            Classification::CityCouncil => "City Council",
            Classification::Commission => "Commission",
            Classification::Committee => "Committee",
            Classification::Forum => "Forum",
            Classification::PoliceBeat => "Police Beat",
            Classification::NotClassified => "Not Classified",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Classification {
    type Err = NormalizeError;

    /// Labels must match exactly; nothing is coerced to `NotClassified`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::ALL
            .iter()
            .find(|c| c.label() == s)
            .copied()
            .ok_or_else(|| NormalizeError::InvalidField {
                field: "classification",
                value: s.to_string(),
            })
    }
}

impl From<Classification> for String {
    fn from(classification: Classification) -> Self {
        classification.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Tentative,
    /// Only produced when the extractor explicitly confirms an upcoming meeting.
    Confirmed,
    Passed,
    Cancelled,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Tentative => "tentative",
            Status::Confirmed => "confirmed",
            Status::Passed => "passed",
            Status::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
}

impl Location {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub title: String,
}

impl Link {
    pub fn new(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
        }
    }
}
