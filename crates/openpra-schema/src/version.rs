//! Schema version enumeration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Published OpenPRA schema versions, ordered oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchemaVersion {
    /// Initial schema version
    V1_0_0,
    /// Attributes on models
    V1_1_0,
    /// Major update with LMP support
    V2_0_0,
}

/// Release notes for one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    /// Version string, e.g. `"2.0.0"`
    pub version: SchemaVersion,
    /// Release date
    pub release_date: NaiveDate,
    /// One-line summary
    pub description: &'static str,
}

impl SchemaVersion {
    /// All supported versions, oldest first
    pub const ALL: [SchemaVersion; 3] = [
        SchemaVersion::V1_0_0,
        SchemaVersion::V1_1_0,
        SchemaVersion::V2_0_0,
    ];

    /// Newest supported version
    #[inline]
    #[must_use]
    pub const fn latest() -> Self {
        SchemaVersion::V2_0_0
    }

    /// Dotted version string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V1_0_0 => "1.0.0",
            SchemaVersion::V1_1_0 => "1.1.0",
            SchemaVersion::V2_0_0 => "2.0.0",
        }
    }

    /// Major version number
    #[must_use]
    pub const fn major(self) -> u32 {
        match self {
            SchemaVersion::V1_0_0 | SchemaVersion::V1_1_0 => 1,
            SchemaVersion::V2_0_0 => 2,
        }
    }

    /// Release date of this version
    #[must_use]
    pub fn release_date(self) -> NaiveDate {
        let (y, m, d) = match self {
            SchemaVersion::V1_0_0 => (2023, 10, 1),
            SchemaVersion::V1_1_0 => (2023, 12, 15),
            SchemaVersion::V2_0_0 => (2024, 3, 1),
        };
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    /// Release summary
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            SchemaVersion::V1_0_0 => "Initial schema version",
            SchemaVersion::V1_1_0 => "Added attributes to models",
            SchemaVersion::V2_0_0 => "Major schema update with LMP support",
        }
    }

    /// Date and summary bundled together
    #[must_use]
    pub fn info(self) -> VersionInfo {
        VersionInfo {
            version: self,
            release_date: self.release_date(),
            description: self.description(),
        }
    }

    /// Comma-separated list of every supported version
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version string that is not one of [`SchemaVersion::ALL`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported schema version: {version}. Supported versions: {}", SchemaVersion::supported_list())]
pub struct UnsupportedVersion {
    /// The rejected version string
    pub version: String,
}

impl FromStr for SchemaVersion {
    type Err = UnsupportedVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnsupportedVersion {
                version: s.to_string(),
            })
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = UnsupportedVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.as_str().to_string()
    }
}
