use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v[0-9]+$").expect("version pattern is valid"));

/// Identifier of a trained artifact, `v<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionId(String);

impl VersionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VersionId {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if VERSION_PATTERN.is_match(s) {
            Ok(VersionId(s.to_string()))
        } else {
            Err(ArgumentError::InvalidVersionId(s.to_string()))
        }
    }
}

impl TryFrom<String> for VersionId {
    type Error = ArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionId> for String {
    fn from(value: VersionId) -> Self {
        value.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_v_followed_by_digits() {
        for ok in ["v0", "v2", "v10", "v007"] {
            let id: VersionId = ok.parse().unwrap();
            assert_eq!(id.as_str(), ok);
        }
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "v", "2", "V2", "v2a", "v-1", "version2", " v2", "v2/../x"] {
            let err = bad.parse::<VersionId>().unwrap_err();
            assert_eq!(err, ArgumentError::InvalidVersionId(bad.to_string()));
        }
    }

    #[test]
    fn serde_goes_through_validation() {
        let id: VersionId = serde_json::from_str("\"v3\"").unwrap();
        assert_eq!(id.to_string(), "v3");
        assert!(serde_json::from_str::<VersionId>("\"three\"").is_err());
    }
}
