//! ABI versions of the reporting wire format.
//!
//! A host picks one version per encoding session (usually by negotiating a version number with the tool reading
//! the stream) and every message of that session is encoded under it. Versions only ever add wire tokens; see
//! [`testscan_core::abi`] for which token shipped in which version.

use std::fmt;
use std::str::FromStr;

use testscan_core::AbiVersionNumber;
use testscan_core::abi::{ABI_V0, ABI_V1};

use crate::error::AbiError;

/// A supported ABI version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AbiVersion {
    V0,
    V1,
}

impl AbiVersion {
    /// Every supported version, oldest first.
    pub const ALL: &'static [AbiVersion] = &[AbiVersion::V0, AbiVersion::V1];

    /// The version used when the host does not ask for a specific one.
    pub const CURRENT: AbiVersion = AbiVersion::V1;

    pub const fn version_number(self) -> AbiVersionNumber {
        match self {
            AbiVersion::V0 => ABI_V0,
            AbiVersion::V1 => ABI_V1,
        }
    }

    /// Select the version to use for a version number requested by a host.
    ///
    /// ## Returns
    /// - The newest supported version whose number is not greater than `number`, so a newer host still gets the
    ///   best format this library can produce.
    /// - `None` for negative numbers.
    pub fn for_version_number(number: AbiVersionNumber) -> Option<AbiVersion> {
        if number < 0 {
            return None;
        }
        Self::ALL.iter().rev().copied().find(|v| v.version_number() <= number)
    }
}

impl Default for AbiVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for AbiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version_number())
    }
}

impl FromStr for AbiVersion {
    type Err = AbiError;

    /// Parse `"1"`, `"v1"` or `"V1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        let number: AbiVersionNumber = digits
            .parse()
            .map_err(|_| AbiError::InvalidVersion(s.to_string()))?;
        Self::for_version_number(number).ok_or(AbiError::UnsupportedVersion(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_numbers_increase() {
        let numbers: Vec<_> = AbiVersion::ALL.iter().map(|v| v.version_number()).collect();
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(AbiVersion::default(), AbiVersion::CURRENT);
    }

    #[test]
    fn test_negotiation_picks_newest_not_newer() {
        assert_eq!(AbiVersion::for_version_number(0), Some(AbiVersion::V0));
        assert_eq!(AbiVersion::for_version_number(1), Some(AbiVersion::V1));
        assert_eq!(AbiVersion::for_version_number(42), Some(AbiVersion::V1));
        assert_eq!(AbiVersion::for_version_number(-1), None);
    }

    #[test]
    fn test_parse_from_host_string() {
        assert_eq!("0".parse::<AbiVersion>(), Ok(AbiVersion::V0));
        assert_eq!(" v1 ".parse::<AbiVersion>(), Ok(AbiVersion::V1));
        assert_eq!("V1".parse::<AbiVersion>(), Ok(AbiVersion::V1));
        assert_eq!(
            "latest".parse::<AbiVersion>(),
            Err(AbiError::InvalidVersion("latest".to_string()))
        );
        assert_eq!("-3".parse::<AbiVersion>(), Err(AbiError::UnsupportedVersion(-3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(AbiVersion::V0.to_string(), "v0");
        assert_eq!(AbiVersion::V1.to_string(), "v1");
    }
}
