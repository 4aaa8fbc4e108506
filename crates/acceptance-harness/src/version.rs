// Version numbers of the application under test
//
// Dotted numeric versions ("2.414.1"), optionally followed by a qualifier
// ("1.515-SNAPSHOT"). A qualified version sorts before the release it
// qualifies; missing trailing components count as zero.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: Vec<u64>,
    qualifier: Option<String>,
}

impl Version {
    /// Parses the value of the version header: `"<version> <build-info>"`.
    ///
    /// Only the token before the first space is significant.
    pub fn from_header(value: &str) -> Result<Self> {
        let token = value.trim().split(' ').next().unwrap_or_default();
        token.parse()
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// `true` if this version is `min` or newer.
    pub fn is_at_least(&self, min: &Version) -> bool {
        self >= min
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        let (numbers, qualifier) = match raw.split_once('-') {
            Some((numbers, qualifier)) => (numbers, Some(qualifier.to_string())),
            None => (raw, None),
        };

        if numbers.is_empty() {
            return Err(Error::InvalidVersion(s.to_string()));
        }

        let components = numbers
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidVersion(s.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            components,
            qualifier,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        match (&self.qualifier, &other.qualifier) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().expect("valid version")
    }

    #[test]
    fn test_header_keeps_token_before_first_space() {
        let version = Version::from_header("2.414.1 (private-build-abc)").expect("parse");
        assert_eq!(version.to_string(), "2.414.1");
        assert_eq!(version.components(), &[2, 414, 1]);
    }

    #[test]
    fn test_ordering() {
        assert!(v("1.515") > v("1.514"));
        assert!(v("1.515") < v("1.515.1"));
        assert_eq!(v("2.0"), v("2.0.0"));
        assert!(v("1.515-SNAPSHOT") < v("1.515"));
        assert!(v("1.515-SNAPSHOT") > v("1.514"));
        assert!(v("2.414.1").is_at_least(&v("1.515")));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            "".parse::<Version>(),
            Err(Error::InvalidVersion(_))
        ));
        assert!("1.x".parse::<Version>().is_err());
        assert!(Version::from_header("  ").is_err());
    }
}
