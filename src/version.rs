//! Dotted version strings and the `major.minor.build` version triple.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Compare two dotted version strings segment by segment.
///
/// The shorter version is padded with zero segments, so `"0.1.1.0"` equals
/// `"0.1.1"`. Segments parse as signed integers (`"-1"` sorts below `"0"`);
/// a segment that is not an integer counts as `0`, so malformed input never
/// fails the comparison.
pub fn compare_version(v1: &str, v2: &str) -> Ordering {
    let s1: Vec<&str> = v1.split('.').collect();
    let s2: Vec<&str> = v2.split('.').collect();

    for i in 0..s1.len().max(s2.len()) {
        let p1 = s1.get(i).map_or(0, |s| segment(s));
        let p2 = s2.get(i).map_or(0, |s| segment(s));
        match p1.cmp(&p2) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Same as [`compare_version`], reported as `-1`, `0` or `1`.
pub fn compare_version_i32(v1: &str, v2: &str) -> i32 {
    match compare_version(v1, v2) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

fn segment(s: &str) -> i64 {
    s.parse().unwrap_or(0)
}

/// Version triple used for plugin, CLI and SDK versions.
///
/// Ordering is lexicographic over `(major, minor, build)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VersionType {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl VersionType {
    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build,
        }
    }

    /// Parse leniently: missing segments are `0`, garbage segments are `0`,
    /// anything past the third segment is ignored.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.trim().split('.').map(|p| p.parse::<u32>().unwrap_or(0));
        Self {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            build: parts.next().unwrap_or(0),
        }
    }
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_versions() {
        for v in ["1", "0.1", "0.1.1", "2.10.3.4"] {
            assert_eq!(compare_version(v, v), Ordering::Equal, "{v}");
        }
        assert_eq!(compare_version_i32("0.1.1", "0.1.1"), 0);
    }

    #[test]
    fn test_ordering() {
        assert_eq!(compare_version_i32("0.1.0", "0.1.1"), -1);
        assert_eq!(compare_version_i32("1.0", "0.9.9"), 1);
        assert_eq!(compare_version_i32("0.10.0", "0.9.0"), 1);
    }

    #[test]
    fn test_padding() {
        assert_eq!(compare_version("0.1.1.0", "0.1.1"), Ordering::Equal);
        assert_eq!(compare_version("0.1.1", "0.1.1.1"), Ordering::Less);
    }

    #[test]
    fn test_malformed_segments_are_zero() {
        assert_eq!(compare_version("0.x.1", "0.0.1"), Ordering::Equal);
        assert_eq!(compare_version("", "0"), Ordering::Equal);
        assert_eq!(compare_version("1.beta", "1.0.1"), Ordering::Less);
    }

    #[test]
    fn test_negative_segments_keep_sign() {
        assert_eq!(compare_version("0.-1", "0.0"), Ordering::Less);
        assert_eq!(compare_version("0.-1", "0"), Ordering::Less);
        assert_eq!(compare_version("+1.0", "1"), Ordering::Equal);
    }

    #[test]
    fn test_version_type_display_and_order() {
        let v = VersionType::new(0, 1, 1);
        assert_eq!(v.to_string(), "0.1.1");
        assert!(VersionType::new(0, 1, 0) < v);
        assert!(VersionType::new(1, 0, 0) > VersionType::new(0, 9, 9));
    }

    #[test]
    fn test_version_type_parse() {
        assert_eq!(VersionType::parse("1.2.3"), VersionType::new(1, 2, 3));
        assert_eq!(VersionType::parse("1.2"), VersionType::new(1, 2, 0));
        assert_eq!(VersionType::parse("1.x.3.9"), VersionType::new(1, 0, 3));
    }
}
