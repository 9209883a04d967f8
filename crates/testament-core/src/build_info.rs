//! Build metadata baked in by `build.rs`, reported by `!version`.

use std::fmt;

/// Short git hash of the build, or `unknown` outside a checkout.
pub const GIT_HASH: &str = env!("TESTAMENT_GIT_HASH");

/// Unix seconds at build time.
pub const BUILD_TIMESTAMP: &str = env!("TESTAMENT_BUILD_TIMESTAMP");

/// Cargo profile (`debug` / `release`).
pub const BUILD_PROFILE: &str = env!("TESTAMENT_BUILD_PROFILE");

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The metadata of the running binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub profile: &'static str,
}

impl BuildInfo {
    pub const CURRENT: BuildInfo = BuildInfo {
        version: VERSION,
        git_hash: GIT_HASH,
        profile: BUILD_PROFILE,
    };
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.version, self.git_hash, self.profile)
    }
}

/// e.g. `"0.1.0 (abc1234, debug)"`
pub fn version_string() -> String {
    BuildInfo::CURRENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let info = BuildInfo {
            version: "1.2.3",
            git_hash: "abc1234",
            profile: "release",
        };
        assert_eq!(info.to_string(), "1.2.3 (abc1234, release)");
    }

    #[test]
    fn test_current_build() {
        assert!(version_string().starts_with(VERSION));
        assert!(!GIT_HASH.is_empty());
        assert!(BUILD_TIMESTAMP.chars().all(|c| c.is_ascii_digit()));
    }
}
