//! Service configuration
//!
//! A fixed set of named profiles. The active profile is selected once at
//! startup (usually from `MODE_CONFIG`) and the resulting [`Config`] is
//! immutable for the lifetime of the process.

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable used to select the profile
pub const MODE_ENV: &str = "MODE_CONFIG";

/// Named configuration profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Local development (debug logging, loopback only)
    #[default]
    Development,
    /// Test runs
    Testing,
    /// Deployed service
    Production,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Development, Profile::Testing, Profile::Production];

    /// Build the configuration carried by this profile
    pub fn config(self) -> Config {
        match self {
            Profile::Development => Config {
                profile: self,
                debug: true,
                testing: false,
                bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            },
            Profile::Testing => Config {
                profile: self,
                debug: false,
                testing: true,
                bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            },
            Profile::Production => Config {
                profile: self,
                debug: false,
                testing: false,
                bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            },
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Development => write!(f, "Development"),
            Profile::Testing => write!(f, "Testing"),
            Profile::Production => write!(f, "Production"),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    /// Names are matched after title-casing, so `production` and
    /// `PRODUCTION` both select [`Profile::Production`].
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(Profile::default());
        }

        let wanted = title_case(trimmed);
        Profile::ALL
            .into_iter()
            .find(|p| p.to_string() == wanted)
            .ok_or_else(|| ConfigError::UnknownProfile(trimmed.to_string()))
    }
}

fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub profile: Profile,
    pub debug: bool,
    pub testing: bool,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Resolve a profile by name into its configuration
    pub fn from_mode(mode: &str) -> Result<Self, ConfigError> {
        Ok(mode.parse::<Profile>()?.config())
    }

    /// Default tracing filter directive for this configuration
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Profile::default().config()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown configuration profile: {0} (expected Development, Testing or Production)")]
    UnknownProfile(String),
}
