//! Permission declarations and their polarity classes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::segments::{join_path, split_path};
use crate::error::{AclError, Result};
use crate::tree::LookupMode;

/// Declaration class of a permission string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// No prefix: ordinary grant
    Plus,
    /// `!` prefix: ordinary denial
    Minus,
    /// `+` prefix: forced grant
    SuperPlus,
    /// `!!` prefix: forced denial
    SuperMinus,
}

impl Polarity {
    /// Every polarity, in evaluation order
    pub const ALL: [Polarity; 4] = [
        Polarity::SuperMinus,
        Polarity::Minus,
        Polarity::Plus,
        Polarity::SuperPlus,
    ];

    /// Splits a raw declaration into its polarity and the unprefixed path
    pub fn classify(raw: &str) -> (Self, &str) {
        if let Some(rest) = raw.strip_prefix("!!") {
            (Self::SuperMinus, rest)
        } else if let Some(rest) = raw.strip_prefix('!') {
            (Self::Minus, rest)
        } else if let Some(rest) = raw.strip_prefix('+') {
            (Self::SuperPlus, rest)
        } else {
            (Self::Plus, raw)
        }
    }

    /// Prefix that marks this polarity in a declaration
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Plus => "",
            Self::Minus => "!",
            Self::SuperPlus => "+",
            Self::SuperMinus => "!!",
        }
    }

    /// How a `*` check segment is treated when walking this polarity's tree
    ///
    /// Only ordinary grants accept a `*` check against any populated node;
    /// denials and forced grants need a literal `*` declaration.
    pub fn lookup_mode(self) -> LookupMode {
        match self {
            Self::Plus => LookupMode::Positive,
            Self::Minus | Self::SuperPlus | Self::SuperMinus => LookupMode::Negative,
        }
    }

    /// Name used for this polarity's tree
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::SuperPlus => "superplus",
            Self::SuperMinus => "superminus",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed permission declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    polarity: Polarity,
    segments: Vec<String>,
}

impl Permission {
    /// Parses a declaration such as `!!api.users.*`
    ///
    /// Fails when nothing but a prefix and separators remain.
    pub fn parse(raw: &str) -> Result<Self> {
        let (polarity, path) = Polarity::classify(raw);
        let segments: Vec<String> = split_path(path).into_iter().map(str::to_string).collect();

        if segments.is_empty() {
            return Err(AclError::InvalidInput(format!(
                "Permission '{}' has no path segments",
                raw
            )));
        }

        Ok(Self { polarity, segments })
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Dotted path without the polarity prefix
    pub fn path(&self) -> String {
        join_path(&self.segments)
    }
}

impl FromStr for Permission {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.polarity.prefix(), self.path())
    }
}
