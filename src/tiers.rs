use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

// key: subscription-tiers -> fixed-order,entitlement-ranking

/// Subscription tier held by a clinic account.
///
/// The set is closed and totally ordered; every entitlement check compares
/// the held tier against a feature's required tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Basic,
    Premium,
    Enterprise,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Free, Tier::Basic, Tier::Premium, Tier::Enterprise];

    /// Position in the fixed order. Higher rank unlocks more features.
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Free => 0,
            Tier::Basic => 1,
            Tier::Premium => 2,
            Tier::Enterprise => 3,
        }
    }

    /// True iff this tier is equal to or ranks above `required`.
    pub fn at_least(&self, required: Tier) -> bool {
        self.rank() >= required.rank()
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, Tier::Free)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Basic => "basic",
            Tier::Premium => "premium",
            Tier::Enterprise => "enterprise",
        }
    }

    /// Lenient parse for tier labels arriving from configuration or account
    /// payloads. Unknown labels are rejected where they enter the system,
    /// never at comparison time.
    pub fn parse(label: &str) -> Option<Tier> {
        match label.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Tier::Free),
            "basic" => Some(Tier::Basic),
            "premium" => Some(Tier::Premium),
            "enterprise" => Some(Tier::Enterprise),
            _ => None,
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Free
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::parse(s).ok_or_else(|| AppError::UnknownTier {
            label: s.to_string(),
        })
    }
}
