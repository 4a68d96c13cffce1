//! Pricing Tiers
//!
//! The three fixed plans offered at signup and their display metadata.

use serde::{Deserialize, Serialize};

use crate::draft::ValidationError;

/// Subscription tier selected at signup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Starter,
    Professional,
    Enterprise,
}

impl Tier {
    /// Every tier, in display order
    pub const ALL: [Self; 3] = [Self::Starter, Self::Professional, Self::Enterprise];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }

    /// Get pricing card for this tier
    pub fn pricing(self) -> TierPricing {
        match self {
            Self::Starter => TierPricing {
                name: "Starter",
                cents: 4900,
                employees: "1-50 employees",
                features: &[
                    "Unlimited incident logging",
                    "SB 553 compliant reports",
                    "Training tracking",
                    "Basic analytics",
                ],
            },
            Self::Professional => TierPricing {
                name: "Professional",
                cents: 9900,
                employees: "51-200 employees",
                features: &[
                    "Everything in Starter",
                    "Multi-location support",
                    "Advanced analytics",
                    "Priority support",
                ],
            },
            Self::Enterprise => TierPricing {
                name: "Enterprise",
                cents: 19900,
                employees: "201+ employees",
                features: &[
                    "Everything in Professional",
                    "Custom integrations",
                    "Dedicated account manager",
                    "SLA guarantee",
                ],
            },
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "starter" => Ok(Self::Starter),
            "professional" => Ok(Self::Professional),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(ValidationError::UnknownTier(other.to_string())),
        }
    }
}

/// Display metadata for a tier card
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierPricing {
    pub name: &'static str,
    pub cents: i64,
    pub employees: &'static str,
    pub features: &'static [&'static str],
}

impl TierPricing {
    /// Price label, e.g. `$99/month`
    pub fn price_label(&self) -> String {
        format!("${}/month", self.cents / 100)
    }
}
