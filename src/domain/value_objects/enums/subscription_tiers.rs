use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Purchasable subscription tiers. Prices are fixed in minor currency
/// units; the matching Stripe price ids come from configuration and are
/// provisioned ahead of time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Basic,
    Premium,
}

impl SubscriptionTier {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(SubscriptionTier::Basic),
            "premium" => Some(SubscriptionTier::Premium),
            _ => None,
        }
    }

    pub fn amount_minor(&self) -> i32 {
        match self {
            SubscriptionTier::Basic => 500,
            SubscriptionTier::Premium => 1000,
        }
    }
}

impl Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tier = match self {
            SubscriptionTier::Basic => "basic",
            SubscriptionTier::Premium => "premium",
        };
        write!(f, "{}", tier)
    }
}
