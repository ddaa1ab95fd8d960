//! Tier and network split assumptions for tiered pricing

use serde::{Deserialize, Serialize};

use super::SHARE_TOLERANCE;
use crate::error::{PricingError, Result};

/// Share of Visa/Mastercard volume that falls into each pricing tier.
///
/// Non-qualified receives the remainder so the four tiers always
/// reconstruct the full Visa/Mastercard volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSplit {
    /// Debit cards
    pub check_card: f64,
    /// Basic credit
    pub qualified: f64,
    /// Rewards credit
    pub mid_qualified: f64,
}

impl TierSplit {
    pub fn non_qualified(&self) -> f64 {
        1.0 - self.check_card - self.qualified - self.mid_qualified
    }

    /// Shares must be non-negative and leave a non-negative non-qualified remainder
    pub fn validate(&self) -> Result<()> {
        let shares = [
            ("check_card_share", self.check_card),
            ("qualified_share", self.qualified),
            ("mid_qualified_share", self.mid_qualified),
        ];
        if let Some((name, share)) = shares.iter().find(|(_, share)| *share < 0.0) {
            return Err(PricingError::InvalidAssumption(format!("{} is negative: {}", name, share)));
        }
        if self.non_qualified() < -SHARE_TOLERANCE {
            return Err(PricingError::InvalidAssumption(format!(
                "tier shares sum to {}",
                1.0 - self.non_qualified()
            )));
        }
        Ok(())
    }

    /// Split Visa/MC volume into (check card, qualified, mid-qualified, non-qualified)
    pub fn split(&self, visa_mc_volume: f64) -> (f64, f64, f64, f64) {
        let check_card = visa_mc_volume * self.check_card;
        let qualified = visa_mc_volume * self.qualified;
        let mid_qualified = visa_mc_volume * self.mid_qualified;
        let non_qualified = visa_mc_volume - check_card - qualified - mid_qualified;
        (check_card, qualified, mid_qualified, non_qualified)
    }
}

impl Default for TierSplit {
    /// Typical restaurant mix: 40% debit, 30% basic credit, 20% rewards, 10% other
    fn default() -> Self {
        Self {
            check_card: 0.40,
            qualified: 0.30,
            mid_qualified: 0.20,
        }
    }
}

/// Network split applied to total volume when no breakdown row can be classified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSplit {
    pub visa_mc: f64,
    pub amex: f64,
    pub discover: f64,
}

impl NetworkSplit {
    /// Shares must be non-negative and sum to 1
    pub fn validate(&self) -> Result<()> {
        let shares = [
            ("visa_mc_share", self.visa_mc),
            ("amex_share", self.amex),
            ("discover_share", self.discover),
        ];
        if let Some((name, share)) = shares.iter().find(|(_, share)| *share < 0.0) {
            return Err(PricingError::InvalidAssumption(format!("{} is negative: {}", name, share)));
        }
        let total = self.visa_mc + self.amex + self.discover;
        if (total - 1.0).abs() > SHARE_TOLERANCE {
            return Err(PricingError::InvalidAssumption(format!("network shares sum to {}", total)));
        }
        Ok(())
    }

    /// Returns (visa/mc, amex, discover) volumes
    pub fn apply(&self, total_volume: f64) -> (f64, f64, f64) {
        (
            total_volume * self.visa_mc,
            total_volume * self.amex,
            total_volume * self.discover,
        )
    }
}

impl Default for NetworkSplit {
    fn default() -> Self {
        Self {
            visa_mc: 0.75,
            amex: 0.15,
            discover: 0.10,
        }
    }
}
