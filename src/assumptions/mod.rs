//! Pricing assumptions: benchmark card mix, ticket size and tier splits

mod card_mix;
mod tiers;
pub mod loader;

pub use card_mix::{CardMix, CardMixBucket, InterchangeEstimate};
pub use tiers::{NetworkSplit, TierSplit};
pub use loader::LoadedAssumptions;

use std::path::Path;

use crate::error::Result;

/// Average ticket assumed when benchmarking interchange and fees
pub const DEFAULT_BENCHMARK_TICKET: f64 = 45.0;

/// Allowed drift when checking that shares sum to 1
pub const SHARE_TOLERANCE: f64 = 1e-6;

/// Container for all projection assumptions
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    pub card_mix: CardMix,
    pub tiers: TierSplit,
    pub network_fallback: NetworkSplit,
    /// Ticket size used to estimate transaction counts for every model
    pub benchmark_ticket_size: f64,
}

impl Assumptions {
    /// Default restaurant pricing assumptions
    pub fn default_pricing() -> Self {
        Self {
            card_mix: CardMix::restaurant_default(),
            tiers: TierSplit::default(),
            network_fallback: NetworkSplit::default(),
            benchmark_ticket_size: DEFAULT_BENCHMARK_TICKET,
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;
        Self::from_loaded(&loaded)
    }

    /// Build from loaded tables; constants missing from the file keep their defaults.
    /// Tier and network shares are validated after merging.
    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self> {
        let tiers = TierSplit::default();
        let network = NetworkSplit::default();

        let assumptions = Self {
            card_mix: CardMix::from_buckets(loaded.card_mix.clone()),
            tiers: TierSplit {
                check_card: loaded.constant_or("check_card_share", tiers.check_card),
                qualified: loaded.constant_or("qualified_share", tiers.qualified),
                mid_qualified: loaded.constant_or("mid_qualified_share", tiers.mid_qualified),
            },
            network_fallback: NetworkSplit {
                visa_mc: loaded.constant_or("visa_mc_share", network.visa_mc),
                amex: loaded.constant_or("amex_share", network.amex),
                discover: loaded.constant_or("discover_share", network.discover),
            },
            benchmark_ticket_size: loaded.constant_or("benchmark_ticket_size", DEFAULT_BENCHMARK_TICKET),
        };
        assumptions.tiers.validate()?;
        assumptions.network_fallback.validate()?;
        Ok(assumptions)
    }

    /// Transactions implied by a volume at the benchmark ticket size
    pub fn estimated_transactions(&self, total_volume: f64) -> u64 {
        if total_volume <= 0.0 || self.benchmark_ticket_size <= 0.0 {
            return 0;
        }
        (total_volume / self.benchmark_ticket_size).round() as u64
    }

    /// Benchmark interchange for a volume, using the benchmark transaction count
    pub fn estimate_interchange(&self, total_volume: f64) -> InterchangeEstimate {
        self.card_mix
            .estimate(total_volume, self.estimated_transactions(total_volume))
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_pricing()
    }
}
