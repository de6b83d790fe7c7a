// dashboard/ledger.rs - Demo blockchain panel
//
// SIMULATION ONLY. Nothing here talks to a chain or checks a signature.
// DemoLedger fabricates plausible-looking transaction records so the
// "blockchain" panel of the dashboard has something to show. Every record
// is marked `simulated: true`, and a product's `blockchain_verified` flag
// always comes from the catalog, never from here.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::dashboard::model::Product;

const GENESIS_RANGE: std::ops::Range<u64> = 18_000_000..19_000_000;

/// A fabricated ledger entry for one product
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulatedVerification {
    pub record_id: Uuid,
    pub product_id: u32,
    pub sku: String,
    /// 0x-prefixed, 64 hex digits
    pub tx_hash: String,
    pub block_number: u64,
    pub verified_at: DateTime<Utc>,
    /// What the catalog says, copied as-is
    pub catalog_verified: bool,
    pub simulated: bool,
}

/// Generator of simulated records
#[derive(Debug)]
pub struct DemoLedger {
    rng: StdRng,
    block_height: u64,
}

impl DemoLedger {
    /// Deterministic ledger, for tests and reproducible demos
    pub fn seeded(seed: u64) -> Self {
        DemoLedger::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        DemoLedger::with_rng(StdRng::from_entropy())
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let block_height = rng.gen_range(GENESIS_RANGE);
        DemoLedger { rng, block_height }
    }

    /// Fabricate a record for `product`; block numbers only grow
    pub fn simulate(&mut self, product: &Product) -> SimulatedVerification {
        self.block_height += self.rng.gen_range(1..=12);

        let hash: [u8; 32] = self.rng.gen();
        let tx_hash = format!(
            "0x{}",
            hash.iter().map(|b| format!("{:02x}", b)).collect::<String>()
        );
        let record_id = uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid();

        tracing::debug!(
            "Simulated ledger record for product {} at block {}",
            product.id,
            self.block_height
        );

        SimulatedVerification {
            record_id,
            product_id: product.id,
            sku: product.sku.clone(),
            tx_hash,
            block_number: self.block_height,
            verified_at: Utc::now(),
            catalog_verified: product.blockchain_verified,
            simulated: true,
        }
    }
}

impl Default for DemoLedger {
    fn default() -> Self {
        DemoLedger::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::catalogs::product_with_stock;

    #[test]
    fn test_record_shape() {
        let mut ledger = DemoLedger::seeded(7);
        let product = product_with_stock(1, "SEA-SAL-001", 45, 20);
        let record = ledger.simulate(&product);

        assert!(record.simulated);
        assert_eq!(record.product_id, 1);
        assert_eq!(record.tx_hash.len(), 66);
        assert!(record.tx_hash.starts_with("0x"));
        assert!(record.tx_hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(record.record_id.get_version_num(), 4);
    }

    #[test]
    fn test_seeded_ledgers_agree() {
        let product = product_with_stock(2, "X", 1, 1);
        let a = DemoLedger::seeded(42).simulate(&product);
        let b = DemoLedger::seeded(42).simulate(&product);
        assert_eq!(a.tx_hash, b.tx_hash);
        assert_eq!(a.block_number, b.block_number);
    }

    #[test]
    fn test_block_numbers_increase() {
        let mut ledger = DemoLedger::seeded(1);
        let product = product_with_stock(3, "Y", 1, 1);
        let first = ledger.simulate(&product).block_number;
        let second = ledger.simulate(&product).block_number;
        assert!(second > first);
    }

    #[test]
    fn test_catalog_flag_is_untouched() {
        let mut ledger = DemoLedger::seeded(9);
        let product = product_with_stock(4, "Z", 1, 1);
        let record = ledger.simulate(&product);
        assert!(!product.blockchain_verified);
        assert!(!record.catalog_verified);
    }
}
