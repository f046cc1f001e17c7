use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-asset tax state. One record per minted asset.
///
/// Current ownership is held by the asset registry, not here — the record
/// carries only valuation and timing state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTaxRecord {
    /// Owner-declared valuation, in smallest monetary units.
    /// Always >= the schedule's `min_valuation` once initialized.
    pub valuation: u128,
    /// When the valuation was last changed. Tax accrues from this point.
    pub last_evaluation_time: DateTime<Utc>,
    /// Tax recorded as owed and not yet paid.
    pub tax_owed: u128,
    /// When tax was last fully settled (also reset on seizure).
    pub last_paid_time: DateTime<Utc>,
    /// When the asset was last force-bought. `None` if never.
    pub last_force_buy_time: Option<DateTime<Utc>>,
}

impl AssetTaxRecord {
    /// State of a freshly minted asset: valuation at the floor, no tax
    /// owed, both clocks started at mint time.
    pub fn initial(min_valuation: u128, now: DateTime<Utc>) -> Self {
        Self {
            valuation: min_valuation,
            last_evaluation_time: now,
            tax_owed: 0,
            last_paid_time: now,
            last_force_buy_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_record_state() {
        let now = Utc::now();
        let record = AssetTaxRecord::initial(100, now);
        assert_eq!(record.valuation, 100);
        assert_eq!(record.tax_owed, 0);
        assert_eq!(record.last_evaluation_time, now);
        assert_eq!(record.last_paid_time, now);
        assert_eq!(record.last_force_buy_time, None);
    }

    #[test]
    fn serialization_roundtrip() {
        let record = AssetTaxRecord::initial(10_000, Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        let restored: AssetTaxRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, restored);
    }
}
