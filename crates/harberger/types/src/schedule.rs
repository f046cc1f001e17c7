use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Tax schedule — the global constants of a ledger deployment.
///
/// Fixed at construction time and never mutated. Periods are stored in
/// seconds so the schedule stays serde-friendly; accessors expose them as
/// `chrono::Duration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSchedule {
    /// Per-annum tax rate in basis points.
    pub tax_rate_per_annum_bp: u32,
    /// Basis-point denominator (10000 = 100%).
    pub tax_rate_divider: u32,
    /// Length of one tax accrual period, in seconds.
    pub annum_secs: u64,
    /// Grace period after the annum before an asset is in arrears, in seconds.
    pub grace_period_secs: u64,
    /// Floor for self-declared valuations, in smallest monetary units.
    pub min_valuation: u128,
    /// Lock window after a self-evaluation, in seconds.
    pub self_evaluation_lock_secs: u64,
    /// Lock window after a force-buy, in seconds.
    pub force_buy_lock_secs: u64,
}

impl Default for TaxSchedule {
    /// Reference deployment values: 10% per annum over a 365-day annum,
    /// 30-day grace, 0.01 minimum valuation in an 18-decimal denomination,
    /// 30-day evaluation and force-buy locks.
    fn default() -> Self {
        Self {
            tax_rate_per_annum_bp: 1_000,
            tax_rate_divider: 10_000,
            annum_secs: 365 * 24 * 60 * 60,
            grace_period_secs: 30 * 24 * 60 * 60,
            min_valuation: 10_000_000_000_000_000,
            self_evaluation_lock_secs: 30 * 24 * 60 * 60,
            force_buy_lock_secs: 30 * 24 * 60 * 60,
        }
    }
}

impl TaxSchedule {
    pub fn annum(&self) -> Duration {
        Duration::seconds(self.annum_secs as i64)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::seconds(self.grace_period_secs as i64)
    }

    pub fn self_evaluation_lock(&self) -> Duration {
        Duration::seconds(self.self_evaluation_lock_secs as i64)
    }

    pub fn force_buy_lock(&self) -> Duration {
        Duration::seconds(self.force_buy_lock_secs as i64)
    }

    /// Tax owed over one full annum at the given valuation:
    /// `valuation * rate / divider`, checked. `None` on overflow or a
    /// zero divider.
    pub fn per_annum_tax(&self, valuation: u128) -> Option<u128> {
        valuation
            .checked_mul(u128::from(self.tax_rate_per_annum_bp))?
            .checked_div(u128::from(self.tax_rate_divider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_ten_percent() {
        let schedule = TaxSchedule::default();
        assert_eq!(schedule.per_annum_tax(10_000), Some(1_000));
    }

    #[test]
    fn per_annum_tax_scales_with_valuation() {
        let schedule = TaxSchedule::default();
        let base = schedule.per_annum_tax(50_000).unwrap();
        let doubled = schedule.per_annum_tax(100_000).unwrap();
        assert_eq!(doubled, base * 2);
    }

    #[test]
    fn per_annum_tax_overflow_is_none() {
        let schedule = TaxSchedule::default();
        assert_eq!(schedule.per_annum_tax(u128::MAX), None);
    }

    #[test]
    fn zero_divider_is_none() {
        let schedule = TaxSchedule {
            tax_rate_divider: 0,
            ..TaxSchedule::default()
        };
        assert_eq!(schedule.per_annum_tax(10_000), None);
    }

    #[test]
    fn period_accessors() {
        let schedule = TaxSchedule::default();
        assert_eq!(schedule.annum(), Duration::days(365));
        assert_eq!(schedule.grace_period(), Duration::days(30));
        assert_eq!(schedule.self_evaluation_lock(), Duration::days(30));
        assert_eq!(schedule.force_buy_lock(), Duration::days(30));
    }

    #[test]
    fn serialization_roundtrip() {
        let schedule = TaxSchedule::default();
        let json = serde_json::to_string(&schedule).unwrap();
        let restored: TaxSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(schedule, restored);
    }
}
