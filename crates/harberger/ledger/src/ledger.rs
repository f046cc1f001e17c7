use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use harberger_registry::{AssetRegistry, RegistryHooks};
use harberger_types::{AssetId, AssetTaxRecord, LedgerEvent, Principal, TaxSchedule};

use crate::clock::Clock;
use crate::error::LedgerError;

/// The Harberger ledger — per-asset tax records, the system balance, and
/// the ordered event log, behind a single lock.
///
/// Ownership is held by the `AssetRegistry` capability; the ledger reads it
/// for authorization and requests transfers on seizure and force-buy. The
/// ledger implements `RegistryHooks` so registries can initialize a record
/// on mint and delete it on burn.
///
/// Every operation reads the clock once, validates all of its preconditions,
/// and only then mutates — a failed call leaves records, ownership, and the
/// balance untouched. The `ArrearsDetected` notification is the deliberate
/// exception: every arrears check that observes true appends it, including
/// checks running as guards inside an operation that then fails.
pub struct HarbergerLedger {
    registry: Arc<dyn AssetRegistry>,
    clock: Arc<dyn Clock>,
    schedule: TaxSchedule,
    authority: Principal,
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    records: HashMap<AssetId, AssetTaxRecord>,
    balance: u128,
    events: Vec<LedgerEvent>,
}

impl HarbergerLedger {
    pub fn new(
        registry: Arc<dyn AssetRegistry>,
        clock: Arc<dyn Clock>,
        schedule: TaxSchedule,
        authority: Principal,
    ) -> Self {
        Self {
            registry,
            clock,
            schedule,
            authority,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    pub fn schedule(&self) -> &TaxSchedule {
        &self.schedule
    }

    pub fn authority(&self) -> &Principal {
        &self.authority
    }

    /// Snapshot of an asset's tax record.
    pub fn record(&self, asset: AssetId) -> Result<AssetTaxRecord, LedgerError> {
        let state = self.read()?;
        state
            .records
            .get(&asset)
            .cloned()
            .ok_or(LedgerError::UnknownAsset(asset))
    }

    /// Current self-declared valuation of an asset.
    pub fn valuation_of(&self, asset: AssetId) -> Result<u128, LedgerError> {
        Ok(self.record(asset)?.valuation)
    }

    /// Accumulated treasury balance from tax and force-buy payments.
    pub fn balance(&self) -> Result<u128, LedgerError> {
        Ok(self.read()?.balance)
    }

    /// The ordered, append-only notification log.
    pub fn events(&self) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(self.read()?.events.clone())
    }

    /// Tax owed over one full annum at the asset's current valuation.
    pub fn per_annum_tax(&self, asset: AssetId) -> Result<u128, LedgerError> {
        let state = self.read()?;
        let record = state
            .records
            .get(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        self.schedule
            .per_annum_tax(record.valuation)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// Tax accrued since the last evaluation, measured at the current clock.
    ///
    /// Accrual runs from `last_evaluation_time`, not `last_paid_time` — tax
    /// keeps compounding against the evaluation timestamp across partial
    /// payments until a re-evaluation restarts the clock.
    pub fn tax_owed_now(&self, asset: AssetId) -> Result<u128, LedgerError> {
        let now = self.clock.now();
        let state = self.read()?;
        let record = state
            .records
            .get(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        owed_at(&self.schedule, record, now)
    }

    /// Overwrite the stored `tax_owed` with the freshly accrued amount.
    ///
    /// Idempotent only while the clock stands still; accrual is monotonic
    /// non-decreasing between evaluations.
    pub fn recalculate_tax(&self, asset: AssetId) -> Result<u128, LedgerError> {
        let now = self.clock.now();
        let mut state = self.write()?;
        let due = {
            let record = state
                .records
                .get(&asset)
                .ok_or(LedgerError::UnknownAsset(asset))?;
            owed_at(&self.schedule, record, now)?
        };
        let record = state
            .records
            .get_mut(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        record.tax_owed = due;
        state.events.push(LedgerEvent::TaxRecalculated {
            asset,
            tax_owed: due,
            at: now,
        });
        debug!(%asset, tax_owed = %due, "recalculated tax");
        Ok(due)
    }

    /// Whether the asset has gone unpaid past one annum plus the grace
    /// period.
    ///
    /// A query with an observable side effect: every check that observes
    /// true appends an `ArrearsDetected` notification. Detection and
    /// notification are coupled by design.
    pub fn is_in_arrears(&self, asset: AssetId) -> Result<bool, LedgerError> {
        let now = self.clock.now();
        let mut state = self.write()?;
        let overdue = {
            let record = state
                .records
                .get(&asset)
                .ok_or(LedgerError::UnknownAsset(asset))?;
            in_arrears(&self.schedule, record, now)
        };
        if overdue {
            state
                .events
                .push(LedgerEvent::ArrearsDetected { asset, at: now });
            debug!(%asset, "arrears detected");
        }
        Ok(overdue)
    }

    /// Whether the asset is inside the lock window following a force-buy.
    pub fn is_force_buy_locked(&self, asset: AssetId) -> Result<bool, LedgerError> {
        let now = self.clock.now();
        let state = self.read()?;
        let record = state
            .records
            .get(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        Ok(force_buy_locked(&self.schedule, record, now))
    }

    /// Whether the asset is inside the lock window following a
    /// self-evaluation.
    pub fn is_self_evaluation_locked(&self, asset: AssetId) -> Result<bool, LedgerError> {
        let now = self.clock.now();
        let state = self.read()?;
        let record = state
            .records
            .get(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        Ok(self_evaluation_locked(&self.schedule, record, now))
    }

    /// Settle the tax accrued against an asset.
    ///
    /// The required amount is computed fresh at call time, not read from
    /// the stored `tax_owed`. The full payment, excess included, is
    /// retained by the treasury.
    pub fn pay_tax(
        &self,
        caller: &Principal,
        asset: AssetId,
        payment: u128,
    ) -> Result<(), LedgerError> {
        let now = self.clock.now();
        let mut state = self.write()?;
        if !state.records.contains_key(&asset) {
            return Err(LedgerError::UnknownAsset(asset));
        }

        let owner = self.registry.owner_of(&asset)?;
        if *caller != owner {
            return Err(LedgerError::NotOwner {
                asset,
                caller: caller.clone(),
                owner,
            });
        }
        let due = {
            let record = state
                .records
                .get(&asset)
                .ok_or(LedgerError::UnknownAsset(asset))?;
            owed_at(&self.schedule, record, now)?
        };
        if payment < due {
            return Err(LedgerError::InsufficientPayment {
                required: due,
                sent: payment,
            });
        }
        let new_balance = state
            .balance
            .checked_add(payment)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        let record = state
            .records
            .get_mut(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        record.tax_owed = 0;
        record.last_paid_time = now;
        state.balance = new_balance;
        state.events.push(LedgerEvent::TaxRecalculated {
            asset,
            tax_owed: due,
            at: now,
        });
        info!(%asset, owner = %caller, required = %due, paid = %payment, "tax paid");
        Ok(())
    }

    /// Authority-only reclamation of an asset in arrears. No payment
    /// changes hands; the record's payment clock restarts.
    pub fn seize(&self, caller: &Principal, asset: AssetId) -> Result<(), LedgerError> {
        if *caller != self.authority {
            return Err(LedgerError::NotAuthorized(caller.clone()));
        }
        let now = self.clock.now();
        let mut state = self.write()?;
        let overdue = {
            let record = state
                .records
                .get(&asset)
                .ok_or(LedgerError::UnknownAsset(asset))?;
            in_arrears(&self.schedule, record, now)
        };
        if !overdue {
            return Err(LedgerError::NotInArrears(asset));
        }
        state
            .events
            .push(LedgerEvent::ArrearsDetected { asset, at: now });

        let owner = self.registry.owner_of(&asset)?;
        self.registry.transfer(&owner, &self.authority, &asset)?;

        let record = state
            .records
            .get_mut(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        record.tax_owed = 0;
        record.last_paid_time = now;
        state.events.push(LedgerEvent::Seized {
            asset,
            authority: self.authority.clone(),
            at: now,
        });
        info!(%asset, previous_owner = %owner, "seized asset in arrears");
        Ok(())
    }

    /// Owner declaration of a new valuation.
    ///
    /// A force-buy-locked asset skips the self-evaluation lock check: a
    /// fresh buyer may set their own valuation immediately, while an
    /// entrenched owner cannot re-evaluate inside the lock window to dodge
    /// accrual. Changing the valuation restarts the accrual clock; tax
    /// accrued but not yet recorded since the last recalculation is
    /// dropped.
    pub fn self_evaluate(
        &self,
        caller: &Principal,
        asset: AssetId,
        new_valuation: u128,
    ) -> Result<(), LedgerError> {
        let now = self.clock.now();
        let mut state = self.write()?;
        let (overdue, fb_locked, se_locked) = {
            let record = state
                .records
                .get(&asset)
                .ok_or(LedgerError::UnknownAsset(asset))?;
            (
                in_arrears(&self.schedule, record, now),
                force_buy_locked(&self.schedule, record, now),
                self_evaluation_locked(&self.schedule, record, now),
            )
        };

        let owner = self.registry.owner_of(&asset)?;
        if *caller != owner {
            return Err(LedgerError::NotOwner {
                asset,
                caller: caller.clone(),
                owner,
            });
        }
        if new_valuation < self.schedule.min_valuation {
            return Err(LedgerError::ValuationTooLow {
                proposed: new_valuation,
                minimum: self.schedule.min_valuation,
            });
        }
        if overdue {
            // The observed-true check notifies even though the call fails.
            state
                .events
                .push(LedgerEvent::ArrearsDetected { asset, at: now });
            debug!(%asset, "arrears detected");
            return Err(LedgerError::InArrears(asset));
        }
        if !fb_locked && se_locked {
            return Err(LedgerError::SelfEvaluationLocked(asset));
        }

        let record = state
            .records
            .get_mut(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        record.valuation = new_valuation;
        record.last_evaluation_time = now;
        state.events.push(LedgerEvent::SelfEvaluated {
            asset,
            owner: caller.clone(),
            valuation: new_valuation,
            at: now,
        });
        info!(%asset, owner = %caller, valuation = %new_valuation, "self-evaluated");
        Ok(())
    }

    /// Third-party purchase at the stored valuation.
    ///
    /// Uses the stored valuation as the price, not a freshly recalculated
    /// tax-adjusted figure. Proceeds credit the treasury.
    pub fn force_buy(
        &self,
        caller: &Principal,
        asset: AssetId,
        payment: u128,
    ) -> Result<(), LedgerError> {
        let now = self.clock.now();
        let mut state = self.write()?;
        let (fb_locked, valuation) = {
            let record = state
                .records
                .get(&asset)
                .ok_or(LedgerError::UnknownAsset(asset))?;
            (force_buy_locked(&self.schedule, record, now), record.valuation)
        };

        let owner = self.registry.owner_of(&asset)?;
        if *caller == owner {
            return Err(LedgerError::CannotForceBuySelf(asset));
        }
        if fb_locked {
            return Err(LedgerError::ForceBuyLocked(asset));
        }
        if payment < valuation {
            return Err(LedgerError::InsufficientPayment {
                required: valuation,
                sent: payment,
            });
        }
        let new_balance = state
            .balance
            .checked_add(payment)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.registry.transfer(&owner, caller, &asset)?;

        let record = state
            .records
            .get_mut(&asset)
            .ok_or(LedgerError::UnknownAsset(asset))?;
        record.last_force_buy_time = Some(now);
        state.balance = new_balance;
        state.events.push(LedgerEvent::ForceBought {
            asset,
            buyer: caller.clone(),
            price: payment,
            at: now,
        });
        info!(%asset, buyer = %caller, price = %payment, previous_owner = %owner, "force-bought");
        Ok(())
    }

    /// Authority-only sweep of the accumulated treasury balance.
    pub fn withdraw_balance(&self, caller: &Principal) -> Result<u128, LedgerError> {
        if *caller != self.authority {
            return Err(LedgerError::NotAuthorized(caller.clone()));
        }
        let mut state = self.write()?;
        if state.balance == 0 {
            return Err(LedgerError::NothingToWithdraw);
        }
        let amount = state.balance;
        state.balance = 0;
        info!(amount = %amount, "treasury balance withdrawn");
        Ok(amount)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl RegistryHooks for HarbergerLedger {
    fn on_minted(&self, asset: AssetId) {
        let now = self.clock.now();
        match self.inner.write() {
            Ok(mut state) => {
                state
                    .records
                    .insert(asset, AssetTaxRecord::initial(self.schedule.min_valuation, now));
                debug!(%asset, "initialized tax record");
            }
            Err(_) => error!(%asset, "ledger lock poisoned during mint hook"),
        }
    }

    fn on_burned(&self, asset: AssetId) {
        match self.inner.write() {
            Ok(mut state) => {
                state.records.remove(&asset);
                debug!(%asset, "deleted tax record");
            }
            Err(_) => error!(%asset, "ledger lock poisoned during burn hook"),
        }
    }
}

/// Tax accrued from the evaluation timestamp to `now`:
/// `per_annum_tax * elapsed / annum`, checked. Elapsed time clamps at zero
/// if the clock regressed past the evaluation timestamp.
fn owed_at(
    schedule: &TaxSchedule,
    record: &AssetTaxRecord,
    now: DateTime<Utc>,
) -> Result<u128, LedgerError> {
    let per_annum = schedule
        .per_annum_tax(record.valuation)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    let elapsed_secs = (now - record.last_evaluation_time).num_seconds().max(0) as u128;
    per_annum
        .checked_mul(elapsed_secs)
        .ok_or(LedgerError::ArithmeticOverflow)?
        .checked_div(u128::from(schedule.annum_secs))
        .ok_or(LedgerError::ArithmeticOverflow)
}

fn in_arrears(schedule: &TaxSchedule, record: &AssetTaxRecord, now: DateTime<Utc>) -> bool {
    now > record.last_paid_time + schedule.annum() + schedule.grace_period()
}

fn force_buy_locked(schedule: &TaxSchedule, record: &AssetTaxRecord, now: DateTime<Utc>) -> bool {
    record
        .last_force_buy_time
        .is_some_and(|bought| now <= bought + schedule.force_buy_lock())
}

fn self_evaluation_locked(
    schedule: &TaxSchedule,
    record: &AssetTaxRecord,
    now: DateTime<Utc>,
) -> bool {
    now <= record.last_evaluation_time + schedule.self_evaluation_lock()
}
