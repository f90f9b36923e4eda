//! Stock ledger rules
//!
//! Pure decision logic behind stocktake reconciliation, drink provisioning
//! and the ledger audit. The backend performs the storage work; everything
//! here is deterministic and free of I/O.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{LedgerDiscrepancy, Location, StockEntry, StockKey};
use crate::types::{cmp_names, Quantity};

/// What a stocktake submission does to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StocktakePlan {
    /// The count matches the recorded quantity; nothing is written
    NoChange { quantity: Quantity },
    /// Upsert the ledger row to `new_quantity` and log `delta`
    Apply {
        delta: Quantity,
        new_quantity: Quantity,
        /// No ledger row exists yet for the pair
        creates_entry: bool,
    },
}

impl StocktakePlan {
    pub fn delta(&self) -> Quantity {
        match self {
            StocktakePlan::NoChange { .. } => Decimal::ZERO,
            StocktakePlan::Apply { delta, .. } => *delta,
        }
    }

    pub fn quantity(&self) -> Quantity {
        match self {
            StocktakePlan::NoChange { quantity } => *quantity,
            StocktakePlan::Apply { new_quantity, .. } => *new_quantity,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, StocktakePlan::Apply { .. })
    }
}

/// Plan a stocktake: `old` is the current ledger quantity, `None` when the
/// pair has never been provisioned (treated as zero).
pub fn plan_stocktake(old: Option<Quantity>, counted: Quantity) -> StocktakePlan {
    let previous = old.unwrap_or(Decimal::ZERO);
    let delta = counted - previous;

    if delta.is_zero() {
        return StocktakePlan::NoChange { quantity: previous };
    }

    StocktakePlan::Apply {
        delta,
        new_quantity: counted,
        creates_entry: old.is_none(),
    }
}

/// Resolve which locations receive a zero-quantity row for a new drink.
///
/// An empty selection means every location. Otherwise the selection
/// is deduplicated and returned in location order; unknown ids are returned
/// as the error.
pub fn provisioning_targets(
    locations: &[Location],
    requested: &[Uuid],
) -> Result<Vec<Uuid>, Vec<Uuid>> {
    let mut ordered: Vec<&Location> = locations.iter().collect();
    ordered.sort_by(|a, b| cmp_names(&a.name, &b.name).then(a.id.cmp(&b.id)));

    if requested.is_empty() {
        return Ok(ordered.iter().map(|l| l.id).collect());
    }

    let known: HashSet<Uuid> = locations.iter().map(|l| l.id).collect();
    let mut unknown: Vec<Uuid> = Vec::new();
    for id in requested {
        if !known.contains(id) && !unknown.contains(id) {
            unknown.push(*id);
        }
    }
    if !unknown.is_empty() {
        return Err(unknown);
    }

    let wanted: HashSet<Uuid> = requested.iter().copied().collect();
    Ok(ordered
        .iter()
        .filter(|l| wanted.contains(&l.id))
        .map(|l| l.id)
        .collect())
}

/// Pairs that appear more than once in a batch submission, in first-seen order
pub fn duplicate_pairs(keys: &[StockKey]) -> Vec<StockKey> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for key in keys {
        if !seen.insert(*key) && !duplicates.contains(key) {
            duplicates.push(*key);
        }
    }
    duplicates
}

/// Compare ledger rows against the per-pair sums of logged deltas.
///
/// A pair is reported when its ledger quantity differs from its logged sum,
/// or when deltas were logged for a pair that has no ledger row (unless they
/// sum to zero). Output is sorted by pair for stable reporting.
pub fn find_discrepancies(
    entries: &[StockEntry],
    logged: &[(StockKey, Quantity)],
) -> Vec<LedgerDiscrepancy> {
    let mut sums: BTreeMap<StockKey, Quantity> = BTreeMap::new();
    for (key, delta) in logged {
        *sums.entry(*key).or_insert(Decimal::ZERO) += *delta;
    }

    let mut ledger: BTreeMap<StockKey, Quantity> = BTreeMap::new();
    for entry in entries {
        ledger.insert(entry.key(), entry.quantity);
    }

    let mut keys: Vec<StockKey> = ledger.keys().chain(sums.keys()).copied().collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter_map(|key| {
            let ledger_quantity = ledger.get(&key).copied();
            let logged_quantity = sums.get(&key).copied().unwrap_or(Decimal::ZERO);
            let consistent = match ledger_quantity {
                Some(q) => q == logged_quantity,
                None => logged_quantity.is_zero(),
            };
            (!consistent).then_some(LedgerDiscrepancy {
                drink_id: key.drink_id,
                location_id: key.location_id,
                ledger_quantity,
                logged_quantity,
            })
        })
        .collect()
}
