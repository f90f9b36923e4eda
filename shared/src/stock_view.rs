//! Stock view builder
//!
//! Turns the flat catalog and ledger into a nested per-drink view. The
//! builder works in two steps: produce ordered `(drink, location, quantity)`
//! rows according to the [`ViewPolicy`], then fold the rows into one
//! [`DrinkStock`] per drink.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Drink, DrinkStock, Location, LocationQuantity, StockEntry, StockKey};
use crate::types::{cmp_names, Quantity, ViewPolicy};

/// One cell of the drink × location grid
#[derive(Debug, Clone, Copy)]
struct StockRow<'a> {
    drink: &'a Drink,
    location: &'a Location,
    quantity: Quantity,
}

/// Build the stock view.
///
/// Only active drinks appear. Drinks are ordered by name and locations by
/// name within each drink, ignoring case (see [`cmp_names`]), ties broken by
/// id so the output is deterministic.
/// Entries pointing at unknown locations or inactive drinks are ignored.
pub fn build_stock_view(
    drinks: &[Drink],
    locations: &[Location],
    entries: &[StockEntry],
    policy: ViewPolicy,
) -> Vec<DrinkStock> {
    let mut active: Vec<&Drink> = drinks.iter().filter(|d| d.is_active).collect();
    active.sort_by(|a, b| cmp_names(&a.name, &b.name).then(a.id.cmp(&b.id)));

    let mut ordered_locations: Vec<&Location> = locations.iter().collect();
    ordered_locations.sort_by(|a, b| cmp_names(&a.name, &b.name).then(a.id.cmp(&b.id)));

    let ledger: HashMap<StockKey, Quantity> =
        entries.iter().map(|e| (e.key(), e.quantity)).collect();

    let rows = active.iter().flat_map(|drink| {
        let ledger = &ledger;
        ordered_locations.iter().filter_map(move |location| {
            let key = StockKey {
                drink_id: drink.id,
                location_id: location.id,
            };
            let quantity = match (ledger.get(&key), policy) {
                (Some(q), _) => *q,
                (None, ViewPolicy::Dense) => Decimal::ZERO,
                (None, ViewPolicy::Sparse) => return None,
            };
            Some(StockRow {
                drink: *drink,
                location: *location,
                quantity,
            })
        })
    });

    group_by_drink(rows)
}

/// Fold ordered rows into per-drink records keyed by drink id.
///
/// The first row seen for a drink creates its record; later rows append to
/// its location list.
fn group_by_drink<'a>(rows: impl Iterator<Item = StockRow<'a>>) -> Vec<DrinkStock> {
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    rows.fold(Vec::new(), |mut view, row| {
        let cell = LocationQuantity {
            location_id: row.location.id,
            location: row.location.name.clone(),
            quantity: row.quantity,
        };

        match index.get(&row.drink.id) {
            Some(&i) => view[i].locations.push(cell),
            None => {
                index.insert(row.drink.id, view.len());
                view.push(DrinkStock {
                    drink_id: row.drink.id,
                    name: row.drink.name.clone(),
                    drink_type: row.drink.drink_type.clone(),
                    volume_ml: row.drink.volume_ml,
                    locations: vec![cell],
                });
            }
        }
        view
    })
}

/// Number of location cells across the whole view
pub fn cell_count(view: &[DrinkStock]) -> usize {
    view.iter().map(|d| d.locations.len()).sum()
}
