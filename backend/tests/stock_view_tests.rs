//! Stock view tests
//!
//! Dense and sparse views built from generated catalogs and ledgers.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::stock_view::{build_stock_view, cell_count};
use shared::{Drink, Location, StockEntry, ViewPolicy};
use uuid::Uuid;

fn drink(name: &str) -> Drink {
    Drink {
        id: Uuid::new_v4(),
        name: name.to_string(),
        drink_type: "spirit".to_string(),
        volume_ml: 700,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn location(name: &str) -> Location {
    Location {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: Utc::now(),
    }
}

fn entry(drink: &Drink, location: &Location, quantity: i64) -> StockEntry {
    StockEntry {
        drink_id: drink.id,
        location_id: location.id,
        quantity: Decimal::from(quantity),
        updated_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_new_drink_appears_at_every_location_in_dense_view() {
        let gin = drink("Gin");
        let locations = vec![location("Bar 1"), location("Bar 2"), location("Cellar")];

        let view = build_stock_view(&[gin.clone()], &locations, &[], ViewPolicy::Dense);

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].locations.len(), 3);
        assert!(view[0].locations.iter().all(|l| l.quantity.is_zero()));
        assert_eq!(view[0].total(), Decimal::ZERO);
    }

    #[test]
    fn test_sparse_view_omits_unstocked_drinks() {
        let gin = drink("Gin");
        let rum = drink("Rum");
        let bar = location("Bar 1");
        let entries = vec![entry(&gin, &bar, 9)];

        let view = build_stock_view(
            &[gin.clone(), rum],
            &[bar.clone()],
            &entries,
            ViewPolicy::Sparse,
        );

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].drink_id, gin.id);
        assert_eq!(view[0].quantity_at(bar.id), Some(Decimal::from(9)));
    }

    #[test]
    fn test_deactivated_drink_hidden_until_reactivated() {
        let mut gin = drink("Gin");
        let bar = location("Bar 1");
        let entries = vec![entry(&gin, &bar, 12)];
        gin.is_active = false;

        for policy in [ViewPolicy::Dense, ViewPolicy::Sparse] {
            let view = build_stock_view(&[gin.clone()], &[bar.clone()], &entries, policy);
            assert!(view.is_empty());
        }

        // same ledger rows, so the count comes back with the drink
        gin.is_active = true;
        for policy in [ViewPolicy::Dense, ViewPolicy::Sparse] {
            let view = build_stock_view(&[gin.clone()], &[bar.clone()], &entries, policy);
            assert_eq!(view.len(), 1);
            assert_eq!(view[0].quantity_at(bar.id), Some(Decimal::from(12)));
        }
    }

    #[test]
    fn test_view_ordering() {
        let drinks = vec![drink("Vodka"), drink("Gin"), drink("Rum")];
        let locations = vec![location("Cellar"), location("Bar 1")];

        let view = build_stock_view(&drinks, &locations, &[], ViewPolicy::Dense);

        let names: Vec<&str> = view.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Gin", "Rum", "Vodka"]);
        let places: Vec<&str> = view[0].locations.iter().map(|l| l.location.as_str()).collect();
        assert_eq!(places, vec!["Bar 1", "Cellar"]);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Dense view has one cell per active drink and location
    #[test]
    fn prop_dense_view_is_complete(
        drink_count in 0usize..8,
        location_count in 1usize..6,
        stocked in prop::collection::vec(any::<bool>(), 48),
    ) {
        let drinks: Vec<Drink> = (0..drink_count).map(|i| drink(&format!("Drink {}", i))).collect();
        let locations: Vec<Location> =
            (0..location_count).map(|i| location(&format!("Location {}", i))).collect();

        let mut entries = Vec::new();
        for (i, d) in drinks.iter().enumerate() {
            for (j, l) in locations.iter().enumerate() {
                if stocked[i * 6 + j] {
                    entries.push(entry(d, l, (i + j) as i64));
                }
            }
        }

        let dense = build_stock_view(&drinks, &locations, &entries, ViewPolicy::Dense);
        prop_assert_eq!(cell_count(&dense), drink_count * location_count);

        let sparse = build_stock_view(&drinks, &locations, &entries, ViewPolicy::Sparse);
        prop_assert_eq!(cell_count(&sparse), entries.len());
    }

    /// Deactivating drinks removes exactly their cells from the dense view
    #[test]
    fn prop_inactive_drinks_excluded(
        active in prop::collection::vec(any::<bool>(), 1..10),
        location_count in 1usize..5,
    ) {
        let drinks: Vec<Drink> = active
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let mut d = drink(&format!("Drink {}", i));
                d.is_active = *a;
                d
            })
            .collect();
        let locations: Vec<Location> =
            (0..location_count).map(|i| location(&format!("Location {}", i))).collect();

        let view = build_stock_view(&drinks, &locations, &[], ViewPolicy::Dense);
        let active_count = active.iter().filter(|a| **a).count();

        prop_assert_eq!(view.len(), active_count);
        prop_assert_eq!(cell_count(&view), active_count * location_count);
    }
}
