//! Tabular layout of the stock view for spreadsheet export

use serde::{Deserialize, Serialize};

use crate::models::{DrinkStock, Location};
use crate::types::{cmp_names, Quantity};

/// A rendered table: one header row plus one row per drink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockSheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Lay out the stock view as `Drink, Type, Volume (ml), <locations…>, Total`.
///
/// Location columns follow location name order. A drink without a value for
/// a location (sparse view) gets an empty cell there.
pub fn stock_sheet(view: &[DrinkStock], locations: &[Location]) -> StockSheet {
    let mut columns: Vec<&Location> = locations.iter().collect();
    columns.sort_by(|a, b| cmp_names(&a.name, &b.name).then(a.id.cmp(&b.id)));

    let mut header = vec![
        "Drink".to_string(),
        "Type".to_string(),
        "Volume (ml)".to_string(),
    ];
    header.extend(columns.iter().map(|l| l.name.clone()));
    header.push("Total".to_string());

    let rows = view
        .iter()
        .map(|drink| {
            let mut row = vec![
                drink.name.clone(),
                drink.drink_type.clone(),
                drink.volume_ml.to_string(),
            ];
            row.extend(
                columns
                    .iter()
                    .map(|l| drink.quantity_at(l.id).map(format_quantity).unwrap_or_default()),
            );
            row.push(format_quantity(drink.total()));
            row
        })
        .collect();

    StockSheet { header, rows }
}

/// Render a quantity without trailing zeros ("12", "0.75")
pub fn format_quantity(quantity: Quantity) -> String {
    quantity.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationQuantity;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    fn location(name: &str) -> Location {
        Location {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sheet_layout() {
        let bar1 = location("Bar1");
        let cellar = location("Cellar");
        let view = vec![DrinkStock {
            drink_id: Uuid::new_v4(),
            name: "Gin".to_string(),
            drink_type: "spirit".to_string(),
            volume_ml: 700,
            locations: vec![LocationQuantity {
                location_id: cellar.id,
                location: "Cellar".to_string(),
                quantity: Decimal::from_str("2.500").unwrap(),
            }],
        }];

        let sheet = stock_sheet(&view, &[cellar.clone(), bar1.clone()]);
        assert_eq!(
            sheet.header,
            vec!["Drink", "Type", "Volume (ml)", "Bar1", "Cellar", "Total"]
        );
        assert_eq!(sheet.rows, vec![vec!["Gin", "spirit", "700", "", "2.5", "2.5"]]);
    }

    #[test]
    fn test_empty_view_keeps_header() {
        let sheet = stock_sheet(&[], &[location("Bar1")]);
        assert_eq!(sheet.header.len(), 5);
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(Decimal::from_str("12.000").unwrap()), "12");
        assert_eq!(format_quantity(Decimal::from_str("0.750").unwrap()), "0.75");
        assert_eq!(format_quantity(Decimal::ZERO), "0");
    }
}
