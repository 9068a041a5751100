//! 3-day running-inventory derivation.
//!
//! Pure arithmetic over a parsed [`ProductRow`]: no storage, no branching on
//! data values beyond the recurrence itself. Negative inventory is a valid
//! business state (stockout/overcommit) and is preserved, not clamped.

use crate::core::parser::{DAYS, ProductRow};

/// One derived day of a product's history, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySnapshot {
    /// Day number, 1 through [`DAYS`]
    pub day: i32,
    /// Units procured on this day
    pub procurement_qty: i64,
    /// Procurement unit price on this day
    pub procurement_price: f64,
    /// Units sold on this day
    pub sales_qty: i64,
    /// Sales unit price on this day
    pub sales_price: f64,
    /// Running inventory after this day
    pub inventory: i64,
}

/// Derives the ordered daily history for one product row.
///
/// Invariant: `inventory(day) = inventory(day-1) + procurement(day) -
/// sales(day)` with `inventory(0)` equal to the opening inventory. Always
/// returns exactly [`DAYS`] snapshots, day ascending, no gaps.
#[must_use]
pub fn derive_history(row: &ProductRow) -> Vec<DailySnapshot> {
    let mut inventory = row.opening_inventory;
    let mut history = Vec::with_capacity(DAYS);

    for idx in 0..DAYS {
        inventory = inventory + row.procurement_qty[idx] - row.sales_qty[idx];
        history.push(DailySnapshot {
            day: (idx + 1) as i32,
            procurement_qty: row.procurement_qty[idx],
            procurement_price: row.procurement_price[idx],
            sales_qty: row.sales_qty[idx],
            sales_price: row.sales_price[idx],
            inventory,
        });
    }

    history
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn row(opening: i64, procurement: [i64; DAYS], sales: [i64; DAYS]) -> ProductRow {
        ProductRow {
            id: "P1".to_string(),
            name: "Widget".to_string(),
            opening_inventory: opening,
            procurement_qty: procurement,
            procurement_price: [1.5, 0.0, 2.0],
            sales_qty: sales,
            sales_price: [3.0, 3.0, 0.0],
        }
    }

    #[test]
    fn test_reference_sequence() {
        // openingInventory=100, procurement=[10,0,5], sales=[20,5,0]
        let history = derive_history(&row(100, [10, 0, 5], [20, 5, 0]));
        let inventories: Vec<i64> = history.iter().map(|s| s.inventory).collect();
        assert_eq!(inventories, vec![90, 85, 90]);
    }

    #[test]
    fn test_exactly_three_days_ascending() {
        let history = derive_history(&row(0, [1, 2, 3], [0, 0, 0]));
        assert_eq!(history.len(), DAYS);
        let days: Vec<i32> = history.iter().map(|s| s.day).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_final_inventory_matches_closed_form() {
        let r = row(42, [7, 0, 13], [5, 11, 2]);
        let history = derive_history(&r);
        let expected = r.opening_inventory + r.procurement_qty.iter().sum::<i64>()
            - r.sales_qty.iter().sum::<i64>();
        assert_eq!(history.last().unwrap().inventory, expected);
    }

    #[test]
    fn test_negative_inventory_is_preserved() {
        let history = derive_history(&row(5, [0, 0, 0], [10, 0, 0]));
        assert_eq!(history[0].inventory, -5);
        assert_eq!(history[2].inventory, -5);
    }

    #[test]
    fn test_prices_carry_through_untouched() {
        let history = derive_history(&row(10, [1, 1, 1], [0, 0, 0]));
        assert_eq!(history[0].procurement_price, 1.5);
        assert_eq!(history[2].procurement_price, 2.0);
        assert_eq!(history[0].sales_price, 3.0);
    }
}
