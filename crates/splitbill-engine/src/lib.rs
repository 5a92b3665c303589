//! splitbill_engine - Bill rows and the arithmetic derived from them.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;

    const COLUMNS: [&str; 9] = [
        "Item", "Quantity", "Unit", "Price", "Discount", "Tax", "Sub-Total", "Alice", "Bob",
    ];

    fn row(id: &str, pairs: &[(&str, &str)]) -> Row {
        let mut row = Row::new(RowId::new(id), &COLUMNS);
        for (k, v) in pairs {
            row.set(k, *v);
        }
        row
    }

    #[test]
    fn test_subtotal_discount_and_tax_on_same_base() {
        let r = row(
            "a",
            &[("quantity", "2"), ("price", "10"), ("discount", "10"), ("tax", "5")],
        );
        assert_eq!(subtotal(&r), "19.00");
    }

    #[test]
    fn test_subtotal_empty_row_is_zero() {
        assert_eq!(subtotal(&row("a", &[])), "0.00");
    }

    #[test]
    fn test_subtotal_garbage_behaves_like_zero() {
        let garbage = row(
            "a",
            &[("quantity", "3"), ("price", "4"), ("discount", "lots"), ("tax", "")],
        );
        let zeros = row(
            "b",
            &[("quantity", "3"), ("price", "4"), ("discount", "0"), ("tax", "0")],
        );
        assert_eq!(subtotal(&garbage), subtotal(&zeros));
        assert_eq!(subtotal(&garbage), "12.00");
    }

    #[test]
    fn test_subtotal_missing_keys_read_as_zero() {
        let r = Row::with_values(RowId::new("x"), [("quantity", "2")]);
        assert_eq!(subtotal(&r), "0.00");
    }

    #[test]
    fn test_member_share_uses_rounded_subtotal() {
        // 1000% of "3.33", not of 3.333
        let r = row("a", &[("quantity", "1"), ("price", "3.333"), ("alice", "1000")]);
        assert_eq!(subtotal(&r), "3.33");
        assert_eq!(member_share(&r, "Alice"), "33.30");
    }

    #[test]
    fn test_member_share_looks_up_derived_key() {
        let mut r = row("a", &[("quantity", "1"), ("price", "40")]);
        r.set("maryann", "25");
        assert_eq!(member_share(&r, "Mary Ann"), "10.00");
    }

    #[test]
    fn test_member_share_unparsable_percentage_is_zero() {
        let r = row("a", &[("quantity", "1"), ("price", "40"), ("bob", "half")]);
        assert_eq!(member_share(&r, "Bob"), "0.00");
    }

    #[test]
    fn test_member_total_is_sum_of_shares() {
        let rows = vec![
            row("a", &[("quantity", "1"), ("price", "10"), ("alice", "50")]),
            row("b", &[("quantity", "3"), ("price", "1.11"), ("alice", "33.33")]),
            row("c", &[("quantity", "1"), ("price", "7"), ("alice", "")]),
        ];
        let expected: f64 = rows
            .iter()
            .map(|r| parse_amount(&member_share(r, "Alice")))
            .sum();
        assert_eq!(member_total(&rows, "Alice"), to_fixed(expected));
        assert_eq!(member_total(&rows, "Alice"), "6.11");
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let rows = vec![
            row("a", &[("quantity", "2"), ("price", "10"), ("discount", "10"), ("tax", "5")]),
            row("b", &[("quantity", "1"), ("price", "0.333")]),
        ];
        assert_eq!(total(&rows), "19.33");
        assert_eq!(total(&[]), "0.00");
    }

    #[test]
    fn test_total_independent_of_column_order() {
        let a = Row::with_values(RowId::new("a"), [("price", "2.5"), ("quantity", "4")]);
        let b = Row::with_values(RowId::new("a"), [("quantity", "4"), ("price", "2.5")]);
        assert_eq!(total(&[a]), total(&[b]));
    }

    #[test]
    fn test_amount_remaining_subtracts_member_shares() {
        let r = row(
            "a",
            &[("quantity", "1"), ("price", "100"), ("alice", "25"), ("bob", "50")],
        );
        assert_eq!(
            amount_remaining(&r, &COLUMNS, RemainderPolicy::Unclamped),
            "25.00"
        );
    }

    #[test]
    fn test_amount_remaining_ignores_reserved_columns() {
        // Discount and tax are percentages too, but never allocations.
        let r = row(
            "a",
            &[("quantity", "1"), ("price", "100"), ("discount", "50"), ("tax", "50")],
        );
        assert_eq!(
            amount_remaining(&r, &COLUMNS, RemainderPolicy::Unclamped),
            "100.00"
        );
    }

    #[test]
    fn test_amount_remaining_over_allocation() {
        let r = row(
            "a",
            &[("quantity", "1"), ("price", "10"), ("alice", "80"), ("bob", "40")],
        );
        assert_eq!(
            amount_remaining(&r, &COLUMNS, RemainderPolicy::Unclamped),
            "-2.00"
        );
        assert_eq!(
            amount_remaining(&r, &COLUMNS, RemainderPolicy::ClampAtZero),
            "0.00"
        );
    }

    #[test]
    fn test_row_serializes_flat_in_column_order() {
        let r = row("r1", &[("item", "Milk"), ("alice", "100")]);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.starts_with(r#"{"id":"r1","item":"Milk","quantity":"""#));
        assert!(json.ends_with(r#""alice":"100","bob":""}"#));
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
