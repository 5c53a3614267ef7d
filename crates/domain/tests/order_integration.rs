//! Integration tests for pricing and the order lifecycle.
//!
//! These tests drive orders from a catalog snapshot through pricing,
//! placement, and every leg of the status state machine.

use chrono::{Duration, Utc};
use domain::{
    CatalogSnapshot, LineRequest, Money, Order, OrderError, OrderId, OrderStatus, PlaceOrder,
    PricingError, ProductId, UpdateOrder, price_order, seed_catalog,
};

fn snapshot() -> CatalogSnapshot {
    CatalogSnapshot::new(seed_catalog(Utc::now() - Duration::days(1)))
}

fn place(lines: &[(u64, u32)]) -> Order {
    let cmd = PlaceOrder::new(
        lines
            .iter()
            .map(|&(id, qty)| LineRequest::new(id, qty))
            .collect(),
    )
    .unwrap();
    let priced = price_order(&cmd.items, &snapshot()).unwrap();
    Order::place(OrderId::FIRST, priced, Utc::now())
}

fn set_status(order: &mut Order, status: &str) -> Result<(), OrderError> {
    let cmd = UpdateOrder::new(order.id(), Some(status), None)?;
    order.apply_update(&cmd, Utc::now()).map(|_| ())
}

mod order_lifecycle {
    use super::*;

    #[test]
    fn placed_dispatched_completed() {
        let mut order = place(&[(1, 2), (4, 1), (6, 1)]);
        assert_eq!(order.status(), OrderStatus::Placed);
        assert_eq!(order.value().cents(), 3870);
        assert_eq!(order.discount(), 10);

        let before = Utc::now();
        set_status(&mut order, "Dispatched").unwrap();
        let after = Utc::now();
        let dispatched_at = order.dispatch_date().unwrap();
        assert!(dispatched_at >= before && dispatched_at <= after);

        set_status(&mut order, "Completed").unwrap();
        assert_eq!(order.status(), OrderStatus::Completed);
        assert!(order.is_terminal());
        assert_eq!(order.dispatch_date(), Some(dispatched_at));
    }

    #[test]
    fn dispatched_order_can_be_cancelled() {
        let mut order = place(&[(2, 1)]);
        set_status(&mut order, "Dispatched").unwrap();
        set_status(&mut order, "Cancelled").unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn completed_order_cannot_be_cancelled() {
        let mut order = place(&[(2, 1)]);
        set_status(&mut order, "Completed").unwrap();

        let err = set_status(&mut order, "Cancelled").unwrap_err();

        assert!(matches!(err, OrderError::InvalidTransition { .. }));
        assert_eq!(order.status(), OrderStatus::Completed);
    }

    #[test]
    fn invalid_status_leaves_order_untouched() {
        let mut order = place(&[(2, 1)]);

        let err = set_status(&mut order, "Shipped").unwrap_err();

        assert_eq!(err, OrderError::InvalidStatus("Shipped".to_string()));
        assert_eq!(order.status(), OrderStatus::Placed);
    }
}

mod pricing {
    use super::*;

    #[test]
    fn frozen_prices_survive_catalog_changes() {
        let order = place(&[(1, 2)]);

        // The catalog reprices product 1 after the order was placed.
        let mut products = seed_catalog(Utc::now());
        products[0].price = Money::from_cents(9999);
        let repriced = CatalogSnapshot::new(products);

        assert_eq!(order.items()[0].unit_price.cents(), 1050);
        assert_eq!(order.value().cents(), 2100);
        assert_eq!(repriced.get(ProductId::new(1)).unwrap().price.cents(), 9999);
    }

    #[test]
    fn stored_value_derives_from_frozen_lines() {
        for lines in [
            vec![(1, 2), (4, 1), (6, 1)],
            vec![(2, 7), (3, 11)],
            vec![(5, 1)],
        ] {
            let order = place(&lines);
            let raw = order.raw_value();
            let expected = if order.discount() == 10 {
                raw - raw.percentage(10)
            } else {
                raw
            };
            assert_eq!(order.value(), expected);
        }
    }

    #[test]
    fn insufficient_inventory_names_the_product() {
        let err = price_order(&[LineRequest::new(1u64, 6)], &snapshot()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "There is not enough of \"Product 1\" to fulfill this order (requested 6, available 5)"
        );
        assert!(matches!(err, PricingError::InsufficientInventory { .. }));
    }
}

mod wire_format {
    use super::*;

    #[test]
    fn order_serializes_with_decimal_value() {
        let order = place(&[(1, 2), (4, 1), (6, 1)]);
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["value"], 38.7);
        assert_eq!(json["discount"], 10);
        assert_eq!(json["status"], "Placed");
        assert!(json["dispatch_date"].is_null());
        assert_eq!(json["items"][0]["unit_price"], 10.5);
    }
}
