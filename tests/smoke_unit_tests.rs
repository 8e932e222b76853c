//! Smoke Screen Unit tests for order lifecycle components
//!
//! These tests span the public API and check each component in isolation
//! from the service scenarios. They mostly cover the happy path.

use order_lifecycle::{
    OrderStatus, TransitionAuthority, TransitionError,
    config::ServiceConfig,
    inventory::LineItem,
    logging::init_logging,
    order::Order,
    record::{TimeStamp, TransitionRecord},
    service::OrderService,
    utils::{new_order_id, new_uuid_to_bech32},
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Order ids carry the order_ prefix and the bech32 separator
    #[test]
    fn order_ids_are_prefixed() {
        let id = new_order_id().unwrap();

        assert!(id.starts_with("order_1"));
        assert!(id.len() > 10);
    }

    /// Empty prefixes are not valid bech32
    #[test]
    fn handles_empty_hrp() {
        assert!(new_uuid_to_bech32("").is_err());
    }

    /// Test that multiple calls generate unique identifiers
    #[test]
    fn generates_unique_ids() {
        let id1 = new_order_id().unwrap();
        let id2 = new_order_id().unwrap();

        assert_ne!(id1, id2);
    }
}

// STATUS MODULE TESTS
#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(OrderStatus::PaymentCompleted.label(), "Payment completed");
        assert_eq!(OrderStatus::InTransit.to_string(), "In transit");
        assert_eq!(OrderStatus::ExchangeRequested.code(), "exchange_requested");
    }

    #[test]
    fn from_str_uses_codes() {
        let parsed: OrderStatus = "return_requested".parse().unwrap();
        assert_eq!(parsed, OrderStatus::ReturnRequested);

        let err = "Return requested".parse::<OrderStatus>().unwrap_err();
        assert!(err.is_internal());
    }
}

// AUTHORITY TESTS
#[cfg(test)]
mod authority_tests {
    use super::*;

    #[test]
    fn delivered_offers_three_paths() {
        assert_eq!(
            TransitionAuthority::allowed_from(OrderStatus::Delivered),
            &[
                OrderStatus::PurchaseConfirmed,
                OrderStatus::ReturnRequested,
                OrderStatus::ExchangeRequested
            ]
        );
    }

    #[test]
    fn rejection_message_is_actionable() {
        let err = TransitionAuthority::validate(OrderStatus::Preparing, OrderStatus::Delivered)
            .unwrap_err();

        assert!(matches!(err, TransitionError::IllegalTransition { .. }));
        assert_eq!(
            err.allowed(),
            &[OrderStatus::Shipped, OrderStatus::CancelRequested]
        );
        assert!(err.to_string().contains("Shipped, Cancel requested"));
    }
}

// RECORD TESTS
#[cfg(test)]
mod record_tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn record_cbor_roundtrip() {
        let record = TransitionRecord::new(
            "order_1abc".into(),
            OrderStatus::Delivered,
            OrderStatus::ExchangeRequested,
            TimeStamp::new(),
            "customer".into(),
            5,
        );

        let (hash, cbor) = record.build().unwrap();
        let decoded: TransitionRecord = minicbor::decode(&cbor).unwrap();

        assert_eq!(decoded, record);
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn timestamp_new_creates_current_time() {
        let ts = TimeStamp::new();
        let diff = (Utc::now() - ts.to_datetime_utc()).num_seconds().abs();

        assert!(diff < 1);
    }

    #[test]
    fn order_cbor_roundtrip() {
        let order = Order::new("order_1abc".into(), vec![LineItem::new("mug", 2)]);
        let decoded = Order::decode(&order.encode().unwrap()).unwrap();

        assert_eq!(decoded, order);
    }
}

// CONFIG + LOGGING TESTS
#[cfg(test)]
mod ambient_tests {
    use super::*;

    #[test]
    fn service_opens_from_config() {
        init_logging("order_lifecycle=debug");

        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig {
            db_path: dir.path().join("orders.db"),
            temporary: true,
            ..ServiceConfig::default()
        };

        let service = OrderService::open(&config).unwrap();
        service.set_stock("mug", 1).unwrap();
        let order = service
            .place_order(vec![LineItem::new("mug", 1)], "smoke")
            .unwrap();

        assert_eq!(
            service.allowed_next(&order.order_id).unwrap(),
            vec![OrderStatus::Preparing, OrderStatus::CancelRequested]
        );
        assert!(service.flush().is_ok());
    }
}
