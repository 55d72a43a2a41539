use brecholaria::domain::gateway::GatewayStatus;
use brecholaria::domain::money::Amount;
use brecholaria::domain::order::OrderStatus;
use proptest::prelude::*;

fn arb_gateway_status() -> impl Strategy<Value = GatewayStatus> {
    prop_oneof![
        Just(GatewayStatus::Approved),
        Just(GatewayStatus::Pending),
        Just(GatewayStatus::InProcess),
        Just(GatewayStatus::Rejected),
        Just(GatewayStatus::Cancelled),
        Just(GatewayStatus::Refunded),
        Just(GatewayStatus::ChargedBack),
        Just(GatewayStatus::Unknown),
    ]
}

proptest! {
    /// Every gateway status maps to exactly one of the three statuses the
    /// webhook may write; shipping and completion are never webhook-driven.
    #[test]
    fn mapping_only_targets_webhook_writable_statuses(status in arb_gateway_status()) {
        let mapped = status.order_status();
        prop_assert!(matches!(
            mapped,
            OrderStatus::Novo | OrderStatus::Pago | OrderStatus::Cancelado
        ));
    }

    /// Only "approved" ever marks an order as paid.
    #[test]
    fn only_approved_maps_to_pago(status in arb_gateway_status()) {
        let mapped = status.order_status();
        prop_assert_eq!(mapped == OrderStatus::Pago, status == GatewayStatus::Approved);
    }

    /// Any status string the table does not know falls back to `novo`.
    #[test]
    fn arbitrary_status_strings_default_to_novo(raw in "[a-z_]{1,24}") {
        let known = [
            "approved", "pending", "in_process", "rejected",
            "cancelled", "refunded", "charged_back",
        ];
        prop_assume!(!known.contains(&raw.as_str()));

        let status: GatewayStatus =
            serde_json::from_value(serde_json::Value::String(raw)).unwrap();
        prop_assert_eq!(status, GatewayStatus::Unknown);
        prop_assert_eq!(status.order_status(), OrderStatus::Novo);
    }

    /// The webhook guard is monotone: whatever the store holds, applying a
    /// mapped status never lowers the lifecycle rank.
    #[test]
    fn rank_guard_never_regresses(
        current in prop_oneof![
            Just(OrderStatus::Novo),
            Just(OrderStatus::Pago),
            Just(OrderStatus::Enviado),
            Just(OrderStatus::Concluido),
            Just(OrderStatus::Cancelado),
        ],
        incoming in arb_gateway_status(),
    ) {
        let mapped = incoming.order_status();
        let applied = if mapped.rank() < current.rank() { current } else { mapped };
        prop_assert!(applied.rank() >= current.rank());
    }

    /// Reais → centavos conversion roundtrips for every representable price.
    #[test]
    fn amount_roundtrips_through_reais(centavos in 0i64..=10_000_000_00) {
        let amount = Amount::new(centavos).unwrap();
        let back = Amount::from_reais(amount.reais()).unwrap();
        prop_assert_eq!(back.centavos(), centavos);
    }
}
