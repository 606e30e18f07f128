//! Tests for quote model serialization and version chain helpers.

#[cfg(test)]
mod tests {
    use crate::ids::is_valid_quote_id;
    use crate::quotes::model::{
        LaborItem, LaborItemInput, NewQuote, PricingParams, Quote, SupplyItem, SupplyItemInput,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn draft(id: &str) -> Quote {
        Quote::new_draft(
            id.to_string(),
            NewQuote {
                client: "0007".to_string(),
                site: "Clinique El Amen".to_string(),
                object: "Climatisation bloc B".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 14),
                ..Default::default()
            },
            PricingParams::new("EUR", "TND", dec!(3.35), dec!(0.2)),
            PricingParams::new("TND", "TND", dec!(1), dec!(0.2)),
            dec!(0.19),
        )
    }

    fn server_payload(parent_id: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "P-00000042",
            "client": "0007",
            "site": "Clinique El Amen",
            "object": "Climatisation",
            "date": "2024-03-14",
            "supplyPricing": {
                "fromCurrency": "EUR",
                "toCurrency": "TND",
                "exchangeRate": "3.35",
                "marginRate": "0.2"
            },
            "laborPricing": {
                "fromCurrency": "TND",
                "toCurrency": "TND",
                "exchangeRate": "1",
                "marginRate": "0.2"
            },
            "totalSuppliesHT": "0",
            "totalLaborHT": "0",
            "totalHT": "0",
            "tva": "0",
            "totalTTC": "0",
            "vatRate": "0.19",
            "createdAt": "2024-03-14T09:00:00",
            "updatedAt": "2024-03-14T09:00:00",
            "version": 2,
            "parentId": parent_id
        })
    }

    #[test]
    fn test_new_draft_starts_at_version_zero() {
        let quote = draft("P-00000042");
        assert_eq!(quote.version, 0);
        assert_eq!(quote.parent_id, None);
        assert!(!quote.confirmed);
        assert!(quote.supply_items.is_empty());
        assert_eq!(quote.date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    }

    #[test]
    fn test_display_id_pads_version() {
        let mut quote = draft("P-00000042");
        assert_eq!(quote.display_id(), "P-00000042-000");
        quote.version = 12;
        assert_eq!(quote.display_id(), "P-00000042-012");
    }

    #[test]
    fn test_next_version_points_at_chain_root() {
        let root = draft("P-00000042");
        let v1 = root.next_version();
        assert_ne!(v1.id, root.id);
        assert!(is_valid_quote_id(&v1.id));
        assert_eq!(v1.version, 1);
        assert_eq!(v1.parent_id.as_deref(), Some("P-00000042"));

        let v2 = v1.next_version();
        assert_eq!(v2.version, 2);
        assert_eq!(v2.parent_id.as_deref(), Some("P-00000042"));
        assert_ne!(v2.id, v1.id);
    }

    #[test]
    fn test_next_version_gives_items_fresh_ids() {
        let mut root = draft("P-00000042");
        root.supply_items.push(SupplyItem::from_input(
            "s-root".to_string(),
            SupplyItemInput {
                description: "Cassette 24000 BTU".to_string(),
                reference: None,
                source_price: dec!(890),
                quantity: dec!(2),
            },
        ));
        root.labor_items.push(LaborItem::from_input(
            "l-root".to_string(),
            LaborItemInput {
                description: "Pose".to_string(),
                source_price: dec!(25),
                technician_count: dec!(2),
                hours: dec!(5),
                weekend_multiplier: dec!(1),
            },
        ));

        let next = root.next_version();

        assert_ne!(next.supply_items[0].id, "s-root");
        assert_ne!(next.labor_items[0].id, "l-root");
        assert_eq!(next.supply_items[0].description, "Cassette 24000 BTU");
        assert_eq!(next.labor_items[0].hours, dec!(5));
        assert_eq!(root.supply_items[0].id, "s-root");
    }

    #[test]
    fn test_next_version_clears_confirmation() {
        let mut quote = draft("P-00000042");
        quote.confirmed = true;
        quote.reference_number = Some("BC-2024-118".to_string());

        let next = quote.next_version();
        assert!(!next.confirmed);
        assert_eq!(next.reference_number, None);
        // The source record is untouched
        assert!(quote.confirmed);
    }

    #[test]
    fn test_parent_sentinels_deserialize_to_none() {
        for sentinel in [json!(""), json!("0"), json!(null)] {
            let quote: Quote = serde_json::from_value(server_payload(sentinel.clone())).unwrap();
            assert_eq!(quote.parent_id, None, "sentinel {:?}", sentinel);
        }

        let quote: Quote = serde_json::from_value(server_payload(json!("P-00000001"))).unwrap();
        assert_eq!(quote.parent_id.as_deref(), Some("P-00000001"));
        assert_eq!(quote.version, 2);
        assert_eq!(quote.supply_pricing.exchange_rate, dec!(3.35));
    }

    #[test]
    fn test_totals_serialize_with_wire_names() {
        let value = serde_json::to_value(draft("P-00000042")).unwrap();
        for key in ["totalSuppliesHT", "totalLaborHT", "totalHT", "tva", "totalTTC"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }
}
