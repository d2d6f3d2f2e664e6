//! Normalization tests

use inspection_cert_sdk::models::{CallRecord, CertificateKind};
use inspection_cert_sdk::normalize::{normalize, normalize_json, rules_for};
use proptest::prelude::*;
use serde_json::{Value, json};

fn call(value: Value) -> CallRecord {
    CallRecord::from_value(value)
}

#[test]
fn test_empty_call_gives_blank_certificate_for_every_kind() {
    for kind in CertificateKind::ALL {
        let model = normalize(kind, &CallRecord::new());
        assert!(model.is_blank());
        for rule in rules_for(kind) {
            assert!(model.declares(rule.name));
        }
        // no defaults on a blank certificate
        assert_eq!(model.get("itemNo"), "");
        assert_eq!(model.get("reasonsForRejection"), "");
    }
}

#[test]
fn test_final_product_defaults_apply_to_non_empty_call() {
    let model = normalize(
        CertificateKind::FinalProduct,
        &call(json!({"contractor": "M/s SAI KRIPA INDUSTRIES"})),
    );
    assert_eq!(model.get("contractor"), "M/s SAI KRIPA INDUSTRIES");
    assert_eq!(model.get("itemNo"), "1");
    assert_eq!(model.get("reasonsForRejection"), "Not Applicable");
    assert_eq!(model.get("certificateNo"), "");
}

#[test]
fn test_raw_material_fallback_chain_order() {
    let model = normalize(
        CertificateKind::RawMaterial,
        &call(json!({
            "certificateNo": "RM/IC/2",
            "icNo": "RM/IC/1",
            "vendor_name": "Vendor B",
            "firmName": "Vendor C",
            "inspectionDate": "12/03/2025",
        })),
    );
    assert_eq!(model.get("certificateNo"), "RM/IC/1");
    assert_eq!(model.get("contractor"), "Vendor B");
    assert_eq!(model.get("date"), "12/03/2025");
    assert_eq!(model.get("dateOfInspection"), "12/03/2025");
}

#[test]
fn test_falsy_values_fall_through_to_next_source() {
    let model = normalize(
        CertificateKind::Process,
        &call(json!({
            "manDays": 0,
            "noOfManDays": "",
            "totalManDays": 3,
        })),
    );
    assert_eq!(model.get("manDays"), "3");
}

#[test]
fn test_drawing_lookup() {
    let known = normalize(CertificateKind::Process, &call(json!({"ercType": "mk-v"})));
    assert_eq!(known.get("drgNo"), "mk-v : T-5919");

    let upper = normalize(CertificateKind::Process, &call(json!({"typeOfErc": "MK-III"})));
    assert_eq!(upper.get("drgNo"), "MK-III : T-3701");

    let unknown = normalize(
        CertificateKind::Process,
        &call(json!({"ercType": "unknown-x"})),
    );
    assert_eq!(unknown.get("drgNo"), "unknown-x : unknown-x");

    let raw = normalize(
        CertificateKind::Process,
        &call(json!({"ercType": "", "drawingNo": "T-9999"})),
    );
    assert_eq!(raw.get("drgNo"), "T-9999");
}

#[test]
fn test_contract_reference_reformatting() {
    let model = normalize(
        CertificateKind::Process,
        &call(json!({"contractRef": "PO-123 dated 01/01/2024"})),
    );
    assert_eq!(model.get("contractRef"), "RB L. No. PO-123, Dt. 01/01/2024");

    let formatted = "RB L. No. 2024/17, Dt. 02/02/2024";
    let model = normalize(
        CertificateKind::Process,
        &call(json!({"contractReference": formatted})),
    );
    assert_eq!(model.get("contractRef"), formatted);

    let model = normalize(
        CertificateKind::Process,
        &call(json!({"rlyContractRef": ["A-1 Dated 03/03/2024", "", "B-2"]})),
    );
    assert_eq!(model.get("contractRef"), "RB L. No. A-1, Dt. 03/03/2024\nB-2");
}

#[test]
fn test_lot_totals() {
    let model = normalize(
        CertificateKind::Process,
        &call(json!({"lots": [{"acceptedQty": 3}, {"acceptedQty": 7}]})),
    );
    assert_eq!(model.totals.total_accepted, 10);
    assert_eq!(model.totals.total_processed, 0);

    let empty = normalize(CertificateKind::Process, &call(json!({"lots": []})));
    assert_eq!(empty.totals.total_accepted, 0);
    assert_eq!(empty.totals.total_processed, 0);
    assert_eq!(empty.totals.total_rejected, 0);
}

#[test]
fn test_lot_fields_and_malformed_entries() {
    let model = normalize(
        CertificateKind::Process,
        &call(json!({
            "lots": "not a list",
            "heatLots": [
                {"heatNo": "H-11", "processedQty": "120", "accepted": 118, "qtyRejected": "2"},
                "garbage",
                {"lotNo": "L-7", "totalQty": -5, "acceptedQty": "abc"},
            ],
        })),
    );
    assert_eq!(model.lots.len(), 2);
    assert_eq!(model.lots[0].heat_or_lot_no, "H-11");
    assert_eq!(model.lots[0].total_processed, 120);
    assert_eq!(model.lots[1].heat_or_lot_no, "L-7");
    assert_eq!(model.lots[1].total_processed, 0);
    assert_eq!(model.lots[1].accepted_qty, 0);
    assert_eq!(model.totals.total_accepted, 118);
    assert_eq!(model.totals.total_rejected, 2);
}

#[test]
fn test_lots_only_on_process_certificates() {
    let lots = json!({"lots": [{"acceptedQty": 3}]});
    for kind in [CertificateKind::RawMaterial, CertificateKind::FinalProduct] {
        let model = normalize(kind, &call(lots.clone()));
        assert!(model.lots.is_empty());
        assert_eq!(model.totals.total_accepted, 0);
    }
}

#[test]
fn test_final_product_certificate_number_is_sanitized() {
    let model = normalize(
        CertificateKind::FinalProduct,
        &call(json!({"certificateNo": "\u{FEFF}N/ERC/\r\n17\u{200B} "})),
    );
    assert_eq!(model.get("certificateNo"), "N/ERC/ 17");
}

#[test]
fn test_normalize_json_serializes_flat() {
    let model = normalize_json(
        CertificateKind::Process,
        r#"{"icNo": "P/1", "lots": [{"lotNo": "L1", "acceptedQty": 4}]}"#,
    )
    .unwrap();
    let json = serde_json::to_value(&model).unwrap();
    assert_eq!(json["kind"], "process");
    assert_eq!(json["certificateNo"], "P/1");
    assert_eq!(json["lots"][0]["heatOrLotNo"], "L1");
    assert_eq!(json["totals"]["totalAccepted"], 4);

    assert!(normalize_json(CertificateKind::Process, "[1, 2]").unwrap().is_blank());
    assert!(normalize_json(CertificateKind::Process, "{not json").is_err());
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 /.-]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_call() -> impl Strategy<Value = CallRecord> {
    let keys = prop_oneof![
        Just("icNo".to_string()),
        Just("lots".to_string()),
        Just("lotDetails".to_string()),
        Just("ercType".to_string()),
        Just("contractRef".to_string()),
        Just("certificateNo".to_string()),
        "[a-zA-Z]{1,10}",
    ];
    prop::collection::btree_map(keys, arb_json(), 0..8)
        .prop_map(|m| CallRecord::from_value(Value::Object(m.into_iter().collect())))
}

proptest! {
    #[test]
    fn prop_every_declared_field_is_present(call in arb_call()) {
        for kind in CertificateKind::ALL {
            let model = normalize(kind, &call);
            let json = serde_json::to_value(&model).unwrap();
            for name in kind.field_names() {
                prop_assert!(json.get(name).is_some_and(Value::is_string), "{} missing {}", kind, name);
            }
        }
    }

    #[test]
    fn prop_totals_are_column_sums(accepted in prop::collection::vec(0u32..100_000, 0..20)) {
        let lots: Vec<Value> = accepted.iter().map(|q| json!({"acceptedQty": q})).collect();
        let model = normalize(CertificateKind::Process, &call(json!({"lots": lots})));
        let expected: u64 = accepted.iter().map(|q| u64::from(*q)).sum();
        prop_assert_eq!(model.totals.total_accepted, expected);
    }
}
