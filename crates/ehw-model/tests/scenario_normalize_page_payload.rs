//! End-to-end: page JSON payload -> canonical snapshot.

use ehw_model::{normalize_with_outcome, parse_asset_list, NormalizeError, SkipReason};

const PAYLOAD: &str = r#"[
  {"AssetCode":"NAV","AssetName":"Net Asset Value","Value":"12500000000"},
  {"AssetCode":"CASH","AssetName":"Cash","Value":"625000000"},
  {"AssetCode":"FUT","AssetName":"Futures","Value":"0"},
  {"AssetCode":"ST","AssetName":"Stocks","Value":"11875000000","Details":[
    {"DetailCode":"2330","DetailName":"台積電","NavRate":9.07,"Share":"2722000.0000"},
    {"DetailCode":"2454","DetailName":"聯發科","NavRate":"4.12","Share":"310000"},
    {"DetailCode":"2317","DetailName":"鴻海","NavRate":"3.3","Share":"bad"},
    {"DetailCode":3017,"DetailName":"奇鋐","NavRate":2.01,"Share":155000}
  ]}
]"#;

#[test]
fn scenario_page_payload_normalizes_and_absorbs_bad_entry() {
    let assets = parse_asset_list(PAYLOAD).unwrap();
    let out = normalize_with_outcome(&assets).unwrap();

    assert_eq!(out.snapshot.len(), 3, "bad Share entry must be skipped, not fatal");
    assert_eq!(out.skipped.len(), 1);
    assert_eq!(out.skipped[0].code.as_deref(), Some("2317"));
    assert!(matches!(out.skipped[0].reason, SkipReason::InvalidShares(_)));

    // 625M / 12.5B = 5%
    assert!((out.snapshot.cash_position - 5.0).abs() < 1e-9);

    let tsmc = out.snapshot.get("2330").unwrap();
    assert_eq!(tsmc.name, "台積電");
    assert_eq!(tsmc.shares, 2_722_000);

    // numeric DetailCode is keyed the same way as a textual one
    assert_eq!(out.snapshot.get("3017").unwrap().shares, 155_000);
}

#[test]
fn scenario_truncated_payload_is_parse_error() {
    let err = parse_asset_list(&PAYLOAD[..40]).unwrap_err();
    assert!(matches!(err, NormalizeError::Malformed(_)));
}
