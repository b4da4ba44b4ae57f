use ehw_model::normalize;
use ehw_notify::Notifier;
use ehw_source::{extract_asset_list, HoldingsSource, SourceError};
use ehw_testkit::{
    asset_list, page_html, snapshot_of, FailingNotifier, FailingSource, RecordingNotifier,
    StaticSource,
};

const HOLDINGS: &[(&str, &str, f64, i64)] = &[
    ("2330", "TSMC", 9.07, 2_722_000),
    ("2454", "MediaTek & Co", 4.1, 310_000),
];

#[test]
fn asset_list_normalizes_to_snapshot_of() {
    let snapshot = normalize(&asset_list(1000.0, 25.0, HOLDINGS)).unwrap();
    assert_eq!(snapshot, snapshot_of(HOLDINGS, 2.5));
}

#[test]
fn page_html_round_trips_through_extraction() {
    let assets = asset_list(1000.0, 25.0, HOLDINGS);
    let html = page_html(&assets).unwrap();
    let extracted = extract_asset_list(&html, "DataAsset", "data-content").unwrap();
    assert_eq!(normalize(&extracted).unwrap(), normalize(&assets).unwrap());
}

#[tokio::test]
async fn fakes_behave() {
    let s = StaticSource::new(asset_list(1.0, 0.0, HOLDINGS));
    assert_eq!(s.fetch_assets().await.unwrap().len(), 3);

    let f = FailingSource::new(SourceError::HttpStatus { status: 500 });
    assert!(f.fetch_assets().await.unwrap_err().is_fetch_failure());

    let rec = RecordingNotifier::new();
    rec.deliver("a").await.unwrap();
    rec.deliver("b").await.unwrap();
    assert_eq!(rec.messages(), vec!["a".to_string(), "b".to_string()]);

    let bad = FailingNotifier::new();
    assert!(bad.deliver("x").await.is_err());
    assert_eq!(bad.attempts(), 1);
}
