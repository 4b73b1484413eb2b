//! Integration tests for the champion registry endpoints.

mod common;

use serde_json::Value;

#[tokio::test]
async fn health_check_responds_ok() {
    let path = common::write_champions_file(common::default_champions());
    let base = common::spawn_app(&path, common::Upstreams::default()).await;

    let resp = reqwest::get(format!("{base}/health"))
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn list_champions_returns_the_registry() {
    let path = common::write_champions_file(common::default_champions());
    let base = common::spawn_app(&path, common::Upstreams::default()).await;

    let resp = reqwest::get(format!("{base}/api/champions"))
        .await
        .expect("Failed to fetch champions");
    assert_eq!(resp.status(), 200);

    let champions: Vec<Value> = resp.json().await.expect("Invalid JSON");
    assert_eq!(champions.len(), 3);
    assert_eq!(champions[1]["name"], "Garry Kasparov");
    assert_eq!(champions[2]["lichess"], "DrNykterstein");
}

#[tokio::test]
async fn missing_champions_file_is_a_500_with_error_body() {
    let path = std::env::temp_dir().join(format!("missing-{}.json", common::unique_suffix()));
    let base = common::spawn_app(&path, common::Upstreams::default()).await;

    let resp = reqwest::get(format!("{base}/api/champions"))
        .await
        .expect("Failed to reach endpoint");
    assert_eq!(resp.status(), 500);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn search_suggests_kasparov_for_kasp() {
    let path = common::write_champions_file(common::default_champions());
    let base = common::spawn_app(&path, common::Upstreams::default()).await;

    let resp = reqwest::get(format!("{base}/api/champions/search?q=kasp"))
        .await
        .expect("Failed to search");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("Invalid JSON");
    let suggestions = body["suggestions"].as_array().expect("suggestions array");
    assert!(suggestions.len() <= 5);
    assert!(suggestions
        .iter()
        .any(|c| c["name"] == "Garry Kasparov"));
}

#[tokio::test]
async fn empty_search_query_yields_no_suggestions() {
    let path = common::write_champions_file(common::default_champions());
    let base = common::spawn_app(&path, common::Upstreams::default()).await;

    for url in [
        format!("{base}/api/champions/search?q="),
        format!("{base}/api/champions/search"),
    ] {
        let resp = reqwest::get(url).await.expect("Failed to search");
        let body: Value = resp.json().await.expect("Invalid JSON");
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 0);
    }
}

#[tokio::test]
async fn unknown_champion_id_is_not_found_not_a_crash() {
    let path = common::write_champions_file(common::default_champions());
    let base = common::spawn_app(&path, common::Upstreams::default()).await;

    let resp = reqwest::get(format!("{base}/api/champions/9999"))
        .await
        .expect("Failed to reach endpoint");
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["error"], "Champion not found");
}

#[tokio::test]
async fn champion_detail_tolerates_unreachable_platforms() {
    // Both platform base URLs point at a closed port; the champion record
    // itself must still come back, with null profiles.
    let path = common::write_champions_file(common::default_champions());
    let base = common::spawn_app(&path, common::Upstreams::default()).await;

    let resp = reqwest::get(format!("{base}/api/champions/16"))
        .await
        .expect("Failed to fetch champion");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["champion"]["name"], "Magnus Carlsen");
    assert!(body["lichessUser"].is_null());
    assert!(body["chessComPlayer"].is_null());
}
