use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, FeatureCollection, Quake, QUERY_PATH};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn query(params: &str) -> Request<String> {
    get(&format!("{QUERY_PATH}?{params}"))
}

// --- query ---

#[tokio::test]
async fn default_query_returns_2012_m6_events_newest_first() {
    let resp = app()
        .oneshot(query("format=geojson&starttime=2012-01-01&endtime=2012-12-01&minmagnitude=6"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let collection: FeatureCollection = body_json(resp).await;
    assert_eq!(collection.kind, "FeatureCollection");
    assert_eq!(collection.metadata.count, 5);
    assert_eq!(collection.features.len(), 5);

    let first = &collection.features[0].properties;
    assert_eq!(first.title, "M 7.4 - 24km SSW of Champerico, Guatemala");
    assert_eq!(first.tsunami, 0);

    let times: Vec<i64> = collection.features.iter().map(|f| f.properties.time).collect();
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);
}

#[tokio::test]
async fn minmagnitude_filters_smaller_events() {
    let resp = app()
        .oneshot(query("format=geojson&starttime=2012-01-01&endtime=2012-12-01&minmagnitude=8"))
        .await
        .unwrap();

    let collection: FeatureCollection = body_json(resp).await;
    assert_eq!(collection.features.len(), 1);
    assert_eq!(
        collection.features[0].properties.title,
        "M 8.6 - off the west coast of northern Sumatra"
    );
}

#[tokio::test]
async fn empty_window_returns_empty_features() {
    let resp = app()
        .oneshot(query("format=geojson&starttime=1990-01-01&endtime=1990-02-01&minmagnitude=6"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["features"], serde_json::json!([]));
}

#[tokio::test]
async fn endtime_is_exclusive() {
    let catalog = vec![Quake {
        mag: 6.5,
        title: "midnight".to_string(),
        time: 1_354_320_000_000, // 2012-12-01T00:00:00Z
        tsunami: 0,
    }];
    let resp = app_with(catalog.clone())
        .oneshot(query("format=geojson&starttime=2012-11-01&endtime=2012-12-01"))
        .await
        .unwrap();
    let collection: FeatureCollection = body_json(resp).await;
    assert!(collection.features.is_empty());

    let resp = app_with(catalog)
        .oneshot(query("format=geojson&starttime=2012-12-01&endtime=2012-12-02"))
        .await
        .unwrap();
    let collection: FeatureCollection = body_json(resp).await;
    assert_eq!(collection.features.len(), 1);
}

#[tokio::test]
async fn unsupported_format_returns_400() {
    let resp = app().oneshot(query("format=quakeml")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_format_returns_400() {
    let resp = app().oneshot(query("minmagnitude=6")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_date_returns_400() {
    let resp = app()
        .oneshot(query("format=geojson&starttime=2012-13-40"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- status ---

#[tokio::test]
async fn status_route_echoes_code() {
    for code in [204u16, 404, 500, 503] {
        let resp = app().oneshot(get(&format!("/status/{code}"))).await.unwrap();
        assert_eq!(resp.status().as_u16(), code);
    }
}

#[tokio::test]
async fn status_route_rejects_out_of_range_code() {
    let resp = app().oneshot(get("/status/42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
