
use reqwest::StatusCode;
use test_utils::*;

async fn content_type(app: &TestApp, path: &str) -> (StatusCode, String) {
    let response = app.get(path).await;
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    (status, content_type)
}

#[actix_rt::test]
async fn landing_page_is_html() {
    let app = TestApp::spawn().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
    let page = response.text().await.unwrap();
    assert!(page.contains("Portfolio Test"));
    assert!(page.contains("Test Owner"));
    assert!(page.contains(r#"id="contact-form""#));
}

#[actix_rt::test]
async fn assets_are_served_by_extension() {
    let app = TestApp::spawn().await;

    let (status, ct) = content_type(&app, "/styles.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.starts_with("text/css"));

    let (status, ct) = content_type(&app, "/script.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.starts_with("application/javascript"));

    let (status, ct) = content_type(&app, "/favicon.svg").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.starts_with("image/svg+xml"));
}

#[actix_rt::test]
async fn static_prefix_serves_the_directory_as_is() {
    let app = TestApp::spawn().await;

    let (status, ct) = content_type(&app, "/static/css/styles.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ct.starts_with("text/css"));

    let (status, _) = content_type(&app, "/static/css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn missing_assets_are_404() {
    let app = TestApp::spawn().await;

    for path in ["/missing.css", "/missing.js", "/missing.png", "/static/missing.txt"] {
        let (status, _) = content_type(&app, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
    }
}

#[actix_rt::test]
async fn traversal_outside_the_static_dir_is_404() {
    let app = TestApp::spawn().await;

    for path in ["/%2e%2e/Cargo.toml", "/static/%2e%2e/Cargo.toml", "/css/%2e%2e%2f%2e%2e%2fCargo.toml"] {
        let (status, _) = content_type(&app, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
    }
}

#[actix_rt::test]
async fn assets_do_not_count_against_the_default_limit() {
    let app = TestApp::spawn_with(
        |config| config.ratelimit_default = "3 per minute".to_string(),
        TestNotifier::default(),
    )
    .await;

    for _ in 0..10 {
        for path in ["/static/css/styles.css", "/static/js/script.js", "/favicon.svg", "/styles.css"] {
            let (status, _) = content_type(&app, path).await;
            assert_eq!(status, StatusCode::OK, "{}", path);
        }
    }

    for _ in 0..3 {
        assert_eq!(app.get("/").await.status(), StatusCode::OK);
    }
    assert_eq!(app.get("/").await.status(), StatusCode::TOO_MANY_REQUESTS);
}
