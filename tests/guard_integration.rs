mod common;

use axum::http::StatusCode;
use common::{body_text, build_app, get, location, post_form, test_config};
use tower::ServiceExt;

// The identity provider is never contacted by these tests.
const UNUSED_PROVIDER: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn protected_page_redirects_anonymous_visitor_to_login() {
    let (app, _) = build_app(test_config(UNUSED_PROVIDER, "development"));

    let response = app.oneshot(get("/welcome", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}

#[tokio::test]
async fn protected_page_renders_with_session_cookie() {
    let (app, _) = build_app(test_config(UNUSED_PROVIDER, "development"));

    let response = app
        .oneshot(get("/welcome", Some("auth_token=abc")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Welcome to your protected dashboard!"));
}

#[tokio::test]
async fn auth_only_pages_send_signed_in_user_home() {
    let (app, _) = build_app(test_config(UNUSED_PROVIDER, "development"));

    for path in ["/login", "/register"] {
        let response = app
            .clone()
            .oneshot(get(path, Some("auth_token=abc")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
        assert_eq!(location(&response).as_deref(), Some("/welcome"), "{}", path);
    }
}

#[tokio::test]
async fn form_post_by_signed_in_user_lands_on_home_page() {
    let (app, _) = build_app(test_config(UNUSED_PROVIDER, "development"));

    for path in ["/login", "/register"] {
        let response = app
            .clone()
            .oneshot(post_form(path, &[("email", "a@b.com")], Some("auth_token=abc")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", path);
        let target = location(&response).expect("redirect has a Location");
        assert_eq!(target, "/welcome");

        // A browser follows a 303 with a GET.
        let followed = app
            .clone()
            .oneshot(get(&target, Some("auth_token=abc")))
            .await
            .unwrap();
        assert_eq!(followed.status(), StatusCode::OK, "{}", path);
    }
}

#[tokio::test]
async fn public_pages_are_always_reachable() {
    let (app, _) = build_app(test_config(UNUSED_PROVIDER, "development"));

    for cookie in [None, Some("auth_token=abc")] {
        for path in ["/", "/access-requested"] {
            let response = app.clone().oneshot(get(path, cookie)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{} {:?}", path, cookie);
        }
    }

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn empty_cookie_value_is_no_session() {
    let (app, _) = build_app(test_config(UNUSED_PROVIDER, "development"));

    let response = app
        .clone()
        .oneshot(get("/profile", Some("auth_token=")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/login"));

    let response = app
        .oneshot(get("/login", Some("auth_token=")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unrelated_cookies_do_not_count() {
    let (app, _) = build_app(test_config(UNUSED_PROVIDER, "development"));

    let response = app
        .oneshot(get("/welcome", Some("theme=dark; other_token=abc")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn guard_decisions_are_exported_as_metrics() {
    let (app, _) = build_app(test_config(UNUSED_PROVIDER, "development"));

    app.clone().oneshot(get("/welcome", None)).await.unwrap();
    let response = app.oneshot(get("/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("route_guard_decisions_total"));
    assert!(body.contains(r#"class="protected",decision="redirect""#));
}
