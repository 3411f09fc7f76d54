//! Integration tests for storyprint-api

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use storyprint::units::PageSize;
use storyprint::PageGeometry;
use storyprint_api::{app, app_with_state, AppState, ErrorResponse, PaginateResponse, StoryResponse};
use tower::util::ServiceExt;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

fn story_text() -> String {
    (0..90)
        .map(|i| format!("Avsnitt {i}: Hei, Sofie og Ola! Se, der kommer dampskipet."))
        .collect::<Vec<_>>()
        .join("\n\n")
}

async fn create_story(app: &Router) -> StoryResponse {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/stories",
            json!({
                "name": "Ola",
                "date": "18.08.1894",
                "location": "Bergen, Norge",
                "extra_details": "a fisherman's daughter",
                "story": story_text(),
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_paginate_with_custom_geometry() {
    let geometry = PageGeometry::default()
        .with_page_size(PageSize::new(200.0, 120.0))
        .with_margins(10.0, 10.0, 10.0)
        .with_line_height(10.0)
        .with_max_chars_per_line(5);
    let lines: Vec<String> = (0..25).map(|i| format!("l{i}")).collect();

    let response = app()
        .oneshot(post_json(
            "/api/paginate",
            json!({ "text": lines.join("\n"), "geometry": geometry }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result: PaginateResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(result.page_count, 3);
    assert_eq!(result.pages[2].fragments().len(), 5);
    assert_eq!(result.pages[2].fragments()[0].text, "l20");
}

#[tokio::test]
async fn test_paginate_zero_budget_is_bad_request() {
    let response = app()
        .oneshot(post_json(
            "/api/paginate",
            json!({ "text": "Hei", "geometry": { "max_chars_per_line": 0 } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error.error.starts_with("Invalid geometry"));
}

#[tokio::test]
async fn test_paginate_word_aware() {
    let geometry = PageGeometry::default().with_max_chars_per_line(8);
    let response = app()
        .oneshot(post_json(
            "/api/paginate",
            json!({ "text": "kald morgen i byen", "geometry": geometry, "wrap_mode": "word_aware" }),
        ))
        .await
        .unwrap();

    let result: PaginateResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let texts: Vec<&str> = result.pages[0]
        .fragments()
        .iter()
        .map(|f| f.text.as_str())
        .collect();
    assert_eq!(texts, vec!["kald", "morgen i", "byen"]);
}

#[tokio::test]
async fn test_export_pdf_and_html() {
    let response = app()
        .oneshot(post_json("/api/export", json!({ "text": story_text() })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert!(body_bytes(response).await.starts_with(b"%PDF-1.7"));

    let response = app()
        .oneshot(post_json(
            "/api/export",
            json!({ "text": "<Hei>", "format": "html", "options": { "title": "Bergen" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<title>Bergen</title>"));
    assert!(html.contains("&lt;Hei&gt;"));
}

#[tokio::test]
async fn test_story_context_lifecycle() {
    let app = app_with_state(Arc::new(AppState::default()));
    let story = create_story(&app).await;

    assert_eq!(story.title, "Bergen, Norge 18.08.1894");
    assert_eq!(story.download_file_name, "bergen-norge-18-08-1894.pdf");
    assert!(story.portrait_prompt.contains("a fisherman's daughter in Bergen, Norge in the year 1894"));

    let response = app
        .clone()
        .oneshot(get(&format!("/api/stories/{}", story.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: StoryResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(fetched.id, story.id);
    assert_eq!(fetched.story, story_text());

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/stories/{}", story.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/stories/{}", story.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_story_pdf_is_memoized() {
    let state = Arc::new(AppState::default());
    let app = app_with_state(Arc::clone(&state));
    let story = create_story(&app).await;
    let uri = format!("/api/stories/{}/pdf", story.id);

    let first = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(
        first.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"bergen-norge-18-08-1894.pdf\""
    );
    let first = body_bytes(first).await;
    assert!(first.starts_with(b"%PDF-1.7"));

    let second = body_bytes(app.clone().oneshot(get(&uri)).await.unwrap()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_separate_contexts_are_independent() {
    let app = app();
    let a = create_story(&app).await;
    let b = create_story(&app).await;
    assert_ne!(a.id, b.id);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/stories/{}", a.id))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(delete).await.unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/stories/{}/pdf", b.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_story_requires_fields() {
    let response = app()
        .oneshot(post_json(
            "/api/stories",
            json!({ "name": "  ", "date": "1894", "location": "Bergen", "story": "Hei" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error.error, "Invalid story request: name is required");
}

#[tokio::test]
async fn test_delete_unknown_story() {
    let delete = Request::builder()
        .method("DELETE")
        .uri("/api/stories/987654")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
