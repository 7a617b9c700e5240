//! Post publishing, feed pagination, and editing over HTTP.

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::{MultipartBuilder, TestContext, TEST_IMAGE};

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Files currently sitting in the test upload directory
fn stored_files(ctx: &TestContext) -> usize {
    std::fs::read_dir(&ctx.upload_dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

#[actix_web::test]
async fn test_create_post_requires_auth() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Vintage chair")
        .text("description", "Solid oak, some scratches.")
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_create_post_with_image_and_location() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    ctx.seeded_user("maria_92", "maria@example.com").await;
    let tokens = ctx.tokens_for("maria_92").await;

    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Vintage chair")
        .text("description", "Solid oak, some scratches.")
        .text("latitude", "41.3874")
        .text("longitude", "2.1686")
        .file("images", "chair.jpg", "image/jpeg", TEST_IMAGE)
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["title"], "Vintage chair");
    assert_eq!(body["data"]["location"]["latitude"], json!(41.3874));

    let images = body["data"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    let url = images[0].as_str().unwrap();
    assert!(url.starts_with("uploads/"));
    assert!(url.ends_with(".jpg"));

    // The file really landed on disk
    let filename = url.rsplit('/').next().unwrap();
    assert!(ctx.upload_dir.join(filename).is_file());
}

#[actix_web::test]
async fn test_create_post_rejects_non_image_upload() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    ctx.seeded_user("maria_92", "maria@example.com").await;
    let tokens = ctx.tokens_for("maria_92").await;

    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Vintage chair")
        .text("description", "Solid oak.")
        .file("images", "notes.txt", "text/plain", b"just text")
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "UPLOAD_ERROR");

    // Nothing stays behind on disk
    assert_eq!(stored_files(&ctx), 0);
}

#[actix_web::test]
async fn test_create_post_enforces_image_cap() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    ctx.seeded_user("maria_92", "maria@example.com").await;
    let tokens = ctx.tokens_for("maria_92").await;

    // The context allows three images per post
    let mut builder = MultipartBuilder::new()
        .text("title", "Vintage chair")
        .text("description", "Solid oak.");
    for index in 0..4 {
        builder = builder.file(
            "images",
            &format!("photo-{}.jpg", index),
            "image/jpeg",
            TEST_IMAGE,
        );
    }
    let (content_type, body) = builder.build();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");

    // The files accepted before the cap fired were unlinked again
    assert_eq!(stored_files(&ctx), 0);
}

#[actix_web::test]
async fn test_create_post_validates_fields_and_location() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    ctx.seeded_user("maria_92", "maria@example.com").await;
    let tokens = ctx.tokens_for("maria_92").await;

    // Missing title
    let (content_type, body) = MultipartBuilder::new()
        .text("description", "Solid oak.")
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Latitude that is not a number
    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Vintage chair")
        .text("description", "Solid oak.")
        .text("latitude", "north")
        .text("longitude", "2.1686")
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Latitude without longitude
    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Vintage chair")
        .text("description", "Solid oak.")
        .text("latitude", "41.3874")
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Latitude outside the valid range
    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Vintage chair")
        .text("description", "Solid oak.")
        .text("latitude", "91.0")
        .text("longitude", "2.1686")
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_feed_is_public_and_paginates() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    let user = ctx.seeded_user("maria_92", "maria@example.com").await;
    for title in ["City bike", "Skateboard", "Record player"] {
        ctx.seeded_post(user.id, title).await;
    }

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts?limit=2")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    let first_page = body["data"]["data"].as_array().unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(body["data"]["has_more"], json!(true));
    // The cursor points at the last row of the page
    let cursor = body["data"]["next_cursor"].as_str().unwrap();
    assert_eq!(first_page[1]["id"].as_str().unwrap(), cursor);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts?limit=2&after={}", cursor))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    let second_page = body["data"]["data"].as_array().unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(body["data"]["has_more"], json!(false));
    assert!(body["data"]["next_cursor"].is_null());

    // Both pages together cover all three posts exactly once
    let mut titles: Vec<String> = first_page
        .iter()
        .chain(second_page.iter())
        .map(|post| post["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["City bike", "Record player", "Skateboard"]);
}

#[actix_web::test]
async fn test_feed_rejects_garbage_cursor() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts?after=not-a-cursor")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_post_detail_and_unknown_id() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    let user = ctx.seeded_user("maria_92", "maria@example.com").await;
    let post = ctx.seeded_post(user.id, "City bike").await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{}", post.post.id))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["title"], "City bike");
    assert_eq!(body["data"]["user_id"].as_str().unwrap(), user.id.to_string());

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{}", uuid::Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_update_post_is_owner_only() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    let owner = ctx.seeded_user("maria_92", "maria@example.com").await;
    ctx.seeded_user("jordi_88", "jordi@example.com").await;
    let post = ctx.seeded_post(owner.id, "City bike").await;
    let intruder_tokens = ctx.tokens_for("jordi_88").await;

    // A foreign user cannot edit, and the file uploaded along the way
    // is unlinked again
    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Hijacked")
        .file("images", "sneaky.jpg", "image/jpeg", TEST_IMAGE)
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/posts/{}", post.post.id))
            .insert_header(bearer(&intruder_tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(stored_files(&ctx), 0);

    // The owner edits the title and appends an image
    let owner_tokens = ctx.tokens_for("maria_92").await;
    let (content_type, body) = MultipartBuilder::new()
        .text("title", "City bike, freshly serviced")
        .file("images", "bike.jpg", "image/jpeg", TEST_IMAGE)
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/posts/{}", post.post.id))
            .insert_header(bearer(&owner_tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["title"], "City bike, freshly serviced");
    assert_eq!(body["data"]["images"].as_array().unwrap().len(), 1);
    assert_eq!(stored_files(&ctx), 1);
}

#[actix_web::test]
async fn test_remove_images_detaches_and_unlinks() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    ctx.seeded_user("maria_92", "maria@example.com").await;
    let tokens = ctx.tokens_for("maria_92").await;

    // Publish with two images over HTTP so files exist on disk
    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Record player")
        .text("description", "Belt drive, new needle.")
        .file("images", "front.jpg", "image/jpeg", TEST_IMAGE)
        .file("images", "back.jpg", "image/jpeg", TEST_IMAGE)
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    let post_id = body["data"]["id"].as_str().unwrap().to_string();
    let first_url = body["data"]["images"][0].as_str().unwrap().to_string();
    assert_eq!(stored_files(&ctx), 2);

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{}/images", post_id))
            .insert_header(bearer(&tokens.access_token))
            .set_json(json!({"urls": [first_url]}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    let remaining = body["data"]["images"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0].as_str().unwrap(), first_url);
    assert_eq!(stored_files(&ctx), 1);
}

#[actix_web::test]
async fn test_delete_post_removes_files() {
    let ctx = TestContext::new();
    let app = test::init_service(ctx.app()).await;
    ctx.seeded_user("maria_92", "maria@example.com").await;
    ctx.seeded_user("jordi_88", "jordi@example.com").await;
    let tokens = ctx.tokens_for("maria_92").await;

    let (content_type, body) = MultipartBuilder::new()
        .text("title", "Skateboard")
        .text("description", "Barely used.")
        .file("images", "deck.jpg", "image/jpeg", TEST_IMAGE)
        .build();
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(bearer(&tokens.access_token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    let post_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(stored_files(&ctx), 1);

    // Deleting someone else's post is refused
    let intruder_tokens = ctx.tokens_for("jordi_88").await;
    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{}", post_id))
            .insert_header(bearer(&intruder_tokens.access_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{}", post_id))
            .insert_header(bearer(&tokens.access_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(stored_files(&ctx), 0);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{}", post_id))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
