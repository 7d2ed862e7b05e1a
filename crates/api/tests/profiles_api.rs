//! HTTP-level integration tests for the `/profiles` endpoints: catalog view,
//! multipart creation, owner edits and ratings.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_profile, get_auth, patch_json_auth, post_json_auth, post_multipart_auth,
    signup, Part,
};
use serde_json::{json, Value};

fn names(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_uploads_media_and_starts_unrated() {
    let app = common::build_test_app();
    let token = signup(app.router.clone(), "asha@example.com", "designer").await;

    let parts = [
        Part::Text("name", "Asha Interiors"),
        Part::Text("location", "Pune"),
        Part::Text("catalog", "Kitchen"),
        Part::Text("timeline", "2 weeks"),
        Part::File("photos", "one.jpg", "image/jpeg", b"jpeg-1"),
        Part::File("photos", "two.png", "image/png", b"png-2"),
        Part::File("video", "tour.mp4", "video/mp4", b"mp4"),
        Part::File("profile_pic", "me.webp", "image/webp", b"webp"),
    ];
    let response = post_multipart_auth(app.router.clone(), "/api/v1/profiles", &parts, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let profile = body_json(response).await["data"].clone();
    assert_eq!(profile["name"], "Asha Interiors");
    assert_eq!(profile["user_type"], "designer");
    assert_eq!(profile["rating"], 0.0);
    assert_eq!(profile["reviews"], json!([]));

    let photos = profile["photo_urls"].as_array().unwrap();
    assert_eq!(photos.len(), 2);
    assert!(photos[0].as_str().unwrap().ends_with("-one.jpg"));
    assert!(photos[1].as_str().unwrap().ends_with("-two.png"));
    assert!(profile["video_url"].as_str().unwrap().ends_with("-tour.mp4"));
    assert!(profile["profile_pic_url"]
        .as_str()
        .unwrap()
        .ends_with("-me.webp"));
    assert_eq!(app.blobs.len().await, 4);
}

#[tokio::test]
async fn failed_upload_creates_nothing() {
    let app = common::build_test_app();
    let token = signup(app.router.clone(), "b@example.com", "carpenter").await;
    app.blobs.fail_uploads_named("broken.jpg").await;

    let parts = [
        Part::Text("name", "Bharat Woodworks"),
        Part::File("photos", "fine.jpg", "image/jpeg", b"1"),
        Part::File("photos", "broken.jpg", "image/jpeg", b"2"),
    ];
    let response = post_multipart_auth(app.router.clone(), "/api/v1/profiles", &parts, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPLOAD_FAILED");

    let response = get_auth(app.router, "/api/v1/profiles", &token).await;
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[tokio::test]
async fn blank_name_or_wrong_media_type_is_rejected_before_upload() {
    let app = common::build_test_app();
    let token = signup(app.router.clone(), "c@example.com", "designer").await;

    let cases: [&[Part<'_>]; 2] = [
        &[Part::Text("name", "   ")],
        &[
            Part::Text("name", "Ok"),
            Part::File("video", "clip.exe", "application/octet-stream", b"x"),
        ],
    ];
    for parts in cases {
        let response =
            post_multipart_auth(app.router.clone(), "/api/v1/profiles", parts, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
    assert!(app.blobs.is_empty().await);
}

// ---------------------------------------------------------------------------
// Catalog view
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_filters_searches_and_sorts() {
    let app = common::build_test_app();
    let token = signup(app.router.clone(), "d@example.com", "designer").await;

    create_profile(app.router.clone(), &token, "Asha", "designer", "Pune", "Kitchen", "b").await;
    create_profile(app.router.clone(), &token, "Bharat", "carpenter", "Mumbai", "Wardrobe", "a").await;
    create_profile(app.router.clone(), &token, "Chitra", "designer", "Delhi", "Kitchen", "c").await;

    let all = get_auth(app.router.clone(), "/api/v1/profiles", &token).await;
    assert_eq!(names(&body_json(all).await), ["Asha", "Bharat", "Chitra"]);

    let designers = get_auth(app.router.clone(), "/api/v1/profiles?role=designer", &token).await;
    assert_eq!(names(&body_json(designers).await), ["Asha", "Chitra"]);

    let search = get_auth(app.router.clone(), "/api/v1/profiles?search=%20KITCHEN%20", &token).await;
    assert_eq!(names(&body_json(search).await), ["Asha", "Chitra"]);

    let by_location = get_auth(app.router.clone(), "/api/v1/profiles?search=mum", &token).await;
    assert_eq!(names(&body_json(by_location).await), ["Bharat"]);

    let sorted = get_auth(
        app.router.clone(),
        "/api/v1/profiles?sort_by_timeline=true",
        &token,
    )
    .await;
    assert_eq!(names(&body_json(sorted).await), ["Bharat", "Asha", "Chitra"]);

    let nothing = get_auth(
        app.router.clone(),
        "/api/v1/profiles?role=carpenter&search=kitchen",
        &token,
    )
    .await;
    assert_eq!(body_json(nothing).await["data"], json!([]));

    let bad_role = get_auth(app.router, "/api/v1/profiles?role=plumber", &token).await;
    assert_eq!(bad_role.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ratings_accumulate_and_show_in_catalog() {
    let app = common::build_test_app();
    let designer = signup(app.router.clone(), "e@example.com", "designer").await;
    let customer = signup(app.router.clone(), "f@example.com", "customer").await;
    let profile =
        create_profile(app.router.clone(), &designer, "Asha", "designer", "", "", "").await;
    let uri = format!("/api/v1/profiles/{}/ratings", profile["id"]);

    // Prime the catalog snapshot so the rating has to invalidate it.
    get_auth(app.router.clone(), "/api/v1/profiles", &customer).await;

    let mut last = Value::Null;
    for score in [5, 4, 4] {
        let response =
            post_json_auth(app.router.clone(), &uri, json!({ "score": score }), &customer).await;
        assert_eq!(response.status(), StatusCode::OK);
        last = body_json(response).await;
    }
    assert_eq!(last["data"]["reviews"], json!([5, 4, 4]));
    assert_eq!(last["data"]["rating"], 4.3);

    let listing = body_json(get_auth(app.router, "/api/v1/profiles", &customer).await).await;
    assert_eq!(listing["data"][0]["rating"], 4.3);
}

#[tokio::test]
async fn invalid_scores_are_rejected_without_change() {
    let app = common::build_test_app();
    let token = signup(app.router.clone(), "g@example.com", "designer").await;
    let profile = create_profile(app.router.clone(), &token, "Asha", "designer", "", "", "").await;
    let uri = format!("/api/v1/profiles/{}/ratings", profile["id"]);

    for score in [json!(0), json!(6), json!(4.5), json!("4"), Value::Null] {
        let response =
            post_json_auth(app.router.clone(), &uri, json!({ "score": score }), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "score {score}");
        assert_eq!(body_json(response).await["code"], "INVALID_RATING");
    }

    let fetched = get_auth(
        app.router,
        &format!("/api/v1/profiles/{}", profile["id"]),
        &token,
    )
    .await;
    let fetched = body_json(fetched).await;
    assert_eq!(fetched["data"]["reviews"], json!([]));
    assert_eq!(fetched["data"]["rating"], 0.0);
}

#[tokio::test]
async fn rating_a_missing_profile_is_not_found() {
    let app = common::build_test_app();
    let token = signup(app.router.clone(), "h@example.com", "customer").await;

    let response = post_json_auth(
        app.router,
        "/api/v1/profiles/999/ratings",
        json!({ "score": 3 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Owner edits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_the_owner_can_edit_and_rating_cannot_be_patched() {
    let app = common::build_test_app();
    let owner = signup(app.router.clone(), "i@example.com", "carpenter").await;
    let other = signup(app.router.clone(), "j@example.com", "carpenter").await;
    let profile =
        create_profile(app.router.clone(), &owner, "Bharat", "carpenter", "Mumbai", "", "").await;
    let uri = format!("/api/v1/profiles/{}", profile["id"]);

    let response = patch_json_auth(
        app.router.clone(),
        &uri,
        json!({ "location": "Thane" }),
        &other,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(
        app.router.clone(),
        &uri,
        json!({ "location": "Thane", "rating": 5.0, "reviews": [5, 5] }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["location"], "Thane");
    assert_eq!(updated["data"]["rating"], 0.0);
    assert_eq!(updated["data"]["reviews"], json!([]));

    let response = patch_json_auth(app.router, &uri, json!({ "name": "  " }), &owner).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
