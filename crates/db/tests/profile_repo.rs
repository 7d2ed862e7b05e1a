//! Integration tests for the `profiles` table through both the raw
//! repository and the [`PgProfileRepository`] adapter.
//!
//! Run with `cargo test -p homecarpent-db -- --ignored` against a database.

use assert_matches::assert_matches;
use homecarpent_core::error::CoreError;
use homecarpent_core::ports::ProfileRepository;
use homecarpent_core::profile::{submit_rating, NewProfile, ProfilePatch};
use homecarpent_core::user_type::UserType;
use homecarpent_db::models::session::CreateSession;
use homecarpent_db::models::user::CreateUser;
use homecarpent_db::repositories::{ProfileRepo, SessionRepo, UserRepo};
use homecarpent_db::PgProfileRepository;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_profile(name: &str, user_type: UserType) -> NewProfile {
    NewProfile {
        owner_id: None,
        name: name.to_string(),
        location: "Pune".to_string(),
        description: String::new(),
        timeline: "2 weeks".to_string(),
        catalog: "Kitchen".to_string(),
        user_type,
        photo_urls: vec!["http://x/1.jpg".to_string(), "http://x/2.jpg".to_string()],
        video_url: None,
        profile_pic_url: Some("http://x/me.png".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgProfileRepository::new(pool);

    let created = repo
        .create(&new_profile("Asha", UserType::Designer))
        .await
        .unwrap();
    assert_eq!(created.rating, 0.0);
    assert!(created.reviews.is_empty());
    assert_eq!(created.photo_urls.len(), 2);

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found, created);
    assert!(repo.find_by_id(created.id + 1000).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_list_is_insertion_ordered(pool: PgPool) {
    let repo = PgProfileRepository::new(pool);
    for name in ["C", "A", "B"] {
        repo.create(&new_profile(name, UserType::Carpenter))
            .await
            .unwrap();
    }

    let names: Vec<_> = repo
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["C", "A", "B"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_rating_round_trip(pool: PgPool) {
    let repo = PgProfileRepository::new(pool);
    let mut profile = repo
        .create(&new_profile("Asha", UserType::Designer))
        .await
        .unwrap();

    for score in [5, 4, 4] {
        let rated = submit_rating(&profile, score).unwrap();
        profile = repo
            .update(profile.id, &ProfilePatch::rating_of(&rated))
            .await
            .unwrap();
    }

    assert_eq!(profile.reviews, vec![5, 4, 4]);
    assert_eq!(profile.rating, 4.3);
    // Text fields untouched by a rating-only patch.
    assert_eq!(profile.catalog, "Kitchen");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_partial_update_and_missing_row(pool: PgPool) {
    let repo = PgProfileRepository::new(pool.clone());
    let created = repo
        .create(&new_profile("Asha", UserType::Designer))
        .await
        .unwrap();

    let patch = ProfilePatch {
        name: Some("  Asha Interiors ".to_string()),
        timeline: Some("1 month".to_string()),
        ..ProfilePatch::default()
    };
    let updated = repo.update(created.id, &patch).await.unwrap();
    assert_eq!(updated.name, "Asha Interiors");
    assert_eq!(updated.timeline, "1 month");
    assert_eq!(updated.location, "Pune");
    assert!(updated.updated_at >= created.updated_at);

    assert_matches!(
        repo.update(created.id + 1000, &patch).await,
        Err(CoreError::NotFound { entity: "Profile", .. })
    );
    assert!(ProfileRepo::update(&pool, created.id + 1000, &patch)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_violates_unique_constraint(pool: PgPool) {
    let input = CreateUser {
        email: "asha@example.com".to_string(),
        password_hash: "hash".to_string(),
        user_type: "designer".to_string(),
    };
    UserRepo::create(&pool, &input).await.unwrap();

    let err = UserRepo::create(&pool, &input).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_revoked_sessions_are_not_active(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            email: "c@example.com".to_string(),
            password_hash: "hash".to_string(),
            user_type: "customer".to_string(),
        },
    )
    .await
    .unwrap();
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "abc".to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::days(1),
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::find_active(&pool, session.id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(
        SessionRepo::revoke_all_for_user(&pool, user.id)
            .await
            .unwrap(),
        1
    );
    assert!(SessionRepo::find_active(&pool, session.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_cleanup_removes_expired_and_revoked_sessions(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            email: "d@example.com".to_string(),
            password_hash: "hash".to_string(),
            user_type: "designer".to_string(),
        },
    )
    .await
    .unwrap();

    let session = |hash: &str, days: i64| CreateSession {
        user_id: user.id,
        refresh_token_hash: hash.to_string(),
        expires_at: chrono::Utc::now() + chrono::Duration::days(days),
    };
    let live = SessionRepo::create(&pool, &session("live", 1)).await.unwrap();
    SessionRepo::create(&pool, &session("expired", -1)).await.unwrap();
    let revoked = SessionRepo::create(&pool, &session("revoked", 1)).await.unwrap();
    assert!(SessionRepo::revoke(&pool, revoked.id).await.unwrap());

    assert_eq!(SessionRepo::cleanup_expired(&pool).await.unwrap(), 2);
    assert!(SessionRepo::find_active(&pool, live.id)
        .await
        .unwrap()
        .is_some());
    assert!(SessionRepo::find_by_refresh_token_hash(&pool, "expired")
        .await
        .unwrap()
        .is_none());
}
