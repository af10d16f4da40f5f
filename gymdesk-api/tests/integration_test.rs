/// Integration tests for the GymDesk API
///
/// The whole router runs over the in-memory store:
/// - Authentication (signup, login, refresh, bearer enforcement)
/// - Member enrollment, edit, renewal, and tenant isolation
/// - Trainers, notifications, search, dashboard
/// - Lifecycle previews

mod common;

use axum::http::{Method, StatusCode};
use common::{member_form, trainer_form, TestContext, JWT_SECRET, OWNER_PASSWORD};
use gymdesk_shared::auth::jwt::issue_token_pair;
use serde_json::{json, Value};
use uuid::Uuid;

async fn enroll(ctx: &TestContext, name: &str, email: &str) -> Value {
    let (status, body) = ctx.post("/v1/members", member_form(name, email)).await;
    assert_eq!(status, StatusCode::CREATED, "enrollment failed: {}", body);
    body
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await.unwrap();
    let (status, body) = ctx.send_with_token(None, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_signup_login_refresh() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send_with_token(
            None,
            Method::POST,
            "/v1/auth/signup",
            Some(json!({
                "gym_name": "Harbor Boxing",
                "email": "lee@harbor.example",
                "password": "jab-cross-hook"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["owner"]["name"], "Harbor Boxing");
    assert_eq!(body["token_type"], "Bearer");
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send_with_token(
            None,
            Method::POST,
            "/v1/auth/login",
            Some(json!({ "email": "lee@harbor.example", "password": "jab-cross-hook" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let (status, body) = ctx
        .send_with_token(
            None,
            Method::POST,
            "/v1/auth/refresh",
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let access = body["access_token"].as_str().unwrap();

    let (status, body) = ctx
        .send_with_token(Some(access), Method::GET, "/v1/profile", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gym_name"], "Harbor Boxing");
}

#[tokio::test]
async fn test_signup_rejects_duplicate_and_short_password() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send_with_token(
            None,
            Method::POST,
            "/v1/auth/signup",
            Some(json!({
                "gym_name": "Copycat Gym",
                "email": "DANA@ironworks.example",
                "password": "long-enough-pass"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");

    let (status, body) = ctx
        .send_with_token(
            None,
            Method::POST,
            "/v1/auth/signup",
            Some(json!({
                "gym_name": "Tiny Gym",
                "email": "tiny@gym.example",
                "password": "short"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_login_failures_share_a_message() {
    let ctx = TestContext::new().await.unwrap();

    for (email, password) in [
        ("dana@ironworks.example", "wrong-password"),
        ("nobody@ironworks.example", OWNER_PASSWORD),
    ] {
        let (status, body) = ctx
            .send_with_token(
                None,
                Method::POST,
                "/v1/auth/login",
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = ctx.send_with_token(None, Method::GET, "/v1/members", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .send_with_token(Some("not-a-token"), Method::GET, "/v1/dashboard", None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let refresh = issue_token_pair(ctx.owner.id, JWT_SECRET).unwrap().refresh_token;
    let (status, _) = ctx
        .send_with_token(Some(&refresh), Method::GET, "/v1/members", None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_enroll_view_and_notification() {
    let ctx = TestContext::new().await.unwrap();
    let created = enroll(&ctx, "Ana Lima", "ana@example.com").await;
    assert_eq!(created["status"], "Active");
    assert_eq!(created["days_remaining"], 30);
    assert_eq!(created["emergency_contact"]["name"], "Sam");

    let id = created["id"].as_str().unwrap();
    let (status, view) = ctx.get(&format!("/v1/members/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "Active");
    assert!(view["trainer"].is_null());

    let (_, notifications) = ctx.get("/v1/notifications").await;
    assert_eq!(notifications[0]["message"], "New member Ana Lima has been added");

    let (_, count) = ctx.get("/v1/notifications/unread/count").await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_enrollment_validation_messages() {
    let ctx = TestContext::new().await.unwrap();

    let mut form = member_form("Ana", "ana@example.com");
    form["duration"] = json!(2);
    let (status, body) = ctx.post("/v1/members", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid membership duration");

    let mut form = member_form("Ana", "ana@example.com");
    form["needs_pt"] = json!(true);
    form["pt_sessions"] = json!(4);
    let (status, body) = ctx.post("/v1/members", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid number of PT sessions");

    let mut form = member_form("Ana", "ana@example.com");
    form["emergency_contact"] = json!({ "name": "", "phone": "" });
    let (status, body) = ctx.post("/v1/members", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Emergency contact information is required");

    let mut form = member_form("Ana", "ana@example.com");
    form["health_info"] = json!({ "weight": "-70" });
    let (status, body) = ctx.post("/v1/members", form).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid weight or height values");

    let (_, count) = ctx.get("/v1/notifications/unread/count").await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_duplicate_member_email_is_conflict() {
    let ctx = TestContext::new().await.unwrap();
    enroll(&ctx, "Ana", "ana@example.com").await;

    let (status, body) = ctx.post("/v1/members", member_form("Ana B", "Ana@Example.com")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A member with this email already exists");
}

#[tokio::test]
async fn test_update_and_renew_member() {
    let ctx = TestContext::new().await.unwrap();
    let created = enroll(&ctx, "Ana", "ana@example.com").await;
    let id = created["id"].as_str().unwrap();

    let mut form = member_form("Ana Lima", "ana@example.com");
    form["duration"] = json!("3");
    let (status, updated) = ctx.put(&format!("/v1/members/{}", id), form).await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["name"], "Ana Lima");
    // Active membership extends from its current end: 30 + 90 days
    assert_eq!(updated["days_remaining"], 119);
    assert!(updated["updated_at"].is_string());

    let (status, renewed) = ctx
        .post(&format!("/v1/members/{}/renew", id), json!({ "duration": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renewed["days_remaining"], 149);

    let (status, body) = ctx
        .post(&format!("/v1/members/{}/renew", id), json!({ "duration": 5 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "duration");
}

#[tokio::test]
async fn test_members_are_isolated_between_owners() {
    let ctx = TestContext::new().await.unwrap();
    let created = enroll(&ctx, "Ana", "ana@example.com").await;
    let id = created["id"].as_str().unwrap();

    let stranger = issue_token_pair(Uuid::new_v4(), JWT_SECRET).unwrap().access_token;

    let (status, body) = ctx
        .send_with_token(Some(&stranger), Method::GET, &format!("/v1/members/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Member not found");

    let (status, body) = ctx
        .send_with_token(Some(&stranger), Method::GET, "/v1/members", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = ctx
        .send_with_token(
            Some(&stranger),
            Method::PUT,
            &format!("/v1/members/{}", id),
            Some(member_form("Mallory", "mallory@example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_member_with_trainer() {
    let ctx = TestContext::new().await.unwrap();
    let (status, trainer) = ctx.post("/v1/trainers", trainer_form("Kim", "kim@gym.example")).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut form = member_form("Ana", "ana@example.com");
    form["needs_pt"] = json!(true);
    form["trainer_id"] = trainer["id"].clone();
    form["pt_sessions"] = json!("2");
    let (_, created) = ctx.post("/v1/members", form).await;
    assert_eq!(created["pt_sessions"], 2);

    let (_, view) = ctx.get(&format!("/v1/members/{}", created["id"].as_str().unwrap())).await;
    assert_eq!(view["trainer"]["name"], "Kim");
}

#[tokio::test]
async fn test_trainer_crud() {
    let ctx = TestContext::new().await.unwrap();
    let (_, kim) = ctx.post("/v1/trainers", trainer_form("Kim", "kim@gym.example")).await;
    ctx.post("/v1/trainers", trainer_form("Alex", "alex@gym.example")).await;

    let (status, list) = ctx.get("/v1/trainers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["name"], "Alex");
    assert_eq!(list[1]["name"], "Kim");

    let id = kim["id"].as_str().unwrap();
    let (status, updated) = ctx
        .put(&format!("/v1/trainers/{}", id), trainer_form("Kim Park", "kim@gym.example"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Kim Park");

    let (status, body) = ctx
        .put(&format!("/v1/trainers/{}", id), trainer_form("Kim", "alex@gym.example"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A trainer with this email already exists");

    let (status, _) = ctx.get(&format!("/v1/trainers/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.post("/v1/trainers", json!({ "name": "No Email" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Please fill in all required fields");
}

#[tokio::test]
async fn test_mark_notification_read() {
    let ctx = TestContext::new().await.unwrap();
    enroll(&ctx, "Ana", "ana@example.com").await;

    let (_, notifications) = ctx.get("/v1/notifications").await;
    let id = notifications[0]["id"].as_str().unwrap();

    let (status, body) = ctx
        .send(Method::POST, &format!("/v1/notifications/{}/read", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, count) = ctx.get("/v1/notifications/unread/count").await;
    assert_eq!(count["count"], 0);

    let (_, body) = ctx
        .send(Method::POST, &format!("/v1/notifications/{}/read", Uuid::new_v4()), None)
        .await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_search() {
    let ctx = TestContext::new().await.unwrap();
    enroll(&ctx, "Sam Ortiz", "sam@example.com").await;
    ctx.post("/v1/trainers", trainer_form("Samira", "samira@gym.example")).await;

    let (status, hits) = ctx.get("/v1/search?query=SAM").await;
    assert_eq!(status, StatusCode::OK);
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["name"], "Sam Ortiz");
    assert_eq!(hits[0]["type"], "Member");
    assert_eq!(hits[0]["status"], "Active");
    assert_eq!(hits[1]["type"], "Trainer");
    assert_eq!(hits[1]["specialization"], "Strength");

    let (_, hits) = ctx.get("/v1/search?query=").await;
    assert_eq!(hits, json!([]));
    let (_, hits) = ctx.get("/v1/search").await;
    assert_eq!(hits, json!([]));
}

#[tokio::test]
async fn test_dashboard() {
    let ctx = TestContext::new().await.unwrap();
    enroll(&ctx, "Ana", "ana@example.com").await;
    enroll(&ctx, "Bo", "bo@example.com").await;

    let (status, body) = ctx.get("/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["active"], 2);
    assert_eq!(body["counts"]["expired"], 0);
    assert_eq!(body["counts"]["expiring_soon"], 0);
    assert_eq!(body["recent_members"].as_array().unwrap().len(), 2);
    assert_eq!(body["notifications"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_settings_and_profile() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .put(
            "/v1/settings",
            json!({ "current_password": "not-it", "new_password": "new-front-desk" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Current password is incorrect");

    // Gym name alone is ignored without an email
    let (status, body) = ctx.put("/v1/settings", json!({ "gym_name": "Forge" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gym_name"], "Iron Works");

    let (status, body) = ctx
        .put(
            "/v1/settings",
            json!({ "gym_name": "Forge", "email": "dana@forge.example" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gym_name"], "Forge");
    assert_eq!(body["email"], "dana@forge.example");

    let (status, body) = ctx
        .put("/v1/profile", json!({ "name": "Dana R.", "photo_url": "/photos/dana.jpg" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dana R.");
    assert_eq!(body["photo_url"], "/photos/dana.jpg");
}

#[tokio::test]
async fn test_lifecycle_previews() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .post("/v1/lifecycle/status", json!({ "membership_end": "2001-01-01" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Expired");
    assert_eq!(body["days_left"], 0);
    assert_eq!(body["fell_back"], false);

    let (_, body) = ctx
        .post("/v1/lifecycle/status", json!({ "membership_end": "next tuesday" }))
        .await;
    assert_eq!(body["status"], "Expired");
    assert_eq!(body["fell_back"], true);

    let (status, body) = ctx
        .post(
            "/v1/lifecycle/renewal",
            json!({ "membership_end": "2001-01-01", "duration": 12 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fell_back"], false);
    assert!(body["membership_end"].is_string());

    let (status, _) = ctx
        .post(
            "/v1/lifecycle/renewal",
            json!({ "membership_end": "2001-01-01", "duration": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
