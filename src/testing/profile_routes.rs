use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::json;
use uuid::Uuid;

use super::TestContext;

fn experience_body(title: &str) -> serde_json::Value {
    json!({ "title": title, "company": "Acme", "from": "2020-01-01", "current": true })
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/api/profile/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token, authorization denied");

    let (status, body) = ctx.get("/api/profile/me", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is not valid");
}

#[tokio::test]
async fn legacy_token_header_is_accepted() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/profile/me")
        .header("x-auth-token", token)
        .body(Body::empty())
        .unwrap();
    let (status, body) = ctx.dispatch(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Developer");
}

#[tokio::test]
async fn me_without_profile_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.register("Ada", "ada@example.com").await;

    let (status, body) = ctx.get("/api/profile/me", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "There is no profile for this user");
}

#[tokio::test]
async fn upsert_reports_missing_fields() {
    let ctx = TestContext::new();
    let token = ctx.register("Ada", "ada@example.com").await;

    let (status, body) = ctx
        .send(Method::POST, "/api/profile", Some(&token), Some(json!({ "company": "Acme" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["status"], "Status is required");
    assert_eq!(body["field_errors"]["skills"], "Skills is required");

    // Nothing was created
    let (status, _) = ctx.get("/api/profile/me", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upsert_merges_into_existing_profile() {
    let ctx = TestContext::new();
    let token = ctx.register("Ada", "ada@example.com").await;

    let first = json!({
        "status": "Developer",
        "skills": "rust,  sql ,",
        "company": "Acme",
        "twitter": "https://twitter.com/ada"
    });
    let (status, body) = ctx.send(Method::POST, "/api/profile", Some(&token), Some(first)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["skills"], json!(["rust", "sql"]));
    let profile_id = body["data"]["id"].clone();

    let second = json!({
        "status": "Senior Developer",
        "skills": ["rust", "go"],
        "bio": "Builds things",
        "youtube": "https://youtube.com/ada"
    });
    let (status, body) = ctx.send(Method::POST, "/api/profile", Some(&token), Some(second)).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["id"], profile_id);
    assert_eq!(data["status"], "Senior Developer");
    assert_eq!(data["skills"], json!(["rust", "go"]));
    assert_eq!(data["company"], "Acme");
    assert_eq!(data["bio"], "Builds things");
    assert_eq!(data["social"]["twitter"], "https://twitter.com/ada");
    assert_eq!(data["social"]["youtube"], "https://youtube.com/ada");
}

#[tokio::test]
async fn public_reads_join_owner_details() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;
    ctx.register_with_profile("Grace", "grace@example.com").await;

    let (status, body) = ctx.get("/api/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    let profiles = body["data"].as_array().unwrap();
    assert_eq!(profiles.len(), 2);
    for profile in profiles {
        assert!(profile["user"]["name"].is_string());
        assert!(profile["user"].get("password").is_none());
        assert!(profile["user"].get("email").is_none());
    }

    let (_, me) = ctx.get("/api/auth", Some(&token)).await;
    let user_id = me["data"]["id"].as_str().unwrap();

    let (status, body) = ctx.get(&format!("/api/profile/user/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Ada");
    assert!(body["data"]["user"]["avatar"].as_str().unwrap().contains("gravatar.com"));
}

#[tokio::test]
async fn profile_by_user_rejects_bad_ids() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/api/profile/user/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_IDENTIFIER");

    let (status, body) = ctx.get(&format!("/api/profile/user/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "Profile not found");
}

#[tokio::test]
async fn experience_requires_a_profile() {
    let ctx = TestContext::new();
    let token = ctx.register("Ada", "ada@example.com").await;

    let (status, body) = ctx
        .send(Method::PUT, "/api/profile/experience", Some(&token), Some(experience_body("Engineer")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn experience_validation_runs_before_lookup() {
    let ctx = TestContext::new();
    let token = ctx.register("Ada", "ada@example.com").await;

    let (status, body) = ctx
        .send(Method::PUT, "/api/profile/experience", Some(&token), Some(json!({ "company": "Acme" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["title"].is_string());
    assert!(body["field_errors"]["from"].is_string());
}

#[tokio::test]
async fn experience_is_prepended_and_removable() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;

    ctx.send(Method::PUT, "/api/profile/experience", Some(&token), Some(experience_body("Junior")))
        .await;
    let (status, body) = ctx
        .send(Method::PUT, "/api/profile/experience", Some(&token), Some(experience_body("Senior")))
        .await;
    assert_eq!(status, StatusCode::OK);

    let experiences = body["data"]["experiences"].as_array().unwrap().clone();
    assert_eq!(experiences.len(), 2);
    assert_eq!(experiences[0]["title"], "Senior");
    assert_eq!(experiences[1]["title"], "Junior");

    let junior_id = experiences[1]["id"].as_str().unwrap();
    let (status, body) = ctx
        .send(Method::DELETE, &format!("/api/profile/experience/{}", junior_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let remaining = body["data"]["experiences"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["title"], "Senior");
}

#[tokio::test]
async fn removing_unknown_experience_leaves_list_alone() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;

    ctx.send(Method::PUT, "/api/profile/experience", Some(&token), Some(experience_body("Engineer")))
        .await;

    let (status, body) = ctx
        .send(Method::DELETE, &format!("/api/profile/experience/{}", Uuid::new_v4()), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Experience not found");

    let (status, body) = ctx
        .send(Method::DELETE, "/api/profile/experience/garbage", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_IDENTIFIER");

    let (_, body) = ctx.get("/api/profile/me", Some(&token)).await;
    let experiences = body["data"]["experiences"].as_array().unwrap();
    assert_eq!(experiences.len(), 1);
    assert_eq!(experiences[0]["title"], "Engineer");
}

#[tokio::test]
async fn education_is_prepended_and_removable() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;

    let entry = json!({
        "school": "MIT",
        "degree": "BSc",
        "fieldofstudy": "Computer Science",
        "from": "2012-09-01",
        "to": "2016-06-01"
    });
    let (status, body) = ctx
        .send(Method::PUT, "/api/profile/education", Some(&token), Some(entry))
        .await;
    assert_eq!(status, StatusCode::OK);
    let education = body["data"]["education"].as_array().unwrap();
    assert_eq!(education.len(), 1);
    assert_eq!(education[0]["school"], "MIT");
    assert_eq!(education[0]["to"], "2016-06-01");
    let edu_id = education[0]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(Method::DELETE, &format!("/api/profile/education/{}", Uuid::new_v4()), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Education not found");

    let (status, body) = ctx
        .send(Method::DELETE, &format!("/api/profile/education/{}", edu_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["education"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn education_requires_all_fields() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;

    let (status, body) = ctx
        .send(Method::PUT, "/api/profile/education", Some(&token), Some(json!({ "school": "MIT" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["degree", "fieldofstudy", "from"] {
        assert!(body["field_errors"][field].is_string(), "missing error for {}", field);
    }
}

#[tokio::test]
async fn concurrent_experience_adds_both_succeed() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;

    let (a, b) = tokio::join!(
        ctx.send(Method::PUT, "/api/profile/experience", Some(&token), Some(experience_body("A"))),
        ctx.send(Method::PUT, "/api/profile/experience", Some(&token), Some(experience_body("B"))),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);

    // Last write wins, so one of the two entries may be lost
    let (_, body) = ctx.get("/api/profile/me", Some(&token)).await;
    let count = body["data"]["experiences"].as_array().unwrap().len();
    assert!((1..=2).contains(&count));
}

#[tokio::test]
async fn deleting_account_removes_everything() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;
    ctx.send(Method::POST, "/api/post", Some(&token), Some(json!({ "text": "hello" })))
        .await;

    let (status, body) = ctx.send(Method::DELETE, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["msg"], "User deleted");

    let (status, body) = ctx.get("/api/profile/me", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = ctx.get("/api/auth", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = ctx.get("/api/profile", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // Still a valid token, so a repeat delete succeeds
    let (status, _) = ctx.send(Method::DELETE, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleted_account_cannot_recreate_a_profile() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;

    let (status, _) = ctx.send(Method::DELETE, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/profile",
            Some(&token),
            Some(json!({ "status": "Ghost", "skills": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "User not found");

    let (_, body) = ctx.get("/api/profile", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = ctx
        .send(Method::POST, "/api/post", Some(&token), Some(json!({ "text": "still here?" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mistyped_bodies_use_the_error_envelope() {
    let ctx = TestContext::new();
    let token = ctx.register_with_profile("Ada", "ada@example.com").await;

    let (status, body) = ctx
        .send(Method::POST, "/api/profile", Some(&token), Some(json!({ "status": 5, "skills": "rust" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_JSON");

    let mut entry = experience_body("Engineer");
    entry["current"] = json!("on");
    let (status, body) = ctx
        .send(Method::PUT, "/api/profile/experience", Some(&token), Some(entry))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, body) = ctx
        .send(Method::PUT, "/api/profile/education", Some(&token), Some(json!({ "school": ["MIT"] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    // The stored profile is untouched
    let (_, body) = ctx.get("/api/profile/me", Some(&token)).await;
    assert_eq!(body["data"]["status"], "Developer");
    assert!(body["data"]["experiences"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_uses_the_error_envelope() {
    let ctx = TestContext::new();
    let token = ctx.register("Ada", "ada@example.com").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/profile")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from("{\"status\": "))
        .unwrap();
    let (status, body) = ctx.dispatch(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_JSON");
    assert!(body["error"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .body(Body::from("name=Ada"))
        .unwrap();
    let (status, body) = ctx.dispatch(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}
