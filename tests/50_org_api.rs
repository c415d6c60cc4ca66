mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_rejects_short_password() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/org/create", server.base_url))
        .json(&json!({
            "organization_name": "TechCorp",
            "email": "admin@techcorp.com",
            "password": "short"
        }))
        .send()
        .await?;

    // Validation runs before any store access, so this is deterministic
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"].get("password").is_some(), "body: {}", body);
    Ok(())
}

#[tokio::test]
async fn create_rejects_bad_email_and_name() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/org/create", server.base_url))
        .json(&json!({
            "organization_name": "ab",
            "email": "admin@techcorp.com",
            "password": "secret1"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/org/create", server.base_url))
        .json(&json!({
            "organization_name": "TechCorp",
            "email": "not-an-email",
            "password": "secret1"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn create_without_body_is_client_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/org/create", server.base_url))
        .send()
        .await?;
    assert!(
        res.status().is_client_error(),
        "expected client error, got {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn get_requires_organization_name_param() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/org/get", server.base_url))
        .send()
        .await?;
    assert!(
        res.status().is_client_error(),
        "expected client error, got {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn get_unknown_organization_is_not_ok() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/org/get?organization_name=no-such-org-integration",
            server.base_url
        ))
        .send()
        .await?;

    // 404 with a reachable store, 500 without one
    assert!(
        res.status() == StatusCode::NOT_FOUND
            || res.status() == StatusCode::INTERNAL_SERVER_ERROR,
        "unexpected status: {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn update_requires_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .put(format!(
            "{}/org/update?old_organization_name=TechCorp",
            server.base_url
        ))
        .json(&json!({
            "organization_name": "TechCorp2",
            "email": "admin@techcorp.com",
            "password": "secret1"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn delete_rejects_invalid_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No token at all
    let res = client
        .delete(format!(
            "{}/org/delete?organization_name=TechCorp",
            server.base_url
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let res = client
        .delete(format!(
            "{}/org/delete?organization_name=TechCorp",
            server.base_url
        ))
        .header("Authorization", "Bearer not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Wrong scheme
    let res = client
        .delete(format!(
            "{}/org/delete?organization_name=TechCorp",
            server.base_url
        ))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
