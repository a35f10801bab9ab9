mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/token", server.base_url))
        .form(&[("username", common::ADMIN_USER), ("password", "nope")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/token", server.base_url))
        .form(&[("username", "ghost"), ("password", "whatever")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_sets_hardened_cookie_and_returns_bearer() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/token", server.base_url))
        .form(&[
            ("username", common::ADMIN_USER),
            ("password", common::ADMIN_PASSWORD),
        ])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let set_cookie = res
        .headers()
        .get("set-cookie")
        .expect("login must set a cookie")
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["token_type"], "bearer");
    assert!(body["data"]["access_token"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn profile_requires_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/auth/profile", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn bearer_token_opens_profile() -> Result<()> {
    let server = common::ensure_server().await?;
    let token =
        common::obtain_token(&server.base_url, common::PLAIN_USER, common::PLAIN_PASSWORD).await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/auth/profile", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["username"], common::PLAIN_USER);
    assert_eq!(body["data"]["role"], "user");
    Ok(())
}

#[tokio::test]
async fn cookie_token_opens_profile() -> Result<()> {
    let server = common::ensure_server().await?;
    let token =
        common::obtain_token(&server.base_url, common::PLAIN_USER, common::PLAIN_PASSWORD).await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/auth/profile", server.base_url))
        .header("Cookie", format!("access_token={}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn tampered_token_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;
    let token =
        common::obtain_token(&server.base_url, common::PLAIN_USER, common::PLAIN_PASSWORD).await?;
    let client = reqwest::Client::new();

    let mut tampered = token.clone();
    tampered.pop();
    tampered.push('A');

    let res = client
        .get(format!("{}/auth/profile", server.base_url))
        .bearer_auth(&tampered)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn dashboard_is_admin_only() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Plain user: authenticated but forbidden
    let token =
        common::obtain_token(&server.base_url, common::PLAIN_USER, common::PLAIN_PASSWORD).await?;
    let res = client
        .get(format!("{}/auth/dashboard", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin: welcome
    let token =
        common::obtain_token(&server.base_url, common::ADMIN_USER, common::ADMIN_PASSWORD).await?;
    let res = client
        .get(format!("{}/auth/dashboard", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["user"]["role"], "admin");
    Ok(())
}

#[tokio::test]
async fn unauthenticated_dashboard_is_401_not_403() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/auth/dashboard", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
