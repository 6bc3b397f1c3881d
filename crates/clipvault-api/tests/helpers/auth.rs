use axum_test::TestServer;
use serde_json::json;

/// Test user data
pub struct TestUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Register a new test user via the API and return their credentials and token
pub async fn register_test_user(
    client: &TestServer,
    username: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> TestUser {
    let username = username.unwrap_or("testuser").to_string();
    let email = email.unwrap_or("test@example.com").to_string();
    let password = password.unwrap_or("TestPassword123!").to_string();

    let response = client
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": password,
        }))
        .await;

    assert_eq!(
        response.status_code(),
        200,
        "registration failed: {}",
        response.text()
    );

    let body: serde_json::Value = response.json();
    let token = body["token"]
        .as_str()
        .expect("registration response missing token")
        .to_string();

    TestUser {
        username,
        email,
        password,
        token,
    }
}

/// Login and return a fresh token
pub async fn login_user(client: &TestServer, email: &str, password: &str) -> String {
    let response = client
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;

    assert_eq!(response.status_code(), 200, "login failed: {}", response.text());

    let body: serde_json::Value = response.json();
    body["token"]
        .as_str()
        .expect("login response missing token")
        .to_string()
}
