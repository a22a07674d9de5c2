use serde::{Deserialize, Serialize};

// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
    pub username: Option<String>,
}

impl LoginResponse {
    pub fn success(token: String, username: String) -> Self {
        Self {
            success: true,
            token: Some(token),
            message: Some("Login successful".to_string()),
            username: Some(username),
        }
    }
}

// Response de check-auth
#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}
