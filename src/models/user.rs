use serde::{Deserialize, Serialize};

/// User profile as returned by the API (never carries a password).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// Login payload. The API takes the password under its Portuguese name.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_serialize_password_as_senha() {
        let credentials = Credentials {
            email: "ana@example.com".to_string(),
            password: "segredo".to_string(),
        };
        let json = serde_json::to_value(&credentials).unwrap();
        assert_eq!(json["email"], "ana@example.com");
        assert_eq!(json["senha"], "segredo");
        assert!(json.get("password").is_none());
    }
}
