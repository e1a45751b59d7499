/**
 * Authentication Handler Types
 *
 * Request and response bodies shared by the signup, login and me handlers.
 */

use serde::{Deserialize, Serialize};

use crate::shared::messaging::AccountResponse;

/// Sign up request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SignupRequest {
    /// 3-30 chars, starts with a letter, letters/digits/underscore
    pub username: String,
    pub email: String,
    /// At least 8 characters; hashed before storage
    pub password: String,
}

/// Login request
///
/// `identifier` is a username or an email address. `username` and `email`
/// are accepted as field names too.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
}

/// Auth response
///
/// Returned by signup and login. The token is valid until the session
/// expires or the user logs out.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountResponse,
}
