use serde::{Serialize, Deserialize};

use crate::users::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Login {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub jwt: String,
    pub user: User,
}
