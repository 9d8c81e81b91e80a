use serde::{Deserialize, Serialize};

/// A synthetic user-like record created by the population job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autobot {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
}

/// A content record owned by one autobot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub autobot_id: i64,
}

/// A content record attached to one post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
