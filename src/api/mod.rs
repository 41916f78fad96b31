//! REST client types for the `/usuarios` resource.
//!
//! Defines the wire model (`User`, `UserFields`), the `UsersApi` seam used by
//! the console, and the error type every request collapses into.
//!
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub use http::HttpUsersApi;

/// Server-assigned identifier. Opaque to the client: rendered and echoed back, never built.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for UserId {
    fn from(n: i64) -> Self {
        UserId::Number(n)
    }
}

/// A user as returned by `GET /usuarios`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(
        rename = "nombreCompleto",
        alias = "fullName",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(rename = "telefono", alias = "phone", default)]
    pub phone: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl User {
    /// Avatar glyph: first character of the name, uppercased. `None` for an empty name.
    pub fn avatar(&self) -> Option<String> {
        self.full_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
    }

    /// Phone as typed, or a dash when missing or empty.
    pub fn phone_display(&self) -> &str {
        match self.phone.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "-",
        }
    }

    /// Current values of the three editable fields.
    pub fn fields(&self) -> UserFields {
        UserFields {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone().unwrap_or_default(),
        }
    }
}

/// The three editable fields; body of `POST` and `PUT` requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    #[serde(rename = "nombreCompleto")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
}

impl UserFields {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Presence check only; no format validation.
    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|f| !self.get(*f).is_empty())
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FullName => &mut self.full_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
        }
    }
}

/// Selector for one of the three text fields, in form order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    Email,
    Phone,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::FullName, Field::Email, Field::Phone];

    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full name",
            Field::Email => "Email",
            Field::Phone => "Phone number",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Field::FullName => Field::Email,
            Field::Email => Field::Phone,
            Field::Phone => Field::FullName,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Field::FullName => Field::Phone,
            Field::Email => Field::FullName,
            Field::Phone => Field::Email,
        }
    }
}

/// Any failure talking to the users service. Callers treat all variants alike;
/// the split only feeds the log line.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid users endpoint: {0}")]
    InvalidUrl(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// CRUD operations on the users resource.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn list_users(&self) -> ApiResult<Vec<User>>;

    async fn create_user(&self, fields: &UserFields) -> ApiResult<()>;

    /// Full-field overwrite of an existing user.
    async fn update_user(&self, id: &UserId, fields: &UserFields) -> ApiResult<()>;

    async fn delete_user(&self, id: &UserId) -> ApiResult<()>;
}
