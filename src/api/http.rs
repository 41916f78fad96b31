use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use super::{ApiError, ApiResult, User, UserFields, UserId, UsersApi};

/// `UsersApi` over plain HTTP + JSON.
#[derive(Clone, Debug)]
pub struct HttpUsersApi {
    http: Client,
    base_url: String,
}

impl HttpUsersApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{id}`, with the id percent-encoded as one path segment.
    pub fn item_url(&self, id: &UserId) -> ApiResult<Url> {
        let invalid = || ApiError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ApiError::Status {
        status: status.as_u16(),
        body: response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string()),
    })
}

/// Decode a list response. An empty body or `null` is an empty list.
pub fn parse_user_list(body: &str) -> ApiResult<Vec<User>> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let users: Option<Vec<User>> = serde_json::from_str(trimmed)?;
    Ok(users.unwrap_or_default())
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn list_users(&self) -> ApiResult<Vec<User>> {
        tracing::debug!(url = %self.base_url, "GET users");
        let response = self
            .http
            .get(&self.base_url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;
        parse_user_list(&body)
    }

    async fn create_user(&self, fields: &UserFields) -> ApiResult<()> {
        tracing::debug!(url = %self.base_url, "POST user");
        let response = self.http.post(&self.base_url).json(fields).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update_user(&self, id: &UserId, fields: &UserFields) -> ApiResult<()> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "PUT user");
        let response = self.http.put(url).json(fields).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> ApiResult<()> {
        let url = self.item_url(id)?;
        tracing::debug!(%url, "DELETE user");
        let response = self.http.delete(url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
