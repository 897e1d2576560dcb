///! Authenticated API client for the monitoring platform

use scanalert_common::ApiError;
use serde::de::DeserializeOwned;

pub struct ApiClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build request with authentication header
    fn build_request(&self, method: reqwest::Method, path: &str) -> (String, reqwest::RequestBuilder) {
        let url = format!("{}{}", self.base_url, path);
        let request = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.token));
        (url, request)
    }

    /// Send a request and map non-success statuses to a typed error
    async fn execute(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|err| ApiError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status,
                url: url.to_string(),
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        response.json().await.map_err(|err| ApiError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let (url, request) = self.build_request(reqwest::Method::GET, path);
        let response = self.execute(&url, request).await?;
        Self::decode(&url, response).await
    }

    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let (url, request) = self.build_request(reqwest::Method::POST, path);
        let response = self.execute(&url, request.json(body)).await?;
        Self::decode(&url, response).await
    }

    /// POST where the response body is not inspected beyond overall success
    pub async fn post_empty<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let (url, request) = self.build_request(reqwest::Method::POST, path);
        self.execute(&url, request.json(body)).await?;
        Ok(())
    }
}
