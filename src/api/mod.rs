mod lookup;

pub use lookup::{AddressInfo, CompanyInfo, LookupClient};

use std::time::Duration;

use anyhow::Result;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Client, ClientPage, Credentials, LoginResponse, NewUser, User};

/// Errors surfaced to the screens. Everything is scoped to the triggering
/// action; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Sessão expirada ou credenciais inválidas")]
    Unauthorized,
    #[error("Registro não encontrado")]
    NotFound,
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("{0}")]
    Invalid(String),
    #[error("Falha de rede: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Decode a non-2xx response into an ApiError. The API reports failures
/// as a JSON body with an `error` message.
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        _ => {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("Requisição falhou com status {}", status.as_u16()),
            };
            ApiError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

/// HTTP client for the Agenda Digital REST API. One request per call,
/// bearer-token authenticated once a session is active.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    #[tracing::instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/users/login", self.base_url);
        let response = self.client.post(&url).json(credentials).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self, new_user))]
    pub async fn register(&self, new_user: &NewUser) -> Result<User, ApiError> {
        let url = format!("{}/users", self.base_url);
        let response = self.client.post(&url).json(new_user).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch one page of clients. `query` is the server-side search term.
    #[tracing::instrument(skip(self))]
    pub async fn list_clients(
        &self,
        page: u32,
        per_page: u32,
        query: Option<&str>,
    ) -> Result<ClientPage, ApiError> {
        let url = format!("{}/clients", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .query(&[("page", page), ("per_page", per_page)]);
        if let Some(q) = query {
            if !q.trim().is_empty() {
                request = request.query(&[("q", q.trim())]);
            }
        }
        let response = self.auth(request).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_client(&self, id: i32) -> Result<Client, ApiError> {
        let url = format!("{}/clients/{}", self.base_url, id);
        let response = self.auth(self.client.get(&url)).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self, client))]
    pub async fn create_client(&self, client: &Client) -> Result<Client, ApiError> {
        let url = format!("{}/clients", self.base_url);
        let response = self.auth(self.client.post(&url).json(client)).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self, client))]
    pub async fn update_client(&self, client: &Client) -> Result<Client, ApiError> {
        let url = format!("{}/clients/{}", self.base_url, client.id);
        let response = self.auth(self.client.put(&url).json(client)).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_client(&self, id: i32) -> Result<(), ApiError> {
        let url = format!("{}/clients/{}", self.base_url, id);
        let response = self.auth(self.client.delete(&url)).send().await?;
        check(response).await?;
        Ok(())
    }
}
