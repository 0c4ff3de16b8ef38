use crate::errors::ApiError;
use crate::models::{
    HabitId, HabitLogRequest, HabitLogResponse, HabitNameRequest, MutationResponse, PageContext,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// The habit backend as seen by the dashboard.
#[async_trait]
pub trait HabitApi: Send + Sync {
    async fn load_page(&self) -> Result<PageContext, ApiError>;

    async fn save_log(&self, request: &HabitLogRequest) -> Result<HabitLogResponse, ApiError>;

    async fn create_habit(&self, name: &str) -> Result<MutationResponse, ApiError>;

    async fn update_habit(&self, id: HabitId, name: &str) -> Result<MutationResponse, ApiError>;

    async fn delete_habit(&self, id: HabitId) -> Result<MutationResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpHabitApi {
    client: Client,
    base_url: String,
}

impl HttpHabitApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl HabitApi for HttpHabitApi {
    async fn load_page(&self) -> Result<PageContext, ApiError> {
        let response = self.client.get(self.url("/api/dashboard")).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Rejected(Some(format!(
                "dashboard returned {}",
                response.status()
            ))));
        }
        let page: PageContext = response.json().await?;
        page.validate()?;
        Ok(page)
    }

    async fn save_log(&self, request: &HabitLogRequest) -> Result<HabitLogResponse, ApiError> {
        debug!(habit_id = request.habit_id, day = request.day, status = request.status, "saving habit log");
        let response = self
            .client
            .post(self.url("/api/habit-log"))
            .json(request)
            .send()
            .await?;
        let body: HabitLogResponse = read_body(response).await?;
        if body.success {
            Ok(body)
        } else {
            Err(ApiError::Rejected(None))
        }
    }

    async fn create_habit(&self, name: &str) -> Result<MutationResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/api/habit"))
            .json(&HabitNameRequest { name: name.to_string() })
            .send()
            .await?;
        mutation(response).await
    }

    async fn update_habit(&self, id: HabitId, name: &str) -> Result<MutationResponse, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/api/habit/{id}")))
            .json(&HabitNameRequest { name: name.to_string() })
            .send()
            .await?;
        mutation(response).await
    }

    async fn delete_habit(&self, id: HabitId) -> Result<MutationResponse, ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/habit/{id}")))
            .send()
            .await?;
        mutation(response).await
    }
}

/// Decode a JSON body, treating a non-2xx status as a rejection carrying
/// whatever `error` message the backend sent.
async fn read_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<MutationResponse>(&bytes)
            .ok()
            .and_then(|body| body.error);
        return Err(ApiError::Rejected(message));
    }
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Transport(err.to_string()))
}

async fn mutation(response: Response) -> Result<MutationResponse, ApiError> {
    let body: MutationResponse = read_body(response).await?;
    if body.success {
        Ok(body)
    } else {
        Err(ApiError::Rejected(body.error))
    }
}
