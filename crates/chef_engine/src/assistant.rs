use std::time::Duration;

use chef_logging::chef_debug;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ActionPayload, AssistantError, ChatReply, FailureKind, RemoteSessionId};

#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Remote cooking assistant. Any transport works; the engine only sees this.
#[async_trait::async_trait]
pub trait Assistant: Send + Sync {
    async fn create_session(&self, recipe_id: &str) -> Result<RemoteSessionId, AssistantError>;

    async fn delete_session(&self, session_id: &str) -> Result<(), AssistantError>;

    async fn step_actions(
        &self,
        session_id: &str,
        step: usize,
    ) -> Result<Vec<ActionPayload>, AssistantError>;

    async fn send_chat(&self, session_id: &str, message: &str)
        -> Result<ChatReply, AssistantError>;
}

#[derive(Serialize)]
struct CreateSessionBody<'a> {
    recipe_id: &'a str,
    current_step: usize,
}

#[derive(Deserialize)]
struct SessionBody {
    id: RemoteSessionId,
}

#[derive(Serialize)]
struct StepActionsBody {
    step_number: usize,
}

#[derive(Deserialize)]
struct StepActionsResponse {
    actions: Vec<ActionPayload>,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: String,
    #[serde(default)]
    suggested_actions: Option<Vec<ActionPayload>>,
}

/// [`Assistant`] over the backend's `/cooking-sessions` JSON API.
#[derive(Debug, Clone)]
pub struct HttpAssistant {
    base: Url,
    client: reqwest::Client,
}

impl HttpAssistant {
    pub fn new(settings: AssistantSettings) -> Result<Self, AssistantError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| AssistantError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(AssistantError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // Joining relative paths keeps the last segment only with a trailing slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| AssistantError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AssistantError> {
        self.base
            .join(path)
            .map_err(|err| AssistantError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn post_json<B, R>(&self, url: Url, body: &B) -> Result<R, AssistantError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|err| AssistantError::new(FailureKind::Decode, err.to_string()))?;
        chef_debug!("POST {} ({} bytes)", url, payload.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_response(response).await
    }
}

#[async_trait::async_trait]
impl Assistant for HttpAssistant {
    async fn create_session(&self, recipe_id: &str) -> Result<RemoteSessionId, AssistantError> {
        let url = self.endpoint("cooking-sessions/")?;
        let body = CreateSessionBody {
            recipe_id,
            current_step: 0,
        };
        let session: SessionBody = self.post_json(url, &body).await?;
        Ok(session.id)
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), AssistantError> {
        let url = self.endpoint(&format!("cooking-sessions/{session_id}"))?;
        chef_debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)
    }

    async fn step_actions(
        &self,
        session_id: &str,
        step: usize,
    ) -> Result<Vec<ActionPayload>, AssistantError> {
        let url = self.endpoint(&format!("cooking-sessions/{session_id}/step_actions"))?;
        let body = StepActionsBody { step_number: step };
        let response: StepActionsResponse = self.post_json(url, &body).await?;
        Ok(response.actions)
    }

    async fn send_chat(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply, AssistantError> {
        let url = self.endpoint(&format!("cooking-sessions/{session_id}/chat"))?;
        let response: ChatResponse = self.post_json(url, &ChatBody { message }).await?;
        Ok(ChatReply {
            message: response.message,
            suggested_actions: response.suggested_actions.unwrap_or_default(),
        })
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), AssistantError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(AssistantError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

async fn decode_response<R: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<R, AssistantError> {
    check_status(&response)?;
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| AssistantError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> AssistantError {
    if err.is_timeout() {
        return AssistantError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return AssistantError::new(FailureKind::Decode, err.to_string());
    }
    AssistantError::new(FailureKind::Network, err.to_string())
}
