//! JulesClient - typed resource client over [`JulesHttpClient`].

use async_trait::async_trait;
use jules_core::session::{
    Activity, CreateSessionRequest, ListActivitiesResponse, ListSessionsResponse,
    MessageResponse, SendMessageRequest, Session, session_path,
};
use jules_core::source::{ListSourcesResponse, Source};
use jules_core::{ClientConfig, JulesApi, SdkResult};
use serde::de::IgnoredAny;
use serde_json::json;

use crate::http_client::{JulesHttpClient, page_query};

/// One method per remote operation; see [`JulesApi`].
#[derive(Clone)]
pub struct JulesClient {
    http: JulesHttpClient,
}

impl JulesClient {
    /// Creates a client against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_http(JulesHttpClient::new(api_key))
    }

    /// Creates a client from the client configuration.
    pub fn from_config(api_key: impl Into<String>, config: &ClientConfig) -> SdkResult<Self> {
        Ok(Self::with_http(JulesHttpClient::from_config(api_key, config)?))
    }

    /// Wraps an existing transport.
    pub fn with_http(http: JulesHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl JulesApi for JulesClient {
    async fn list_sources(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
        filter: Option<&str>,
    ) -> SdkResult<ListSourcesResponse> {
        let mut query = page_query(page_size, page_token);
        if let Some(filter) = filter.filter(|filter| !filter.is_empty()) {
            query.push(("filter", filter.to_string()));
        }
        self.http.get("sources", &query).await
    }

    async fn get_source(&self, source_id: &str) -> SdkResult<Source> {
        let path = if source_id.starts_with("sources/") {
            source_id.to_string()
        } else {
            format!("sources/{source_id}")
        };
        self.http.get(&path, &[]).await
    }

    async fn create_session(&self, request: &CreateSessionRequest) -> SdkResult<Session> {
        self.http.post("sessions", request).await
    }

    async fn list_sessions(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> SdkResult<ListSessionsResponse> {
        self.http
            .get("sessions", &page_query(page_size, page_token))
            .await
    }

    async fn get_session(&self, session: &str) -> SdkResult<Session> {
        self.http.get(&session_path(session), &[]).await
    }

    async fn send_message(&self, session: &str, prompt: &str) -> SdkResult<MessageResponse> {
        let body = SendMessageRequest {
            prompt: prompt.to_string(),
        };
        let path = format!("{}:sendMessage", session_path(session));
        self.http.post(&path, &body).await
    }

    async fn approve_plan(&self, session: &str) -> SdkResult<()> {
        let path = format!("{}:approvePlan", session_path(session));
        let _: IgnoredAny = self.http.post(&path, &json!({})).await?;
        Ok(())
    }

    async fn list_activities(
        &self,
        session: &str,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> SdkResult<ListActivitiesResponse> {
        let path = format!("{}/activities", session_path(session));
        self.http
            .get(&path, &page_query(page_size, page_token))
            .await
    }

    async fn get_activity(&self, session: &str, activity_id: &str) -> SdkResult<Activity> {
        let path = format!("{}/activities/{activity_id}", session_path(session));
        self.http.get(&path, &[]).await
    }
}
