use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;

use crate::domain::assignee::AssigneeCandidate;
use crate::domain::comment::NewComment;
use crate::domain::ticket::{Ticket, TicketUpdate};
use crate::error::{AppError, AppResult};
use crate::services::{AssigneeDirectoryService, TicketStoreService};

/// REST client for the helpdesk API.
pub struct HelpdeskApi {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HelpdeskApi {
    pub fn new(base_url: &str, token: Option<String>) -> AppResult<Self> {
        // Endpoints are appended as path segments under the base path.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|err| {
            AppError::Configuration(format!("invalid API base URL '{base_url}': {err}"))
        })?;
        Ok(Self {
            http: Client::new(),
            base_url,
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration("API base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send(request: RequestBuilder, what: &str) -> AppResult<Response> {
        request
            .send()
            .await
            .map_err(|err| AppError::ticket_store(format!("failed to {what}: {err}")))
    }

    async fn read_envelope<T: DeserializeOwned>(response: Response, what: &str) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            let message = server_message(&body).unwrap_or(body);
            return Err(match status.as_u16() {
                404 => AppError::NotFound(message),
                400 => AppError::BadRequest(message),
                401 | 403 => AppError::Forbidden(message),
                _ => AppError::TicketStore {
                    status: Some(status),
                    message: format!("{what} failed with {status}: {message}"),
                },
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| AppError::ticket_store(format!("failed to parse {what} response: {err}")))
    }
}

#[async_trait]
impl TicketStoreService for HelpdeskApi {
    async fn fetch_ticket(&self, id: &str) -> AppResult<Ticket> {
        let url = self.endpoint(&["tickets", id])?;
        tracing::debug!(%url, "fetching ticket");
        let response = Self::send(self.authorized(self.http.get(url)), "fetch ticket").await?;
        let payload: TicketEnvelope = Self::read_envelope(response, "ticket").await?;

        match payload {
            TicketEnvelope {
                success: true,
                ticket: Some(ticket),
                ..
            } => Ok(ticket),
            TicketEnvelope { message, .. } => Err(AppError::NotFound(
                message.unwrap_or_else(|| format!("ticket {id} not found")),
            )),
        }
    }

    async fn update_ticket(&self, update: TicketUpdate) -> AppResult<String> {
        let url = self.endpoint(&["tickets", &update.id])?;
        tracing::debug!(%url, "updating ticket");
        let request = self.authorized(self.http.put(url)).json(&update);
        let response = Self::send(request, "update ticket").await?;
        let payload: StatusEnvelope = Self::read_envelope(response, "update").await?;

        if payload.success {
            Ok(payload
                .message
                .unwrap_or_else(|| "Ticket updated".to_string()))
        } else {
            Err(AppError::ticket_store(
                payload
                    .message
                    .unwrap_or_else(|| "server rejected the update".to_string()),
            ))
        }
    }

    async fn create_comment(&self, ticket_id: &str, text: &str) -> AppResult<()> {
        let url = self.endpoint(&["tickets", ticket_id, "comments"])?;
        tracing::debug!(%url, "creating comment");
        let body = NewComment {
            text: text.to_string(),
        };
        let request = self.authorized(self.http.post(url)).json(&body);
        let response = Self::send(request, "create comment").await?;
        let payload: StatusEnvelope = Self::read_envelope(response, "comment").await?;

        if payload.success {
            Ok(())
        } else {
            Err(AppError::ticket_store(
                payload
                    .message
                    .unwrap_or_else(|| "server rejected the comment".to_string()),
            ))
        }
    }
}

#[async_trait]
impl AssigneeDirectoryService for HelpdeskApi {
    async fn list_assignees(&self) -> AppResult<Vec<AssigneeCandidate>> {
        let url = self.endpoint(&["users", "assignees"])?;
        tracing::debug!(%url, "listing assignees");
        let response = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(|err| AppError::AssigneeDirectory(format!("request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::AssigneeDirectory(format!(
                "directory responded with {status}"
            )));
        }
        let payload: AssigneesEnvelope = response.json().await.map_err(|err| {
            AppError::AssigneeDirectory(format!("failed to parse directory response: {err}"))
        })?;

        if !payload.success {
            return Err(AppError::AssigneeDirectory(
                "directory reported failure".to_string(),
            ));
        }
        Ok(payload.into_candidates())
    }
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<StatusEnvelope>(body)
        .ok()
        .and_then(|payload| payload.message)
}

#[derive(Deserialize)]
struct TicketEnvelope {
    #[serde(default)]
    success: bool,
    ticket: Option<Ticket>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

#[derive(Deserialize)]
struct AssigneesEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    assignees: Vec<AssigneeRecord>,
}

impl AssigneesEnvelope {
    fn into_candidates(self) -> Vec<AssigneeCandidate> {
        self.assignees
            .into_iter()
            .map(|record| {
                AssigneeCandidate::from_names(record.id, &record.first_name, &record.last_name)
            })
            .collect()
    }
}

#[derive(Deserialize)]
struct AssigneeRecord {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "firstName", default)]
    first_name: String,
    #[serde(rename = "lastName", default)]
    last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoints_under_base_path() {
        let api = HelpdeskApi::new("http://localhost:3001/api/", None).unwrap();
        assert_eq!(
            api.endpoint(&["tickets", "t-1", "comments"]).unwrap().as_str(),
            "http://localhost:3001/api/tickets/t-1/comments"
        );
        assert_eq!(
            api.endpoint(&["users", "assignees"]).unwrap().as_str(),
            "http://localhost:3001/api/users/assignees"
        );
    }

    #[test]
    fn escapes_ticket_identifier() {
        let api = HelpdeskApi::new("http://localhost:3001", None).unwrap();
        assert_eq!(
            api.endpoint(&["tickets", "a/b"]).unwrap().as_str(),
            "http://localhost:3001/tickets/a%2Fb"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HelpdeskApi::new("not a url", None),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn unsuccessful_ticket_envelope_has_no_ticket() {
        let payload: TicketEnvelope =
            serde_json::from_str(r#"{"success":false,"message":"Ticket not found"}"#).unwrap();
        assert!(!payload.success);
        assert!(payload.ticket.is_none());
        assert_eq!(payload.message.as_deref(), Some("Ticket not found"));
    }

    #[test]
    fn maps_directory_records_to_candidates() {
        let payload: AssigneesEnvelope = serde_json::from_str(
            r#"{"success":true,"assignees":[{"_id":"u-1","firstName":"Ada","lastName":"Lovelace"}]}"#,
        )
        .unwrap();
        assert_eq!(
            payload.into_candidates(),
            vec![AssigneeCandidate::from_names("u-1", "Ada", "Lovelace")]
        );
    }

    #[test]
    fn extracts_server_message_from_error_body() {
        assert_eq!(
            server_message(r#"{"success":false,"message":"Invalid id"}"#).as_deref(),
            Some("Invalid id")
        );
        assert_eq!(server_message("<html>"), None);
    }
}
