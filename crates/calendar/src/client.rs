//! REST client for the external calendar service (Google Calendar v3 API
//! shape): free/busy queries and event creation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use portfolio_core::errors::{AssistantError, AssistantResult};
use portfolio_core::models::meeting::BusyInterval;

use crate::auth::CredentialProvider;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// The calendar-service boundary consumed by the oracle and scheduler.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Free/busy query: busy intervals overlapping `[start, end)` on the
    /// given calendar.
    async fn free_busy(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AssistantResult<Vec<BusyInterval>>;

    /// Create an event, sending invitations to all attendees. Returns the
    /// opaque external event identifier.
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventRequest,
    ) -> AssistantResult<String>;
}

// Wire types for event creation.

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub attendees: Vec<EventAttendee>,
    pub reminders: EventReminders,
    pub conference_data: ConferenceData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventAttendee {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    pub create_request: ConferenceCreateRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceCreateRequest {
    pub request_id: String,
    pub conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    pub kind: String,
}

// Wire types for responses.

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<BusyInterval>,
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
}

/// Google Calendar REST client. Credentials are supplied per call by the
/// injected provider.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        timeout: std::time::Duration,
    ) -> AssistantResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Transient(e.to_string()))?;

        Ok(Self {
            http,
            credentials,
            base_url: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Point at a different API base (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn bearer(&self) -> AssistantResult<String> {
        let credential = self.credentials.get_valid_credential().await?;
        Ok(format!("Bearer {}", credential.access_token))
    }

    /// Map an API response to the error taxonomy and deserialize on success.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AssistantResult<T> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AssistantError::External(eyre::eyre!("JSON parse error: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(AssistantError::Authorization(format!("{status}: {body}"))),
            408 | 429 => Err(AssistantError::Transient(format!("{status}: {body}"))),
            s if s >= 500 => Err(AssistantError::Transient(format!("{status}: {body}"))),
            _ => Err(AssistantError::External(eyre::eyre!(
                "calendar API returned {status}: {body}"
            ))),
        }
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    #[instrument(skip(self), level = "debug")]
    async fn free_busy(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AssistantResult<Vec<BusyInterval>> {
        let url = format!("{}/freeBusy", self.base_url);
        let body = serde_json::json!({
            "timeMin": start.to_rfc3339(),
            "timeMax": end.to_rfc3339(),
            "items": [{ "id": calendar_id }],
        });

        debug!("Querying free/busy for {calendar_id}");

        let response = self
            .http
            .post(&url)
            .header("Authorization", self.bearer().await?)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Transient(format!("free/busy request: {e}")))?;

        let parsed: FreeBusyResponse = self.handle_response(response).await?;
        let calendar = parsed.calendars.into_iter().find(|(id, _)| id == calendar_id);

        match calendar {
            Some((_, entry)) => Ok(entry.busy),
            None => Err(AssistantError::External(eyre::eyre!(
                "free/busy response missing calendar {calendar_id}"
            ))),
        }
    }

    #[instrument(skip(self, event), level = "debug")]
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventRequest,
    ) -> AssistantResult<String> {
        let url = format!(
            "{}/calendars/{}/events?conferenceDataVersion=1&sendUpdates=all",
            self.base_url,
            urlencoding::encode(calendar_id),
        );

        let response = self
            .http
            .post(&url)
            .header("Authorization", self.bearer().await?)
            .json(event)
            .send()
            .await
            .map_err(|e| AssistantError::Transient(format!("event insert request: {e}")))?;

        let inserted: InsertedEvent = self.handle_response(response).await?;
        Ok(inserted.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> GoogleCalendarClient {
        let provider = Arc::new(StaticTokenProvider::new("test_token"));
        GoogleCalendarClient::new(provider, std::time::Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_free_busy_returns_busy_intervals() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .and(header("Authorization", "Bearer test_token"))
            .and(body_partial_json(serde_json::json!({
                "items": [{ "id": "primary" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "calendars": {
                    "primary": {
                        "busy": [
                            { "start": "2024-01-02T14:00:00Z", "end": "2024-01-02T14:30:00Z" }
                        ]
                    }
                }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let start = "2024-01-02T14:00:00Z".parse().unwrap();
        let end = "2024-01-02T14:30:00Z".parse().unwrap();

        let busy = client.free_busy("primary", start, end).await.unwrap();
        assert_eq!(busy.len(), 1);
        assert_eq!(busy[0].start, start);
    }

    #[tokio::test]
    async fn test_free_busy_empty_means_free() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "calendars": { "primary": { "busy": [] } }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let start = "2024-01-02T09:30:00Z".parse().unwrap();
        let end = "2024-01-02T10:00:00Z".parse().unwrap();

        let busy = client.free_busy("primary", start, end).await.unwrap();
        assert!(busy.is_empty());
    }

    #[tokio::test]
    async fn test_insert_event_returns_external_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(query_param("conferenceDataVersion", "1"))
            .and(query_param("sendUpdates", "all"))
            .and(body_partial_json(serde_json::json!({
                "summary": "Meeting with Alice",
                "attendees": [{ "email": "a@x.com" }]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "evt_abc123" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let event = EventRequest {
            summary: "Meeting with Alice".to_string(),
            description: "intro call".to_string(),
            start: EventDateTime {
                date_time: "2024-01-02T09:30:00-05:00".to_string(),
                time_zone: "America/New_York".to_string(),
            },
            end: EventDateTime {
                date_time: "2024-01-02T10:00:00-05:00".to_string(),
                time_zone: "America/New_York".to_string(),
            },
            attendees: vec![EventAttendee {
                email: "a@x.com".to_string(),
            }],
            reminders: EventReminders {
                use_default: false,
                overrides: vec![
                    ReminderOverride {
                        method: "email".to_string(),
                        minutes: 24 * 60,
                    },
                    ReminderOverride {
                        method: "popup".to_string(),
                        minutes: 30,
                    },
                ],
            },
            conference_data: ConferenceData {
                create_request: ConferenceCreateRequest {
                    request_id: "meeting-test".to_string(),
                    conference_solution_key: ConferenceSolutionKey {
                        kind: "hangoutsMeet".to_string(),
                    },
                },
            },
        };

        let id = client.insert_event("primary", &event).await.unwrap();
        assert_eq!(id, "evt_abc123");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authorization_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let start = "2024-01-02T09:30:00Z".parse().unwrap();
        let end = "2024-01-02T10:00:00Z".parse().unwrap();

        let err = client.free_busy("primary", start, end).await.unwrap_err();
        assert!(matches!(err, AssistantError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_transient() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let start = "2024-01-02T09:30:00Z".parse().unwrap();
        let end = "2024-01-02T10:00:00Z".parse().unwrap();

        let err = client.free_busy("primary", start, end).await.unwrap_err();
        assert!(matches!(err, AssistantError::Transient(_)));
    }
}
