//! HttpClinicTransport -- concrete [`ClinicTransport`] over reqwest.
//!
//! POSTs JSON bodies (no auth headers) to the configured endpoint paths and
//! checks every reply at the boundary: the body must be a JSON object that
//! deserializes into the typed reply, and success replies must carry their
//! payload. Anything else is a [`ClientError::Decode`].

use std::time::Duration;

use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, field, info_span, warn};

use medidesk_core::transport::ClinicTransport;
use medidesk_observe::attrs::{
    CLINIC_DOCTOR_ID, CLINIC_ENDPOINT, CLINIC_HTTP_METHOD, CLINIC_HTTP_STATUS,
    CLINIC_REPLY_STATUS, CLINIC_URL, OP_ALL_SPECIALISTS, OP_CHAT, OP_SLOTS, OP_SPECIALISTS,
};
use medidesk_types::chat::{ChatReply, ChatRequest};
use medidesk_types::config::{ClientConfig, EndpointPaths};
use medidesk_types::error::ClientError;
use medidesk_types::triage::{SlotsReply, SlotsRequest, SpecialistsReply, SpecialistsRequest};

/// Clinic server client.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections across concurrent requests.
#[derive(Debug, Clone)]
pub struct HttpClinicTransport {
    client: reqwest::Client,
    base_url: Url,
    endpoints: EndpointPaths,
}

impl HttpClinicTransport {
    /// Build a transport from client configuration.
    ///
    /// Fails with [`ClientError::InvalidBaseUrl`] unless `base_url` is an
    /// absolute `http`/`https` URL.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            endpoints: config.endpoints.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Endpoint URL under `base_url`. Paths are relative to the base path,
    /// so a leading `/` does not drop a prefix such as `/hms`.
    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}{path} ({e})", self.base_url)))
    }

    /// Send one request and decode the reply body.
    ///
    /// The HTTP status is logged but does not decide the outcome: the server
    /// reports failures in the body (`{"status": "error", ...}`), and any
    /// body that does not decode is an error either way.
    async fn send<B, R>(
        &self,
        endpoint: &'static str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path)?;
        let span = info_span!(
            "clinic.request",
            { CLINIC_ENDPOINT } = endpoint,
            { CLINIC_HTTP_METHOD } = method.as_str(),
            { CLINIC_URL } = %url,
            { CLINIC_HTTP_STATUS } = field::Empty,
        );

        async move {
            let mut request = self.client.request(method, url);
            if let Some(body) = body {
                request = request.json(body);
            }

            debug!("Sending clinic request");
            let response = request.send().await.map_err(|e| {
                warn!(error = %e, "Clinic request failed");
                ClientError::Transport(e.to_string())
            })?;

            let status = response.status();
            tracing::Span::current().record(CLINIC_HTTP_STATUS, status.as_u16());
            if !status.is_success() {
                warn!(%status, "Clinic server returned an error status");
            }

            let text = response
                .text()
                .await
                .map_err(|e| ClientError::Transport(format!("failed to read reply body: {e}")))?;

            decode(&text).inspect_err(|e| warn!(error = %e, "Clinic reply rejected"))
        }
        .instrument(span)
        .await
    }

    async fn post<B, R>(&self, endpoint: &'static str, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(endpoint, Method::POST, path, Some(body)).await
    }

    async fn get<R: DeserializeOwned>(&self, endpoint: &'static str, path: &str) -> Result<R, ClientError> {
        self.send::<(), R>(endpoint, Method::GET, path, None).await
    }
}

impl ClinicTransport for HttpClinicTransport {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.post(OP_CHAT, &self.endpoints.chat, request).await
    }

    async fn specialists(
        &self,
        request: &SpecialistsRequest,
    ) -> Result<SpecialistsReply, ClientError> {
        let reply: SpecialistsReply = self
            .post(OP_SPECIALISTS, &self.endpoints.specialists, request)
            .await?;
        reply.check_shape()?;
        debug!({ CLINIC_REPLY_STATUS } = %reply.status, count = reply.doctors().len(), "Specialists reply");
        Ok(reply)
    }

    async fn all_specialists(&self) -> Result<SpecialistsReply, ClientError> {
        let reply: SpecialistsReply = self
            .get(OP_ALL_SPECIALISTS, &self.endpoints.all_specialists)
            .await?;
        reply.check_shape()?;
        debug!({ CLINIC_REPLY_STATUS } = %reply.status, count = reply.doctors().len(), "Directory reply");
        Ok(reply)
    }

    async fn slots(&self, request: &SlotsRequest) -> Result<SlotsReply, ClientError> {
        let reply: SlotsReply = self.post(OP_SLOTS, &self.endpoints.slots, request).await?;
        reply.check_shape()?;
        debug!(
            { CLINIC_DOCTOR_ID } = request.doc_id,
            { CLINIC_REPLY_STATUS } = %reply.status,
            "Slots reply"
        );
        Ok(reply)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|_| ClientError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let dir = format!("{}/", url.path());
        url.set_path(&dir);
    }
    Ok(url)
}

/// Decode a reply body, accepting only JSON objects.
fn decode<R: DeserializeOwned>(body: &str) -> Result<R, ClientError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(ClientError::Decode("reply is not a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medidesk_types::triage::{NaiveDate, Slot};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(server: &MockServer) -> HttpClinicTransport {
        let config = ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        };
        HttpClinicTransport::new(&config).unwrap()
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        for raw in ["not a url", "ftp://clinic.local", "mailto:desk@clinic.local"] {
            let config = ClientConfig {
                base_url: raw.to_string(),
                ..ClientConfig::default()
            };
            let err = HttpClinicTransport::new(&config).unwrap_err();
            assert!(matches!(err, ClientError::InvalidBaseUrl(_)), "{raw}");
        }
    }

    #[test]
    fn test_endpoint_paths_join_base_url() {
        let transport = HttpClinicTransport::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            transport.url("/get_slots").unwrap().as_str(),
            "http://127.0.0.1:5000/get_slots"
        );
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        for raw in ["http://clinic.local/hms", "http://clinic.local/hms/"] {
            let config = ClientConfig {
                base_url: raw.to_string(),
                ..ClientConfig::default()
            };
            let transport = HttpClinicTransport::new(&config).unwrap();
            assert_eq!(transport.base_url().as_str(), "http://clinic.local/hms/");
            assert_eq!(
                transport.url("/chat").unwrap().as_str(),
                "http://clinic.local/hms/chat",
                "{raw}"
            );
        }
    }

    #[tokio::test]
    async fn test_requests_go_under_base_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hms/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig {
            base_url: format!("{}/hms", server.uri()),
            ..ClientConfig::default()
        };
        let reply = HttpClinicTransport::new(&config)
            .unwrap()
            .chat(&ChatRequest {
                query: "hi".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reply.response.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_chat_posts_query_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"query": "What is flu?"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"response": "**Flu** is a virus."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = transport_for(&server)
            .chat(&ChatRequest {
                query: "What is flu?".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reply.response.as_deref(), Some("**Flu** is a virus."));
    }

    #[tokio::test]
    async fn test_chat_object_without_response_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let reply = transport_for(&server)
            .chat(&ChatRequest {
                query: "hello".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reply.response, None);
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .chat(&ChatRequest {
                query: "hello".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_non_object_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "an", "object"])))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .chat(&ChatRequest {
                query: "hello".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_specialists_decodes_doctors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get_specialists"))
            .and(body_json(json!({"symptoms": "chest pain"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "doctors": [{
                    "id": 1,
                    "name": "Dr. Ayesha Khan",
                    "specialization": "Cardiologist",
                    "time": "09:00 AM - 01:00 PM",
                    "room": 204,
                    "fee": "1500"
                }]
            })))
            .mount(&server)
            .await;

        let reply = transport_for(&server)
            .specialists(&SpecialistsRequest {
                symptoms: "chest pain".to_string(),
            })
            .await
            .unwrap();
        assert!(reply.is_success());
        let doctor = &reply.doctors()[0];
        assert_eq!(doctor.id, 1);
        assert_eq!(doctor.room.to_string(), "204");
        assert_eq!(doctor.fee.to_string(), "1500");
    }

    #[tokio::test]
    async fn test_success_without_doctors_fails_closed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get_specialists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .specialists(&SpecialistsRequest {
                symptoms: "fever".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_error_status_body_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get_specialists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "message": "No matching specialist"
            })))
            .mount(&server)
            .await;

        let reply = transport_for(&server)
            .specialists(&SpecialistsRequest {
                symptoms: "fever".to_string(),
            })
            .await
            .unwrap();
        assert!(!reply.is_success());
        assert!(reply.doctors().is_empty());
    }

    #[tokio::test]
    async fn test_all_specialists_uses_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get_all_doctors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "doctors": [{"id": 7, "name": "Dr. Sara Malik"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = transport_for(&server).all_specialists().await.unwrap();
        assert_eq!(reply.doctors()[0].name, "Dr. Sara Malik");
    }

    #[tokio::test]
    async fn test_slots_sends_doc_id_and_date() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get_slots"))
            .and(body_json(json!({"doc_id": 1, "date": "2026-11-02"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "slots": ["10:00", {"time": "10:20", "is_booked": true}]
            })))
            .mount(&server)
            .await;

        let reply = transport_for(&server)
            .slots(&SlotsRequest {
                doc_id: 1,
                date: NaiveDate::from_ymd_opt(2026, 11, 2),
            })
            .await
            .unwrap();
        assert_eq!(
            reply.slots.unwrap(),
            vec![
                Slot::open("10:00"),
                Slot {
                    time: "10:20".to_string(),
                    is_booked: true
                }
            ]
        );
    }

    #[tokio::test]
    async fn test_slots_omit_date_when_unset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get_slots"))
            .and(body_json(json!({"doc_id": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "message": "Doctor timings not found."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = transport_for(&server)
            .slots(&SlotsRequest {
                doc_id: 3,
                date: None,
            })
            .await
            .unwrap();
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn test_custom_endpoint_paths() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        };
        config.endpoints.chat = "/api/v2/chat".to_string();
        let transport = HttpClinicTransport::new(&config).unwrap();

        let reply = transport
            .chat(&ChatRequest {
                query: "hi".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reply.response.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig {
            base_url: server.uri(),
            request_timeout_secs: Some(1),
            ..ClientConfig::default()
        };
        let err = HttpClinicTransport::new(&config)
            .unwrap()
            .chat(&ChatRequest {
                query: "hi".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Nothing listens on a port once its listener is dropped.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = ClientConfig {
            base_url: format!("http://{addr}"),
            ..ClientConfig::default()
        };

        let err = HttpClinicTransport::new(&config)
            .unwrap()
            .all_specialists()
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
    }
}
