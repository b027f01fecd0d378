use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, Url,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::domain::task::{Task, TaskStatus};
use crate::domain::ticket::TicketRequest;
use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::services::{Acknowledgement, TicketApi};

const USERS_PATH: &str = "/users";
const MOVE_PATH: &str = "/tasks/move";

pub struct HttpTicketApi {
    http: Client,
    base_url: Option<String>,
}

impl HttpTicketApi {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    #[cfg(test)]
    fn with_client(http: Client, base_url: Option<String>) -> Self {
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str, id: Option<&str>) -> AppResult<Url> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::Configuration("API base URL not configured".to_string()))?;
        endpoint_url(base_url, path, id)
    }

    fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/json")
    }

    async fn send(builder: RequestBuilder, path: &str) -> AppResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|err| AppError::Transport(format!("{path}: {err}")))?;

        let status = response.status();
        debug!(path, %status, "response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Rejected {
            status: Some(status.as_u16()),
            message: message_from_body(&body),
        })
    }

    async fn post_json(
        &self,
        token: &str,
        url: Url,
        body: &serde_json::Value,
    ) -> AppResult<Acknowledgement> {
        let path = url.path().to_owned();
        info!(path = %path, "POST");
        let builder = Self::authorized(self.http.post(url), token)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        let response = Self::send(builder, &path).await?;
        let text = response
            .text()
            .await
            .map_err(|err| AppError::Transport(format!("{path}: {err}")))?;
        Ok(Acknowledgement {
            message: message_from_body(&text),
        })
    }

    async fn get_list<T: DeserializeOwned>(&self, token: &str, path: &str) -> AppResult<Vec<T>> {
        let url = self.endpoint(path, None)?;
        info!(path, "GET");
        let response = Self::send(Self::authorized(self.http.get(url), token), path).await?;
        let text = response
            .text()
            .await
            .map_err(|err| AppError::Transport(format!("{path}: {err}")))?;
        parse_list(&text).map_err(|err| AppError::Decode(format!("{path}: {err}")))
    }
}

#[async_trait]
impl TicketApi for HttpTicketApi {
    async fn create_ticket(
        &self,
        token: &str,
        request: &TicketRequest,
    ) -> AppResult<Acknowledgement> {
        let url = self.endpoint(request.endpoint(), None)?;
        self.post_json(token, url, &request.to_json()).await
    }

    async fn move_task(
        &self,
        token: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> AppResult<Acknowledgement> {
        if task_id.trim().is_empty() {
            return Err(AppError::validation("id", "task id must not be empty"));
        }
        let url = self.endpoint(MOVE_PATH, Some(task_id))?;
        let body = serde_json::json!({ "status": status.as_wire() });
        self.post_json(token, url, &body).await
    }

    async fn fetch_tasks(&self, token: &str, status: TaskStatus) -> AppResult<Vec<Task>> {
        self.get_list(token, status.fetch_path()).await
    }

    async fn fetch_users(&self, token: &str) -> AppResult<Vec<User>> {
        self.get_list(token, USERS_PATH).await
    }
}

/// Appends `path` to the base URL's own path. `id` becomes one more segment,
/// percent-encoded so that `/`, `?` or `#` in it stay part of the id.
fn endpoint_url(base_url: &str, path: &str, id: Option<&str>) -> AppResult<Url> {
    let mut url = Url::parse(base_url).map_err(|err| {
        AppError::Configuration(format!("invalid API base URL '{base_url}': {err}"))
    })?;
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            AppError::Configuration(format!("API base URL '{base_url}' cannot carry a path"))
        })?;
        segments
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        if let Some(id) = id {
            segments.push(id);
        }
    }
    Ok(url)
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// Pulls the `message` string out of a JSON body. Non-JSON bodies carry none.
fn message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<MessageBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, serde_json::Error> {
    serde_json::from_str::<ListBody<T>>(body).map(|list| match list {
        ListBody::Bare(items) => items,
        ListBody::Wrapped { data } => data,
    })
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;
    use crate::domain::ticket::SupportTicketDraft;

    struct CannedResponse {
        status: u16,
        content_type: &'static str,
        body: &'static str,
    }

    /// Answers one connection per canned response, in order, and returns
    /// the raw requests it received.
    async fn serve(responses: Vec<CannedResponse>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let server = tokio::spawn(async move {
            let mut requests = Vec::new();
            for response in responses {
                let (mut socket, _) = listener.accept().await.expect("accept");
                requests.push(read_request(&mut socket).await);
                let raw = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    response.content_type,
                    response.body.len(),
                    response.body
                );
                socket.write_all(raw.as_bytes()).await.expect("write");
                let _ = socket.shutdown().await;
            }
            requests
        });
        (base_url, server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = socket.read(&mut chunk).await.expect("read");
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&raw);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn local_api(base_url: String) -> HttpTicketApi {
        let http = Client::builder().no_proxy().build().expect("client");
        HttpTicketApi::with_client(http, Some(base_url))
    }

    #[test]
    fn appends_paths_to_base_url() {
        assert_eq!(
            endpoint_url("https://desk.example/api/", "/tasks/todo", None)
                .unwrap()
                .as_str(),
            "https://desk.example/api/tasks/todo"
        );
        assert_eq!(
            endpoint_url("https://desk.example", MOVE_PATH, Some("T1"))
                .unwrap()
                .as_str(),
            "https://desk.example/tasks/move/T1"
        );
    }

    #[test]
    fn task_id_stays_one_path_segment() {
        let url = endpoint_url("https://desk.example/api", MOVE_PATH, Some("a/b?c#d")).unwrap();
        assert_eq!(url.path(), "/api/tasks/move/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            endpoint_url("desk.example", "/users", None),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            endpoint_url("mailto:ops@desk.example", "/users", None),
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn maps_backend_responses() {
        let (base_url, server) = serve(vec![
            CannedResponse {
                status: 200,
                content_type: "application/json",
                body: r#"{"message":"Task moved to ONGOING"}"#,
            },
            CannedResponse {
                status: 422,
                content_type: "application/json",
                body: r#"{"message":"client_email is invalid"}"#,
            },
            CannedResponse {
                status: 502,
                content_type: "text/html",
                body: "<html>Bad Gateway</html>",
            },
            CannedResponse {
                status: 200,
                content_type: "application/json",
                body: "{}",
            },
        ])
        .await;
        let api = local_api(base_url);

        let ack = api
            .move_task("tok-1", "T1", TaskStatus::Ongoing)
            .await
            .expect("move accepted");
        assert_eq!(ack.message.as_deref(), Some("Task moved to ONGOING"));

        let request = TicketRequest::Support(
            SupportTicketDraft {
                title: "VPN down".to_string(),
                ..Default::default()
            }
            .to_payload(),
        );
        let err = api
            .create_ticket("tok-1", &request)
            .await
            .expect_err("validation failure");
        assert!(matches!(
            &err,
            AppError::Rejected { status: Some(422), message: Some(message) }
                if message == "client_email is invalid"
        ));
        assert_eq!(err.server_message(), Some("client_email is invalid"));

        let err = api
            .fetch_tasks("tok-1", TaskStatus::Done)
            .await
            .expect_err("bad gateway");
        assert!(matches!(
            err,
            AppError::Rejected {
                status: Some(502),
                message: None
            }
        ));

        let ack = api
            .move_task("tok-1", "a/b#c", TaskStatus::Done)
            .await
            .expect("move accepted");
        assert_eq!(ack.message, None);

        let requests = server.await.expect("server task");
        assert!(requests[0].starts_with("POST /tasks/move/T1 HTTP/1.1\r\n"));
        assert!(
            requests[0]
                .to_ascii_lowercase()
                .contains("\r\nauthorization: bearer tok-1\r\n")
        );
        assert!(requests[0].ends_with(r#"{"status":"ONGOING"}"#));
        assert!(requests[1].starts_with("POST /tickets HTTP/1.1\r\n"));
        assert!(requests[2].starts_with("GET /tasks/complete HTTP/1.1\r\n"));
        assert!(requests[3].starts_with("POST /tasks/move/a%2Fb%23c HTTP/1.1\r\n"));
    }

    #[test]
    fn extracts_server_message() {
        assert_eq!(
            message_from_body(r#"{"message": "Ticket created", "status": 201}"#),
            Some("Ticket created".to_string())
        );
        assert_eq!(message_from_body(r#"{"error": "boom"}"#), None);
        assert_eq!(message_from_body("<html>Bad Gateway</html>"), None);
        assert_eq!(message_from_body(r#"{"message": ""}"#), None);
    }

    #[test]
    fn parses_wrapped_and_bare_lists() {
        let wrapped: Vec<User> =
            parse_list(r#"{"message": "ok", "data": [{"id": 1, "email": "a@x.com"}]}"#)
                .expect("wrapped list");
        assert_eq!(wrapped.len(), 1);

        let bare: Vec<Task> =
            parse_list(r#"[{"id": "T1", "task_name": "Design"}]"#).expect("bare list");
        assert_eq!(bare[0].name, "Design");

        assert!(parse_list::<Task>(r#"{"message": "nothing here"}"#).is_err());
    }

    #[tokio::test]
    async fn missing_base_url_is_a_configuration_error() {
        let api = HttpTicketApi::new(None);
        let err = api
            .fetch_tasks("token", TaskStatus::Todo)
            .await
            .expect_err("no base url");
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
