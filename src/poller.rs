use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{ExplanationPayload, TimeReading};

/// Source of time readings for the banner.
pub trait TimeService {
    fn fetch_time(&self) -> Result<TimeReading, FetchError>;
}

/// Source of localized explanation texts.
pub trait ExplanationService {
    fn fetch_explanation(&self, lang: &str) -> Result<ExplanationPayload, FetchError>;
}

/// Blocking HTTP client for the Astronomical Watch API.
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    time_url: String,
    explanation_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let tls = Arc::new(
            native_tls::TlsConnector::new().map_err(|e| FetchError::Transport(e.to_string()))?,
        );
        let mut builder = ureq::AgentBuilder::new().tls_connector(tls);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            agent: builder.build(),
            time_url: config.time_url(),
            explanation_url: config.explanation_api_url(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, request: ureq::Request) -> Result<T, FetchError> {
        // Error statuses still carry a body worth decoding
        let (status, response) = match request.call() {
            Ok(resp) => (resp.status(), resp),
            Err(ureq::Error::Status(code, resp)) => (code, resp),
            Err(ureq::Error::Transport(t)) => return Err(t.into()),
        };

        let body = response.into_string()?;
        if status >= 400 {
            log::debug!("HTTP {status}: {}", describe_body(&body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl TimeService for ApiClient {
    fn fetch_time(&self) -> Result<TimeReading, FetchError> {
        self.get_json(self.agent.get(&self.time_url))
    }
}

impl ExplanationService for ApiClient {
    fn fetch_explanation(&self, lang: &str) -> Result<ExplanationPayload, FetchError> {
        self.get_json(self.agent.get(&self.explanation_url).query("lang", lang))
    }
}

fn describe_body(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answers a single request with `status` and `body`, returning the request line.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).expect("read header");
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("write response");
            request_line.trim_end().to_string()
        });
        (base, handle)
    }

    fn client_for(base: &str) -> ApiClient {
        let config = Config {
            api_base_url: base.to_string(),
            ..Config::default()
        };
        ApiClient::new(&config).expect("client")
    }

    #[test]
    fn fetch_time_decodes_reading() {
        let (base, server) = serve_once("200 OK", r#"{"dies": 311, "milidies": 7, "progress": 55}"#);
        let reading = client_for(&base).fetch_time().expect("reading");

        assert_eq!(reading.milidies, Some(serde_json::json!(7)));
        assert_eq!(reading.progress, Some(serde_json::json!(55)));
        assert_eq!(server.join().unwrap(), "GET /api/time HTTP/1.1");
    }

    #[test]
    fn fetch_explanation_sends_language_query() {
        let (base, server) = serve_once("200 OK", r#"{"explanation": "Ein Tag"}"#);
        let payload = client_for(&base).fetch_explanation("de").expect("payload");

        assert_eq!(payload.text(), "Ein Tag");
        assert_eq!(server.join().unwrap(), "GET /api/explanation?lang=de HTTP/1.1");
    }

    #[test]
    fn error_status_with_json_body_still_decodes() {
        let (base, server) = serve_once("404 Not Found", r#"{"detail": "Not Found"}"#);
        let reading = client_for(&base).fetch_time().expect("body decodes");

        assert_eq!(reading, TimeReading::default());
        server.join().unwrap();
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>");
        let result = client_for(&base).fetch_time();

        assert!(matches!(result, Err(FetchError::Decode(_))));
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        drop(listener);

        let result = client_for(&base).fetch_explanation("en");
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[test]
    fn long_bodies_are_truncated_for_logging() {
        let body = "x".repeat(500);
        assert_eq!(describe_body(&body).len(), 200);
        assert_eq!(describe_body("short"), "short");
    }
}
