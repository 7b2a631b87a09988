//! HTTP transport for the backend form endpoints.

use reqwest::header::CONTENT_TYPE;
use shelter_core::transport::{FormBody, Transport, TransportError};
use std::future::Future;
use std::time::Duration;

/// Posts url-encoded form bodies to `<base_url>/<endpoint>`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network {
                endpoint: base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of `endpoint`
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        endpoint: &str,
        body: FormBody,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        let client = self.client.clone();
        let url = self.url(endpoint);
        let endpoint = endpoint.to_string();

        async move {
            let encoded = body.encode()?;
            tracing::debug!(%url, fields = body.fields().len(), "Posting form");

            let network = |e: reqwest::Error| TransportError::Network {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            };

            let response = client
                .post(&url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(encoded)
                .send()
                .await
                .map_err(network)?;

            let status = response.status();
            let text = response.text().await.map_err(network)?;

            if !status.is_success() {
                tracing::warn!(%url, status = status.as_u16(), "Backend rejected request");
                return Err(TransportError::Status {
                    endpoint,
                    status: status.as_u16(),
                    body: text,
                });
            }

            Ok(text)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one request with `status` and `body`, returning the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .and_then(|v| v.trim().parse::<usize>().ok())
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length || n == 0 {
                        break;
                    }
                } else if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (base_url, server)
    }

    #[tokio::test]
    async fn posts_form_and_returns_body() {
        let (base_url, server) = serve_once("200 OK", "88").await;
        let transport = HttpTransport::new(format!("{base_url}/"), Duration::from_secs(5)).unwrap();

        let body = FormBody::new().field("mode", "templates").field("id", "12");
        let result = transport.post("move_reserve", body).await;

        assert_eq!(result, Ok("88".to_string()));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /move_reserve HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.ends_with("mode=templates&id=12"));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (base_url, server) = serve_once("500 Internal Server Error", "Animal is deceased").await;
        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();

        let result = transport.post("move_reserve", FormBody::new().field("animal", "1")).await;

        assert_eq!(
            result,
            Err(TransportError::Status {
                endpoint: "move_reserve".to_string(),
                status: 500,
                body: "Animal is deceased".to_string(),
            })
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let transport = HttpTransport::new(base_url, Duration::from_secs(5)).unwrap();
        let result = transport.post("move_reserve", FormBody::new()).await;

        assert!(matches!(result, Err(TransportError::Network { .. })));
    }

    #[test]
    fn url_joins_base_and_endpoint() {
        let transport = HttpTransport::new("http://localhost:5000/asm/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.url("move_reserve"), "http://localhost:5000/asm/move_reserve");
    }
}
