//! Recording mocks for screen capabilities.
//!
//! Each mock is cheap to clone; clones share the same recording so a test can
//! keep one handle while the environment owns another.

use shelter_core::environment::{Navigator, WidgetHost};
use shelter_core::transport::{FormBody, Transport, TransportError};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A request captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Endpoint that was posted to
    pub endpoint: String,
    /// Form body as sent
    pub body: FormBody,
}

#[derive(Debug, Clone)]
struct ScriptedResponse {
    delay: Duration,
    result: Result<String, TransportError>,
}

type ResponseKey = (String, Option<String>);

#[derive(Debug, Default)]
struct TransportLog {
    requests: Vec<RecordedRequest>,
    scripts: HashMap<ResponseKey, VecDeque<ScriptedResponse>>,
}

/// Transport that records every request and replays scripted responses.
///
/// Responses are keyed by endpoint and the body's `mode` field (`None` for
/// bodies without one). Scripted responses for a key are consumed in order;
/// the last one is repeated once the queue is down to a single entry.
/// Unscripted requests fail with [`TransportError::Status`] 404.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    log: Arc<Mutex<TransportLog>>,
}

impl RecordingTransport {
    /// Create a transport with no scripted responses
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an immediate response
    #[must_use]
    pub fn respond(
        self,
        endpoint: &str,
        mode: Option<&str>,
        result: Result<String, TransportError>,
    ) -> Self {
        self.respond_after(endpoint, mode, Duration::ZERO, result)
    }

    /// Script a response delivered after `delay`
    #[must_use]
    pub fn respond_after(
        self,
        endpoint: &str,
        mode: Option<&str>,
        delay: Duration,
        result: Result<String, TransportError>,
    ) -> Self {
        {
            let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
            log.scripts
                .entry((endpoint.to_string(), mode.map(str::to_string)))
                .or_default()
                .push_back(ScriptedResponse { delay, result });
        }
        self
    }

    /// All requests in the order they were issued
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .clone()
    }

    /// Requests whose body has the given `mode` field
    #[must_use]
    pub fn requests_with_mode(&self, mode: Option<&str>) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.body.get("mode") == mode)
            .collect()
    }

    fn next_response(&self, endpoint: &str, body: FormBody) -> ScriptedResponse {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (endpoint.to_string(), body.get("mode").map(str::to_string));
        log.requests.push(RecordedRequest {
            endpoint: endpoint.to_string(),
            body,
        });

        let scripted = log.scripts.get_mut(&key).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });

        scripted.unwrap_or_else(|| ScriptedResponse {
            delay: Duration::ZERO,
            result: Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status: 404,
                body: "no scripted response".to_string(),
            }),
        })
    }
}

impl Transport for RecordingTransport {
    fn post(
        &self,
        endpoint: &str,
        body: FormBody,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        let response = self.next_response(endpoint, body);
        async move {
            if !response.delay.is_zero() {
                tokio::time::sleep(response.delay).await;
            }
            response.result
        }
    }
}

/// Navigator that records every URL it is asked to load.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    urls: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    /// Create an empty navigator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs in navigation order
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn route(&self, url: &str) {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }
}

/// Widget host that records which widgets were destroyed.
#[derive(Debug, Clone, Default)]
pub struct RecordingWidgets {
    destroyed: Arc<Mutex<Vec<String>>>,
}

impl RecordingWidgets {
    /// Create an empty widget host
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selectors of destroyed widgets, in order
    #[must_use]
    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl WidgetHost for RecordingWidgets {
    fn destroy(&self, selector: &str) {
        self.destroyed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(selector.to_string());
    }
}
