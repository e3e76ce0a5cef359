//! Backend adapter: the HTTP alarm authority and dismissal notifier.
//!
//! | Call                    | Endpoint                                        | Deadline                    |
//! |-------------------------|-------------------------------------------------|-----------------------------|
//! | `fetch`                 | `GET /api/estado`                               | `status_timeout_ms`         |
//! | `notify` (button)       | `POST /api/alarma/apagar {"metodo":"boton_fisico"}` | `button_notify_timeout_ms`  |
//! | `notify` (gesture)      | `POST /api/hand-detected {"image_path":..}`     | `gesture_notify_timeout_ms` |
//!
//! Dismissals are idempotent on the backend: a 2xx with `success: false`
//! (nothing to dismiss) is an [`Ack`] with `applied == false`, not an error.

use std::time::Duration;

use log::debug;
use reqwless::request::Method;
use serde::{Deserialize, Serialize};

use crate::app::ports::{
    Ack, AlarmSignalPort, DismissalChannel, DismissalPort, DismissalRequest,
};
use crate::config::SystemConfig;
use crate::error::{AuthorityError, NotifyError};
use crate::monitor::AlarmSignal;

use super::http::{self, Endpoint, HttpError, HttpResponse};

pub const STATUS_PATH: &str = "/api/estado";
pub const BUTTON_DISMISS_PATH: &str = "/api/alarma/apagar";
pub const GESTURE_DISMISS_PATH: &str = "/api/hand-detected";

/// Dismissal method tag the backend expects for the button.
pub const BUTTON_METHOD: &str = "boton_fisico";

#[derive(Serialize)]
struct ButtonDismissBody<'a> {
    metodo: &'a str,
}

#[derive(Serialize)]
struct GestureDismissBody<'a> {
    image_path: &'a str,
}

#[derive(Deserialize)]
struct DismissReply {
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

pub struct BackendClient {
    endpoint: Endpoint,
    status_timeout: Duration,
    button_timeout: Duration,
    gesture_timeout: Duration,
}

impl BackendClient {
    /// Returns `None` if `backend_url` is not `http://host[:port]`.
    pub fn new(config: &SystemConfig) -> Option<Self> {
        Some(Self {
            endpoint: Endpoint::parse(&config.backend_url)?,
            status_timeout: Duration::from_millis(u64::from(config.status_timeout_ms)),
            button_timeout: Duration::from_millis(u64::from(config.button_notify_timeout_ms)),
            gesture_timeout: Duration::from_millis(u64::from(config.gesture_notify_timeout_ms)),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn post_json(
        &self,
        path: &str,
        body: &impl Serialize,
        timeout: Duration,
    ) -> Result<HttpResponse, NotifyError> {
        let body = serde_json::to_vec(body).map_err(|_| NotifyError::Malformed)?;
        http::request(&self.endpoint, Method::POST, path, Some(&body), timeout).map_err(|e| match e {
            HttpError::Connect => NotifyError::Unreachable,
            HttpError::Timeout => NotifyError::Timeout,
            HttpError::Protocol => NotifyError::Malformed,
        })
    }
}

impl AlarmSignalPort for BackendClient {
    fn fetch(&mut self) -> Result<AlarmSignal, AuthorityError> {
        let response = http::request(&self.endpoint, Method::GET, STATUS_PATH, None, self.status_timeout)
            .map_err(|e| match e {
                HttpError::Connect => AuthorityError::Connect,
                HttpError::Timeout => AuthorityError::Timeout,
                HttpError::Protocol => AuthorityError::Malformed,
            })?;
        if !response.is_success() {
            return Err(AuthorityError::BadStatus(response.status));
        }
        serde_json::from_slice(&response.body).map_err(|_| AuthorityError::Malformed)
    }
}

impl DismissalPort for BackendClient {
    fn notify(&mut self, request: &DismissalRequest) -> Result<Ack, NotifyError> {
        let response = match request.channel {
            DismissalChannel::PhysicalButton => self.post_json(
                BUTTON_DISMISS_PATH,
                &ButtonDismissBody {
                    metodo: BUTTON_METHOD,
                },
                self.button_timeout,
            )?,
            DismissalChannel::HandGesture => self.post_json(
                GESTURE_DISMISS_PATH,
                &GestureDismissBody {
                    image_path: request.image_path.as_deref().unwrap_or(""),
                },
                self.gesture_timeout,
            )?,
        };

        if !response.is_success() {
            return Err(NotifyError::Rejected(response.status));
        }
        let applied = if response.body.iter().all(u8::is_ascii_whitespace) {
            true
        } else {
            serde_json::from_slice::<DismissReply>(&response.body)
                .map_err(|_| NotifyError::Malformed)?
                .success
        };
        debug!("{} dismissal acknowledged, applied={}", request.channel, applied);
        Ok(Ack { applied })
    }
}
