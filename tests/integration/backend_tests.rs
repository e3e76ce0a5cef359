//! BackendClient against a loopback HTTP server.
//!
//! Each test starts a one-shot `TcpListener` that answers a canned
//! response and hands back the raw request it received.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use despertador::adapters::backend::BackendClient;
use despertador::app::ports::{Ack, AlarmSignalPort, DismissalPort, DismissalRequest};
use despertador::config::SystemConfig;
use despertador::error::{AuthorityError, NotifyError};
use despertador::monitor::AlarmSignal;

/// Serve one connection with `response`; the request text comes back on
/// the returned channel.
fn one_shot(response: &'static str) -> (SystemConfig, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        let mut buf = vec![0u8; 4096];
        let mut request = Vec::new();
        // Read head, then the body announced by Content-Length.
        loop {
            let n = stream.read(&mut buf).unwrap_or(0);
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let len = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + len {
                    break;
                }
            }
        }
        stream.write_all(response.as_bytes()).unwrap();
        let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
    });

    let mut config = SystemConfig::default();
    config.backend_url = format!("http://127.0.0.1:{port}");
    config.status_timeout_ms = 1000;
    config.button_notify_timeout_ms = 1000;
    config.gesture_notify_timeout_ms = 1000;
    (config, rx)
}

#[test]
fn fetch_reads_status() {
    let (config, rx) = one_shot(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 41\r\n\r\n\
         {\"monitoring\":true,\"hora_alarma\":\"07:15\"}",
    );
    let mut client = BackendClient::new(&config).unwrap();
    assert_eq!(client.fetch(), Ok(AlarmSignal::ringing("07:15")));

    let request = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(request.starts_with("GET /api/estado HTTP/1.1\r\n"));
}

#[test]
fn fetch_defaults_missing_monitoring_to_false() {
    let (config, _rx) = one_shot("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}");
    let mut client = BackendClient::new(&config).unwrap();
    assert_eq!(client.fetch(), Ok(AlarmSignal::idle()));
}

#[test]
fn fetch_maps_server_error() {
    let (config, _rx) = one_shot("HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\n\r\n");
    let mut client = BackendClient::new(&config).unwrap();
    assert_eq!(client.fetch(), Err(AuthorityError::BadStatus(503)));
}

#[test]
fn button_dismissal_posts_method() {
    let (config, rx) = one_shot(
        "HTTP/1.1 200 OK\r\nContent-Length: 16\r\n\r\n{\"success\":true}",
    );
    let mut client = BackendClient::new(&config).unwrap();
    assert_eq!(
        client.notify(&DismissalRequest::button()),
        Ok(Ack { applied: true })
    );

    let request = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(request.starts_with("POST /api/alarma/apagar HTTP/1.1\r\n"));
    assert!(request.ends_with("{\"metodo\":\"boton_fisico\"}"));
}

#[test]
fn gesture_dismissal_posts_image_path() {
    let (config, rx) = one_shot("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    let mut client = BackendClient::new(&config).unwrap();
    let request = DismissalRequest::gesture(Some("data/images/hand_1_2.jpg".into()));
    assert_eq!(client.notify(&request), Ok(Ack { applied: true }));

    let raw = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(raw.starts_with("POST /api/hand-detected HTTP/1.1\r\n"));
    assert!(raw.ends_with("{\"image_path\":\"data/images/hand_1_2.jpg\"}"));
}

#[test]
fn already_dismissed_is_success_not_applied() {
    let (config, _rx) = one_shot(
        "HTTP/1.1 200 OK\r\nContent-Length: 45\r\n\r\n{\"success\":false,\"message\":\"no active alarm\"}",
    );
    let mut client = BackendClient::new(&config).unwrap();
    assert_eq!(
        client.notify(&DismissalRequest::button()),
        Ok(Ack { applied: false })
    );
}

#[test]
fn rejected_dismissal_carries_status() {
    let (config, _rx) = one_shot("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n");
    let mut client = BackendClient::new(&config).unwrap();
    assert_eq!(
        client.notify(&DismissalRequest::button()),
        Err(NotifyError::Rejected(500))
    );
}

#[test]
fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let hold = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(1500));
        drop(stream);
    });

    let mut config = SystemConfig::default();
    config.backend_url = format!("http://127.0.0.1:{port}");
    config.status_timeout_ms = 500;
    let mut client = BackendClient::new(&config).unwrap();
    assert_eq!(client.fetch(), Err(AuthorityError::Timeout));
    let _ = hold.join();
}
