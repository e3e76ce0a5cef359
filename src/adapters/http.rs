//! HTTP transport for the backend adapter.
//!
//! `reqwless` speaks the protocol. This module gives it the two
//! `embedded-nal-async` capabilities it needs on a Linux host: TCP
//! connections over `async_io_mini::Async<TcpStream>`, and name resolution
//! through the system resolver. Each exchange races a reactor timer, so
//! connect, write and read share one deadline.

use core::fmt;
use core::net::{IpAddr, SocketAddr};
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use async_io_mini::{Async, Timer};
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};
use embedded_nal_async::{AddrType, Dns, TcpConnect};
use futures_lite::{AsyncReadExt, AsyncWriteExt, future};
use reqwless::client::HttpClient;
use reqwless::headers::ContentType;
use reqwless::request::{Method, RequestBuilder};

/// Receive buffer for one response, headers included.
pub const RX_BUFFER: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    /// Name resolution, connect, or a reset connection.
    Connect,
    /// The deadline passed.
    Timeout,
    /// The response was not valid HTTP or did not fit [`RX_BUFFER`].
    Protocol,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connection failed"),
            Self::Timeout => write!(f, "timed out"),
            Self::Protocol => write!(f, "protocol error"),
        }
    }
}

impl From<reqwless::Error> for HttpError {
    fn from(e: reqwless::Error) -> Self {
        match e {
            reqwless::Error::Dns => Self::Connect,
            reqwless::Error::Network(ErrorKind::TimedOut) => Self::Timeout,
            reqwless::Error::Network(_) => Self::Connect,
            _ => Self::Protocol,
        }
    }
}

/// `host:port` parsed from an `http://host[:port][/]` base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn parse(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("http://")?;
        let authority = rest.trim_end_matches('/');
        if authority.is_empty() || authority.contains('/') {
            return None;
        }
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, port.parse().ok()?),
            None => (authority, 80),
        };
        if host.is_empty() {
            return None;
        }
        Some(Self {
            host: host.to_owned(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Send one request and read the whole response before `timeout` elapses.
pub fn request(
    endpoint: &Endpoint,
    method: Method,
    path: &str,
    json_body: Option<&[u8]>,
    timeout: Duration,
) -> Result<HttpResponse, HttpError> {
    let url = endpoint.url(path);
    future::block_on(future::or(exchange(&url, method, json_body), async {
        Timer::after(timeout).await;
        Err(HttpError::Timeout)
    }))
}

async fn exchange(
    url: &str,
    method: Method,
    json_body: Option<&[u8]>,
) -> Result<HttpResponse, HttpError> {
    let net = HostNet;
    let mut client = HttpClient::new(&net, &net);
    let mut rx = vec![0u8; RX_BUFFER];
    let request = client.request(method, url).await?;

    let (status, body) = match json_body {
        Some(body) => {
            let mut request = request
                .content_type(ContentType::ApplicationJson)
                .body(body);
            let response = request.send(&mut rx).await?;
            let status = response.status.0;
            (status, response.body().read_to_end().await?.to_vec())
        }
        None => {
            let mut request = request;
            let response = request.send(&mut rx).await?;
            let status = response.status.0;
            (status, response.body().read_to_end().await?.to_vec())
        }
    };
    Ok(HttpResponse { status, body })
}

// ── embedded-nal-async over the host network stack ────────────

/// Socket error carried through `embedded-io-async`.
#[derive(Debug)]
pub struct NetError(io::Error);

impl embedded_io_async::Error for NetError {
    fn kind(&self) -> ErrorKind {
        match self.0.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorKind::TimedOut,
            io::ErrorKind::ConnectionRefused => ErrorKind::ConnectionRefused,
            io::ErrorKind::ConnectionReset => ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted => ErrorKind::ConnectionAborted,
            io::ErrorKind::NotConnected => ErrorKind::NotConnected,
            io::ErrorKind::BrokenPipe => ErrorKind::BrokenPipe,
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        }
    }
}

/// TCP connector and resolver backed by the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostNet;

pub struct HostConnection(Async<TcpStream>);

impl ErrorType for HostConnection {
    type Error = NetError;
}

impl Read for HostConnection {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        AsyncReadExt::read(&mut self.0, buf).await.map_err(NetError)
    }
}

impl Write for HostConnection {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, NetError> {
        AsyncWriteExt::write(&mut self.0, buf).await.map_err(NetError)
    }

    async fn flush(&mut self) -> Result<(), NetError> {
        AsyncWriteExt::flush(&mut self.0).await.map_err(NetError)
    }
}

impl TcpConnect for HostNet {
    type Error = NetError;
    type Connection<'a>
        = HostConnection
    where
        Self: 'a;

    async fn connect<'a>(
        &'a self,
        remote: SocketAddr,
    ) -> Result<Self::Connection<'a>, Self::Error> {
        let stream = Async::<TcpStream>::connect(remote).await.map_err(NetError)?;
        let _ = stream.get_ref().set_nodelay(true);
        Ok(HostConnection(stream))
    }
}

impl Dns for HostNet {
    type Error = NetError;

    async fn get_host_by_name(&self, host: &str, addr_type: AddrType) -> Result<IpAddr, NetError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }
        // The system resolver blocks; lookups are rare (one per request).
        (host, 0)
            .to_socket_addrs()
            .map_err(NetError)?
            .map(|addr| addr.ip())
            .find(|ip| match addr_type {
                AddrType::IPv4 => ip.is_ipv4(),
                AddrType::IPv6 => ip.is_ipv6(),
                AddrType::Either => true,
            })
            .ok_or_else(|| NetError(io::ErrorKind::NotFound.into()))
    }

    async fn get_host_by_address(&self, _addr: IpAddr, _result: &mut [u8]) -> Result<usize, NetError> {
        Err(NetError(io::ErrorKind::Unsupported.into()))
    }
}
