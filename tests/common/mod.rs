//! Shared utilities for router and server tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Request, Response},
    Router,
};
use booking_relay::config::{ContactConfig, ServerConfig};
use booking_relay::mail::{DispatchError, Dispatcher, MailTransport};
use booking_relay::HttpServer;
use lettre::Message;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const CONTACT_FROM: &str = "Bookings <noreply@example.com>";
pub const CONTACT_TO: &str = "owner@example.com";

/// Records every delivered message instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Message>>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, message: Message) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Fails every delivery the way a rejecting relay would.
pub struct FailingTransport;

pub const TRANSPORT_FAILURE: &str =
    "permanent error (535): 5.7.8 Username and Password not accepted for user=mailer pass=hunter2";

#[async_trait]
impl MailTransport for FailingTransport {
    async fn deliver(&self, _message: Message) -> Result<(), DispatchError> {
        Err(DispatchError::Transport(TRANSPORT_FAILURE.to_string()))
    }
}

pub fn contact() -> ContactConfig {
    ContactConfig {
        from: CONTACT_FROM.to_string(),
        to: CONTACT_TO.to_string(),
    }
}

pub fn dispatcher(transport: impl MailTransport + 'static) -> Dispatcher {
    Dispatcher::new(&contact(), Arc::new(transport)).unwrap()
}

/// A server whose mail goes to `transport`.
pub fn server_with(transport: impl MailTransport + 'static) -> HttpServer {
    HttpServer::with_dispatcher(ServerConfig::default(), Some(dispatcher(transport)))
}

/// The server's router, with every request arriving from `client`.
pub fn router_from(server: &HttpServer, client: &str) -> Router {
    let addr: SocketAddr = format!("{client}:51000").parse().unwrap();
    server.router().layer(MockConnectInfo(addr))
}

pub fn valid_booking() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "company": "Analytical Engines",
        "date": "2026-11-02",
        "time": "10:30",
        "notes": "First line\nSecond line"
    })
}

pub fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
