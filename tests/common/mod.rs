#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body, body::Body, Router};
use lettre::Message;
use portfolio::app_state::AppState;
use portfolio::configuration::{Application, MailCredentials, MailSettings};
use portfolio::create_app;
use portfolio::mail::{MailError, Mailer, MailerFactory};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

pub const OWNER_INBOX: &str = "inbox@portfolio.dev";

/// Stands in for the SMTP relay and keeps every message it is asked to send.
#[derive(Debug, Default, Clone)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<Message>>>,
    pub fail_on: Option<usize>,
}

impl RecordingMailer {
    pub fn failing_on(index: usize) -> Self {
        Self {
            fail_on: Some(index),
            ..Default::default()
        }
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("Failed to lock sent messages")
            .iter()
            .flat_map(|message| message.envelope().to().to_vec())
            .map(|address| address.to_string())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().expect("Failed to lock sent messages").len()
    }
}

impl MailerFactory for RecordingMailer {
    fn connect(&self, _credentials: &MailCredentials) -> Result<Box<dyn Mailer>, MailError> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        let mut sent = self.sent.lock().expect("Failed to lock sent messages");
        if self.fail_on == Some(sent.len()) {
            return Err(MailError::Smtp("554 transaction failed".to_string()));
        }
        sent.push(message);
        Ok(())
    }
}

pub fn credentials() -> MailCredentials {
    MailCredentials {
        from: "me@portfolio.dev".to_string(),
        password: "app-password".to_string(),
        to: OWNER_INBOX.to_string(),
    }
}

pub fn create_test_app(credentials: Option<MailCredentials>, mailer: RecordingMailer) -> Router {
    let application = Application {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: "static".to_string(),
    };
    let state = AppState::new(MailSettings::default(), credentials, Arc::new(mailer));
    create_app(&application, state)
}

pub async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    Url::parse(&format!("http://{addr}/")).expect("Failed to parse server url")
}

pub async fn read_body(body: Body) -> String {
    let bytes = body::to_bytes(body, usize::MAX).await.expect("Failed");
    String::from_utf8(bytes.to_vec()).expect("response was not valid utf-8")
}
