#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use keygate::common::{SpawnError, TransportError};
use keygate::pipeline::Launcher;
use keygate::session::AppIdentity;
use keygate::transport::{Form, Transport};
use keygate::{ArtifactDescriptor, DeviceFingerprint, PresentationSink, SessionClient, Tone, UiEvent};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const API_URL: &str = "https://licensing.test/api/1.3/";

pub fn app() -> AppIdentity {
    AppIdentity {
        name: "Gate".to_string(),
        owner_id: "owner123".to_string(),
        version: "1.0".to_string(),
    }
}

pub fn fingerprint(seed: &str) -> DeviceFingerprint {
    DeviceFingerprint::from_hardware_id(seed.as_bytes())
}

pub fn client(transport: &Arc<MockTransport>) -> SessionClient {
    SessionClient::new(API_URL, app(), transport.clone())
}

pub fn setup_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

pub fn artifact(dir: &Path, file_name: &str) -> ArtifactDescriptor {
    ArtifactDescriptor {
        source_url: format!("https://downloads.test/{file_name}"),
        file_name: file_name.to_string(),
        destination_directory: dir.to_path_buf(),
    }
}

/// Local HTTP server answering every request with `status` and no body.
/// Returns its base url.
pub async fn serve_status(status: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read listener address");

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            // GET only: the request ends with its headers
            let mut request: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 512];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let reply =
                format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            let _ = stream.write_all(reply.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{addr}")
}

pub fn init_ok(session_id: &str) -> String {
    format!(r#"{{"success": true, "sessionid": "{session_id}", "message": "Initialized"}}"#)
}

pub fn license_ok() -> String {
    r#"{"success": true, "message": "Logged in!"}"#.to_string()
}

pub fn license_rejected(message: &str) -> String {
    format!(r#"{{"success": false, "message": "{message}"}}"#)
}

/// Transport with scripted responses that records every request
#[derive(Default)]
pub struct MockTransport {
    posts: Mutex<Vec<Form>>,
    gets: Mutex<Vec<String>>,
    post_responses: Mutex<VecDeque<Result<String, String>>>,
    files: Mutex<HashMap<String, Result<Vec<u8>, String>>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the body of the next POST
    pub fn respond(&self, body: impl Into<String>) {
        self.post_responses.lock().unwrap().push_back(Ok(body.into()));
    }

    /// Queue a transport failure for the next POST
    pub fn respond_unreachable(&self, reason: &str) {
        self.post_responses
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
    }

    pub fn serve(&self, url: &str, body: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body.to_vec()));
    }

    pub fn fail(&self, url: &str, reason: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(reason.to_string()));
    }

    pub fn posts(&self) -> Vec<Form> {
        self.posts.lock().unwrap().clone()
    }

    /// `type` field of every POST, in order
    pub fn post_types(&self) -> Vec<String> {
        self.posts()
            .iter()
            .map(|form| field(form, "type").unwrap_or_default())
            .collect()
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }
}

pub fn field(form: &Form, name: &str) -> Option<String> {
    form.iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.clone())
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_form(&self, _url: &str, form: &Form) -> Result<Bytes, TransportError> {
        self.posts.lock().unwrap().push(form.clone());
        match self.post_responses.lock().unwrap().pop_front() {
            Some(Ok(body)) => Ok(Bytes::from(body)),
            Some(Err(reason)) => Err(TransportError::Unreachable(reason)),
            None => Err(TransportError::Unreachable("no scripted response".to_string())),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes, TransportError> {
        self.gets.lock().unwrap().push(url.to_string());
        match self.files.lock().unwrap().get(url) {
            Some(Ok(body)) => Ok(Bytes::from(body.clone())),
            Some(Err(reason)) => Err(TransportError::Unreachable(reason.clone())),
            None => Err(TransportError::Unreachable(format!("404 for {url}"))),
        }
    }
}

/// Sink that keeps every event for assertions
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<UiEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<(String, Tone)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Status { message, tone } => Some((message, tone)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &UiEvent) -> usize {
        self.events().iter().filter(|e| *e == wanted).count()
    }
}

impl PresentationSink for RecordingSink {
    fn status(&self, message: &str, tone: Tone) {
        self.events.lock().unwrap().push(UiEvent::Status {
            message: message.to_string(),
            tone,
        });
    }

    fn transition(&self) {
        self.events.lock().unwrap().push(UiEvent::Transition);
    }

    fn quit(&self) {
        self.events.lock().unwrap().push(UiEvent::Quit);
    }
}

/// Launcher that records spawns instead of starting processes
#[derive(Default)]
pub struct CountingLauncher {
    spawned: Mutex<Vec<(PathBuf, Vec<String>)>>,
    fail: bool,
}

impl CountingLauncher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn spawned(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.spawned.lock().unwrap().clone()
    }
}

impl Launcher for CountingLauncher {
    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<(), SpawnError> {
        self.spawned
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));
        if self.fail {
            return Err(SpawnError {
                program: program.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Ok(())
    }
}
