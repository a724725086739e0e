#![allow(dead_code)]

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use metrics_adapter::collector::{CollectorResult, CommandRunner};
use metrics_adapter::config::{CollectorConfig, ConfigV1};
use metrics_adapter::routes::create_router;
use metrics_adapter::startup::build_state;
use metrics_adapter::state::AppState;

/// A canned collector outcome. `io::Error` is not `Clone`, so failures are
/// kept as kind + message and rebuilt on every run.
#[derive(Clone)]
pub enum Outcome {
    Finished(CollectorResult),
    Fails(io::ErrorKind, String),
}

/// A `CommandRunner` that never spawns anything.
pub struct StubRunner {
    outcome: Outcome,
    delay: Duration,
    pub runs: AtomicUsize,
}

impl StubRunner {
    pub fn new(outcome: Outcome) -> Self {
        StubRunner {
            outcome,
            delay: Duration::ZERO,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn completed(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self::new(Outcome::Finished(CollectorResult::completed(exit_code, stdout, stderr)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl CommandRunner for StubRunner {
    fn describe(&self) -> String {
        "stub".to_string()
    }

    async fn run(&self) -> io::Result<CollectorResult> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.outcome {
            Outcome::Finished(result) => Ok(result.clone()),
            Outcome::Fails(kind, message) => Err(io::Error::new(*kind, message.clone())),
        }
    }
}

pub fn app_with_runner(runner: Arc<dyn CommandRunner>) -> Router {
    create_router(AppState {
        config: Arc::new(ConfigV1::default()),
        collector: runner,
    })
}

/// Builds the production state around a real `<shell> <script>` collector.
pub fn app_with_script(shell: &str, script: &str, timeout_in_ms: u64) -> Router {
    create_router(state_with_script(shell, script, timeout_in_ms))
}

pub fn state_with_script(shell: &str, script: &str, timeout_in_ms: u64) -> AppState {
    let config = ConfigV1 {
        collector: CollectorConfig {
            shell: shell.to_string(),
            script: script.to_string(),
            timeout_in_ms,
        },
        ..ConfigV1::default()
    };
    build_state(Arc::new(config))
}

pub fn get(path: &str) -> Request<Body> {
    request(path, Method::GET)
}

pub fn request(path: &str, method: Method) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body")
        .to_vec()
}

/// True while `pid` exists and is not a zombie. Orphans killed with SIGKILL
/// may linger briefly, so this polls for up to a second.
pub async fn process_running(pid: &str) -> bool {
    let stat = PathBuf::from(format!("/proc/{}/stat", pid.trim()));
    for _ in 0..20 {
        let running = match std::fs::read_to_string(&stat) {
            Ok(content) => !matches!(
                content.rsplit(')').next().and_then(|rest| rest.trim_start().chars().next()),
                Some('Z') | Some('X')
            ),
            Err(_) => false,
        };
        if !running {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    true
}

/// A shell script in the temp dir, removed on drop.
pub struct TempScript(PathBuf);

impl TempScript {
    pub fn new(body: &str) -> Self {
        let path = std::env::temp_dir().join(format!("collector-{}.sh", uuid::Uuid::new_v4()));
        std::fs::write(&path, body).expect("failed to write test script");
        TempScript(path)
    }

    pub fn path(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl Drop for TempScript {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}
