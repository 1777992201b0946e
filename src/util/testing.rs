//! Test support: logging setup and a scripted `Fetcher`.

use std::collections::VecDeque;
use std::env;
use std::sync::{Mutex, MutexGuard, Once};

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::Fetcher;
use crate::infrastructure::{InfraError, InfraResult};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// A request seen by [`StubFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub verify: bool,
}

/// `Fetcher` answering from a queue of scripted results.
///
/// Every call is recorded. When the queue runs dry the stub answers with a
/// 404 status error.
#[derive(Debug, Default)]
pub struct StubFetcher {
    responses: Mutex<VecDeque<InfraResult<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, document: Value) -> Self {
        self.push_response(document);
        self
    }

    pub fn with_error(self, error: InfraError) -> Self {
        self.push_error(error);
        self
    }

    pub fn push_response(&self, document: Value) {
        locked(&self.responses).push_back(Ok(document));
    }

    pub fn push_error(&self, error: InfraError) {
        locked(&self.responses).push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        locked(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        locked(&self.requests).clone()
    }
}

impl Fetcher for StubFetcher {
    fn get_json(&self, url: &str, params: &[(String, String)], verify: bool) -> InfraResult<Value> {
        locked(&self.requests).push(RecordedRequest {
            url: url.to_string(),
            params: params.to_vec(),
            verify,
        });
        locked(&self.responses)
            .pop_front()
            .unwrap_or_else(|| {
                Err(InfraError::Status {
                    url: url.to_string(),
                    status: 404,
                    snippet: "no stub response".into(),
                })
            })
    }
}
