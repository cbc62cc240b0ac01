//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use blogsmith::generate::{BlogProvider, GenerateError, GenerationClient};
use blogsmith::storage::Database;
use blogsmith::workflow::{AppContext, BlogWorkflow};

/// Provider that echoes the prompt's title back and fails on chosen titles.
#[derive(Default)]
pub struct ScriptedProvider {
    failing: Mutex<HashSet<String>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every prompt mentioning `title` fail with an HTTP 500.
    pub fn fail_on(&self, title: &str) {
        self.failing.lock().unwrap().insert(title.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BlogProvider for ScriptedProvider {
    fn model(&self) -> &str {
        "scripted"
    }

    fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let failing = self.failing.lock().unwrap();
        if failing.iter().any(|title| prompt.contains(&format!("Topic: {title}\n"))) {
            return Err(GenerateError::HttpError {
                status: 500,
                body: "upstream exploded".to_string(),
            });
        }
        Ok(format!("  Article number {call}.\r\n\r\n{prompt}  "))
    }
}

/// Workflow over an in-memory store and the given provider.
pub fn workflow_with(provider: Arc<ScriptedProvider>) -> BlogWorkflow {
    let db = Database::open_in_memory().unwrap();
    let client = GenerationClient::new(provider, Duration::from_secs(5));
    BlogWorkflow::new(AppContext::new(db, Ok(client)))
}

/// Workflow with generation unavailable.
pub fn workflow_without_generator() -> BlogWorkflow {
    let db = Database::open_in_memory().unwrap();
    BlogWorkflow::new(AppContext::new(db, Err(GenerateError::NotConfigured)))
}
