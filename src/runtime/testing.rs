//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::{ClientError, RiddleClient};
use crate::backend::{BackendError, RiddleBackend};
use crate::session::{AnswerResponse, RiddleResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock Backend
// ============================================================================

/// A recorded upstream request
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Get(String),
    Post(String, Value),
}

/// Backend that replays queued results, in order, for either operation
#[allow(dead_code)]
pub struct MockBackend {
    results: Mutex<VecDeque<Result<Value, BackendError>>>,
    calls: Mutex<Vec<BackendCall>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn queue(&self, result: Result<Value, BackendError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self) -> Result<Value, BackendError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::network("No mock response queued")))
    }
}

#[async_trait]
impl RiddleBackend for MockBackend {
    async fn get_riddle(&self, id: &str) -> Result<Value, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::Get(id.to_string()));
        self.next()
    }

    async fn post_answer(&self, id: &str, body: &Value) -> Result<Value, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::Post(id.to_string(), body.clone()));
        self.next()
    }
}

// ============================================================================
// Mock Riddle Client
// ============================================================================

/// A recorded client request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Fetch(u32),
    Submit(u32, String),
}

/// Riddle client with separately queued riddle and answer replies
#[allow(dead_code)]
pub struct MockRiddleClient {
    riddles: Mutex<VecDeque<Result<RiddleResponse, ClientError>>>,
    answers: Mutex<VecDeque<Result<AnswerResponse, ClientError>>>,
    calls: Mutex<Vec<ClientCall>>,
    /// Simulated round-trip time
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl MockRiddleClient {
    pub fn new() -> Self {
        Self {
            riddles: Mutex::new(VecDeque::new()),
            answers: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_riddle(&self, response: RiddleResponse) {
        self.riddles.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_answer(&self, response: AnswerResponse) {
        self.answers.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_riddle_error(&self, error: ClientError) {
        self.riddles.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_answer_error(&self, error: ClientError) {
        self.answers.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RiddleClient for MockRiddleClient {
    async fn fetch_riddle(&self, riddle_id: u32) -> Result<RiddleResponse, ClientError> {
        self.calls.lock().unwrap().push(ClientCall::Fetch(riddle_id));
        self.wait().await;
        self.riddles
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Malformed("No mock riddle queued".to_string())))
    }

    async fn submit_answer(
        &self,
        riddle_id: u32,
        answer: &str,
    ) -> Result<AnswerResponse, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(ClientCall::Submit(riddle_id, answer.to_string()));
        self.wait().await;
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Malformed("No mock answer queued".to_string())))
    }
}
