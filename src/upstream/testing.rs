//! Test doubles for the transport and metrics seams.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::metrics::MetricsSink;
use crate::models::Pokemon;
use crate::upstream::{RawResponse, Transport, TransportError};

type Reply = Result<RawResponse, TransportError>;

pub fn pikachu() -> Pokemon {
    Pokemon {
        name: "pikachu".to_string(),
        height: 4,
        weight: 60,
        base_experience: 112,
    }
}

/// Replays queued replies in order, then repeats the fallback forever.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn repeating(reply: Reply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::new([])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, _key: &str) -> Result<RawResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.replies.lock().unwrap().pop_front();
        next.or_else(|| self.fallback.clone())
            .expect("scripted transport ran out of replies")
    }
}

/// Never answers.
pub struct HangingTransport;

#[async_trait]
impl Transport for HangingTransport {
    async fn request(&self, _key: &str) -> Result<RawResponse, TransportError> {
        std::future::pending().await
    }
}

/// Keeps every recorded call for assertions.
#[derive(Default)]
pub struct RecordingSink {
    requests: Mutex<Vec<(String, String)>>,
    observations: AtomicUsize,
}

impl RecordingSink {
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, status: &str) -> usize {
        self.requests().iter().filter(|(_, s)| s == status).count()
    }

    pub fn observations(&self) -> usize {
        self.observations.load(Ordering::SeqCst)
    }
}

impl MetricsSink for RecordingSink {
    fn record_request(&self, target: &str, status: &str) {
        self.requests
            .lock()
            .unwrap()
            .push((target.to_string(), status.to_string()));
    }

    fn observe_duration(&self, _target: &str, _seconds: f64) {
        self.observations.fetch_add(1, Ordering::SeqCst);
    }
}
