#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use courier_engine::SyncEngine;
use courier_persist::MemoryGateway;
use courier_reply::ReplyGenerator;
use courier_store::seed_chats;
use courier_types::{EngineConfig, EngineEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Semaphore};

/// Holds every reply until the test lets it through
pub struct GatedGenerator {
    reply: String,
    gate: Semaphore,
    calls: AtomicUsize,
}

impl GatedGenerator {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn release(&self, replies: usize) {
        self.gate.add_permits(replies);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReplyGenerator for GatedGenerator {
    async fn generate(&self, _input: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.acquire().await?.forget();
        Ok(self.reply.clone())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl ReplyGenerator for FailingGenerator {
    async fn generate(&self, _input: &str) -> Result<String> {
        bail!("model offline")
    }
}

/// Never answers
pub struct StalledGenerator;

#[async_trait]
impl ReplyGenerator for StalledGenerator {
    async fn generate(&self, _input: &str) -> Result<String> {
        std::future::pending().await
    }
}

pub fn engine_with(generator: Arc<dyn ReplyGenerator>) -> (SyncEngine, Arc<MemoryGateway>) {
    engine_with_config(generator, EngineConfig::default())
}

pub fn engine_with_config(
    generator: Arc<dyn ReplyGenerator>,
    config: EngineConfig,
) -> (SyncEngine, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new());
    let engine = SyncEngine::new(seed_chats(), gateway.clone(), generator, config);
    (engine, gateway)
}

/// Wait (bounded) for the next event matching `matches`
pub async fn next_event(
    events: &mut broadcast::Receiver<EngineEvent>,
    matches: impl Fn(&EngineEvent) -> bool,
) -> EngineEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.expect("event channel closed");
            if matches(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Everything already sitting in the channel
pub fn drain(events: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

pub async fn settle(engine: &SyncEngine) {
    tokio::time::timeout(Duration::from_secs(5), engine.wait_idle())
        .await
        .expect("replies never settled");
}
