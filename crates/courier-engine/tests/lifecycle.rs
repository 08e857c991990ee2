mod common;

use common::*;
use courier_engine::SyncEngine;
use courier_persist::{FileGateway, MemoryGateway, PersistenceGateway};
use courier_reply::{EchoReplyGenerator, ReplyGenerator};
use courier_types::{ChatId, ChatKind, EngineConfig, EngineEvent};
use std::sync::Arc;

fn id(raw: &str) -> ChatId {
    ChatId::from(raw)
}

fn echo() -> Arc<dyn ReplyGenerator> {
    Arc::new(EchoReplyGenerator::new())
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chats.json");

    let engine = SyncEngine::open(Arc::new(FileGateway::new(&path)), echo(), EngineConfig::default())
        .await
        .unwrap();
    let (carol, _) = engine.create_chat(ChatKind::Contact, "Carol").await.unwrap();
    engine.send(&carol, "see you at 5").await.unwrap();
    engine.mark_read(&id("2")).await.unwrap();
    engine.send(&id("1"), "remember me").await.unwrap();
    settle(&engine).await;
    let before = engine.snapshot();
    engine.shutdown().await;
    drop(engine);

    let reopened = SyncEngine::open(Arc::new(FileGateway::new(&path)), echo(), EngineConfig::default())
        .await
        .unwrap();
    let after = reopened.snapshot();

    assert_eq!(after.revision, 0);
    assert_eq!(after.chats.as_ref(), before.chats.as_ref());
    assert_eq!(after.chats.ids().next(), Some(&carol));
    assert_eq!(after.chat(&id("1")).unwrap().messages.len(), 3);
    assert_eq!(after.chat(&id("2")).unwrap().unread_count, 0);
}

#[tokio::test]
async fn test_unreadable_storage_falls_back_to_seed() {
    let gateway = Arc::new(MemoryGateway::with_blob("{ definitely not chats"));
    let engine = SyncEngine::open(gateway.clone(), echo(), EngineConfig::default())
        .await
        .unwrap();

    assert_eq!(engine.snapshot().chats.len(), 4);
    assert_eq!(gateway.save_count(), 0);
}

#[tokio::test]
async fn test_unreadable_storage_without_fallback() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.set_fail_loads(true);

    let config = EngineConfig::default().with_seed_fallback(false);
    let err = SyncEngine::open(gateway, echo(), config).await.unwrap_err();
    assert!(err.is_storage());
}

#[tokio::test]
async fn test_builder_requires_collaborators() {
    let missing_gateway = SyncEngine::builder().generator(echo()).build().await;
    assert!(missing_gateway.is_err());

    let gateway: Arc<dyn PersistenceGateway> = Arc::new(MemoryGateway::new());
    let missing_generator = SyncEngine::builder().gateway(gateway).build().await;
    assert!(missing_generator.is_err());
}

#[tokio::test]
async fn test_builder_loads_or_uses_initial_chats() {
    let engine = SyncEngine::builder()
        .gateway(Arc::new(MemoryGateway::new()))
        .generator(echo())
        .build()
        .await
        .unwrap();
    assert_eq!(engine.snapshot().chats.len(), 4);

    let engine = SyncEngine::builder()
        .gateway(Arc::new(MemoryGateway::new()))
        .generator(echo())
        .initial_chats(Default::default())
        .build()
        .await
        .unwrap();
    assert!(engine.snapshot().chats.is_empty());
}

#[tokio::test]
async fn test_wait_idle_without_pending_replies() {
    let (engine, _gateway) = engine_with(echo());
    settle(&engine).await;
}

#[tokio::test]
async fn test_shutdown_cancels_pending_replies() {
    let generator = GatedGenerator::new("never");
    let (engine, _gateway) = engine_with(generator.clone());
    let mut events = engine.events();

    engine.send(&id("1"), "hello").await.unwrap();
    assert!(engine.is_composing(&id("1")));

    engine.shutdown().await;
    assert!(!engine.is_composing(&id("1")));
    assert_eq!(engine.snapshot().chat(&id("1")).unwrap().messages.len(), 2);

    let failed = next_event(&mut events, |e| matches!(e, EngineEvent::ReplyFailed { .. })).await;
    assert_eq!(failed.chat_id(), Some(&id("1")));

    // sends still commit, but nothing is generated any more
    let receipt = engine.send(&id("1"), "anyone?").await.unwrap();
    assert!(!receipt.reply_pending);
    assert!(!engine.is_composing(&id("1")));
}

#[tokio::test]
async fn test_composing_watch_sees_transitions() {
    let generator = GatedGenerator::new("R");
    let (engine, _gateway) = engine_with(generator.clone());
    let mut composing = engine.subscribe_composing();

    engine.send(&id("2"), "status?").await.unwrap();
    composing.changed().await.unwrap();
    assert!(composing.borrow_and_update().is_composing(&id("2")));

    generator.release(1);
    let state = composing.wait_for(|state| state.is_idle()).await.unwrap().clone();
    assert!(state.is_idle());
}
