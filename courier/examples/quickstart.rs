use courier::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let engine = CourierBuilder::new()
        .memory()
        .canned_replies(Duration::from_millis(300))
        .build()
        .await?;

    let mut events = engine.events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let EngineEvent::ComposingStarted { chat_id } = event {
                println!("[{}] is typing...", chat_id);
            }
        }
    });

    let assistant = ChatId::from("1");
    engine.send(&assistant, "What can you do?").await?;
    engine.wait_idle().await;

    let snapshot = engine.snapshot();
    if let Some(chat) = snapshot.chat(&assistant) {
        for message in &chat.messages {
            let author = if message.origin == Origin::LocalUser { "you" } else { chat.name.as_str() };
            println!("{}: {}", author, message.body);
        }
    }

    let (carol, _) = engine.create_chat(ChatKind::Contact, "Carol").await?;
    engine.receive(&carol, "Hi! Long time no see.").await?;
    println!("unread from Carol: {}", engine.snapshot().chat(&carol).map(|c| c.unread_count).unwrap_or(0));

    engine.shutdown().await;
    Ok(())
}
