use anyhow::{anyhow, Result};
use courier_engine::SyncEngine;
use courier_types::ChatId;

use crate::commands::{Command, HELP};
use crate::render;

/// What the input loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Terminal state on top of an engine: which chat is open
pub struct Session {
    engine: SyncEngine,
    open: Option<ChatId>,
}

impl Session {
    pub fn new(engine: SyncEngine) -> Self {
        Self { engine, open: None }
    }

    pub fn open_chat(&self) -> Option<&ChatId> {
        self.open.as_ref()
    }

    /// Run one command; failures become an `error:` line instead of ending the session
    pub async fn handle(&mut self, command: Command) -> Flow {
        match self.execute(command).await {
            Ok(flow) => flow,
            Err(e) => Flow::Continue(format!("error: {}", e)),
        }
    }

    async fn execute(&mut self, command: Command) -> Result<Flow> {
        let output = match command {
            Command::List => {
                let composing = self.engine.subscribe_composing().borrow().clone();
                render::chat_list(&self.engine.snapshot().chats, &composing)
            }
            Command::Open(chat_id) => {
                let snapshot = self.engine.select(&chat_id).await??;
                let chat = snapshot
                    .chat(&chat_id)
                    .ok_or_else(|| anyhow!("chat {} disappeared", chat_id))?;
                let view = render::chat_view(chat);
                self.open = Some(chat_id);
                view
            }
            Command::New { kind, name } => {
                let (chat_id, _) = self.engine.create_chat(kind, &name).await?;
                let output = format!("created [{}] {}; it is now open", chat_id, name.trim());
                self.open = Some(chat_id);
                output
            }
            Command::Search(query) => {
                let found = self.engine.search(&query);
                if found.is_empty() {
                    format!("no chat matches {:?}", query)
                } else {
                    let composing = self.engine.subscribe_composing().borrow().clone();
                    render::chat_list(&found, &composing)
                }
            }
            Command::Read(chat_id) => {
                self.engine.mark_read(&chat_id).await?;
                format!("[{}] marked read", chat_id)
            }
            Command::Receive { chat_id, text } => {
                let snapshot = self.engine.receive(&chat_id, &text).await?;
                let unread = snapshot.chat(&chat_id).map(|c| c.unread_count).unwrap_or_default();
                format!("[{}] new message ({} unread)", chat_id, unread)
            }
            Command::Presence { chat_id, online } => {
                self.engine.set_presence(&chat_id, online).await?;
                format!("[{}] is now {}", chat_id, if online { "online" } else { "offline" })
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Flow::Quit),
            Command::Say(text) => {
                let chat_id = self
                    .open
                    .clone()
                    .ok_or_else(|| anyhow!("no chat is open; use /open <id> first"))?;
                let receipt = self.engine.send(&chat_id, &text).await?;
                if receipt.reply_pending {
                    format!("[{}] sent, waiting for a reply", chat_id)
                } else {
                    format!("[{}] sent", chat_id)
                }
            }
        };
        Ok(Flow::Continue(output))
    }
}
