use courier_persist::{PersistError, PersistenceGateway};
use courier_reply::ReplyGenerator;
use courier_store::{self as store, ChatError, Result};
use courier_types::{Chat, ChatCollection, ChatId, ChatKind, EngineConfig, EngineEvent, Message, MessageId};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::builder::EngineBuilder;
use crate::composing::ComposingState;
use crate::snapshot::Snapshot;

/// Outcome of a successful [`SyncEngine::send`]
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub message_id: MessageId,
    /// First snapshot containing the sent message
    pub snapshot: Snapshot,
    /// An automated reply was scheduled
    pub reply_pending: bool,
}

/// What a commit step produced from the latest collection
struct Applied<T> {
    chats: ChatCollection,
    touched: Option<ChatId>,
    /// Prompt for an automated reply, scheduled once the result is published
    reply: Option<(ChatId, String)>,
    output: T,
}

impl<T> Applied<T> {
    fn chat(chats: ChatCollection, chat_id: &ChatId, output: T) -> Self {
        Self {
            chats,
            touched: Some(chat_id.clone()),
            reply: None,
            output,
        }
    }
}

struct EngineInner {
    snapshot: watch::Sender<Snapshot>,
    commit_lock: Arc<Mutex<()>>,
    gateway: Arc<dyn PersistenceGateway>,
    generator: Arc<dyn ReplyGenerator>,
    composing: watch::Sender<ComposingState>,
    events: broadcast::Sender<EngineEvent>,
    config: EngineConfig,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

/// Sole owner of the authoritative chat collection
///
/// Every mutation runs as one commit step: read the latest snapshot, apply a store
/// function, persist the result through the gateway, then publish it. Commits are
/// serialized, so no two mutations are ever based on the same snapshot, and nothing is
/// published unless the save succeeded.
///
/// Cloning is cheap and every clone drives the same engine.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

impl SyncEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Start from an already loaded collection
    pub fn new(
        chats: ChatCollection,
        gateway: Arc<dyn PersistenceGateway>,
        generator: Arc<dyn ReplyGenerator>,
        config: EngineConfig,
    ) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::initial(chats));
        let (composing, _) = watch::channel(ComposingState::default());
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            inner: Arc::new(EngineInner {
                snapshot,
                commit_lock: Arc::new(Mutex::new(())),
                gateway,
                generator,
                composing,
                events,
                config,
                cancel: CancellationToken::new(),
                tasks: TaskTracker::new(),
            }),
        }
    }

    /// Load the collection from `gateway` and start the engine on it
    ///
    /// With `fallback_to_seed` set, unreadable storage starts the engine on the seed chats
    /// instead of failing. The first commit then overwrites whatever the slot held.
    pub async fn open(
        gateway: Arc<dyn PersistenceGateway>,
        generator: Arc<dyn ReplyGenerator>,
        config: EngineConfig,
    ) -> Result<Self> {
        let chats = match store::load(gateway.as_ref()).await {
            Ok(chats) => chats,
            Err(e) if e.is_storage() && config.fallback_to_seed => {
                tracing::warn!(
                    "Failed to load chats from {}: {}. Starting from seed",
                    gateway.describe(),
                    e
                );
                store::seed_chats()
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            "Engine ready with {} chats (storage: {}, replies: {})",
            chats.len(),
            gateway.describe(),
            generator.name()
        );
        Ok(Self::new(chats, gateway, generator, config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Watch every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Watch which chats are waiting on an automated reply
    pub fn subscribe_composing(&self) -> watch::Receiver<ComposingState> {
        self.inner.composing.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<EngineEvent> {
        self.inner.events.subscribe()
    }

    pub fn is_composing(&self, chat_id: &ChatId) -> bool {
        self.inner.composing.borrow().is_composing(chat_id)
    }

    /// Chats in the latest snapshot whose name contains `query`
    pub fn search(&self, query: &str) -> ChatCollection {
        store::filter_by_query(&self.snapshot().chats, query)
    }

    /// Send `text` from the local user
    ///
    /// Returns once the message is persisted and published. If the chat is automated a
    /// reply is generated in the background and appended to the same chat later.
    pub async fn send(&self, chat_id: &ChatId, text: &str) -> Result<SendReceipt> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let message = Message::outgoing(text);
        let message_id = message.id.clone();
        let (snapshot, reply_pending) = self
            .commit(|chats| {
                let next = store::append_message(chats, chat_id, message)?;
                let automated = next.get(chat_id).is_some_and(|chat| chat.is_automated());
                let reply_pending = automated && !self.inner.cancel.is_cancelled();
                if automated && !reply_pending {
                    tracing::debug!("Engine is shutting down, skipping reply for chat {}", chat_id);
                }

                let mut applied = Applied::chat(next, chat_id, reply_pending);
                if reply_pending {
                    applied.reply = Some((chat_id.clone(), text.to_string()));
                }
                Ok(applied)
            })
            .await?;

        Ok(SendReceipt {
            message_id,
            snapshot,
            reply_pending,
        })
    }

    /// Append a message delivered by a remote contact; it stays unread until the chat is read
    pub async fn receive(&self, chat_id: &ChatId, text: &str) -> Result<Snapshot> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let message = Message::incoming(text);
        let (snapshot, ()) = self
            .commit(|chats| Ok(Applied::chat(store::append_message(chats, chat_id, message)?, chat_id, ())))
            .await?;
        Ok(snapshot)
    }

    pub async fn create_chat(&self, kind: ChatKind, name: &str) -> Result<(ChatId, Snapshot)> {
        let (snapshot, chat_id) = self
            .commit(|chats| {
                let (next, chat_id) = store::create_chat(chats, kind, name)?;
                Ok(Applied {
                    chats: next,
                    touched: Some(chat_id.clone()),
                    reply: None,
                    output: chat_id,
                })
            })
            .await?;

        tracing::info!("Created {} chat {} ({})", kind, chat_id, name.trim());
        Ok((chat_id, snapshot))
    }

    pub async fn mark_read(&self, chat_id: &ChatId) -> Result<Snapshot> {
        let (snapshot, ()) = self
            .commit(|chats| Ok(Applied::chat(store::mark_read(chats, chat_id)?, chat_id, ())))
            .await?;
        Ok(snapshot)
    }

    /// Open a chat: mark it read in the background
    pub fn select(&self, chat_id: &ChatId) -> JoinHandle<Result<Snapshot>> {
        let engine = self.clone();
        let chat_id = chat_id.clone();

        self.inner.tasks.spawn(async move {
            let result = engine.mark_read(&chat_id).await;
            if let Err(ref e) = result {
                tracing::error!("Failed to mark chat {} as read: {}", chat_id, e);
            }
            result
        })
    }

    pub async fn set_presence(&self, chat_id: &ChatId, online: bool) -> Result<Snapshot> {
        let (snapshot, ()) = self
            .commit(|chats| Ok(Applied::chat(store::set_presence(chats, chat_id, online)?, chat_id, ())))
            .await?;
        Ok(snapshot)
    }

    /// Apply an arbitrary collection-level change through the commit path
    ///
    /// `apply` sees the latest collection. Returning a collection that shares every chat
    /// with its input is a no-op: nothing is saved or published.
    pub async fn mutate<T, F>(&self, apply: F) -> Result<(Snapshot, T)>
    where
        F: FnOnce(&ChatCollection) -> Result<(ChatCollection, T)>,
    {
        self.commit(|chats| {
            let (chats, output) = apply(chats)?;
            Ok(Applied {
                chats,
                touched: None,
                reply: None,
                output,
            })
        })
        .await
    }

    /// Replace the whole collection, recomputing unread counters
    pub async fn replace_all(&self, chats: ChatCollection) -> Result<Snapshot> {
        let reconciled = ChatCollection::from_chats(chats.iter().map(|chat| {
            let mut chat = Chat::clone(chat);
            chat.reconcile_unread();
            chat
        }));

        let (snapshot, ()) = self.mutate(move |_| Ok((reconciled, ()))).await?;
        Ok(snapshot)
    }

    /// Resolves once no automated reply is pending
    pub async fn wait_idle(&self) {
        let mut composing = self.inner.composing.subscribe();
        // the sender lives as long as the engine, so this cannot fail
        let _ = composing.wait_for(ComposingState::is_idle).await;
    }

    /// Cancel outstanding replies and wait for their tasks to finish
    ///
    /// Messages sent afterwards are still committed but get no automated reply.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        tracing::info!("Engine stopped at revision {}", self.snapshot().revision);
    }

    async fn commit<T>(&self, apply: impl FnOnce(&ChatCollection) -> Result<Applied<T>>) -> Result<(Snapshot, T)> {
        let guard = self.inner.commit_lock.clone().lock_owned().await;

        let current = self.snapshot();
        let Applied {
            chats,
            touched,
            reply,
            output,
        } = apply(&*current.chats)?;

        if chats.shares_all(&current.chats) {
            tracing::debug!("Commit changed nothing, staying at revision {}", current.revision);
            return Ok((current, output));
        }
        if let Some(id) = chats.duplicate_id() {
            return Err(ChatError::DuplicateChat(id.clone()));
        }
        let blob = courier_persist::encode(&chats)?;

        // Once the save starts it must reach publish, even if the caller goes away.
        let engine = self.clone();
        let publish = self.inner.tasks.spawn(async move {
            let _guard = guard;
            engine.persist_and_publish(current, blob, chats, touched, reply).await
        });

        match publish.await {
            Ok(result) => result.map(|snapshot| (snapshot, output)),
            Err(e) => Err(PersistError::Unavailable(format!("commit task failed: {}", e)).into()),
        }
    }

    async fn persist_and_publish(
        &self,
        current: Snapshot,
        blob: String,
        chats: ChatCollection,
        touched: Option<ChatId>,
        reply: Option<(ChatId, String)>,
    ) -> Result<Snapshot> {
        if let Err(e) = self.inner.gateway.save(blob).await {
            tracing::warn!("Failed to persist revision {}: {}", current.revision + 1, e);
            return Err(e.into());
        }

        // watchers must never see the sent message without its indicator
        if let Some((chat_id, _)) = &reply {
            self.raise_composing(chat_id);
        }

        let snapshot = current.next(chats);
        self.inner.snapshot.send_replace(snapshot.clone());
        tracing::debug!("Published revision {}", snapshot.revision);

        self.emit(EngineEvent::SnapshotPublished {
            revision: snapshot.revision,
            chat_id: touched,
        });

        if let Some((chat_id, text)) = reply {
            self.spawn_reply(chat_id, text);
        }
        Ok(snapshot)
    }

    /// Generate a reply in the background; the composing indicator is already up
    fn spawn_reply(&self, chat_id: ChatId, text: String) {
        let engine = self.clone();

        self.inner.tasks.spawn(async move {
            match engine.run_reply(&chat_id, &text).await {
                Ok(message_id) => {
                    tracing::debug!("Reply {} appended to chat {}", message_id, chat_id);
                    engine.emit(EngineEvent::ReplyAppended {
                        chat_id: chat_id.clone(),
                        message_id,
                    });
                }
                Err(e) => {
                    tracing::warn!("Automated reply for chat {} failed: {}", chat_id, e);
                    engine.emit(EngineEvent::ReplyFailed {
                        chat_id: chat_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
            engine.lower_composing(&chat_id);
        });
    }

    /// Generate a reply and append it to whatever the chat looks like by then
    async fn run_reply(&self, chat_id: &ChatId, text: &str) -> Result<MessageId> {
        let timeout = self.inner.config.reply_timeout;
        let generation = tokio::time::timeout(timeout, self.inner.generator.generate(text));

        let reply = tokio::select! {
            _ = self.inner.cancel.cancelled() => {
                return Err(ChatError::ReplyGenerationFailed("engine shut down".to_string()));
            }
            outcome = generation => match outcome {
                Ok(Ok(reply)) => reply,
                Ok(Err(e)) => return Err(ChatError::ReplyGenerationFailed(format!("{:#}", e))),
                Err(_) => {
                    return Err(ChatError::ReplyGenerationFailed(format!("no reply within {:?}", timeout)));
                }
            },
        };

        if reply.trim().is_empty() {
            return Err(ChatError::ReplyGenerationFailed("generator returned an empty reply".to_string()));
        }

        let message = Message::automated(reply);
        let message_id = message.id.clone();
        self.commit(|chats| Ok(Applied::chat(store::append_message(chats, chat_id, message)?, chat_id, ())))
            .await?;
        Ok(message_id)
    }

    fn raise_composing(&self, chat_id: &ChatId) {
        self.inner.composing.send_modify(|state| {
            if state.raise(chat_id) {
                self.emit(EngineEvent::ComposingStarted {
                    chat_id: chat_id.clone(),
                });
            }
        });
    }

    fn lower_composing(&self, chat_id: &ChatId) {
        self.inner.composing.send_modify(|state| {
            if state.lower(chat_id) {
                self.emit(EngineEvent::ComposingFinished {
                    chat_id: chat_id.clone(),
                });
            }
        });
    }

    fn emit(&self, event: EngineEvent) {
        // no subscribers is fine
        let _ = self.inner.events.send(event);
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("revision", &self.snapshot().revision)
            .field("storage", &self.inner.gateway.describe())
            .field("replies", &self.inner.generator.name())
            .finish()
    }
}
