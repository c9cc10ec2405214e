use std::collections::HashMap;
use std::sync::Arc;

use conversation_core::{Conversation, ConversationError};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::{GenerationConfig, ServerConfig};
use crate::error::{AppError, Result};
use crate::storage::{ConversationStorage, JsonStorage};

pub struct AppState {
    pub conversations: Arc<RwLock<HashMap<Uuid, Conversation>>>,
    pub storage: Arc<dyn ConversationStorage>,
    pub generation: GenerationConfig,
}

impl AppState {
    /// Build the state on top of `storage`, loading every stored conversation.
    pub async fn with_storage(
        storage: Arc<dyn ConversationStorage>,
        generation: GenerationConfig,
    ) -> std::io::Result<Self> {
        let loaded = storage.load_all().await?;
        log::info!("Loaded {} conversations from storage", loaded.len());

        let conversations = loaded.into_iter().map(|c| (c.id, c)).collect();
        Ok(Self {
            conversations: Arc::new(RwLock::new(conversations)),
            storage,
            generation,
        })
    }

    pub async fn new_with_config(config: &ServerConfig) -> std::io::Result<Self> {
        log::info!("Initializing storage at: {:?}", config.data_dir);
        let storage = JsonStorage::new(&config.data_dir);
        if let Err(e) = storage.init().await {
            log::error!(
                "Failed to init storage at {:?}: {}",
                storage.base_path(),
                e
            );
            return Err(e);
        }

        Self::with_storage(Arc::new(storage), config.generation.clone()).await
    }

    /// Snapshot of a live (not soft-deleted) conversation.
    ///
    /// Conversations missing from memory are looked up in storage and
    /// cached on success.
    pub async fn conversation(&self, id: Uuid) -> Result<Conversation> {
        {
            let conversations = self.conversations.read().await;
            if let Some(conversation) = conversations.get(&id) {
                return live(conversation, id).cloned();
            }
        }

        let mut conversations = self.conversations.write().await;
        self.load_missing(&mut conversations, id).await?;
        conversations
            .get(&id)
            .ok_or_else(|| AppError::from(ConversationError::ConversationNotFound(id)))
            .and_then(|c| live(c, id))
            .cloned()
    }

    async fn load_missing(
        &self,
        conversations: &mut HashMap<Uuid, Conversation>,
        id: Uuid,
    ) -> Result<()> {
        if conversations.contains_key(&id) {
            return Ok(());
        }
        match self.storage.load_conversation(id).await {
            Ok(Some(conversation)) => {
                log::debug!("[{}] Conversation loaded from storage", id);
                conversations.insert(id, conversation);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                log::error!("[{}] Failed to load conversation: {}", id, e);
                Err(AppError::from(e))
            }
        }
    }

    /// Every live conversation, most recently created first.
    pub async fn live_conversations(&self) -> Vec<Conversation> {
        let conversations = self.conversations.read().await;
        let mut live: Vec<Conversation> = conversations
            .values()
            .filter(|c| !c.is_deleted())
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        live
    }

    /// Apply `mutation` to a live conversation and persist the result.
    ///
    /// The write lock is held for the whole call, so mutations on the
    /// same process never interleave. The mutation runs on a copy which only
    /// replaces the cached conversation once storage accepted it.
    pub async fn update<T, F>(&self, id: Uuid, mutation: F) -> Result<T>
    where
        F: FnOnce(&mut Conversation) -> conversation_core::Result<T>,
    {
        let mut conversations = self.conversations.write().await;
        self.load_missing(&mut conversations, id).await?;
        let current = conversations
            .get(&id)
            .ok_or_else(|| AppError::from(ConversationError::ConversationNotFound(id)))
            .and_then(|c| live(c, id))?;

        let mut updated = current.clone();
        let output = mutation(&mut updated)?;

        if let Err(e) = self.storage.save_conversation(&updated).await {
            log::error!("[{}] Failed to save conversation: {}", id, e);
            return Err(AppError::from(e));
        }
        conversations.insert(id, updated);
        Ok(output)
    }

    pub async fn insert(&self, conversation: Conversation) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        if let Err(e) = self.storage.save_conversation(&conversation).await {
            log::error!("[{}] Failed to save conversation: {}", conversation.id, e);
            return Err(AppError::from(e));
        }
        conversations.insert(conversation.id, conversation);
        Ok(())
    }

    /// Remove a conversation and its whole version tree.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        self.load_missing(&mut conversations, id).await?;
        if !conversations.get(&id).is_some_and(|c| !c.is_deleted()) {
            return Err(ConversationError::ConversationNotFound(id).into());
        }

        if let Err(e) = self.storage.delete_conversation(id).await {
            log::error!("[{}] Failed to delete conversation from storage: {}", id, e);
            return Err(AppError::from(e));
        }
        conversations.remove(&id);
        Ok(())
    }
}

fn live(conversation: &Conversation, id: Uuid) -> Result<&Conversation> {
    if conversation.is_deleted() {
        return Err(ConversationError::ConversationNotFound(id).into());
    }
    Ok(conversation)
}
