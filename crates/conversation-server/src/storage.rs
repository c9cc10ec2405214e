use std::path::{Path, PathBuf};

use conversation_core::Conversation;
use tokio::fs;
use uuid::Uuid;

/// Persistence for whole conversation trees
#[async_trait::async_trait]
pub trait ConversationStorage: Send + Sync {
    async fn save_conversation(&self, conversation: &Conversation) -> std::io::Result<()>;
    async fn load_conversation(&self, id: Uuid) -> std::io::Result<Option<Conversation>>;
    async fn load_all(&self) -> std::io::Result<Vec<Conversation>>;
    async fn delete_conversation(&self, id: Uuid) -> std::io::Result<bool>;
}

/// One `<id>.json` document per conversation
#[derive(Debug, Clone)]
pub struct JsonStorage {
    base_path: PathBuf,
}

impl JsonStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub async fn init(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.base_path).await
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn conversation_path(&self, id: Uuid) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }
}

#[async_trait::async_trait]
impl ConversationStorage for JsonStorage {
    async fn save_conversation(&self, conversation: &Conversation) -> std::io::Result<()> {
        let path = self.conversation_path(conversation.id);
        let json = serde_json::to_string_pretty(conversation)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await
    }

    async fn load_conversation(&self, id: Uuid) -> std::io::Result<Option<Conversation>> {
        let path = self.conversation_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).await?;
        let conversation = serde_json::from_str(&content)?;
        Ok(Some(conversation))
    }

    async fn load_all(&self) -> std::io::Result<Vec<Conversation>> {
        let mut conversations = Vec::new();
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(conversations)
            }
            Err(error) => return Err(error),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(error) => {
                    log::warn!("Skipping unreadable conversation file {:?}: {}", path, error);
                    continue;
                }
            };
            match serde_json::from_str::<Conversation>(&content) {
                Ok(conversation) => conversations.push(conversation),
                Err(error) => {
                    log::warn!("Skipping unreadable conversation file {:?}: {}", path, error);
                }
            }
        }

        Ok(conversations)
    }

    async fn delete_conversation(&self, id: Uuid) -> std::io::Result<bool> {
        match fs::remove_file(self.conversation_path(id)).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error),
        }
    }
}
