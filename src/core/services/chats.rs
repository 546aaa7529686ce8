//! Chat histories between a student and a stakeholder.

use crate::core::error::ServiceError;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{ChatHistory, ChatMessage, NewChatHistory, NewChatMessage};
use crate::infrastructure::repositories::{Filter, Repository};
use di::{Ref, inject, injectable};
use log::info;

pub struct ChatsService {
    histories: Repository<ChatHistory>,
    messages: Repository<ChatMessage>,
}

#[injectable]
impl ChatsService {
    #[inject]
    pub fn create(connection: Ref<DatabaseConnection>) -> ChatsService {
        let histories = Repository::<ChatHistory>::new(connection.pool().clone());
        ChatsService {
            messages: histories.sibling(),
            histories,
        }
    }
}

impl ChatsService {
    pub fn new(histories: Repository<ChatHistory>, messages: Repository<ChatMessage>) -> ChatsService {
        ChatsService {
            histories,
            messages,
        }
    }

    /// The stakeholder's active chat history, created on demand when `create` is set.
    pub async fn get_history_for_stakeholder(
        &self,
        stakeholder_id: i64,
        create: bool,
    ) -> Result<Option<ChatHistory>, ServiceError> {
        let existing = self
            .histories
            .list(Filter::new().eq("stakeholder_id", stakeholder_id))
            .await?
            .into_iter()
            .next();

        match existing {
            Some(history) => Ok(Some(history)),
            None if create => Ok(Some(
                self.histories.create(NewChatHistory { stakeholder_id }).await?,
            )),
            None => Ok(None),
        }
    }

    /// Appends a message; the history must be active.
    pub async fn append_message(
        &self,
        history_id: i64,
        sent_by: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<ChatMessage, ServiceError> {
        if self.histories.get(history_id).await?.is_none() {
            return Err(ServiceError::not_found("chat history", history_id));
        }

        Ok(self
            .messages
            .create(NewChatMessage {
                chat_history_id: history_id,
                sent_by: sent_by.into(),
                message: message.into(),
            })
            .await?)
    }

    /// Active messages of the history, in the order they were sent.
    pub async fn list_messages(&self, history_id: i64) -> Result<Vec<ChatMessage>, ServiceError> {
        let mut messages = self
            .messages
            .list(Filter::new().eq("chat_history_id", history_id))
            .await?;
        messages.sort_by_key(|message| (message.sent_at, message.id));
        Ok(messages)
    }

    pub async fn get_last_message(
        &self,
        history_id: i64,
    ) -> Result<Option<ChatMessage>, ServiceError> {
        Ok(self.list_messages(history_id).await?.pop())
    }

    /// Soft-deletes every active message of the history, one at a time.
    ///
    /// Returns how many messages this call deleted.
    pub async fn clear_history(&self, history_id: i64) -> Result<usize, ServiceError> {
        let mut cleared = 0;
        for message in self.list_messages(history_id).await? {
            if self.messages.delete(message.id).await?.is_some() {
                cleared += 1;
            }
        }
        info!("cleared {cleared} messages of chat history {history_id}");
        Ok(cleared)
    }

    /// Soft-deletes the history after all of its messages.
    pub async fn delete_history(
        &self,
        history_id: i64,
    ) -> Result<Option<ChatHistory>, ServiceError> {
        if self.histories.get(history_id).await?.is_none() {
            return Ok(None);
        }
        self.clear_history(history_id).await?;
        Ok(self.histories.delete(history_id).await?)
    }

    /// Restores the history only; its messages keep their own deletion state.
    pub async fn restore_history(
        &self,
        history_id: i64,
    ) -> Result<Option<ChatHistory>, ServiceError> {
        Ok(self.histories.restore(history_id).await?)
    }

    pub async fn restore_message(
        &self,
        message_id: i64,
    ) -> Result<Option<ChatMessage>, ServiceError> {
        Ok(self.messages.restore(message_id).await?)
    }
}
