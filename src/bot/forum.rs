// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Document backend on a Discord forum channel.
//!
//! ```text
//! forum (discord.database_channel_id)
//!   ├── post "Settings"       messages: [Settings.json] [Settings.json] ...
//!   └── post "LevelVersions"  messages: [LevelVersions.json] ...
//!
//! load: newest 5 self messages with exactly one `<name>.json`, first valid JSON wins
//! save: new message with the JSON attached
//! ```

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tokio::sync::{Mutex, OnceCell};

use crate::error::{BotError, BotResult, StoreError};
use crate::logging::LogReason;
use crate::net::Downloader;
use crate::store::DocumentBackend;

/// Self messages considered per load.
pub const DATABASE_HISTORY_LIMIT: usize = 5;

/// Messages fetched per load; Discord caps a page at 100.
const FETCH_LIMIT: u8 = 100;

/// Starter content of a new post.
const ZERO_WIDTH_SPACE: &str = "\u{200B}";

/// Attachments of one stored message, reduced to what [`document_urls`] needs.
#[derive(Debug, Clone)]
pub struct PostedFiles<'a> {
    pub is_self: bool,
    /// `(filename, url)` pairs.
    pub attachments: Vec<(&'a str, &'a str)>,
}

/// Download candidates for `name`, newest first.
#[must_use]
pub fn document_urls<'a>(messages: &[PostedFiles<'a>], name: &str) -> Vec<&'a str> {
    let filename = format!("{name}.json");
    messages
        .iter()
        .filter(|message| message.is_self)
        .take(DATABASE_HISTORY_LIMIT)
        .filter_map(|message| match message.attachments.as_slice() {
            [(file, url)] if *file == filename => Some(*url),
            _ => None,
        })
        .collect()
}

fn backend_error(name: &str, error: impl Display) -> BotError {
    StoreError::Backend {
        name: name.to_string(),
        message: error.to_string(),
    }
    .into()
}

pub struct ForumBackend {
    http: Arc<serenity::Http>,
    forum: serenity::ChannelId,
    bot_id: OnceCell<serenity::UserId>,
    posts: Mutex<HashMap<String, serenity::ChannelId>>,
}

impl ForumBackend {
    #[must_use]
    pub fn new(http: Arc<serenity::Http>, forum_channel_id: u64) -> Self {
        Self {
            http,
            forum: serenity::ChannelId::new(forum_channel_id),
            bot_id: OnceCell::new(),
            posts: Mutex::new(HashMap::new()),
        }
    }

    async fn bot_id(&self) -> serenity::Result<serenity::UserId> {
        self.bot_id
            .get_or_try_init(|| async { Ok(self.http.get_current_user().await?.id) })
            .await
            .copied()
    }

    /// Thread of the post called `name`, created when missing.
    async fn post(&self, name: &str) -> serenity::Result<serenity::ChannelId> {
        let mut posts = self.posts.lock().await;
        if let Some(id) = posts.get(name) {
            return Ok(*id);
        }

        let id = match self.find_post(name).await? {
            Some(id) => id,
            None => self.create_post(name).await?,
        };
        posts.insert(name.to_string(), id);
        Ok(id)
    }

    async fn find_post(&self, name: &str) -> serenity::Result<Option<serenity::ChannelId>> {
        let channel = self.forum.to_channel(&self.http).await?;
        let Some(forum) = channel.guild() else {
            return Ok(None);
        };

        let active = forum.guild_id.get_active_threads(&self.http).await?;
        let archived = self
            .forum
            .get_archived_public_threads(&self.http, None, None)
            .await?;

        Ok(active
            .threads
            .iter()
            .filter(|thread| thread.parent_id == Some(self.forum))
            .chain(archived.threads.iter())
            .find(|thread| thread.name == name)
            .map(|thread| thread.id))
    }

    async fn create_post(&self, name: &str) -> serenity::Result<serenity::ChannelId> {
        let starter = serenity::CreateMessage::new().content(ZERO_WIDTH_SPACE);
        let thread = self
            .forum
            .create_forum_post(&self.http, serenity::CreateForumPost::new(name, starter))
            .await?;

        // the starter message shares the thread id
        let starter_id = serenity::MessageId::new(thread.id.get());
        if let Err(e) = thread.id.delete_message(&self.http, starter_id).await {
            tracing::debug!(reason = %LogReason::Store, document = name, error = %e, "Starter message kept");
        }
        tracing::info!(reason = %LogReason::Store, document = name, "Created database post");
        Ok(thread.id)
    }
}

#[async_trait]
impl DocumentBackend for ForumBackend {
    async fn load(&self, name: &str) -> BotResult<Option<String>> {
        let thread = self.post(name).await.map_err(|e| backend_error(name, e))?;
        let bot_id = self.bot_id().await.map_err(|e| backend_error(name, e))?;
        let messages = thread
            .messages(&self.http, serenity::GetMessages::new().limit(FETCH_LIMIT))
            .await
            .map_err(|e| backend_error(name, e))?;

        let posted: Vec<PostedFiles<'_>> = messages
            .iter()
            .map(|message| PostedFiles {
                is_self: message.author.id == bot_id,
                attachments: message
                    .attachments
                    .iter()
                    .map(|a| (a.filename.as_str(), a.url.as_str()))
                    .collect(),
            })
            .collect();

        for url in document_urls(&posted, name) {
            let text = Downloader::new().url(url).silent().download_string().await?;
            if serde_json::from_str::<serde_json::Value>(&text).is_ok() {
                return Ok(Some(text));
            }
            tracing::warn!(reason = %LogReason::Store, document = name, "Skipping invalid JSON");
        }
        Ok(None)
    }

    async fn save(&self, name: &str, json: &str) -> BotResult<()> {
        let thread = self.post(name).await.map_err(|e| backend_error(name, e))?;
        let file = serenity::CreateAttachment::bytes(json.as_bytes().to_vec(), format!("{name}.json"));
        thread
            .send_message(&self.http, serenity::CreateMessage::new().add_file(file))
            .await
            .map_err(|e| backend_error(name, e))?;
        Ok(())
    }
}
