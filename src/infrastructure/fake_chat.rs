use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::application::{AppError, AppResult, ChatClient};
use crate::domain::{Profile, UserId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Direct(UserId, String),
    Channel(String, String),
}

/// In-memory chat platform: a fixed member list plus a record of every
/// message that was delivered.
#[derive(Default)]
pub struct FakeChatClient {
    members: Vec<Profile>,
    unknown_users: HashSet<UserId>,
    blocked_dms: HashSet<UserId>,
    channels: Option<HashSet<String>>,
    lookup_error: Option<String>,
    sent: Mutex<Vec<Sent>>,
    fetches: Mutex<HashMap<UserId, u32>>,
}

impl FakeChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, id: u64, name: &str) -> Self {
        self.members.push(Profile::new(UserId::new(id), name));
        self
    }

    /// `fetch_user` fails for this id.
    pub fn with_unknown_user(mut self, id: u64) -> Self {
        self.unknown_users.insert(UserId::new(id));
        self
    }

    /// DMs to this id fail.
    pub fn with_blocked_dms(mut self, id: u64) -> Self {
        self.blocked_dms.insert(UserId::new(id));
        self
    }

    /// Restrict the existing channels; by default every name exists.
    pub fn with_channels(mut self, names: &[&str]) -> Self {
        self.channels = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Every member lookup fails with this error.
    pub fn with_failing_lookup(mut self, error: &str) -> Self {
        self.lookup_error = Some(error.to_string());
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn direct_messages_to(&self, id: u64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Direct(to, text) if to.get() == id => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn channel_messages(&self, channel: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Channel(name, text) if name == channel => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn fetch_count(&self, id: u64) -> u32 {
        self.fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&UserId::new(id))
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, sent: Sent) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sent);
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn send_direct_message(&self, user: UserId, text: &str) -> AppResult<()> {
        if self.blocked_dms.contains(&user) {
            return Err(AppError::Chat(format!("cannot send messages to user {user}")));
        }
        self.record(Sent::Direct(user, text.to_string()));
        Ok(())
    }

    async fn send_channel_message(&self, channel: &str, text: &str) -> AppResult<()> {
        if let Some(known) = &self.channels {
            if !known.contains(channel) {
                return Err(AppError::NotFound(format!("channel #{channel}")));
            }
        }
        self.record(Sent::Channel(channel.to_string(), text.to_string()));
        Ok(())
    }

    async fn fetch_user(&self, user: UserId) -> AppResult<Profile> {
        *self
            .fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user)
            .or_default() += 1;

        if self.unknown_users.contains(&user) {
            return Err(AppError::Chat(format!("unknown user {user}")));
        }
        Ok(self
            .members
            .iter()
            .find(|m| m.id == user)
            .cloned()
            .unwrap_or_else(|| Profile::new(user, format!("user{user}"))))
    }

    async fn lookup_member_by_name(&self, name: &str) -> AppResult<Option<Profile>> {
        if let Some(e) = &self.lookup_error {
            return Err(AppError::Chat(e.clone()));
        }
        Ok(self.members.iter().find(|m| m.name == name).cloned())
    }
}
