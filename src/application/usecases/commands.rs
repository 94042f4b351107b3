use crate::application::usecases::{ResolveWatchersUseCase, dm_all};
use crate::application::{AppResult, ChatClient, WatcherRepository};
use crate::domain::{Profile, UserId, render_watch_list};

const DEFAULT_BROADCAST: &str = "test DM to all watchers";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Watch(Vec<String>),
    Stop(Vec<String>),
    WatchList,
    Broadcast(Option<String>),
    Id(Option<String>),
}

/// Who issued a command, and where.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub author: Profile,
    /// Sent as a direct message rather than in a guild channel.
    pub direct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
    /// Also post the reply to the broadcast channel.
    pub mirror_to_channel: bool,
}

enum Target {
    Found { id: UserId, label: String },
    Failed(String),
}

pub struct CommandUseCase<'a> {
    pub registry: &'a dyn WatcherRepository,
    pub chat: &'a dyn ChatClient,
}

impl<'a> CommandUseCase<'a> {
    pub async fn execute(&self, inv: &Invocation, command: Command) -> AppResult<CommandReply> {
        tracing::debug!(author = %inv.author.name, ?command, "handling command");
        match command {
            Command::Watch(args) => self.watch(inv, &args).await,
            Command::Stop(args) => self.stop(inv, &args).await,
            Command::WatchList => self.watchlist(inv),
            Command::Broadcast(message) => {
                self.broadcast(message.as_deref().unwrap_or(DEFAULT_BROADCAST))
                    .await
            }
            Command::Id(username) => self.id(inv, username.as_deref()).await,
        }
    }

    pub async fn watch(&self, inv: &Invocation, args: &[String]) -> AppResult<CommandReply> {
        let resolver = ResolveWatchersUseCase {
            registry: self.registry,
            chat: self.chat,
        };
        let mut lines = String::new();

        for token in self.tokens_or_author(inv, args) {
            let (id, label) = match self.resolve_target(&token).await {
                Target::Found { id, label } => (id, label),
                Target::Failed(line) => {
                    lines.push_str(&line);
                    continue;
                }
            };

            let (_, created) = self.registry.add(id)?;
            if !created {
                lines.push_str(&format!("User `{label}` is already on the watch list\n"));
                continue;
            }

            resolver.resolve_one(id).await?;
            let name = self
                .registry
                .get(id)?
                .map(|w| w.label())
                .unwrap_or(label);

            lines.push_str(&format!("Added `{name}` to the watch list\n"));
            let mut dm = String::from("You have been added to the watch list");
            if id != inv.author.id {
                lines.push_str(&format!("(requested by `{}`)\n", inv.author.name));
                dm.push_str(&format!(" by `{}`", inv.author.name));
            }
            tracing::info!(user_id = %id, "added to watch list");

            if let Err(e) = self.chat.send_direct_message(id, &dm).await {
                tracing::warn!(user_id = %id, "failed to send watch confirmation: {e}");
            }
        }

        self.reply_with_list(inv, lines)
    }

    pub async fn stop(&self, inv: &Invocation, args: &[String]) -> AppResult<CommandReply> {
        let mut lines = String::new();

        for token in self.tokens_or_author(inv, args) {
            let (id, label) = match self.resolve_target(&token).await {
                Target::Found { id, label } => (id, label),
                Target::Failed(line) => {
                    lines.push_str(&line);
                    continue;
                }
            };

            let Some(removed) = self.registry.remove(id)? else {
                lines.push_str(&format!("User `{label}` is not on the watch list\n"));
                continue;
            };

            lines.push_str(&format!("Removed `{}` from the watch list\n", removed.label()));
            let mut dm = String::from("You have been removed from the watch list");
            if id != inv.author.id {
                lines.push_str(&format!("(requested by `{}`)\n", inv.author.name));
                dm.push_str(&format!(" by `{}`", inv.author.name));
            }
            tracing::info!(user_id = %id, "removed from watch list");

            if let Err(e) = self.chat.send_direct_message(id, &dm).await {
                tracing::warn!(user_id = %id, "failed to send removal notice: {e}");
            }
        }

        self.reply_with_list(inv, lines)
    }

    pub fn watchlist(&self, inv: &Invocation) -> AppResult<CommandReply> {
        self.reply_with_list(inv, String::new())
    }

    /// DM every watcher; the broadcast channel is left alone.
    pub async fn broadcast(&self, message: &str) -> AppResult<CommandReply> {
        let watchers = self.registry.list()?;
        if watchers.is_empty() {
            return Ok(CommandReply {
                text: "No current users watching".to_string(),
                mirror_to_channel: false,
            });
        }

        let report = dm_all(self.chat, &watchers, message).await;
        let mut text = format!("Broadcast sent to {} watcher(s)", report.delivered);
        if report.failed + report.skipped > 0 {
            text.push_str(&format!(
                " ({} failed, {} unresolved)",
                report.failed, report.skipped
            ));
        }
        Ok(CommandReply {
            text,
            mirror_to_channel: false,
        })
    }

    pub async fn id(&self, inv: &Invocation, username: Option<&str>) -> AppResult<CommandReply> {
        let text = match username {
            None => format!("`{}`'s user ID is:\n`{}`", inv.author.name, inv.author.id),
            Some(name) => match self.chat.lookup_member_by_name(name).await {
                Ok(Some(member)) => format!("`{name}`'s user ID is:\n`{}`", member.id),
                Ok(None) => {
                    tracing::warn!(username = name, "no member with that name");
                    format!("Unable to acquire user ID for `{name}`")
                }
                Err(e) => {
                    tracing::warn!(username = name, "member lookup failed: {e}");
                    format!("Unable to acquire user ID for `{name}`")
                }
            },
        };
        Ok(CommandReply {
            text,
            mirror_to_channel: false,
        })
    }

    fn tokens_or_author(&self, inv: &Invocation, args: &[String]) -> Vec<String> {
        if args.is_empty() {
            vec![inv.author.id.to_string()]
        } else {
            args.to_vec()
        }
    }

    /// Ids are taken as-is; anything else is looked up as a username.
    async fn resolve_target(&self, token: &str) -> Target {
        if UserId::looks_numeric(token) {
            return match token.parse::<UserId>() {
                Ok(id) => Target::Found {
                    id,
                    label: token.to_string(),
                },
                Err(e) => {
                    tracing::warn!(token, "rejected user id: {e}");
                    Target::Failed(format!("`{token}` is not a valid user ID\n"))
                }
            };
        }

        match self.chat.lookup_member_by_name(token).await {
            Ok(Some(member)) => Target::Found {
                id: member.id,
                label: token.to_string(),
            },
            Ok(None) => {
                tracing::warn!(username = token, "unable to get user ID for username");
                Target::Failed(format!("Unable to acquire user ID for `{token}`\n"))
            }
            Err(e) => {
                tracing::warn!(username = token, "member lookup failed: {e}");
                Target::Failed(format!("Unable to acquire user ID for `{token}`\n"))
            }
        }
    }

    fn reply_with_list(&self, inv: &Invocation, mut lines: String) -> AppResult<CommandReply> {
        let watchers = self.registry.list()?;
        lines.push_str(&render_watch_list(&watchers));
        tracing::info!("{lines}");
        Ok(CommandReply {
            text: lines,
            mirror_to_channel: inv.direct,
        })
    }
}
