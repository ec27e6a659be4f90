//! Operator `/command` messages.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracer_core::{
    Event, EventKind, Handler, HandlerError, HandlerResponse, MessagingGateway, PresenceGateway,
    Result, SendOptions, TrackedTarget, WatchList,
};
use tracing::{debug, error, info, instrument, warn};

use crate::fan_out::ReplyFanOut;
use crate::replies;

/// Operator command, dispatched on the leading whitespace-separated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Add(Vec<String>),
    Remove(Vec<String>),
    Clear,
    List,
    Unknown(String),
}

impl Command {
    /// Parses message text. The leading token is case-sensitive; menu-button labels map to
    /// `/list` and `/clear`. Blank text (stickers, photos) is an unknown command with an
    /// empty token.
    pub fn parse(text: &str) -> Self {
        let mut tokens = text.split_whitespace();
        let head = tokens.next().unwrap_or_default();
        let args: Vec<String> = tokens.map(str::to_string).collect();
        match head {
            "/start" => Command::Start,
            "/add" => Command::Add(args),
            "/remove" => Command::Remove(args),
            "/clear" | replies::MENU_CLEAR_ALIAS => Command::Clear,
            "/list" | replies::MENU_LIST_ALIAS => Command::List,
            other => Command::Unknown(other.to_string()),
        }
    }

    /// Rejects an empty argument list.
    fn require_args(args: &[String]) -> std::result::Result<(), HandlerError> {
        if args.is_empty() {
            Err(HandlerError::NoArguments)
        } else {
            Ok(())
        }
    }
}

/// Keeps the first occurrence of every argument, in operator order.
fn dedupe(args: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    args.iter()
        .filter(|a| seen.insert(a.as_str()))
        .cloned()
        .collect()
}

/// Handles `/start`, `/add`, `/remove`, `/clear`, `/list` and unknown commands. Every reply
/// goes to the chat the command came from; reply failures are logged, not returned.
pub struct CommandHandler {
    watch_list: WatchList,
    presence: Arc<dyn PresenceGateway>,
    messenger: Arc<dyn MessagingGateway>,
}

impl CommandHandler {
    pub fn new(
        watch_list: WatchList,
        presence: Arc<dyn PresenceGateway>,
        messenger: Arc<dyn MessagingGateway>,
    ) -> Self {
        Self {
            watch_list,
            presence,
            messenger,
        }
    }

    async fn reply(&self, chat_id: i64, text: &str, options: SendOptions) {
        if let Err(e) = self.messenger.send_message(chat_id, text, options).await {
            error!(error = %e, chat_id, reply = %text, "Failed to send reply");
        }
    }

    async fn start(&self, chat_id: i64) {
        self.reply(
            chat_id,
            replies::GREETING,
            SendOptions::with_menu([replies::MENU_LIST, replies::MENU_CLEAR]),
        )
        .await;
    }

    /// Looks every distinct argument up in one presence query, then answers once per
    /// identity and once per argument that resolved to nothing. Replies are sent
    /// concurrently and all of them finish before this returns.
    #[instrument(skip(self, args), fields(arg_count = args.len()))]
    async fn add(&self, chat_id: i64, args: &[String]) {
        let keys = dedupe(args);
        let presences = match self.presence.batch_query(&keys).await {
            Ok(presences) => presences,
            Err(e) => {
                error!(error = %e, "Presence query for /add failed");
                self.reply(chat_id, replies::ERROR_OCCURRED, SendOptions::default())
                    .await;
                return;
            }
        };

        let mut matched = vec![false; keys.len()];
        let mut handled_ids = HashSet::new();
        let mut fan_out = ReplyFanOut::new(self.messenger.clone(), chat_id);

        for presence in &presences {
            let mut first_match = None;
            for (i, key) in keys.iter().enumerate() {
                if presence.matches_argument(key) {
                    matched[i] = true;
                    if first_match.is_none() {
                        first_match = Some(i);
                    }
                }
            }
            let Some(first) = first_match else {
                debug!(target_id = presence.id, "Presence matches no argument, skipped");
                continue;
            };
            if !handled_ids.insert(presence.id) {
                continue;
            }

            let target =
                TrackedTarget::from_presence(presence, presence.is_alias_argument(&keys[first]));
            if self.watch_list.find(target.id).await.is_some() {
                fan_out.push(replies::already_added(&target));
            } else if presence.online {
                fan_out.push(replies::online(&target));
            } else if self.watch_list.add(target.clone()).await {
                info!(target_id = target.id, "step: target added");
                fan_out.push(replies::added(&target));
            } else {
                fan_out.push(replies::already_added(&target));
            }
        }

        for (key, _) in keys.iter().zip(&matched).filter(|(_, m)| !**m) {
            fan_out.push(replies::not_found(key));
        }

        let total = fan_out.pending();
        let delivered = fan_out.join().await;
        if delivered < total {
            warn!(delivered, total, "Some /add replies were not delivered");
        }
    }

    /// One reply per argument, in order.
    async fn remove(&self, chat_id: i64, args: &[String]) {
        for arg in args {
            let text = match self.watch_list.remove_matching(arg).await {
                Some(target) => {
                    info!(target_id = target.id, "step: target removed");
                    replies::removed(&target)
                }
                None => replies::not_in_list(arg),
            };
            self.reply(chat_id, &text, SendOptions::default()).await;
        }
    }

    async fn clear(&self, chat_id: i64) {
        let dropped = self.watch_list.clear().await;
        let text = if dropped == 0 {
            replies::CLEAR_EMPTY
        } else {
            info!(dropped, "step: tracing list cleared");
            replies::CLEARED
        };
        self.reply(chat_id, text, SendOptions::default()).await;
    }

    async fn list(&self, chat_id: i64) {
        let snapshot = self.watch_list.snapshot().await;
        self.reply(chat_id, &replies::tracing_list(&snapshot), SendOptions::default())
            .await;
    }

    async fn dispatch(&self, chat_id: i64, command: Command) {
        let args_check = match &command {
            Command::Add(args) | Command::Remove(args) => Command::require_args(args),
            _ => Ok(()),
        };
        if let Err(e) = args_check {
            debug!(error = %e, command = ?command, "Command rejected");
            self.reply(chat_id, replies::NO_ARGUMENTS, SendOptions::default())
                .await;
            return;
        }

        match command {
            Command::Start => self.start(chat_id).await,
            Command::Add(args) => self.add(chat_id, &args).await,
            Command::Remove(args) => self.remove(chat_id, &args).await,
            Command::Clear => self.clear(chat_id).await,
            Command::List => self.list(chat_id).await,
            Command::Unknown(token) => {
                debug!(error = %HandlerError::InvalidCommand(token), "Unknown command");
                self.reply(chat_id, replies::UNKNOWN_COMMAND, SendOptions::default())
                    .await;
            }
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, event), fields(update_id = event.update_id))]
    async fn handle(&self, event: &Event) -> Result<HandlerResponse> {
        let EventKind::Message(message) = &event.kind else {
            return Ok(HandlerResponse::Ignore);
        };
        let command = Command::parse(&message.text);

        info!(user_id = message.user_id, command = ?command, "step: dispatching command");
        self.dispatch(message.chat.id, command).await;
        Ok(HandlerResponse::Stop)
    }
}
