//! Mock gateways for tracker integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracer_core::{
    ActionButton, Event, MessageRef, MessagingGateway, Presence, PresenceGateway, Result,
    SendOptions, TracerError, TrackedTarget, WatchList,
};

/// One recorded `send_message(chat, text, options)` call.
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub chat_id: i64,
    pub text: String,
    pub options: SendOptions,
}

/// Messaging gateway that records sends; can fail sends whose text contains `fail_on`.
pub struct MockMessenger {
    tx: mpsc::UnboundedSender<SentRecord>,
    fail_on: Option<String>,
}

impl MockMessenger {
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<SentRecord>) {
        Self::failing_on(None)
    }

    pub fn failing_on(
        fail_on: Option<&str>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<SentRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let messenger = Arc::new(Self {
            tx,
            fail_on: fail_on.map(str::to_string),
        });
        (messenger, rx)
    }
}

#[async_trait]
impl MessagingGateway for MockMessenger {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: SendOptions,
    ) -> Result<MessageRef> {
        let _ = self.tx.send(SentRecord {
            chat_id,
            text: text.to_string(),
            options,
        });
        if let Some(fail_on) = &self.fail_on {
            if text.contains(fail_on.as_str()) {
                return Err(TracerError::Transport("send failed".into()));
            }
        }
        Ok(MessageRef {
            chat_id,
            message_id: 1,
        })
    }

    async fn answer_action(&self, _: &str, _: &str, _: bool) -> Result<()> {
        Ok(())
    }

    async fn edit_message_actions(&self, _: MessageRef, _: Vec<ActionButton>) -> Result<()> {
        Ok(())
    }

    async fn fetch_events(&self, _: Option<i32>, _: u32) -> Result<Vec<Event>> {
        Ok(Vec::new())
    }
}

/// Presence gateway that replays one scripted response per call and records the keys.
pub struct ScriptedPresence {
    script: Mutex<VecDeque<Result<Vec<Presence>>>>,
    queries: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPresence {
    pub fn new(script: Vec<Result<Vec<Presence>>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<Vec<String>> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PresenceGateway for ScriptedPresence {
    async fn batch_query(&self, keys: &[String]) -> Result<Vec<Presence>> {
        self.queries.lock().unwrap().push(keys.to_vec());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Presence gateway that plays the operator mid-query: removes `fresh.id` and adds `fresh`
/// back before answering with `records`.
pub struct RearmingPresence {
    watch_list: WatchList,
    fresh: TrackedTarget,
    records: Vec<Presence>,
}

impl RearmingPresence {
    pub fn new(watch_list: WatchList, fresh: TrackedTarget, records: Vec<Presence>) -> Arc<Self> {
        Arc::new(Self {
            watch_list,
            fresh,
            records,
        })
    }
}

#[async_trait]
impl PresenceGateway for RearmingPresence {
    async fn batch_query(&self, _: &[String]) -> Result<Vec<Presence>> {
        self.watch_list.remove(self.fresh.id).await;
        self.watch_list.add(self.fresh.clone()).await;
        Ok(self.records.clone())
    }
}

pub fn presence(id: i64, domain: &str, online: bool, last_seen: i64) -> Presence {
    Presence {
        id,
        domain: domain.to_string(),
        first_name: "Pavel".to_string(),
        last_name: "Durov".to_string(),
        online,
        last_seen,
    }
}
