//! Command router - Evaluates ordered rules against one inbound event

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::errors::CommandError;
use crate::domain::entities::{Message, Trigger};
use crate::domain::traits::Store;

/// Reply sent when the completion API call fails
pub const AI_ERROR: &str = "❌ Error contacting AI";

/// Reply sent when a variable could not be written to disk
pub const SAVE_ERROR: &str = "❌ Failed to save variables";

/// Shared state consulted and mutated by handlers
///
/// AFK and chatbot state are process-lifetime only.
pub struct RouterState {
    afk: RwLock<HashMap<String, bool>>,
    chatbot_enabled: AtomicBool,
    variables: Arc<dyn Store>,
}

impl RouterState {
    pub fn new(variables: Arc<dyn Store>) -> Self {
        Self {
            afk: RwLock::new(HashMap::new()),
            chatbot_enabled: AtomicBool::new(true),
            variables,
        }
    }

    pub async fn is_afk(&self, sender: &str) -> bool {
        self.afk.read().await.get(sender).copied().unwrap_or(false)
    }

    pub async fn set_afk(&self, sender: &str, away: bool) {
        self.afk.write().await.insert(sender.to_string(), away);
    }

    pub fn chatbot_enabled(&self) -> bool {
        self.chatbot_enabled.load(Ordering::SeqCst)
    }

    pub fn set_chatbot_enabled(&self, enabled: bool) {
        self.chatbot_enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn variables(&self) -> &dyn Store {
        self.variables.as_ref()
    }
}

/// Whether evaluation moves on to later rules after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Halt,
    Continue,
}

/// Replies produced by one handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub replies: Vec<String>,
    pub flow: Flow,
}

impl Outcome {
    pub fn halt(reply: impl Into<String>) -> Self {
        Self {
            replies: vec![reply.into()],
            flow: Flow::Halt,
        }
    }

    pub fn proceed(replies: Vec<String>) -> Self {
        Self {
            replies,
            flow: Flow::Continue,
        }
    }
}

pub type HandlerResult = Result<Outcome, CommandError>;

/// Per-event context handed to handlers
pub struct Context<'a> {
    pub message: &'a Message,
    /// Trimmed message body
    pub text: &'a str,
    pub state: &'a RouterState,
}

impl Context<'_> {
    pub fn sender(&self) -> &str {
        &self.message.sender
    }

    /// Whitespace-separated tokens after the command token
    pub fn args(&self) -> Vec<&str> {
        self.text.split_whitespace().skip(1).collect()
    }
}

/// Handler trait - the action half of a rule
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult;
}

/// One (predicate, handler) pair
pub struct Rule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub handler: Arc<dyn Handler>,
}

/// Evaluates rules in registration order.
///
/// Every matching rule runs until one halts, so an AFK notice can precede
/// the reply of a later command in the same event.
pub struct CommandRouter {
    state: Arc<RouterState>,
    rules: Vec<Rule>,
}

impl CommandRouter {
    pub fn new(state: Arc<RouterState>) -> Self {
        Self {
            state,
            rules: Vec::new(),
        }
    }

    pub fn register<H: Handler + 'static>(&mut self, name: &'static str, trigger: Trigger, handler: H) {
        self.rules.push(Rule {
            name,
            trigger,
            handler: Arc::new(handler),
        });
    }

    pub fn state(&self) -> &Arc<RouterState> {
        &self.state
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Map one inbound event to its replies, in send order
    pub async fn route(&self, message: &Message) -> Vec<String> {
        let ctx = Context {
            message,
            text: message.text(),
            state: &self.state,
        };

        let mut replies = Vec::new();

        for rule in &self.rules {
            if !self.matches(&rule.trigger, &ctx).await {
                continue;
            }

            tracing::debug!("[{}] rule {} matched", ctx.sender(), rule.name);

            let outcome = match rule.handler.handle(&ctx).await {
                Ok(outcome) => outcome,
                Err(e) => Self::recover(rule.name, ctx.sender(), e),
            };

            replies.extend(outcome.replies);
            if outcome.flow == Flow::Halt {
                break;
            }
        }

        replies
    }

    async fn matches(&self, trigger: &Trigger, ctx: &Context<'_>) -> bool {
        if trigger.is_away() {
            return ctx.state.is_afk(ctx.sender()).await;
        }
        trigger.matches_text(ctx.text)
    }

    fn recover(rule: &str, sender: &str, error: CommandError) -> Outcome {
        match error {
            CommandError::Usage(text) => Outcome::halt(text),
            CommandError::ExternalCall(e) => {
                tracing::warn!("[{}] {} failed: {}", sender, rule, e);
                Outcome::proceed(vec![AI_ERROR.to_string()])
            }
            CommandError::Storage(e) => {
                tracing::error!("[{}] {} could not persist variables: {}", sender, rule, e);
                Outcome::halt(SAVE_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::StorageError;
    use crate::application::messaging::handlers::{DelVar, SetVar};
    use crate::infrastructure::storage::JsonStore;

    struct Reply(&'static str, Flow);

    #[async_trait]
    impl Handler for Reply {
        async fn handle(&self, _ctx: &Context<'_>) -> HandlerResult {
            Ok(Outcome {
                replies: vec![self.0.to_string()],
                flow: self.1,
            })
        }
    }

    struct Fails;

    #[async_trait]
    impl Handler for Fails {
        async fn handle(&self, _ctx: &Context<'_>) -> HandlerResult {
            Err(CommandError::usage("Usage: .x y"))
        }
    }

    async fn state() -> (tempfile::TempDir, Arc<RouterState>) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("variables.json")).await.unwrap();
        (dir, Arc::new(RouterState::new(Arc::new(store))))
    }

    #[tokio::test]
    async fn test_rules_run_in_order_until_halt() {
        let (_dir, state) = state().await;
        let mut router = CommandRouter::new(state);
        router.register("a", Trigger::Prefix(".a"), Reply("first", Flow::Continue));
        router.register("b", Trigger::Prefix(".ab"), Reply("second", Flow::Halt));
        router.register("c", Trigger::Prefix(".a"), Reply("never", Flow::Halt));

        let replies = router.route(&Message::new("s", ".abc")).await;
        assert_eq!(replies, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_unmatched_text_is_silent() {
        let (_dir, state) = state().await;
        let mut router = CommandRouter::new(state);
        router.register("a", Trigger::Exact(".a"), Reply("x", Flow::Halt));

        assert!(router.route(&Message::new("s", "hello there")).await.is_empty());
    }

    #[tokio::test]
    async fn test_usage_error_becomes_reply() {
        let (_dir, state) = state().await;
        let mut router = CommandRouter::new(state);
        router.register("x", Trigger::Prefix(".x"), Fails);
        router.register("after", Trigger::Prefix(".x"), Reply("never", Flow::Halt));

        assert_eq!(router.route(&Message::new("s", ".x")).await, vec!["Usage: .x y"]);
    }

    /// Store whose writes always fail, reads succeed
    struct ReadOnlyDisk;

    #[async_trait]
    impl Store for ReadOnlyDisk {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
        }

        async fn delete(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
        }
    }

    #[tokio::test]
    async fn test_save_failure_replies_once_and_halts() {
        let state = Arc::new(RouterState::new(Arc::new(ReadOnlyDisk)));
        let mut router = CommandRouter::new(state);
        router.register("setvar", Trigger::Prefix(".setvar"), SetVar);
        router.register("delvar", Trigger::Prefix(".delvar"), DelVar);
        router.register("after", Trigger::Prefix("."), Reply("never", Flow::Continue));

        assert_eq!(router.route(&Message::new("s", ".setvar city Berlin")).await, vec![SAVE_ERROR]);
        assert_eq!(router.route(&Message::new("s", ".delvar city")).await, vec![SAVE_ERROR]);
        assert_eq!(router.route(&Message::new("s", ".other")).await, vec!["never"]);
    }

    #[tokio::test]
    async fn test_away_trigger_reads_state() {
        let (_dir, state) = state().await;
        let mut router = CommandRouter::new(state.clone());
        router.register("away", Trigger::Away, Reply("away", Flow::Continue));

        assert!(router.route(&Message::new("s", "hi")).await.is_empty());

        state.set_afk("s", true).await;
        assert_eq!(router.route(&Message::new("s", "hi")).await, vec!["away"]);
        assert!(router.route(&Message::new("other", "hi")).await.is_empty());
    }

    #[tokio::test]
    async fn test_state_defaults() {
        let (_dir, state) = state().await;
        assert!(state.chatbot_enabled());
        assert!(!state.is_afk("anyone").await);

        state.set_chatbot_enabled(false);
        assert!(!state.chatbot_enabled());
    }
}
