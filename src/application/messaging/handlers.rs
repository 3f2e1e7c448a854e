//! Built-in command handlers and the rule table that wires them

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::application::services::status::{self, BotProfile};
use crate::domain::entities::Trigger;
use crate::infrastructure::llm::{LLMConfig, LLMMessage, LLM};
use crate::infrastructure::system::HostStats;
use super::router::{CommandRouter, Context, Flow, Handler, HandlerResult, Outcome, RouterState};

pub const CHATBOT_PREFIX: &str = ".chatbot";
pub const CHATBOT_OFF: &str = "🤖 Chatbot is now OFF";
pub const CHATBOT_ON: &str = "🤖 Chatbot is now ON";
pub const CHATBOT_DISABLED: &str = "❌ Chatbot is OFF";
pub const CHATBOT_USAGE: &str = "Send a message after .chatbot";
pub const AFK_ON: &str = "🌙 You are now AFK";
pub const AFK_OFF: &str = "✅ AFK disabled";
pub const AFK_NOTICE: &str = "🌙 You are currently AFK";
pub const SETVAR_USAGE: &str = "Usage: .setvar key value";
pub const GETVAR_USAGE: &str = "Usage: .getvar key";
pub const DELVAR_USAGE: &str = "Usage: .delvar key";
pub const MEDIA_SOON: &str = "🔧 Media commands coming soon!";
pub const EFFECTS_SOON: &str = "🔧 Media effects coming soon!";
pub const REBOOTED: &str = "⚡ Bot rebooted (simulated)";
pub const MENTION_PLACEHOLDER: &str = "⚡ Mention command placeholder";
pub const LIST_PLACEHOLDER: &str = "⚡ List command placeholder";
pub const DELETE_PLACEHOLDER: &str = "⚡ Delete command placeholder";

pub const MEDIA_COMMANDS: &[&str] = &[".ytv", ".yta", ".play", ".song", ".video"];
pub const MEDIA_EFFECTS: &[&str] = &[".gif", ".rotate", ".flip"];

pub fn not_found(key: &str) -> String {
    format!("❌ Variable {} not found", key)
}

/// `.chatbot on` / `.chatbot off`
pub struct ChatbotToggle {
    pub enabled: bool,
}

#[async_trait]
impl Handler for ChatbotToggle {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        ctx.state.set_chatbot_enabled(self.enabled);
        tracing::info!("[{}] chatbot enabled = {}", ctx.sender(), self.enabled);
        Ok(Outcome::halt(if self.enabled { CHATBOT_ON } else { CHATBOT_OFF }))
    }
}

/// `.chatbot <prompt>` - relays the prompt to the completion API
pub struct ChatbotPrompt {
    llm: Arc<dyn LLM>,
    temperature: f32,
    max_tokens: u32,
}

impl ChatbotPrompt {
    pub fn new(llm: Arc<dyn LLM>, config: &LLMConfig) -> Self {
        Self {
            llm,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl Handler for ChatbotPrompt {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        if !ctx.state.chatbot_enabled() {
            return Ok(Outcome::halt(CHATBOT_DISABLED));
        }

        let prompt = ctx.text
            .strip_prefix(CHATBOT_PREFIX)
            .unwrap_or_default()
            .trim();
        if prompt.is_empty() {
            return Err(CommandError::usage(CHATBOT_USAGE));
        }

        tracing::info!("[{}] relaying prompt to {}", ctx.sender(), self.llm.name());

        let response = self.llm
            .chat(
                vec![LLMMessage::user(prompt)],
                None,
                Some(self.temperature),
                Some(self.max_tokens),
            )
            .await?;

        Ok(Outcome::proceed(vec![response.content]))
    }
}

/// `.afk` / `.afkadmin`
pub struct AfkToggle {
    pub away: bool,
}

#[async_trait]
impl Handler for AfkToggle {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        ctx.state.set_afk(ctx.sender(), self.away).await;
        Ok(Outcome::halt(if self.away { AFK_ON } else { AFK_OFF }))
    }
}

/// Reminder for senders marked AFK; never clears the flag
pub struct AfkNotice;

#[async_trait]
impl Handler for AfkNotice {
    async fn handle(&self, _ctx: &Context<'_>) -> HandlerResult {
        Ok(Outcome::proceed(vec![AFK_NOTICE.to_string()]))
    }
}

pub struct SetVar;

#[async_trait]
impl Handler for SetVar {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        let args = ctx.args();
        let (key, value) = match args.split_first() {
            Some((key, rest)) if !rest.is_empty() => (*key, rest.join(" ")),
            _ => return Err(CommandError::usage(SETVAR_USAGE)),
        };

        ctx.state.variables().set(key, &value).await?;
        Ok(Outcome::halt(format!("✅ Variable {} set to \"{}\"", key, value)))
    }
}

pub struct GetVar;

#[async_trait]
impl Handler for GetVar {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        let key = *ctx.args().first().ok_or_else(|| CommandError::usage(GETVAR_USAGE))?;

        let reply = match ctx.state.variables().get(key).await? {
            Some(value) if !value.is_empty() => value,
            _ => not_found(key),
        };
        Ok(Outcome::halt(reply))
    }
}

pub struct DelVar;

#[async_trait]
impl Handler for DelVar {
    async fn handle(&self, ctx: &Context<'_>) -> HandlerResult {
        let key = *ctx.args().first().ok_or_else(|| CommandError::usage(DELVAR_USAGE))?;

        ctx.state.variables().delete(key).await?;
        Ok(Outcome::halt(format!("✅ Variable {} deleted", key)))
    }
}

/// `.alive` - status block followed by the command menu
pub struct Alive {
    profile: BotProfile,
    stats: fn() -> HostStats,
}

impl Alive {
    pub fn new(profile: BotProfile) -> Self {
        Self::with_stats(profile, HostStats::collect)
    }

    pub fn with_stats(profile: BotProfile, stats: fn() -> HostStats) -> Self {
        Self { profile, stats }
    }
}

#[async_trait]
impl Handler for Alive {
    async fn handle(&self, _ctx: &Context<'_>) -> HandlerResult {
        let host = (self.stats)();
        Ok(Outcome::proceed(vec![
            status::system_info(&self.profile, &host),
            status::general_menu(),
        ]))
    }
}

/// Fixed reply
pub struct StaticReply {
    text: String,
}

impl StaticReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Handler for StaticReply {
    async fn handle(&self, _ctx: &Context<'_>) -> HandlerResult {
        Ok(Outcome {
            replies: vec![self.text.clone()],
            flow: Flow::Halt,
        })
    }
}

impl CommandRouter {
    /// Router with the full built-in command table.
    ///
    /// `.afkadmin` is registered ahead of `.afk` so the longer prefix is reachable.
    pub fn with_default_rules(
        state: Arc<RouterState>,
        llm: Arc<dyn LLM>,
        llm_config: &LLMConfig,
        profile: BotProfile,
    ) -> Self {
        let mut router = Self::new(state);

        router.register("chatbot-off", Trigger::Exact(".chatbot off"), ChatbotToggle { enabled: false });
        router.register("chatbot-on", Trigger::Exact(".chatbot on"), ChatbotToggle { enabled: true });
        router.register("chatbot", Trigger::Prefix(CHATBOT_PREFIX), ChatbotPrompt::new(llm, llm_config));

        router.register("afkadmin", Trigger::Prefix(".afkadmin"), AfkToggle { away: false });
        router.register("afk", Trigger::Prefix(".afk"), AfkToggle { away: true });
        router.register("afk-notice", Trigger::Away, AfkNotice);

        router.register("setvar", Trigger::Prefix(".setvar"), SetVar);
        router.register("getvar", Trigger::Prefix(".getvar"), GetVar);
        router.register("delvar", Trigger::Prefix(".delvar"), DelVar);

        let identity = status::identity(&profile);
        router.register("alive", Trigger::Exact(".alive"), Alive::new(profile));
        router.register("info", Trigger::Exact(".info"), StaticReply::new(identity));

        router.register("media", Trigger::FirstToken(MEDIA_COMMANDS), StaticReply::new(MEDIA_SOON));
        router.register("effects", Trigger::FirstToken(MEDIA_EFFECTS), StaticReply::new(EFFECTS_SOON));
        router.register("reboot", Trigger::AnyOf(&[".reboot", ".reload"]), StaticReply::new(REBOOTED));
        router.register("mention", Trigger::Exact(".mention"), StaticReply::new(MENTION_PLACEHOLDER));
        router.register("list", Trigger::Exact(".list"), StaticReply::new(LIST_PLACEHOLDER));
        router.register("del", Trigger::Exact(".del"), StaticReply::new(DELETE_PLACEHOLDER));

        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::{LLMError, LLMResponse, LLMResult};
    use crate::infrastructure::storage::JsonStore;
    use crate::domain::entities::Message;

    struct Unreachable;

    #[async_trait]
    impl LLM for Unreachable {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn chat(
            &self,
            _messages: Vec<LLMMessage>,
            _model: Option<&str>,
            _temperature: Option<f32>,
            _max_tokens: Option<u32>,
        ) -> LLMResult<LLMResponse> {
            Err(LLMError::NetworkError("offline".to_string()))
        }
    }

    async fn router() -> (tempfile::TempDir, CommandRouter) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("variables.json")).await.unwrap();
        let state = Arc::new(RouterState::new(Arc::new(store)));
        let router = CommandRouter::with_default_rules(
            state,
            Arc::new(Unreachable),
            &LLMConfig::default(),
            BotProfile::default(),
        );
        (dir, router)
    }

    async fn send(router: &CommandRouter, text: &str) -> Vec<String> {
        router.route(&Message::new("alice", text)).await
    }

    #[tokio::test]
    async fn test_registration_order() {
        let (_dir, router) = router().await;
        let names: Vec<&str> = router.rules().iter().map(|r| r.name).collect();
        assert_eq!(&names[..6], &["chatbot-off", "chatbot-on", "chatbot", "afkadmin", "afk", "afk-notice"]);
        assert_eq!(&names[9..11], &["alive", "info"]);
        assert_eq!(router.rules().len(), 17);
    }

    #[tokio::test]
    async fn test_setvar_joins_value_tokens() {
        let (_dir, router) = router().await;
        assert_eq!(
            send(&router, ".setvar greeting  hello   big world").await,
            vec!["✅ Variable greeting set to \"hello big world\""]
        );
        assert_eq!(send(&router, ".getvar greeting").await, vec!["hello big world"]);
    }

    #[tokio::test]
    async fn test_variable_usage_errors() {
        let (_dir, router) = router().await;
        assert_eq!(send(&router, ".setvar").await, vec![SETVAR_USAGE]);
        assert_eq!(send(&router, ".setvar onlykey").await, vec![SETVAR_USAGE]);
        assert_eq!(send(&router, ".getvar").await, vec![GETVAR_USAGE]);
        assert_eq!(send(&router, ".delvar").await, vec![DELVAR_USAGE]);
        assert_eq!(router.state().variables().get("onlykey").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delvar_absent_key_confirms() {
        let (_dir, router) = router().await;
        assert_eq!(send(&router, ".delvar ghost").await, vec!["✅ Variable ghost deleted"]);
    }

    #[tokio::test]
    async fn test_static_replies() {
        let (_dir, router) = router().await;
        assert_eq!(send(&router, ".info").await, vec!["🤖 Prick bot with AI\nOwner: Iyii\nVersion: 6.2.4"]);
        assert_eq!(send(&router, ".play despacito").await, vec![MEDIA_SOON]);
        assert_eq!(send(&router, ".video").await, vec![MEDIA_SOON]);
        assert_eq!(send(&router, ".flip now").await, vec![EFFECTS_SOON]);
        assert_eq!(send(&router, ".reboot").await, vec![REBOOTED]);
        assert_eq!(send(&router, ".reload").await, vec![REBOOTED]);
        assert_eq!(send(&router, ".mention").await, vec![MENTION_PLACEHOLDER]);
        assert_eq!(send(&router, ".list").await, vec![LIST_PLACEHOLDER]);
        assert_eq!(send(&router, ".del").await, vec![DELETE_PLACEHOLDER]);
        assert!(send(&router, ".reboot now").await.is_empty());
        assert!(send(&router, ".info please").await.is_empty());
    }

    #[tokio::test]
    async fn test_alive_sends_two_blocks() {
        let (_dir, router) = router().await;
        let replies = send(&router, "  .alive  ").await;
        assert_eq!(replies.len(), 2);
        assert!(replies[0].contains("Available RAM"));
        assert!(replies[1].contains("General"));
    }

    #[tokio::test]
    async fn test_alive_uses_stats_source() {
        fn fixed() -> HostStats {
            HostStats { os_type: "Darwin".to_string(), free_mb: 1, total_mb: 2 }
        }

        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("v.json")).await.unwrap();
        let mut router = CommandRouter::new(Arc::new(RouterState::new(Arc::new(store))));
        router.register("alive", Trigger::Exact(".alive"), Alive::with_stats(BotProfile::default(), fixed));

        let replies = router.route(&Message::new("s", ".alive")).await;
        assert!(replies[0].contains("Server : Darwin"));
        assert!(replies[0].contains("Available RAM : 1 MB of 2 MB"));
    }

    #[tokio::test]
    async fn test_chatbot_failure_falls_through_to_afk_notice() {
        let (_dir, router) = router().await;
        router.state().set_afk("alice", true).await;

        assert_eq!(send(&router, ".chatbot hello").await, vec![crate::application::messaging::router::AI_ERROR, AFK_NOTICE]);
    }
}
