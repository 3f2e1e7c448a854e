use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use crate::application::errors::BotError;
use crate::application::messaging::CommandRouter;
use crate::domain::entities::Message;
use crate::domain::traits::Bot;

/// Delay before polling again after a receive error
const RECEIVE_BACKOFF: Duration = Duration::from_secs(5);

/// Service for processing messages
///
/// Each inbound event is handled in its own task; tasks share router state
/// without any ordering between them.
pub struct MessageService<B: Bot> {
    bot: Arc<B>,
    router: Arc<CommandRouter>,
}

impl<B: Bot> Clone for MessageService<B> {
    fn clone(&self) -> Self {
        Self {
            bot: self.bot.clone(),
            router: self.router.clone(),
        }
    }
}

impl<B: Bot + 'static> MessageService<B> {
    pub fn new(bot: Arc<B>, router: Arc<CommandRouter>) -> Self {
        Self { bot, router }
    }

    /// Handle one event in a task tracked by `tasks`
    pub fn dispatch(&self, tasks: &mut JoinSet<()>, message: Message) {
        let service = self.clone();
        tasks.spawn(async move {
            service.process(message).await;
        });
    }

    /// Route one event and send its replies in order
    pub async fn process(&self, message: Message) {
        tracing::info!(
            "Processing message from {} at {}: {}",
            message.sender,
            message.timestamp.format("%H:%M:%S"),
            preview(message.text())
        );

        let replies = self.router.route(&message).await;

        for reply in replies {
            tracing::info!("Sending response to {}: {}", message.sender, preview(&reply));
            if let Err(e) = self.bot.send_message(&message.sender, &reply).await {
                tracing::error!("Failed to send message: {}", e);
            }
        }
    }

    /// Pull events from the transport until it disconnects.
    ///
    /// Returns once every in-flight event has finished sending its replies.
    pub async fn run(&self) -> Result<(), BotError> {
        self.bot.start().await?;

        let info = self.bot.bot_info();
        tracing::info!("Bot started: @{}", info.username);

        let mut tasks = JoinSet::new();

        loop {
            while let Some(done) = tasks.try_join_next() {
                log_task_exit(done);
            }

            match self.bot.receive().await {
                Ok(messages) => {
                    for message in messages {
                        self.dispatch(&mut tasks, message);
                    }
                }
                Err(BotError::Disconnected) => {
                    tracing::info!("Inbound stream closed, finishing {} pending events", tasks.len());
                    while let Some(done) = tasks.join_next().await {
                        log_task_exit(done);
                    }
                    return Ok(());
                }
                Err(e) => {
                    tracing::error!("Failed to get updates: {}", e);
                    tokio::time::sleep(RECEIVE_BACKOFF).await;
                }
            }
        }
    }
}

fn log_task_exit(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!("Event task failed: {}", e);
    }
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}
