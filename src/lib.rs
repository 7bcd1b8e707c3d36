//! random-image-bot - chat plugins that answer with a random wenturc image

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

use std::sync::Arc;

use application::errors::BotError;
use application::messaging::MessageDispatcher;
use application::services::CooldownGate;
use domain::traits::{Clock, HttpClient};
use infrastructure::config::Config;
use plugins::{RandomImagePlugin, WenturcPlugin};

/// Build a dispatcher with both image plugins registered
pub fn build_dispatcher(
    config: &Config,
    http: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
) -> Result<MessageDispatcher, BotError> {
    config.validate()?;

    let mut dispatcher = MessageDispatcher::new(&config.bot.prefix);

    dispatcher.register_plugin(WenturcPlugin::new(http.clone(), &config.wenturc.base_url))?;

    let cooldown = CooldownGate::new(config.cooldown_window(), clock);
    let mut random_image = RandomImagePlugin::new(
        http,
        &config.wenturc.base_url,
        config.http.max_concurrent_fetches,
        cooldown,
        config.temp_dir(),
    )
    .with_prefix(&config.bot.prefix);
    if let Some(caption) = &config.wenturc.caption {
        random_image = random_image.with_caption(caption);
    }
    dispatcher.register_plugin(random_image)?;

    tracing::info!(
        "Dispatcher ready: {} plugins, {} commands",
        dispatcher.plugins().len(),
        dispatcher.commands().len()
    );
    Ok(dispatcher)
}
