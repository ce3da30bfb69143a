use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dogbot::config::BotConfig;
use dogbot::events::Handler;
use dogbot::utils::ai_client::AiClient;
use dogbot::utils::database::Database;
use dogbot::{Data, Error, framework_options, health, intents};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dogbot=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = match BotConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    // A broken database only disables the AI history commands
    let database = Database::new(&config.database_path);
    if let Err(e) = database.init() {
        error!("Failed to initialize database: {}", e);
    }

    let port = config.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::serve(port).await {
            error!("Health server stopped: {}", e);
        }
    });

    let data = Data {
        config: Arc::clone(&config),
        database,
        ai: AiClient::new(config.ai.clone())?,
        #[cfg(feature = "music")]
        music: {
            use dogbot::commands::music::utils::{music_manager::MusicManager, playlist};
            Arc::new(MusicManager::new(playlist::default_library()))
        },
    };

    let framework = poise::Framework::builder()
        .options(framework_options(&config))
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered commands for {}", ready.user.name);
                Ok(data)
            })
        });

    let client_builder = ClientBuilder::new(&config.discord_token, intents())
        .event_handler(Handler)
        .framework(framework.build());

    // Create and run client
    build_and_start_client(client_builder).await
}

async fn build_and_start_client(client_builder: ClientBuilder) -> Result<(), Error> {
    #[cfg(feature = "music")]
    {
        use songbird::SerenityInit;

        let mut client = client_builder.register_songbird().await?;
        client.start().await.map_err(Into::into)
    }

    #[cfg(not(feature = "music"))]
    {
        let mut client = client_builder.await?;
        client.start().await.map_err(Into::into)
    }
}
