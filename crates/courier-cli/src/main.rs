use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use courier_cli::{
    commands::{Command, HELP},
    config::Config,
    session::{Flow, Session},
    storage::build_gateway,
};
use courier_engine::SyncEngine;
use courier_reply::GeneratorFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);
    tracing::info!("Starting Courier");

    let gateway = build_gateway(&config).await?;
    let generator = GeneratorFactory::create(config.replies.clone());
    let engine = SyncEngine::builder()
        .gateway(gateway)
        .generator(generator)
        .config(config.engine.clone().into())
        .build()
        .await?;

    spawn_event_printer(&engine);

    println!("{}\n", HELP);
    let mut session = Session::new(engine.clone());
    if let Flow::Continue(list) = session.handle(Command::List).await {
        println!("{}", list);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("error: {}", message);
                continue;
            }
        };

        match session.handle(command).await {
            Flow::Continue(output) => println!("{}", output),
            Flow::Quit => break,
        }
    }

    engine.shutdown().await;
    Ok(())
}

/// Print typing indicators and replies as they arrive
fn spawn_event_printer(engine: &SyncEngine) {
    let mut events = engine.events();
    let engine = engine.clone();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(notice) = courier_cli::render::event_notice(&event, &engine.snapshot().chats) {
                        println!("{}", notice);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event printer fell behind, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout belongs to the chat transcript
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
