use anyhow::Result;
use tui_news_app::config::AppConfig;
use tui_news_app::internal::ui::app::App;
use tui_news_app::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first to get logging settings
    let config = AppConfig::load();

    // Logs must not reach stdout/stderr while the TUI owns the terminal, so they
    // go to a daily rotating file. If terminal init fails we log to the console.
    match tui::init() {
        Ok(terminal) => {
            let log_dir = config.logging.log_directory.as_deref().unwrap_or("logs");
            let file_appender = tracing_appender::rolling::daily(log_dir, "tui-news-app.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            // RUST_LOG takes precedence over the configured levels.
            let env_filter = match std::env::var("RUST_LOG") {
                Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
                Err(_) => tracing_subscriber::EnvFilter::new(config.logging.filter_directive()),
            };

            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();

            let res = match App::new(config) {
                Ok(mut app) => app.run(terminal).await,
                Err(e) => Err(e),
            };

            // Restore terminal state before exiting so the console is usable again.
            tui::restore()?;

            if let Err(err) = res {
                tracing::error!("{err:#}");
                eprintln!("{err:?}");
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .init();

            tracing::error!("Failed to initialize TUI: {e:#}");
            eprintln!("Failed to initialize TUI: {e:?}");
            Err(e)
        }
    }
}
