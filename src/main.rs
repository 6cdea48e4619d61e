use anyhow::Result;
use pot_admin::config::AppConfig;
use pot_admin::internal::ui::app::App;
use pot_admin::internal::ui::log_viewer::LOG_FILE_PREFIX;
use pot_admin::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // Logging settings live in the config, so load it first
    let config = AppConfig::load();

    // Logs must not reach stdout/stderr while the TUI owns the screen.
    match tui::init() {
        Ok(terminal) => {
            let file_appender =
                tracing_appender::rolling::daily(config.logging.directory(), LOG_FILE_PREFIX);
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            // RUST_LOG wins over the config file
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

            tracing::info!(backend = %config.backend, "Starting pot-admin");

            let res = match App::new(config) {
                Ok(mut app) => app.run(terminal).await,
                Err(e) => Err(e),
            };

            // Restore before printing so the message lands on the normal screen
            tui::restore()?;

            if let Err(err) = res {
                tracing::error!("pot-admin exited with error: {:#}", err);
                eprintln!("{err:?}");
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .init();

            eprintln!("Failed to initialize TUI: {e:?}");
            Err(e.into())
        }
    }
}
