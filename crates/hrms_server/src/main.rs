use hrms_core::db::open_db;
use hrms_server::config::Config;
use hrms_server::state::AppState;
use log::error;

#[tokio::main]
async fn main() {
    let config = Config::load();
    let _logger = init_logging(&config);

    // No storage, no service: a failed open is fatal by design.
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=startup module=api status=fatal error={err}");
            eprintln!(
                "failed to open database `{}`: {err}",
                config.db_path.display()
            );
            std::process::exit(1);
        }
    };

    let state = AppState::new(conn);
    hrms_server::start_server(config, state).await;
}

/// File logging when `HRMS_LOG_DIR` is set, stderr otherwise. The returned
/// handle must stay alive for the process lifetime.
fn init_logging(config: &Config) -> Option<flexi_logger::LoggerHandle> {
    match config.log_dir.as_deref() {
        Some(dir) => {
            if let Err(err) = hrms_core::init_logging(&config.log_level, dir) {
                eprintln!("failed to initialize file logging: {err}");
                std::process::exit(1);
            }
            None
        }
        None => match flexi_logger::Logger::try_with_env_or_str(&config.log_level)
            .and_then(|logger| logger.start())
        {
            Ok(handle) => {
                hrms_core::logging::install_panic_hook_once();
                Some(handle)
            }
            Err(err) => {
                eprintln!("failed to initialize logging: {err}");
                std::process::exit(1);
            }
        },
    }
}
