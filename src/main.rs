use actix_cors::Cors;
use actix_web::http::Method;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;

use rust_edupro::config::{AppConfig, CorsConfig};
use rust_edupro::models::AppStartTime;
use rust_edupro::routes;
use rust_edupro::runtime::lifetime;
use rust_edupro::utils::{form_error_handler, json_error_handler, query_error_handler};

/// 初始化 tracing，返回的 guard 需要活到进程结束
fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .with_level(true);

    if config.is_development() {
        builder.with_ansi(true).with_file(true).with_line_number(true).init();
    } else {
        builder.with_ansi(false).json().init();
    }
    guard
}

/// 按配置构造 CORS，未列出来源时放行所有来源
fn build_cors(cors: &CorsConfig) -> Cors {
    let methods = cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok());

    let base = Cors::default()
        .allowed_methods(methods)
        .allowed_headers(cors.allowed_headers.iter().map(String::as_str))
        .max_age(cors.max_age);

    if cors.allowed_origins.is_empty() {
        return base.allow_any_origin();
    }
    cors.allowed_origins
        .iter()
        .fold(base, |c, origin| c.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();

    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();
    let _log_guard = init_tracing(config);

    warn!(
        "{} v{} starting ({} environment)",
        config.app.system_name,
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = startup.storage.clone();
    let cache = startup.cache.clone();

    debug!(
        "Startup preparation took {} ms",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds()
    );
    warn!("Running with {} worker(s)", config.server.workers);

    let timeouts = &config.server.timeouts;
    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.cors))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::FormConfig::default().error_handler(form_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(routes::configure_auth_routes)
            .configure(routes::configure_profile_routes)
            .configure(routes::configure_student_routes)
            .configure(routes::configure_trainer_routes)
            .configure(routes::configure_manager_routes)
            // 含 /{instructor}/course/{slug}/ 通配路由，必须最后注册
            .configure(routes::configure_public_routes)
    })
    .keep_alive(Duration::from_secs(timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(timeouts.client_disconnect))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            warn!("Listening on unix socket {}", socket_path);
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            server.bind_uds(socket_path)?
        }
        None => {
            warn!("Listening on http://{}", config.server_bind_address());
            server.bind(config.server_bind_address())?
        }
    };

    #[cfg(not(unix))]
    let server = {
        warn!("Listening on http://{}", config.server_bind_address());
        server.bind(config.server_bind_address())?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Shutdown signal received, stopping server");
        }
    }

    Ok(())
}
