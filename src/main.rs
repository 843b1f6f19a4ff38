//! Bookshelf - 个人读书记录 REST API
//!
//! - Domain: book/, stats
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, identity

use std::sync::Arc;

use bookshelf::application::IdentityVerifierPort;
use bookshelf::config::{load_config, print_config, AppConfig, AuthMode, LogConfig};
use bookshelf::infrastructure::http::{AppState, HttpServer, ServerConfig};
use bookshelf::infrastructure::identity::{FixedAccountVerifier, StaticTokenVerifier};
use bookshelf::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteAuthorRepository, SqliteBookRepository,
    SqliteDescriptionRepository, SqlitePublisherRepository,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Bookshelf - 个人读书记录 API");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let book_repo = Arc::new(
        SqliteBookRepository::new(pool.clone()).with_utc_offset(config.stats.utc_offset_minutes),
    );
    let description_repo = Arc::new(SqliteDescriptionRepository::new(pool.clone()));
    let author_repo = Arc::new(SqliteAuthorRepository::new(pool.clone()));
    let publisher_repo = Arc::new(SqlitePublisherRepository::new(pool));

    let identity_verifier = build_identity_verifier(&config);

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        book_repo,
        description_repo,
        author_repo,
        publisher_repo,
        identity_verifier,
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，RUST_LOG 优先于配置
fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},bookshelf={},tower_http=debug", log.level, log.level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_identity_verifier(config: &AppConfig) -> Arc<dyn IdentityVerifierPort> {
    match config.auth.mode {
        AuthMode::Token => Arc::new(StaticTokenVerifier::new(config.auth.token_pairs())),
        AuthMode::Fixed => {
            let account = config.auth.fixed_account_id.clone().unwrap_or_default();
            tracing::warn!(account_id = %account, "Fixed account mode, bearer tokens are not checked");
            Arc::new(FixedAccountVerifier::new(account))
        }
    }
}
