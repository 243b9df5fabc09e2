use clap::Parser;
use placelog::cli::{self, Cli, Commands};
use placelog::config::Config;
use placelog::{build_app, db};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let pool = db::init_pool(&config.database_url).await;

    let result = match cli.command() {
        Commands::Serve => {
            let app = build_app(pool, config.map).await;
            let listener = TcpListener::bind(config.bind_addr).await.unwrap();

            tracing::info!("listening on {}", config.bind_addr);
            axum::serve(listener, app).await.unwrap();
            return;
        }
        Commands::Import { file } => cli::import_visits(&pool, file).await.map(|_| ()),
        Commands::Reset => cli::clear_visits(&pool).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
