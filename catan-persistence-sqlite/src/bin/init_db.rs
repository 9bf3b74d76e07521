use catan_domain::repository::ScoreRepository;
use catan_persistence_sqlite::{SqliteScoreRepository, create_db_pool_from_env};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let repository = SqliteScoreRepository::new(create_db_pool_from_env());
    if let Err(e) = repository.initialize().await {
        eprintln!("Failed to initialize database: {}", e);
        std::process::exit(1);
    }

    println!("Database initialized");
}
