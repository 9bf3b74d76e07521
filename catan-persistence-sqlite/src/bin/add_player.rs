use catan_domain::{player::normalize_player_name, repository::ScoreRepository};
use catan_persistence_sqlite::{SqliteScoreRepository, create_db_pool_from_env};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: add_player <name>");
        std::process::exit(1);
    }

    let name = match normalize_player_name(&args[1]) {
        Ok(name) => name,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let repository = SqliteScoreRepository::new(create_db_pool_from_env());
    if let Err(e) = repository.add_player(&name).await {
        eprintln!("Failed to add player [{}]: {}", name, e);
        std::process::exit(1);
    }

    println!("Added player [{}]", name);
}
