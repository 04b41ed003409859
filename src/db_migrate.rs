use clinic_db::schema::initialize_database;
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| eyre!("DATABASE_URL is required"))?;

    println!("Connecting to database...");
    let db_pool = clinic_db::create_pool(&database_url).await?;

    println!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    println!("Database schema initialized successfully.");

    Ok(())
}
