//! Seeds the database: an administrator, an optional demo patient, and slots
//! for today plus the following six days (UTC).

use std::env;

use chrono::{Duration, Utc};
use clinic_api::middleware::auth::hash_password;
use clinic_core::{models::user::Role, slot_generator::generate_slots};
use clinic_db::{create_pool, schema::initialize_database, PgStore, Store};
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Days of slots ensured, starting today.
const SEED_DAYS: i64 = 7;

async fn seed_user(
    store: &PgStore,
    prefix: &str,
    default_name: &str,
    role: Role,
) -> Result<bool> {
    let email = env::var(format!("{}_EMAIL", prefix)).ok();
    let password = env::var(format!("{}_PASSWORD", prefix)).ok();
    let (Some(email), Some(password)) = (email, password) else {
        return Ok(false);
    };
    let name = env::var(format!("{}_NAME", prefix)).unwrap_or_else(|_| default_name.to_string());

    let password_hash = hash_password(&password)?;
    store.upsert_user(&name, &email, &password_hash, role).await?;
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load environment variables
    dotenv().ok();

    let database_url = env::var("DATABASE_URL").map_err(|_| eyre!("DATABASE_URL is required"))?;
    let db_pool = create_pool(&database_url).await?;
    initialize_database(&db_pool).await?;
    let store = PgStore::new(db_pool);

    if seed_user(&store, "ADMIN", "Admin", Role::Admin).await? {
        info!("Admin user ensured.");
    } else {
        warn!("ADMIN_EMAIL or ADMIN_PASSWORD not set. Skipping admin seed.");
    }

    if seed_user(&store, "PATIENT", "Patient", Role::Patient).await? {
        info!("Patient user ensured.");
    }

    let today = Utc::now().date_naive();
    let windows = generate_slots(today, today + Duration::days(SEED_DAYS - 1));
    let inserted = store.create_slots(&windows).await?;
    info!(
        "Ensured {} slots for the next {} days ({} new).",
        windows.len(),
        SEED_DAYS,
        inserted
    );

    Ok(())
}
