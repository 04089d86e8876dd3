use hrms_backend::{config::Config, services::bootstrap::create_admin, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: create_admin <email> <password> [name]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrms_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(email), Some(password)) = (args.next(), args.next()) else {
        anyhow::bail!(USAGE);
    };
    let name = args.next().unwrap_or_else(|| "Administrator".to_string());

    let config = Config::load()?;
    let state = AppState::init(config).await?;

    match create_admin(&state, &email, &password, &name).await? {
        Some(admin) => tracing::info!(user_id = %admin.id, email = %admin.email, "Admin account created"),
        None => tracing::info!(%email, "Account already exists; nothing to do"),
    }

    state.shutdown().await;
    Ok(())
}
