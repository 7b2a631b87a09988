//! Command-line driver for the reservation screen.
//!
//! Binds the screen against a live backend, feeds it chooser records read
//! from JSON files, submits, and prints the resulting markup and navigation.
//!
//! # Usage
//!
//! ```bash
//! SHELTER_BASE_URL=http://localhost:5000 \
//!   cargo run --bin move-reserve -- animal.json person.json [statuses.json]
//! ```

use anyhow::Context;
use move_reserve::{AppConfig, HttpTransport, MoveReserveEnvironment, MoveReserveScreen, ReservationStatus};
use serde_json::Value;
use shelter_core::environment::{IdentityTranslator, LocaleFormatter, Navigator, SystemClock, WidgetHost};
use shelter_core::screen::ScreenModule;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Navigator that logs the requested screen.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn route(&self, url: &str) {
        info!(url, "Navigation requested");
    }
}

/// Widget host that logs released widgets.
struct LogWidgets;

impl WidgetHost for LogWidgets {
    fn destroy(&self, selector: &str) {
        info!(selector, "Widget released");
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [animal_path, person_path, rest @ ..] = args.as_slice() else {
        anyhow::bail!("usage: move-reserve <animal.json> <person.json> [statuses.json]");
    };

    let animal = read_json(Path::new(animal_path))?;
    let person = read_json(Path::new(person_path))?;
    let statuses: Vec<ReservationStatus> = match rest.first() {
        Some(path) => serde_json::from_value(read_json(Path::new(path))?).context("reading status list")?,
        None => Vec::new(),
    };

    info!(base_url = %config.base_url, "Starting reservation screen");

    let transport = HttpTransport::new(config.base_url.clone(), config.timeout())?;
    let env = MoveReserveEnvironment::new(
        Arc::new(transport),
        Arc::new(config.flags.clone()),
        Arc::new(LocaleFormatter::new(config.currency_symbol.clone(), config.date_format.clone())),
        Arc::new(IdentityTranslator),
        Arc::new(LogNavigator),
        Arc::new(LogWidgets),
        Arc::new(SystemClock),
    );

    let mut screen = MoveReserveScreen::new(env, statuses);
    screen.bind().await?;
    info!(title = %screen.title(), "Screen bound");

    screen.animal_changed(&animal).await?.wait().await;
    screen.person_changed(&person).await?.wait().await;
    screen.submit().await?.wait().await;

    println!("{}", screen.render_current().await?);
    let state = screen.snapshot().await?;
    match &state.navigation {
        Some(url) => info!(movement_id = %state.form.movement_id, %url, "Reservation created"),
        None => info!(phase = %state.phase, error = ?state.header_error, "Reservation not created"),
    }

    screen.destroy();

    Ok(())
}
