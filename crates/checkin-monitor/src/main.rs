mod bootstrap;

use anyhow::Result;
use checkin_core::settings::Settings;
use checkin_runtime::{DashboardService, StoreMode};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("checkin-monitor v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Store mode: {}",
        settings.view,
        settings.store_mode
    );

    let mode: StoreMode = settings.store_mode.parse()?;
    let mut service = DashboardService::new(mode);

    for path in &settings.files {
        let receipt = service.upload_file(path)?;
        tracing::info!(
            "Ingested {} rows from {} (previewing {})",
            receipt.row_count,
            path.display(),
            receipt.preview.len()
        );
    }

    match settings.view.as_str() {
        "logs" => print_json(&service.logs())?,
        "analytics" => print_json(&service.analytics())?,
        "time-usage" => print_json(&service.time_usage())?,
        "summary" => print_json(&service.summary())?,
        "status" => print_json(&service.status())?,
        unknown => {
            eprintln!("Unknown view: {}", unknown);
        }
    }

    Ok(())
}

/// Print any serializable view payload as pretty JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
