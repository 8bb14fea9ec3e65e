#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use pickup_calendar::{PickupConfig, PickupRules, http_api, logging};

    logging::init();

    let addr: SocketAddr = std::env::var("PICKUP_CALENDAR_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("PICKUP_CALENDAR_CONFIG") {
        Ok(path) => PickupConfig::from_json_file(path)?,
        Err(_) => PickupConfig::default(),
    };
    let rules = PickupRules::new(config);

    #[cfg(feature = "sqlite")]
    let state = {
        use pickup_calendar::{CalendarStore, SqliteCalendarStore};
        use std::sync::Arc;

        let db_path = std::env::var("PICKUP_CALENDAR_DB")
            .unwrap_or_else(|_| "pickup-calendar.db".to_string());
        let store = Arc::new(SqliteCalendarStore::new(&db_path)?);
        let calendar = store.load_calendar()?;
        tracing::info!(%db_path, overrides = calendar.overrides().len(), "calendar loaded");
        http_api::AppState::new(calendar, rules).with_store(store)
    };

    #[cfg(not(feature = "sqlite"))]
    let state = http_api::AppState::new(pickup_calendar::BakeryCalendar::default(), rules);

    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
