use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    BakeryCalendar, CalendarOverride, CalendarStore, MonthProjection, PersistenceError,
    PickupError, PickupQuote, PickupRules, ProductCategory, ResolvedDay, WeeklySchedule,
    project_month, project_week, time_format::parse_date,
};

type SharedStore = Arc<dyn CalendarStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    calendar: Arc<RwLock<BakeryCalendar>>,
    rules: Arc<PickupRules>,
    store: Option<SharedStore>,
}

impl AppState {
    pub fn new(calendar: BakeryCalendar, rules: PickupRules) -> Self {
        Self {
            calendar: Arc::new(RwLock::new(calendar)),
            rules: Arc::new(rules),
            store: None,
        }
    }

    /// Write every edit through to `store` as well as the in-memory snapshot.
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Clone of the current calendar, so one request never sees a half-applied edit.
    fn snapshot(&self) -> BakeryCalendar {
        self.calendar.read().clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Rejected(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl From<PickupError> for ApiError {
    fn from(value: PickupError) -> Self {
        ApiError::Rejected(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Rejected(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "pickup_rejected", message)
            }
            ApiError::Internal(message) => {
                warn!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct WeekQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    year: i32,
    month: u32,
}

#[derive(Debug, Deserialize)]
struct EarliestQuery {
    category: Option<String>,
    now: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
struct ValidatePayload {
    category: ProductCategory,
    pickup_date: NaiveDate,
    now: Option<NaiveDateTime>,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", get(get_schedule).put(update_schedule))
        .route("/overrides", get(list_overrides))
        .route("/overrides/:date", put(put_override).delete(delete_override))
        .route("/calendar/week", get(week_view))
        .route("/calendar/month", get(month_view))
        .route("/pickup/earliest", get(earliest_pickup))
        .route("/pickup/validate", post(validate_pickup))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "pickup calendar HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_schedule(State(state): State<AppState>) -> Json<WeeklySchedule> {
    Json(state.calendar.read().schedule().clone())
}

async fn update_schedule(
    State(state): State<AppState>,
    Json(schedule): Json<WeeklySchedule>,
) -> Result<Json<WeeklySchedule>, ApiError> {
    if let Some(store) = &state.store {
        store.save_schedule(&schedule)?;
    }
    state.calendar.write().set_schedule(schedule.clone());
    info!("default weekly schedule updated");
    Ok(Json(schedule))
}

async fn list_overrides(State(state): State<AppState>) -> Json<Vec<CalendarOverride>> {
    Json(state.calendar.read().overrides().to_records())
}

async fn put_override(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(ov): Json<CalendarOverride>,
) -> Result<Json<CalendarOverride>, ApiError> {
    let date = parse_date(&date).map_err(|err| ApiError::invalid(err.to_string()))?;
    if ov.date != date {
        return Err(ApiError::invalid(
            "override date in payload does not match path parameter",
        ));
    }
    if let Some(store) = &state.store {
        store.upsert_override(&ov)?;
    }
    state.calendar.write().upsert_override(ov.clone());
    info!(%date, closed = ov.is_closed, "calendar override saved");
    Ok(Json(ov))
}

async fn delete_override(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<StatusCode, ApiError> {
    let date = parse_date(&date).map_err(|err| ApiError::invalid(err.to_string()))?;
    if let Some(store) = &state.store {
        store.delete_override(date)?;
    }
    let removed = state.calendar.write().remove_override(date);
    if removed.is_none() {
        return Err(ApiError::NotFound(format!("no override for {date}")));
    }
    info!(%date, "calendar override removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn week_view(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Json<Vec<ResolvedDay>> {
    let date = query.date.unwrap_or_else(|| local_now().date());
    Json(project_week(date, &state.snapshot()))
}

async fn month_view(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthProjection>, ApiError> {
    let month = project_month(query.year, query.month, &state.snapshot())
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    Ok(Json(month))
}

async fn earliest_pickup(
    State(state): State<AppState>,
    Query(query): Query<EarliestQuery>,
) -> Json<PickupQuote> {
    let category = query
        .category
        .as_deref()
        .map(ProductCategory::from_name)
        .unwrap_or_default();
    let now = query.now.unwrap_or_else(local_now);
    Json(state.rules.quote(&state.snapshot(), category, now))
}

async fn validate_pickup(
    State(state): State<AppState>,
    Json(payload): Json<ValidatePayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let now = payload.now.unwrap_or_else(local_now);
    state.rules.validate_pickup_date(
        &state.snapshot(),
        payload.category,
        payload.pickup_date,
        now,
    )?;
    Ok(Json(json!({
        "status": "ok",
        "pickup_date": payload.pickup_date,
    })))
}
