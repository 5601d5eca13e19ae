use std::sync::Arc;

use axum::extract::{Path, RawQuery, Request, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Url;
use sentry::integrations::tower::NewSentryLayer;
use serde::{Deserialize, Serialize};
use chrono_tz::Tz;
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;
use tracing::debug;

use nltu_schedule::{
  DaySelector, Effect, NominatorParity, ScheduleKind, Schedules, ViewController, Weekday,
};

use crate::clock::to_local;
use crate::document::ViewDocument;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
  pub schedules: Arc<Schedules>,
  pub public_url: Url,
  pub title: String,
  pub parity: NominatorParity,
  pub timezone: Tz,
  pub clock: fn() -> OffsetDateTime,
}

impl AppState {
  fn now(&self) -> OffsetDateTime {
    to_local(self.timezone, (self.clock)())
  }

  fn hydrate(
    &self,
    query: Option<String>,
    now: OffsetDateTime,
  ) -> (ViewController<'_>, Vec<Effect>) {
    let mut location = self.public_url.clone();
    location.set_query(query.as_deref().filter(|query| !query.is_empty()));

    ViewController::hydrate(&self.schedules, location, self.title.as_str(), now.date())
  }
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/view", get(view))
    .route("/api/view/:field", post(update))
    .route("/api/link/:day", get(link))
    .layer(TraceLayer::new_for_http())
    .layer(NewSentryLayer::<Request>::new_from_top())
    .with_state(state)
}

#[derive(Serialize)]
struct Health {
  status: &'static str,
}

async fn health() -> Json<Health> {
  Json(Health { status: "ok" })
}

async fn view(
  State(state): State<AppState>,
  RawQuery(query): RawQuery,
) -> Result<Json<ViewDocument>, AppError> {
  let now = state.now();
  let (controller, effects) = state.hydrate(query, now);

  Ok(Json(ViewDocument::new(&controller, &effects, state.parity, now)))
}

#[derive(Deserialize)]
struct Update {
  value: Option<String>,
}

async fn update(
  State(state): State<AppState>,
  Path(field): Path<String>,
  RawQuery(query): RawQuery,
  Json(update): Json<Update>,
) -> Result<Json<ViewDocument>, AppError> {
  let now = state.now();
  let (mut controller, _) = state.hydrate(query, now);
  let value = update.value.as_deref();

  debug!("Updating {} to {:?}", field, value);

  let effects = match field.as_str() {
    "kind" => {
      let kind = value
        .map(str::parse::<ScheduleKind>)
        .transpose()
        .map_err(AppError::bad_request)?
        .unwrap_or_default();
      controller.set_schedule_kind(kind)
    }
    "entity" => controller.set_entity(value),
    "subgroup" => controller.set_subgroup(value),
    "day" => {
      let day = value
        .map(str::parse::<DaySelector>)
        .transpose()
        .map_err(AppError::bad_request)?;
      controller.set_day(day)
    }
    other => {
      return Err(AppError::BadRequest(format!(
        "Unknown field {other:?}, expected kind, entity, subgroup or day"
      )))
    }
  };

  Ok(Json(ViewDocument::new(&controller, &effects, state.parity, now)))
}

#[derive(Serialize)]
struct Link {
  url: String,
}

async fn link(
  State(state): State<AppState>,
  Path(day): Path<String>,
  RawQuery(query): RawQuery,
) -> Result<Json<Link>, AppError> {
  let day = day.parse::<Weekday>().map_err(AppError::bad_request)?;
  let (controller, _) = state.hydrate(query, state.now());

  Ok(Json(Link {
    url: controller.day_link(day).to_string(),
  }))
}
