use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chrono_tz::Tz;
use clap::Parser;
use include_dir::{include_dir, Dir};
use reqwest::{Client, Url};
use time::OffsetDateTime;
use tracing::{error, info};
use tracing_subscriber::prelude::*;

use nltu_schedule::{NominatorParity, ScheduleRepository, Schedules, Source};

use crate::routes::{router, AppState};

mod clock;
mod document;
mod error;
mod routes;

static DATA: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/data");

#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Args {
  #[arg(long, short, env = "NLTU_SCHEDULE_LISTEN", default_value = "127.0.0.1:8080")]
  listen: SocketAddr,
  #[arg(
    long,
    short = 'u',
    env = "NLTU_SCHEDULE_PUBLIC_URL",
    default_value = "http://localhost:8080/"
  )]
  public_url: Url,
  /// File or http(s) URL of the students schedule, bundled data if missing
  #[arg(long, short, env = "NLTU_SCHEDULE_STUDENTS")]
  students: Option<Source>,
  /// File or http(s) URL of the teachers schedule, bundled data if missing
  #[arg(long, short, env = "NLTU_SCHEDULE_TEACHERS")]
  teachers: Option<Source>,
  /// ISO week parity of nominator weeks: odd or even
  #[arg(long, env = "NLTU_SCHEDULE_NOMINATOR_PARITY", default_value = "odd")]
  nominator_parity: NominatorParity,
  /// IANA time zone used to decide what "today" is
  #[arg(long, env = "NLTU_SCHEDULE_TIMEZONE", default_value = "Europe/Kyiv")]
  timezone: Tz,
  #[arg(long, env = "NLTU_SCHEDULE_TITLE", default_value = "Розклад НЛТУ")]
  title: String,
  #[arg(long, env = "NLTU_SCHEDULE_SENTRY_DSN")]
  sentry_dsn: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  let _sentry = sentry::init(sentry::ClientOptions {
    dsn: args
      .sentry_dsn
      .as_deref()
      .map(str::parse::<sentry::types::Dsn>)
      .transpose()?,
    release: sentry::release_name!(),
    ..Default::default()
  });

  tracing_subscriber::registry()
    .with(tracing_subscriber::fmt::layer())
    .with(sentry_tracing::layer())
    .init();

  if let Err(err) = serve(args).await {
    error!("Unable to serve schedules: {:#}", err);
    sentry::integrations::anyhow::capture_anyhow(&err);
    return Err(err);
  }

  Ok(())
}

async fn serve(args: Args) -> anyhow::Result<()> {
  let client = Client::new();
  let schedules = Schedules::new(
    load(args.students.as_ref(), "students.json", &client).await?,
    load(args.teachers.as_ref(), "teachers.json", &client).await?,
  );

  let state = AppState {
    schedules: Arc::new(schedules),
    public_url: args.public_url,
    title: args.title,
    parity: args.nominator_parity,
    timezone: args.timezone,
    clock: OffsetDateTime::now_utc,
  };

  let listener = tokio::net::TcpListener::bind(args.listen).await?;
  info!("Listening on {} ({})", args.listen, args.timezone);

  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown())
    .await?;

  info!("Shut down");
  Ok(())
}

async fn load(
  source: Option<&Source>,
  bundled: &str,
  client: &Client,
) -> anyhow::Result<ScheduleRepository> {
  match source {
    Some(source) => source.load(client).await,
    None => {
      let file = DATA
        .get_file(bundled)
        .with_context(|| format!("Missing bundled {bundled}"))?;
      let repository = ScheduleRepository::from_slice(file.contents())
        .with_context(|| format!("Unable to load bundled {bundled}"))?;
      info!("Loaded {} bundled schedules from {}", repository.len(), bundled);
      Ok(repository)
    }
  }
}

async fn shutdown() {
  if let Err(err) = tokio::signal::ctrl_c().await {
    error!("Unable to listen for shutdown signal: {}", err);
  }
}
