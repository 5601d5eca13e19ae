use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use indexmap::IndexMap;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::timetable::{DayEvent, ScheduleEntry, SubEvent};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
  #[default]
  Students,
  Teachers,
}

impl ScheduleKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ScheduleKind::Students => "students",
      ScheduleKind::Teachers => "teachers",
    }
  }
}

impl Display for ScheduleKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ScheduleKind {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "students" => Ok(ScheduleKind::Students),
      "teachers" => Ok(ScheduleKind::Teachers),
      other => Err(anyhow!("Unknown schedule kind {other:?}")),
    }
  }
}

/// Entities keyed by name, in source order. Never mutated after loading.
#[derive(Clone, Debug, Default)]
pub struct ScheduleRepository {
  entries: IndexMap<String, ScheduleEntry>,
}

impl ScheduleRepository {
  pub fn from_slice(data: &[u8]) -> anyhow::Result<Self> {
    let mut entries: IndexMap<String, ScheduleEntry> =
      serde_json::from_slice(data).context("Malformed schedule document")?;

    for (name, entry) in entries.iter_mut() {
      entry.name = name.clone();
      validate(entry).with_context(|| format!("Invalid schedule of {name:?}"))?;
    }

    Ok(Self { entries })
  }

  pub fn get(&self, name: &str) -> Option<&ScheduleEntry> {
    self.entries.get(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

fn validate(entry: &ScheduleEntry) -> anyhow::Result<()> {
  let subgroups = entry.subgroup_names.len();

  for schedule in &entry.timetable {
    for slot in &schedule.slots {
      let at = || format!("{} slot {}", schedule.day, slot.order);

      let widths = match &slot.content {
        DayEvent::Single { .. } => Vec::new(),
        DayEvent::Vertical { subslots } => {
          if subslots.is_empty() {
            return Err(anyhow!("Vertical event without subslots at {}", at()));
          }
          vec![subslots.len()]
        }
        DayEvent::Horizontal { rows } => {
          if rows.is_empty() {
            return Err(anyhow!("Horizontal event without rows at {}", at()));
          }

          let mut widths = Vec::new();
          for row in rows {
            if let SubEvent::Multiple { texts } = row {
              if texts.is_empty() {
                return Err(anyhow!("Multiple event without entries at {}", at()));
              }
              widths.push(texts.len());
            }
          }
          widths
        }
      };

      if subgroups > 0 && widths.iter().any(|width| *width != subgroups) {
        warn!(
          "{} has {} subgroups but {} is split into {:?}",
          entry.name,
          subgroups,
          at(),
          widths
        );
      }
    }
  }

  Ok(())
}

/// Both repositories, selected by [`ScheduleKind`].
#[derive(Clone, Debug, Default)]
pub struct Schedules {
  students: ScheduleRepository,
  teachers: ScheduleRepository,
}

impl Schedules {
  pub fn new(students: ScheduleRepository, teachers: ScheduleRepository) -> Self {
    Self { students, teachers }
  }

  pub fn get(&self, kind: ScheduleKind) -> &ScheduleRepository {
    match kind {
      ScheduleKind::Students => &self.students,
      ScheduleKind::Teachers => &self.teachers,
    }
  }
}

/// Where a schedule document comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
  File(PathBuf),
  Http(Url),
}

impl FromStr for Source {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.starts_with("http://") || s.starts_with("https://") {
      Ok(Source::Http(Url::parse(s)?))
    } else if s.is_empty() {
      Err(anyhow!("Empty schedule source"))
    } else {
      Ok(Source::File(PathBuf::from(s)))
    }
  }
}

impl Display for Source {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Source::File(path) => write!(f, "{}", path.display()),
      Source::Http(url) => write!(f, "{url}"),
    }
  }
}

impl Source {
  pub async fn load(&self, client: &Client) -> anyhow::Result<ScheduleRepository> {
    let data = match self {
      Source::File(path) => tokio::fs::read(path)
        .await
        .with_context(|| format!("Unable to read {}", path.display()))?,
      Source::Http(url) => client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?
        .to_vec(),
    };

    let repository =
      ScheduleRepository::from_slice(&data).with_context(|| format!("Unable to load {self}"))?;
    info!("Loaded {} schedules from {}", repository.len(), self);

    Ok(repository)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const DOCUMENT: &str = r#"{
    "КН-12": {
      "group": "КН-12",
      "subgroups": ["КН-12/1", "КН-12/2"],
      "schedule": [
        {
          "day": "Вівторок",
          "events": [
            { "time": "08:30 - 10:05", "order": 1, "event": { "type": "single", "event": "Фізика" } }
          ]
        }
      ]
    },
    "ІТ-11": {
      "group": "ІТ-11",
      "schedule": []
    },
    "АБ-31": {
      "group": "АБ-31",
      "schedule": []
    }
  }"#;

  #[test]
  fn keeps_source_order() {
    let repository = ScheduleRepository::from_slice(DOCUMENT.as_bytes()).unwrap();

    assert_eq!(
      repository.names().collect::<Vec<_>>(),
      vec!["КН-12", "ІТ-11", "АБ-31"]
    );
    assert_eq!(repository.len(), 3);

    let entry = repository.get("КН-12").unwrap();
    assert_eq!(entry.name, "КН-12");
    assert_eq!(entry.subgroup_names, vec!["КН-12/1", "КН-12/2"]);
    assert_eq!(entry.timetable.len(), 1);

    assert!(repository.get("КН-99").is_none());
  }

  #[test]
  fn rejects_bad_shapes() {
    let unknown = r#"{ "X": { "schedule": [ { "day": "Середа", "events": [
      { "time": "08:30 - 10:05", "order": 1, "event": { "type": "triple" } }
    ] } ] } }"#;
    assert!(ScheduleRepository::from_slice(unknown.as_bytes()).is_err());

    let no_subslots = r#"{ "X": { "schedule": [ { "day": "Середа", "events": [
      { "time": "08:30 - 10:05", "order": 1, "event": { "type": "vertical", "events": [] } }
    ] } ] } }"#;
    let err = ScheduleRepository::from_slice(no_subslots.as_bytes()).unwrap_err();
    assert!(format!("{err:#}").contains("Середа slot 1"));

    let weekend = r#"{ "X": { "schedule": [ { "day": "Субота", "events": [] } ] } }"#;
    assert!(ScheduleRepository::from_slice(weekend.as_bytes()).is_err());

    assert!(ScheduleRepository::from_slice(b"[]").is_err());
  }

  #[test]
  fn select_by_kind() {
    let students = ScheduleRepository::from_slice(DOCUMENT.as_bytes()).unwrap();
    let schedules = Schedules::new(students, ScheduleRepository::default());

    assert_eq!(schedules.get(ScheduleKind::Students).len(), 3);
    assert!(schedules.get(ScheduleKind::Teachers).is_empty());
    assert_eq!("teachers".parse::<ScheduleKind>().unwrap(), ScheduleKind::Teachers);
    assert!("parents".parse::<ScheduleKind>().is_err());
  }

  #[test]
  fn parse_source() {
    assert_eq!(
      "data/students.json".parse::<Source>().unwrap(),
      Source::File(PathBuf::from("data/students.json"))
    );
    assert!(matches!(
      "https://example.com/students.json".parse::<Source>().unwrap(),
      Source::Http(_)
    ));
    assert!("".parse::<Source>().is_err());
  }

  #[tokio::test]
  async fn load_from_file() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("nltu-schedule-{}.json", std::process::id()));
    tokio::fs::write(&path, DOCUMENT).await?;

    let repository = Source::File(path.clone()).load(&Client::new()).await;
    tokio::fs::remove_file(&path).await?;

    assert_eq!(repository?.len(), 3);
    Ok(())
  }
}
