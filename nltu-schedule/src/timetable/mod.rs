use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::Time;

use crate::calendar::Weekday;

pub mod filter;

static INTERVAL_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new("^\\s*(\\d{1,2}):(\\d{2})\\s*-\\s*(\\d{1,2}):(\\d{2})\\s*$").unwrap());

pub type Timetable = Vec<DaySchedule>;

/// One group or teacher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
  #[serde(skip_deserializing)]
  pub name: String,
  #[serde(default, rename = "subgroups", skip_serializing_if = "Vec::is_empty")]
  pub subgroup_names: Vec<String>,
  #[serde(rename = "schedule")]
  pub timetable: Timetable,
}

impl ScheduleEntry {
  pub fn subgroup_index(&self, subgroup: &str) -> Option<usize> {
    self.subgroup_names.iter().position(|name| name == subgroup)
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
  pub day: Weekday,
  #[serde(rename = "events")]
  pub slots: Vec<ScheduleSlot>,
}

impl DaySchedule {
  /// The slot running at `now`, start inclusive, end exclusive.
  pub fn ongoing(&self, now: Time) -> Option<&ScheduleSlot> {
    self.slots.iter().find(|slot| match slot.interval() {
      Some((start, end)) => start <= now && now < end,
      None => false,
    })
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
  pub time: String,
  /// Lesson period, starting at 1.
  pub order: u8,
  #[serde(rename = "event")]
  pub content: DayEvent,
}

impl ScheduleSlot {
  /// Parses `"08:30 - 10:05"`.
  pub fn interval(&self) -> Option<(Time, Time)> {
    let captures = INTERVAL_REGEX.captures(&self.time)?;
    let part = |index: usize| captures.get(index)?.as_str().parse::<u8>().ok();

    let start = Time::from_hms(part(1)?, part(2)?, 0).ok()?;
    let end = Time::from_hms(part(3)?, part(4)?, 0).ok()?;

    Some((start, end))
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DayEvent {
  Single {
    #[serde(rename = "event")]
    text: String,
  },
  /// Side by side, one column per subgroup.
  Vertical {
    #[serde(rename = "events")]
    subslots: Vec<SubEvent>,
  },
  /// Stacked rows. Row 0 belongs to the nominator week, row 1 to the denominator.
  Horizontal {
    #[serde(rename = "events")]
    rows: Vec<SubEvent>,
  },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SubEvent {
  Empty,
  Single {
    #[serde(rename = "event")]
    text: String,
  },
  /// One entry per subgroup, `None` where that subgroup has no class.
  Multiple {
    #[serde(rename = "events")]
    texts: Vec<Option<String>>,
  },
}

impl SubEvent {
  pub fn is_empty(&self) -> bool {
    match self {
      SubEvent::Empty => true,
      SubEvent::Single { .. } => false,
      SubEvent::Multiple { texts } => texts.iter().all(Option::is_none),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn slot(time: &str, order: u8) -> ScheduleSlot {
    ScheduleSlot {
      time: time.to_string(),
      order,
      content: DayEvent::Single {
        text: "Фізика".to_string(),
      },
    }
  }

  #[test]
  fn parse_events() {
    let json = r#"{
      "time": "10:20 - 11:55",
      "order": 2,
      "event": {
        "type": "horizontal",
        "events": [
          { "type": "multiple", "events": ["Алгебра", null] },
          { "type": "empty" }
        ]
      }
    }"#;

    let slot: ScheduleSlot = serde_json::from_str(json).unwrap();
    assert_eq!(slot.order, 2);
    assert_eq!(
      slot.content,
      DayEvent::Horizontal {
        rows: vec![
          SubEvent::Multiple {
            texts: vec![Some("Алгебра".to_string()), None],
          },
          SubEvent::Empty,
        ],
      }
    );
  }

  #[test]
  fn reject_unknown_event_type() {
    let json = r#"{ "type": "diagonal", "events": [] }"#;
    assert!(serde_json::from_str::<DayEvent>(json).is_err());

    let json = r#"{ "type": "nothing" }"#;
    assert!(serde_json::from_str::<SubEvent>(json).is_err());
  }

  #[test]
  fn entry_without_subgroups() {
    let json = r#"{ "teacher": "Іваненко І.І.", "schedule": [] }"#;
    let entry: ScheduleEntry = serde_json::from_str(json).unwrap();

    assert!(entry.subgroup_names.is_empty());
    assert_eq!(entry.subgroup_index("1"), None);
  }

  #[test]
  fn slot_interval() {
    let (start, end) = slot("08:30 - 10:05", 1).interval().unwrap();
    assert_eq!(start, Time::from_hms(8, 30, 0).unwrap());
    assert_eq!(end, Time::from_hms(10, 5, 0).unwrap());

    assert_eq!(slot("8:30-10:05", 1).interval().map(|(s, _)| s.hour()), Some(8));
    assert_eq!(slot("пара", 1).interval(), None);
    assert_eq!(slot("25:00 - 26:00", 1).interval(), None);
  }

  #[test]
  fn ongoing_slot() {
    let day = DaySchedule {
      day: Weekday::Monday,
      slots: vec![slot("08:30 - 10:05", 1), slot("10:20 - 11:55", 2)],
    };

    let at = |hour, minute| Time::from_hms(hour, minute, 0).unwrap();

    assert_eq!(day.ongoing(at(8, 30)).map(|slot| slot.order), Some(1));
    assert_eq!(day.ongoing(at(10, 5)), None);
    assert_eq!(day.ongoing(at(11, 0)).map(|slot| slot.order), Some(2));
    assert_eq!(day.ongoing(at(18, 0)), None);
  }

  #[test]
  fn sub_event_emptiness() {
    assert!(SubEvent::Empty.is_empty());
    assert!(SubEvent::Multiple { texts: vec![None, None] }.is_empty());
    assert!(!SubEvent::Multiple {
      texts: vec![None, Some("Хімія".to_string())]
    }
    .is_empty());
  }
}
