use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::timetable::DaySchedule;

/// A teaching day. Weekends never carry lessons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
  #[serde(rename = "Понеділок")]
  Monday,
  #[serde(rename = "Вівторок")]
  Tuesday,
  #[serde(rename = "Середа")]
  Wednesday,
  #[serde(rename = "Четвер")]
  Thursday,
  #[serde(rename = "Пятниця", alias = "П'ятниця")]
  Friday,
}

/// Ordered by ISO weekday, `WEEKDAYS[0]` is Monday.
pub const WEEKDAYS: [Weekday; 5] = [
  Weekday::Monday,
  Weekday::Tuesday,
  Weekday::Wednesday,
  Weekday::Thursday,
  Weekday::Friday,
];

impl Weekday {
  pub fn label(self) -> &'static str {
    match self {
      Weekday::Monday => "Понеділок",
      Weekday::Tuesday => "Вівторок",
      Weekday::Wednesday => "Середа",
      Weekday::Thursday => "Четвер",
      Weekday::Friday => "Пятниця",
    }
  }

  /// `None` for saturday and sunday.
  pub fn from_date(date: Date) -> Option<Self> {
    let index = date.weekday().number_days_from_monday() as usize;
    WEEKDAYS.get(index).copied()
  }
}

impl Display for Weekday {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for Weekday {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "Понеділок" => Ok(Weekday::Monday),
      "Вівторок" => Ok(Weekday::Tuesday),
      "Середа" => Ok(Weekday::Wednesday),
      "Четвер" => Ok(Weekday::Thursday),
      "Пятниця" | "П'ятниця" => Ok(Weekday::Friday),
      other => Err(anyhow!("Unknown weekday {other:?}")),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativeDay {
  #[serde(rename = "Сьогодні")]
  Today,
  #[serde(rename = "Завтра")]
  Tomorrow,
}

impl RelativeDay {
  pub fn label(self) -> &'static str {
    match self {
      RelativeDay::Today => "Сьогодні",
      RelativeDay::Tomorrow => "Завтра",
    }
  }
}

/// The `day` a user picked. Relative days stay relative until they are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaySelector {
  Weekday(Weekday),
  Relative(RelativeDay),
}

impl DaySelector {
  pub fn label(self) -> &'static str {
    match self {
      DaySelector::Weekday(day) => day.label(),
      DaySelector::Relative(day) => day.label(),
    }
  }

  pub fn resolve(self, today: Date) -> Option<Weekday> {
    match self {
      DaySelector::Weekday(day) => Some(day),
      DaySelector::Relative(day) => resolve_relative_day(day, today),
    }
  }
}

impl Display for DaySelector {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for DaySelector {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "Сьогодні" => Ok(DaySelector::Relative(RelativeDay::Today)),
      "Завтра" => Ok(DaySelector::Relative(RelativeDay::Tomorrow)),
      other => Ok(DaySelector::Weekday(other.parse()?)),
    }
  }
}

impl From<Weekday> for DaySelector {
  fn from(day: Weekday) -> Self {
    DaySelector::Weekday(day)
  }
}

/// Which ISO week parity is the nominator week.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NominatorParity {
  #[default]
  Odd,
  Even,
}

impl FromStr for NominatorParity {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "odd" => Ok(NominatorParity::Odd),
      "even" => Ok(NominatorParity::Even),
      other => Err(anyhow!("Unknown week parity {other:?}, expected odd or even")),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekKind {
  Nominator,
  Denominator,
}

impl WeekKind {
  pub fn label(self) -> &'static str {
    match self {
      WeekKind::Nominator => "Чисельник",
      WeekKind::Denominator => "Знаменник",
    }
  }

  /// Row of a horizontal slot that belongs to this week.
  pub fn row_index(self) -> usize {
    match self {
      WeekKind::Nominator => 0,
      WeekKind::Denominator => 1,
    }
  }
}

pub fn iso_week_number(date: Date) -> u8 {
  date.iso_week()
}

pub fn is_weekend(date: Date) -> bool {
  Weekday::from_date(date).is_none()
}

/// Weekends already count as the upcoming week.
pub fn is_nominator_week(date: Date, parity: NominatorParity) -> bool {
  let odd = iso_week_number(date) % 2 == 1;
  let nominator = match parity {
    NominatorParity::Odd => odd,
    NominatorParity::Even => !odd,
  };

  nominator != is_weekend(date)
}

pub fn week_kind(date: Date, parity: NominatorParity) -> WeekKind {
  if is_nominator_week(date, parity) {
    WeekKind::Nominator
  } else {
    WeekKind::Denominator
  }
}

pub fn resolve_relative_day(day: RelativeDay, today: Date) -> Option<Weekday> {
  match day {
    RelativeDay::Today => Weekday::from_date(today),
    RelativeDay::Tomorrow => today.next_day().and_then(Weekday::from_date),
  }
}

pub fn is_day_available(day: DaySelector, timetable: &[DaySchedule], today: Date) -> bool {
  match day.resolve(today) {
    Some(day) => timetable.iter().any(|schedule| schedule.day == day),
    None => false,
  }
}
