use serde::Serialize;
use time::OffsetDateTime;

use nltu_schedule::{
  iso_week_number, week_kind, DaySchedule, DaySelector, Effect, NominatorParity, ScheduleKind,
  ViewController, WeekKind, Weekday,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
  pub number: u8,
  pub kind: WeekKind,
  pub label: &'static str,
}

/// Everything a page needs to render the selected timetable.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDocument {
  pub title: String,
  pub location: String,
  pub kind: ScheduleKind,
  pub group: Option<String>,
  pub sub_group: Option<String>,
  pub subgroups: Vec<String>,
  pub names: Vec<String>,
  pub day: Option<DaySelector>,
  pub resolved_day: Option<Weekday>,
  pub scroll_to: Option<Weekday>,
  pub week: Week,
  /// Order of the lesson running right now, if today is in the timetable.
  pub ongoing: Option<u8>,
  pub timetable: Option<Vec<DaySchedule>>,
}

impl ViewDocument {
  pub fn new(
    controller: &ViewController<'_>,
    effects: &[Effect],
    parity: NominatorParity,
    now: OffsetDateTime,
  ) -> Self {
    let selection = controller.selection();
    let timetable = controller.timetable();
    let today = controller.today();
    let kind = week_kind(today, parity);

    let scroll_to = effects.iter().rev().find_map(|effect| match effect {
      Effect::ScrollTo(day) => Some(*day),
      _ => None,
    });

    let ongoing = Weekday::from_date(today).and_then(|weekday| {
      timetable?
        .iter()
        .find(|schedule| schedule.day == weekday)?
        .ongoing(now.time())
        .map(|slot| slot.order)
    });

    Self {
      title: controller.title().to_string(),
      location: controller.location().to_string(),
      kind: selection.kind,
      group: selection.entity.clone(),
      sub_group: selection.subgroup.clone(),
      subgroups: controller
        .entry()
        .map(|entry| entry.subgroup_names.clone())
        .unwrap_or_default(),
      names: controller.repository().names().map(str::to_string).collect(),
      day: selection.day,
      resolved_day: controller.resolved_day(),
      scroll_to,
      week: Week {
        number: iso_week_number(today),
        kind,
        label: kind.label(),
      },
      ongoing,
      timetable: timetable.map(<[DaySchedule]>::to_vec),
    }
  }
}
