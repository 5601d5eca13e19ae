use reqwest::Url;
use time::{Date, Month};

use crate::{
  filter_by_subgroup, week_kind, DayEvent, DaySelector, Effect, NominatorParity, RelativeDay,
  ScheduleKind, ScheduleRepository, Schedules, SubEvent, ViewController, WeekKind, Weekday,
};

fn schedules() -> anyhow::Result<Schedules> {
  Ok(Schedules::new(
    ScheduleRepository::from_slice(include_bytes!("../../nltu-schedule-web/data/students.json"))?,
    ScheduleRepository::from_slice(include_bytes!("../../nltu-schedule-web/data/teachers.json"))?,
  ))
}

fn date(year: i32, month: Month, day: u8) -> Date {
  Date::from_calendar_date(year, month, day).unwrap()
}

#[test]
fn fixture_names() -> anyhow::Result<()> {
  let schedules = schedules()?;

  assert_eq!(
    schedules.get(ScheduleKind::Students).names().collect::<Vec<_>>(),
    vec!["КН-101", "ІПЗ-21"]
  );
  assert_eq!(
    schedules.get(ScheduleKind::Teachers).names().collect::<Vec<_>>(),
    vec!["Іваненко"]
  );

  Ok(())
}

#[test]
fn second_subgroup_loses_vertical_slot() -> anyhow::Result<()> {
  let schedules = schedules()?;
  let entry = schedules.get(ScheduleKind::Students).get("КН-101").unwrap();
  let index = entry.subgroup_index("2").unwrap();

  let filtered = filter_by_subgroup(&entry.timetable, index);
  let monday = filtered.iter().find(|day| day.day == Weekday::Monday).unwrap();

  assert_eq!(monday.slots.len(), 1);
  assert_eq!(monday.slots[0].order, 2);
  assert_eq!(entry.timetable[0].slots.len(), 2);

  Ok(())
}

#[test]
fn first_subgroup_loses_friday() -> anyhow::Result<()> {
  let schedules = schedules()?;
  let entry = schedules.get(ScheduleKind::Students).get("КН-101").unwrap();

  let filtered = filter_by_subgroup(&entry.timetable, 0);
  let days = filtered.iter().map(|day| day.day).collect::<Vec<_>>();
  assert_eq!(days, vec![Weekday::Monday, Weekday::Tuesday]);

  assert_eq!(
    filtered[1].slots[0].content,
    DayEvent::Horizontal {
      rows: vec![
        SubEvent::Single {
          text: "A".to_string()
        },
        SubEvent::Empty
      ],
    }
  );

  Ok(())
}

#[test]
fn browse_session() -> anyhow::Result<()> {
  let schedules = schedules()?;
  // thursday, ISO week 38
  let today = date(2024, Month::September, 19);
  assert_eq!(week_kind(today, NominatorParity::Odd), WeekKind::Denominator);

  let location = Url::parse("https://schedule.example/nltu/")?;
  let (mut controller, effects) = ViewController::hydrate(&schedules, location, "Розклад", today);
  assert_eq!(effects, vec![Effect::SetTitle("Розклад".to_string())]);

  controller.set_schedule_kind(ScheduleKind::Teachers);
  controller.set_entity(Some("Іваненко"));
  let effects = controller.set_day(Some(DaySelector::Relative(RelativeDay::Today)));

  assert_eq!(effects.last(), Some(&Effect::ScrollTo(Weekday::Thursday)));
  assert_eq!(
    controller.location(),
    &Url::parse_with_params(
      "https://schedule.example/nltu/",
      &[("group", "Іваненко"), ("day", "Сьогодні"), ("for", "teachers")],
    )?
  );

  // tomorrow is a friday without lessons
  let effects = controller.set_day(Some(DaySelector::Relative(RelativeDay::Tomorrow)));
  assert_eq!(effects.len(), 1);

  let link = controller.day_link(Weekday::Monday);
  assert_eq!(
    link,
    Url::parse_with_params(
      "https://schedule.example/nltu/",
      &[("group", "Іваненко"), ("day", "Понеділок"), ("for", "teachers")],
    )?
  );

  Ok(())
}
