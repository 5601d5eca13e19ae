pub use calendar::{
  is_day_available, is_nominator_week, is_weekend, iso_week_number, resolve_relative_day,
  week_kind, DaySelector, NominatorParity, RelativeDay, WeekKind, Weekday, WEEKDAYS,
};
pub use repository::{ScheduleKind, ScheduleRepository, Schedules, Source};
pub use timetable::filter::filter_by_subgroup;
pub use timetable::{DayEvent, DaySchedule, ScheduleEntry, ScheduleSlot, SubEvent, Timetable};
pub use view::{Effect, ViewController, ViewSelection};

pub mod calendar;
pub mod repository;
#[cfg(test)]
mod test;
pub mod timetable;
pub mod view;
