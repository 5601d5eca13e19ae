use crate::timetable::{DayEvent, DaySchedule, ScheduleSlot, SubEvent};

/// Narrows a full timetable down to one subgroup.
///
/// Slots that end up without any class for the subgroup are dropped, and so are
/// days that end up without slots. Must only be applied to an unfiltered
/// timetable. An index past the subgroup list counts as "no class".
pub fn filter_by_subgroup(timetable: &[DaySchedule], subgroup: usize) -> Vec<DaySchedule> {
  timetable
    .iter()
    .filter_map(|schedule| {
      let slots = schedule
        .slots
        .iter()
        .filter_map(|slot| filter_slot(slot, subgroup))
        .collect::<Vec<ScheduleSlot>>();

      if slots.is_empty() {
        None
      } else {
        Some(DaySchedule {
          day: schedule.day,
          slots,
        })
      }
    })
    .collect()
}

fn filter_slot(slot: &ScheduleSlot, subgroup: usize) -> Option<ScheduleSlot> {
  let content = match &slot.content {
    DayEvent::Single { text } => DayEvent::Single { text: text.clone() },
    DayEvent::Vertical { subslots } => match subslots.get(subgroup) {
      None | Some(SubEvent::Empty) => return None,
      Some(subslot) => DayEvent::Vertical {
        subslots: vec![subslot.clone()],
      },
    },
    DayEvent::Horizontal { rows } => {
      let rows = rows
        .iter()
        .map(|row| filter_row(row, subgroup))
        .collect::<Vec<SubEvent>>();

      if rows.iter().all(SubEvent::is_empty) {
        return None;
      }

      DayEvent::Horizontal { rows }
    }
  };

  Some(ScheduleSlot {
    time: slot.time.clone(),
    order: slot.order,
    content,
  })
}

fn filter_row(row: &SubEvent, subgroup: usize) -> SubEvent {
  match row {
    SubEvent::Multiple { texts } => match texts.get(subgroup) {
      Some(Some(text)) => SubEvent::Single { text: text.clone() },
      Some(None) | None => SubEvent::Empty,
    },
    other => other.clone(),
  }
}
