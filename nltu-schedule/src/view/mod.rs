use reqwest::Url;
use time::Date;
use tracing::{debug, warn};

use crate::calendar::{is_day_available, DaySelector, Weekday};
use crate::repository::{ScheduleKind, ScheduleRepository, Schedules};
use crate::timetable::filter::filter_by_subgroup;
use crate::timetable::{DaySchedule, ScheduleEntry, Timetable};
use crate::view::query::{QueryParams, DAY, GROUP, KIND, SUBGROUP};

pub mod query;

/// What the user is looking at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewSelection {
  pub kind: ScheduleKind,
  pub entity: Option<String>,
  pub subgroup: Option<String>,
  pub day: Option<DaySelector>,
}

/// Side effects for the page, in the order they have to be applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
  ReplaceUrl(Url),
  SetTitle(String),
  ScrollTo(Weekday),
  ClearScroll,
}

/// Keeps a [`ViewSelection`] and the page location in sync.
///
/// A controller only exists after [`ViewController::hydrate`] ran, so the
/// initial scroll happens exactly once.
pub struct ViewController<'a> {
  schedules: &'a Schedules,
  base_title: String,
  today: Date,
  location: Url,
  params: QueryParams,
  selection: ViewSelection,
  entry: Option<&'a ScheduleEntry>,
  filtered: Option<Timetable>,
}

impl<'a> ViewController<'a> {
  pub fn hydrate(
    schedules: &'a Schedules,
    location: Url,
    base_title: impl Into<String>,
    today: Date,
  ) -> (Self, Vec<Effect>) {
    let params = QueryParams::from_url(&location);
    let mut controller = Self {
      schedules,
      base_title: base_title.into(),
      today,
      location,
      params,
      selection: ViewSelection::default(),
      entry: None,
      filtered: None,
    };

    controller.hydrate_kind();
    controller.hydrate_entity();
    controller.hydrate_subgroup();
    controller.hydrate_day();

    let mut effects = Vec::new();
    let before = controller.location.clone();
    controller.commit();
    if controller.location != before {
      effects.push(Effect::ReplaceUrl(controller.location.clone()));
    }
    effects.push(Effect::SetTitle(controller.title().to_string()));
    effects.extend(controller.scroll_target().map(Effect::ScrollTo));

    debug!("Hydrated {:?}", controller.selection);

    (controller, effects)
  }

  fn hydrate_kind(&mut self) {
    let Some(raw) = self.params.get(KIND) else {
      return;
    };

    match raw.parse::<ScheduleKind>() {
      Ok(kind) => self.selection.kind = kind,
      Err(err) => {
        warn!("Ignoring schedule kind: {}", err);
        self.params.remove(KIND);
      }
    }
  }

  fn hydrate_entity(&mut self) {
    if let Some(name) = self.params.get(GROUP).map(str::to_string) {
      self.load_entity(Some(name));
    }
  }

  fn hydrate_subgroup(&mut self) {
    let Some(name) = self.params.get(SUBGROUP).map(str::to_string) else {
      return;
    };

    if !self.apply_subgroup(Some(name)) {
      self.params.remove(SUBGROUP);
    }
  }

  fn hydrate_day(&mut self) {
    let Some(raw) = self.params.get(DAY) else {
      return;
    };

    match raw.parse::<DaySelector>() {
      Ok(day) => self.selection.day = Some(day),
      Err(err) => {
        warn!("Ignoring day: {}", err);
        self.params.remove(DAY);
      }
    }
  }

  pub fn set_schedule_kind(&mut self, kind: ScheduleKind) -> Vec<Effect> {
    if self.selection.kind == kind {
      return Vec::new();
    }

    debug!("Switching to {} schedules", kind);

    self.selection = ViewSelection {
      kind,
      ..ViewSelection::default()
    };
    self.entry = None;
    self.filtered = None;

    self.params.clear();
    self.params.set(KIND, kind.as_str());
    self.commit();

    vec![
      Effect::ReplaceUrl(self.location.clone()),
      Effect::SetTitle(self.title().to_string()),
      Effect::ClearScroll,
    ]
  }

  pub fn set_entity(&mut self, name: Option<&str>) -> Vec<Effect> {
    debug!("Selecting entity {:?}", name);

    self.load_entity(name.map(str::to_string));
    self.selection.day = None;

    match name {
      Some(name) => self.params.set(GROUP, name),
      None => self.params.remove(GROUP),
    }
    self.params.remove(SUBGROUP);
    self.params.remove(DAY);
    self.commit();

    vec![
      Effect::ReplaceUrl(self.location.clone()),
      Effect::SetTitle(self.title().to_string()),
      Effect::ClearScroll,
    ]
  }

  pub fn set_subgroup(&mut self, name: Option<&str>) -> Vec<Effect> {
    debug!("Selecting subgroup {:?}", name);

    self.apply_subgroup(name.map(str::to_string));
    self.selection.day = None;

    match &self.selection.subgroup {
      Some(name) => self.params.set(SUBGROUP, name),
      None => self.params.remove(SUBGROUP),
    }
    self.params.remove(DAY);
    self.commit();

    vec![
      Effect::ReplaceUrl(self.location.clone()),
      Effect::SetTitle(self.title().to_string()),
      Effect::ClearScroll,
    ]
  }

  pub fn set_day(&mut self, day: Option<DaySelector>) -> Vec<Effect> {
    debug!("Selecting day {:?}", day);

    self.selection.day = day;
    match day {
      Some(day) => self.params.set(DAY, day.label()),
      None => self.params.remove(DAY),
    }
    self.commit();

    let mut effects = vec![Effect::ReplaceUrl(self.location.clone())];
    match day {
      Some(_) => effects.extend(self.scroll_target().map(Effect::ScrollTo)),
      None => effects.push(Effect::ClearScroll),
    }
    effects
  }

  /// Link to the current view scrolled to `day`.
  pub fn day_link(&self, day: Weekday) -> Url {
    let mut params = self.params.clone();
    params.set(DAY, day.label());
    params.normalize();

    let mut url = self.location.clone();
    params.apply_to(&mut url);
    url
  }

  pub fn selection(&self) -> &ViewSelection {
    &self.selection
  }

  pub fn location(&self) -> &Url {
    &self.location
  }

  pub fn today(&self) -> Date {
    self.today
  }

  pub fn repository(&self) -> &'a ScheduleRepository {
    self.schedules.get(self.selection.kind)
  }

  pub fn entry(&self) -> Option<&'a ScheduleEntry> {
    self.entry
  }

  /// The timetable to show, narrowed to the selected subgroup if any.
  pub fn timetable(&self) -> Option<&[DaySchedule]> {
    match (&self.filtered, self.entry) {
      (Some(filtered), _) => Some(filtered.as_slice()),
      (None, Some(entry)) => Some(entry.timetable.as_slice()),
      (None, None) => None,
    }
  }

  pub fn title(&self) -> &str {
    self
      .selection
      .subgroup
      .as_deref()
      .or(self.selection.entity.as_deref())
      .unwrap_or(&self.base_title)
  }

  /// The selected day as a weekday, resolved against today.
  pub fn resolved_day(&self) -> Option<Weekday> {
    self.selection.day?.resolve(self.today)
  }

  fn scroll_target(&self) -> Option<Weekday> {
    let day = self.selection.day?;
    let timetable = self.timetable()?;

    if is_day_available(day, timetable, self.today) {
      day.resolve(self.today)
    } else {
      None
    }
  }

  fn load_entity(&mut self, name: Option<String>) {
    let repository = self.schedules.get(self.selection.kind);
    self.entry = name.as_deref().and_then(|name| repository.get(name));
    if let (Some(name), None) = (&name, self.entry) {
      debug!("No {} schedule named {:?}", self.selection.kind, name);
    }

    self.selection.entity = name;
    self.selection.subgroup = None;
    self.filtered = None;
  }

  /// Derives the filtered timetable from the unfiltered one. Returns `false`
  /// if the subgroup is unknown to the selected entity.
  fn apply_subgroup(&mut self, name: Option<String>) -> bool {
    self.selection.subgroup = None;
    self.filtered = None;

    let Some(name) = name else {
      return true;
    };

    let entry = match self.entry {
      Some(entry) => entry,
      None => {
        warn!("Ignoring subgroup {:?} without a known entity", name);
        return false;
      }
    };

    match entry.subgroup_index(&name) {
      Some(index) => {
        self.filtered = Some(filter_by_subgroup(&entry.timetable, index));
        self.selection.subgroup = Some(name);
        true
      }
      None => {
        warn!("{} has no subgroup {:?}", entry.name, name);
        false
      }
    }
  }

  fn commit(&mut self) {
    self.params.normalize();
    self.params.apply_to(&mut self.location);
  }
}
