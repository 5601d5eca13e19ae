use reqwest::Url;

pub const GROUP: &str = "group";
pub const SUBGROUP: &str = "subGroup";
pub const DAY: &str = "day";
pub const KIND: &str = "for";

/// Ordered query parameters of a page location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
  pairs: Vec<(String, String)>,
}

impl QueryParams {
  pub fn from_url(url: &Url) -> Self {
    Self {
      pairs: url.query_pairs().into_owned().collect(),
    }
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self
      .pairs
      .iter()
      .find(|(name, _)| name == key)
      .map(|(_, value)| value.as_str())
  }

  /// Replaces the first occurrence in place and drops the others, appends when missing.
  pub fn set(&mut self, key: &str, value: &str) {
    match self.pairs.iter().position(|(name, _)| name == key) {
      Some(index) => {
        self.pairs[index].1 = value.to_string();
        let mut seen = 0;
        self.pairs.retain(|(name, _)| {
          if name != key {
            return true;
          }
          seen += 1;
          seen == 1
        });
      }
      None => self.pairs.push((key.to_string(), value.to_string())),
    }
  }

  pub fn remove(&mut self, key: &str) {
    self.pairs.retain(|(name, _)| name != key);
  }

  pub fn clear(&mut self) {
    self.pairs.clear();
  }

  /// Puts `group`, `subGroup` and `day` first, then any foreign parameters in their
  /// original order, then the schedule kind.
  pub fn normalize(&mut self) {
    let rank = |name: &str| match name {
      GROUP => 0,
      SUBGROUP => 1,
      DAY => 2,
      KIND => 4,
      _ => 3,
    };

    self.pairs.sort_by_key(|(name, _)| rank(name));
  }

  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .pairs
      .iter()
      .map(|(name, value)| (name.as_str(), value.as_str()))
  }

  pub fn apply_to(&self, url: &mut Url) {
    if self.pairs.is_empty() {
      url.set_query(None);
    } else {
      url.query_pairs_mut().clear().extend_pairs(self.pairs());
    }
  }
}
