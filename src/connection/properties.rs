use serde::Deserialize;
use std::fmt;

/// Keys of the connection property set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MongoProp {
  Host,
  Port,
  ConnectTimeout,
  SocketTimeout,
  ReadPreference,
  WriteConcern,
  WriteTimeout,
  Journaled,
  UseAllReplicaSetMembers,
}

impl MongoProp {
  pub fn name(&self) -> &'static str {
    match self {
      MongoProp::Host => "host",
      MongoProp::Port => "port",
      MongoProp::ConnectTimeout => "connect_timeout",
      MongoProp::SocketTimeout => "socket_timeout",
      MongoProp::ReadPreference => "read_preference",
      MongoProp::WriteConcern => "write_concern",
      MongoProp::WriteTimeout => "write_timeout",
      MongoProp::Journaled => "journaled",
      MongoProp::UseAllReplicaSetMembers => "use_all_replica_set_members",
    }
  }
}

impl fmt::Display for MongoProp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Raw, string-valued connection settings as a host application supplies them.
///
/// Every field is optional at this level; validation happens once, when a
/// [`ConnectionConfig`](super::ConnectionConfig) is built from these values.
/// `tag_sets` holds read preference tag sets as JSON objects, e.g.
/// `{"dc": "east", "rack": "1"}`, in preference order.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MongoProperties {
  pub host: Option<String>,
  pub port: Option<String>,
  pub connect_timeout: Option<String>,
  pub socket_timeout: Option<String>,
  pub read_preference: Option<String>,
  #[serde(default)]
  pub tag_sets: Vec<String>,
  pub write_concern: Option<String>,
  pub write_timeout: Option<String>,
  pub journaled: Option<String>,
  pub use_all_replica_set_members: Option<String>,
}

impl MongoProperties {
  pub fn new(hosts: impl Into<String>) -> Self {
    Self {
      host: Some(hosts.into()),
      ..Default::default()
    }
  }

  pub fn with(mut self, prop: MongoProp, value: impl Into<String>) -> Self {
    let value = Some(value.into());
    match prop {
      MongoProp::Host => self.host = value,
      MongoProp::Port => self.port = value,
      MongoProp::ConnectTimeout => self.connect_timeout = value,
      MongoProp::SocketTimeout => self.socket_timeout = value,
      MongoProp::ReadPreference => self.read_preference = value,
      MongoProp::WriteConcern => self.write_concern = value,
      MongoProp::WriteTimeout => self.write_timeout = value,
      MongoProp::Journaled => self.journaled = value,
      MongoProp::UseAllReplicaSetMembers => self.use_all_replica_set_members = value,
    }
    self
  }

  pub fn with_tag_set(mut self, tag_set: impl Into<String>) -> Self {
    self.tag_sets.push(tag_set.into());
    self
  }

  /// Trimmed value of `prop`, `None` when absent or blank.
  pub fn get(&self, prop: MongoProp) -> Option<&str> {
    let value = match prop {
      MongoProp::Host => &self.host,
      MongoProp::Port => &self.port,
      MongoProp::ConnectTimeout => &self.connect_timeout,
      MongoProp::SocketTimeout => &self.socket_timeout,
      MongoProp::ReadPreference => &self.read_preference,
      MongoProp::WriteConcern => &self.write_concern,
      MongoProp::WriteTimeout => &self.write_timeout,
      MongoProp::Journaled => &self.journaled,
      MongoProp::UseAllReplicaSetMembers => &self.use_all_replica_set_members,
    };
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
  }

  /// `true` only for a case-insensitive "true".
  pub fn flag(&self, prop: MongoProp) -> bool {
    self.get(prop).map_or(false, |v| v.eq_ignore_ascii_case("true"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_ignores_blank_values() {
    let props = MongoProperties::new("db1").with(MongoProp::Port, "  ").with(MongoProp::WriteConcern, " 2 ");
    assert_eq!(props.get(MongoProp::Host), Some("db1"));
    assert_eq!(props.get(MongoProp::Port), None);
    assert_eq!(props.get(MongoProp::WriteConcern), Some("2"));
    assert_eq!(props.get(MongoProp::SocketTimeout), None);
  }

  #[test]
  fn test_flag_parsing() {
    let props = MongoProperties::new("db1").with(MongoProp::Journaled, "TRUE").with(MongoProp::UseAllReplicaSetMembers, "yes");
    assert!(props.flag(MongoProp::Journaled));
    assert!(!props.flag(MongoProp::UseAllReplicaSetMembers));
    assert!(!MongoProperties::default().flag(MongoProp::Journaled));
  }
}
