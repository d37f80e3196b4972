use mongodb::options::{Acknowledgment, ReadPreference, ReadPreferenceOptions, TagSet, WriteConcern};
use std::{fmt, str::FromStr, time::Duration};

use super::properties::{MongoProp, MongoProperties};
use crate::utils::error::{MongoDbError, MongoResult};

/// Read preferences that can be selected by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedReadPreference {
  Primary,
  PrimaryPreferred,
  Secondary,
  SecondaryPreferred,
  Nearest,
}

impl NamedReadPreference {
  pub const ALL: [NamedReadPreference; 5] = [
    NamedReadPreference::Primary,
    NamedReadPreference::PrimaryPreferred,
    NamedReadPreference::Secondary,
    NamedReadPreference::SecondaryPreferred,
    NamedReadPreference::Nearest,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      NamedReadPreference::Primary => "primary",
      NamedReadPreference::PrimaryPreferred => "primaryPreferred",
      NamedReadPreference::Secondary => "secondary",
      NamedReadPreference::SecondaryPreferred => "secondaryPreferred",
      NamedReadPreference::Nearest => "nearest",
    }
  }

  /// Everything except `primary` can be narrowed down by tag sets.
  pub fn is_taggable(&self) -> bool {
    *self != NamedReadPreference::Primary
  }

  /// Builds the driver preference. Tag sets are kept in the given order: the
  /// first one is tried first, the others are fallbacks.
  pub fn preference(&self, tag_sets: Vec<TagSet>) -> ReadPreference {
    let mut options = ReadPreferenceOptions::default();
    if !tag_sets.is_empty() {
      options.tag_sets = Some(tag_sets);
    }
    match self {
      NamedReadPreference::Primary => ReadPreference::Primary,
      NamedReadPreference::PrimaryPreferred => ReadPreference::PrimaryPreferred { options },
      NamedReadPreference::Secondary => ReadPreference::Secondary { options },
      NamedReadPreference::SecondaryPreferred => ReadPreference::SecondaryPreferred { options },
      NamedReadPreference::Nearest => ReadPreference::Nearest { options },
    }
  }
}

impl FromStr for NamedReadPreference {
  type Err = MongoDbError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    NamedReadPreference::ALL
      .into_iter()
      .find(|p| p.name().eq_ignore_ascii_case(s))
      .ok_or_else(|| MongoDbError::UnknownReadPreference(s.to_string()))
  }
}

impl fmt::Display for NamedReadPreference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Driver options resolved from [`MongoProperties`]. Built once, never mutated.
#[derive(Clone, Debug)]
pub struct ConnectionOptions {
  pub connect_timeout: Option<Duration>,
  pub socket_timeout: Option<Duration>,
  pub read_preference: Option<ReadPreference>,
  pub write_concern: WriteConcern,
}

impl ConnectionOptions {
  pub fn from_properties(props: &MongoProperties) -> MongoResult<Self> {
    let connect_timeout = parse_timeout(props, MongoProp::ConnectTimeout)?;
    let socket_timeout = parse_timeout(props, MongoProp::SocketTimeout)?;
    let tag_sets = parse_tag_sets(&props.tag_sets)?;
    let read_preference = resolve_read_preference(props.get(MongoProp::ReadPreference), &props.tag_sets, tag_sets)?;
    let write_concern = resolve_write_concern(
      props.get(MongoProp::WriteConcern),
      props.get(MongoProp::WriteTimeout),
      props.flag(MongoProp::Journaled),
    )?;

    Ok(Self {
      connect_timeout,
      socket_timeout,
      read_preference,
      write_concern,
    })
  }
}

/// Milliseconds; values `<= 0` mean no timeout.
fn parse_timeout(props: &MongoProperties, prop: MongoProp) -> MongoResult<Option<Duration>> {
  match props.get(prop) {
    Some(value) => {
      let millis = value.parse::<i64>().map_err(|e| MongoDbError::InvalidNumber(prop, value.to_string(), e))?;
      Ok((millis > 0).then(|| Duration::from_millis(millis as u64)))
    }
    None => Ok(None),
  }
}

pub fn parse_tag_sets(raw: &[String]) -> MongoResult<Vec<TagSet>> {
  raw
    .iter()
    .map(|s| serde_json::from_str::<TagSet>(s.trim()).map_err(|e| MongoDbError::MalformedTagSet(s.clone(), e)))
    .collect()
}

fn resolve_read_preference(name: Option<&str>, raw_tag_sets: &[String], tag_sets: Vec<TagSet>) -> MongoResult<Option<ReadPreference>> {
  info!("Using read preference {}", name.unwrap_or(NamedReadPreference::Primary.name()));

  let named = match name {
    Some(name) => name.parse::<NamedReadPreference>()?,
    None => {
      if !tag_sets.is_empty() {
        debug!("Ignoring read preference tag sets, no read preference specified");
      }
      return Ok(None);
    }
  };

  if tag_sets.is_empty() {
    info!("No read preference tag sets defined");
  } else if named.is_taggable() {
    info!("Using read preference tag sets {}", raw_tag_sets.join(" "));
  }

  let tag_sets = if named.is_taggable() { tag_sets } else { Vec::new() };
  Ok(Some(named.preference(tag_sets)))
}

pub fn resolve_write_concern(concern: Option<&str>, w_timeout: Option<&str>, journaled: bool) -> MongoResult<WriteConcern> {
  if concern.is_some() && w_timeout.is_none() && !journaled {
    info!("Configuring connection with default write concern");
    return Ok(WriteConcern::builder().w(Acknowledgment::Nodes(1)).build());
  }

  // Values `<= 0` mean no timeout, like the connect and socket timeouts.
  let millis = match w_timeout {
    Some(value) => value.parse::<i64>().map_err(|e| MongoDbError::InvalidNumber(MongoProp::WriteTimeout, value.to_string(), e))?,
    None => 0,
  };
  let w_timeout = (millis > 0).then(|| Duration::from_millis(millis as u64));

  // A non-numeric value is either "majority" or a custom getLastErrorModes label.
  let w = match concern {
    Some(concern) => match concern.parse::<i64>() {
      Ok(nodes) => u32::try_from(nodes)
        .map(Acknowledgment::Nodes)
        .map_err(|_| MongoDbError::InvalidWriteConcern(concern.to_string()))?,
      Err(_) => Acknowledgment::from(concern.to_string()),
    },
    None => Acknowledgment::Nodes(1),
  };

  info!("Configuring connection with write concern w = {:?}, wTimeout = {}, journaled = {}", w, millis, journaled);
  Ok(WriteConcern::builder().w(w).w_timeout(w_timeout).journal(Some(journaled)).build())
}
