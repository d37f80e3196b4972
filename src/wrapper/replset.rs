use mongodb::{
  bson::{Bson, Document},
  options::TagSet,
};
use std::collections::BTreeSet;

use crate::utils::constants::{REPL_SET_LAST_ERROR_MODES, REPL_SET_MEMBERS, REPL_SET_MEMBER_TAGS, REPL_SET_SETTINGS};

/// Names of the custom `settings.getLastErrorModes` in a replica set config.
/// Missing levels simply yield no modes.
pub fn extract_last_error_modes(config: Option<&Document>) -> Vec<String> {
  config
    .and_then(|c| c.get_document(REPL_SET_SETTINGS).ok())
    .and_then(|settings| settings.get_document(REPL_SET_LAST_ERROR_MODES).ok())
    .map(|modes| modes.keys().cloned().collect())
    .unwrap_or_default()
}

/// Member documents of a replica set config, empty for standalone deployments.
pub fn member_records(config: Option<Document>) -> Vec<Document> {
  let members = match config {
    Some(mut config) => match config.remove(REPL_SET_MEMBERS) {
      Some(Bson::Array(members)) => members,
      _ => Vec::new(),
    },
    None => Vec::new(),
  };

  if members.is_empty() {
    info!("No replica set members defined");
  }

  members
    .into_iter()
    .filter_map(|m| match m {
      Bson::Document(doc) => Some(doc),
      _ => None,
    })
    .collect()
}

/// Every member tag rendered as `"name" : "value"`.
pub fn collect_all_tags(members: &[Document]) -> BTreeSet<String> {
  members
    .iter()
    .filter_map(|m| m.get_document(REPL_SET_MEMBER_TAGS).ok())
    .flat_map(|tags| tags.iter().map(|(name, value)| format!("{} : {}", quote(name), quote(&tag_value(value)))))
    .collect()
}

/// Members satisfying at least one of `tag_sets`. A member satisfies a set
/// when it carries every tag of the set with an identical value. Each member
/// is returned once, in member order.
pub fn members_satisfying_tag_sets<'a>(tag_sets: &[TagSet], members: &'a [Document]) -> Vec<&'a Document> {
  members
    .iter()
    .filter(|m| match m.get_document(REPL_SET_MEMBER_TAGS) {
      Ok(tags) => tag_sets.iter().any(|set| satisfies(tags, set)),
      Err(_) => false,
    })
    .collect()
}

fn satisfies(tags: &Document, tag_set: &TagSet) -> bool {
  tag_set.iter().all(|(name, value)| tags.get(name).map_or(false, |v| tag_value(v) == *value))
}

fn tag_value(value: &Bson) -> String {
  match value {
    Bson::String(s) => s.clone(),
    other => other.to_string(),
  }
}

pub fn quote(s: &str) -> String {
  format!("\"{}\"", s.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
  use super::*;
  use mongodb::bson::doc;

  fn tag_set(pairs: &[(&str, &str)]) -> TagSet {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  fn replset_config() -> Document {
    doc! {
      "_id": "rs0",
      "members": [
        { "_id": 0, "host": "db1:27017", "tags": { "zone": "east", "rack": "1" } },
        { "_id": 1, "host": "db2:27017", "tags": { "zone": "west", "rack": "1" } },
        { "_id": 2, "host": "db3:27017" },
        { "_id": 3, "host": "db4:27017", "tags": { "zone": "east", "rack": "2" } },
      ],
      "settings": {
        "getLastErrorModes": { "multiDC": { "zone": 2 }, "multiRack": { "rack": 2 } }
      }
    }
  }

  fn hosts(members: &[&Document]) -> Vec<String> {
    members.iter().map(|m| m.get_str("host").unwrap().to_string()).collect()
  }

  #[test]
  fn test_extract_last_error_modes() {
    let config = replset_config();
    assert_eq!(extract_last_error_modes(Some(&config)), vec!["multiDC", "multiRack"]);
  }

  #[test]
  fn test_extract_last_error_modes_absent() {
    assert!(extract_last_error_modes(None).is_empty());
    assert!(extract_last_error_modes(Some(&doc! { "_id": "rs0" })).is_empty());
    assert!(extract_last_error_modes(Some(&doc! { "settings": { "chainingAllowed": true } })).is_empty());
  }

  #[test]
  fn test_member_records() {
    assert_eq!(member_records(Some(replset_config())).len(), 4);
    assert!(member_records(None).is_empty());
    assert!(member_records(Some(doc! { "members": [] })).is_empty());
    assert!(member_records(Some(doc! { "members": "none" })).is_empty());
  }

  #[test]
  fn test_collect_all_tags() {
    let members = member_records(Some(replset_config()));
    let tags: Vec<String> = collect_all_tags(&members).into_iter().collect();
    assert_eq!(
      tags,
      vec![r#""rack" : "1""#, r#""rack" : "2""#, r#""zone" : "east""#, r#""zone" : "west""#]
    );
    assert!(collect_all_tags(&member_records(None)).is_empty());
  }

  #[test]
  fn test_quote_escapes() {
    assert_eq!(quote(r#"a"b"#), r#""a\"b""#);
  }

  #[test]
  fn test_tag_set_subset_match() {
    let members = member_records(Some(replset_config()));
    let matched = members_satisfying_tag_sets(&[tag_set(&[("zone", "east")])], &members);
    assert_eq!(hosts(&matched), vec!["db1:27017", "db4:27017"]);

    let matched = members_satisfying_tag_sets(&[tag_set(&[("zone", "east"), ("rack", "2")])], &members);
    assert_eq!(hosts(&matched), vec!["db4:27017"]);
  }

  #[test]
  fn test_tag_sets_or_semantics_without_duplicates() {
    let members = member_records(Some(replset_config()));
    let candidates = vec![tag_set(&[("zone", "east"), ("rack", "1")]), tag_set(&[("zone", "west")]), tag_set(&[("rack", "1")])];
    let matched = members_satisfying_tag_sets(&candidates, &members);
    assert_eq!(hosts(&matched), vec!["db1:27017", "db2:27017"]);
  }

  #[test]
  fn test_tag_values_are_case_sensitive() {
    let members = member_records(Some(replset_config()));
    assert!(members_satisfying_tag_sets(&[tag_set(&[("zone", "East")])], &members).is_empty());
  }

  #[test]
  fn test_identical_members_are_not_merged() {
    let member = doc! { "host": "db1:27017", "tags": { "zone": "east" } };
    let members = vec![member.clone(), member];
    assert_eq!(members_satisfying_tag_sets(&[tag_set(&[("zone", "east")])], &members).len(), 2);
  }
}
