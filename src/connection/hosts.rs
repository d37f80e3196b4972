use mongodb::options::ServerAddress;

use crate::utils::{
  constants::{LOCAL_HOST, MONGO_DEFAULT_PORT},
  error::{MongoDbError, MongoResult},
};

/// How the driver should be pointed at the parsed endpoints.
#[derive(Clone, Debug, PartialEq)]
pub enum Topology {
  /// Talk to a single standalone server only.
  Direct(ServerAddress),
  /// Seed list; the driver discovers the remaining replica set or mongos members.
  Discover(Vec<ServerAddress>),
}

/// Parses a comma separated `host[:port]` list. Hosts without their own port
/// use `shared_port` when it parses, otherwise the default MongoDB port.
pub fn parse_hosts(hosts: &str, shared_port: Option<&str>) -> MongoResult<Vec<ServerAddress>> {
  let hosts = hosts.trim();
  if hosts.is_empty() {
    return Err(MongoDbError::EmptyHosts);
  }

  // An unparsable shared port is not an error, hosts fall back to the default.
  let default_port = shared_port.and_then(|p| p.trim().parse::<u16>().ok()).unwrap_or(MONGO_DEFAULT_PORT);

  hosts.split(',').map(|part| parse_host(part, default_port)).collect()
}

fn parse_host(part: &str, default_port: u16) -> MongoResult<ServerAddress> {
  let segments: Vec<&str> = part.trim().split(':').collect();
  if segments.len() > 2 {
    return Err(MongoDbError::MalformedHost(part.to_string()));
  }

  let host = segments[0].trim();
  if host.is_empty() {
    return Err(MongoDbError::MalformedHost(part.to_string()));
  }

  let port = match segments.get(1).map(|p| p.trim()).filter(|p| !p.is_empty()) {
    Some(p) => p.parse::<u16>().map_err(|e| MongoDbError::MalformedPort(p.to_string(), e))?,
    None => default_port,
  };

  Ok(ServerAddress::Tcp {
    host: host.to_string(),
    port: Some(port),
  })
}

pub fn select_topology(mut endpoints: Vec<ServerAddress>, use_all_replica_set_members: bool) -> Topology {
  if endpoints.len() > 1 || (use_all_replica_set_members && !endpoints.is_empty()) {
    Topology::Discover(endpoints)
  } else {
    match endpoints.pop() {
      Some(endpoint) => Topology::Direct(endpoint),
      None => Topology::Direct(ServerAddress::Tcp {
        host: LOCAL_HOST.to_string(),
        port: Some(MONGO_DEFAULT_PORT),
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn addr(host: &str, port: u16) -> ServerAddress {
    ServerAddress::Tcp {
      host: host.to_string(),
      port: Some(port),
    }
  }

  #[test]
  fn test_parse_hosts_keeps_order_and_ports() {
    let endpoints = parse_hosts("db1:27018, db2 ,db3:30000", None).unwrap();
    assert_eq!(endpoints, vec![addr("db1", 27018), addr("db2", MONGO_DEFAULT_PORT), addr("db3", 30000)]);
  }

  #[test]
  fn test_parse_hosts_shared_port() {
    let endpoints = parse_hosts("db1,db2:4000", Some("5000")).unwrap();
    assert_eq!(endpoints, vec![addr("db1", 5000), addr("db2", 4000)]);
  }

  #[test]
  fn test_parse_hosts_ignores_bad_shared_port() {
    let endpoints = parse_hosts("db1", Some("not-a-port")).unwrap();
    assert_eq!(endpoints, vec![addr("db1", MONGO_DEFAULT_PORT)]);
  }

  #[test]
  fn test_parse_hosts_empty_port_segment_uses_default() {
    let endpoints = parse_hosts("db1:", Some("5000")).unwrap();
    assert_eq!(endpoints, vec![addr("db1", 5000)]);
  }

  #[test]
  fn test_parse_hosts_rejects_extra_colon() {
    let err = parse_hosts("db1:27017:1", None).unwrap_err();
    assert!(matches!(err, MongoDbError::MalformedHost(part) if part == "db1:27017:1"));
  }

  #[test]
  fn test_parse_hosts_rejects_non_numeric_port() {
    let err = parse_hosts("db1,db2:abc", None).unwrap_err();
    assert!(matches!(err, MongoDbError::MalformedPort(port, _) if port == "abc"));
  }

  #[test]
  fn test_parse_hosts_rejects_empty() {
    assert!(matches!(parse_hosts("   ", None), Err(MongoDbError::EmptyHosts)));
    assert!(matches!(parse_hosts("db1,,db2", None), Err(MongoDbError::MalformedHost(_))));
  }

  #[test]
  fn test_select_topology() {
    assert_eq!(select_topology(vec![addr("db1", 1)], false), Topology::Direct(addr("db1", 1)));
    assert_eq!(select_topology(vec![addr("db1", 1)], true), Topology::Discover(vec![addr("db1", 1)]));
    assert_eq!(
      select_topology(vec![addr("db1", 1), addr("db2", 2)], false),
      Topology::Discover(vec![addr("db1", 1), addr("db2", 2)])
    );
    assert_eq!(select_topology(Vec::new(), true), Topology::Direct(addr(LOCAL_HOST, MONGO_DEFAULT_PORT)));
  }
}
