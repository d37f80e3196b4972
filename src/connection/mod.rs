use mongodb::options::{ClientOptions, SelectionCriteria, ServerAddress};

use crate::utils::{
  constants::{LOCAL_HOST, MONGO_DEFAULT_PORT},
  error::{MongoDbError, MongoResult},
};

pub mod hosts;
pub mod options;
pub mod properties;

pub use hosts::{parse_hosts, select_topology, Topology};
pub use options::{ConnectionOptions, NamedReadPreference};
pub use properties::{MongoProp, MongoProperties};

/// Validated connection settings: where to connect and with which options.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
  endpoints: Vec<ServerAddress>,
  use_all_replica_set_members: bool,
  options: ConnectionOptions,
}

impl ConnectionConfig {
  pub fn from_properties(props: &MongoProperties) -> MongoResult<Self> {
    let hosts = props.get(MongoProp::Host).ok_or(MongoDbError::EmptyHosts)?;
    let endpoints = parse_hosts(hosts, props.get(MongoProp::Port))?;
    let options = ConnectionOptions::from_properties(props)?;

    Ok(Self {
      endpoints,
      use_all_replica_set_members: props.flag(MongoProp::UseAllReplicaSetMembers),
      options,
    })
  }

  pub fn endpoints(&self) -> &[ServerAddress] {
    &self.endpoints
  }

  pub fn options(&self) -> &ConnectionOptions {
    &self.options
  }

  pub fn topology(&self) -> Topology {
    select_topology(self.endpoints.clone(), self.use_all_replica_set_members)
  }

  /// Translates into driver options. Nothing is contacted here; the driver
  /// connects lazily on the first operation.
  pub async fn client_options(&self) -> MongoResult<ClientOptions> {
    // The socket timeout is only settable through a connection string.
    let mut client_options = match self.options.socket_timeout {
      Some(timeout) => {
        let uri = format!("mongodb://{}:{}/?socketTimeoutMS={}", LOCAL_HOST, MONGO_DEFAULT_PORT, timeout.as_millis());
        ClientOptions::parse(uri).await?
      }
      None => ClientOptions::builder().build(),
    };

    match self.topology() {
      Topology::Direct(endpoint) => {
        debug!("Connecting directly to standalone server {}", endpoint);
        client_options.hosts = vec![endpoint];
        client_options.direct_connection = Some(true);
      }
      Topology::Discover(endpoints) => {
        debug!("Connecting to {} seed host(s) with member discovery", endpoints.len());
        client_options.hosts = endpoints;
      }
    }

    client_options.connect_timeout = self.options.connect_timeout;
    client_options.selection_criteria = self.options.read_preference.clone().map(SelectionCriteria::ReadPreference);
    client_options.write_concern = Some(self.options.write_concern.clone());

    Ok(client_options)
  }
}

impl TryFrom<&MongoProperties> for ConnectionConfig {
  type Error = MongoDbError;

  fn try_from(props: &MongoProperties) -> Result<Self, Self::Error> {
    Self::from_properties(props)
  }
}
