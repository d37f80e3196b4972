use config::{Config, ConfigError};
use serde::Deserialize;
use std::env;

use crate::connection::MongoProperties;

pub struct Args {
  pub config: String,
  pub tag_sets: Vec<String>,
}

pub fn parse_args() -> Option<Args> {
  let args: Vec<String> = env::args().collect();

  let mut opts = getopts::Options::new();
  opts.optopt("c", "config", "config file source (basename only, ex: /etc/mongo-inspect/config)", "CONFIG");
  opts.optmulti("t", "tags", "tag set to match replica set members against, as JSON (repeatable)", "TAGSET");

  let matches = match opts.parse(&args[1..]) {
    Ok(m) => m,
    Err(f) => {
      panic!("{}", f.to_string())
    }
  };
  Some(Args {
    config: matches.opt_str("c")?,
    tag_sets: matches.opt_strs("t"),
  })
}

pub fn load_config(path: String) -> Result<GlobalConfig, ConfigError> {
  let config = Config::builder().add_source(config::File::with_name(&path)).build()?;
  config.try_deserialize::<GlobalConfig>()
}

#[derive(Clone, Deserialize)]
pub struct GlobalConfig {
  pub mongodb: MongoProperties,
  pub log4rs: Log4rsConfig,
}

#[derive(Clone, Deserialize)]
pub struct Log4rsConfig {
  pub location: String,
}
