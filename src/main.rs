use mongo_wrapper::{
  connection::options::parse_tag_sets,
  utils::config::{load_config, parse_args},
  MongoResult, NoAuthClientWrapper,
};

#[macro_use]
extern crate log;

#[tokio::main]
async fn main() {
  let args = parse_args().expect("Missing required option c (config)");
  let config = load_config(args.config).expect("Error parsing config file");
  log4rs::init_file(config.log4rs.location, Default::default()).expect("Failed to initialize log4rs");

  let mut wrapper = NoAuthClientWrapper::new(&config.mongodb).await.expect("Failed to initialize MongoDB client");

  if let Err(e) = inspect(&wrapper, &args.tag_sets).await {
    error!("Inspection failed. Err = {}", e);
  }

  if let Err(e) = wrapper.dispose().await {
    warn!("Failed to close MongoDB client. Err = {}", e);
  }
}

async fn inspect(wrapper: &NoAuthClientWrapper, raw_tag_sets: &[String]) -> MongoResult<()> {
  for db in wrapper.list_database_names().await? {
    println!("{}", db);
    for collection in wrapper.list_collection_names(&db).await? {
      println!("  {}", collection);
    }
  }

  let modes = wrapper.get_last_error_modes().await?;
  debug!("Found {} custom last error modes", modes.len());
  println!("last error modes: [{}]", modes.join(", "));

  let tags: Vec<String> = wrapper.get_all_tags().await?.into_iter().collect();
  println!("replica set tags: [{}]", tags.join(", "));

  if !raw_tag_sets.is_empty() {
    let tag_sets = parse_tag_sets(raw_tag_sets)?;
    for member in wrapper.get_replica_set_members_that_satisfy_tag_sets(&tag_sets).await? {
      println!("matching member: {}", member);
    }
  }

  Ok(())
}
