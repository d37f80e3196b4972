pub const MONGO_DEFAULT_PORT: u16 = 27017;
pub const LOCAL_HOST: &str = "localhost";

pub const LOCAL_DB: &str = "local";
pub const REPL_SET_COLLECTION: &str = "system.replset";
pub const REPL_SET_SETTINGS: &str = "settings";
pub const REPL_SET_LAST_ERROR_MODES: &str = "getLastErrorModes";
pub const REPL_SET_MEMBERS: &str = "members";
pub const REPL_SET_MEMBER_TAGS: &str = "tags";
