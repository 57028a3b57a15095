pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The source revision, if `ROSTER_REVISION` was set when building.
pub const REVISION: Option<&str> = option_env!("ROSTER_REVISION");

pub const BUILD_TIMESTAMP: Option<&str> = option_env!("BUILD_TIMESTAMP");
