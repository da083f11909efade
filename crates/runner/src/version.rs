/// Git-derived version (tags included when built from a checkout).
pub const VERSION: &str = env!("GIT_VERSION");
