mod create_admin;
mod init;
mod stats;

pub use create_admin::cmd_create_admin;
pub use init::cmd_init;
pub use stats::cmd_stats;
