//! CLI subcommand implementations.

pub mod badge;
pub mod events;
pub mod export;
pub mod notify;
pub mod status;
pub mod summary;
pub mod util;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_support;
