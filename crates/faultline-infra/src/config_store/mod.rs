//! Configuration stores - in-memory, process environment and Redis.

mod env;
mod memory;

#[cfg(feature = "redis")]
mod redis;

pub use env::EnvConfigStore;
pub use memory::InMemoryConfigStore;

#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisConfigStore};
