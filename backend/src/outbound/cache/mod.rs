//! Cache adapters implementing the `ProductCache` port.
//!
//! - [`RedisProductCache`]: Redis through a `bb8-redis` pool.
//! - [`DisabledProductCache`]: always misses; used when no Redis is
//!   configured or caching is switched off.

mod disabled;
mod redis_cache;

pub use disabled::DisabledProductCache;
pub use redis_cache::{CacheConfig, CachePool, CachePoolError, RedisProductCache};
