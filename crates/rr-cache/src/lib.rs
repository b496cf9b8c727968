//! `rr-cache` — memoized route results.
//!
//! | Type          | Role                                                    |
//! |---------------|---------------------------------------------------------|
//! | [`RouteKey`]  | `(start, end, algorithm)` cache key                     |
//! | [`RouteCache`]| bounded LRU map behind a reader-writer lock             |
//! | [`CacheStats`]| size / capacity / hit-rate snapshot                     |
//!
//! Only successful results are cached.  The owner of the graph must call
//! [`RouteCache::clear`] whenever the graph is rebuilt.

pub mod cache;


pub use cache::{CacheStats, RouteCache, RouteKey};
