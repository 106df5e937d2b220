// Cache module for expiring local storage.
// Stores GitHub API snapshots so a page load can fall back when the network fails.

pub mod expiring;
pub mod paths;
pub mod store;

pub use expiring::{CacheEntry, Clock, DEFAULT_TTL, ExpiringCache, ManualClock, SystemClock};
pub use store::{FileStorage, MemoryStorage, Storage};

/// Cache key for the user profile.
pub const PROFILE_KEY: &str = "githubProfileData";
/// Cache key for the repository snapshot.
pub const REPOS_KEY: &str = "githubReposData";
/// Cache key for the public event list.
pub const ACTIVITY_KEY: &str = "githubActivityData";
