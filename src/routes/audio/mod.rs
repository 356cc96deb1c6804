mod handler;
mod model;

pub use handler::{AUDIO_CACHE_HEADER, cache_stats, clear_cache, speak};
