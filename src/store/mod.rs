//! Durable state: threads and posts in SQLite
//!
//! The store is the sole shared mutable resource. Conflicting writes
//! serialize through database constraints and transactions; reads run
//! concurrently on pool connections and never observe a partially
//! applied multi-statement write.

/// Connection handling and SQL operations
pub mod db;

pub use db::{
    connect, connect_memory, create_post, create_thread, delete_thread, get_post, get_thread,
    list_posts, list_threads, run_migrations, wipe_all,
};
