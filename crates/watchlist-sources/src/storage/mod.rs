pub mod store;

pub use store::WatchlistStore;
