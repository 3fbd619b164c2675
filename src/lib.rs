pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod store;

pub use domain::*;
pub use store::LedgerStore;
