pub mod checklist;
pub mod config;
pub mod error;
pub mod gate;
pub mod health;
pub mod io;
pub mod lock;
pub mod orchestrator;
pub mod paths;
pub mod scaffold;
pub mod state;
pub mod store;
pub mod types;

pub use error::{PhasegateError, Result};
