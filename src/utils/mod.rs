//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constants, the persistence port, the event bus and logging setup.

pub mod constants;
pub mod events;
pub mod logging;
pub mod store;

pub use constants::*;
pub use events::*;
pub use logging::*;
pub use store::*;
