pub mod error;
mod events;
pub mod utils;

pub use events::*;
