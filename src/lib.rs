pub mod cli;
pub mod menu;

mod error;
mod event;
mod manager;

pub use error::{Error, Result};
pub use event::{Attendee, Event};
pub use manager::EventManager;
