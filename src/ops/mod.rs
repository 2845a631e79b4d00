pub mod controller;
pub mod state;

pub use controller::Controller;
pub use state::{ListState, Removed};
