//! # Controller Module
//!
//! The search input state machine and its tool surface.
//!
//! ## Key Components
//!
//! - [`input`] - [`SearchInputController`], composing recent searches, suggestions and navigation
//! - [`state`] - Input states, the popover snapshot and controller settings
//! - [`tools`] - Tool implementations returning JSON
//! - [`outputs`] - Output types for tool operations

pub mod input;
pub mod outputs;
pub mod state;
pub mod tools;

pub use input::SearchInputController;
pub use state::{ControllerSettings, InputState, PopoverSnapshot};
pub use tools::SearchTools;
