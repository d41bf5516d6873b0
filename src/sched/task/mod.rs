//! Task management module

pub mod accounting;
pub mod channel;
pub mod context;
pub mod entity;
pub mod resources;
pub mod state;

pub use crate::sys::Pid;
pub use accounting::Accounting;
pub use channel::Channel;
pub use context::Context;
pub use entity::{Task, TaskFlags};
pub use resources::TaskResources;
pub use state::TaskState;
