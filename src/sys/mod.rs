//! System Definitions (ABI).
//!
//! Tipos e códigos de erro que atravessam a fronteira entre o núcleo de
//! escalonamento e o resto do kernel.

pub mod error;
pub mod types;

pub use error::Errno;
pub use types::Pid;
