//! Traits do HAL
//!
//! Contratos com os colaboradores externos do escalonador: CPU, memória
//! virtual, tabela de arquivos e a primitiva de troca de contexto.

pub mod cpu;
pub mod memory;
pub mod resources;
pub mod switch;

pub use cpu::*;
pub use memory::*;
pub use resources::*;
pub use switch::*;
