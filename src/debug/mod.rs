//! Diagnóstico: console de saída e macros de log (`kinfo!`, `ktrace!`, ...).

pub mod console;
pub mod logging;
