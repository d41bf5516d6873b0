// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Logging do núcleo de escalonamento com custo ZERO em release.
//
// ARQUITETURA:
// - Usa features do Cargo para filtragem em tempo de compilação
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt - apenas strings literais + um valor hex opcional
// - SEM alocação
// - Escreve no sink instalado em `debug::console` (serial no kernel real)
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos
// - WARN:  Situações suspeitas mas recuperáveis (pool cheio, sem memória)
// - INFO:  Fluxo normal (boot de CPU, fork, exit, reap)
// - DEBUG: Informações de debugging (kill, rebaixamento por quota)
// - TRACE: Detalhes extremos (cada pick, cada aging)
//
// COMO USAR:
//   kinfo!("(Sched) CPU online");              // Apenas string
//   kinfo!("(Task) fork pid=", pid.as_u32());  // String + hex
//
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($msg:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_ERROR);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_nl();
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_ERROR);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_hex($val as u64);
        $crate::debug::console::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_WARN);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_nl();
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_WARN);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_hex($val as u64);
        $crate::debug::console::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_INFO);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_nl();
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_INFO);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_hex($val as u64);
        $crate::debug::console::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================

#[cfg(all(not(feature = "no_logs"), any(feature = "log_trace", feature = "log_info")))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_DEBUG);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_nl();
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_DEBUG);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_hex($val as u64);
        $crate::debug::console::emit_nl();
    }};
}

#[cfg(not(all(not(feature = "no_logs"), any(feature = "log_trace", feature = "log_info"))))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_TRACE);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_nl();
    }};
    ($msg:expr, $val:expr) => {{
        $crate::debug::console::emit_str($crate::debug::logging::P_TRACE);
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_hex($val as u64);
        $crate::debug::console::emit_nl();
    }};
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($msg:expr) => {{
        $crate::debug::console::emit_str("\x1b[32m[OK]\x1b[0m ");
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

/// kfail! - Log de falha (prefixo vermelho [FAIL]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kfail {
    ($msg:expr) => {{
        $crate::debug::console::emit_str("\x1b[1;31m[FAIL]\x1b[0m ");
        $crate::debug::console::emit_str($msg);
        $crate::debug::console::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kfail {
    ($($t:tt)*) => {{}};
}
