//! # Standard Error Codes (Errno)
//!
//! Códigos de erro recuperáveis devolvidos pelo núcleo de escalonamento.
//! Segue a numeração POSIX/Linux; valores negativos são usados no retorno de
//! syscalls (`isize`).
//!
//! Apenas falhas recuperáveis passam por aqui (pool cheio, sem memória, sem
//! filhos...). Violação de invariante do scheduler é `panic!`: continuar
//! corromperia o estado compartilhado de todas as CPUs.

use core::fmt;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    ESRCH = 3,   // No such process
    EINTR = 4,   // Interrupted system call
    ECHILD = 10, // No child processes
    EAGAIN = 11, // Try again (tabela de tarefas cheia)
    ENOMEM = 12, // Out of memory (stack de kernel / espaço de endereçamento)
    EINVAL = 22, // Invalid argument
}

impl Errno {
    pub fn as_usize(self) -> usize {
        self as usize
    }

    pub fn as_isize(self) -> isize {
        -(self as i32) as isize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Errno::ESRCH => "ESRCH",
            Errno::EINTR => "EINTR",
            Errno::ECHILD => "ECHILD",
            Errno::EAGAIN => "EAGAIN",
            Errno::ENOMEM => "ENOMEM",
            Errno::EINVAL => "EINVAL",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
