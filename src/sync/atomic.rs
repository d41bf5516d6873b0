//! Células por-CPU e contadores atômicos

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU64, Ordering};

/// Célula para dados de uma única CPU (tipos pequenos, `Copy`).
///
/// Não há atomicidade: a correção vem da disciplina de acesso. Só a CPU dona
/// do slot lê ou escreve, e sempre com interrupções desabilitadas, então não
/// existe outra thread de execução que possa observar a célula no meio de uma
/// escrita.
pub struct CpuCell<T: Copy> {
    value: UnsafeCell<T>,
}

// SAFETY: acesso restrito à CPU dona com interrupções desabilitadas.
unsafe impl<T: Copy + Send> Send for CpuCell<T> {}
unsafe impl<T: Copy + Send> Sync for CpuCell<T> {}

impl<T: Copy> CpuCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    #[inline]
    pub fn load(&self) -> T {
        // SAFETY: ver disciplina de acesso acima
        unsafe { *self.value.get() }
    }

    #[inline]
    pub fn store(&self, value: T) {
        // SAFETY: ver disciplina de acesso acima
        unsafe {
            *self.value.get() = value;
        }
    }

    /// Ponteiro cru para o slot (usado como destino do save de contexto).
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.value.get()
    }
}

/// Contador atômico
pub struct AtomicCounter(AtomicU64);

impl AtomicCounter {
    pub const fn new(value: u64) -> Self {
        Self(AtomicU64::new(value))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, value: u64) {
        self.0.store(value, Ordering::Release);
    }

    /// Incrementa e retorna o valor ANTERIOR.
    pub fn inc(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel)
    }
}
