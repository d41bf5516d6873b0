//! Spinlock - bloqueio com busy-wait

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

const NO_HOLDER: usize = usize::MAX;

/// Controle de interrupções da CPU corrente, com profundidade de aninhamento.
///
/// `push_off`/`pop_off` se comportam como `cli`/`sti` empilháveis: são
/// necessários dois `pop_off` para desfazer dois `push_off`, e se as
/// interrupções estavam desligadas no primeiro `push_off` continuam desligadas
/// depois do último `pop_off`.
pub trait IrqControl {
    /// ID da CPU corrente. Só é estável com interrupções desabilitadas.
    fn cpu_id(&self) -> usize;
    fn push_off(&self);
    fn pop_off(&self);
}

/// Spinlock - usa busy-wait, NÃO pode dormir
///
/// Não reentrante: adquirir um lock que a própria CPU já segura é violação de
/// invariante e gera `panic!`. Interrupções ficam desabilitadas na CPU dona
/// durante toda a seção crítica (ver [`IrqControl`]).
///
/// # Quando usar
///
/// - Seções críticas curtas
/// - Base das primitivas que dormem (sleep/wakeup são construídos em cima dele)
pub struct Spinlock<T> {
    locked: AtomicBool,
    holder: AtomicUsize,
    name: &'static str,
    data: UnsafeCell<T>,
}

// SAFETY: Spinlock protege acesso com lock atômico
unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send> Sync for Spinlock<T> {}

impl<T> Spinlock<T> {
    /// Cria novo spinlock
    pub const fn new(name: &'static str, data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            holder: AtomicUsize::new(NO_HOLDER),
            name,
            data: UnsafeCell::new(data),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Adquire o lock
    pub fn lock<'a>(&'a self, irq: &'a dyn IrqControl) -> SpinlockGuard<'a, T> {
        // Desabilitar interrupções antes de adquirir (evita deadlock com IRQ)
        irq.push_off();
        if self.holding(irq) {
            panic!("acquire {}: already held", self.name);
        }

        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }
        self.holder.store(irq.cpu_id(), Ordering::Relaxed);

        SpinlockGuard { lock: self, irq }
    }

    /// Tenta adquirir sem bloquear
    pub fn try_lock<'a>(&'a self, irq: &'a dyn IrqControl) -> Option<SpinlockGuard<'a, T>> {
        irq.push_off();
        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.holder.store(irq.cpu_id(), Ordering::Relaxed);
            Some(SpinlockGuard { lock: self, irq })
        } else {
            irq.pop_off();
            None
        }
    }

    /// A CPU corrente segura este lock?
    ///
    /// Deve ser chamado com interrupções desabilitadas.
    pub fn holding(&self, irq: &dyn IrqControl) -> bool {
        self.locked.load(Ordering::Relaxed) && self.holder.load(Ordering::Relaxed) == irq.cpu_id()
    }

    /// Libera o lock sem Guard (USO INTERNO DO SCHEDULER)
    ///
    /// # Safety
    ///
    /// Só deve ser usado pela primeira execução de uma task nova, que "herdou"
    /// o lock adquirido pelo loop do scheduler mas não tem o Guard dele.
    pub unsafe fn force_unlock(&self, irq: &dyn IrqControl) {
        self.release(irq);
    }

    fn release(&self, irq: &dyn IrqControl) {
        if !self.holding(irq) {
            panic!("release {}: not held", self.name);
        }
        self.holder.store(NO_HOLDER, Ordering::Relaxed);
        self.locked.store(false, Ordering::Release);
        irq.pop_off();
    }
}

/// Guard do spinlock - libera ao sair do escopo
///
/// Cada Guard vive na stack de quem adquiriu. Através de uma troca de contexto
/// o lock passa de uma stack para outra: quem adquiriu antes de trocar não é
/// quem libera, mas a contagem adquire/libera por stack continua balanceada.
pub struct SpinlockGuard<'a, T> {
    lock: &'a Spinlock<T>,
    irq: &'a dyn IrqControl,
}

impl<'a, T> SpinlockGuard<'a, T> {
    /// O lock por trás deste Guard (para readquirir depois de soltar).
    pub fn spinlock(this: &Self) -> &'a Spinlock<T> {
        this.lock
    }

    pub fn irq(this: &Self) -> &'a dyn IrqControl {
        this.irq
    }
}

impl<T> Deref for SpinlockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Lock está adquirido
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: Lock está adquirido
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinlockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.release(self.irq);
    }
}
