//! Scheduler principal
//!
//! Um [`Scheduler`] por kernel, compartilhado por todas as CPUs. Toda a
//! tabela de tasks (descritores, runqueue e recursos) vive dentro de um único
//! [`Spinlock`]; o estado privado de cada CPU fica em [`Cpu`].
//!
//! # Fluxo
//!
//! ```text
//! scheduler() [CPU N] ── switch ──► task
//!        ▲                            │ yield / sleep / exit
//!        └────────── sched() ◄────────┘
//! ```
//!
//! O lock da tabela atravessa a troca de contexto: o loop adquire, troca para
//! a task, e quem libera é a task (no `forkret` ou depois do seu próprio
//! `sched()`). Na volta é o contrário.

pub mod cpu;
pub mod policy;
pub mod runqueue;

use crate::hal::Platform;
use crate::sched::config::{NCPU, NPROC};
use crate::sched::table::ProcTable;
use crate::sched::task::{TaskResources, TaskState};
use crate::sync::{AtomicCounter, IrqControl, Spinlock, SpinlockGuard};
use cpu::Cpu;

/// Tudo o que o lock global protege
pub struct Ptable<P: Platform> {
    pub procs: ProcTable,
    /// Recursos da plataforma, no mesmo índice do descritor
    pub res: [TaskResources<P>; NPROC],
}

pub type PtableGuard<'a, P> = SpinlockGuard<'a, Ptable<P>>;

/// Núcleo de escalonamento multiprocessador
pub struct Scheduler<P: Platform> {
    pub(crate) platform: P,
    pub(crate) ptable: Spinlock<Ptable<P>>,
    cpus: [Cpu; NCPU],
    /// Ticks do relógio desde o boot
    pub(crate) ticks: AtomicCounter,
}

const CPU_INIT: Cpu = Cpu::new();

impl<P: Platform> Scheduler<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            ptable: Spinlock::new(
                "ptable",
                Ptable {
                    procs: ProcTable::new(),
                    res: core::array::from_fn(|_| TaskResources::empty()),
                },
            ),
            cpus: [CPU_INIT; NCPU],
            ticks: AtomicCounter::new(0),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Estado da CPU corrente
    ///
    /// Deve ser chamado com interrupções desabilitadas.
    pub(crate) fn mycpu(&self) -> &Cpu {
        if self.platform.interrupts_enabled() {
            panic!("mycpu: called with interrupts enabled");
        }
        match self.cpus.get(self.platform.cpu_id()) {
            Some(cpu) => cpu,
            None => panic!("mycpu: unknown cpu"),
        }
    }

    /// Adquire o lock da tabela de tasks
    pub(crate) fn lock(&self) -> PtableGuard<'_, P> {
        self.ptable.lock(self)
    }

    /// Slot da task corrente nesta CPU
    pub(crate) fn current_slot(&self) -> Option<usize> {
        self.push_off();
        let slot = self.mycpu().current.load();
        self.pop_off();
        slot
    }

    pub(crate) fn expect_current(&self, op: &'static str) -> usize {
        match self.current_slot() {
            Some(slot) => slot,
            None => panic!("{}: no current task", op),
        }
    }

    /// Volta para o loop do scheduler desta CPU
    ///
    /// Exige exatamente o lock da tabela (profundidade 1), interrupções
    /// desligadas e a task corrente fora de `Running`. Retorna quando a task
    /// for escolhida de novo, possivelmente em outra CPU, com o lock adquirido.
    pub(crate) fn sched(&self, pt: &mut PtableGuard<'_, P>) {
        if !self.ptable.holding(self) {
            panic!("sched: ptable not locked");
        }
        let cpu = self.mycpu();
        if cpu.ncli.load() != 1 {
            panic!("sched: locks");
        }
        let slot = match cpu.current.load() {
            Some(slot) => slot,
            None => panic!("sched: no current task"),
        };
        if pt.procs.task(slot).state == TaskState::Running {
            panic!("sched: running");
        }
        if self.platform.interrupts_enabled() {
            panic!("sched: interruptible");
        }

        // intena é da thread do kernel, não da CPU
        let intena = cpu.intena.load();
        let saved = &mut pt.procs.task_mut(slot).context as *mut _;
        let target = cpu.scheduler.load();
        // SAFETY: interrupções desligadas; o slot do contexto vive na tabela,
        // que não se move, e ninguém toca nele enquanto a task não roda.
        unsafe { self.platform.switch(saved, target) };
        self.mycpu().intena.store(intena);
    }

    /// Cede a CPU (RUNNING → RUNNABLE)
    pub(crate) fn yield_cpu(&self, voluntary: bool) {
        let slot = self.expect_current("yield");
        let mut pt = self.lock();
        let t = pt.procs.task_mut(slot);
        t.state = TaskState::Runnable;
        t.accounting.account_switch(voluntary);
        self.sched(&mut pt);
    }

    /// Cede a CPU voluntariamente
    pub fn yield_now(&self) {
        self.yield_cpu(true);
    }

    /// Primeira execução de uma task nova
    ///
    /// O contexto criado por `new_context` chama isto antes de ir para o
    /// modo usuário.
    pub fn forkret(&self) {
        // Ainda segurando o lock adquirido pelo loop do scheduler
        // SAFETY: o Guard correspondente ficou na stack do loop; esta stack
        // nunca adquiriu o lock.
        unsafe { self.ptable.force_unlock(self) };
    }

    /// Loop do scheduler (nunca retorna)
    ///
    /// Cada CPU chama isto uma vez, depois de configurada.
    pub fn scheduler(&self) -> ! {
        self.platform.disable_interrupts();
        crate::kinfo!("(Sched) CPU entrando no loop: ", self.platform.cpu_id());
        self.mycpu().current.store(None);

        loop {
            // Deixar IRQs chegarem entre uma escolha e outra
            self.platform.enable_interrupts();

            let mut pt = self.lock();
            let slot = match pt.procs.select_next_runnable() {
                Some(slot) => slot,
                None => {
                    drop(pt);
                    self.platform.halt();
                    continue;
                }
            };

            let cpu = self.mycpu();
            cpu.current.store(Some(slot));
            if let Some(space) = pt.res[slot].space.as_ref() {
                self.platform.switch_user_space(space);
            }
            pt.procs.task_mut(slot).state = TaskState::Running;
            crate::ktrace!("(Sched) pick pid=", pt.procs.task(slot).pid.as_u32());

            let target = pt.procs.task(slot).context;
            if target.is_null() {
                panic!("scheduler: task without context");
            }
            // SAFETY: lock adquirido e interrupções desligadas; o slot do
            // contexto do scheduler é desta CPU.
            unsafe { self.platform.switch(cpu.scheduler.as_ptr(), target) };

            // A task voltou e já mudou o próprio estado
            self.platform.switch_kernel_space();
            self.mycpu().current.store(None);
        }
    }
}

impl<P: Platform> IrqControl for Scheduler<P> {
    fn cpu_id(&self) -> usize {
        self.platform.cpu_id()
    }

    fn push_off(&self) {
        let was_enabled = self.platform.interrupts_enabled();
        self.platform.disable_interrupts();
        let cpu = self.mycpu();
        let depth = cpu.ncli.load();
        if depth == 0 {
            cpu.intena.store(was_enabled);
        }
        cpu.ncli.store(depth + 1);
    }

    fn pop_off(&self) {
        if self.platform.interrupts_enabled() {
            panic!("pop_off: interruptible");
        }
        let cpu = self.mycpu();
        let depth = cpu.ncli.load();
        if depth == 0 {
            panic!("pop_off: unbalanced");
        }
        cpu.ncli.store(depth - 1);
        if depth == 1 && cpu.intena.load() {
            self.platform.enable_interrupts();
        }
    }
}
