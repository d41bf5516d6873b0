//! Tabela de tasks
//!
//! Pool fixo de descritores indexado por slot, mais a runqueue que aponta
//! para ele. Tudo aqui roda com o lock da tabela adquirido: a tabela inteira
//! vive dentro do [`Spinlock`](crate::sync::Spinlock) do scheduler e só é
//! alcançável através do Guard.
//!
//! A tabela não conhece a plataforma, então toda a política (promoção, aging,
//! wakeup, kill) é testável sem CPUs de verdade.

use crate::sched::config::{MAX_PRIORITY, NPROC};
use crate::sched::scheduler::policy;
use crate::sched::scheduler::runqueue::RunQueue;
use crate::sched::task::{Channel, Task, TaskFlags, TaskState};
use crate::sys::{Errno, Pid};

pub struct ProcTable {
    tasks: [Task; NPROC],
    runq: RunQueue,
    next_pid: u32,
}

impl ProcTable {
    pub const fn new() -> Self {
        Self {
            tasks: [Task::EMPTY; NPROC],
            runq: RunQueue::new(),
            next_pid: 1,
        }
    }

    #[inline]
    pub fn task(&self, slot: usize) -> &Task {
        &self.tasks[slot]
    }

    #[inline]
    pub fn task_mut(&mut self, slot: usize) -> &mut Task {
        &mut self.tasks[slot]
    }

    pub fn tasks(&self) -> &[Task; NPROC] {
        &self.tasks
    }

    pub fn runq(&self) -> &RunQueue {
        &self.runq
    }

    /// Slot de uma task viva (qualquer estado exceto `Unused`)
    pub fn find(&self, pid: Pid) -> Option<usize> {
        self.tasks
            .iter()
            .position(|t| t.state != TaskState::Unused && t.pid == pid)
    }

    /// Ocupa um slot livre como `Embryo` com um pid novo
    ///
    /// `None` com a tabela cheia ou com o espaço de pids esgotado (pids não
    /// dão a volta: `Pid(0)` não identifica ninguém).
    pub fn alloc(&mut self) -> Option<usize> {
        let slot = self
            .tasks
            .iter()
            .position(|t| t.state == TaskState::Unused)?;
        let pid = Pid(self.next_pid);
        self.next_pid = self.next_pid.checked_add(1)?;
        self.tasks[slot] = Task::embryo(pid);
        Some(slot)
    }

    /// Devolve o slot ao pool (`Unused`, todos os campos zerados)
    pub fn free(&mut self, slot: usize) {
        if self.runq.contains(slot) {
            panic!("free: task still queued");
        }
        self.tasks[slot] = Task::EMPTY;
    }

    // =========================================================================
    // RUNQUEUE
    // =========================================================================

    pub fn enqueue(&mut self, slot: usize) {
        self.runq.enqueue(slot, self.tasks[slot].priority);
    }

    pub fn dequeue(&mut self, slot: usize) {
        self.runq.dequeue(slot, self.tasks[slot].priority);
    }

    /// Move a task para o fim do bucket da nova prioridade
    pub fn reprioritize(&mut self, slot: usize, priority: u8) {
        if priority > MAX_PRIORITY {
            panic!("reprioritize: priority out of range");
        }
        self.dequeue(slot);
        self.tasks[slot].priority = priority;
        self.enqueue(slot);
    }

    /// Troca a prioridade de uma task, enfileirada ou não
    pub fn set_priority(&mut self, slot: usize, priority: u8) {
        if self.runq.contains(slot) {
            self.reprioritize(slot, priority);
        } else {
            self.tasks[slot].priority = priority;
        }
    }

    pub fn best_active_priority(&self) -> u8 {
        policy::best_active_priority(&self.runq, &self.tasks)
    }

    pub fn select_next_runnable(&self) -> Option<usize> {
        policy::select_next_runnable(&self.runq, &self.tasks)
    }

    // =========================================================================
    // TRANSIÇÕES
    // =========================================================================

    /// `Embryo` → `Runnable` com prioridade fixa, e entra na fila
    pub fn admit(&mut self, slot: usize, priority: u8) {
        let t = &mut self.tasks[slot];
        if t.state != TaskState::Embryo {
            panic!("admit: task is not an embryo");
        }
        t.state = TaskState::Runnable;
        t.priority = priority;
        self.enqueue(slot);
    }

    /// `Embryo` → `Runnable` competindo na melhor prioridade ativa
    ///
    /// Retorna a prioridade recebida.
    pub fn admit_promoted(&mut self, slot: usize) -> u8 {
        let best = self.best_active_priority();
        let priority = self.tasks[slot].promotion(best);
        self.admit(slot, priority);
        priority
    }

    /// Acorda todas as tasks dormindo em `chan`
    ///
    /// Cada uma é promovida para a melhor prioridade ativa do momento da
    /// chamada (calculada uma vez só). Retorna quantas acordaram.
    pub fn wakeup(&mut self, chan: Channel) -> usize {
        let best = self.best_active_priority();
        let mut woken = 0;
        for slot in 0..NPROC {
            let t = &self.tasks[slot];
            if t.state != TaskState::Sleeping || t.chan != Some(chan) {
                continue;
            }
            if !t.is_pinned() {
                self.reprioritize(slot, best);
            }
            let t = &mut self.tasks[slot];
            t.chan = None;
            t.state = TaskState::Runnable;
            woken += 1;
        }
        woken
    }

    /// Marca a task para morrer; se dormia, volta a ser RUNNABLE
    ///
    /// A prioridade não muda: a task só precisa rodar o suficiente para ver a flag.
    pub fn kill(&mut self, pid: Pid) -> Result<usize, Errno> {
        let slot = self.find(pid).ok_or(Errno::ESRCH)?;
        let t = &mut self.tasks[slot];
        t.flags |= TaskFlags::KILLED;
        if t.state == TaskState::Sleeping {
            t.chan = None;
            t.state = TaskState::Runnable;
        }
        Ok(slot)
    }

    /// Passada de aging: cada task enfileirada exatamente uma vez
    ///
    /// Tira uma foto da fila antes de mexer: mover uma task de bucket no meio
    /// da varredura faria ela ser visitada de novo (ou pulada).
    pub fn age(&mut self) -> usize {
        let mut snapshot = [0usize; NPROC];
        let n = self.runq.snapshot(&mut snapshot);
        for &slot in &snapshot[..n] {
            let aged = self.tasks[slot].aged_priority();
            self.reprioritize(slot, aged);
            self.tasks[slot].accounting.ticks = 0;
        }
        n
    }

    /// Existe alguma task cujo pai é `pid`?
    pub fn has_children(&self, pid: Pid) -> bool {
        self.tasks
            .iter()
            .any(|t| t.state != TaskState::Unused && t.parent == Some(pid))
    }

    /// Primeiro filho ZOMBIE de `pid`
    pub fn find_zombie_child(&self, pid: Pid) -> Option<usize> {
        self.tasks
            .iter()
            .position(|t| t.state == TaskState::Zombie && t.parent == Some(pid))
    }

    /// Passa os filhos de `pid` para `init`
    ///
    /// Retorna `true` se algum dos filhos já é ZOMBIE (init precisa acordar).
    pub fn reparent(&mut self, pid: Pid, init: Pid) -> bool {
        let mut zombie = false;
        for t in self.tasks.iter_mut() {
            if t.state != TaskState::Unused && t.parent == Some(pid) {
                t.parent = Some(init);
                zombie |= t.state == TaskState::Zombie;
            }
        }
        zombie
    }
}

impl Default for ProcTable {
    fn default() -> Self {
        Self::new()
    }
}
