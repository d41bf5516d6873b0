//! Ciclo de vida das tasks
//!
//! ```text
//! create ──► Embryo ──launch/fork──► Runnable ⇄ Running ──exit──► Zombie ──wait──► Unused
//! ```
//!
//! Falta de recurso (tabela cheia, sem stack, sem espaço de endereçamento)
//! volta como `Errno` e o slot é devolvido ao pool. Estado inconsistente é
//! `panic!`.

use super::config::MAX_PRIORITY;
use super::scheduler::Scheduler;
use super::task::{Channel, TaskResources, TaskState};
use crate::hal::{Platform, TrapFrame};
use crate::sys::{Errno, Pid};

/// Imagem inicial de uma task criada com `create`
pub struct LaunchImage<'n, P: Platform> {
    pub space: P::AddressSpace,
    /// Tamanho do espaço de usuário em bytes
    pub size: usize,
    pub cwd: P::Cwd,
    /// Arquivos abertos herdados (init nasce sem)
    pub files: Option<P::Files>,
    pub trapframe: P::TrapFrame,
    pub name: &'n str,
    pub priority: u8,
}

impl<P: Platform> Scheduler<P> {
    /// Ocupa um descritor livre como `Embryo`, com stack de kernel e
    /// contexto inicial. Não entra na runqueue.
    pub(crate) fn alloc_task(&self) -> Result<usize, Errno> {
        let slot = {
            let mut pt = self.lock();
            match pt.procs.alloc() {
                Some(slot) => slot,
                None => {
                    crate::kwarn!("(Task) tabela de tasks cheia");
                    return Err(Errno::EAGAIN);
                }
            }
        };

        // Alocação fora do lock: o slot é Embryo, ninguém mais mexe nele
        let kstack = match self.platform.alloc_kernel_stack() {
            Some(k) => k,
            None => {
                crate::kwarn!("(Task) sem memória para stack de kernel");
                self.lock().procs.free(slot);
                return Err(Errno::ENOMEM);
            }
        };
        let context = self.platform.new_context(&kstack);

        let mut pt = self.lock();
        pt.res[slot].kstack = Some(kstack);
        pt.procs.task_mut(slot).context = context;
        Ok(slot)
    }

    /// Cria uma task `Embryo` e devolve sua identidade
    ///
    /// A task só fica escalonável depois de [`launch`](Self::launch).
    pub fn create(&self) -> Result<Pid, Errno> {
        let slot = self.alloc_task()?;
        let pid = self.lock().procs.task(slot).pid;
        crate::ktrace!("(Task) create pid=", pid.as_u32());
        Ok(pid)
    }

    /// Completa uma task `Embryo`: anexa a imagem e a coloca na runqueue
    ///
    /// Identidades de bootstrap entram sempre em `MAX_PRIORITY`. Se quem
    /// chama é uma task, ela vira o pai.
    pub fn launch(&self, pid: Pid, image: LaunchImage<'_, P>) -> Result<(), Errno> {
        let caller = self.current_slot();
        let mut pt = self.lock();
        let found = pt.procs.find(pid);
        let slot = match found {
            Some(s) if pt.procs.task(s).state == TaskState::Embryo && image.priority <= MAX_PRIORITY => s,
            _ => {
                drop(pt);
                self.platform.destroy_address_space(image.space);
                self.platform.release_cwd(image.cwd);
                if let Some(files) = image.files {
                    self.platform.release_files(files);
                }
                return Err(if found.is_some() { Errno::EINVAL } else { Errno::ESRCH });
            }
        };

        let res = &mut pt.res[slot];
        res.space = Some(image.space);
        res.size = image.size;
        res.cwd = Some(image.cwd);
        res.files = image.files;
        res.trapframe = image.trapframe;

        let parent = caller.map(|c| pt.procs.task(c).pid);
        let t = pt.procs.task_mut(slot);
        t.set_name(image.name);
        t.parent = parent;
        let priority = if pt.procs.task(slot).is_pinned() {
            MAX_PRIORITY
        } else {
            image.priority
        };
        pt.procs.admit(slot, priority);
        crate::kinfo!("(Task) launch pid=", pid.as_u32());
        Ok(())
    }

    /// Cria a primeira task de usuário (pid 1, "initcode")
    pub fn spawn_init(&self) -> Result<Pid, Errno> {
        let pid = self.create()?;
        if pid != Pid::INIT {
            panic!("spawn_init: init must be the first task");
        }

        let (space, size) = match self.platform.init_address_space() {
            Some(s) => s,
            None => {
                self.discard_embryo(pid);
                return Err(Errno::ENOMEM);
            }
        };
        let image = LaunchImage {
            space,
            size,
            cwd: self.platform.root_directory(),
            files: None,
            trapframe: self.platform.init_trapframe(),
            name: "initcode",
            priority: MAX_PRIORITY,
        };
        self.launch(pid, image)?;
        Ok(pid)
    }

    /// Devolve ao pool uma task que nunca chegou a rodar
    fn discard_embryo(&self, pid: Pid) {
        let mut pt = self.lock();
        let Some(slot) = pt.procs.find(pid) else {
            return;
        };
        let res = core::mem::take(&mut pt.res[slot]);
        pt.procs.free(slot);
        drop(pt);
        self.release_resources(res);
    }

    /// Libera tudo o que sobrou de uma task (fora do lock)
    fn release_resources(&self, res: TaskResources<P>) {
        if let Some(files) = res.files {
            self.platform.release_files(files);
        }
        if let Some(cwd) = res.cwd {
            self.platform.release_cwd(cwd);
        }
        if let Some(space) = res.space {
            self.platform.destroy_address_space(space);
        }
        if let Some(kstack) = res.kstack {
            self.platform.free_kernel_stack(kstack);
        }
    }

    /// Duplica a task corrente
    ///
    /// O filho recebe cópias do espaço de endereçamento, dos arquivos e do
    /// cwd, vê 0 como retorno da syscall e entra na melhor prioridade ativa.
    /// Retorna o pid do filho para o pai.
    ///
    /// A cópia do espaço acontece fora do lock da tabela; arquivos e cwd são
    /// duplicados sob ele.
    pub fn fork(&self) -> Result<Pid, Errno> {
        let cur = self.expect_current("fork");
        let slot = self.alloc_task()?;

        // O espaço do pai é só dele: sai da tabela durante a cópia, que roda
        // sem o lock e com interrupções ligadas.
        let (source, size) = {
            let mut pt = self.lock();
            let size = pt.res[cur].size;
            match pt.res[cur].space.take() {
                Some(space) => (space, size),
                None => panic!("fork: current task has no address space"),
            }
        };
        let space = self.platform.duplicate_address_space(&source, size);

        let mut pt = self.lock();
        // Se a task trocou de CPU no meio da cópia, o loop não tinha espaço
        // de usuário para ativar.
        self.platform.switch_user_space(&source);
        pt.res[cur].space = Some(source);
        let parent = pt.procs.task(cur).pid;

        let Some(space) = space else {
            let kstack = pt.res[slot].kstack.take();
            pt.procs.free(slot);
            drop(pt);
            if let Some(k) = kstack {
                self.platform.free_kernel_stack(k);
            }
            crate::kwarn!("(Task) fork: sem memória para o espaço do filho");
            return Err(Errno::ENOMEM);
        };

        let files = pt.res[cur].files.as_ref().map(|f| self.platform.duplicate_files(f));
        let cwd = pt.res[cur].cwd.as_ref().map(|c| self.platform.duplicate_cwd(c));
        let mut trapframe = pt.res[cur].trapframe.clone();
        // O filho vê fork() == 0
        trapframe.set_return_value(0);

        let res = &mut pt.res[slot];
        res.space = Some(space);
        res.size = size;
        res.files = files;
        res.cwd = cwd;
        res.trapframe = trapframe;

        let name = pt.procs.task(cur).name;
        let child = pt.procs.task_mut(slot);
        child.name = name;
        child.parent = Some(parent);
        let pid = child.pid;

        let priority = pt.procs.admit_promoted(slot);
        crate::kinfo!("(Task) fork pid=", pid.as_u32());
        crate::ktrace!("(Task) fork prio=", priority);
        Ok(pid)
    }

    /// Termina a task corrente (nunca retorna)
    ///
    /// A task vira ZOMBIE e sai da runqueue; o pai a encontra no `wait`.
    /// Filhos órfãos passam para o init.
    pub fn exit(&self) -> ! {
        let cur = self.expect_current("exit");

        let (pid, files, cwd) = {
            let mut pt = self.lock();
            let pid = pt.procs.task(cur).pid;
            if pid == Pid::INIT {
                panic!("init exiting");
            }
            (pid, pt.res[cur].files.take(), pt.res[cur].cwd.take())
        };

        // Fechar arquivos pode bloquear: fora do lock
        if let Some(files) = files {
            self.platform.release_files(files);
        }
        if let Some(cwd) = cwd {
            self.platform.release_cwd(cwd);
        }

        let mut pt = self.lock();

        if let Some(parent) = pt.procs.task(cur).parent {
            pt.procs.wakeup(Channel::Task(parent));
        }
        if pt.procs.reparent(pid, Pid::INIT) {
            pt.procs.wakeup(Channel::Task(Pid::INIT));
        }

        pt.procs.dequeue(cur);
        pt.procs.task_mut(cur).state = TaskState::Zombie;
        crate::kinfo!("(Task) exit pid=", pid.as_u32());

        self.sched(&mut pt);
        panic!("zombie exit");
    }

    /// Espera um filho terminar e devolve seu pid
    ///
    /// `ECHILD` se não há filhos ou se a task corrente foi morta.
    pub fn wait(&self) -> Result<Pid, Errno> {
        let cur = self.expect_current("wait");
        let mut pt = self.lock();
        let me = pt.procs.task(cur).pid;

        loop {
            if let Some(child) = pt.procs.find_zombie_child(me) {
                let pid = pt.procs.task(child).pid;
                let res = core::mem::take(&mut pt.res[child]);
                pt.procs.free(child);
                drop(pt);

                self.release_resources(res);
                crate::kinfo!("(Task) reap pid=", pid.as_u32());
                return Ok(pid);
            }

            if !pt.procs.has_children(me) || pt.procs.task(cur).is_killed() {
                return Err(Errno::ECHILD);
            }

            self.sleep_locked(&mut pt, Channel::Task(me));
        }
    }

    /// Pede para a task `pid` morrer
    ///
    /// Cooperativo: só marca a flag (e acorda se dormia). A task sai quando
    /// passar por um ponto de checagem de [`killed`](Self::killed).
    pub fn kill(&self, pid: Pid) -> Result<(), Errno> {
        let mut pt = self.lock();
        pt.procs.kill(pid)?;
        crate::kdebug!("(Task) kill pid=", pid.as_u32());
        Ok(())
    }

    /// Acesso ao trap frame da task corrente (camada de syscalls)
    pub fn with_trapframe<R>(&self, f: impl FnOnce(&mut P::TrapFrame) -> R) -> R {
        let cur = self.expect_current("trapframe");
        let mut pt = self.lock();
        f(&mut pt.res[cur].trapframe)
    }

    /// A task corrente tem kill pendente?
    pub fn killed(&self) -> bool {
        let cur = self.expect_current("killed");
        self.lock().procs.task(cur).is_killed()
    }

    pub fn getpid(&self) -> Pid {
        let cur = self.expect_current("getpid");
        self.lock().procs.task(cur).pid
    }

    /// Ajusta a política de uma task: prioridade e quota de ticks
    ///
    /// Uma task enfileirada muda de bucket na hora. Identidades de bootstrap
    /// ficam em `MAX_PRIORITY`; só a quota muda.
    pub fn set_sched_params(&self, pid: Pid, priority: u8, quota: u64) -> Result<(), Errno> {
        if priority > MAX_PRIORITY {
            return Err(Errno::EINVAL);
        }
        let mut pt = self.lock();
        let slot = pt.procs.find(pid).ok_or(Errno::ESRCH)?;
        if pt.procs.task(slot).state == TaskState::Zombie {
            return Err(Errno::ESRCH);
        }
        if !pt.procs.task(slot).is_pinned() {
            pt.procs.set_priority(slot, priority);
        }
        pt.procs.task_mut(slot).accounting.quota = quota;
        crate::kdebug!("(Task) set_sched_params pid=", pid.as_u32());
        Ok(())
    }
}
