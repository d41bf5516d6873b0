//! Multiprocessador simulado para testes de host
//!
//! Cada CPU e cada task é uma thread do host. A "troca de contexto" passa um
//! bastão: quem troca grava o próprio slot em `*old`, entrega a CPU ao slot de
//! destino e dorme até alguém devolver uma CPU para ele. Assim só uma thread
//! por CPU simulada roda código do kernel de cada vez.
//!
//! Programas de usuário são closures registradas com um rótulo; o trap frame
//! carrega o rótulo, então o `fork` leva o filho ao programa que o pai pediu.

#![allow(dead_code)]

use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use hearth::hal::{CpuOps, MemoryOps, ResourceOps, SwitchOps, TrapFrame};
use hearth::sched::config::NCPU;
use hearth::sched::{Context, Scheduler};
use hearth::{Errno, Pid};

pub type Kernel = Scheduler<Sim>;
pub type Program = Arc<dyn Fn(&'static Kernel) + Send + Sync>;

/// CPU usada pela thread de teste (controle)
pub const CONTROL_CPU: usize = NCPU - 1;

thread_local! {
    static CPU: Cell<usize> = const { Cell::new(usize::MAX) };
    static SLOT: Cell<usize> = const { Cell::new(0) };
}

#[derive(Clone, Debug, Default)]
pub struct SimFrame {
    /// Rótulo do programa de usuário
    pub program: usize,
    /// Valor de retorno da syscall em curso
    pub ret: usize,
}

impl TrapFrame for SimFrame {
    fn set_return_value(&mut self, value: usize) {
        self.ret = value;
    }
}

pub struct SimStack(usize);
pub struct SimSpace(usize);
pub struct SimFiles(usize);
pub struct SimCwd(usize);

/// Bastões de execução, um por contexto. O slot 0 é o contexto nulo.
struct Baton {
    slots: Mutex<Vec<Option<usize>>>,
    cv: Condvar,
}

impl Baton {
    fn new() -> Self {
        Self {
            slots: Mutex::new(vec![None]),
            cv: Condvar::new(),
        }
    }

    fn new_slot(&self) -> usize {
        let mut slots = self.slots.lock().unwrap();
        slots.push(None);
        slots.len() - 1
    }

    /// Entrega a CPU `cpu` ao contexto `slot`
    fn give(&self, slot: usize, cpu: usize) {
        let mut slots = self.slots.lock().unwrap();
        assert!(slot != 0, "switch to null context");
        assert!(slots[slot].is_none(), "context {slot} resumed twice");
        slots[slot] = Some(cpu);
        self.cv.notify_all();
    }

    /// Espera receber uma CPU
    fn take(&self, slot: usize) -> usize {
        let mut slots = self.slots.lock().unwrap();
        loop {
            if let Some(cpu) = slots[slot].take() {
                return cpu;
            }
            slots = self.cv.wait(slots).unwrap();
        }
    }
}

pub struct Sim {
    baton: Baton,
    irq: [AtomicBool; NCPU],
    kernel: OnceLock<&'static Kernel>,
    programs: Mutex<Vec<Program>>,
    init_program: AtomicUsize,
    stop: AtomicBool,
    panicked: AtomicBool,
    next_id: AtomicUsize,
    pub fail_next_space_dup: AtomicBool,
    /// Alguma cópia de espaço rodou com interrupções desligadas (lock seguro)
    pub space_dup_irqs_off: AtomicBool,
    pub live_stacks: AtomicIsize,
    pub live_spaces: AtomicIsize,
    pub live_files: AtomicIsize,
    pub live_cwds: AtomicIsize,
}

impl Sim {
    fn new() -> Self {
        Self {
            baton: Baton::new(),
            irq: std::array::from_fn(|_| AtomicBool::new(false)),
            kernel: OnceLock::new(),
            programs: Mutex::new(Vec::new()),
            init_program: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            panicked: AtomicBool::new(false),
            next_id: AtomicUsize::new(1),
            fail_next_space_dup: AtomicBool::new(false),
            space_dup_irqs_off: AtomicBool::new(false),
            live_stacks: AtomicIsize::new(0),
            live_spaces: AtomicIsize::new(0),
            live_files: AtomicIsize::new(0),
            live_cwds: AtomicIsize::new(0),
        }
    }

    fn kernel(&self) -> &'static Kernel {
        self.kernel.get().copied().expect("kernel not attached")
    }

    fn id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn program(&self, label: usize) -> Program {
        self.programs.lock().unwrap()[label].clone()
    }

    /// Arquivos abertos novos (para `launch`)
    pub fn open_files(&self) -> SimFiles {
        self.live_files.fetch_add(1, Ordering::SeqCst);
        SimFiles(self.id())
    }

    pub fn live(&self) -> [isize; 4] {
        [
            self.live_stacks.load(Ordering::SeqCst),
            self.live_spaces.load(Ordering::SeqCst),
            self.live_files.load(Ordering::SeqCst),
            self.live_cwds.load(Ordering::SeqCst),
        ]
    }

    /// CPUs que ficarem ociosas param para sempre
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    fn fail(&self) -> ! {
        self.panicked.store(true, Ordering::SeqCst);
        loop {
            thread::park();
        }
    }
}

impl CpuOps for Sim {
    fn cpu_id(&self) -> usize {
        let cpu = CPU.with(|c| c.get());
        assert!(cpu < NCPU, "thread is not running on a simulated cpu");
        cpu
    }

    fn interrupts_enabled(&self) -> bool {
        self.irq[self.cpu_id()].load(Ordering::SeqCst)
    }

    fn disable_interrupts(&self) {
        self.irq[self.cpu_id()].store(false, Ordering::SeqCst);
    }

    fn enable_interrupts(&self) {
        self.irq[self.cpu_id()].store(true, Ordering::SeqCst);
    }

    fn halt(&self) {
        if self.stop.load(Ordering::SeqCst) {
            loop {
                thread::park();
            }
        }
        thread::sleep(Duration::from_micros(100));
    }
}

impl MemoryOps for Sim {
    type AddressSpace = SimSpace;
    type KernelStack = SimStack;

    fn alloc_kernel_stack(&self) -> Option<SimStack> {
        self.live_stacks.fetch_add(1, Ordering::SeqCst);
        Some(SimStack(self.id()))
    }

    fn free_kernel_stack(&self, _stack: SimStack) {
        self.live_stacks.fetch_sub(1, Ordering::SeqCst);
    }

    fn init_address_space(&self) -> Option<(SimSpace, usize)> {
        self.live_spaces.fetch_add(1, Ordering::SeqCst);
        Some((SimSpace(self.id()), 4096))
    }

    fn duplicate_address_space(&self, _space: &SimSpace, _size: usize) -> Option<SimSpace> {
        if !self.interrupts_enabled() {
            self.space_dup_irqs_off.store(true, Ordering::SeqCst);
        }
        if self.fail_next_space_dup.swap(false, Ordering::SeqCst) {
            return None;
        }
        self.live_spaces.fetch_add(1, Ordering::SeqCst);
        Some(SimSpace(self.id()))
    }

    fn destroy_address_space(&self, _space: SimSpace) {
        self.live_spaces.fetch_sub(1, Ordering::SeqCst);
    }

    fn switch_user_space(&self, space: &SimSpace) {
        assert!(space.0 != 0);
    }

    fn switch_kernel_space(&self) {}
}

impl ResourceOps for Sim {
    type Files = SimFiles;
    type Cwd = SimCwd;

    fn root_directory(&self) -> SimCwd {
        self.live_cwds.fetch_add(1, Ordering::SeqCst);
        SimCwd(self.id())
    }

    fn duplicate_files(&self, _files: &SimFiles) -> SimFiles {
        self.open_files()
    }

    fn release_files(&self, _files: SimFiles) {
        self.live_files.fetch_sub(1, Ordering::SeqCst);
    }

    fn duplicate_cwd(&self, _cwd: &SimCwd) -> SimCwd {
        self.root_directory()
    }

    fn release_cwd(&self, _cwd: SimCwd) {
        self.live_cwds.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SwitchOps for Sim {
    type TrapFrame = SimFrame;

    fn init_trapframe(&self) -> SimFrame {
        SimFrame {
            program: self.init_program.load(Ordering::SeqCst),
            ret: 0,
        }
    }

    fn new_context(&self, _stack: &SimStack) -> Context {
        let slot = self.baton.new_slot();
        let k = self.kernel();
        thread::Builder::new()
            .name(format!("task-ctx{slot}"))
            .spawn(move || task_main(k, slot))
            .expect("spawn task thread");
        Context::from_raw(slot)
    }

    unsafe fn switch(&self, old: *mut Context, new: Context) {
        let me = SLOT.with(|s| s.get());
        let cpu = self.cpu_id();
        *old = Context::from_raw(me);
        self.baton.give(new.raw(), cpu);
        let cpu = self.baton.take(me);
        CPU.with(|c| c.set(cpu));
    }
}

/// Primeira execução de uma task: forkret, programa de usuário, exit
fn task_main(k: &'static Kernel, slot: usize) {
    let sim = k.platform();
    SLOT.with(|s| s.set(slot));
    let cpu = sim.baton.take(slot);
    CPU.with(|c| c.set(cpu));

    let run = catch_unwind(AssertUnwindSafe(|| {
        k.forkret();
        let label = k.with_trapframe(|tf| tf.program);
        let program = sim.program(label);
        program(k);
    }));
    if run.is_err() {
        sim.fail();
    }
    k.exit();
}

/// Cria o kernel e põe `ncpu` CPUs no loop do scheduler
///
/// A thread que chama vira a CPU de controle.
pub fn boot(ncpu: usize) -> &'static Kernel {
    assert!(ncpu < CONTROL_CPU);
    let k: &'static Kernel = Box::leak(Box::new(Scheduler::new(Sim::new())));
    let sim = k.platform();
    assert!(sim.kernel.set(k).is_ok());

    attach_control(k);

    for cpu in 0..ncpu {
        thread::Builder::new()
            .name(format!("cpu{cpu}"))
            .spawn(move || {
                CPU.with(|c| c.set(cpu));
                SLOT.with(|s| s.set(sim.baton.new_slot()));
                if catch_unwind(AssertUnwindSafe(|| k.scheduler())).is_err() {
                    sim.fail();
                }
            })
            .expect("spawn cpu thread");
    }
    k
}

/// A thread corrente passa a ser a CPU de controle (interrupções ligadas)
pub fn attach_control(k: &'static Kernel) {
    CPU.with(|c| c.set(CONTROL_CPU));
    k.platform().irq[CONTROL_CPU].store(true, Ordering::SeqCst);
}

pub fn register(k: &'static Kernel, program: impl Fn(&'static Kernel) + Send + Sync + 'static) -> usize {
    let mut programs = k.platform().programs.lock().unwrap();
    programs.push(Arc::new(program));
    programs.len() - 1
}

/// Cria o init rodando o programa `label`
pub fn start_init(k: &'static Kernel, label: usize) -> Pid {
    k.platform().init_program.store(label, Ordering::SeqCst);
    k.spawn_init().expect("spawn_init")
}

/// `fork` em que o filho roda o programa `label`
pub fn fork_into(k: &'static Kernel, label: usize) -> Result<Pid, Errno> {
    k.with_trapframe(|tf| tf.program = label);
    k.fork()
}

/// Interrupção do timer vinda do modo usuário
pub fn trap_timer(k: &'static Kernel) {
    let sim = k.platform();
    sim.disable_interrupts();
    k.timer_interrupt();
    sim.enable_interrupts();
}

/// Fim de programa do init: colhe órfãos para sempre
pub fn init_idle(k: &'static Kernel) -> ! {
    loop {
        if k.wait().is_err() {
            let _ = k.sleep_ticks(1);
        }
    }
}

/// Espera `pred` ficar verdadeiro (falha se alguma task entrou em pânico)
pub fn wait_until(k: &'static Kernel, what: &str, mut pred: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(20);
    loop {
        if pred() {
            return;
        }
        assert!(
            !k.platform().panicked.load(Ordering::SeqCst),
            "a simulated thread panicked while waiting for {what}"
        );
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Avança o relógio `n` ticks pela CPU de controle
pub fn tick(k: &'static Kernel, n: usize) {
    for _ in 0..n {
        k.clock_tick();
        thread::sleep(Duration::from_micros(200));
    }
}
