//! # Multitasking & Scheduler Subsystem
//!
//! Núcleo de escalonamento multiprocessador: tabela de tasks, runqueue por
//! buckets de prioridade, aging por uso de CPU e o loop que cada CPU roda.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Máquina de estados:** `Unused → Embryo → Runnable ⇄ Running → Zombie`,
//!   com `Sleeping` para quem espera um canal.
//! - **Política:** menor número de prioridade roda primeiro; empate é FIFO.
//!   Quem vira RUNNABLE (fork, wakeup) entra na melhor prioridade ativa, e o
//!   aging empurra para baixo quem gastou CPU.
//! - **SMP:** uma tabela, um lock, N CPUs. Cada CPU roda
//!   [`Scheduler::scheduler`] para sempre.
//!
//! ## 🏗️ Arquitetura
//! ```text
//! task/       descritor, estados, canais, contexto, contabilidade
//! table       pool de descritores + runqueue (sempre sob o lock)
//! scheduler/  runqueue, política, estado por-CPU, loop e sched()
//! lifecycle   create/launch/fork/exit/wait/kill
//! sleep       sleep/wakeup por canal
//! timer       relógio, aging periódico, quota e preempção
//! ```
//!
//! A plataforma (troca de contexto, page tables, arquivos) entra pelos
//! traits de [`crate::hal`].

pub mod config;
pub mod debug;
pub mod lifecycle;
pub mod scheduler;
pub mod sleep;
pub mod table;
pub mod task;
pub mod timer;


pub use debug::TaskInfo;
pub use lifecycle::LaunchImage;
pub use scheduler::Scheduler;
pub use task::{Channel, Context, Pid, TaskState};
