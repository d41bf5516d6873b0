//! Constantes de configuração do Scheduler

/// Capacidade da tabela de tasks (e do pool de nós da runqueue)
pub const NPROC: usize = 64;

/// Número máximo de CPUs
pub const NCPU: usize = 8;

/// Pior prioridade (tier de background/idle). Número menor roda antes.
pub const MAX_PRIORITY: u8 = 99;

/// Prioridades por bucket da runqueue
pub const BUCKET_WIDTH: u8 = 4;

/// Quantidade de buckets: `MAX_PRIORITY / BUCKET_WIDTH + 1`
pub const BUCKET_COUNT: usize = (MAX_PRIORITY / BUCKET_WIDTH) as usize + 1;

/// Bucket reservado para `MAX_PRIORITY` (ignorado pela busca da melhor prioridade ativa)
pub const IDLE_BUCKET: usize = BUCKET_COUNT - 1;

/// Ticks de CPU que custam um passo de prioridade no aging
pub const DECAY_DIVISOR: u64 = 10;

/// Ticks do timer entre duas passadas de aging
pub const AGING_PERIOD: u64 = 60;

/// Identidades de bootstrap, sempre em `MAX_PRIORITY`
pub const BOOTSTRAP_PIDS: [u32; 2] = [1, 2];

/// Bytes guardados do nome de uma task (debug)
pub const TASK_NAME_LEN: usize = 16;
