//! Contexto salvo de execução

/// Contexto de kernel salvo de uma task
///
/// Opaco para o escalonador: no x86_64 é o `rsp` deixado pelo `switch.s`
/// depois de empilhar os registradores callee-saved. Só a primitiva de troca
/// de contexto interpreta o valor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Context(usize);

impl Context {
    /// Nenhum contexto salvo
    pub const NULL: Context = Context(0);

    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> usize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::NULL
    }
}
