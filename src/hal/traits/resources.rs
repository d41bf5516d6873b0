//! Trait de recursos por-task (arquivos abertos e diretório corrente)

/// Contrato com a tabela de arquivos e o VFS
///
/// # Regras de lock
///
/// - `duplicate_*` e `root_directory` rodam com o lock global adquirido e
///   NÃO podem bloquear (só incrementam referências).
/// - `release_*` roda sem o lock global e pode bloquear (fechar um arquivo
///   pode precisar de I/O).
pub trait ResourceOps {
    /// Tabela de arquivos abertos
    type Files: Send;

    /// Referência ao diretório corrente
    type Cwd: Send;

    /// Referência nova à raiz do filesystem ("/")
    fn root_directory(&self) -> Self::Cwd;

    fn duplicate_files(&self, files: &Self::Files) -> Self::Files;

    fn release_files(&self, files: Self::Files);

    fn duplicate_cwd(&self, cwd: &Self::Cwd) -> Self::Cwd;

    fn release_cwd(&self, cwd: Self::Cwd);
}
