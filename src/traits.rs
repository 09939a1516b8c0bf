use async_trait::async_trait;
use crate::error::Result;
use crate::types::{LinhaImportacao, Registro, ResultadoMigracao, Tabelas};

/// Trait para componentes que extraem registros de uma fonte
#[async_trait]
pub trait Extrator: Send + Sync {
    /// Extrai todos os registros da fonte, já normalizados
    async fn extrair(&self) -> Result<Vec<Registro>>;
}

/// Trait para componentes que montam as linhas de importação
/// a partir das três tabelas
#[async_trait]
pub trait Transformador: Send + Sync {
    /// Filtra, junta e ordena as tabelas, produzindo a sequência
    /// final de linhas de importação
    async fn montar(&self, tabelas: Tabelas) -> Result<Vec<LinhaImportacao>>;
}

/// Trait para componentes que gravam as linhas no destino
#[async_trait]
pub trait Carregador: Send + Sync {
    /// Grava as linhas no destino e retorna o resumo da carga
    async fn carregar(&self, linhas: Vec<LinhaImportacao>) -> Result<ResultadoMigracao>;

    /// Finaliza a carga (flush, fechamento de arquivo, etc.)
    async fn finalizar(&self) -> Result<()> {
        Ok(()) // Implementação padrão
    }
}

/// Trait para emissão de eventos do pipeline
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Emite um evento do pipeline
    async fn emit(&self, event: crate::types::PipelineEvent) -> Result<()>;
}
