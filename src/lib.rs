//! # Migração CCT
//!
//! Utilitário de migração, em lote e offline, que converte as três
//! exportações planas do Bubble (cursos, módulos e aulas, separadas por
//! ponto e vírgula) em um único arquivo hierárquico de importação para a
//! plataforma CCT (separado por vírgula).
//!
//! ## Fluxo
//!
//! Leitor → Normalizador → Montador de Hierarquia → Escritor, nessa ordem,
//! totalmente sequencial. Reexecutar com as mesmas entradas reescreve a
//! saída com conteúdo idêntico byte a byte.
//!
//! ## Exemplo Rápido
//!
//! ```rust,no_run
//! use migracao_cct::prelude::*;
//! use migracao_cct::pipeline::Fontes;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let config = MigracaoConfig::default();
//!
//!     let pipeline = Pipeline::with_config(config.clone())
//!         .extract(Fontes::new(
//!             LeitorCsv::new(&config.arquivos.cursos),
//!             LeitorCsv::new(&config.arquivos.modulos),
//!             LeitorCsv::new(&config.arquivos.aulas),
//!         ))
//!         .transform(MontadorHierarquia::new(&config))
//!         .load(EscritorCsv::new(&config.arquivos.saida))
//!         .build();
//!
//!     pipeline.executar().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Arquitetura
//!
//! ### Extract
//! Leitor tolerante para as exportações do Bubble: linhas curtas são
//! completadas, linhas longas são truncadas, bytes fora de UTF-8 são
//! substituídos e linhas em branco são puladas.
//!
//! ### Transform
//! Filtra registros ativos, junta módulos aos cursos e aulas aos módulos
//! pelas chaves estrangeiras, ordena pela chave de ordenação e achata a
//! hierarquia em linhas etiquetadas.
//!
//! ### Load
//! Grava o esquema fixo de 14 colunas em CSV separado por vírgula,
//! reescrevendo o arquivo por inteiro.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod extract;
pub mod transform;
pub mod load;
pub mod pipeline;
pub mod events;

// Re-exports para facilitar o uso
pub use config::MigracaoConfig;
pub use error::{MigracaoError, Result};
pub use types::{
    EstadoPipeline, LinhaImportacao, PipelineEvent, ProvedorVideo, Registro, ResultadoMigracao,
};
pub use traits::*;
pub use pipeline::Pipeline;
pub use events::{InMemoryEventEmitter, LoggingEventEmitter, ProgressoConsole};

/// Prelude com imports mais comuns
pub mod prelude {
    pub use crate::config::MigracaoConfig;
    pub use crate::error::{MigracaoError, Result};
    pub use crate::types::{
        EstadoPipeline, LinhaImportacao, PipelineEvent, ProvedorVideo, Registro,
        ResultadoMigracao,
    };
    pub use crate::traits::{Carregador, EventEmitter, Extrator, Transformador};
    pub use crate::pipeline::Pipeline;
    pub use crate::events::{InMemoryEventEmitter, LoggingEventEmitter, ProgressoConsole};

    pub use crate::extract::LeitorCsv;
    pub use crate::transform::MontadorHierarquia;
    pub use crate::load::{CarregadorMemoria, EscritorCsv};
}

/// Informações sobre a versão da ferramenta
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
