//! Carregador em memória, usado nos testes do pipeline.

use async_trait::async_trait;
use crate::error::Result;
use crate::traits::Carregador;
use crate::types::{LinhaImportacao, ResultadoMigracao};

/// Carregador que acumula as linhas em memória em vez de gravar em disco
#[derive(Debug, Clone, Default)]
pub struct CarregadorMemoria {
    linhas: std::sync::Arc<std::sync::Mutex<Vec<LinhaImportacao>>>,
}

impl CarregadorMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna uma cópia das linhas carregadas
    pub fn linhas(&self) -> Vec<LinhaImportacao> {
        self.linhas.lock().unwrap().clone()
    }

    /// Número de linhas carregadas
    pub fn total(&self) -> usize {
        self.linhas.lock().unwrap().len()
    }
}

#[async_trait]
impl Carregador for CarregadorMemoria {
    async fn carregar(&self, linhas: Vec<LinhaImportacao>) -> Result<ResultadoMigracao> {
        let mut resultado = ResultadoMigracao::new();
        for linha in &linhas {
            match linha {
                LinhaImportacao::Curso(_) => resultado.cursos += 1,
                LinhaImportacao::Modulo(_) => resultado.modulos += 1,
                LinhaImportacao::Aula(_) => resultado.aulas += 1,
            }
        }

        // cada carga substitui a anterior, como a reescrita do arquivo
        *self.linhas.lock().unwrap() = linhas;

        Ok(resultado)
    }
}
