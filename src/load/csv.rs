//! Escrita do arquivo de importação.
//!
//! O esquema de saída é largo e fixo: 14 colunas, uma linha por entidade,
//! com as colunas das outras entidades vazias. A união etiquetada
//! [`LinhaImportacao`] só é achatada para esse esquema aqui, na fronteira
//! do escritor.

use async_trait::async_trait;
use std::path::Path;
use crate::error::Result;
use crate::traits::Carregador;
use crate::types::{LinhaImportacao, ResultadoMigracao};

/// Cabeçalho fixo do arquivo de importação, na ordem exigida pela plataforma
pub const CABECALHO: [&str; 14] = [
    "tipo",
    "curso_titulo",
    "curso_descricao",
    "curso_instrutor",
    "curso_duracao_horas",
    "modulo_titulo",
    "modulo_descricao",
    "aula_titulo",
    "aula_descricao",
    "aula_video_provider",
    "aula_video_id",
    "aula_duracao_minutos",
    "aula_ordem",
    "aula_teste_gratis",
];

/// Carregador que grava as linhas em CSV separado por vírgula.
///
/// O arquivo é truncado e reescrito por inteiro; campos com vírgula,
/// aspas ou quebra de linha saem entre aspas (quoting padrão do crate
/// `csv`).
#[derive(Debug, Clone)]
pub struct EscritorCsv {
    file_path: String,
}

impl EscritorCsv {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Achata uma linha etiquetada para o esquema de 14 colunas
    fn em_colunas(linha: &LinhaImportacao) -> [String; 14] {
        let mut colunas: [String; 14] = Default::default();
        colunas[0] = linha.tipo().to_string();

        match linha {
            LinhaImportacao::Curso(curso) => {
                colunas[1] = curso.titulo.clone();
                colunas[2] = curso.descricao.clone();
                colunas[3] = curso.instrutor.clone();
                colunas[4] = curso.carga_horaria.clone();
            }
            LinhaImportacao::Modulo(modulo) => {
                colunas[5] = modulo.titulo.clone();
            }
            LinhaImportacao::Aula(aula) => {
                colunas[7] = aula.titulo.clone();
                colunas[9] = aula.provedor.as_str().to_string();
                colunas[10] = aula.video_id.clone();
                colunas[11] = aula.minutos.clone();
                colunas[12] = aula.ordem.to_string();
                colunas[13] = if aula.teste_gratis { "sim" } else { "nao" }.to_string();
            }
        }

        colunas
    }
}

#[async_trait]
impl Carregador for EscritorCsv {
    async fn carregar(&self, linhas: Vec<LinhaImportacao>) -> Result<ResultadoMigracao> {
        // O arquivo só é aberto aqui, depois de toda a montagem:
        // nenhuma falha anterior deixa saída parcial no disco
        let mut writer = csv::Writer::from_path(&self.file_path)?;
        writer.write_record(CABECALHO)?;

        let mut resultado = ResultadoMigracao::new();
        for linha in &linhas {
            match linha {
                LinhaImportacao::Curso(_) => resultado.cursos += 1,
                LinhaImportacao::Modulo(_) => resultado.modulos += 1,
                LinhaImportacao::Aula(_) => resultado.aulas += 1,
            }
            writer.write_record(Self::em_colunas(linha))?;
        }

        writer.flush().map_err(|e| crate::error::LoadError::Escrita {
            caminho: self.file_path.clone(),
            causa: e.to_string(),
        })?;

        tracing::debug!(
            arquivo = %self.file_path,
            linhas = resultado.total_linhas(),
            "Arquivo de importação gravado"
        );

        Ok(resultado)
    }
}
