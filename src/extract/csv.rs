use async_trait::async_trait;
use std::path::Path;
use crate::error::{ExtractError, Result};
use crate::types::{normalizar_campo, Registro};
use crate::traits::Extrator;

/// Leitor tolerante para as exportações delimitadas do Bubble.
///
/// As exportações chegam com ponto e vírgula como separador, linhas em
/// branco espalhadas, aspas sobrando e eventualmente bytes fora de UTF-8.
/// O leitor nunca aborta por causa de linha malformada: campos faltantes
/// viram string vazia, campos sobrando são descartados e bytes
/// indecodificáveis são substituídos.
#[derive(Debug, Clone)]
pub struct LeitorCsv {
    file_path: String,
    delimitador: char,
}

impl LeitorCsv {
    /// Cria um novo leitor com ponto e vírgula como separador
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_string_lossy().to_string(),
            delimitador: ';',
        }
    }

    /// Define o separador de campos
    pub fn with_delimitador(mut self, delimitador: char) -> Self {
        self.delimitador = delimitador;
        self
    }

    /// Divide o conteúdo em cabeçalho e registros.
    ///
    /// A linha 0 é o cabeçalho, a menos que esteja em branco; nesse caso a
    /// linha 1 assume (um passo só, sem recursão). Os registros são sempre
    /// varridos a partir da linha 1, como na ferramenta original.
    fn parse_conteudo(&self, conteudo: &str) -> Vec<Registro> {
        let linhas: Vec<&str> = conteudo.split('\n').collect();

        if linhas.len() < 2 {
            return Vec::new();
        }

        let linha_cabecalho = if !linhas[0].trim().is_empty() {
            linhas[0]
        } else {
            linhas[1]
        };
        let cabecalhos: Vec<String> = linha_cabecalho
            .split(self.delimitador)
            .map(|h| h.trim().to_string())
            .collect();

        let mut registros = Vec::new();
        for linha in &linhas[1..] {
            if linha.trim().is_empty() {
                continue;
            }

            let valores: Vec<&str> = linha.split(self.delimitador).collect();
            let mut registro = Registro::new();
            for (i, cabecalho) in cabecalhos.iter().enumerate() {
                registro.insert(cabecalho.clone(), normalizar_campo(valores.get(i).copied()));
            }

            registros.push(registro);
        }

        registros
    }
}

#[async_trait]
impl Extrator for LeitorCsv {
    async fn extrair(&self) -> Result<Vec<Registro>> {
        let bytes = tokio::fs::read(&self.file_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractError::ArquivoNaoEncontrado(self.file_path.clone())
            } else {
                ExtractError::Leitura {
                    caminho: self.file_path.clone(),
                    causa: e.to_string(),
                }
            }
        })?;

        // Decodificação com perda: ruído de encoding não derruba a execução
        let conteudo = String::from_utf8_lossy(&bytes);

        tracing::debug!(
            arquivo = %self.file_path,
            bytes = bytes.len(),
            "Arquivo de exportação lido"
        );

        Ok(self.parse_conteudo(&conteudo))
    }
}
