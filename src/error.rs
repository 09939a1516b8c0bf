use thiserror::Error;

/// Tipo Result principal da biblioteca
pub type Result<T> = std::result::Result<T, MigracaoError>;

/// Erro principal da migração
#[derive(Error, Debug)]
pub enum MigracaoError {
    #[error("Erro de extração: {0}")]
    Extract(#[from] ExtractError),

    #[error("Erro de transformação: {0}")]
    Transform(#[from] TransformError),

    #[error("Erro de escrita: {0}")]
    Load(#[from] LoadError),

    #[error("Erro de configuração: {0}")]
    Config(#[from] ConfigError),

    #[error("Erro de pipeline: {0}")]
    Pipeline(String),

    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro genérico: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Erros relacionados à leitura dos arquivos de exportação
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Arquivo não encontrado: {0}")]
    ArquivoNaoEncontrado(String),

    #[error("Falha ao ler {caminho}: {causa}")]
    Leitura { caminho: String, causa: String },
}

/// Erros relacionados à montagem da hierarquia
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Coluna obrigatória ausente: {0}")]
    ColunaAusente(String),

    #[error("Erro de processamento: {0}")]
    Processamento(String),
}

/// Erros relacionados à escrita do arquivo de importação
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Erro de escrita em {caminho}: {causa}")]
    Escrita { caminho: String, causa: String },
}

/// Erros relacionados à configuração
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("Valor inválido para {param}: {value}")]
    InvalidValue { param: String, value: String },

    #[error("Erro de parsing de configuração: {0}")]
    ParseError(String),
}

impl MigracaoError {
    /// Retorna o código de erro
    pub fn error_code(&self) -> &'static str {
        match self {
            MigracaoError::Extract(_) => "EXTRACT_ERROR",
            MigracaoError::Transform(_) => "TRANSFORM_ERROR",
            MigracaoError::Load(_) => "LOAD_ERROR",
            MigracaoError::Config(_) => "CONFIG_ERROR",
            MigracaoError::Pipeline(_) => "PIPELINE_ERROR",
            MigracaoError::Io(_) => "IO_ERROR",
            MigracaoError::Generic(_) => "GENERIC_ERROR",
        }
    }

    /// Indica se o erro interrompe a execução inteira (nenhuma saída parcial)
    pub fn is_fatal(&self) -> bool {
        // A ferramenta roda do zero a cada execução: todo erro aborta
        true
    }
}

impl From<config::ConfigError> for MigracaoError {
    fn from(err: config::ConfigError) -> Self {
        MigracaoError::Config(ConfigError::ParseError(err.to_string()))
    }
}

impl From<csv::Error> for MigracaoError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io_err) => {
                MigracaoError::Io(std::io::Error::new(io_err.kind(), io_err.to_string()))
            }
            _ => MigracaoError::Load(LoadError::Escrita {
                caminho: String::new(),
                causa: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = MigracaoError::Extract(ExtractError::ArquivoNaoEncontrado(
            "cursos_original.csv".to_string(),
        ));
        assert_eq!(err.error_code(), "EXTRACT_ERROR");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_display_arquivo_nao_encontrado() {
        let err = ExtractError::ArquivoNaoEncontrado("aulas_original.csv".to_string());
        assert!(err.to_string().contains("aulas_original.csv"));
    }
}
