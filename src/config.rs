use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuração principal da migração
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigracaoConfig {
    pub arquivos: ArquivosConfig,
    pub curso: CursoConfig,
    pub ordenacao: OrdenacaoConfig,
    pub observabilidade: ObservabilidadeConfig,
}

/// Caminhos dos arquivos de entrada e saída
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArquivosConfig {
    pub cursos: String,
    pub modulos: String,
    pub aulas: String,
    pub saida: String,
}

/// Constantes de negócio aplicadas aos cursos
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CursoConfig {
    /// Instrutor fixo atribuído a todos os cursos importados
    pub instrutor: String,
    /// Carga horária assumida quando a coluna não existe na exportação
    pub carga_horaria_padrao: String,
    /// Limite de caracteres ao derivar a descrição breve da descrição longa
    pub descricao_max_chars: usize,
}

/// Padrões de coerção das chaves de ordenação
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrdenacaoConfig {
    /// Módulos sem ordenação válida vão para o início
    pub padrao_modulo: f64,
    /// Aulas sem ordenação válida vão para o fim
    pub padrao_aula: f64,
}

/// Configuração de observabilidade
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilidadeConfig {
    pub log_level: String,
}

impl Default for MigracaoConfig {
    fn default() -> Self {
        Self {
            arquivos: ArquivosConfig::default(),
            curso: CursoConfig::default(),
            ordenacao: OrdenacaoConfig::default(),
            observabilidade: ObservabilidadeConfig::default(),
        }
    }
}

impl Default for ArquivosConfig {
    fn default() -> Self {
        Self {
            cursos: "cursos_original.csv".to_string(),
            modulos: "modulos_original.csv".to_string(),
            aulas: "aulas_original.csv".to_string(),
            saida: "importacao_cct.csv".to_string(),
        }
    }
}

impl Default for CursoConfig {
    fn default() -> Self {
        Self {
            instrutor: "Vicelmo Alencar".to_string(),
            carga_horaria_padrao: "10".to_string(),
            descricao_max_chars: 200,
        }
    }
}

impl Default for OrdenacaoConfig {
    fn default() -> Self {
        Self {
            padrao_modulo: 0.0,
            padrao_aula: 999.0,
        }
    }
}

impl Default for ObservabilidadeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl MigracaoConfig {
    /// Cria um novo builder para configuração
    pub fn builder() -> MigracaoConfigBuilder {
        MigracaoConfigBuilder::default()
    }

    /// Carrega configuração do ambiente, mantendo os padrões quando
    /// a variável não está definida
    pub fn from_env() -> Result<Self, crate::error::MigracaoError> {
        let mut builder = Self::builder();

        if let Ok(instrutor) = std::env::var("MIGRACAO_INSTRUTOR") {
            builder = builder.instrutor(instrutor);
        }

        if let Ok(caminho) = std::env::var("MIGRACAO_ARQUIVO_CURSOS") {
            builder = builder.arquivo_cursos(caminho);
        }

        if let Ok(caminho) = std::env::var("MIGRACAO_ARQUIVO_MODULOS") {
            builder = builder.arquivo_modulos(caminho);
        }

        if let Ok(caminho) = std::env::var("MIGRACAO_ARQUIVO_AULAS") {
            builder = builder.arquivo_aulas(caminho);
        }

        if let Ok(caminho) = std::env::var("MIGRACAO_ARQUIVO_SAIDA") {
            builder = builder.arquivo_saida(caminho);
        }

        if let Ok(level) = std::env::var("MIGRACAO_LOG_LEVEL") {
            builder = builder.log_level(level);
        }

        builder.build()
    }

    /// Carrega configuração de arquivo
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::error::MigracaoError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Carrega configuração de string TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, crate::error::MigracaoError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Valida a configuração
    pub fn validate(&self) -> Result<(), crate::error::MigracaoError> {
        use crate::error::{ConfigError, MigracaoError};

        if self.curso.instrutor.trim().is_empty() {
            return Err(MigracaoError::Config(ConfigError::InvalidValue {
                param: "curso.instrutor".to_string(),
                value: self.curso.instrutor.clone(),
            }));
        }

        if self.curso.descricao_max_chars == 0 {
            return Err(MigracaoError::Config(ConfigError::InvalidValue {
                param: "curso.descricao_max_chars".to_string(),
                value: "0".to_string(),
            }));
        }

        for (param, caminho) in [
            ("arquivos.cursos", &self.arquivos.cursos),
            ("arquivos.modulos", &self.arquivos.modulos),
            ("arquivos.aulas", &self.arquivos.aulas),
            ("arquivos.saida", &self.arquivos.saida),
        ] {
            if caminho.trim().is_empty() {
                return Err(MigracaoError::Config(ConfigError::InvalidValue {
                    param: param.to_string(),
                    value: caminho.clone(),
                }));
            }
        }

        Ok(())
    }
}

/// Builder para configuração da migração
#[derive(Default)]
pub struct MigracaoConfigBuilder {
    config: MigracaoConfig,
}

impl MigracaoConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instrutor(mut self, instrutor: impl Into<String>) -> Self {
        self.config.curso.instrutor = instrutor.into();
        self
    }

    pub fn carga_horaria_padrao(mut self, carga: impl Into<String>) -> Self {
        self.config.curso.carga_horaria_padrao = carga.into();
        self
    }

    pub fn descricao_max_chars(mut self, max: usize) -> Self {
        self.config.curso.descricao_max_chars = max;
        self
    }

    pub fn arquivo_cursos(mut self, caminho: impl Into<String>) -> Self {
        self.config.arquivos.cursos = caminho.into();
        self
    }

    pub fn arquivo_modulos(mut self, caminho: impl Into<String>) -> Self {
        self.config.arquivos.modulos = caminho.into();
        self
    }

    pub fn arquivo_aulas(mut self, caminho: impl Into<String>) -> Self {
        self.config.arquivos.aulas = caminho.into();
        self
    }

    pub fn arquivo_saida(mut self, caminho: impl Into<String>) -> Self {
        self.config.arquivos.saida = caminho.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.observabilidade.log_level = level.into();
        self
    }

    pub fn build(self) -> Result<MigracaoConfig, crate::error::MigracaoError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MigracaoConfig::default();
        assert_eq!(config.arquivos.cursos, "cursos_original.csv");
        assert_eq!(config.arquivos.saida, "importacao_cct.csv");
        assert_eq!(config.curso.instrutor, "Vicelmo Alencar");
        assert_eq!(config.curso.carga_horaria_padrao, "10");
        assert_eq!(config.curso.descricao_max_chars, 200);
        assert_eq!(config.ordenacao.padrao_modulo, 0.0);
        assert_eq!(config.ordenacao.padrao_aula, 999.0);
    }

    #[test]
    fn test_config_builder() {
        let config = MigracaoConfig::builder()
            .instrutor("Maria Souza")
            .arquivo_saida("saida.csv")
            .log_level("debug")
            .build()
            .unwrap();

        assert_eq!(config.curso.instrutor, "Maria Souza");
        assert_eq!(config.arquivos.saida, "saida.csv");
        assert_eq!(config.observabilidade.log_level, "debug");
    }

    #[test]
    fn test_config_validation() {
        let mut config = MigracaoConfig::default();
        config.curso.instrutor = "   ".to_string();
        assert!(config.validate().is_err());

        let mut config = MigracaoConfig::default();
        config.arquivos.saida = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
        [arquivos]
        cursos = "dados/cursos.csv"
        modulos = "dados/modulos.csv"
        aulas = "dados/aulas.csv"
        saida = "dados/importacao.csv"

        [curso]
        instrutor = "João Pereira"
        carga_horaria_padrao = "20"
        descricao_max_chars = 150

        [ordenacao]
        padrao_modulo = 0.0
        padrao_aula = 999.0

        [observabilidade]
        log_level = "warn"
        "#;

        let config = MigracaoConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.arquivos.cursos, "dados/cursos.csv");
        assert_eq!(config.curso.instrutor, "João Pereira");
        assert_eq!(config.curso.descricao_max_chars, 150);
    }
}
