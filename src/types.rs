use std::collections::HashMap;

/// Registro bruto lido de um arquivo de exportação: nome da coluna → valor
pub type Registro = HashMap<String, String>;

/// Normaliza um campo escalar vindo da exportação.
///
/// Ordem das operações: ausência vira string vazia; depois remove espaços
/// das bordas, remove aspas duplas das bordas e remove espaços de novo
/// (trata valores como `"  \"valor\"  "`). Idempotente.
pub fn normalizar_campo(valor: Option<&str>) -> String {
    match valor {
        None => String::new(),
        Some(v) => v.trim().trim_matches('"').trim().to_string(),
    }
}

/// Lê um campo do registro, com padrão quando a coluna não existe
pub fn campo_ou<'a>(registro: &'a Registro, chave: &str, padrao: &'a str) -> &'a str {
    registro.get(chave).map(String::as_str).unwrap_or(padrao)
}

/// Lê um campo do registro, com padrão quando a coluna não existe ou está vazia
pub fn campo_ou_vazio<'a>(registro: &'a Registro, chave: &str, padrao: &'a str) -> &'a str {
    match registro.get(chave) {
        Some(v) if !v.is_empty() => v,
        _ => padrao,
    }
}

/// Flag de ativo: o registro só entra na saída quando o campo é `sim`,
/// ignorando maiúsculas/minúsculas
pub fn flag_ativo(registro: &Registro, chave: &str) -> bool {
    registro
        .get(chave)
        .map(|v| v.eq_ignore_ascii_case("sim"))
        .unwrap_or(false)
}

/// Coerção numérica da chave de ordenação. Valor ausente, vazio ou
/// não numérico cai no padrão em vez de abortar a execução.
pub fn coagir_ordenacao(registro: &Registro, chave: &str, padrao: f64) -> f64 {
    registro
        .get(chave)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(padrao)
}

/// As três tabelas normalizadas que alimentam a montagem da hierarquia
#[derive(Debug, Clone, Default)]
pub struct Tabelas {
    pub cursos: Vec<Registro>,
    pub modulos: Vec<Registro>,
    pub aulas: Vec<Registro>,
}

/// Provedor de vídeo reconhecido pela plataforma de destino
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvedorVideo {
    Vimeo,
    Youtube,
    Url,
}

impl ProvedorVideo {
    /// Normaliza a fonte de vídeo da exportação.
    ///
    /// Casamento por substring, sem diferenciar maiúsculas, na ordem:
    /// vimeo/vímeo, youtube, qualquer outra coisa vira `url`. Fonte
    /// ausente ou vazia assume Vímeo.
    pub fn normalizar(fonte: &str) -> Self {
        if fonte.is_empty() {
            return ProvedorVideo::Vimeo;
        }
        let fonte = fonte.to_lowercase();
        if fonte.contains("vimeo") || fonte.contains("vímeo") {
            ProvedorVideo::Vimeo
        } else if fonte.contains("youtube") {
            ProvedorVideo::Youtube
        } else {
            ProvedorVideo::Url
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProvedorVideo::Vimeo => "vimeo",
            ProvedorVideo::Youtube => "youtube",
            ProvedorVideo::Url => "url",
        }
    }
}

impl std::fmt::Display for ProvedorVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Curso ativo materializado a partir de um registro bruto.
/// Imutável depois de construído.
#[derive(Debug, Clone, PartialEq)]
pub struct Curso {
    pub id: String,
    pub titulo: String,
    pub descricao: String,
    pub instrutor: String,
    pub carga_horaria: String,
}

/// Módulo ativo de um curso
#[derive(Debug, Clone, PartialEq)]
pub struct Modulo {
    pub id: String,
    pub titulo: String,
    pub ordenacao: f64,
}

/// Aula ativa de um módulo. `ordem` é a posição 1-based na lista
/// ordenada do módulo, independente do valor de `ordenacao`.
#[derive(Debug, Clone, PartialEq)]
pub struct Aula {
    pub titulo: String,
    pub provedor: ProvedorVideo,
    pub video_id: String,
    pub minutos: String,
    pub teste_gratis: bool,
    pub ordenacao: f64,
    pub ordem: u32,
}

/// Uma linha do arquivo de importação, etiquetada pelo tipo de entidade.
/// O achatamento para o esquema largo de 14 colunas só acontece na
/// fronteira do escritor.
#[derive(Debug, Clone, PartialEq)]
pub enum LinhaImportacao {
    Curso(Curso),
    Modulo(Modulo),
    Aula(Aula),
}

impl LinhaImportacao {
    /// Discriminador `tipo` da linha no arquivo de saída
    pub fn tipo(&self) -> &'static str {
        match self {
            LinhaImportacao::Curso(_) => "curso",
            LinhaImportacao::Modulo(_) => "modulo",
            LinhaImportacao::Aula(_) => "aula",
        }
    }
}

/// Resultado de uma execução da migração
#[derive(Debug, Clone, Default)]
pub struct ResultadoMigracao {
    pub cursos: usize,
    pub modulos: usize,
    pub aulas: usize,
    pub tempo_execucao_ms: u64,
}

impl ResultadoMigracao {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total de linhas de dados escritas (sem o cabeçalho)
    pub fn total_linhas(&self) -> usize {
        self.cursos + self.modulos + self.aulas
    }
}

/// Estados do pipeline para rastreamento de execução
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EstadoPipeline {
    #[default]
    Ocioso,
    Extraindo,
    Transformando,
    Carregando,
    Concluido,
    Falhou(String),
}

impl std::fmt::Display for EstadoPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstadoPipeline::Ocioso => write!(f, "Ocioso"),
            EstadoPipeline::Extraindo => write!(f, "Extraindo"),
            EstadoPipeline::Transformando => write!(f, "Transformando"),
            EstadoPipeline::Carregando => write!(f, "Carregando"),
            EstadoPipeline::Concluido => write!(f, "Concluído"),
            EstadoPipeline::Falhou(erro) => write!(f, "Falhou: {}", erro),
        }
    }
}

/// Eventos do pipeline para monitoramento externo
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Migração iniciada
    Iniciado {
        pipeline_id: String,
        timestamp: std::time::SystemTime,
    },
    /// Estado alterado
    EstadoAlterado {
        pipeline_id: String,
        estado_anterior: EstadoPipeline,
        estado_novo: EstadoPipeline,
        timestamp: std::time::SystemTime,
    },
    /// Erro ocorreu
    Erro {
        pipeline_id: String,
        erro: String,
        timestamp: std::time::SystemTime,
    },
    /// Migração concluída
    Concluido {
        pipeline_id: String,
        resultado: ResultadoMigracao,
        timestamp: std::time::SystemTime,
    },
}
