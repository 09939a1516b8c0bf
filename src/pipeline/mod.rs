use crate::config::MigracaoConfig;
use crate::error::Result;
use crate::events::LoggingEventEmitter;
use crate::traits::{Carregador, EventEmitter, Extrator, Transformador};
use crate::types::{EstadoPipeline, PipelineEvent, ResultadoMigracao, Tabelas};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// As três fontes de exportação, na ordem em que são lidas
pub struct Fontes {
    cursos: Box<dyn Extrator>,
    modulos: Box<dyn Extrator>,
    aulas: Box<dyn Extrator>,
}

impl Fontes {
    pub fn new<C, M, A>(cursos: C, modulos: M, aulas: A) -> Self
    where
        C: Extrator + 'static,
        M: Extrator + 'static,
        A: Extrator + 'static,
    {
        Self {
            cursos: Box::new(cursos),
            modulos: Box::new(modulos),
            aulas: Box::new(aulas),
        }
    }
}

/// Pipeline de migração: três extrações sequenciais, uma montagem
/// de hierarquia e uma carga única no destino
pub struct Pipeline<T, L> {
    fontes: Fontes,
    transformador: T,
    carregador: L,
    config: MigracaoConfig,
    state: Arc<std::sync::Mutex<EstadoPipeline>>,
    event_emitter: Arc<dyn EventEmitter>,
    pipeline_id: String,
}

impl Pipeline<(), ()> {
    /// Cria um novo builder de pipeline
    pub fn builder() -> PipelineBuilder<(), (), ()> {
        PipelineBuilder::new()
    }

    /// Cria um builder com configuração personalizada
    pub fn with_config(config: MigracaoConfig) -> PipelineBuilder<(), (), ()> {
        PipelineBuilder::with_config(config)
    }
}

impl<T, L> Pipeline<T, L>
where
    T: Transformador + Send + Sync,
    L: Carregador + Send + Sync,
{
    /// Retorna o ID do pipeline
    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Retorna o estado atual do pipeline
    pub fn estado_atual(&self) -> EstadoPipeline {
        self.state.lock().unwrap().clone()
    }

    /// Retorna a configuração em uso
    pub fn config(&self) -> &MigracaoConfig {
        &self.config
    }

    /// Altera o estado do pipeline e emite evento
    async fn set_state(&self, estado_novo: EstadoPipeline) -> Result<()> {
        let estado_anterior = {
            let mut state = self.state.lock().unwrap();
            let anterior = state.clone();
            *state = estado_novo.clone();
            anterior
        };

        let event = PipelineEvent::EstadoAlterado {
            pipeline_id: self.pipeline_id.clone(),
            estado_anterior,
            estado_novo,
            timestamp: SystemTime::now(),
        };

        self.event_emitter.emit(event).await?;
        Ok(())
    }

    /// Registra a falha no estado e nos eventos antes de propagar o erro
    async fn falhar(&self, contexto: &str, erro: &crate::error::MigracaoError) -> Result<()> {
        let mensagem = format!("{}: {}", contexto, erro);
        self.set_state(EstadoPipeline::Falhou(mensagem.clone())).await?;

        let event = PipelineEvent::Erro {
            pipeline_id: self.pipeline_id.clone(),
            erro: mensagem,
            timestamp: SystemTime::now(),
        };
        self.event_emitter.emit(event).await?;
        Ok(())
    }

    /// Executa a migração de ponta a ponta.
    ///
    /// Totalmente sequencial: cada arquivo é lido por inteiro antes do
    /// próximo, e o destino só é aberto depois que as três tabelas foram
    /// extraídas e a lista de linhas está completa. Qualquer falha aborta
    /// a execução sem saída parcial.
    pub async fn executar(&self) -> Result<ResultadoMigracao> {
        let start_time = Instant::now();

        let start_event = PipelineEvent::Iniciado {
            pipeline_id: self.pipeline_id.clone(),
            timestamp: SystemTime::now(),
        };
        self.event_emitter.emit(start_event).await?;

        self.set_state(EstadoPipeline::Extraindo).await?;

        tracing::info!("Lendo arquivos de exportação");
        let cursos = match self.fontes.cursos.extrair().await {
            Ok(registros) => {
                tracing::info!("Lidos {} registros de cursos", registros.len());
                registros
            }
            Err(e) => {
                self.falhar("Erro na extração de cursos", &e).await?;
                return Err(e);
            }
        };

        let modulos = match self.fontes.modulos.extrair().await {
            Ok(registros) => {
                tracing::info!("Lidos {} registros de módulos", registros.len());
                registros
            }
            Err(e) => {
                self.falhar("Erro na extração de módulos", &e).await?;
                return Err(e);
            }
        };

        let aulas = match self.fontes.aulas.extrair().await {
            Ok(registros) => {
                tracing::info!("Lidos {} registros de aulas", registros.len());
                registros
            }
            Err(e) => {
                self.falhar("Erro na extração de aulas", &e).await?;
                return Err(e);
            }
        };

        self.set_state(EstadoPipeline::Transformando).await?;

        tracing::info!("Montando hierarquia curso → módulo → aula");
        let tabelas = Tabelas { cursos, modulos, aulas };
        let linhas = match self.transformador.montar(tabelas).await {
            Ok(linhas) => {
                tracing::info!("Montadas {} linhas de importação", linhas.len());
                linhas
            }
            Err(e) => {
                self.falhar("Erro na montagem da hierarquia", &e).await?;
                return Err(e);
            }
        };

        self.set_state(EstadoPipeline::Carregando).await?;

        tracing::info!("Escrevendo arquivo de importação");
        let mut resultado = match self.carregador.carregar(linhas).await {
            Ok(resultado) => resultado,
            Err(e) => {
                self.falhar("Erro na escrita do arquivo de importação", &e).await?;
                return Err(e);
            }
        };

        self.carregador.finalizar().await?;

        resultado.tempo_execucao_ms = start_time.elapsed().as_millis() as u64;

        self.set_state(EstadoPipeline::Concluido).await?;

        let completion_event = PipelineEvent::Concluido {
            pipeline_id: self.pipeline_id.clone(),
            resultado: resultado.clone(),
            timestamp: SystemTime::now(),
        };
        self.event_emitter.emit(completion_event).await?;

        tracing::info!(
            "Migração concluída - {} cursos, {} módulos, {} aulas em {}ms",
            resultado.cursos,
            resultado.modulos,
            resultado.aulas,
            resultado.tempo_execucao_ms
        );

        Ok(resultado)
    }
}

/// Builder para criação de pipelines
pub struct PipelineBuilder<F, T, L> {
    fontes: F,
    transformador: T,
    carregador: L,
    config: MigracaoConfig,
    event_emitter: Option<Arc<dyn EventEmitter>>,
    _phantom: PhantomData<(F, T, L)>,
}

impl PipelineBuilder<(), (), ()> {
    /// Cria um novo builder
    pub fn new() -> Self {
        Self {
            fontes: (),
            transformador: (),
            carregador: (),
            config: MigracaoConfig::default(),
            event_emitter: None,
            _phantom: PhantomData,
        }
    }

    /// Cria um builder com configuração personalizada
    pub fn with_config(config: MigracaoConfig) -> Self {
        Self {
            fontes: (),
            transformador: (),
            carregador: (),
            config,
            event_emitter: None,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, L> PipelineBuilder<F, T, L> {
    /// Define as três fontes de exportação
    pub fn extract(self, fontes: Fontes) -> PipelineBuilder<Fontes, T, L> {
        PipelineBuilder {
            fontes,
            transformador: self.transformador,
            carregador: self.carregador,
            config: self.config,
            event_emitter: self.event_emitter,
            _phantom: PhantomData,
        }
    }

    /// Define o transformador
    pub fn transform<NewT: Transformador + Send + Sync>(
        self,
        transformador: NewT,
    ) -> PipelineBuilder<F, NewT, L> {
        PipelineBuilder {
            fontes: self.fontes,
            transformador,
            carregador: self.carregador,
            config: self.config,
            event_emitter: self.event_emitter,
            _phantom: PhantomData,
        }
    }

    /// Define o carregador
    pub fn load<NewL: Carregador + Send + Sync>(
        self,
        carregador: NewL,
    ) -> PipelineBuilder<F, T, NewL> {
        PipelineBuilder {
            fontes: self.fontes,
            transformador: self.transformador,
            carregador,
            config: self.config,
            event_emitter: self.event_emitter,
            _phantom: PhantomData,
        }
    }

    /// Define a configuração
    pub fn config(mut self, config: MigracaoConfig) -> Self {
        self.config = config;
        self
    }

    /// Define o event emitter
    pub fn event_emitter<E: EventEmitter + 'static>(mut self, emitter: E) -> Self {
        self.event_emitter = Some(Arc::new(emitter));
        self
    }
}

impl<T, L> PipelineBuilder<Fontes, T, L>
where
    T: Transformador + Send + Sync,
    L: Carregador + Send + Sync,
{
    /// Constrói o pipeline
    pub fn build(self) -> Pipeline<T, L> {
        Pipeline {
            fontes: self.fontes,
            transformador: self.transformador,
            carregador: self.carregador,
            config: self.config,
            state: Arc::new(std::sync::Mutex::new(EstadoPipeline::default())),
            event_emitter: self
                .event_emitter
                .unwrap_or_else(|| Arc::new(LoggingEventEmitter::default())),
            pipeline_id: format!(
                "migracao-{}-{}",
                std::process::id(),
                SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis()
            ),
        }
    }
}

impl Default for PipelineBuilder<(), (), ()> {
    fn default() -> Self {
        Self::new()
    }
}
