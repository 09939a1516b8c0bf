//! Sistema de eventos para observabilidade do pipeline

use async_trait::async_trait;
use crate::error::Result;
use crate::traits::EventEmitter;
use crate::types::PipelineEvent;
use tracing::{error, info};

/// Implementação simples de EventEmitter que logga eventos
#[derive(Debug, Clone, Default)]
pub struct LoggingEventEmitter;

impl LoggingEventEmitter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventEmitter for LoggingEventEmitter {
    async fn emit(&self, event: PipelineEvent) -> Result<()> {
        match event {
            PipelineEvent::Iniciado { pipeline_id, timestamp } => {
                info!(
                    pipeline_id = %pipeline_id,
                    timestamp = ?timestamp,
                    "Migração iniciada"
                );
            }
            PipelineEvent::EstadoAlterado {
                pipeline_id,
                estado_anterior,
                estado_novo,
                timestamp,
            } => {
                info!(
                    pipeline_id = %pipeline_id,
                    estado_anterior = %estado_anterior,
                    estado_novo = %estado_novo,
                    timestamp = ?timestamp,
                    "Estado do pipeline alterado"
                );
            }
            PipelineEvent::Erro { pipeline_id, erro, timestamp } => {
                error!(
                    pipeline_id = %pipeline_id,
                    erro = %erro,
                    timestamp = ?timestamp,
                    "Erro na migração"
                );
            }
            PipelineEvent::Concluido { pipeline_id, resultado, timestamp } => {
                info!(
                    pipeline_id = %pipeline_id,
                    cursos = resultado.cursos,
                    modulos = resultado.modulos,
                    aulas = resultado.aulas,
                    total_linhas = resultado.total_linhas(),
                    tempo_execucao_ms = resultado.tempo_execucao_ms,
                    timestamp = ?timestamp,
                    "Migração concluída"
                );
            }
        }

        Ok(())
    }
}

/// EventEmitter que imprime o progresso das etapas no stdout.
///
/// Usado pelo binário para manter as linhas de progresso visíveis
/// independentemente do filtro de log configurado.
#[derive(Debug, Clone, Default)]
pub struct ProgressoConsole;

impl ProgressoConsole {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventEmitter for ProgressoConsole {
    async fn emit(&self, event: PipelineEvent) -> Result<()> {
        use crate::types::EstadoPipeline;

        if let PipelineEvent::EstadoAlterado { estado_novo, .. } = &event {
            match estado_novo {
                EstadoPipeline::Extraindo => {
                    println!("📖 Lendo arquivos de exportação...");
                }
                EstadoPipeline::Carregando => {
                    println!("✍️  Escrevendo arquivo de importação...");
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// EventEmitter que armazena eventos em memória para testes
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventEmitter {
    events: std::sync::Arc<std::sync::Mutex<Vec<PipelineEvent>>>,
}

impl InMemoryEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retorna todos os eventos capturados
    pub fn get_events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Retorna o número de eventos capturados
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl EventEmitter for InMemoryEventEmitter {
    async fn emit(&self, event: PipelineEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
