use migracao_cct::pipeline::Fontes;
use migracao_cct::prelude::*;

/// Migração única, sem argumentos: lê as três exportações do diretório
/// atual e reescreve o arquivo de importação. Qualquer erro fatal
/// encerra o processo com código diferente de zero.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = MigracaoConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.observabilidade.log_level)
                }),
        )
        .with_target(false)
        .init();

    let pipeline = Pipeline::with_config(config.clone())
        .extract(Fontes::new(
            LeitorCsv::new(&config.arquivos.cursos),
            LeitorCsv::new(&config.arquivos.modulos),
            LeitorCsv::new(&config.arquivos.aulas),
        ))
        .transform(MontadorHierarquia::new(&config))
        .load(EscritorCsv::new(&config.arquivos.saida))
        .event_emitter(ProgressoConsole::new())
        .build();

    let resultado = pipeline.executar().await?;

    println!("\n✅ Arquivo '{}' criado com sucesso!", config.arquivos.saida);
    println!("📊 Estatísticas:");
    println!("   - {} cursos", resultado.cursos);
    println!("   - {} módulos", resultado.modulos);
    println!("   - {} aulas", resultado.aulas);
    println!(
        "   - Total de linhas: {} (incluindo cabeçalho)",
        resultado.total_linhas() + 1
    );

    Ok(())
}
