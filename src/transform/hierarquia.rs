//! Montagem da hierarquia curso → módulo → aula.
//!
//! Todas as decisões de negócio moram aqui: filtro por flag de ativo,
//! junção por chave estrangeira, ordenação estável pela chave de
//! ordenação e os padrões de cada campo. O achatamento final é um
//! percurso em profundidade sem nenhuma decisão própria.

use async_trait::async_trait;
use crate::config::{CursoConfig, MigracaoConfig, OrdenacaoConfig};
use crate::error::Result;
use crate::traits::Transformador;
use crate::types::{
    campo_ou, campo_ou_vazio, coagir_ordenacao, flag_ativo, Aula, Curso, LinhaImportacao, Modulo,
    ProvedorVideo, Registro, Tabelas,
};

/// Seleção aninhada de um curso ativo com seus módulos e aulas
#[derive(Debug, Clone)]
struct CursoSelecionado {
    curso: Curso,
    modulos: Vec<ModuloSelecionado>,
}

#[derive(Debug, Clone)]
struct ModuloSelecionado {
    modulo: Modulo,
    aulas: Vec<Aula>,
}

/// Transformador que produz a sequência ordenada de linhas de importação
#[derive(Debug, Clone)]
pub struct MontadorHierarquia {
    curso: CursoConfig,
    ordenacao: OrdenacaoConfig,
}

impl MontadorHierarquia {
    pub fn new(config: &MigracaoConfig) -> Self {
        Self {
            curso: config.curso.clone(),
            ordenacao: config.ordenacao.clone(),
        }
    }

    fn materializar_curso(&self, registro: &Registro) -> Curso {
        let breve = campo_ou(registro, "breve_descricao", "");
        let descricao = if !breve.is_empty() {
            breve.to_string()
        } else {
            // truncagem por contagem de caracteres, sem respeitar palavras
            campo_ou(registro, "descricao", "")
                .chars()
                .take(self.curso.descricao_max_chars)
                .collect()
        };

        Curso {
            id: campo_ou(registro, "id_bubble_curso", "").to_string(),
            titulo: campo_ou(registro, "nome", "Curso sem nome").to_string(),
            descricao,
            instrutor: self.curso.instrutor.clone(),
            carga_horaria: campo_ou(
                registro,
                "carga_horaria",
                &self.curso.carga_horaria_padrao,
            )
            .to_string(),
        }
    }

    fn materializar_modulo(&self, registro: &Registro) -> Modulo {
        Modulo {
            id: campo_ou(registro, "id_bubble_modulo", "").to_string(),
            titulo: campo_ou_vazio(registro, "descricao", "Módulo").to_string(),
            ordenacao: coagir_ordenacao(registro, "ordenacao", self.ordenacao.padrao_modulo),
        }
    }

    fn materializar_aula(&self, registro: &Registro, ordem: u32) -> Aula {
        Aula {
            titulo: campo_ou_vazio(registro, "descricao", "Aula").to_string(),
            provedor: ProvedorVideo::normalizar(campo_ou(registro, "video_fonte", "")),
            video_id: campo_ou(registro, "video_id", "").to_string(),
            minutos: campo_ou(registro, "minutos", "0").to_string(),
            teste_gratis: flag_ativo(registro, "teste_gratis"),
            ordenacao: coagir_ordenacao(registro, "ordenacao", self.ordenacao.padrao_aula),
            ordem,
        }
    }

    /// Filtra, junta e ordena as três tabelas
    fn selecionar(&self, tabelas: &Tabelas) -> Vec<CursoSelecionado> {
        let mut selecao = Vec::new();

        for curso_reg in tabelas.cursos.iter().filter(|c| flag_ativo(c, "ativo")) {
            let curso = self.materializar_curso(curso_reg);

            // chave vazia não casa com nada: uma exportação sem a coluna de
            // chave estrangeira não pode pendurar todos os módulos num curso
            let mut modulos_reg: Vec<&Registro> = tabelas
                .modulos
                .iter()
                .filter(|m| {
                    !curso.id.is_empty()
                        && campo_ou(m, "id_bubble_curso", "") == curso.id
                        && flag_ativo(m, "ativo")
                })
                .collect();
            // ordenação estável: empates mantêm a ordem da tabela
            modulos_reg.sort_by(|a, b| {
                let ka = coagir_ordenacao(a, "ordenacao", self.ordenacao.padrao_modulo);
                let kb = coagir_ordenacao(b, "ordenacao", self.ordenacao.padrao_modulo);
                ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut modulos = Vec::new();
            for modulo_reg in modulos_reg {
                let modulo = self.materializar_modulo(modulo_reg);

                let mut aulas_reg: Vec<&Registro> = tabelas
                    .aulas
                    .iter()
                    .filter(|a| {
                        !modulo.id.is_empty()
                            && campo_ou(a, "id_bubble_modulo", "") == modulo.id
                            && flag_ativo(a, "ativo")
                    })
                    .collect();
                aulas_reg.sort_by(|a, b| {
                    let ka = coagir_ordenacao(a, "ordenacao", self.ordenacao.padrao_aula);
                    let kb = coagir_ordenacao(b, "ordenacao", self.ordenacao.padrao_aula);
                    ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
                });

                let aulas = aulas_reg
                    .into_iter()
                    .enumerate()
                    .map(|(idx, reg)| self.materializar_aula(reg, idx as u32 + 1))
                    .collect();

                modulos.push(ModuloSelecionado { modulo, aulas });
            }

            selecao.push(CursoSelecionado { curso, modulos });
        }

        selecao
    }

    /// Achata a seleção em profundidade: curso, depois cada módulo
    /// seguido imediatamente das suas aulas
    fn achatar(selecao: Vec<CursoSelecionado>) -> Vec<LinhaImportacao> {
        let mut linhas = Vec::new();

        for selecionado in selecao {
            linhas.push(LinhaImportacao::Curso(selecionado.curso));
            for modulo_sel in selecionado.modulos {
                linhas.push(LinhaImportacao::Modulo(modulo_sel.modulo));
                for aula in modulo_sel.aulas {
                    linhas.push(LinhaImportacao::Aula(aula));
                }
            }
        }

        linhas
    }
}

#[async_trait]
impl Transformador for MontadorHierarquia {
    async fn montar(&self, tabelas: Tabelas) -> Result<Vec<LinhaImportacao>> {
        let selecao = self.selecionar(&tabelas);

        tracing::debug!(
            cursos_ativos = selecao.len(),
            "Hierarquia montada"
        );

        Ok(Self::achatar(selecao))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registro(pares: &[(&str, &str)]) -> Registro {
        pares
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn montador() -> MontadorHierarquia {
        MontadorHierarquia::new(&MigracaoConfig::default())
    }

    fn curso_basico(id: &str, ativo: &str) -> Registro {
        registro(&[
            ("id_bubble_curso", id),
            ("nome", "Curso Teste"),
            ("breve_descricao", "Breve"),
            ("descricao", "Longa"),
            ("ativo", ativo),
            ("carga_horaria", "12"),
        ])
    }

    #[tokio::test]
    async fn test_filtra_inativos() {
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim"), curso_basico("C2", "nao")],
            modulos: vec![
                registro(&[
                    ("id_bubble_modulo", "M1"),
                    ("id_bubble_curso", "C1"),
                    ("descricao", "Módulo 1"),
                    ("ativo", "nao"),
                    ("ordenacao", "1"),
                ]),
            ],
            aulas: Vec::new(),
        };

        let linhas = montador().montar(tabelas).await.unwrap();

        // curso inativo e módulo inativo não geram linha
        assert_eq!(linhas.len(), 1);
        assert_eq!(linhas[0].tipo(), "curso");
    }

    #[tokio::test]
    async fn test_ordenacao_de_modulos() {
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: vec![
                registro(&[
                    ("id_bubble_modulo", "M2"),
                    ("id_bubble_curso", "C1"),
                    ("descricao", "Segundo"),
                    ("ativo", "sim"),
                    ("ordenacao", "2"),
                ]),
                registro(&[
                    ("id_bubble_modulo", "M1"),
                    ("id_bubble_curso", "C1"),
                    ("descricao", "Primeiro"),
                    ("ativo", "sim"),
                    ("ordenacao", "1"),
                ]),
            ],
            aulas: Vec::new(),
        };

        let linhas = montador().montar(tabelas).await.unwrap();

        assert_eq!(linhas.len(), 3);
        match (&linhas[1], &linhas[2]) {
            (LinhaImportacao::Modulo(a), LinhaImportacao::Modulo(b)) => {
                assert_eq!(a.titulo, "Primeiro");
                assert_eq!(b.titulo, "Segundo");
            }
            _ => panic!("esperava duas linhas de módulo"),
        }
    }

    #[tokio::test]
    async fn test_cenario_fim_a_fim() {
        // um curso, um módulo, duas aulas fora de ordem
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: vec![registro(&[
                ("id_bubble_modulo", "M1"),
                ("id_bubble_curso", "C1"),
                ("descricao", "Módulo 1"),
                ("ativo", "sim"),
                ("ordenacao", "1"),
            ])],
            aulas: vec![
                registro(&[
                    ("id_bubble_modulo", "M1"),
                    ("descricao", "Aula B"),
                    ("ativo", "sim"),
                    ("ordenacao", "2"),
                ]),
                registro(&[
                    ("id_bubble_modulo", "M1"),
                    ("descricao", "Aula A"),
                    ("ativo", "sim"),
                    ("ordenacao", "1"),
                ]),
            ],
        };

        let linhas = montador().montar(tabelas).await.unwrap();

        assert_eq!(linhas.len(), 4);
        assert_eq!(linhas[0].tipo(), "curso");
        assert_eq!(linhas[1].tipo(), "modulo");
        match (&linhas[2], &linhas[3]) {
            (LinhaImportacao::Aula(a), LinhaImportacao::Aula(b)) => {
                assert_eq!(a.titulo, "Aula A");
                assert_eq!(a.ordem, 1);
                assert_eq!(b.titulo, "Aula B");
                assert_eq!(b.ordem, 2);
            }
            _ => panic!("esperava duas linhas de aula"),
        }
    }

    #[tokio::test]
    async fn test_sequencia_de_aulas_e_densa() {
        // chaves de ordenação esparsas (10, 50, 999) viram sequência 1..3
        let aula = |ord: &str, titulo: &str| {
            registro(&[
                ("id_bubble_modulo", "M1"),
                ("descricao", titulo),
                ("ativo", "sim"),
                ("ordenacao", ord),
            ])
        };
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: vec![registro(&[
                ("id_bubble_modulo", "M1"),
                ("id_bubble_curso", "C1"),
                ("ativo", "sim"),
                ("ordenacao", "1"),
            ])],
            aulas: vec![aula("50", "B"), aula("10", "A"), aula("", "C")],
        };

        let linhas = montador().montar(tabelas).await.unwrap();
        let ordens: Vec<u32> = linhas
            .iter()
            .filter_map(|l| match l {
                LinhaImportacao::Aula(a) => Some(a.ordem),
                _ => None,
            })
            .collect();

        assert_eq!(ordens, vec![1, 2, 3]);
        // a aula sem ordenação cai no fim (padrão 999)
        match linhas.last().unwrap() {
            LinhaImportacao::Aula(a) => assert_eq!(a.titulo, "C"),
            _ => panic!("esperava aula no fim"),
        }
    }

    #[tokio::test]
    async fn test_curso_sem_modulos_e_modulo_sem_aulas() {
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: vec![registro(&[
                ("id_bubble_modulo", "M1"),
                ("id_bubble_curso", "C1"),
                ("ativo", "sim"),
            ])],
            aulas: Vec::new(),
        };

        let linhas = montador().montar(tabelas).await.unwrap();
        assert_eq!(linhas.len(), 2);
        assert_eq!(linhas[0].tipo(), "curso");
        assert_eq!(linhas[1].tipo(), "modulo");
    }

    #[tokio::test]
    async fn test_descricao_breve_com_fallback_truncado() {
        let longa: String = "0123456789".repeat(30);
        let mut curso = curso_basico("C1", "sim");
        curso.insert("breve_descricao".to_string(), String::new());
        curso.insert("descricao".to_string(), longa.clone());

        let tabelas = Tabelas {
            cursos: vec![curso],
            modulos: Vec::new(),
            aulas: Vec::new(),
        };

        let linhas = montador().montar(tabelas).await.unwrap();
        match &linhas[0] {
            LinhaImportacao::Curso(c) => {
                assert_eq!(c.descricao.chars().count(), 200);
                assert_eq!(c.descricao, longa.chars().take(200).collect::<String>());
            }
            _ => panic!("esperava linha de curso"),
        }
    }

    #[tokio::test]
    async fn test_padroes_de_modulo_e_aula() {
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: vec![registro(&[
                ("id_bubble_modulo", "M1"),
                ("id_bubble_curso", "C1"),
                ("descricao", ""),
                ("ativo", "sim"),
                ("ordenacao", "abc"),
            ])],
            aulas: vec![registro(&[
                ("id_bubble_modulo", "M1"),
                ("descricao", ""),
                ("ativo", "sim"),
                ("video_fonte", "YouTube HD"),
                ("video_id", "xyz"),
                ("teste_gratis", "SIM"),
            ])],
        };

        let linhas = montador().montar(tabelas).await.unwrap();

        match &linhas[1] {
            LinhaImportacao::Modulo(m) => {
                assert_eq!(m.titulo, "Módulo");
                assert_eq!(m.ordenacao, 0.0);
            }
            _ => panic!("esperava linha de módulo"),
        }
        match &linhas[2] {
            LinhaImportacao::Aula(a) => {
                assert_eq!(a.titulo, "Aula");
                assert_eq!(a.provedor, ProvedorVideo::Youtube);
                assert_eq!(a.video_id, "xyz");
                assert_eq!(a.minutos, "0");
                assert!(a.teste_gratis);
                assert_eq!(a.ordenacao, 999.0);
            }
            _ => panic!("esperava linha de aula"),
        }
    }

    #[tokio::test]
    async fn test_instrutor_vem_da_configuracao() {
        let config = MigracaoConfig::builder()
            .instrutor("Maria Souza")
            .build()
            .unwrap();
        let montador = MontadorHierarquia::new(&config);

        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: Vec::new(),
            aulas: Vec::new(),
        };

        let linhas = montador.montar(tabelas).await.unwrap();
        match &linhas[0] {
            LinhaImportacao::Curso(c) => assert_eq!(c.instrutor, "Maria Souza"),
            _ => panic!("esperava linha de curso"),
        }
    }

    #[tokio::test]
    async fn test_empate_de_modulos_mantem_ordem_da_tabela() {
        let modulo = |id: &str, titulo: &str| {
            registro(&[
                ("id_bubble_modulo", id),
                ("id_bubble_curso", "C1"),
                ("descricao", titulo),
                ("ativo", "sim"),
                ("ordenacao", "1"),
            ])
        };
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: vec![modulo("M1", "Primeiro da tabela"), modulo("M2", "Segundo da tabela")],
            aulas: Vec::new(),
        };

        let linhas = montador().montar(tabelas).await.unwrap();

        // empate na chave de ordenação: vale a ordem da tabela de entrada
        let titulos: Vec<&str> = linhas
            .iter()
            .filter_map(|l| match l {
                LinhaImportacao::Modulo(m) => Some(m.titulo.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(titulos, vec!["Primeiro da tabela", "Segundo da tabela"]);
    }

    #[tokio::test]
    async fn test_empate_de_aulas_mantem_ordem_da_tabela() {
        let aula = |ord: &str, titulo: &str| {
            registro(&[
                ("id_bubble_modulo", "M1"),
                ("descricao", titulo),
                ("ativo", "sim"),
                ("ordenacao", ord),
            ])
        };
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: vec![registro(&[
                ("id_bubble_modulo", "M1"),
                ("id_bubble_curso", "C1"),
                ("ativo", "sim"),
                ("ordenacao", "1"),
            ])],
            // duas aulas empatadas em 5 e duas sem ordenação (padrão 999)
            aulas: vec![
                aula("5", "Empate A"),
                aula("5", "Empate B"),
                aula("", "Sem chave A"),
                aula("", "Sem chave B"),
            ],
        };

        let linhas = montador().montar(tabelas).await.unwrap();

        let aulas: Vec<(&str, u32)> = linhas
            .iter()
            .filter_map(|l| match l {
                LinhaImportacao::Aula(a) => Some((a.titulo.as_str(), a.ordem)),
                _ => None,
            })
            .collect();
        // empates e padrões preservam a ordem relativa da tabela
        assert_eq!(
            aulas,
            vec![
                ("Empate A", 1),
                ("Empate B", 2),
                ("Sem chave A", 3),
                ("Sem chave B", 4),
            ]
        );
    }

    #[tokio::test]
    async fn test_chave_estrangeira_vazia_nao_junta() {
        // exportações sem as colunas de chave: curso e módulo ficam com id
        // vazio e não podem adotar filhos cujo campo também veio vazio
        let tabelas = Tabelas {
            cursos: vec![registro(&[("nome", "Curso sem id"), ("ativo", "sim")])],
            modulos: vec![registro(&[("descricao", "Módulo órfão"), ("ativo", "sim")])],
            aulas: vec![registro(&[("descricao", "Aula órfã"), ("ativo", "sim")])],
        };

        let linhas = montador().montar(tabelas).await.unwrap();

        assert_eq!(linhas.len(), 1);
        assert_eq!(linhas[0].tipo(), "curso");
    }

    #[tokio::test]
    async fn test_modulo_sem_id_nao_adota_aulas() {
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            // módulo ativo do curso, mas sem coluna id_bubble_modulo
            modulos: vec![registro(&[
                ("id_bubble_curso", "C1"),
                ("descricao", "Módulo sem id"),
                ("ativo", "sim"),
            ])],
            aulas: vec![registro(&[
                ("id_bubble_modulo", ""),
                ("descricao", "Aula órfã"),
                ("ativo", "sim"),
            ])],
        };

        let linhas = montador().montar(tabelas).await.unwrap();

        assert_eq!(linhas.len(), 2);
        assert_eq!(linhas[1].tipo(), "modulo");
    }

    #[tokio::test]
    async fn test_provedor_padrao_e_vimeo() {
        let tabelas = Tabelas {
            cursos: vec![curso_basico("C1", "sim")],
            modulos: vec![registro(&[
                ("id_bubble_modulo", "M1"),
                ("id_bubble_curso", "C1"),
                ("ativo", "sim"),
            ])],
            aulas: vec![registro(&[
                ("id_bubble_modulo", "M1"),
                ("descricao", "Aula 1"),
                ("ativo", "sim"),
                ("video_fonte", ""),
            ])],
        };

        let linhas = montador().montar(tabelas).await.unwrap();
        match &linhas[2] {
            LinhaImportacao::Aula(a) => assert_eq!(a.provedor, ProvedorVideo::Vimeo),
            _ => panic!("esperava linha de aula"),
        }
    }
}
