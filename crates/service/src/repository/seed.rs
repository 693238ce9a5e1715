//! Demonstration data loaded by `Repository::seeded()`.

use chrono::{DateTime, NaiveDate, Utc};
use models::{
    derive_key, Agrupador, CatalogItem, DireitoPlano, EntityId, Funcionalidade, FuncionalidadePlano, Papel,
    PeriodoQuota, Permissao, Plano, Preco, Quota, Recorrencia, TipoAgrupador, TipoEntidade,
};

use super::{Link, LinkKind};

/// Initial content of a repository; `reset()` returns to it.
#[derive(Clone, Debug, Default)]
pub struct Seed {
    pub papeis: Vec<Papel>,
    pub permissoes: Vec<Permissao>,
    pub funcionalidades: Vec<Funcionalidade>,
    pub agrupadores: Vec<Agrupador>,
    pub planos: Vec<Plano>,
    pub direitos: Vec<CatalogItem>,
    pub links: Vec<Link>,
}

impl Seed {
    pub fn demo() -> Self {
        let mut links = Vec::new();
        for (papel, perms) in [(1, &[2, 4, 6, 8][..]), (2, &[2, 4][..])] {
            links.extend(perms.iter().map(|&child| Link { kind: LinkKind::PapelPermissao, parent: papel, child }));
        }
        links.extend([4, 2].map(|child| Link { kind: LinkKind::FuncionalidadePermissao, parent: 1, child }));

        Seed {
            papeis: vec![
                papel(1, "Advogado(a) Gestor(a)", "Supervisiona uma equipe de advogados e distribui os casos."),
                papel(2, "Advogado(a) Parceiro(a)", "Atua em casos específicos."),
            ],
            permissoes: vec![
                permissao(1, "Adicionar Assunto", "processos:adicionar-assunto", 5),
                permissao(2, "Listar Processos", "processos:listar", 4),
                permissao(4, "Criar Caso", "casos:criar", 5),
                permissao(6, "Desvincular Processo", "casos:desvincular-processo", 5),
                permissao(8, "Criar Acesso", "acesso:criar", 8),
                permissao(9, "Obter Acesso", "acesso:obter", 4),
            ],
            funcionalidades: [
                (1, "Incluir processo"),
                (2, "Alterar processo"),
                (3, "Alterar responsável do processo"),
                (4, "Alterar situação do processo"),
                (5, "Adicionar partes (autores, réus)"),
                (6, "Excluir processo"),
                (7, "Gerar relatórios"),
                (8, "Integração API"),
            ]
            .into_iter()
            .map(|(id, nome)| funcionalidade(id, nome))
            .collect(),
            agrupadores: agrupadores(),
            planos: planos(),
            direitos: [
                (1, "Número de Estabelecimentos"),
                (2, "Usuários por Estabelecimento"),
                (3, "Instâncias de WhatsApp"),
                (4, "Armazenamento (GB)"),
            ]
            .into_iter()
            .map(|(id, nome)| CatalogItem { id, nome: nome.to_string() })
            .collect(),
            links,
        }
    }

    /// First id free for plan prices across every seeded plan.
    pub fn first_free_item_id(&self) -> EntityId {
        self.planos.iter().flat_map(|p| p.precos.iter().map(|x| x.id)).max().unwrap_or(0) + 1
    }
}

fn seeded_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default()
}

fn papel(id: EntityId, nome: &str, descricao: &str) -> Papel {
    Papel {
        id,
        nome: nome.to_string(),
        descricao: Some(descricao.to_string()),
        ativo: true,
        data_criacao: seeded_at(),
        data_atualizacao: None,
    }
}

fn permissao(id: EntityId, nome: &str, key: &str, agrupador: EntityId) -> Permissao {
    Permissao {
        id,
        nome: nome.to_string(),
        key: key.to_string(),
        descricao: None,
        ativo: true,
        agrupador_id: Some(agrupador),
    }
}

fn funcionalidade(id: EntityId, nome: &str) -> Funcionalidade {
    Funcionalidade {
        id,
        nome: nome.to_string(),
        key: derive_key(nome),
        descricao: None,
        categoria: Some("Processos".to_string()),
        tipo_limite: None,
        unidade_medida: None,
        ordem: id as u32,
        visivel: true,
        ativo: true,
        versao: 1,
        agrupador_id: Some(1),
    }
}

fn agrupadores() -> Vec<Agrupador> {
    use TipoAgrupador::{Funcionalidade as F, Permissao as P};
    [
        (1, "Processos", "Agrupador para funcionalidades relacionadas a gestão de processos", F),
        (2, "Documentos", "Agrupador para funcionalidades de gestão documental", F),
        (3, "Audiências", "Agrupador para funcionalidades de controle de audiências", F),
        (4, "Acesso Básico", "Agrupador para permissões de acesso básico ao sistema", P),
        (5, "Gestão de Processos", "Agrupador para permissões de gestão processual", P),
        (6, "Relatórios", "Agrupador para funcionalidades de relatórios e dashboards", F),
        (7, "Configurações", "Agrupador para funcionalidades de configuração do sistema", F),
        (8, "Administração", "Agrupador para permissões administrativas", P),
        (9, "Relatórios", "Agrupador para permissões de relatórios", P),
        (10, "Financeiro", "Agrupador para funcionalidades financeiras", F),
        (11, "Agenda", "Agrupador para funcionalidades de agenda e calendário", F),
        (12, "Comunicação", "Agrupador para funcionalidades de comunicação", F),
        (13, "Integrações", "Agrupador para funcionalidades de integração com outros sistemas", F),
        (14, "Automação", "Agrupador para funcionalidades de automação de processos", F),
        (15, "Analytics", "Agrupador para funcionalidades de análise de dados", F),
        (16, "Gestão Financeira", "Agrupador para permissões financeiras", P),
        (17, "Gestão de Usuários", "Agrupador para permissões de gestão de usuários", P),
        (18, "Auditoria", "Agrupador para permissões de auditoria", P),
        (19, "Configurações Avançadas", "Agrupador para permissões de configurações avançadas", P),
        (20, "API e Integrações", "Agrupador para permissões de API e integrações", P),
    ]
    .into_iter()
    .map(|(id, nome, descricao, tipo)| Agrupador {
        id,
        nome: nome.to_string(),
        descricao: Some(descricao.to_string()),
        tipo,
        ativo: true,
    })
    .collect()
}

fn planos() -> Vec<Plano> {
    let inicio = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let func = |id: EntityId, nome: &str, quota: Option<(PeriodoQuota, u64)>| FuncionalidadePlano {
        id,
        nome: nome.to_string(),
        quota: quota.map(|(tipo, limite)| Quota { tipo, limite }),
    };
    let direito = |id: EntityId, nome: &str, limite: u64| DireitoPlano { id, nome: nome.to_string(), limite };
    vec![
        Plano {
            id: 1,
            nome: "Plano Básico".to_string(),
            descricao: Some("Ideal para equipes pequenas.".to_string()),
            tipo_entidade: TipoEntidade::Organizacao,
            ativo: true,
            data_inicio: inicio,
            data_fim: None,
            is_publico: true,
            precos: vec![
                Preco { id: 1, recorrencia: Recorrencia::Mensal, valor: 39.9 },
                Preco { id: 2, recorrencia: Recorrencia::Anual, valor: 399.0 },
            ],
            direitos: vec![direito(1, "Número de Estabelecimentos", 1)],
            funcionalidades: vec![
                func(1, "Incluir processo", None),
                func(2, "Alterar processo", None),
                func(8, "Integração API", Some((PeriodoQuota::Mensal, 1000))),
            ],
        },
        Plano {
            id: 2,
            nome: "Plano Profissional".to_string(),
            descricao: Some("Para empresas em crescimento.".to_string()),
            tipo_entidade: TipoEntidade::Estabelecimento,
            ativo: true,
            data_inicio: inicio,
            data_fim: None,
            is_publico: true,
            precos: vec![
                Preco { id: 3, recorrencia: Recorrencia::Mensal, valor: 99.9 },
                Preco { id: 4, recorrencia: Recorrencia::Anual, valor: 999.0 },
            ],
            direitos: vec![
                direito(1, "Número de Estabelecimentos", 5),
                direito(2, "Usuários por Estabelecimento", 20),
            ],
            funcionalidades: vec![
                func(1, "Incluir processo", None),
                func(4, "Gerar relatórios", Some((PeriodoQuota::Mensal, 50))),
            ],
        },
    ]
}
