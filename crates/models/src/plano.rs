use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::{text_of, Entity, EntityId, FieldValue};
use crate::errors::ModelError;

/// Kind of customer a plan is sold to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoEntidade {
    Organizacao,
    Estabelecimento,
    Usuario,
}

impl TipoEntidade {
    /// Label shown in listings.
    pub fn label(&self) -> &'static str {
        match self {
            TipoEntidade::Organizacao => "Organização",
            TipoEntidade::Estabelecimento => "Estabelecimento",
            TipoEntidade::Usuario => "Usuário",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TipoEntidade::Organizacao => "organizacao",
            TipoEntidade::Estabelecimento => "estabelecimento",
            TipoEntidade::Usuario => "usuario",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recorrencia {
    Mensal,
    Trimestral,
    Semestral,
    Anual,
}

/// Reset period of a quota.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodoQuota {
    Diaria,
    Semanal,
    Mensal,
    Anual,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preco {
    pub id: EntityId,
    pub recorrencia: Recorrencia,
    pub valor: f64,
}

/// Entitlement granted by a plan, e.g. "Número de Estabelecimentos" up to `limite`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DireitoPlano {
    pub id: EntityId,
    pub nome: String,
    pub limite: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quota {
    pub tipo: PeriodoQuota,
    pub limite: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuncionalidadePlano {
    pub id: EntityId,
    pub nome: String,
    #[serde(default)]
    pub quota: Option<Quota>,
}

/// Price to add to, or replace in, a plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrecoInput {
    pub recorrencia: Recorrencia,
    pub valor: f64,
}

impl PrecoInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.valor.is_finite() || self.valor < 0.0 {
            return Err(ModelError::Validation("preco valor must be a non-negative number".into()));
        }
        Ok(())
    }
}

/// Catalog entitlement to grant in a plan with its limit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DireitoInput {
    pub id: EntityId,
    pub limite: u64,
}

/// Functionality to include in a plan, optionally metered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuncionalidadePlanoInput {
    pub id: EntityId,
    #[serde(default)]
    pub quota: Option<Quota>,
}

/// Entry of the entitlement / functionality catalogs offered when composing plans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: EntityId,
    pub nome: String,
}

/// Subscription plan: prices, entitlements and functionalities with optional quotas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plano {
    pub id: EntityId,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub tipo_entidade: TipoEntidade,
    pub ativo: bool,
    pub data_inicio: NaiveDate,
    #[serde(default)]
    pub data_fim: Option<NaiveDate>,
    pub is_publico: bool,
    #[serde(default)]
    pub precos: Vec<Preco>,
    #[serde(default)]
    pub direitos: Vec<DireitoPlano>,
    #[serde(default)]
    pub funcionalidades: Vec<FuncionalidadePlano>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanoInput {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub tipo_entidade: TipoEntidade,
    #[serde(default = "default_true")]
    pub ativo: bool,
    pub data_inicio: NaiveDate,
    #[serde(default)]
    pub data_fim: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_publico: bool,
}

fn default_true() -> bool { true }

impl Plano {
    pub fn preco_mensal(&self) -> Option<f64> {
        self.precos.iter().find(|p| p.recorrencia == Recorrencia::Mensal).map(|p| p.valor)
    }
}

impl Entity for Plano {
    type Input = PlanoInput;
    const NAME: &'static str = "plano";
    const RESOURCE: &'static str = "/planos";

    fn id(&self) -> EntityId { self.id }

    fn from_input(id: EntityId, input: PlanoInput) -> Result<Self, ModelError> {
        let plano = Plano {
            id,
            nome: input.nome.trim().to_string(),
            descricao: input.descricao,
            tipo_entidade: input.tipo_entidade,
            ativo: input.ativo,
            data_inicio: input.data_inicio,
            data_fim: input.data_fim,
            is_publico: input.is_publico,
            precos: Vec::new(),
            direitos: Vec::new(),
            funcionalidades: Vec::new(),
        };
        plano.validate()?;
        Ok(plano)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "nome" => Some((&self.nome).into()),
            "descricao" => self.descricao.as_ref().map(Into::into),
            "tipoEntidade" => Some(self.tipo_entidade.as_str().into()),
            "ativo" => Some(self.ativo.into()),
            "dataInicio" => Some(FieldValue::Date(self.data_inicio)),
            "dataFim" => self.data_fim.map(FieldValue::Date),
            "isPublico" => Some(self.is_publico.into()),
            "precoMensal" => self.preco_mensal().map(FieldValue::Float),
            _ => None,
        }
    }

    fn search_text(&self) -> String { text_of(&[Some(self.nome.as_str()), self.descricao.as_deref()]) }

    fn nome(&self) -> &str { &self.nome }

    fn descricao(&self) -> Option<&str> { self.descricao.as_deref() }

    fn ativo(&self) -> bool { self.ativo }

    fn validate(&self) -> Result<(), ModelError> {
        if self.nome.trim().is_empty() {
            return Err(ModelError::Validation("plano nome required".into()));
        }
        if let Some(fim) = self.data_fim {
            if fim < self.data_inicio {
                return Err(ModelError::Validation("plano dataFim before dataInicio".into()));
            }
        }
        if self.precos.iter().any(|p| !p.valor.is_finite() || p.valor < 0.0) {
            return Err(ModelError::Validation("preco valor must be a non-negative number".into()));
        }
        unique_ids("preco", self.precos.iter().map(|p| p.id))?;
        unique_ids("direito", self.direitos.iter().map(|d| d.id))?;
        unique_ids("funcionalidade", self.funcionalidades.iter().map(|f| f.id))?;
        Ok(())
    }
}

fn unique_ids(item: &str, ids: impl Iterator<Item = EntityId>) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ModelError::Validation(format!("duplicate {item} id {id}")));
        }
    }
    Ok(())
}
