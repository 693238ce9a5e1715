use serde::{Deserialize, Serialize};

use crate::entity::{text_of, Entity, EntityId, FieldValue};
use crate::errors::ModelError;

/// What a grouping buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoAgrupador {
    Funcionalidade,
    Permissao,
}

impl TipoAgrupador {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoAgrupador::Funcionalidade => "FUNCIONALIDADE",
            TipoAgrupador::Permissao => "PERMISSAO",
        }
    }
}

/// Grouping: a named category of permissions or functionalities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agrupador {
    pub id: EntityId,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub tipo: TipoAgrupador,
    pub ativo: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgrupadorInput {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub tipo: TipoAgrupador,
    #[serde(default = "default_ativo")]
    pub ativo: bool,
}

fn default_ativo() -> bool { true }

impl AgrupadorInput {
    pub fn new(nome: impl Into<String>, tipo: TipoAgrupador) -> Self {
        Self { nome: nome.into(), descricao: None, tipo, ativo: true }
    }
}

impl Entity for Agrupador {
    type Input = AgrupadorInput;
    const NAME: &'static str = "agrupador";
    const RESOURCE: &'static str = "/agrupadores";

    fn id(&self) -> EntityId { self.id }

    fn from_input(id: EntityId, input: AgrupadorInput) -> Result<Self, ModelError> {
        let a = Agrupador { id, nome: input.nome.trim().to_string(), descricao: input.descricao, tipo: input.tipo, ativo: input.ativo };
        a.validate()?;
        Ok(a)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "nome" => Some((&self.nome).into()),
            "descricao" => self.descricao.as_ref().map(Into::into),
            "tipo" => Some(self.tipo.as_str().into()),
            "ativo" => Some(self.ativo.into()),
            _ => None,
        }
    }

    fn search_text(&self) -> String { text_of(&[Some(self.nome.as_str()), self.descricao.as_deref()]) }

    fn nome(&self) -> &str { &self.nome }

    fn descricao(&self) -> Option<&str> { self.descricao.as_deref() }

    fn ativo(&self) -> bool { self.ativo }

    fn tipo(&self) -> Option<TipoAgrupador> { Some(self.tipo) }
}
