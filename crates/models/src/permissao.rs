use serde::{Deserialize, Serialize};

use crate::entity::{derive_key, text_of, Entity, EntityId, FieldValue};
use crate::errors::ModelError;

/// Permission: an atomic grantable capability identified by a stable key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissao {
    pub id: EntityId,
    pub nome: String,
    pub key: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub ativo: bool,
    #[serde(default)]
    pub agrupador_id: Option<EntityId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissaoInput {
    pub nome: String,
    /// Derived from `nome` when omitted.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default = "default_ativo")]
    pub ativo: bool,
    #[serde(default)]
    pub agrupador_id: Option<EntityId>,
}

fn default_ativo() -> bool { true }

impl PermissaoInput {
    pub fn new(nome: impl Into<String>, key: Option<&str>) -> Self {
        Self { nome: nome.into(), key: key.map(str::to_string), descricao: None, ativo: true, agrupador_id: None }
    }
}

impl Entity for Permissao {
    type Input = PermissaoInput;
    const NAME: &'static str = "permissao";
    const RESOURCE: &'static str = "/permissoes";
    const LINK_CHILD: bool = true;

    fn id(&self) -> EntityId { self.id }

    fn from_input(id: EntityId, input: PermissaoInput) -> Result<Self, ModelError> {
        let nome = input.nome.trim().to_string();
        let key = match input.key {
            Some(k) if !k.trim().is_empty() => k.trim().to_string(),
            _ => derive_key(&nome),
        };
        let p = Permissao { id, nome, key, descricao: input.descricao, ativo: input.ativo, agrupador_id: input.agrupador_id };
        p.validate()?;
        Ok(p)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "nome" => Some((&self.nome).into()),
            "key" => Some((&self.key).into()),
            "descricao" => self.descricao.as_ref().map(Into::into),
            "ativo" => Some(self.ativo.into()),
            "agrupadorId" => self.agrupador_id.map(Into::into),
            _ => None,
        }
    }

    fn search_text(&self) -> String {
        text_of(&[Some(self.nome.as_str()), Some(self.key.as_str()), self.descricao.as_deref()])
    }

    fn nome(&self) -> &str { &self.nome }

    fn descricao(&self) -> Option<&str> { self.descricao.as_deref() }

    fn ativo(&self) -> bool { self.ativo }

    fn validate(&self) -> Result<(), ModelError> {
        if self.nome.trim().is_empty() {
            return Err(ModelError::Validation("permissao nome required".into()));
        }
        if self.key.trim().is_empty() || self.key.chars().any(char::is_whitespace) {
            return Err(ModelError::Validation("permissao key must be non-empty without spaces".into()));
        }
        Ok(())
    }
}
