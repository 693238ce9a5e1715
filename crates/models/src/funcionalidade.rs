use serde::{Deserialize, Serialize};

use crate::entity::{derive_key, text_of, Entity, EntityId, FieldValue};
use crate::errors::ModelError;

/// Functionality: a product capability that plans gate and meter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funcionalidade {
    pub id: EntityId,
    pub nome: String,
    pub key: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub tipo_limite: Option<String>,
    #[serde(default)]
    pub unidade_medida: Option<String>,
    #[serde(default)]
    pub ordem: u32,
    pub visivel: bool,
    pub ativo: bool,
    /// Bumped on every update.
    pub versao: u32,
    #[serde(default)]
    pub agrupador_id: Option<EntityId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuncionalidadeInput {
    pub nome: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub tipo_limite: Option<String>,
    #[serde(default)]
    pub unidade_medida: Option<String>,
    #[serde(default)]
    pub ordem: u32,
    #[serde(default = "default_true")]
    pub visivel: bool,
    #[serde(default = "default_true")]
    pub ativo: bool,
    #[serde(default)]
    pub agrupador_id: Option<EntityId>,
}

fn default_true() -> bool { true }

impl FuncionalidadeInput {
    pub fn new(nome: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            key: None,
            descricao: None,
            categoria: None,
            tipo_limite: None,
            unidade_medida: None,
            ordem: 0,
            visivel: true,
            ativo: true,
            agrupador_id: None,
        }
    }
}

impl Entity for Funcionalidade {
    type Input = FuncionalidadeInput;
    const NAME: &'static str = "funcionalidade";
    const RESOURCE: &'static str = "/funcionalidades";

    fn id(&self) -> EntityId { self.id }

    fn from_input(id: EntityId, input: FuncionalidadeInput) -> Result<Self, ModelError> {
        let nome = input.nome.trim().to_string();
        let key = match input.key {
            Some(k) if !k.trim().is_empty() => k.trim().to_string(),
            _ => derive_key(&nome),
        };
        let f = Funcionalidade {
            id,
            nome,
            key,
            descricao: input.descricao,
            categoria: input.categoria,
            tipo_limite: input.tipo_limite,
            unidade_medida: input.unidade_medida,
            ordem: input.ordem,
            visivel: input.visivel,
            ativo: input.ativo,
            versao: 1,
            agrupador_id: input.agrupador_id,
        };
        f.validate()?;
        Ok(f)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "nome" => Some((&self.nome).into()),
            "key" => Some((&self.key).into()),
            "descricao" => self.descricao.as_ref().map(Into::into),
            "categoria" => self.categoria.as_ref().map(Into::into),
            "tipoLimite" => self.tipo_limite.as_ref().map(Into::into),
            "unidadeMedida" => self.unidade_medida.as_ref().map(Into::into),
            "ordem" => Some(self.ordem.into()),
            "visivel" => Some(self.visivel.into()),
            "ativo" => Some(self.ativo.into()),
            "versao" => Some(self.versao.into()),
            "agrupadorId" => self.agrupador_id.map(Into::into),
            _ => None,
        }
    }

    fn search_text(&self) -> String {
        text_of(&[
            Some(self.nome.as_str()),
            Some(self.key.as_str()),
            self.descricao.as_deref(),
            self.categoria.as_deref(),
        ])
    }

    fn nome(&self) -> &str { &self.nome }

    fn descricao(&self) -> Option<&str> { self.descricao.as_deref() }

    fn ativo(&self) -> bool { self.ativo }

    fn touch(&mut self) { self.versao = self.versao.saturating_add(1); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_bumps_version() {
        let f = Funcionalidade::from_input(8, FuncionalidadeInput::new("Integração API")).unwrap();
        assert_eq!(f.versao, 1);
        assert_eq!(f.key, "integração-api");
        let patch = json!({"visivel": false, "versao": 1}).as_object().cloned().unwrap();
        let updated = f.merged(&patch).unwrap();
        assert_eq!(updated.versao, 2);
        assert!(!updated.visivel);
    }
}
