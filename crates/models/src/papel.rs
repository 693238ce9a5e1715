use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{text_of, Entity, EntityId, FieldValue};
use crate::errors::ModelError;

/// Role: a named bundle of permissions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Papel {
    pub id: EntityId,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub ativo: bool,
    pub data_criacao: DateTime<Utc>,
    #[serde(default)]
    pub data_atualizacao: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PapelInput {
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default = "default_ativo")]
    pub ativo: bool,
}

fn default_ativo() -> bool { true }

impl PapelInput {
    pub fn new(nome: impl Into<String>, descricao: Option<&str>) -> Self {
        Self { nome: nome.into(), descricao: descricao.map(str::to_string), ativo: true }
    }
}

impl Entity for Papel {
    type Input = PapelInput;
    const NAME: &'static str = "papel";
    const RESOURCE: &'static str = "/papeis";

    fn id(&self) -> EntityId { self.id }

    fn from_input(id: EntityId, input: PapelInput) -> Result<Self, ModelError> {
        let papel = Papel {
            id,
            nome: input.nome.trim().to_string(),
            descricao: input.descricao,
            ativo: input.ativo,
            data_criacao: Utc::now(),
            data_atualizacao: None,
        };
        papel.validate()?;
        Ok(papel)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "nome" => Some((&self.nome).into()),
            "descricao" => self.descricao.as_ref().map(Into::into),
            "ativo" => Some(self.ativo.into()),
            "dataCriacao" => Some(FieldValue::DateTime(self.data_criacao)),
            "dataAtualizacao" => self.data_atualizacao.map(FieldValue::DateTime),
            _ => None,
        }
    }

    fn search_text(&self) -> String { text_of(&[Some(self.nome.as_str()), self.descricao.as_deref()]) }

    fn nome(&self) -> &str { &self.nome }

    fn descricao(&self) -> Option<&str> { self.descricao.as_deref() }

    fn ativo(&self) -> bool { self.ativo }

    fn touch(&mut self) { self.data_atualizacao = Some(Utc::now()); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn papel() -> Papel {
        Papel::from_input(1, PapelInput::new("Advogado(a) Gestor(a)", Some("Supervisiona uma equipe"))).unwrap()
    }

    #[test]
    fn merge_changes_only_given_fields() {
        let original = papel();
        let patch = json!({"ativo": false}).as_object().cloned().unwrap();
        let updated = original.merged(&patch).unwrap();
        assert!(!updated.ativo);
        assert_eq!(updated.nome, original.nome);
        assert_eq!(updated.descricao, original.descricao);
        assert_eq!(updated.data_criacao, original.data_criacao);
        assert!(updated.data_atualizacao.is_some());
    }

    #[test]
    fn merge_null_clears_optional_field_and_keeps_id() {
        let patch = json!({"descricao": null, "id": 99}).as_object().cloned().unwrap();
        let updated = papel().merged(&patch).unwrap();
        assert_eq!(updated.descricao, None);
        assert_eq!(updated.id, 1);
    }

    #[test]
    fn merge_null_into_required_field_is_rejected() {
        let patch = json!({"nome": null}).as_object().cloned().unwrap();
        assert!(matches!(papel().merged(&patch), Err(ModelError::Validation(_))));
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(Papel::from_input(2, PapelInput::new("   ", None)).is_err());
    }
}
