//! Entity records of the access-control and subscription domain.
//!
//! Every record implements [`entity::Entity`], which is all the generic
//! paging, merging and repository code needs to know about it.

pub mod errors;
pub mod entity;
pub mod papel;
pub mod permissao;
pub mod funcionalidade;
pub mod agrupador;
pub mod plano;

pub use entity::{derive_key, Entity, EntityId, FieldValue, Patch};
pub use errors::ModelError;
pub use papel::{Papel, PapelInput};
pub use permissao::{Permissao, PermissaoInput};
pub use funcionalidade::{Funcionalidade, FuncionalidadeInput};
pub use agrupador::{Agrupador, AgrupadorInput, TipoAgrupador};
pub use plano::{
    CatalogItem, DireitoInput, DireitoPlano, FuncionalidadePlano, FuncionalidadePlanoInput, PeriodoQuota,
    Plano, PlanoInput, Preco, PrecoInput, Quota, Recorrencia, TipoEntidade,
};
