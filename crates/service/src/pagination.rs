//! Generic paginated listing over an in-memory collection.
//!
//! A [`Filter`] carries the page window, an optional sort spec (`field` or
//! `-field`), a free-text search term and the entity predicates; [`paginate`]
//! turns a full collection into one [`PagedResult`] page.

use std::cmp::Ordering;
use std::fmt;

use common::types::PagedResult;
use models::{Entity, EntityId, TipoAgrupador};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Listing parameters, query-string compatible (`page`, `pageSize`, `sort`, `searchTerm`, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<TipoAgrupador>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ativo: Option<bool>,
    /// Only permissions linked to this role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub papel_id: Option<EntityId>,
    /// Only permissions linked to this functionality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funcionalidade_id: Option<EntityId>,
}

fn default_page() -> u32 { 1 }
fn default_page_size() -> u32 { DEFAULT_PAGE_SIZE }

impl Default for Filter {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            search_term: None,
            tipo: None,
            ativo: None,
            papel_id: None,
            funcionalidade_id: None,
        }
    }
}

impl Filter {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self { page, page_size, ..Self::default() }
    }

    pub fn sorted(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn of_tipo(mut self, tipo: TipoAgrupador) -> Self {
        self.tipo = Some(tipo);
        self
    }

    /// Clamp the window to sane values: page >= 1, page size within `1..=MAX_PAGE_SIZE`.
    pub fn normalize(&self) -> (u32, u32) {
        let page = self.page.max(1);
        let page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort.as_deref().and_then(SortSpec::parse)
    }

    /// Type and active-flag predicates; parent-id predicates need link data and are
    /// applied by the repository.
    pub fn matches<T: Entity>(&self, item: &T) -> bool {
        if let Some(tipo) = self.tipo {
            if item.tipo() != Some(tipo) {
                return false;
            }
        }
        if let Some(ativo) = self.ativo {
            if item.ativo() != ativo {
                return false;
            }
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    /// `"nome"` sorts ascending, `"-nome"` descending; blank specs sort nothing.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let (field, descending) = match spec.strip_prefix('-') {
            Some(rest) => (rest.trim(), true),
            None => (spec, false),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self { field: field.to_string(), descending })
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: false }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: true }
    }

    /// Records missing the field go last in either direction.
    pub fn compare<T: Entity>(&self, a: &T, b: &T) -> Ordering {
        match (a.field(&self.field), b.field(&self.field)) {
            (Some(x), Some(y)) => {
                let ord = x.compare(&y);
                if self.descending { ord.reverse() } else { ord }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending { write!(f, "-{}", self.field) } else { f.write_str(&self.field) }
    }
}

/// Case-insensitive substring match over the entity search text.
pub fn matches_search<T: Entity>(item: &T, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    item.search_text().to_lowercase().contains(&term.to_lowercase())
}

/// Search, sort (stable, ties keep collection order) and slice one page.
pub fn paginate<T: Entity>(mut items: Vec<T>, filter: &Filter) -> PagedResult<T> {
    let (page, page_size) = filter.normalize();

    if let Some(term) = filter.search_term.as_deref() {
        items.retain(|item| matches_search(item, term));
    }
    if let Some(spec) = filter.sort_spec() {
        items.sort_by(|a, b| spec.compare(a, b));
    }

    let total_items = items.len();
    let start = (page as usize - 1).saturating_mul(page_size as usize);
    let page_items: Vec<T> = if start >= total_items {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(page_size as usize).collect()
    };
    PagedResult::new(page_items, total_items as u64, page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Agrupador, AgrupadorInput, Papel, PapelInput};

    fn papeis(n: u64) -> Vec<Papel> {
        (1..=n)
            .map(|i| Papel::from_input(i, PapelInput::new(format!("Papel {:02}", i), None)).unwrap())
            .collect()
    }

    #[test]
    fn ten_records_page_two_of_three() {
        let page = paginate(papeis(10), &Filter::page(2, 3));
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].id, 4);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 4);
        assert!(page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let page = paginate(Vec::<Papel>::new(), &Filter::page(1, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn total_pages_is_ceiling_for_every_size() {
        for total in 1..=25u64 {
            for size in 1..=12u32 {
                let page = paginate(papeis(total), &Filter::page(1, size));
                assert_eq!(u64::from(page.total_pages), total.div_ceil(u64::from(size)));
                assert!(page.items.len() <= size as usize);
                assert_eq!(page.has_next, page.total_pages > 1);
                assert!(!page.has_previous);
            }
        }
    }

    #[test]
    fn page_zero_is_clamped_to_first_page() {
        let page = paginate(papeis(5), &Filter::page(0, 2));
        assert_eq!(page.current_page, 1);
        assert_eq!(page.items[0].id, 1);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = paginate(papeis(5), &Filter::page(9, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn descending_sort_reverses_ascending_on_distinct_values() {
        let asc = paginate(papeis(7), &Filter::page(1, 10).sorted("nome"));
        let desc = paginate(papeis(7), &Filter::page(1, 10).sorted("-nome"));
        let mut reversed: Vec<u64> = asc.items.iter().map(|p| p.id).collect();
        reversed.reverse();
        assert_eq!(desc.items.iter().map(|p| p.id).collect::<Vec<_>>(), reversed);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let mut items = papeis(4);
        items[1].ativo = false;
        items[3].ativo = false;
        let page = paginate(items, &Filter::page(1, 10).sorted("ativo"));
        let ids: Vec<u64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let page = paginate(papeis(12), &Filter::page(1, 10).search("papel 1"));
        let ids: Vec<u64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert_eq!(page.total_items, 3);
    }

    #[test]
    fn sort_spec_parsing() {
        assert_eq!(SortSpec::parse("-nome"), Some(SortSpec::descending("nome")));
        assert_eq!(SortSpec::parse("nome"), Some(SortSpec::ascending("nome")));
        assert_eq!(SortSpec::parse("-"), None);
        assert_eq!(SortSpec::parse("  "), None);
        assert_eq!(SortSpec::descending("ativo").to_string(), "-ativo");
    }

    #[test]
    fn matches_applies_tipo_and_ativo() {
        let mut a = Agrupador::from_input(1, AgrupadorInput::new("Processos", TipoAgrupador::Funcionalidade)).unwrap();
        let filter = Filter::default().of_tipo(TipoAgrupador::Permissao);
        assert!(!filter.matches(&a));
        let filter = Filter { ativo: Some(false), ..Filter::default() };
        assert!(!filter.matches(&a));
        a.ativo = false;
        assert!(filter.matches(&a));
    }

    #[test]
    fn filter_query_defaults() {
        let f: Filter = serde_json::from_str("{}").unwrap();
        assert_eq!(f, Filter::default());
        let f: Filter = serde_json::from_value(serde_json::json!({"pageSize": 500, "page": 0})).unwrap();
        assert_eq!(f.normalize(), (1, MAX_PAGE_SIZE));
    }
}
