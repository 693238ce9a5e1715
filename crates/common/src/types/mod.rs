use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Canonical response envelope: `{ success, data, message?, errors? }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None, errors: Vec::new() }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self { success: true, data: Some(data), message: Some(message.into()), errors: Vec::new() }
    }

    /// Success without a payload, e.g. after a delete.
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self { success: true, data: None, message: Some(message.into()), errors: Vec::new() }
    }

    pub fn failure(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()), errors }
    }

    /// Human-readable failure text: the message, then any detail errors.
    pub fn failure_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(m) = &self.message { parts.push(m); }
        parts.extend(self.errors.iter().map(String::as_str));
        if parts.is_empty() { "request failed".to_string() } else { parts.join("; ") }
    }
}

/// One page of a listing plus the arithmetic a grid needs to paginate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page_size: u32,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PagedResult<T> {
    /// Build a page, deriving `total_pages`, `has_next` and `has_previous`.
    /// `page_size` must be at least 1.
    pub fn new(items: Vec<T>, total_items: u64, current_page: u32, page_size: u32) -> Self {
        let size = u64::from(page_size.max(1));
        let total_pages = total_items.div_ceil(size) as u32;
        Self {
            items,
            total_items,
            page_size,
            current_page,
            total_pages,
            has_next: current_page < total_pages,
            has_previous: current_page > 1,
        }
    }

    pub fn empty(current_page: u32, page_size: u32) -> Self {
        Self::new(Vec::new(), 0, current_page, page_size)
    }
}

/// Lightweight projection used by picker/selection endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Selection {
    pub id: u64,
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_result_derives_page_arithmetic() {
        let page = PagedResult::new(vec![4, 5, 6], 10, 2, 3);
        assert_eq!(page.total_pages, 4);
        assert!(page.has_next);
        assert!(page.has_previous);

        let last = PagedResult::new(vec![10], 10, 4, 3);
        assert!(!last.has_next);
        assert!(last.has_previous);
    }

    #[test]
    fn empty_page_has_no_neighbours() {
        let page: PagedResult<u8> = PagedResult::empty(1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn envelope_uses_camel_case_and_omits_empty_errors() {
        let body = serde_json::to_value(ApiResponse::ok(PagedResult::new(vec![1], 1, 1, 10))).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["totalItems"], 1);
        assert_eq!(body["data"]["hasNext"], false);
        assert!(body.get("errors").is_none());

        let failed: ApiResponse<()> = ApiResponse::failure("papel not found", vec!["id=9".into()]);
        assert_eq!(failed.failure_text(), "papel not found; id=9");
    }
}
