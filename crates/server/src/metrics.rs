use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

pub static CRUD_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("admin_crud_operations_total", "Entity operations served", &["entity", "op"])
        .expect("register admin_crud_operations_total")
});

pub static LINK_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("admin_link_operations_total", "Permission link operations served", &["parent", "op"])
        .expect("register admin_link_operations_total")
});

pub static LOGINS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("admin_logins_total", "Login attempts by outcome", &["outcome"])
        .expect("register admin_logins_total")
});

pub fn record_crud(entity: &str, op: &str) {
    CRUD_OPERATIONS.with_label_values(&[entity, op]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&families, &mut buf) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("encode error: {e}"));
    }
    match String::from_utf8(buf) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("utf8 error: {e}")),
    }
}
