use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::{build_router, AppState};

fn app() -> anyhow::Result<Router> {
    Ok(build_router(AppState::mock(true, None)?))
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let res = app.clone().oneshot(req).await?;
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, json))
}

async fn login(app: &Router) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "admin@follawup.com", "password": "123456"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["data"]["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn health_is_public_and_resources_need_a_token() -> anyhow::Result<()> {
    let app = app()?;
    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/papeis", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", "/papeis", Some("forged"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected() -> anyhow::Result<()> {
    let app = app()?;
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "admin@follawup.com", "password": "wrong"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid credentials");
    Ok(())
}

#[tokio::test]
async fn papel_crud_round() -> anyhow::Result<()> {
    let app = app()?;
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, body) = send(&app, "POST", "/papeis", t, Some(json!({"nome": "Estagiário"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_u64().unwrap_or_default();
    assert_eq!(id, 3);

    let (status, body) = send(&app, "PUT", &format!("/papeis/{id}"), t, Some(json!({"descricao": "Apoio"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nome"], "Estagiário");
    assert_eq!(body["data"]["descricao"], "Apoio");

    let (status, body) = send(&app, "GET", "/papeis/grid?page=1&pageSize=2&sort=-id", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalItems"], 3);
    assert_eq!(body["data"]["items"][0]["id"], 3);
    assert_eq!(body["data"]["hasNext"], true);

    let (status, _) = send(&app, "DELETE", &format!("/papeis/{id}"), t, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "GET", &format!("/papeis/{id}"), t, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "papel not found");
    Ok(())
}

#[tokio::test]
async fn malformed_input_keeps_the_envelope() -> anyhow::Result<()> {
    let app = app()?;
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, body) = send(&app, "POST", "/papeis", t, Some(json!({"descricao": "sem nome"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "GET", "/papeis/abc", t, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn papel_permission_links() -> anyhow::Result<()> {
    let app = app()?;
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, _) = send(&app, "POST", "/papeis/2/permissoes/9", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/papeis/2/permissoes/selection", t, None).await?;
    let ids: Vec<u64> = body["data"].as_array().into_iter().flatten().filter_map(|s| s["id"].as_u64()).collect();
    assert_eq!(ids, vec![2, 4, 9]);

    let (status, body) = send(&app, "PUT", "/papeis/2/permissoes", t, Some(json!({"permissoesIds": [1]}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], 1);

    let (status, body) = send(&app, "POST", "/papeis/99/permissoes/1", t, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "papel not found");
    Ok(())
}

#[tokio::test]
async fn plano_items() -> anyhow::Result<()> {
    let app = app()?;
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, body) = send(&app, "POST", "/planos/1/direitos", t, Some(json!({"id": 1, "limite": 3}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "item already added");

    let (status, body) = send(&app, "PUT", "/planos/1/direitos/1", t, Some(json!({"limite": 7}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["direitos"][0]["limite"], 7);

    let (status, body) =
        send(&app, "POST", "/planos/1/precos", t, Some(json!({"recorrencia": "Anual", "valor": 990.0}))).await?;
    assert_eq!(status, StatusCode::OK);
    let precos = body["data"]["precos"].as_array().map(Vec::len).unwrap_or_default();
    assert_eq!(precos, 3);

    let (status, body) = send(&app, "GET", "/available-direitos", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(4));
    Ok(())
}

fn ids(list: &Value) -> Vec<u64> {
    let mut ids: Vec<u64> = list.as_array().into_iter().flatten().filter_map(|s| s["id"].as_u64()).collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn funcionalidade_permission_links() -> anyhow::Result<()> {
    let app = app()?;
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, _) = send(&app, "POST", "/funcionalidades/1/permissoes/9", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/funcionalidades/1/permissoes/selection", t, None).await?;
    assert_eq!(ids(&body["data"]), vec![2, 4, 9]);

    let (status, _) = send(&app, "DELETE", "/funcionalidades/1/permissoes/4", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", "/funcionalidades/1/permissoes", t, None).await?;
    assert_eq!(ids(&body["data"]), vec![2, 9]);

    let (status, body) =
        send(&app, "PUT", "/funcionalidades/1/permissoes", t, Some(json!({"permissoesIds": [6, 8]}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]), vec![6, 8]);

    let (status, body) = send(&app, "POST", "/funcionalidades/99/permissoes/1", t, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn plano_funcionalidades_and_quota() -> anyhow::Result<()> {
    let app = app()?;
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, body) = send(&app, "POST", "/planos/1/funcionalidades", t, Some(json!({"id": 3}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["funcionalidades"]), vec![1, 2, 3, 8]);

    let (status, body) = send(
        &app,
        "PUT",
        "/planos/1/funcionalidades/3/quota",
        t,
        Some(json!({"tipo": "Diaria", "limite": 10})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let added = body["data"]["funcionalidades"].as_array().and_then(|fs| fs.iter().find(|f| f["id"] == 3)).cloned();
    assert_eq!(added.map(|f| f["quota"].clone()), Some(json!({"tipo": "Diaria", "limite": 10})));

    let (status, body) = send(&app, "DELETE", "/planos/1/funcionalidades/8/quota", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    let api = body["data"]["funcionalidades"].as_array().and_then(|fs| fs.iter().find(|f| f["id"] == 8)).cloned();
    assert_eq!(api.map(|f| f["quota"].is_null()), Some(true));

    let (status, body) = send(&app, "DELETE", "/planos/1/funcionalidades/3", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["funcionalidades"]), vec![1, 2, 8]);

    let (status, _) = send(&app, "DELETE", "/planos/1/funcionalidades/3", t, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn plano_price_edit_and_removal() -> anyhow::Result<()> {
    let app = app()?;
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, body) =
        send(&app, "PUT", "/planos/1/precos/1", t, Some(json!({"recorrencia": "Mensal", "valor": 44.9}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["precos"][0]["valor"], 44.9);

    let (status, body) = send(&app, "DELETE", "/planos/1/precos/2", t, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["precos"]), vec![1]);

    let (status, _) = send(&app, "PUT", "/planos/1/precos/2", t, Some(json!({"recorrencia": "Anual", "valor": 1.0}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn repeated_price_ids_are_not_accepted() -> anyhow::Result<()> {
    let app = app()?;
    let token = login(&app).await?;
    let t = Some(token.as_str());

    let (status, _) = send(
        &app,
        "PUT",
        "/planos/1",
        t,
        Some(json!({"precos": [{"id": 5, "recorrencia": "Mensal", "valor": 39.9}]})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) =
        send(&app, "POST", "/planos/1/precos", t, Some(json!({"recorrencia": "Anual", "valor": 399.0}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["data"]["precos"]), vec![5, 6]);

    let twice = json!({"precos": [
        {"id": 7, "recorrencia": "Mensal", "valor": 1.0},
        {"id": 7, "recorrencia": "Anual", "valor": 2.0}
    ]});
    let (status, body) = send(&app, "PUT", "/planos/1", t, Some(twice)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "duplicate preco id 7");
    Ok(())
}

#[tokio::test]
async fn password_reset_does_not_hand_out_the_token() -> anyhow::Result<()> {
    let app = app()?;
    let (status, body) =
        send(&app, "POST", "/auth/password-reset", None, Some(json!({"email": "admin@follawup.com"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"].get("token").is_none());
    assert!(!body.to_string().contains("valid-token-"));

    let (status, _) = send(
        &app,
        "POST",
        "/auth/password-reset/confirm",
        None,
        Some(json!({"token": "valid-token-forjado", "newPassword": "invasor"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    login(&app).await?;
    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": "admin@follawup.com", "password": "invasor"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn reset_token_check() -> anyhow::Result<()> {
    let app = app()?;
    let (status, body) = send(&app, "GET", "/auth/password-reset/valid-token-abc", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);
    let (_, body) = send(&app, "GET", "/auth/password-reset/valid-token-a%2Fb%20c", None, None).await?;
    assert_eq!(body["data"], true);
    let (_, body) = send(&app, "GET", "/auth/password-reset/expired", None, None).await?;
    assert_eq!(body["data"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/password-reset/confirm",
        None,
        Some(json!({"token": "expired", "newPassword": "nova-senha"})),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn metrics_are_exposed() -> anyhow::Result<()> {
    let app = app()?;
    login(&app).await?;
    let req = Request::builder().uri("/metrics").body(Body::empty())?;
    let res = app.oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    assert!(String::from_utf8_lossy(&bytes).contains("admin_logins_total"));
    Ok(())
}
