use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use models::{Entity, Papel, PapelInput};
use service::auth::{CredentialVerifier, FixedCredentials, LoginInput, TokenIssuer};
use service::pagination::{paginate, Filter};

fn papeis(n: u64) -> Vec<Papel> {
    (1..=n)
        .map(|i| Papel::from_input(i, PapelInput::new(format!("Papel {:05}", (i * 7919) % n), Some("gerado"))).unwrap())
        .collect()
}

fn bench_paginate(c: &mut Criterion) {
    let items = papeis(10_000);
    let sorted = Filter::page(37, 50).sorted("-nome");
    let searched = Filter::page(1, 20).search("papel 00").sorted("nome");

    c.bench_function("paginate_sorted_10k", |b| {
        b.iter(|| black_box(paginate(items.clone(), &sorted)));
    });
    c.bench_function("paginate_search_10k", |b| {
        b.iter(|| black_box(paginate(items.clone(), &searched)));
    });
}

fn bench_login(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let creds = FixedCredentials::demo(TokenIssuer::new(Some("secret".into()))).unwrap();
    let input = LoginInput { email: "admin@follawup.com".into(), password: "123456".into() };

    c.bench_function("fixed_credentials_login", |b| {
        b.iter(|| rt.block_on(creds.verify(&input)).unwrap());
    });
}

criterion_group!(benches, bench_paginate, bench_login);
criterion_main!(benches);
