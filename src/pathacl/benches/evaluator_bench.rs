/// Benchmarks for the access engine
///
/// Measures performance of:
/// - Role resolution
/// - Single-path checks by precedence rung
/// - Placeholder searches
/// - Grant value resolution
/// - Concurrent checks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pathacl::roles::resolve_role;
use pathacl::{Authorizer, Check, Grant, Principal, RoleDefinition};
use std::sync::Arc;
use std::thread;

fn role_permissions(width: usize) -> Vec<String> {
    let mut permissions = Vec::with_capacity(width * 3);
    for i in 0..width {
        permissions.push(format!("api.resource{}.read", i));
        permissions.push(format!("!api.resource{}.delete", i));
        permissions.push(format!("api.resource{}._.get", i));
    }
    permissions.push("+api.admin.*".to_string());
    permissions.push("!!api.admin.shutdown".to_string());
    permissions
}

fn setup() -> Authorizer {
    let acl = Authorizer::new();
    acl.init(
        [
            ("reader", RoleDefinition::new(role_permissions(50))),
            ("editor", RoleDefinition::new(["api.*", "!api.secrets.*", "grants.main.project"])),
            ("*", RoleDefinition::new(["public.*"])),
        ],
        [("project", Grant::default())],
        "*",
    );
    acl
}

fn bench_role_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("role_resolution");

    for width in [10, 100, 1000] {
        let permissions = role_permissions(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &permissions, |b, p| {
            b.iter(|| resolve_role(black_box(p)));
        });
    }

    group.finish();
}

fn bench_single_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_checks");
    let acl = setup();
    let reader = Principal::new(["reader"]);
    let both = Principal::new(["reader", "editor"]);

    let cases = [
        ("exact_grant", "api.resource25.read", &reader),
        ("plain_denial", "api.resource25.delete", &reader),
        ("forced_wildcard_grant", "api.admin.users", &reader),
        ("forced_denial", "api.admin.shutdown", &reader),
        ("wildcard_across_roles", "api.resource25.delete", &both),
        ("default_role_only", "public.index", &reader),
        ("no_match", "nothing.here.at.all", &reader),
    ];

    for (name, path, principal) in cases {
        group.bench_function(name, |b| {
            b.iter(|| acl.has_access(black_box(path), principal, true).unwrap());
        });
    }

    group.finish();
}

fn bench_placeholders(c: &mut Criterion) {
    let mut group = c.benchmark_group("placeholders");
    let acl = setup();
    let reader = Principal::new(["reader"]);

    group.bench_function("declared_placeholder", |b| {
        b.iter(|| acl.has_access(black_box("api.resource10.item.get"), &reader, true).unwrap());
    });

    group.bench_function("check_placeholder_hit", |b| {
        b.iter(|| acl.has_access(black_box("api._.read"), &reader, true).unwrap());
    });

    group.bench_function("check_placeholder_miss", |b| {
        b.iter(|| acl.has_access(black_box("api._.missing"), &reader, true).unwrap());
    });

    group.bench_function("composite_only", |b| {
        let check = Check::only(["api.resource1.read", "api.resource2.read", "api.resource3.read"]);
        b.iter(|| acl.has_access(black_box(check.clone()), &reader, true).unwrap());
    });

    group.finish();
}

fn bench_grants(c: &mut Criterion) {
    let mut group = c.benchmark_group("grants");
    let acl = setup();
    let editor = Principal::new(["editor"]).with_grant("project", (0..100).collect::<Vec<i32>>());

    group.bench_function("grant_values", |b| {
        b.iter(|| acl.grant_values(black_box("project"), &editor, false, None).unwrap());
    });

    group.bench_function("match_grant_values", |b| {
        b.iter(|| {
            acl.match_grant_values(black_box("project"), &editor, serde_json::json!(99), None)
                .unwrap()
        });
    });

    group.finish();
}

fn bench_concurrent_checks(c: &mut Criterion) {
    let acl = Arc::new(setup());

    c.bench_function("concurrent_checks_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let acl = Arc::clone(&acl);
                    thread::spawn(move || {
                        let reader = Principal::new(["reader"]);
                        for j in 0..100 {
                            let path = format!("api.resource{}.read", (i * 100 + j) % 50);
                            acl.has_access(path, &reader, true).unwrap();
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_role_resolution,
    bench_single_checks,
    bench_placeholders,
    bench_grants,
    bench_concurrent_checks
);
criterion_main!(benches);
