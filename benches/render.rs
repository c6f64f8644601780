use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rustf_adapter::query::fragments::collapse_whitespace;
use rustf_adapter::query::{
    render_insert_or_update, Condition, ConflictStrategy, Expr, FieldMap, JoinClause,
    MySQLDialect, OrderByClause, Predicate, Query,
};

fn benchmark_select(c: &mut Criterion) {
    let dialect = MySQLDialect::new();

    let simple = Query::new("users")
        .with_columns(["id", "name"])
        .and_where(Predicate::raw("age > 18"))
        .order(OrderByClause::asc("name"))
        .with_limit(10);

    c.bench_function("render_simple_select", |b| {
        b.iter(|| black_box(simple.render(&dialect)))
    });

    let complex = Query::new("orders")
        .with_columns(["orders.id", "users.name", "SUM(items.price) AS total"])
        .join(JoinClause::inner("users", "users.id = orders.user_id"))
        .join(JoinClause::left("items", "items.order_id = orders.id"))
        .and_where(Predicate::eq(Expr::ident("orders.status"), "paid"))
        .or_where(Predicate::is_in(Expr::ident("orders.region"), vec!["eu", "us", "apac"]))
        .with_group_by(["orders.id", "users.name"])
        .with_having(vec![Condition::raw("SUM(items.price) > 100")])
        .order(OrderByClause::desc(Expr::ident("created_at")))
        .paginate(3, 25);

    c.bench_function("render_complex_select", |b| {
        b.iter(|| black_box(complex.render(&dialect)))
    });
}

fn benchmark_insert(c: &mut Criterion) {
    let dialect = MySQLDialect::new();
    let mut fields = FieldMap::new();
    fields.insert("name".to_string(), "O'Brien".into());
    fields.insert("email".to_string(), "ob@example.com".into());
    fields.insert("age".to_string(), 42.into());

    c.bench_function("render_upsert", |b| {
        b.iter(|| {
            let stmt =
                render_insert_or_update(&dialect, "users", black_box(&fields), ConflictStrategy::Update);
            black_box(stmt)
        })
    });
}

fn benchmark_collapse(c: &mut Criterion) {
    let sql = "SELECT   id,\n   name  FROM  `users`   WHERE  note = 'keep   this'   LIMIT 10";

    c.bench_function("collapse_whitespace", |b| {
        b.iter(|| black_box(collapse_whitespace(black_box(sql))))
    });
}

criterion_group!(benches, benchmark_select, benchmark_insert, benchmark_collapse);
criterion_main!(benches);
