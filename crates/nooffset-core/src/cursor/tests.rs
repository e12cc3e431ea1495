use super::*;
use crate::{
    direction::Direction,
    error::{ConfigError, ReadError},
    obs::ReaderMetrics,
    query::{CompareOp, FieldRef, Predicate, Query},
    store::{DataSource, MemoryStore},
    test_fixtures::{Manufacture, Product},
    value::Value,
};

fn product_id() -> KeyField<Product, i64> {
    KeyField::new("id", |p| p.base.id)
}

fn manufacture_name() -> KeyField<Manufacture, String> {
    KeyField::new("name", |m| m.name.clone())
}

fn products() -> MemoryStore<Product> {
    MemoryStore::with_rows(vec![
        Product::new(1, "a", 1_000),
        Product::new(2, "b", 2_000),
        Product::new(3, "c", 3_000),
        Product::new(4, "d", 500),
    ])
}

fn boundary_of<E>(query: &Query<E>) -> Vec<(String, CompareOp, Value)> {
    let mut out = Vec::new();
    let mut stack: Vec<&Predicate> = query.predicate().into_iter().collect();
    while let Some(p) = stack.pop() {
        match p {
            Predicate::And(children) => stack.extend(children),
            Predicate::Compare(cmp) => out.push((cmp.field.clone(), cmp.op, cmp.value.clone())),
            _ => {}
        }
    }

    out
}

// ----------------------------------------------------------------------
// Construction
// ----------------------------------------------------------------------

#[test]
fn key_declared_on_base_entity_resolves() {
    let options = NumberOptions::number(product_id(), Direction::Asc).expect("inherited key");

    assert_eq!(options.field_name(), "id");
    assert_eq!(options.state(), CursorState::Uninitialized);
    assert!(options.current_key().is_none());
}

#[test]
fn unknown_key_field_is_rejected_at_construction() {
    let key = KeyField::<Product, i64>::new("no_such_field", |p| p.price);

    let err = NoOffsetOptions::new(key, Direction::Asc).expect_err("missing field");
    assert!(matches!(
        err,
        ConfigError::FieldNotFound { field, .. } if field == "no_such_field"
    ));
}

#[test]
fn key_type_must_match_field_kind() {
    let key = KeyField::<Product, String>::new("price", |p| p.price.to_string());

    let err = StringOptions::string(key, Direction::Asc).expect_err("kind mismatch");
    assert!(matches!(err, ConfigError::FieldKindMismatch { .. }));
    assert!(err.to_string().contains("expected a text key"));
}

#[test]
fn numeric_alias_still_validates_field_kind() {
    let key = KeyField::<Manufacture, String>::new("id", |m| m.id.to_string());

    let err = NumberOptions::<Manufacture, String>::new(key, Direction::Asc)
        .expect_err("id is numeric");

    assert!(matches!(err, ConfigError::FieldKindMismatch { .. }));
}

#[test]
fn mismatch_on_inherited_field_names_the_declaring_entity() {
    let key = KeyField::<Product, String>::new("id", |p| p.base.id.to_string());

    let Err(ConfigError::FieldKindMismatch { entity, .. }) = key.resolve() else {
        panic!("expected kind mismatch");
    };
    assert_eq!(entity, "test_fixtures::BaseEntity");
}

#[test]
fn dotted_path_uses_last_segment() {
    let key = KeyField::<Manufacture, i64>::from_path("manufacture.id", |m| m.id)
        .expect("valid path");

    assert_eq!(key.name(), "id");
    key.resolve().expect("id exists");
}

#[test]
fn dotted_path_with_empty_tail_is_rejected() {
    let err = KeyField::<Manufacture, i64>::from_path("manufacture.", |m| m.id)
        .expect_err("empty segment");

    assert!(matches!(err, ConfigError::InvalidFieldPath { path } if path == "manufacture."));
}

// ----------------------------------------------------------------------
// Bootstrap
// ----------------------------------------------------------------------

#[test]
fn ascending_bootstrap_seeds_minimum_of_filtered_rows() {
    let store = products();
    let mut session = store.open_session().expect("session");
    let base = Query::new().filter(FieldRef::new("price").gte(1_000_i64));
    let mut options = NumberOptions::number(product_id(), Direction::Asc).expect("options");

    options.init_cursor(&mut session, &base, 0).expect("bootstrap");

    assert_eq!(options.current_key(), Some(&1));
    assert_eq!(options.state(), CursorState::Bootstrapped);
    assert!(options.bounds().is_none());
}

#[test]
fn descending_bootstrap_seeds_maximum() {
    let store = products();
    let mut session = store.open_session().expect("session");
    let mut options = NumberOptions::number(product_id(), Direction::Desc).expect("options");

    options
        .init_cursor(&mut session, &Query::new(), 0)
        .expect("bootstrap");

    assert_eq!(options.current_key(), Some(&4));
}

#[test]
fn bootstrap_only_runs_on_first_page() {
    let store = products();
    let mut session = store.open_session().expect("session");
    let mut options = NumberOptions::number(product_id(), Direction::Asc).expect("options");

    options
        .init_cursor(&mut session, &Query::new(), 3)
        .expect("no-op");

    assert!(options.current_key().is_none());
    assert_eq!(options.state(), CursorState::Uninitialized);
    assert_eq!(store.stats().aggregates, 0);
}

#[test]
fn empty_filter_leaves_cursor_unset_and_query_unchanged() {
    let store = products();
    let mut session = store.open_session().expect("session");
    let base = Query::new().filter(FieldRef::new("price").gt(1_000_000_i64));
    let mut options = NumberOptions::number(product_id(), Direction::Asc).expect("options");

    options.init_cursor(&mut session, &base, 0).expect("bootstrap");

    assert!(options.current_key().is_none());
    assert_eq!(options.state(), CursorState::Bootstrapped);

    let built = options.build_query(&base, 0);
    assert_eq!(built.predicate(), base.predicate());
    assert!(built.order_terms().is_empty());
}

#[test]
fn grouped_bootstrap_captures_bound_pair_from_ungrouped_filter() {
    let store = MemoryStore::with_rows(vec![
        Manufacture::new(1, "gamma", 1_000, 1, "2020-10-12"),
        Manufacture::new(2, "alpha", 2_000, 1, "2020-10-12"),
        Manufacture::new(3, "beta", 3_000, 2, "2020-10-12"),
        Manufacture::new(4, "delta", 100, 2, "2020-10-12"),
    ]);
    let mut session = store.open_session().expect("session");
    let base = Query::new()
        .filter(FieldRef::new("price").gte(1_000_i64))
        .group_by("category_no");
    let mut options = StringOptions::string(manufacture_name(), Direction::Asc).expect("options");

    options.init_cursor(&mut session, &base, 0).expect("bootstrap");

    assert_eq!(options.current_key().map(String::as_str), Some("alpha"));
    assert_eq!(
        options.bounds(),
        Some(&KeyBounds {
            lower: "alpha".to_string(),
            upper: "gamma".to_string(),
        })
    );

    let built = options.build_query(&base, 1);
    let terms = boundary_of(&built);
    assert!(terms.contains(&("name".to_string(), CompareOp::Gte, Value::Text("alpha".into()))));
    assert!(terms.contains(&("name".to_string(), CompareOp::Lte, Value::Text("gamma".into()))));
    assert!(terms.contains(&("name".to_string(), CompareOp::Gt, Value::Text("alpha".into()))));
    assert_eq!(built.group_fields(), ["category_no".to_string()]);
}

#[test]
fn undecodable_bootstrap_value_is_reported() {
    let store = products();
    let mut session = store.open_session().expect("session");
    let key = KeyField::<Product, u8>::new("price", |p| u8::try_from(p.price).unwrap_or_default());
    let mut options = NumberOptions::number(key, Direction::Desc).expect("options");

    let err = options
        .init_cursor(&mut session, &Query::new(), 0)
        .expect_err("3000 does not fit in u8");

    assert!(matches!(err, ReadError::KeyDecode { ref field, .. } if field == "price"));
    assert_eq!(options.state(), CursorState::Uninitialized);
}

// ----------------------------------------------------------------------
// Query augmentation
// ----------------------------------------------------------------------

#[test]
fn first_page_is_inclusive_and_later_pages_strict() {
    let store = products();
    let mut session = store.open_session().expect("session");
    let mut options = NumberOptions::number(product_id(), Direction::Asc).expect("options");
    options
        .init_cursor(&mut session, &Query::new(), 0)
        .expect("bootstrap");

    let first = options.build_query(&Query::new(), 0);
    assert_eq!(
        boundary_of(&first),
        vec![("id".to_string(), CompareOp::Gte, Value::Int(1))]
    );
    assert_eq!(first.order_terms()[0], Direction::Asc.order("id"));

    options.advance_cursor(&Product::new(2, "b", 2_000));
    let second = options.build_query(&Query::new(), 1);
    assert_eq!(
        boundary_of(&second),
        vec![("id".to_string(), CompareOp::Gt, Value::Int(2))]
    );
}

#[test]
fn key_order_goes_ahead_of_existing_order_terms() {
    let store = products();
    let mut session = store.open_session().expect("session");
    let base = Query::new().order_by(FieldRef::new("price").desc());
    let mut options = NumberOptions::number(product_id(), Direction::Desc).expect("options");
    options.init_cursor(&mut session, &base, 0).expect("bootstrap");

    let built = options.build_query(&base, 0);

    assert_eq!(built.order_terms().len(), 2);
    assert_eq!(built.order_terms()[0].field, "id");
    assert_eq!(built.order_terms()[1].field, "price");
    assert_eq!(
        boundary_of(&built),
        vec![("id".to_string(), CompareOp::Lte, Value::Int(4))]
    );
}

#[test]
fn base_query_is_never_mutated() {
    let store = products();
    let mut session = store.open_session().expect("session");
    let base = Query::new().filter(FieldRef::new("category").eq(1_i64));
    let before = base.to_string();
    let mut options = NumberOptions::number(product_id(), Direction::Asc).expect("options");
    options.init_cursor(&mut session, &base, 0).expect("bootstrap");

    let _ = options.build_query(&base, 0);
    let _ = options.build_query(&base, 1);

    assert_eq!(base.to_string(), before);
}

// ----------------------------------------------------------------------
// Lifecycle
// ----------------------------------------------------------------------

#[test]
fn advance_then_reset_returns_to_uninitialized() {
    let metrics = ReaderMetrics::new();
    let mut options = NumberOptions::number(product_id(), Direction::Asc)
        .expect("options")
        .with_sink(metrics.clone());

    options.advance_cursor(&Product::new(7, "g", 7));
    assert_eq!(options.current_key(), Some(&7));
    assert_eq!(options.state(), CursorState::Advanced);
    assert_eq!(metrics.snapshot().cursor_advances, 1);

    options.mark_exhausted();
    assert_eq!(options.state(), CursorState::Exhausted);

    options.reset();
    assert!(options.current_key().is_none());
    assert!(options.bounds().is_none());
    assert_eq!(options.state(), CursorState::Uninitialized);
}

#[test]
fn bootstrap_reports_to_sink() {
    let metrics = ReaderMetrics::new();
    let store = products();
    let mut session = store.open_session().expect("session");
    let mut options = NumberOptions::number(product_id(), Direction::Asc)
        .expect("options")
        .with_sink(metrics.clone());

    options
        .init_cursor(&mut session, &Query::new(), 0)
        .expect("bootstrap");

    assert_eq!(metrics.snapshot().cursor_seeds, 1);
}
