use super::*;
use crate::{
    test_fixtures::{BASE_ENTITY_MODEL, Manufacture, Product},
    traits::Entity,
};

#[test]
fn field_lookup_walks_base_chain() {
    let field = Product::MODEL.field("id").expect("inherited id");

    assert_eq!(field.kind, FieldKind::Int);
    assert_eq!(
        Product::MODEL.declaring_path("id"),
        Some(BASE_ENTITY_MODEL.path)
    );
    assert_eq!(
        Product::MODEL.declaring_path("price"),
        Some(Product::MODEL.path)
    );
}

#[test]
fn unknown_field_is_absent() {
    assert!(Product::MODEL.field("weight").is_none());
    assert!(Product::MODEL.declaring_path("weight").is_none());
}

#[test]
fn base_model_does_not_see_derived_fields() {
    assert!(BASE_ENTITY_MODEL.field("price").is_none());
}

#[test]
fn field_kind_classification() {
    assert!(FieldKind::Int.is_numeric());
    assert!(FieldKind::Uint.is_numeric());
    assert!(!FieldKind::Text.is_numeric());
    assert!(!FieldKind::Unsupported.is_orderable());
    assert_eq!(
        Manufacture::MODEL.field("name").map(|f| f.kind),
        Some(FieldKind::Text)
    );
}
