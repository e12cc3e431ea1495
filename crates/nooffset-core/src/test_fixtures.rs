use crate::{
    model::{EntityModel, FieldKind, FieldModel},
    traits::{Entity, FieldValue},
    value::Value,
};

///
/// BaseEntity
///
/// Audit-style base embedded by `Product`; owns the `id` key.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct BaseEntity {
    pub(crate) id: i64,
    pub(crate) created_at: String,
}

pub(crate) static BASE_ENTITY_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::BaseEntity",
    primary_key: "id",
    fields: &[
        FieldModel::new("id", FieldKind::Int),
        FieldModel::new("created_at", FieldKind::Text),
    ],
    base: None,
};

///
/// Product
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Product {
    pub(crate) base: BaseEntity,
    pub(crate) name: String,
    pub(crate) price: i64,
    pub(crate) category: i64,
}

impl Product {
    pub(crate) fn new(id: i64, name: &str, price: i64) -> Self {
        Self {
            base: BaseEntity {
                id,
                created_at: "2020-10-12".to_string(),
            },
            name: name.to_string(),
            price,
            category: 1,
        }
    }

    pub(crate) const fn with_category(mut self, category: i64) -> Self {
        self.category = category;
        self
    }
}

static PRODUCT_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Product",
    primary_key: "id",
    fields: &[
        FieldModel::new("name", FieldKind::Text),
        FieldModel::new("price", FieldKind::Int),
        FieldModel::new("category", FieldKind::Int),
    ],
    base: Some(&BASE_ENTITY_MODEL),
};

impl Entity for Product {
    const MODEL: &'static EntityModel = &PRODUCT_MODEL;

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.base.id.to_value()),
            "created_at" => Some(self.base.created_at.to_value()),
            "name" => Some(self.name.to_value()),
            "price" => Some(self.price.to_value()),
            "category" => Some(self.category.to_value()),
            _ => None,
        }
    }
}

///
/// Manufacture
///
/// Flat entity with a text `name` used for string keys and grouping.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Manufacture {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) price: i64,
    pub(crate) category_no: i64,
    pub(crate) create_date: String,
}

impl Manufacture {
    pub(crate) fn new(id: i64, name: &str, price: i64, category_no: i64, create_date: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            category_no,
            create_date: create_date.to_string(),
        }
    }
}

static MANUFACTURE_MODEL: EntityModel = EntityModel {
    path: "test_fixtures::Manufacture",
    primary_key: "id",
    fields: &[
        FieldModel::new("id", FieldKind::Int),
        FieldModel::new("name", FieldKind::Text),
        FieldModel::new("price", FieldKind::Int),
        FieldModel::new("category_no", FieldKind::Int),
        FieldModel::new("create_date", FieldKind::Text),
    ],
    base: None,
};

impl Entity for Manufacture {
    const MODEL: &'static EntityModel = &MANUFACTURE_MODEL;

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "name" => Some(self.name.to_value()),
            "price" => Some(self.price.to_value()),
            "category_no" => Some(self.category_no.to_value()),
            "create_date" => Some(self.create_date.to_value()),
            _ => None,
        }
    }
}
