use std::collections::HashMap;

use sea_orm::{entity::prelude::*, sea_query::Expr, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::product::validate_price;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_name: String,
    pub subcategory_name: String,
    pub before_service_image: Option<String>,
    pub after_service_image: Option<String>,
    #[serde(skip_serializing, default)]
    pub clicks: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewService {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_name: String,
    pub subcategory_name: String,
    pub before_service_image: Option<String>,
    pub after_service_image: Option<String>,
}

pub fn validate(s: &NewService) -> Result<(), ModelError> {
    errors::require_text("name", &s.name)?;
    errors::max_len("name", &s.name, 100)?;
    errors::require_text("category_name", &s.category_name)?;
    errors::max_len("category_name", &s.category_name, 100)?;
    errors::require_text("subcategory_name", &s.subcategory_name)?;
    errors::max_len("subcategory_name", &s.subcategory_name, 100)?;
    if let Some(d) = &s.description {
        errors::max_len("description", d, 500)?;
    }
    for (field, img) in [("before_service_image", &s.before_service_image), ("after_service_image", &s.after_service_image)] {
        if let Some(v) = img {
            errors::max_len(field, v, 255)?;
        }
    }
    validate_price(s.price)
}

pub async fn create<C: ConnectionTrait>(db: &C, s: NewService) -> Result<Model, ModelError> {
    validate(&s)?;
    let am = ActiveModel {
        name: Set(s.name),
        description: Set(s.description),
        price: Set(s.price),
        category_name: Set(s.category_name),
        subcategory_name: Set(s.subcategory_name),
        before_service_image: Set(s.before_service_image),
        after_service_image: Set(s.after_service_image),
        clicks: Set(0),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn increment_clicks<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Clicks, Expr::col(Column::Clicks).add(1))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn total_clicks<C: ConnectionTrait>(db: &C) -> Result<i64, ModelError> {
    let total = Entity::find()
        .select_only()
        .column_as(Column::Clicks.sum(), "total")
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

pub async fn names_by_id<C: ConnectionTrait>(db: &C) -> Result<HashMap<i32, String>, ModelError> {
    let rows = Entity::find()
        .select_only()
        .column(Column::Id)
        .column(Column::Name)
        .into_tuple::<(i32, String)>()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}
