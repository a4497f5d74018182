use std::collections::HashMap;

use sea_orm::{entity::prelude::*, sea_query::Expr, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub category_name: String,
    pub subcategory_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
    #[serde(skip_serializing, default)]
    pub clicks: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields required to create a product. `image_url` is already resolved to
/// either an upload path or an external URL.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category_name: String,
    pub subcategory_name: String,
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
}

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ModelError::Validation("price must be a non-negative number".into()));
    }
    Ok(())
}

pub fn validate(p: &NewProduct) -> Result<(), ModelError> {
    errors::require_text("name", &p.name)?;
    errors::max_len("name", &p.name, 100)?;
    errors::require_text("category_name", &p.category_name)?;
    errors::max_len("category_name", &p.category_name, 100)?;
    errors::require_text("subcategory_name", &p.subcategory_name)?;
    errors::max_len("subcategory_name", &p.subcategory_name, 100)?;
    errors::require_text("description", &p.description)?;
    if let Some(url) = &p.image_url {
        errors::max_len("image_url", url, 255)?;
    }
    validate_price(p.price)
}

pub async fn create<C: ConnectionTrait>(db: &C, p: NewProduct) -> Result<Model, ModelError> {
    validate(&p)?;
    let am = ActiveModel {
        name: Set(p.name),
        category_name: Set(p.category_name),
        subcategory_name: Set(p.subcategory_name),
        description: Set(p.description),
        price: Set(p.price),
        image_url: Set(p.image_url),
        clicks: Set(0),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Bump the click counter in a single `UPDATE ... SET clicks = clicks + 1`.
/// Returns `false` when no row has that id.
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

/// id -> name for every product, used to label bookings.
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
