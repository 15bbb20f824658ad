use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Append-only change feed. Rows are kept even after the asset they refer to
/// is deleted, so sync clients can observe the deletion.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "change")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: String,
    pub asset_id: String,
    pub payload: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn record(
    db: &DatabaseConnection,
    kind: &str,
    asset_id: &str,
    payload: serde_json::Value,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        kind: Set(kind.to_string()),
        asset_id: Set(asset_id.to_string()),
        payload: Set(payload),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Changes strictly after `since` (or from the beginning), oldest first.
pub async fn list_since(
    db: &DatabaseConnection,
    since: Option<DateTimeWithTimeZone>,
    limit: u64,
) -> Result<Vec<Model>, ModelError> {
    let mut query = Entity::find();
    if let Some(since) = since {
        query = query.filter(Column::CreatedAt.gt(since));
    }
    Ok(query
        .order_by_asc(Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?)
}
