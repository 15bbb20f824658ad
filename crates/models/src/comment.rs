use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::asset;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub asset_id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Asset }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Asset => Entity::belongs_to(asset::Entity)
                .from(Column::AssetId)
                .to(asset::Column::Id)
                .into(),
        }
    }
}

impl Related<asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn add(
    db: &DatabaseConnection,
    asset_id: &str,
    author: &str,
    body: &str,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        asset_id: Set(asset_id.to_string()),
        author: Set(author.to_string()),
        body: Set(body.to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn for_asset(db: &DatabaseConnection, asset_id: &str) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::AssetId.eq(asset_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn delete_for_asset(db: &DatabaseConnection, asset_id: &str) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::AssetId.eq(asset_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
