use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::asset;
use crate::errors::ModelError;

/// One immutable numbered snapshot of an asset. The number is assigned from
/// the asset's head counter at publish time and never changes afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "version")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub asset_id: String,
    pub version: i32,
    pub metadata: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
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

pub async fn create(
    db: &DatabaseConnection,
    asset_id: &str,
    number: i32,
    metadata: serde_json::Value,
) -> Result<Model, ModelError> {
    if number < 1 {
        return Err(ModelError::Validation("version numbers start at 1".into()));
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        asset_id: Set(asset_id.to_string()),
        version: Set(number),
        metadata: Set(metadata),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// All versions of an asset, newest first.
pub async fn for_asset(db: &DatabaseConnection, asset_id: &str) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::AssetId.eq(asset_id))
        .order_by_desc(Column::Version)
        .all(db)
        .await?)
}

pub async fn find(
    db: &DatabaseConnection,
    asset_id: &str,
    number: i32,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::AssetId.eq(asset_id))
        .filter(Column::Version.eq(number))
        .one(db)
        .await?)
}

pub async fn latest(db: &DatabaseConnection, asset_id: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::AssetId.eq(asset_id))
        .order_by_desc(Column::Version)
        .one(db)
        .await?)
}

/// Delete one version row. Returns how many rows went away (0 or 1).
pub async fn delete(
    db: &DatabaseConnection,
    asset_id: &str,
    number: i32,
) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::AssetId.eq(asset_id))
        .filter(Column::Version.eq(number))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete_for_asset(db: &DatabaseConnection, asset_id: &str) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::AssetId.eq(asset_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
