use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::asset;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "file")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub asset_id: String,
    pub version: i32,
    pub filename: String,
    pub rel_path: String,
    pub format: String,
    pub size_bytes: i64,
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
    version: i32,
    filename: &str,
    rel_path: &str,
    format: &str,
    size_bytes: i64,
) -> Result<Model, ModelError> {
    if filename.trim().is_empty() {
        return Err(ModelError::Validation("filename required".into()));
    }
    let am = ActiveModel {
        asset_id: Set(asset_id.to_string()),
        version: Set(version),
        filename: Set(filename.to_string()),
        rel_path: Set(rel_path.to_string()),
        format: Set(format.to_lowercase()),
        size_bytes: Set(size_bytes),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn for_asset(db: &DatabaseConnection, asset_id: &str) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().filter(Column::AssetId.eq(asset_id)).all(db).await?)
}

pub async fn for_version(
    db: &DatabaseConnection,
    asset_id: &str,
    version: i32,
) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::AssetId.eq(asset_id))
        .filter(Column::Version.eq(version))
        .all(db)
        .await?)
}

pub async fn delete_for_version(
    db: &DatabaseConnection,
    asset_id: &str,
    version: i32,
) -> Result<u64, ModelError> {
    let res = Entity::delete_many()
        .filter(Column::AssetId.eq(asset_id))
        .filter(Column::Version.eq(version))
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
