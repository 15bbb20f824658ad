use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{comment, file, version};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub family: String,
    pub description: String,
    pub tags: String,
    pub status: String,
    /// Highest version number ever assigned for this asset. Only ever grows;
    /// deleting a version does not wind it back.
    pub head_version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Version, File, Comment }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Version => Entity::has_many(version::Entity).into(),
            Relation::File => Entity::has_many(file::Entity).into(),
            Relation::Comment => Entity::has_many(comment::Entity).into(),
        }
    }
}

impl Related<version::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Version.def()
    }
}

impl Related<file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::File.def()
    }
}

impl Related<comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Create the asset row if missing, otherwise refresh name/family/updated_at.
pub async fn ensure(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
    family: &str,
    description: &str,
    tags: &str,
) -> Result<Model, ModelError> {
    if id.trim().is_empty() {
        return Err(ModelError::Validation("asset id required".into()));
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    match Entity::find_by_id(id).one(db).await? {
        Some(existing) => {
            let mut am: ActiveModel = existing.into();
            am.name = Set(name.to_string());
            am.family = Set(family.to_string());
            am.updated_at = Set(now);
            Ok(am.update(db).await?)
        }
        None => {
            let am = ActiveModel {
                id: Set(id.to_string()),
                name: Set(name.to_string()),
                family: Set(family.to_string()),
                description: Set(description.to_string()),
                tags: Set(tags.to_string()),
                status: Set("published".into()),
                head_version: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
            };
            Ok(am.insert(db).await?)
        }
    }
}

pub async fn get(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Bump the head version counter and return the newly assigned number.
pub async fn assign_next_version(db: &DatabaseConnection, id: &str) -> Result<i32, ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("asset {id}")))?;
    let next = found.head_version + 1;
    let mut am: ActiveModel = found.into();
    am.head_version = Set(next);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;
    Ok(next)
}

#[derive(Clone, Debug, Default)]
pub struct ListFilter {
    pub family: Option<String>,
    pub status: Option<String>,
}

pub async fn list(
    db: &DatabaseConnection,
    filter: &ListFilter,
    limit: u64,
    offset: u64,
) -> Result<Vec<Model>, ModelError> {
    let mut query = Entity::find();
    if let Some(family) = &filter.family {
        query = query.filter(Column::Family.eq(family.clone()));
    }
    if let Some(status) = &filter.status {
        query = query.filter(Column::Status.eq(status.clone()));
    }
    Ok(query
        .order_by_desc(Column::UpdatedAt)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?)
}

#[derive(Clone, Debug, Default)]
pub struct UpdateFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub status: Option<String>,
}

impl UpdateFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.status.is_none()
    }
}

/// Update the mutable metadata fields only; version bookkeeping is untouched.
pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    fields: UpdateFields,
) -> Result<Model, ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("asset {id}")))?;
    if fields.is_empty() {
        return Ok(found);
    }
    let mut am: ActiveModel = found.into();
    if let Some(name) = fields.name {
        am.name = Set(name);
    }
    if let Some(description) = fields.description {
        am.description = Set(description);
    }
    if let Some(tags) = fields.tags {
        am.tags = Set(tags);
    }
    if let Some(status) = fields.status {
        am.status = Set(status);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn hard_delete(db: &DatabaseConnection, id: &str) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
