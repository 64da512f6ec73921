use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enrollment;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Enrollment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Enrollment => Entity::has_many(enrollment::Entity).into(),
        }
    }
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_names(first_name: &str, last_name: &str) -> Result<(), ModelError> {
    if first_name.trim().is_empty() {
        return Err(ModelError::Validation("firstName required".into()));
    }
    if last_name.trim().is_empty() {
        return Err(ModelError::Validation("lastName required".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    first_name: &str,
    last_name: &str,
) -> Result<Model, ModelError> {
    validate_names(first_name, last_name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
