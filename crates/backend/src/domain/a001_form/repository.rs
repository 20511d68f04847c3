use contracts::domain::a001_form::aggregate::{Field, Form, FormId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_form")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    /// JSON array of Field
    pub fields: String,
    /// JSON map
    pub settings: String,
    pub google_sheet_id: Option<String>,
    pub google_sheet_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Form {
    fn from(m: Model) -> Self {
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let fields: Vec<Field> = serde_json::from_str(&m.fields).unwrap_or_default();
        let settings: Map<String, Value> = serde_json::from_str(&m.settings).unwrap_or_default();

        Form {
            id: FormId::new(uuid),
            user_id: m.user_id,
            title: m.title,
            description: m.description,
            fields,
            settings,
            google_sheet_id: m.google_sheet_id,
            google_sheet_name: m.google_sheet_name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(form: &Form) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(form.id.value().to_string()),
        user_id: Set(form.user_id.clone()),
        title: Set(form.title.clone()),
        description: Set(form.description.clone()),
        fields: Set(serde_json::to_string(&form.fields)?),
        settings: Set(serde_json::to_string(&form.settings)?),
        google_sheet_id: Set(form.google_sheet_id.clone()),
        google_sheet_name: Set(form.google_sheet_name.clone()),
        created_at: Set(form.created_at),
        updated_at: Set(form.updated_at),
    })
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Form>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn list_by_user(user_id: &str) -> anyhow::Result<Vec<Form>> {
    let mut items: Vec<Form> = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(items)
}

pub async fn insert(form: &Form) -> anyhow::Result<Uuid> {
    let uuid = form.id.value();
    to_active(form)?.insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(form: &Form) -> anyhow::Result<()> {
    to_active(form)?.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}
