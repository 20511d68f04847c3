use contracts::domain::a001_form::aggregate::Field;
use contracts::domain::a003_template::aggregate::{Template, TemplateId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_template")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub fields: String,
    pub settings: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Template {
    fn from(m: Model) -> Self {
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let fields: Vec<Field> = serde_json::from_str(&m.fields).unwrap_or_default();
        let settings: Map<String, Value> = serde_json::from_str(&m.settings).unwrap_or_default();

        Template {
            id: TemplateId::new(uuid),
            name: m.name,
            description: m.description,
            fields,
            settings,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<Template>> {
    let items = Entity::find()
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert(template: &Template) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(template.id.value().to_string()),
        name: Set(template.name.clone()),
        description: Set(template.description.clone()),
        fields: Set(serde_json::to_string(&template.fields)?),
        settings: Set(serde_json::to_string(&template.settings)?),
        created_at: Set(template.created_at),
        updated_at: Set(template.updated_at),
    };
    active.insert(conn()).await?;
    Ok(())
}
