use contracts::domain::a002_response::aggregate::{FormId, FormResponse, ResponseId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_response")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub form_id: String,
    /// JSON map of submitted values
    pub data: String,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FormResponse {
    fn from(m: Model) -> Self {
        let id = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let form_id = Uuid::parse_str(&m.form_id).unwrap_or_else(|_| Uuid::new_v4());
        let data: Map<String, Value> = serde_json::from_str(&m.data).unwrap_or_default();

        FormResponse {
            id: ResponseId::new(id),
            form_id: FormId::new(form_id),
            data,
            submitted_at: m.submitted_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn insert(response: &FormResponse) -> anyhow::Result<ResponseId> {
    let active = ActiveModel {
        id: Set(response.id.value().to_string()),
        form_id: Set(response.form_id.value().to_string()),
        data: Set(serde_json::to_string(&response.data)?),
        submitted_at: Set(response.submitted_at),
    };
    active.insert(conn()).await?;
    Ok(response.id)
}

pub async fn list_by_form(form_id: Uuid) -> anyhow::Result<Vec<FormResponse>> {
    let items = Entity::find()
        .filter(Column::FormId.eq(form_id.to_string()))
        .order_by_asc(Column::SubmittedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
