//! Daily menu entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::meal::Meal;
use super::user::UserId;

/// One meal offered on one calendar day.
///
/// At most one entry exists per `(day, meal.id)`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub day: NaiveDate,
    pub meal: Meal,
    #[schema(value_type = String, format = Uuid)]
    pub added_by: UserId,
    pub created_at: DateTime<Utc>,
}
