//! Catalog meal model.
//!
//! Meals are owned by the caterer who created them. Deleting a meal retires
//! it: the record stays so historical orders keep resolving, but it drops
//! out of catalog reads and can no longer be published.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

pub const MEAL_NAME_MAX: usize = 80;
pub const MEAL_CATEGORY_MAX: usize = 50;
pub const MEAL_IMAGE_URL_MAX: usize = 255;

/// Validation errors for meal fields.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MealValidationError {
    #[error("meal name must not be empty")]
    EmptyName,
    #[error("meal name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("meal category must be at most {max} characters")]
    CategoryTooLong { max: usize },
    #[error("image url must be at most {max} characters")]
    ImageUrlTooLong { max: usize },
    #[error("price must be a finite, non-negative number, got {0}")]
    InvalidPrice(f64),
    #[error("at least one field must be supplied")]
    EmptyPatch,
}

impl MealValidationError {
    /// Name of the offending payload field, for error details.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => Some("name"),
            Self::CategoryTooLong { .. } => Some("category"),
            Self::ImageUrlTooLong { .. } => Some("imageUrl"),
            Self::InvalidPrice(_) => Some("price"),
            Self::EmptyPatch => None,
        }
    }
}

/// Stable meal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealId(Uuid);

impl MealId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-negative, finite price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, MealValidationError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(MealValidationError::InvalidPrice(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = MealValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

fn name(raw: &str) -> Result<String, MealValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MealValidationError::EmptyName);
    }
    if trimmed.chars().count() > MEAL_NAME_MAX {
        return Err(MealValidationError::NameTooLong { max: MEAL_NAME_MAX });
    }
    Ok(trimmed.to_owned())
}

fn bounded(
    raw: Option<&str>,
    max: usize,
    err: MealValidationError,
) -> Result<Option<String>, MealValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.chars().count() > max => Err(err),
        Some(value) => Ok(Some(value.to_owned())),
    }
}

/// Catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[schema(value_type = String, format = Uuid)]
    pub id: MealId,
    #[schema(example = "Tomato soup")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[schema(value_type = f64, example = 5.0)]
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(value_type = String, format = Uuid)]
    pub caterer: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub retired: bool,
}

/// Validated fields for a new meal.
#[derive(Debug, Clone, PartialEq)]
pub struct MealDraft {
    pub name: String,
    pub category: Option<String>,
    pub price: Price,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl MealDraft {
    pub fn try_from_parts(
        raw_name: &str,
        category: Option<&str>,
        price: f64,
        image_url: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, MealValidationError> {
        Ok(Self {
            name: name(raw_name)?,
            category: bounded(
                category,
                MEAL_CATEGORY_MAX,
                MealValidationError::CategoryTooLong {
                    max: MEAL_CATEGORY_MAX,
                },
            )?,
            price: Price::new(price)?,
            image_url: bounded(
                image_url,
                MEAL_IMAGE_URL_MAX,
                MealValidationError::ImageUrlTooLong {
                    max: MEAL_IMAGE_URL_MAX,
                },
            )?,
            description: description
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
        })
    }

    /// Materialise the draft as a meal owned by `caterer`.
    pub fn into_meal(self, id: MealId, caterer: UserId, created_at: DateTime<Utc>) -> Meal {
        Meal {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            image_url: self.image_url,
            description: self.description,
            caterer,
            created_at,
            retired: false,
        }
    }
}

/// Partial update; absent fields keep their prior value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl MealPatch {
    pub fn try_from_parts(
        raw_name: Option<&str>,
        category: Option<&str>,
        price: Option<f64>,
        image_url: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, MealValidationError> {
        let patch = Self {
            name: raw_name.map(name).transpose()?,
            category: bounded(
                category,
                MEAL_CATEGORY_MAX,
                MealValidationError::CategoryTooLong {
                    max: MEAL_CATEGORY_MAX,
                },
            )?,
            price: price.map(Price::new).transpose()?,
            image_url: bounded(
                image_url,
                MEAL_IMAGE_URL_MAX,
                MealValidationError::ImageUrlTooLong {
                    max: MEAL_IMAGE_URL_MAX,
                },
            )?,
            description: description
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
        };
        if patch == Self::default() {
            return Err(MealValidationError::EmptyPatch);
        }
        Ok(patch)
    }

    /// Apply the present fields onto `meal`. Identity and owner never change.
    pub fn apply_to(self, mut meal: Meal) -> Meal {
        if let Some(name) = self.name {
            meal.name = name;
        }
        if let Some(category) = self.category {
            meal.category = Some(category);
        }
        if let Some(price) = self.price {
            meal.price = price;
        }
        if let Some(image_url) = self.image_url {
            meal.image_url = Some(image_url);
        }
        if let Some(description) = self.description {
            meal.description = Some(description);
        }
        meal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn soup() -> Meal {
        MealDraft::try_from_parts("Soup", Some("starter"), 5.0, None, None)
            .expect("valid draft")
            .into_meal(
                MealId::random(),
                UserId::random(),
                Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
                    .single()
                    .expect("valid timestamp"),
            )
    }

    #[rstest]
    #[case(0.0)]
    #[case(12.5)]
    fn price_accepts_non_negative(#[case] value: f64) {
        assert_eq!(Price::new(value).map(Price::value), Ok(value));
    }

    #[rstest]
    #[case(-0.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn price_rejects_negative_and_non_finite(#[case] value: f64) {
        assert!(matches!(
            Price::new(value),
            Err(MealValidationError::InvalidPrice(_))
        ));
    }

    #[rstest]
    fn draft_trims_and_drops_blank_optionals() {
        let draft = MealDraft::try_from_parts("  Soup ", Some(" "), 5.0, Some(""), Some("  hot "))
            .expect("valid draft");
        assert_eq!(draft.name, "Soup");
        assert!(draft.category.is_none());
        assert!(draft.image_url.is_none());
        assert_eq!(draft.description.as_deref(), Some("hot"));
    }

    #[rstest]
    #[case("", MealValidationError::EmptyName)]
    #[case("   ", MealValidationError::EmptyName)]
    fn draft_requires_a_name(#[case] raw: &str, #[case] expected: MealValidationError) {
        let err = MealDraft::try_from_parts(raw, None, 1.0, None, None).expect_err("no name");
        assert_eq!(err, expected);
        assert_eq!(err.field(), Some("name"));
    }

    #[rstest]
    fn draft_bounds_name_length() {
        let long = "x".repeat(MEAL_NAME_MAX + 1);
        let err = MealDraft::try_from_parts(&long, None, 1.0, None, None).expect_err("too long");
        assert_eq!(err, MealValidationError::NameTooLong { max: MEAL_NAME_MAX });
    }

    #[rstest]
    fn patch_updates_only_present_fields(soup: Meal) {
        let original = soup.clone();
        let patch = MealPatch::try_from_parts(None, None, Some(7.5), None, Some("spicy"))
            .expect("valid patch");
        let updated = patch.apply_to(soup);
        assert_eq!(updated.price.value(), 7.5);
        assert_eq!(updated.description.as_deref(), Some("spicy"));
        assert_eq!(updated.name, original.name);
        assert_eq!(updated.category, original.category);
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.caterer, original.caterer);
    }

    #[rstest]
    fn empty_patch_is_rejected() {
        assert_eq!(
            MealPatch::try_from_parts(None, None, None, None, None),
            Err(MealValidationError::EmptyPatch)
        );
    }

    #[rstest]
    fn retired_flag_is_not_serialised(mut soup: Meal) {
        soup.retired = true;
        let value = serde_json::to_value(&soup).expect("serialise meal");
        assert!(value.get("retired").is_none());
        assert_eq!(value["category"], "starter");
    }
}
