//! Catalog entity drafts and their validation rules.
//!
//! Each entity has a raw form struct (every field an `Option<String>`, so
//! any body deserializes and missing fields surface as field errors rather
//! than transport-level rejections) and a typed draft produced by its
//! `validate_*` function. Validation is pure; referential existence is
//! checked against the store by the HTTP layer.

use serde::{Deserialize, Serialize};

use crate::forms::{
    optional_text, required_date, required_number, required_price, required_ref, required_text,
    trimmed, FieldError,
};
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
   Field limits
   -------------------------------------------------------------------------- */

/// Maximum length for a category name.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Maximum length for a race name.
pub const MAX_RACE_NAME_LEN: usize = 200;

/// Maximum length for a location city name.
pub const MAX_CITY_LEN: usize = 100;

/// Maximum length for a description (categories and races).
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Maximum length for a race image URL.
pub const MAX_IMAGE_URL_LEN: usize = 1000;

/// Maximum length for a modality track description.
pub const MAX_TRACK_LEN: usize = 10_000;

/// The Spanish autonomous communities a location may belong to.
pub const COMMUNITIES: &[&str] = &[
    "Andalucía",
    "Aragón",
    "Asturias",
    "Islas Baleares",
    "Islas Canarias",
    "Cantabria",
    "Castilla y Leon",
    "Castilla-La Mancha",
    "Cataluña",
    "Comunidad Valenciana",
    "Extremadura",
    "Galicia",
    "Comunidad de Madrid",
    "Región de Murcia",
    "Comunidad Foral de Navarra",
    "País Vasco",
    "La Rioja",
    "Ceuta",
    "Melilla",
];

/* --------------------------------------------------------------------------
   Category
   -------------------------------------------------------------------------- */

/// Raw category form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryForm {
    /// The form as re-rendered after a failed submission: every field
    /// trimmed, nothing else changed.
    pub fn sanitized(&self) -> Self {
        Self {
            name: self.name.as_deref().map(|v| v.trim().to_string()),
            description: self.description.as_deref().map(|v| v.trim().to_string()),
        }
    }
}

/// Validated category draft.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

pub fn validate_category(form: &CategoryForm) -> Result<CategoryDraft, Vec<FieldError>> {
    let mut errors = Vec::new();
    let name = required_text(
        &mut errors,
        "name",
        "Category name",
        form.name.as_deref(),
        MAX_CATEGORY_NAME_LEN,
    );
    let description = optional_text(
        &mut errors,
        "description",
        "Description",
        form.description.as_deref(),
        MAX_DESCRIPTION_LEN,
    );
    if errors.is_empty() {
        Ok(CategoryDraft { name, description })
    } else {
        Err(errors)
    }
}

/* --------------------------------------------------------------------------
   Location
   -------------------------------------------------------------------------- */

/// Raw location form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationForm {
    pub city: Option<String>,
    pub community: Option<String>,
}

impl LocationForm {
    /// The form as re-rendered after a failed submission.
    pub fn sanitized(&self) -> Self {
        Self {
            city: self.city.as_deref().map(|v| v.trim().to_string()),
            community: self.community.as_deref().map(|v| v.trim().to_string()),
        }
    }
}

/// Validated location draft.
#[derive(Debug, Clone, Serialize)]
pub struct LocationDraft {
    pub city: String,
    pub community: String,
}

pub fn validate_location(form: &LocationForm) -> Result<LocationDraft, Vec<FieldError>> {
    let mut errors = Vec::new();
    let city = required_text(
        &mut errors,
        "city",
        "City name",
        form.city.as_deref(),
        MAX_CITY_LEN,
    );
    let community = trimmed(form.community.as_deref());
    if community.is_empty() {
        errors.push(FieldError::new("community", "Community required"));
    } else if !COMMUNITIES.contains(&community.as_str()) {
        errors.push(FieldError::new(
            "community",
            format!("'{community}' is not a recognized community"),
        ));
    }
    if errors.is_empty() {
        Ok(LocationDraft { city, community })
    } else {
        Err(errors)
    }
}

/* --------------------------------------------------------------------------
   Race
   -------------------------------------------------------------------------- */

/// Raw race form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl RaceForm {
    /// The form as re-rendered after a failed submission.
    pub fn sanitized(&self) -> Self {
        Self {
            name: self.name.as_deref().map(|v| v.trim().to_string()),
            category: self.category.as_deref().map(|v| v.trim().to_string()),
            description: self.description.as_deref().map(|v| v.trim().to_string()),
            image_url: self.image_url.as_deref().map(|v| v.trim().to_string()),
        }
    }
}

/// Validated race draft.
#[derive(Debug, Clone, Serialize)]
pub struct RaceDraft {
    pub name: String,
    pub category_id: DbId,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

pub fn validate_race(form: &RaceForm) -> Result<RaceDraft, Vec<FieldError>> {
    let mut errors = Vec::new();
    let name = required_text(
        &mut errors,
        "name",
        "Race name",
        form.name.as_deref(),
        MAX_RACE_NAME_LEN,
    );
    let category_id = required_ref(&mut errors, "category", "Category", form.category.as_deref());
    let description = optional_text(
        &mut errors,
        "description",
        "Description",
        form.description.as_deref(),
        MAX_DESCRIPTION_LEN,
    );
    let image_url = optional_text(
        &mut errors,
        "image_url",
        "Image URL",
        form.image_url.as_deref(),
        MAX_IMAGE_URL_LEN,
    );
    match (errors.is_empty(), category_id) {
        (true, Some(category_id)) => Ok(RaceDraft {
            name,
            category_id,
            description,
            image_url,
        }),
        _ => Err(errors),
    }
}

/* --------------------------------------------------------------------------
   Modality
   -------------------------------------------------------------------------- */

/// Raw modality form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModalityForm {
    pub race: Option<String>,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub distance: Option<String>,
    pub elevation: Option<String>,
    pub track: Option<String>,
}

impl ModalityForm {
    /// The form as re-rendered after a failed submission.
    pub fn sanitized(&self) -> Self {
        Self {
            race: self.race.as_deref().map(|v| v.trim().to_string()),
            start_location: self.start_location.as_deref().map(|v| v.trim().to_string()),
            end_location: self.end_location.as_deref().map(|v| v.trim().to_string()),
            distance: self.distance.as_deref().map(|v| v.trim().to_string()),
            elevation: self.elevation.as_deref().map(|v| v.trim().to_string()),
            track: self.track.as_deref().map(|v| v.trim().to_string()),
        }
    }
}

/// Validated modality draft.
#[derive(Debug, Clone, Serialize)]
pub struct ModalityDraft {
    pub race_id: DbId,
    pub start_location_id: DbId,
    pub end_location_id: DbId,
    pub distance: f64,
    pub elevation: f64,
    pub track: String,
}

pub fn validate_modality(form: &ModalityForm) -> Result<ModalityDraft, Vec<FieldError>> {
    let mut errors = Vec::new();
    let race_id = required_ref(&mut errors, "race", "Race", form.race.as_deref());
    let start_location_id = required_ref(
        &mut errors,
        "start_location",
        "Start location",
        form.start_location.as_deref(),
    );
    let end_location_id = required_ref(
        &mut errors,
        "end_location",
        "End location",
        form.end_location.as_deref(),
    );
    let distance = required_number(&mut errors, "distance", "Distance", form.distance.as_deref());
    let elevation = required_number(
        &mut errors,
        "elevation",
        "Elevation",
        form.elevation.as_deref(),
    );
    let track = required_text(
        &mut errors,
        "track",
        "Track",
        form.track.as_deref(),
        MAX_TRACK_LEN,
    );
    match (
        errors.is_empty(),
        race_id,
        start_location_id,
        end_location_id,
        distance,
        elevation,
    ) {
        (true, Some(race_id), Some(start_location_id), Some(end_location_id), Some(distance), Some(elevation)) => {
            Ok(ModalityDraft {
                race_id,
                start_location_id,
                end_location_id,
                distance,
                elevation,
                track,
            })
        }
        _ => Err(errors),
    }
}

/* --------------------------------------------------------------------------
   Instance
   -------------------------------------------------------------------------- */

/// Raw instance form body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceForm {
    pub modality: Option<String>,
    pub date: Option<String>,
    pub price: Option<String>,
}

impl InstanceForm {
    /// The form as re-rendered after a failed submission.
    pub fn sanitized(&self) -> Self {
        Self {
            modality: self.modality.as_deref().map(|v| v.trim().to_string()),
            date: self.date.as_deref().map(|v| v.trim().to_string()),
            price: self.price.as_deref().map(|v| v.trim().to_string()),
        }
    }
}

/// Validated instance draft.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceDraft {
    pub modality_id: DbId,
    pub date: Timestamp,
    pub price: f64,
}

pub fn validate_instance(form: &InstanceForm) -> Result<InstanceDraft, Vec<FieldError>> {
    let mut errors = Vec::new();
    let modality_id = required_ref(&mut errors, "modality", "Modality", form.modality.as_deref());
    let date = required_date(&mut errors, "date", "Date", form.date.as_deref());
    let price = required_price(&mut errors, "price", "Price", form.price.as_deref());
    match (errors.is_empty(), modality_id, date, price) {
        (true, Some(modality_id), Some(date), Some(price)) => Ok(InstanceDraft {
            modality_id,
            date,
            price,
        }),
        _ => Err(errors),
    }
}
