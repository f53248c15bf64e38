//! Catalog domain types shared by both storage backends.
//!
//! Identifiers are opaque strings: remote rows carry numeric keys rendered as
//! text, local records carry random UUIDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ServiceError;

pub type RecordId = String;

/// Free-form note attached to a service: plain text or arbitrary JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Text(String),
    Structured(serde_json::Value),
}

impl Annotation {
    /// Interpret a textarea value. JSON objects and arrays are kept structured,
    /// anything else is stored as text. Blank input means no annotation.
    pub fn from_form(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(v @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => Some(Self::Structured(v)),
            _ => Some(Self::Text(raw.to_string())),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Structured(v) => v.clone(),
        }
    }

    pub fn from_json(v: serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Self::Text(s)),
            other => Some(Self::Structured(other)),
        }
    }

    /// Text shown back in the edit form.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Structured(v) => serde_json::to_string_pretty(v).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Cover image; always equals `images[0]` when `images` is non-empty.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub execution_time_minutes: Option<u32>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub annotation: Option<Annotation>,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn cover(&self) -> Option<&str> {
        self.images.first().map(String::as_str).or(self.image_url.as_deref())
    }

    /// Merge a partial update. Absent fields keep their value; the cover is
    /// re-derived from the new image list, or from the previous one.
    pub fn apply_patch(&mut self, patch: ServicePatch) -> Result<(), ServiceError> {
        if let Some(name) = patch.name {
            self.name = require_name(&name)?;
        }
        if let Some(description) = patch.description {
            self.description = description.and_then(non_blank);
        }
        if let Some(minutes) = patch.execution_time_minutes {
            self.execution_time_minutes = minutes;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
        if let Some(annotation) = patch.annotation {
            self.annotation = annotation;
        }
        let images = match patch.images {
            Some(images) => images,
            None if !self.images.is_empty() => std::mem::take(&mut self.images),
            None => self.image_url.iter().cloned().collect(),
        };
        self.image_url = images.first().cloned();
        self.images = images;
        Ok(())
    }
}

/// Creation payload for a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Single-image shorthand used when `images` is absent.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub execution_time_minutes: Option<u32>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub annotation: Option<Annotation>,
}

impl ServiceInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_name(&self.name).map(|_| ())
    }

    pub fn resolved_images(&self) -> Vec<String> {
        match &self.images {
            Some(images) => images.clone(),
            None => self.image_url.iter().cloned().collect(),
        }
    }

    /// Build the stored record once the backend has chosen id and timestamp.
    pub fn into_service(self, id: RecordId, created_at: DateTime<Utc>) -> Result<Service, ServiceError> {
        let name = require_name(&self.name)?;
        let images = self.resolved_images();
        Ok(Service {
            id,
            name,
            description: self.description.and_then(non_blank),
            image_url: images.first().cloned(),
            images,
            execution_time_minutes: self.execution_time_minutes,
            cost: self.cost,
            is_public: self.is_public,
            annotation: self.annotation,
            created_at,
        })
    }
}

/// Partial update for a service. Nullable fields use a double `Option`:
/// absent keeps the value, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub execution_time_minutes: Option<Option<u32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub cost: Option<Option<f64>>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub annotation: Option<Option<Annotation>>,
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Reduced view of a service shown to visitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicService {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Service> for PublicService {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            description: s.description.clone(),
            images: s.images.clone(),
            image_url: s.image_url.clone(),
            created_at: s.created_at,
        }
    }
}

impl PublicService {
    pub fn cover(&self) -> Option<&str> {
        self.images.first().map(String::as_str).or(self.image_url.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Low,
    InStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Estoque Baixo",
            Self::InStock => "Em Estoque",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub min_quantity: i64,
    #[serde(default)]
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Tool {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }

    pub fn status(&self) -> StockStatus {
        if self.is_low_stock() { StockStatus::Low } else { StockStatus::InStock }
    }
}

/// Create/update payload for a tool. Quantities accept numbers, numeric
/// strings or anything else (read as zero).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub min_quantity: i64,
    #[serde(default)]
    pub location: Option<String>,
}

impl ToolInput {
    /// Trim text fields and check the name. Blank optionals become `None`.
    pub fn normalized(self) -> Result<Self, ServiceError> {
        Ok(Self {
            name: require_name(&self.name)?,
            description: self.description.and_then(non_blank),
            quantity: self.quantity.max(0),
            min_quantity: self.min_quantity.max(0),
            location: self.location.and_then(non_blank),
        })
    }

    pub fn into_tool(self, id: RecordId, updated_at: DateTime<Utc>) -> Result<Tool, ServiceError> {
        let input = self.normalized()?;
        Ok(Tool {
            id,
            name: input.name,
            description: input.description,
            quantity: input.quantity,
            min_quantity: input.min_quantity,
            location: input.location,
            updated_at,
        })
    }
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(coerce_quantity).unwrap_or(0))
}

/// Coerce a loosely-typed quantity to a non-negative integer; defaults to zero.
pub fn coerce_quantity(v: &serde_json::Value) -> i64 {
    match v {
        serde_json::Value::Number(n) => n.as_f64().map(clamp_quantity).unwrap_or(0),
        serde_json::Value::String(s) => parse_quantity(s),
        _ => 0,
    }
}

pub fn parse_quantity(s: &str) -> i64 {
    s.trim().parse::<f64>().map(clamp_quantity).unwrap_or(0)
}

fn clamp_quantity(f: f64) -> i64 {
    if !f.is_finite() || f <= 0.0 {
        return 0;
    }
    f.round() as i64
}

pub(crate) fn require_name(name: &str) -> Result<String, ServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation("name is required".into()));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service_with_images(images: &[&str]) -> Service {
        ServiceInput {
            name: "Instalação".into(),
            images: Some(images.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
        .into_service("1".into(), Utc::now())
        .unwrap()
    }

    #[test]
    fn cover_is_first_image() {
        let s = service_with_images(&["a.png", "b.png"]);
        assert_eq!(s.image_url.as_deref(), Some("a.png"));
        assert_eq!(s.cover(), Some("a.png"));
    }

    #[test]
    fn legacy_image_url_becomes_single_image() {
        let s = ServiceInput { name: "X".into(), image_url: Some("c.png".into()), ..Default::default() }
            .into_service("1".into(), Utc::now())
            .unwrap();
        assert_eq!(s.images, vec!["c.png".to_string()]);
        assert_eq!(s.image_url.as_deref(), Some("c.png"));
    }

    #[test]
    fn patch_keeps_absent_fields_and_rederives_cover() {
        let mut s = service_with_images(&["a.png", "b.png"]);
        s.description = Some("desc".into());
        s.apply_patch(ServicePatch { images: Some(vec!["z.png".into()]), ..Default::default() }).unwrap();
        assert_eq!(s.images, vec!["z.png".to_string()]);
        assert_eq!(s.image_url.as_deref(), Some("z.png"));
        assert_eq!(s.description.as_deref(), Some("desc"));
        assert_eq!(s.name, "Instalação");

        s.apply_patch(ServicePatch { is_public: Some(true), ..Default::default() }).unwrap();
        assert_eq!(s.images, vec!["z.png".to_string()]);
        assert_eq!(s.image_url.as_deref(), Some("z.png"));
        assert!(s.is_public);
    }

    #[test]
    fn patch_clearing_images_clears_cover() {
        let mut s = service_with_images(&["a.png"]);
        s.apply_patch(ServicePatch { images: Some(vec![]), ..Default::default() }).unwrap();
        assert!(s.images.is_empty());
        assert!(s.image_url.is_none());
    }

    #[test]
    fn patch_rejects_blank_name() {
        let mut s = service_with_images(&[]);
        let err = s.apply_patch(ServicePatch { name: Some("   ".into()), ..Default::default() });
        assert!(matches!(err, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn patch_description_is_trimmed_or_cleared() {
        let mut s = service_with_images(&[]);
        s.apply_patch(ServicePatch { description: Some(Some("  Troca de fiação ".into())), ..Default::default() }).unwrap();
        assert_eq!(s.description.as_deref(), Some("Troca de fiação"));
        s.apply_patch(ServicePatch { description: Some(Some("   ".into())), ..Default::default() }).unwrap();
        assert_eq!(s.description, None);
        s.description = Some("kept".into());
        s.apply_patch(ServicePatch { description: Some(None), ..Default::default() }).unwrap();
        assert_eq!(s.description, None);
    }

    #[test]
    fn patch_null_clears_nullable_fields() {
        let mut s = service_with_images(&[]);
        s.cost = Some(10.0);
        let patch: ServicePatch = serde_json::from_value(json!({"cost": null})).unwrap();
        s.apply_patch(patch).unwrap();
        assert_eq!(s.cost, None);
    }

    #[test]
    fn annotation_from_form() {
        assert_eq!(Annotation::from_form("  "), None);
        assert_eq!(Annotation::from_form("levar escada"), Some(Annotation::Text("levar escada".into())));
        assert_eq!(
            Annotation::from_form(r#"{"andar": 3}"#),
            Some(Annotation::Structured(json!({"andar": 3})))
        );
        assert_eq!(Annotation::from_form("42"), Some(Annotation::Text("42".into())));
    }

    #[test]
    fn low_stock_is_derived() {
        let mut t = ToolInput { name: "Drill".into(), quantity: 2, min_quantity: 5, ..Default::default() }
            .into_tool("t1".into(), Utc::now())
            .unwrap();
        assert!(t.is_low_stock());
        t.quantity = 5;
        assert_eq!(t.status(), StockStatus::Low);
        t.quantity = 6;
        assert_eq!(t.status(), StockStatus::InStock);
    }

    #[test]
    fn quantities_are_coerced() {
        let input: ToolInput = serde_json::from_value(json!({
            "name": "Serra",
            "quantity": "7",
            "min_quantity": "abc"
        }))
        .unwrap();
        assert_eq!(input.quantity, 7);
        assert_eq!(input.min_quantity, 0);

        let input: ToolInput = serde_json::from_value(json!({"name": "Serra", "quantity": 2.6, "min_quantity": null})).unwrap();
        assert_eq!(input.quantity, 3);
        assert_eq!(input.min_quantity, 0);

        assert_eq!(parse_quantity(" -4 "), 0);
        assert_eq!(coerce_quantity(&json!(true)), 0);
    }
}
