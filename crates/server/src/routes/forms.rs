//! Form payloads posted by the admin pages.

use axum::extract::Multipart;
use serde::Deserialize;
use service::domain::{parse_quantity, Annotation, ServiceInput, ServicePatch, ToolInput};
use service::errors::ServiceError;
use service::images::UploadedImage;

use crate::views::services::ServiceFormValues;
use crate::views::tools::ToolFormValues;

pub const MISSING_SERVICE_NAME: &str = "Informe o nome do serviço.";
pub const MISSING_TOOL_NAME: &str = "Informe o nome da ferramenta.";

/// Multipart service form: text fields plus zero or more `images` files.
#[derive(Debug, Default)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub execution_time_minutes: String,
    pub cost: String,
    pub is_public: bool,
    pub annotation: String,
    pub uploads: Vec<UploadedImage>,
}

fn checkbox(value: &str) -> bool {
    matches!(value.trim(), "true" | "on" | "1")
}

fn optional<T: std::str::FromStr>(raw: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() { None } else { raw.parse().ok() }
}

/// Accepts `12.5` and `12,50`.
fn parse_cost(raw: &str) -> Option<f64> {
    optional::<f64>(&raw.replace(',', ".")).filter(|c| c.is_finite() && *c >= 0.0)
}

fn non_blank(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

impl ServiceForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ServiceError> {
        let mut form = ServiceForm::default();
        while let Some(field) = multipart.next_field().await.map_err(|e| ServiceError::Upload(e.to_string()))? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "images" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| ServiceError::Upload(e.to_string()))?;
                // an untouched file input still sends one empty part
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.uploads.push(UploadedImage { file_name, content_type, bytes: bytes.to_vec() });
                continue;
            }
            let value = field.text().await.map_err(|e| ServiceError::Upload(e.to_string()))?;
            match name.as_str() {
                "name" => form.name = value,
                "description" => form.description = value,
                "execution_time_minutes" => form.execution_time_minutes = value,
                "cost" => form.cost = value,
                "is_public" => form.is_public = checkbox(&value),
                "annotation" => form.annotation = value,
                _ => {}
            }
        }
        Ok(form)
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn values(&self, images: Vec<String>) -> ServiceFormValues {
        ServiceFormValues {
            name: self.name.clone(),
            description: self.description.clone(),
            execution_time_minutes: self.execution_time_minutes.clone(),
            cost: self.cost.clone(),
            is_public: self.is_public,
            annotation: self.annotation.clone(),
            images,
        }
    }

    pub fn to_input(&self) -> ServiceInput {
        ServiceInput {
            name: self.name.trim().to_string(),
            description: non_blank(&self.description),
            images: None,
            image_url: None,
            execution_time_minutes: optional(&self.execution_time_minutes),
            cost: parse_cost(&self.cost),
            is_public: self.is_public,
            annotation: Annotation::from_form(&self.annotation),
        }
    }

    /// The edit form always submits every field, so every field is set.
    /// Images are left alone here; new uploads replace them downstream.
    pub fn to_patch(&self) -> ServicePatch {
        ServicePatch {
            name: Some(self.name.trim().to_string()),
            description: Some(non_blank(&self.description)),
            images: None,
            execution_time_minutes: Some(optional(&self.execution_time_minutes)),
            cost: Some(parse_cost(&self.cost)),
            is_public: Some(self.is_public),
            annotation: Some(Annotation::from_form(&self.annotation)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub min_quantity: String,
    #[serde(default)]
    pub location: String,
}

impl ToolForm {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn to_input(&self) -> ToolInput {
        ToolInput {
            name: self.name.trim().to_string(),
            description: non_blank(&self.description),
            quantity: parse_quantity(&self.quantity),
            min_quantity: parse_quantity(&self.min_quantity),
            location: non_blank(&self.location),
        }
    }

    pub fn values(&self) -> ToolFormValues {
        ToolFormValues {
            name: self.name.clone(),
            description: self.description.clone(),
            quantity: self.quantity.clone(),
            min_quantity: self.min_quantity.clone(),
            location: self.location.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VisibilityForm {
    #[serde(default)]
    pub public: String,
}

impl VisibilityForm {
    pub fn make_public(&self) -> bool {
        checkbox(&self.public)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_fields_are_coerced() {
        let form = ServiceForm {
            name: "  Corte a laser ".into(),
            description: "   ".into(),
            execution_time_minutes: "45".into(),
            cost: "12,50".into(),
            is_public: true,
            annotation: r#"{"turno": "manhã"}"#.into(),
            uploads: Vec::new(),
        };
        let input = form.to_input();
        assert_eq!(input.name, "Corte a laser");
        assert_eq!(input.description, None);
        assert_eq!(input.execution_time_minutes, Some(45));
        assert_eq!(input.cost, Some(12.5));
        assert!(matches!(input.annotation, Some(Annotation::Structured(_))));

        let patch = form.to_patch();
        assert_eq!(patch.description, Some(None));
        assert!(patch.images.is_none());
    }

    #[test]
    fn bad_numbers_become_empty() {
        let form = ServiceForm { name: "x".into(), execution_time_minutes: "abc".into(), cost: "-3".into(), ..Default::default() };
        let input = form.to_input();
        assert_eq!(input.execution_time_minutes, None);
        assert_eq!(input.cost, None);
    }

    #[test]
    fn tool_quantities_are_lenient() {
        let form = ToolForm { name: "Drill".into(), quantity: "2.6".into(), min_quantity: "".into(), location: " Shelf A ".into(), ..Default::default() };
        let input = form.to_input();
        assert_eq!(input.quantity, 3);
        assert_eq!(input.min_quantity, 0);
        assert_eq!(input.location.as_deref(), Some("Shelf A"));
    }

    #[test]
    fn checkbox_values() {
        assert!(VisibilityForm { public: "true".into() }.make_public());
        assert!(!VisibilityForm { public: "false".into() }.make_public());
        assert!(!VisibilityForm { public: String::new() }.make_public());
    }
}
