//! Template catalog entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Properties that carry template bodies rather than metadata.
const BODY_FIELDS: &[&str] = &["content", "helpers"];

/// A template known to the reporting service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortid: Option<String>,
    /// Whether the template has a body. Only set by single-template lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_content: Option<bool>,
    /// Remaining scalar properties reported by the service.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl TemplateDescriptor {
    /// Build a descriptor from a raw template entity.
    ///
    /// Returns `None` for entries without a name.
    pub fn from_entity(entity: Map<String, Value>) -> Option<Self> {
        let mut descriptor = Self {
            name: String::new(),
            engine: None,
            recipe: None,
            shortid: None,
            has_content: None,
            metadata: Map::new(),
        };

        for (key, value) in entity {
            if BODY_FIELDS.contains(&key.as_str()) || key.starts_with('@') {
                continue;
            }
            match value {
                Value::String(s) if key == "name" => descriptor.name = s,
                Value::String(s) if key == "engine" => descriptor.engine = Some(s),
                Value::String(s) if key == "recipe" => descriptor.recipe = Some(s),
                Value::String(s) if key == "shortid" => descriptor.shortid = Some(s),
                Value::Object(_) | Value::Array(_) => {}
                scalar => {
                    descriptor.metadata.insert(key, scalar);
                }
            }
        }

        (!descriptor.name.is_empty()).then_some(descriptor)
    }

    /// Same as [`from_entity`](Self::from_entity), also recording whether
    /// the template has a body.
    pub fn from_entity_with_content(entity: Map<String, Value>) -> Option<Self> {
        let has_content = entity
            .get("content")
            .and_then(Value::as_str)
            .is_some_and(|c| !c.is_empty());
        let mut descriptor = Self::from_entity(entity)?;
        descriptor.has_content = Some(has_content);
        Some(descriptor)
    }
}

/// Template listing as returned by either catalog dialect.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TemplateListing {
    /// OData envelope: `{"value": [...]}`.
    Envelope { value: Vec<Map<String, Value>> },
    /// Bare JSON array.
    Bare(Vec<Map<String, Value>>),
}

impl TemplateListing {
    pub(crate) fn into_entities(self) -> Vec<Map<String, Value>> {
        match self {
            Self::Envelope { value } => value,
            Self::Bare(entities) => entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entity(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn picks_known_fields_and_scalar_metadata() {
        let e = entity(json!({
            "name": "data-report",
            "engine": "handlebars",
            "recipe": "chrome-pdf",
            "shortid": "sFEip1K",
            "content": "<h1>{{reportTitle}}</h1>",
            "creationDate": "2026-01-01T00:00:00Z",
            "chrome": {"landscape": true},
            "@odata.etag": "W/1"
        }));
        let d = TemplateDescriptor::from_entity(e).unwrap();
        assert_eq!(d.name, "data-report");
        assert_eq!(d.engine.as_deref(), Some("handlebars"));
        assert_eq!(d.recipe.as_deref(), Some("chrome-pdf"));
        assert_eq!(d.shortid.as_deref(), Some("sFEip1K"));
        assert_eq!(d.has_content, None);
        assert_eq!(d.metadata.len(), 1);
        assert_eq!(d.metadata["creationDate"], "2026-01-01T00:00:00Z");
    }

    #[test]
    fn nameless_entity_is_skipped() {
        assert!(TemplateDescriptor::from_entity(entity(json!({"engine": "none"}))).is_none());
    }

    #[test]
    fn content_flag() {
        let d = TemplateDescriptor::from_entity_with_content(entity(json!({
            "name": "empty",
            "content": ""
        })))
        .unwrap();
        assert_eq!(d.has_content, Some(false));
    }

    #[test]
    fn parses_both_listing_shapes() {
        let odata: TemplateListing =
            serde_json::from_value(json!({"value": [{"name": "a"}, {"name": "b"}]})).unwrap();
        assert_eq!(odata.into_entities().len(), 2);

        let bare: TemplateListing = serde_json::from_value(json!([{"name": "a"}])).unwrap();
        assert_eq!(bare.into_entities().len(), 1);
    }
}
