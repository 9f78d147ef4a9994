// file: src/search/schema.rs
// description: fixed index schema for csv documents and create-if-absent provisioning
// reference: https://learn.microsoft.com/rest/api/searchservice/indexes/create

use crate::error::Result;
use crate::search::SearchService;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const SEMANTIC_CONFIGURATION: &str = "default";
pub const CONTENT_ANALYZER: &str = "en.microsoft";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDefinition {
    pub name: String,
    pub fields: Vec<IndexField>,
    pub semantic: SemanticSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub key: bool,
    pub retrievable: bool,
    pub searchable: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub facetable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSettings {
    pub configurations: Vec<SemanticConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticConfiguration {
    pub name: String,
    pub prioritized_fields: PrioritizedFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_field: Option<SemanticField>,
    pub prioritized_content_fields: Vec<SemanticField>,
    #[serde(default)]
    pub prioritized_keywords_fields: Vec<SemanticField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticField {
    pub field_name: String,
}

impl IndexField {
    /// Retrievable string field with every other attribute off.
    fn simple(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "Edm.String".to_string(),
            key: false,
            retrievable: true,
            searchable: false,
            filterable: false,
            sortable: false,
            facetable: false,
            analyzer: None,
        }
    }

    fn key(name: &str) -> Self {
        Self {
            key: true,
            ..Self::simple(name)
        }
    }

    fn searchable(name: &str, analyzer: &str) -> Self {
        Self {
            searchable: true,
            analyzer: Some(analyzer.to_string()),
            ..Self::simple(name)
        }
    }

    fn facet(name: &str) -> Self {
        Self {
            filterable: true,
            facetable: true,
            ..Self::simple(name)
        }
    }
}

impl IndexDefinition {
    /// The five-field layout every csv document is written into.
    pub fn csv_documents(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: vec![
                IndexField::key("id"),
                IndexField::searchable("content", CONTENT_ANALYZER),
                IndexField::facet("category"),
                IndexField::facet("sourcepage"),
                IndexField::facet("sourcefile"),
            ],
            semantic: SemanticSettings {
                configurations: vec![SemanticConfiguration {
                    name: SEMANTIC_CONFIGURATION.to_string(),
                    prioritized_fields: PrioritizedFields {
                        title_field: None,
                        prioritized_content_fields: vec![SemanticField {
                            field_name: "content".to_string(),
                        }],
                        prioritized_keywords_fields: Vec::new(),
                    },
                }],
            },
        }
    }

    pub fn field(&self, name: &str) -> Option<&IndexField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyExists,
}

pub struct IndexProvisioner<'a, S: SearchService + ?Sized> {
    service: &'a S,
}

impl<'a, S: SearchService + ?Sized> IndexProvisioner<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    pub async fn ensure_index(&self, name: &str) -> Result<ProvisionOutcome> {
        debug!("Ensuring search index {} exists...", name);

        let existing = self.service.list_index_names().await?;
        if existing.iter().any(|index| index == name) {
            debug!("\tSearch index {} already exists", name);
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        debug!("\tCreating {} search index", name);
        self.service
            .create_index(&IndexDefinition::csv_documents(name))
            .await?;

        Ok(ProvisionOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSearchService;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_generation() {
        let definition = IndexDefinition::csv_documents("csv-index");
        assert_eq!(definition.fields.len(), 5);

        let id = definition.field("id").unwrap();
        assert!(id.key);
        assert!(!id.searchable);

        let content = definition.field("content").unwrap();
        assert!(content.searchable);
        assert_eq!(content.analyzer.as_deref(), Some("en.microsoft"));

        for name in ["category", "sourcepage", "sourcefile"] {
            let field = definition.field(name).unwrap();
            assert!(field.filterable && field.facetable, "{name}");
            assert!(!field.searchable, "{name}");
        }
    }

    #[test]
    fn test_schema_wire_format() {
        let json = serde_json::to_value(IndexDefinition::csv_documents("csv-index")).unwrap();

        assert_eq!(json["fields"][0]["type"], "Edm.String");
        assert!(json["fields"][0].get("analyzer").is_none());
        assert_eq!(
            json["semantic"],
            serde_json::json!({
                "configurations": [{
                    "name": "default",
                    "prioritizedFields": {
                        "prioritizedContentFields": [{ "fieldName": "content" }],
                        "prioritizedKeywordsFields": []
                    }
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_ensure_index_creates_when_absent() {
        let service = FakeSearchService::default();
        let provisioner = IndexProvisioner::new(&service);

        let outcome = provisioner.ensure_index("csv-index").await.unwrap();

        assert_eq!(outcome, ProvisionOutcome::Created);
        assert_eq!(service.index_names(), vec!["csv-index".to_string()]);
    }

    #[tokio::test]
    async fn test_ensure_index_is_noop_when_present() {
        let service = FakeSearchService::with_index("csv-index");
        let provisioner = IndexProvisioner::new(&service);

        let outcome = provisioner.ensure_index("csv-index").await.unwrap();

        assert_eq!(outcome, ProvisionOutcome::AlreadyExists);
        assert_eq!(service.calls(), vec!["list_index_names".to_string()]);
    }
}
