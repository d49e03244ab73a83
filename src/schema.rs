//! Schema provisioning.
//!
//! Declares every field the generators write before any document is sent.
//! Each field gets exactly one `add-field` request. Solr rejects a field that
//! already exists with a 4xx, which is the normal outcome on every run after
//! the first, so provisioning never fails the run.

use serde::Serialize;
use tracing::{debug, warn};

use crate::index::{IndexError, SearchIndex};

/// Solr field types used by the document schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "pfloat")]
    PFloat,
    #[serde(rename = "pdate")]
    PDate,
    #[serde(rename = "text_general")]
    TextGeneral,
}

/// Body of an `add-field` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub stored: bool,
}

const fn field(name: &'static str, field_type: FieldType) -> FieldDef {
    FieldDef {
        name,
        field_type,
        stored: true,
    }
}

/// Every field a [`crate::models::Document`] can carry.
pub const SCHEMA_FIELDS: &[FieldDef] = &[
    field("doc_type", FieldType::String),
    field("fournisseur", FieldType::String),
    field("client", FieldType::String),
    field("assigne_a", FieldType::String),
    field("statut", FieldType::String),
    field("projet", FieldType::String),
    field("priorite", FieldType::String),
    field("categorie", FieldType::String),
    field("sujet", FieldType::TextGeneral),
    field("ligne", FieldType::String),
    field("montant", FieldType::PFloat),
    field("date_creation", FieldType::PDate),
    field("date_modif", FieldType::PDate),
    field("texte_complet", FieldType::TextGeneral),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Added,
    AlreadyExists,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct SchemaReport {
    pub fields: Vec<(&'static str, FieldOutcome)>,
}

impl SchemaReport {
    pub fn added(&self) -> usize {
        self.count(|o| *o == FieldOutcome::Added)
    }

    pub fn existing(&self) -> usize {
        self.count(|o| *o == FieldOutcome::AlreadyExists)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FieldOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FieldOutcome) -> bool) -> usize {
        self.fields.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Declare `fields` on the index, one request each.
pub async fn provision_schema(index: &dyn SearchIndex, fields: &[FieldDef]) -> SchemaReport {
    let mut report = SchemaReport::default();

    for def in fields {
        let outcome = match index.add_field(def).await {
            Ok(()) => {
                debug!(field = def.name, "field added");
                FieldOutcome::Added
            }
            Err(e) if is_already_defined(&e) => {
                debug!(field = def.name, "field already defined");
                FieldOutcome::AlreadyExists
            }
            Err(e) => {
                warn!(field = def.name, error = %e, "could not add field");
                FieldOutcome::Failed(e.to_string())
            }
        };
        report.fields.push((def.name, outcome));
    }

    report
}

fn is_already_defined(err: &IndexError) -> bool {
    err.is_client_error()
        && err
            .body()
            .is_some_and(|body| body.to_lowercase().contains("already exists"))
}
