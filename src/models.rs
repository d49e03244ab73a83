//! Core data models sent to the index.
//!
//! A [`Document`] is a flat map of the fields declared in
//! [`crate::schema::SCHEMA_FIELDS`]. Only `doc_type` is mandatory; every other
//! field is optional and omitted from the JSON when unset, so Solr never sees
//! a `null`.

use serde::Serialize;
use thiserror::Error;

use crate::dates::SolrDate;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("doc_type is empty")]
    MissingDocType,

    #[error("montant must be a finite non-negative number, got {0}")]
    InvalidAmount(f64),
}

/// One document as posted to the update endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub doc_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fournisseur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigne_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sujet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ligne: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub montant: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<SolrDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modif: Option<SolrDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texte_complet: Option<String>,
}

impl Document {
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
            fournisseur: None,
            client: None,
            assigne_a: None,
            statut: None,
            projet: None,
            priorite: None,
            categorie: None,
            sujet: None,
            ligne: None,
            montant: None,
            date_creation: None,
            date_modif: None,
            texte_complet: None,
        }
    }

    pub fn fournisseur(mut self, value: impl Into<String>) -> Self {
        self.fournisseur = Some(value.into());
        self
    }

    pub fn client(mut self, value: impl Into<String>) -> Self {
        self.client = Some(value.into());
        self
    }

    pub fn assigne_a(mut self, value: impl Into<String>) -> Self {
        self.assigne_a = Some(value.into());
        self
    }

    pub fn statut(mut self, value: impl Into<String>) -> Self {
        self.statut = Some(value.into());
        self
    }

    pub fn projet(mut self, value: impl Into<String>) -> Self {
        self.projet = Some(value.into());
        self
    }

    pub fn priorite(mut self, value: impl Into<String>) -> Self {
        self.priorite = Some(value.into());
        self
    }

    pub fn categorie(mut self, value: impl Into<String>) -> Self {
        self.categorie = Some(value.into());
        self
    }

    pub fn sujet(mut self, value: impl Into<String>) -> Self {
        self.sujet = Some(value.into());
        self
    }

    pub fn ligne(mut self, value: impl Into<String>) -> Self {
        self.ligne = Some(value.into());
        self
    }

    pub fn montant(mut self, value: f64) -> Self {
        self.montant = Some(value);
        self
    }

    pub fn date_creation(mut self, value: SolrDate) -> Self {
        self.date_creation = Some(value);
        self
    }

    pub fn date_modif(mut self, value: SolrDate) -> Self {
        self.date_modif = Some(value);
        self
    }

    pub fn texte_complet(mut self, value: impl Into<String>) -> Self {
        self.texte_complet = Some(value.into());
        self
    }

    /// Check the invariants every document must hold before it is sent.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.doc_type.trim().is_empty() {
            return Err(DocumentError::MissingDocType);
        }
        if let Some(amount) = self.montant {
            if !amount.is_finite() || amount < 0.0 {
                return Err(DocumentError::InvalidAmount(amount));
            }
        }
        Ok(())
    }
}
