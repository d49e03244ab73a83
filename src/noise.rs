//! Random background documents.
//!
//! Noise documents populate every field independently, from the profile's
//! value pools or from `fake`'s French generators, so benchmark queries have
//! to discriminate instead of returning the whole core. A noise document may
//! happen to match a golden predicate; that is tolerated.

use chrono::{DateTime, Utc};
use fake::faker::company::raw::CompanyName;
use fake::faker::lorem::raw::{Sentence, Word};
use fake::faker::name::raw::FirstName;
use fake::locales::FR_FR;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dates::{random_date, DateError, DateWindow};
use crate::models::Document;
use crate::profile::ValuePools;

/// Generate `count` noise documents.
pub fn generate_noise<R: Rng + ?Sized>(
    rng: &mut R,
    pools: &ValuePools,
    count: usize,
    window: &DateWindow,
    now: DateTime<Utc>,
) -> Result<Vec<Document>, DateError> {
    (0..count)
        .map(|_| noise_document(rng, pools, window, now))
        .collect()
}

fn noise_document<R: Rng + ?Sized>(
    rng: &mut R,
    pools: &ValuePools,
    window: &DateWindow,
    now: DateTime<Utc>,
) -> Result<Document, DateError> {
    let montant = round_cents(rng.gen_range(pools.montants.clone()));
    let ligne = rng.gen_range(pools.lignes.clone());

    let texte: String = Sentence(FR_FR, 10..11).fake_with_rng(rng);
    let sujet: String = Sentence(FR_FR, 5..6).fake_with_rng(rng);
    let prenom: String = FirstName(FR_FR).fake_with_rng(rng);
    let societe: String = CompanyName(FR_FR).fake_with_rng(rng);
    let mot: String = Word(FR_FR).fake_with_rng(rng);

    Ok(Document::new(pick(rng, pools.doc_types))
        .fournisseur(pick(rng, pools.fournisseurs))
        .montant(montant)
        .date_creation(random_date(rng, window, now)?)
        .date_modif(random_date(rng, window, now)?)
        .statut(pick(rng, pools.statuts))
        .texte_complet(texte)
        .sujet(sujet)
        .assigne_a(prenom)
        .projet(pick(rng, pools.projets))
        .ligne(ligne.to_string())
        .priorite(pick(rng, pools.priorites))
        .client(societe)
        .categorie(mot))
}

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
