//! Generation profiles.
//!
//! A [`Profile`] bundles what differs between corpus variants: the value
//! pools noise documents draw from, the golden catalog, and whether the index
//! is wiped before loading. Everything else (schema, dates, batching) is
//! shared.
//!
//! | Profile | Golden catalog | Reset on start |
//! |---------|----------------|----------------|
//! | `classic` | the 24 benchmark records | no |
//! | `extended` | classic plus extra traps | yes |

use std::ops::RangeInclusive;

use crate::golden::Catalog;

/// Enumerated values noise documents are drawn from.
#[derive(Debug, Clone)]
pub struct ValuePools {
    pub doc_types: &'static [&'static str],
    pub fournisseurs: &'static [&'static str],
    pub statuts: &'static [&'static str],
    pub priorites: &'static [&'static str],
    pub projets: &'static [&'static str],
    pub lignes: RangeInclusive<u32>,
    pub montants: RangeInclusive<f64>,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub name: &'static str,
    pub description: &'static str,
    pub pools: ValuePools,
    pub catalog: Catalog,
    pub reset_on_start: bool,
}

pub const PROFILE_NAMES: &[&str] = &["classic", "extended"];

impl Profile {
    /// Look a profile up by name.
    pub fn by_name(name: &str) -> Option<Profile> {
        match name {
            "classic" => Some(Self::classic()),
            "extended" => Some(Self::extended()),
            _ => None,
        }
    }

    pub fn classic() -> Profile {
        Profile {
            name: "classic",
            description: "24 benchmark records over a small French business vocabulary",
            pools: ValuePools {
                doc_types: &[
                    "facture", "devis", "incident", "contrat", "rapport", "commande", "email",
                    "log",
                ],
                fournisseurs: &[
                    "Haribo",
                    "Lutti",
                    "Interne",
                    "Total",
                    "Orange",
                    "Microsoft",
                    "Google",
                    "SNCF",
                ],
                statuts: &[
                    "Validé",
                    "Clôturé",
                    "En cours",
                    "Impayée",
                    "Brouillon",
                    "Nouveau",
                ],
                priorites: &["Basse", "Moyenne", "Haute", "Critique"],
                projets: &["Alpha", "Beta", "Omega", "Phoenix", "Migration"],
                lignes: 1..=20,
                montants: 10.0..=10000.0,
            },
            catalog: Catalog::Classic,
            reset_on_start: false,
        }
    }

    pub fn extended() -> Profile {
        Profile {
            name: "extended",
            description: "classic records plus near-miss traps, wider pools, wipes the core first",
            pools: ValuePools {
                doc_types: &[
                    "facture", "devis", "incident", "contrat", "rapport", "commande", "email",
                    "log", "note", "audit", "bon_livraison", "avoir",
                ],
                fournisseurs: &[
                    "Haribo",
                    "Lutti",
                    "Interne",
                    "Total",
                    "Orange",
                    "Microsoft",
                    "Google",
                    "SNCF",
                    "EDF",
                    "AWS",
                    "Bureau Vallée",
                    "La Poste",
                    "Dassault Systèmes",
                    "Capgemini",
                ],
                statuts: &[
                    "Validé",
                    "Clôturé",
                    "En cours",
                    "Impayée",
                    "Payée",
                    "Brouillon",
                    "Nouveau",
                    "En attente",
                    "Annulé",
                    "Archivé",
                ],
                priorites: &["Basse", "Moyenne", "Haute", "Critique", "Bloquante"],
                projets: &[
                    "Alpha", "Beta", "Omega", "Phoenix", "Migration", "Atlas", "Hermès", "Orion",
                ],
                lignes: 1..=40,
                montants: 10.0..=25000.0,
            },
            catalog: Catalog::Extended,
            reset_on_start: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in PROFILE_NAMES {
            let profile = Profile::by_name(name).unwrap();
            assert_eq!(profile.name, *name);
        }
        assert!(Profile::by_name("v3").is_none());
    }

    #[test]
    fn extended_pools_contain_classic_pools() {
        let classic = Profile::classic().pools;
        let extended = Profile::extended().pools;
        for t in classic.doc_types {
            assert!(extended.doc_types.contains(t));
        }
        for s in classic.statuts {
            assert!(extended.statuts.contains(s));
        }
        for f in classic.fournisseurs {
            assert!(extended.fournisseurs.contains(f));
        }
    }

    #[test]
    fn only_extended_resets() {
        assert!(!Profile::classic().reset_on_start);
        assert!(Profile::extended().reset_on_start);
    }

    #[test]
    fn amount_pools_are_non_negative() {
        for name in PROFILE_NAMES {
            let pools = Profile::by_name(name).unwrap().pools;
            assert!(*pools.montants.start() >= 0.0);
            assert!(pools.montants.start() < pools.montants.end());
        }
    }
}
