//! Golden records: the documents benchmark queries are expected to find.
//!
//! Each [`GoldenRecord`] is built so that its fields satisfy one benchmark
//! question (labelled `Q1`..`Q27`). Where a broader query could match two
//! records, one of them is a trap: it shares some predicate fields with the
//! answer but not all, so a query that forgets a clause returns it and fails.
//!
//! The shape of the catalog is fixed. Dates outside the predicates are drawn
//! at random so the corpus does not go stale, but every field a query filters
//! on is a literal.

use chrono::{DateTime, Datelike, Utc};
use rand::Rng;

use crate::dates::{random_date, recent_date, relative_to_now, DateError, DateWindow, SolrDate};
use crate::models::Document;

#[derive(Debug, Clone, PartialEq)]
pub struct GoldenRecord {
    /// Benchmark question this record answers (or traps).
    pub query: &'static str,
    pub description: &'static str,
    /// Near-miss that a correct query must exclude.
    pub trap: bool,
    pub document: Document,
}

/// Which golden catalog a profile loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Classic,
    Extended,
}

impl Catalog {
    /// Build the catalog in its fixed order.
    ///
    /// Fails only when `start_year` leaves no room before `now`.
    pub fn records<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
        start_year: i32,
    ) -> Result<Vec<GoldenRecord>, DateError> {
        let mut records = classic(rng, now, start_year)?;
        if *self == Catalog::Extended {
            records.extend(extended_traps(rng, now, start_year)?);
        }
        Ok(records)
    }
}

pub fn documents(records: &[GoldenRecord]) -> Vec<Document> {
    records.iter().map(|r| r.document.clone()).collect()
}

fn answer(query: &'static str, description: &'static str, document: Document) -> GoldenRecord {
    GoldenRecord {
        query,
        description,
        trap: false,
        document,
    }
}

fn trap(query: &'static str, description: &'static str, document: Document) -> GoldenRecord {
    GoldenRecord {
        query,
        description,
        trap: true,
        document,
    }
}

fn classic<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    start_year: i32,
) -> Result<Vec<GoldenRecord>, DateError> {
    let window = DateWindow::Since { year: start_year };

    Ok(vec![
        answer(
            "Q1",
            "Haribo invoice over 1000",
            Document::new("facture")
                .fournisseur("Haribo")
                .montant(1200.0)
                .statut("Payée")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q13",
            "Lutti invoice still in progress",
            Document::new("facture")
                .fournisseur("Lutti")
                .montant(800.0)
                .statut("En cours")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q2",
            "standard contract",
            Document::new("Contrat")
                .montant(45000.0)
                .texte_complet("Contrat standard")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q23",
            "large contract signed last year",
            Document::new("Contrat")
                .montant(60000.0)
                .texte_complet("Contrat cadre global")
                .date_creation(relative_to_now(now, -360)),
        ),
        answer(
            "Q3",
            "incident assigned to Martin",
            Document::new("incident")
                .assigne_a("Martin")
                .priorite("Moyenne")
                .sujet("Panne réseau")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q4",
            "oldest validated quote",
            Document::new("devis")
                .statut("Validé")
                .date_creation(SolrDate::at(2023, 1, 1, 10, 0, 0)?),
        ),
        answer(
            "Q21",
            "newest validated quote",
            Document::new("devis")
                .statut("Validé")
                .date_creation(SolrDate::at(2023, 6, 1, 10, 0, 0)?),
        ),
        answer(
            "Q5",
            "project Alpha report",
            Document::new("rapport")
                .projet("Alpha")
                .texte_complet("Avancement Q1")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q6",
            "expensive EDF invoice",
            Document::new("facture")
                .montant(1600.0)
                .fournisseur("EDF")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q18",
            "most expensive invoice",
            Document::new("facture")
                .montant(5000.0)
                .fournisseur("AWS")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q7",
            "invoice from last month",
            Document::new("facture")
                .montant(300.0)
                .date_creation(relative_to_now(now, -20)),
        ),
        answer(
            "Q8",
            "order inside an amount range",
            Document::new("commande")
                .montant(350.0)
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q9",
            "incident created before 2024",
            Document::new("incident")
                .sujet("Vieux bug")
                .date_creation(SolrDate::at(2023, 12, 31, 23, 59, 59)?),
        ),
        answer(
            "Q10",
            "maintenance report modified in the last days",
            Document::new("rapport")
                .date_modif(recent_date(rng, 3, now))
                .texte_complet("Maintenance serveur hebdomadaire"),
        ),
        answer(
            "Q11",
            "invoice under 100",
            Document::new("facture")
                .montant(50.50)
                .fournisseur("Bureau Vallée")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q12",
            "open incident on line 12",
            Document::new("incident")
                .sujet("Incident")
                .ligne("12")
                .statut("En cours")
                .date_creation(random_date(rng, &window, now)?),
        ),
        trap(
            "Q12",
            "closed incident on line 12",
            Document::new("incident")
                .sujet("Incident")
                .ligne("12")
                .statut("Clôturé")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q14",
            "urgent message that is not an invoice",
            Document::new("email")
                .texte_complet("C'est très Urgent merci")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q15",
            "high priority incident on line 14",
            Document::new("incident")
                .ligne("14")
                .priorite("Critique")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q16",
            "internal note excluded by supplier filter",
            Document::new("note")
                .fournisseur("Interne")
                .texte_complet("Note de service")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q17",
            "maintenance report about a leak",
            Document::new("rapport")
                .categorie("maintenance")
                .texte_complet("Détection d'une fuite d'eau")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q20",
            "exact phrase in a log",
            Document::new("log")
                .texte_complet("Attention erreur système critique détectée au démarrage")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q22",
            "recent security audit",
            Document::new("audit")
                .texte_complet("Analyse des problèmes de sécurité")
                .date_creation(recent_date(rng, 15, now)),
        ),
        answer(
            "Q24",
            "unpaid invoice for client X",
            Document::new("facture")
                .statut("Impayée")
                .client("X")
                .montant(2000.0)
                .date_creation(random_date(rng, &window, now)?),
        ),
    ])
}

fn extended_traps<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    start_year: i32,
) -> Result<Vec<GoldenRecord>, DateError> {
    let window = DateWindow::Since { year: start_year };
    let this_month = DateWindow::Month {
        year: now.year(),
        month: now.month(),
    };
    // Early on the 1st there may be no room left in the month.
    let in_this_month =
        random_date(rng, &this_month, now).unwrap_or_else(|_| SolrDate::from(now));

    Ok(vec![
        trap(
            "Q1",
            "Haribo invoice just under 1000",
            Document::new("facture")
                .fournisseur("Haribo")
                .montant(950.0)
                .statut("Payée")
                .date_creation(random_date(rng, &window, now)?),
        ),
        trap(
            "Q15",
            "low priority incident on line 14",
            Document::new("incident")
                .ligne("14")
                .priorite("Basse")
                .date_creation(random_date(rng, &window, now)?),
        ),
        trap(
            "Q5",
            "report that mentions Alpha without belonging to it",
            Document::new("rapport")
                .projet("Beta")
                .texte_complet("Comparatif avec le projet Alpha")
                .date_creation(random_date(rng, &window, now)?),
        ),
        answer(
            "Q26",
            "invoice created this month",
            Document::new("facture")
                .fournisseur("Orange")
                .montant(420.0)
                .date_creation(in_this_month),
        ),
        answer(
            "Q27",
            "incident on leap day 2024",
            Document::new("incident")
                .ligne("7")
                .sujet("Coupure électrique")
                .date_creation(random_date(
                    rng,
                    &DateWindow::Day {
                        year: 2024,
                        month: 2,
                        day: 29,
                    },
                    now,
                )?),
        ),
    ])
}
