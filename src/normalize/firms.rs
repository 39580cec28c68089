use super::{cell, ensure_key_columns, parse_id};
use crate::constants::{FIRM_DETAILS_SHEET, NO_CONTACT_ID};
use crate::domain::{Company, CompanyContactRole, Contact, ProjectContactCompany};
use crate::error::Result;
use crate::sheets::SheetRow;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default)]
pub struct NormalizedFirms {
    pub companies: Vec<Company>,
    pub contacts: Vec<Contact>,
    pub company_contact_roles: Vec<CompanyContactRole>,
    pub project_contact_companies: Vec<ProjectContactCompany>,
}

/// Turns "Firm Details" rows into deduplicated company and contact lists
/// plus the two relation lists. Each source row is one (project, company,
/// contact) association, so the same company or contact recurs once per
/// project it is attached to; the first occurrence wins and keeps its
/// first-seen position.
///
/// The contact id `1` means "no contact assigned": such rows still carry a
/// company, but emit no contact and no relation records.
pub fn normalize_firms(rows: &[SheetRow]) -> Result<NormalizedFirms> {
    ensure_key_columns(FIRM_DETAILS_SHEET, rows, &["FIRMID", "CONTACTID", "PROJECTID"])?;

    let mut seen_companies: HashSet<i64> = HashSet::new();
    let mut seen_contacts: HashSet<i64> = HashSet::new();
    let mut normalized = NormalizedFirms::default();

    for row in rows {
        let company_id = parse_id(row, "FIRMID")?;
        let contact_id = parse_id(row, "CONTACTID")?;
        let project_id = parse_id(row, "PROJECTID")?;

        if seen_companies.insert(company_id) {
            normalized.companies.push(Company {
                id: company_id,
                name: cell(row, "FIRM_NAME").to_string(),
                address: cell(row, "FIRM_ADDRESS").to_string(),
                town: cell(row, "FIRM_TOWN").to_string(),
                province: cell(row, "FIRM_PROVINCE").to_string(),
                post_code: cell(row, "FIRM_POSTCODE").to_string(),
                country: cell(row, "FIRM_COUNTRY").to_string(),
                website: cell(row, "FIRM_WEBSITE").to_string(),
            });
        }

        if contact_id == NO_CONTACT_ID {
            continue;
        }

        if seen_contacts.insert(contact_id) {
            normalized.contacts.push(Contact {
                id: contact_id,
                salutation: cell(row, "SALUTATION").to_string(),
                first_name: cell(row, "FIRST_NAME").to_string(),
                last_name: cell(row, "LAST_NAME").to_string(),
                phone: cell(row, "CONTACT_PHONE").to_string(),
                mobile: cell(row, "CONTACT_MOBILE").to_string(),
                fax: cell(row, "CONTACT_FAX").to_string(),
                email: cell(row, "CONTACT_EMAIL").to_string(),
                position: cell(row, "POSITION").to_string(),
                company_id,
            });
        }

        normalized.company_contact_roles.push(CompanyContactRole {
            company_id,
            contact_id,
            role_id: cell(row, "ROLE_ID").to_string(),
        });

        normalized.project_contact_companies.push(ProjectContactCompany {
            project_id,
            contact_id,
            company_id,
        });
    }

    debug!(
        "Normalized {} companies, {} contacts, {} role relations, {} project relations",
        normalized.companies.len(),
        normalized.contacts.len(),
        normalized.company_contact_roles.len(),
        normalized.project_contact_companies.len()
    );
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImporterError;

    fn row(project: &str, firm: &str, contact: &str, extra: &[(&str, &str)]) -> SheetRow {
        let mut row: SheetRow = [
            ("PROJECTID".to_string(), project.to_string()),
            ("FIRMID".to_string(), firm.to_string()),
            ("CONTACTID".to_string(), contact.to_string()),
        ]
        .into_iter()
        .collect();
        for (k, v) in extra {
            row.insert(k.to_string(), v.to_string());
        }
        row
    }

    #[test]
    fn shared_company_is_emitted_once_with_two_contacts() {
        let rows = vec![
            row("200", "50", "60", &[("FIRM_NAME", "Acme Builders")]),
            row("201", "50", "61", &[("FIRM_NAME", "Acme Builders Ltd")]),
        ];

        let normalized = normalize_firms(&rows).unwrap();

        assert_eq!(normalized.companies.len(), 1);
        assert_eq!(normalized.companies[0].id, 50);
        // first occurrence wins
        assert_eq!(normalized.companies[0].name, "Acme Builders");

        let contact_ids: Vec<i64> = normalized.contacts.iter().map(|c| c.id).collect();
        assert_eq!(contact_ids, vec![60, 61]);

        assert_eq!(normalized.project_contact_companies.len(), 2);
        assert_eq!(normalized.company_contact_roles.len(), 2);
    }

    #[test]
    fn duplicate_contacts_keep_first_seen_order_and_fields() {
        let rows = vec![
            row("200", "50", "60", &[("FIRST_NAME", "Mei")]),
            row("201", "51", "60", &[("FIRST_NAME", "May")]),
            row("202", "52", "62", &[("FIRST_NAME", "Tomas")]),
        ];

        let normalized = normalize_firms(&rows).unwrap();

        assert_eq!(normalized.contacts.len(), 2);
        assert_eq!(normalized.contacts[0].id, 60);
        assert_eq!(normalized.contacts[0].first_name, "Mei");
        assert_eq!(normalized.contacts[1].id, 62);
        // relations are per-row, not deduplicated
        assert_eq!(normalized.project_contact_companies.len(), 3);
    }

    #[test]
    fn sentinel_contact_rows_emit_company_only() {
        let rows = vec![row("200", "50", "1", &[("FIRM_NAME", "Acme Builders")])];

        let normalized = normalize_firms(&rows).unwrap();

        assert_eq!(normalized.companies.len(), 1);
        assert!(normalized.contacts.is_empty());
        assert!(normalized.company_contact_roles.is_empty());
        assert!(normalized.project_contact_companies.is_empty());
    }

    #[test]
    fn sentinel_never_reaches_contact_output_even_when_repeated() {
        let rows = vec![
            row("200", "50", "1", &[]),
            row("200", "51", "60", &[]),
            row("201", "52", "1", &[]),
        ];

        let normalized = normalize_firms(&rows).unwrap();

        assert!(normalized.contacts.iter().all(|c| c.id != 1));
        assert!(normalized
            .company_contact_roles
            .iter()
            .all(|r| r.contact_id != 1));
        assert!(normalized
            .project_contact_companies
            .iter()
            .all(|r| r.contact_id != 1));
        assert_eq!(normalized.companies.len(), 3);
    }

    #[test]
    fn relation_fields_come_from_the_row() {
        let rows = vec![row("200", "50", "60", &[("ROLE_ID", "ARCH")])];
        let normalized = normalize_firms(&rows).unwrap();
        assert_eq!(
            normalized.company_contact_roles,
            vec![CompanyContactRole {
                company_id: 50,
                contact_id: 60,
                role_id: "ARCH".to_string(),
            }]
        );
        assert_eq!(
            normalized.project_contact_companies,
            vec![ProjectContactCompany {
                project_id: 200,
                contact_id: 60,
                company_id: 50,
            }]
        );
    }

    #[test]
    fn non_numeric_id_fails_the_sheet() {
        let rows = vec![row("200", "n/a", "60", &[])];
        assert!(matches!(
            normalize_firms(&rows),
            Err(ImporterError::InvalidId { .. })
        ));
    }

    #[test]
    fn missing_key_columns_fail_fast() {
        let rows = vec![[("FIRMID".to_string(), "50".to_string())]
            .into_iter()
            .collect()];
        let err = normalize_firms(&rows).unwrap_err();
        match err {
            ImporterError::MissingColumns { sheet, columns } => {
                assert_eq!(sheet, FIRM_DETAILS_SHEET);
                assert_eq!(columns, vec!["CONTACTID", "PROJECTID"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
