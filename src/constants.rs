/// Names shared between the store schema and the load orchestrator.

// Worksheet names inside every export file (exact-match keys)
pub const PROJECTS_SHEET: &str = "Projects";
pub const FIRM_DETAILS_SHEET: &str = "Firm Details";

// Store tables, in truncate/insert order. Entities come before the
// relations that reference them.
pub const PROJECT_TABLE: &str = "project";
pub const COMPANY_TABLE: &str = "company";
pub const CONTACT_TABLE: &str = "contact";
pub const REL_PROJECT_CATEGORY_TABLE: &str = "rel_project_category";
pub const REL_COMPANY_CONTACT_ROLE_TABLE: &str = "rel_company_contact_role";
pub const REL_PROJECT_CONTACT_COMPANY_TABLE: &str = "rel_project_contact_company";

pub const TABLES: [&str; 6] = [
    PROJECT_TABLE,
    COMPANY_TABLE,
    CONTACT_TABLE,
    REL_PROJECT_CATEGORY_TABLE,
    REL_COMPANY_CONTACT_ROLE_TABLE,
    REL_PROJECT_CONTACT_COMPANY_TABLE,
];

/// Contact id the export uses for "no contact assigned". Rows carrying it
/// contribute no contact record and no contact relations.
pub const NO_CONTACT_ID: i64 = 1;

/// Table entry consulted in the category reference artifact.
pub const CATEGORY_TABLE_NAME: &str = "dim_project_category";
