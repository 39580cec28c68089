use super::{cell, ensure_key_columns, parse_date_cell, parse_id};
use crate::categories::CategoryLookup;
use crate::constants::PROJECTS_SHEET;
use crate::domain::{Project, ProjectCategory};
use crate::error::Result;
use crate::sheets::SheetRow;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Sub-category slot columns (`SUBCAT_1` .. `SUBCAT_9`); how many slots an
/// export carries varies, so they are discovered from the header.
static SUBCAT_COLUMN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^SUBCAT_\d$").unwrap());

#[derive(Debug, Default)]
pub struct NormalizedProjects {
    pub projects: Vec<Project>,
    pub categories: Vec<ProjectCategory>,
}

/// Turns "Projects" sheet rows into one `Project` per row plus a
/// `ProjectCategory` relation for every slot whose code resolves in the
/// lookup. Unresolved codes are skipped silently; projects are not
/// deduplicated here.
pub fn normalize_projects(
    rows: &[SheetRow],
    lookup: &CategoryLookup,
) -> Result<NormalizedProjects> {
    ensure_key_columns(PROJECTS_SHEET, rows, &["PROJECTID"])?;

    let mut subcat_columns: Vec<&str> = rows
        .first()
        .map(|row| {
            row.keys()
                .map(String::as_str)
                .filter(|key| SUBCAT_COLUMN.is_match(key))
                .collect()
        })
        .unwrap_or_default();
    subcat_columns.sort_unstable();

    let mut normalized = NormalizedProjects::default();

    for row in rows {
        let project = Project {
            id: parse_id(row, "PROJECTID")?,
            ref_id: cell(row, "PROJECT_REFID").to_string(),
            version: cell(row, "VERSION").to_string(),
            project_type: cell(row, "PROJECT_TYPE").to_string(),
            name: cell(row, "PROJECT_NAME").to_string(),
            value: cell(row, "VALUE").to_string(),
            us_value: cell(row, "USVALUE").to_string(),
            stage_id: cell(row, "PROJECTSTAGEID").to_string(),
            status_id: cell(row, "PROJECT_STATUSID").to_string(),
            const_start: parse_date_cell(row, "CONST_START")?.map(|d| d.date),
            const_end: parse_date_cell(row, "CONST_END")?.map(|d| d.date),
            time_stamp: parse_date_cell(row, "TIME_STAMP")?.map(|d| d.into_datetime()),
            green_building_rating: cell(row, "GREEN_BUILDING_RATING").to_string(),
            address: cell(row, "ADDRESS").to_string(),
            post_code: cell(row, "POSTCODE").to_string(),
            town: cell(row, "TOWN").to_string(),
            province: cell(row, "PROVINCE").to_string(),
            region: cell(row, "BCIREGION").to_string(),
            country: cell(row, "COUNTRY_NAME").to_string(),
            floor_area: cell(row, "FLOOR_AREA").to_string(),
            site_area: cell(row, "SITE_AREA").to_string(),
            storeys: cell(row, "STOREYS").to_string(),
            units_residential: cell(row, "UNITS_RESIDENTIAL").to_string(),
            units_industrial: cell(row, "UNITS_INDUSTRIAL").to_string(),
            units_subdivisions: cell(row, "UNITS_SUBDIVISIONS").to_string(),
            owner_type_id: cell(row, "OWNER_TYPEID").to_string(),
            dev_type_id: cell(row, "DEV_TYPEID").to_string(),
            status_desc: cell(row, "STATUS_DESC").to_string(),
            remarks_1: cell(row, "REMARKS").to_string(),
            remarks_2: cell(row, "L_REMARKS").to_string(),
        };

        for column in &subcat_columns {
            if let Some(category_id) = lookup.resolve(cell(row, column)) {
                normalized.categories.push(ProjectCategory {
                    project_id: project.id,
                    category_id: category_id.to_string(),
                });
            }
        }

        normalized.projects.push(project);
    }

    debug!(
        "Normalized {} projects, {} category relations",
        normalized.projects.len(),
        normalized.categories.len()
    );
    Ok(normalized)
}
