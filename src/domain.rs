use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One construction project, mapped field-for-field from a "Projects" row.
/// Everything except the id and the date fields is kept as the raw export
/// string; exports leave cells blank freely and values like `VALUE` carry
/// locale formatting the store is not expected to interpret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub ref_id: String,
    pub version: String,
    pub project_type: String,
    pub name: String,
    pub value: String,
    pub us_value: String,
    pub stage_id: String,
    pub status_id: String,
    pub const_start: Option<NaiveDate>,
    pub const_end: Option<NaiveDate>,
    pub time_stamp: Option<NaiveDateTime>,
    pub green_building_rating: String,
    pub address: String,
    pub post_code: String,
    pub town: String,
    pub province: String,
    pub region: String,
    pub country: String,
    pub floor_area: String,
    pub site_area: String,
    pub storeys: String,
    pub units_residential: String,
    pub units_industrial: String,
    pub units_subdivisions: String,
    pub owner_type_id: String,
    pub dev_type_id: String,
    pub status_desc: String,
    pub remarks_1: String,
    pub remarks_2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub town: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub website: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub mobile: String,
    pub fax: String,
    pub email: String,
    pub position: String,
    pub company_id: i64,
}

/// Links a project to a canonical category resolved from its sub-category
/// slot columns. Identity is the pair itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCategory {
    pub project_id: i64,
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyContactRole {
    pub company_id: i64,
    pub contact_id: i64,
    pub role_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContactCompany {
    pub project_id: i64,
    pub contact_id: i64,
    pub company_id: i64,
}
