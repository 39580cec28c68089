use crate::domain::{
    Company, CompanyContactRole, Contact, Project, ProjectCategory, ProjectContactCompany,
};
use crate::error::Result;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, info};

/// The relational store behind the importer: a local SQLite database with
/// natural primary keys on all six tables. Every bulk write uses
/// `INSERT OR IGNORE`, so reloading rows that already exist (from this run
/// or an earlier one) is a no-op rather than a constraint violation.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(include_str!("../migrations/001_create_tables.sql"))?;
        Ok(Self { conn })
    }

    /// Empties one table. SQLite has no TRUNCATE; an unqualified DELETE is
    /// its equivalent.
    pub fn truncate(&self, table: &str) -> Result<()> {
        info!("Truncating table {table}");
        self.conn
            .execute(&format!("DELETE FROM \"{table}\""), [])?;
        Ok(())
    }

    pub fn table_count(&self, table: &str) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }

    /// Bulk-inserts projects, returning how many rows were actually
    /// written (ignored duplicates excluded).
    pub fn insert_projects(&mut self, projects: &[Project]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO project (
                    id, ref_id, version, project_type, name, value, us_value,
                    stage_id, status_id, const_start, const_end, time_stamp,
                    green_building_rating, address, post_code, town, province,
                    region, country, floor_area, site_area, storeys,
                    units_residential, units_industrial, units_subdivisions,
                    owner_type_id, dev_type_id, status_desc, remarks_1, remarks_2
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                    ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24,
                    ?25, ?26, ?27, ?28, ?29, ?30
                )",
            )?;
            for p in projects {
                inserted += stmt.execute(params![
                    p.id,
                    p.ref_id,
                    p.version,
                    p.project_type,
                    p.name,
                    p.value,
                    p.us_value,
                    p.stage_id,
                    p.status_id,
                    p.const_start.map(|d| d.to_string()),
                    p.const_end.map(|d| d.to_string()),
                    p.time_stamp.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
                    p.green_building_rating,
                    p.address,
                    p.post_code,
                    p.town,
                    p.province,
                    p.region,
                    p.country,
                    p.floor_area,
                    p.site_area,
                    p.storeys,
                    p.units_residential,
                    p.units_industrial,
                    p.units_subdivisions,
                    p.owner_type_id,
                    p.dev_type_id,
                    p.status_desc,
                    p.remarks_1,
                    p.remarks_2,
                ])?;
            }
        }
        tx.commit()?;
        debug!("Inserted {inserted} of {} projects", projects.len());
        Ok(inserted)
    }

    pub fn insert_companies(&mut self, companies: &[Company]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO company (
                    id, name, address, town, province, post_code, country, website
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for c in companies {
                inserted += stmt.execute(params![
                    c.id, c.name, c.address, c.town, c.province, c.post_code, c.country,
                    c.website,
                ])?;
            }
        }
        tx.commit()?;
        debug!("Inserted {inserted} of {} companies", companies.len());
        Ok(inserted)
    }

    pub fn insert_contacts(&mut self, contacts: &[Contact]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO contact (
                    id, salutation, first_name, last_name, phone, mobile, fax,
                    email, position, company_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for c in contacts {
                inserted += stmt.execute(params![
                    c.id,
                    c.salutation,
                    c.first_name,
                    c.last_name,
                    c.phone,
                    c.mobile,
                    c.fax,
                    c.email,
                    c.position,
                    c.company_id,
                ])?;
            }
        }
        tx.commit()?;
        debug!("Inserted {inserted} of {} contacts", contacts.len());
        Ok(inserted)
    }

    pub fn insert_project_categories(&mut self, relations: &[ProjectCategory]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO rel_project_category (project_id, category_id)
                 VALUES (?1, ?2)",
            )?;
            for r in relations {
                inserted += stmt.execute(params![r.project_id, r.category_id])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn insert_company_contact_roles(
        &mut self,
        relations: &[CompanyContactRole],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO rel_company_contact_role (company_id, contact_id, role_id)
                 VALUES (?1, ?2, ?3)",
            )?;
            for r in relations {
                inserted += stmt.execute(params![r.company_id, r.contact_id, r.role_id])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn insert_project_contact_companies(
        &mut self,
        relations: &[ProjectContactCompany],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO rel_project_contact_company (project_id, contact_id, company_id)
                 VALUES (?1, ?2, ?3)",
            )?;
            for r in relations {
                inserted += stmt.execute(params![r.project_id, r.contact_id, r.company_id])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }
}
