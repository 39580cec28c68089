pub mod categories;
pub mod config;
pub mod constants;
pub mod dates;
pub mod domain;
pub mod error;
pub mod importer;
pub mod logging;
pub mod normalize;
pub mod sheets;
pub mod store;

pub use categories::CategoryLookup;
pub use error::{ImporterError, Result};
pub use importer::{Importer, RunSummary};
pub use sheets::Workbook;
pub use store::Store;
