//! Sales report driver.
//!
//! Holds the named query catalog, runs each report against a [`Store`], and
//! renders the results as text tables or JSON. The `sales_report` binary wires
//! import, load, and reporting together (see [`cli`]).
//!
//! [`Store`]: sales_storage::Store

mod catalog;
pub mod cli;
mod driver;
mod render;

pub use catalog::{CatalogError, ReportCatalog, ReportDefinition};
pub use driver::{run_reports, ReportOutcome, ReportResult};
pub use render::{render_json, render_text, NO_DATA_NOTICE};
