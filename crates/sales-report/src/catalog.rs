use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDefinition {
    pub name: String,
    pub sql: String,
}

impl ReportDefinition {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog contains no reports")]
    Empty,
    #[error("report #{0} has a blank name")]
    BlankName(usize),
    #[error("report `{0}` has blank SQL")]
    BlankSql(String),
    #[error("duplicate report name `{0}`")]
    DuplicateName(String),
}

/// On-disk shape: `{"reports": [{"name": "...", "sql": "..."}, ...]}`.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    reports: Vec<ReportDefinition>,
}

/// Ordered set of named report queries. Reports run in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCatalog {
    reports: Vec<ReportDefinition>,
}

impl ReportCatalog {
    pub fn new(reports: Vec<ReportDefinition>) -> Result<Self, CatalogError> {
        if reports.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (idx, report) in reports.iter().enumerate() {
            let name = report.name.trim();
            if name.is_empty() {
                return Err(CatalogError::BlankName(idx + 1));
            }
            if report.sql.trim().is_empty() {
                return Err(CatalogError::BlankSql(report.name.clone()));
            }
            if !seen.insert(name) {
                return Err(CatalogError::DuplicateName(report.name.clone()));
            }
        }

        Ok(Self { reports })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.reports)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            reports: self.reports.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn reports(&self) -> &[ReportDefinition] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// The standard 13 sales reports.
    ///
    /// Relative windows use the `:as_of` parameter; every other filter is a fixed literal.
    pub fn builtin() -> Self {
        let reports = BUILTIN_REPORTS
            .iter()
            .map(|(name, sql)| ReportDefinition::new(*name, sql.trim()))
            .collect();
        Self { reports }
    }
}

const BUILTIN_REPORTS: &[(&str, &str)] = &[
    (
        "Show total sales and quantity per city",
        r#"
        SELECT City, SUM(Sales) AS Total_Sales, SUM(Quantity) AS Total_Quantity
        FROM sales_data
        GROUP BY City
        "#,
    ),
    (
        "Which city had the highest sales in 2024",
        r#"
        SELECT City, SUM(Sales) AS Total_Sales
        FROM sales_data
        WHERE sale_date BETWEEN '2024-01-01' AND '2024-12-31'
        GROUP BY City
        ORDER BY Total_Sales DESC
        LIMIT 1
        "#,
    ),
    (
        "Get monthly sales for Product 2 in 2025",
        r#"
        SELECT strftime('%Y-%m', sale_date) AS Month, SUM(Sales) AS Total_Sales
        FROM sales_data
        WHERE Product_Name = 'Product 2' AND sale_date BETWEEN '2025-01-01' AND '2025-12-31'
        GROUP BY Month
        ORDER BY Month
        "#,
    ),
    (
        "Show top 3 cities by total quantity sold",
        r#"
        SELECT City, SUM(Quantity) AS Total_Quantity
        FROM sales_data
        GROUP BY City
        ORDER BY Total_Quantity DESC
        LIMIT 3
        "#,
    ),
    (
        "List product names with their total sales",
        r#"
        SELECT Product_Name, SUM(Sales) AS Total_Sales
        FROM sales_data
        GROUP BY Product_Name
        "#,
    ),
    (
        "Find total quantity sold for each channel in the last 6 months",
        r#"
        SELECT Channel, SUM(Quantity)
        FROM sales_data
        WHERE sale_date >= date(:as_of, '-6 months')
        GROUP BY Channel
        "#,
    ),
    (
        "What is the average sales per transaction for Product 2",
        r#"
        SELECT AVG(Sales)
        FROM sales_data
        WHERE Product_Name = 'Product 2'
        "#,
    ),
    (
        "Rank cities based on total sales",
        r#"
        SELECT City, SUM(Sales) AS Total_Sales,
               DENSE_RANK() OVER (ORDER BY SUM(Sales) DESC) AS Rank
        FROM sales_data
        GROUP BY City
        ORDER BY Rank, City
        "#,
    ),
    (
        "Get sales in City1 for Channel 1 in October 2024",
        r#"
        SELECT *
        FROM sales_data
        WHERE City = 'City1' AND Channel = 'Channel 1'
          AND sale_date BETWEEN '2024-10-01' AND '2024-10-31'
        "#,
    ),
    (
        "Compare sales in January and February 2025",
        r#"
        SELECT strftime('%Y-%m', sale_date) AS Month, SUM(Sales)
        FROM sales_data
        WHERE sale_date BETWEEN '2025-01-01' AND '2025-02-28'
        GROUP BY Month
        ORDER BY Month
        "#,
    ),
    (
        "What are the monthly sales across platform1 since Jan 2025?",
        r#"
        SELECT strftime('%Y-%m', sale_date) AS Month, SUM(Sales) AS Total_Sales
        FROM sales_data
        WHERE Channel = 'Platform1' AND sale_date >= '2025-01-01'
        GROUP BY Month
        ORDER BY Month
        "#,
    ),
    (
        "What is the share of units sold across various platforms since Jan 2025?",
        r#"
        SELECT Channel, SUM(Quantity) AS Total_Quantity,
               SUM(Quantity) * 100.0
                 / (SELECT SUM(Quantity) FROM sales_data WHERE sale_date >= '2025-01-01')
                 AS Share_Percent
        FROM sales_data
        WHERE sale_date >= '2025-01-01'
        GROUP BY Channel
        "#,
    ),
    (
        "Can you tell me the top 5 days with the highest daily units sold?",
        r#"
        SELECT sale_date, SUM(Quantity) AS Total_Quantity
        FROM sales_data
        GROUP BY sale_date
        ORDER BY Total_Quantity DESC, sale_date
        LIMIT 5
        "#,
    ),
];
