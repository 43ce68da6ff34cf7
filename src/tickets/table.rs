//! Raw tabular data scraped from the rendered portal page.

use html_scraper::{ElementRef, Html, Selector};

use crate::portal::{AutomationError, PortalPage};

/// PrimeFaces reflow label repeated inside each body cell; CSS hides it outside mobile layouts.
const REFLOW_TITLE_CLASS: &str = "ui-column-title";

/// Body text the portal renders as a single row when a table has no data.
pub const NO_RECORDS_SENTINEL: &str = "No records found.";

/// Header labels and cell text of one HTML table, with no interpretation applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Whether the table carries real data rows.
    ///
    /// A lone row starting with [`NO_RECORDS_SENTINEL`] is the portal's empty state,
    /// not a record.
    pub fn has_values(&self) -> bool {
        match self.rows.as_slice() {
            [] => false,
            [only] => only.first().map(String::as_str) != Some(NO_RECORDS_SENTINEL),
            _ => true,
        }
    }

    /// Cell of `row` under the header exactly equal to `column`.
    pub fn lookup<'r>(&self, row: &'r [String], column: &str) -> Option<&'r str> {
        let index = self.columns.iter().position(|name| name == column)?;
        row.get(index).map(String::as_str)
    }
}

/// Read the table matched by `selector` from the page's current document.
pub async fn extract_table<P: PortalPage + ?Sized>(
    page: &P,
    selector: &str,
) -> Result<ExtractedTable, AutomationError> {
    let document = page.content().await?;
    scrape_table(&document, selector)
}

/// Scrape `{selector} thead tr th` as columns and `{selector} tbody tr` cells as rows.
///
/// A selector that matches nothing produces an empty table.
pub fn scrape_table(document: &str, selector: &str) -> Result<ExtractedTable, AutomationError> {
    let header_sel = parse_selector(&format!("{selector} thead tr th"))?;
    let row_sel = parse_selector(&format!("{selector} tbody tr"))?;
    let cell_sel = parse_selector("td")?;

    let html = Html::parse_document(document);

    let columns = html
        .select(&header_sel)
        .map(|th| cell_text(th, None))
        .collect();
    let rows = html
        .select(&row_sel)
        .map(|row| {
            row.select(&cell_sel)
                .map(|td| cell_text(td, Some(REFLOW_TITLE_CLASS)))
                .collect()
        })
        .collect();

    Ok(ExtractedTable { columns, rows })
}

fn parse_selector(raw: &str) -> Result<Selector, AutomationError> {
    Selector::parse(raw).map_err(|_| AutomationError::InvalidSelector(raw.to_owned()))
}

/// Whitespace-collapsed, trimmed text of a cell, close to what `innerText` yields.
///
/// Text inside descendants carrying `hidden_class` is left out, since the browser
/// would not render it.
fn cell_text(cell: ElementRef<'_>, hidden_class: Option<&str>) -> String {
    cell.descendants()
        .filter(|node| {
            hidden_class.is_none_or(|class| {
                !node
                    .ancestors()
                    .take_while(|ancestor| ancestor.id() != cell.id())
                    .filter_map(ElementRef::wrap)
                    .any(|el| el.value().classes().any(|c| c == class))
            })
        })
        .filter_map(|node| node.value().as_text())
        .flat_map(|text| text.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
