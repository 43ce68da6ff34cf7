//! Maps raw portal tables into [`TrafficTicket`] records.

use super::amount::parse_amount;
use super::models::{Amount, Media, Resolution, TrafficTicket};
use super::table::ExtractedTable;

/// Header labels as the portal renders them. Matched exactly, accents included.
pub mod columns {
    pub const DOCUMENT: &str = "Id Documento";
    pub const SANCTION_TYPE: &str = "Tipo Sanción";
    pub const STATUS: &str = "Estado Comparendo";
    pub const NUMBER: &str = "Nro Comparendo";
    pub const COST: &str = "Costas";
    pub const INTERES: &str = "Interés";
    pub const VALUE: &str = "Valor Multa";
    pub const RESOLUTION_NUMBER: &str = "Número Resolución";
    pub const RESOLUTION_DATE: &str = "Fecha Resolución";
}

/// Convert every data row of `table` into a ticket stamped with `media`.
///
/// Empty tables and the "No records found." row yield no tickets. Row order is kept.
pub fn transform(media: Media, table: &ExtractedTable) -> Vec<TrafficTicket> {
    if !table.has_values() {
        return Vec::new();
    }

    let text = |row: &[String], column: &str| table.lookup(row, column).map(str::to_owned);

    table
        .rows
        .iter()
        .map(|row| TrafficTicket {
            media,
            document: text(row, columns::DOCUMENT),
            sanction_type: text(row, columns::SANCTION_TYPE),
            status: text(row, columns::STATUS),
            number: text(row, columns::NUMBER),
            amount: Amount {
                value: parse_amount(table.lookup(row, columns::VALUE)),
                interes: parse_amount(table.lookup(row, columns::INTERES)),
                cost: parse_amount(table.lookup(row, columns::COST)),
            },
            resolution: Resolution {
                number: text(row, columns::RESOLUTION_NUMBER),
                date: text(row, columns::RESOLUTION_DATE),
            },
        })
        .collect()
}
