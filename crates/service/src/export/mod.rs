//! Downloadable stock exports of the current (filtered) tool list.

pub mod csv;
pub mod xlsx;

use chrono::NaiveDate;

pub use self::csv::tools_to_csv;
pub use self::xlsx::tools_to_xlsx;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Column headers shared by both formats.
pub const HEADERS: [&str; 6] = ["Nome", "Descrição", "Quantidade", "Mínimo", "Localização", "Status"];

pub fn csv_filename(day: NaiveDate) -> String {
    format!("estoque-{}.csv", day.format("%Y-%m-%d"))
}

pub fn xlsx_filename(day: NaiveDate) -> String {
    format!("relatorio-estoque-{}.xlsx", day.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_carry_the_date() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(csv_filename(day), "estoque-2024-03-09.csv");
        assert_eq!(xlsx_filename(day), "relatorio-estoque-2024-03-09.xlsx");
    }
}
