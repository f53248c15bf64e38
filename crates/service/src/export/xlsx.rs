//! Styled spreadsheet with a summary dashboard and a detail sheet.

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::domain::{StockStatus, Tool};
use crate::errors::ServiceError;
use crate::stats::StockSummary;

use super::HEADERS;

const BRAND_DARK: u32 = 0x0B3D91;
const HEADER_FILL: u32 = 0x1976D2;
const ZEBRA_FILL: u32 = 0xE3F2FD;
const LOW_FILL: u32 = 0xE57373;
const OK_FILL: u32 = 0x66BB6A;
const KPI_COLORS: [u32; 5] = [0x0B3D91, 0x1565C0, 0x1976D2, 0x42A5F5, 0x90CAF9];
const DASHBOARD_COLUMNS: u16 = 11;

impl From<XlsxError> for ServiceError {
    fn from(e: XlsxError) -> Self { ServiceError::Export(e.to_string()) }
}

/// Build the workbook for the given tools (already filtered and sorted).
pub fn tools_to_xlsx(tools: &[Tool], generated_at: NaiveDateTime) -> Result<Vec<u8>, ServiceError> {
    let summary = StockSummary::from_tools(tools);
    let mut workbook = Workbook::new();
    let props = DocProperties::new()
        .set_title("Relatório de Estoque")
        .set_author("VIPI Catalog");
    workbook.set_properties(&props);

    workbook.push_worksheet(dashboard_sheet(&summary, generated_at)?);
    workbook.push_worksheet(details_sheet(tools)?);

    Ok(workbook.save_to_buffer()?)
}

fn dashboard_sheet(summary: &StockSummary, generated_at: NaiveDateTime) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name("Dash_Geral")?;
    sheet.set_tab_color(Color::RGB(BRAND_DARK));
    for col in 0..DASHBOARD_COLUMNS {
        sheet.set_column_width(col, 14)?;
    }

    let title = Format::new()
        .set_bold()
        .set_font_size(16)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(BRAND_DARK))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    sheet.set_row_height(0, 34)?;
    sheet.merge_range(
        0,
        0,
        0,
        DASHBOARD_COLUMNS - 1,
        &format!(
            "VIPI Catalog · Relatório de Estoque · Gerado em: {}",
            generated_at.format("%d/%m/%Y %H:%M")
        ),
        &title,
    )?;

    let kpis: [(&str, i64); 5] = [
        ("Produtos Cadastrados", summary.total_tools as i64),
        ("Quantidade em Estoque", summary.total_quantity),
        ("Acima do Estoque Mínimo", summary.in_stock as i64),
        ("Abaixo do Estoque Mínimo", summary.low_stock as i64),
        ("Locais", summary.locations as i64),
    ];
    sheet.set_row_height(2, 22)?;
    sheet.set_row_height(3, 30)?;
    for (i, ((label, value), color)) in kpis.iter().zip(KPI_COLORS).enumerate() {
        let first = 1 + (i as u16) * 2;
        let last = first + 1;
        let label_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(color))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::White);
        let value_fmt = label_fmt.clone().set_font_size(18).set_num_format("#,##0");
        sheet.merge_range(2, first, 2, last, label, &label_fmt)?;
        sheet.merge_range(3, first, 3, last, "", &value_fmt)?;
        sheet.write_number_with_format(3, first, *value as f64, &value_fmt)?;
    }

    let notes = Format::new().set_italic().set_font_color(Color::RGB(0x555555));
    sheet.merge_range(5, 0, 5, DASHBOARD_COLUMNS - 1, "Observações: Gerado pelo VIPI Catalog", &notes)?;
    sheet.set_freeze_panes(1, 0)?;
    Ok(sheet)
}

fn details_sheet(tools: &[Tool]) -> Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name("Detalhes")?;
    let widths = [28, 40, 12, 10, 22, 18];
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    let header = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    for (col, text) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *text, &header)?;
    }

    let plain = Format::new().set_border(FormatBorder::Thin).set_border_color(Color::RGB(0xBBDEFB));
    let zebra = plain.clone().set_background_color(Color::RGB(ZEBRA_FILL));
    for (i, t) in tools.iter().enumerate() {
        let row = (i + 1) as u32;
        let base = if i % 2 == 1 { &zebra } else { &plain };
        let number = base.clone().set_align(FormatAlign::Right);
        sheet.write_string_with_format(row, 0, t.name.as_str(), base)?;
        sheet.write_string_with_format(row, 1, t.description.as_deref().unwrap_or(""), base)?;
        sheet.write_number_with_format(row, 2, t.quantity as f64, &number)?;
        sheet.write_number_with_format(row, 3, t.min_quantity as f64, &number)?;
        sheet.write_string_with_format(row, 4, t.location.as_deref().unwrap_or(""), base)?;

        let status = t.status();
        let fill = match status {
            StockStatus::Low => LOW_FILL,
            StockStatus::InStock => OK_FILL,
        };
        let status_fmt = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(fill))
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);
        sheet.write_string_with_format(row, 5, status.label(), &status_fmt)?;
    }

    if !tools.is_empty() {
        sheet.autofilter(0, 0, tools.len() as u32, (HEADERS.len() - 1) as u16)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn workbook_is_a_zip_container() {
        let tools = vec![Tool {
            id: "1".into(),
            name: "Furadeira".into(),
            description: None,
            quantity: 2,
            min_quantity: 5,
            location: Some("Prateleira A".into()),
            updated_at: Utc::now(),
        }];
        let at = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(10, 30, 0).unwrap();
        let bytes = tools_to_xlsx(&tools, at).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_list_still_exports() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let bytes = tools_to_xlsx(&[], at).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
