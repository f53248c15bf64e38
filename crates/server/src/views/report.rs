use chrono::NaiveDateTime;
use service::domain::Tool;
use service::stats::StockSummary;

use super::html::{el, Node};
use super::tools::stat_card;
use crate::nav::Route;

/// "Drill: 2/5 (Shelf A)"
pub fn low_stock_line(tool: &Tool) -> String {
    format!(
        "{}: {}/{} ({})",
        tool.name,
        tool.quantity,
        tool.min_quantity,
        tool.location.as_deref().unwrap_or("Sem local")
    )
}

pub fn detailed_report(tools: &[Tool], generated_at: NaiveDateTime) -> Node {
    let summary = StockSummary::from_tools(tools);
    let lows: Vec<&Tool> = tools.iter().filter(|t| t.is_low_stock()).collect();
    let list = if lows.is_empty() {
        el("div").child(el("p").class("all-adequate").attr("style", "color:var(--success);font-weight:700;").text("Todas as ferramentas estão com estoque adequado."))
    } else {
        el("div").children(lows.iter().map(|t| el("div").class("low-stock-item").child(el("span").text(low_stock_line(t)))))
    };
    el("div")
        .class("card modal")
        .child(el("h3").class("modal-title").text("Relatório Detalhado"))
        .child(el("p").class("note").text(format!(
            "Gerado em: {} às {}",
            generated_at.format("%d/%m/%Y"),
            generated_at.format("%H:%M:%S")
        )))
        .child(
            el("div")
                .class("grid")
                .child(stat_card("Total de Ferramentas", summary.total_tools.to_string()))
                .child(stat_card("Estoque Baixo", summary.low_stock.to_string()))
                .child(stat_card("Total de Itens", summary.total_quantity.to_string()))
                .child(stat_card("Média por Item", summary.average_quantity.to_string())),
        )
        .child(el("h4").text("Ferramentas com Estoque Baixo"))
        .child(list)
        .child(el("a").class("btn btn-secondary").attr("href", Route::Stock.path()).text("Fechar"))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9).and_then(|d| d.and_hms_opt(14, 5, 0)).unwrap()
    }

    fn tool(name: &str, q: i64, min: i64, loc: Option<&str>) -> Tool {
        Tool { id: name.into(), name: name.into(), description: None, quantity: q, min_quantity: min, location: loc.map(Into::into), updated_at: Utc::now() }
    }

    #[test]
    fn lists_low_stock_tools() {
        let tools = vec![tool("Drill", 2, 5, Some("Shelf A")), tool("Saw", 8, 1, None), tool("Clamp", 0, 0, None)];
        let html = detailed_report(&tools, at()).render();
        assert!(html.contains("Gerado em: 09/03/2024 às 14:05:00"));
        assert!(html.contains("Drill: 2/5 (Shelf A)"));
        assert!(html.contains("Clamp: 0/0 (Sem local)"));
        assert!(!html.contains("Saw:"));
    }

    #[test]
    fn all_adequate_message() {
        let html = detailed_report(&[tool("Saw", 8, 1, None)], at()).render();
        assert!(html.contains("Todas as ferramentas estão com estoque adequado."));
    }
}
