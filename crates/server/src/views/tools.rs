use service::domain::{StockStatus, Tool};
use service::listing::{StockFilter, ToolQuery, ToolSort};
use service::stats::StockSummary;

use super::html::{el, Element, Node};
use crate::nav::Route;

pub fn stat_card(label: &str, value: String) -> Element {
    el("div")
        .class("stats-card")
        .child(el("p").class("note").text(label))
        .child(el("h4").attr("style", "margin:8px 0;font-size:2.2rem;color:var(--sec2);").text(value))
}

pub fn summary_cards(summary: &StockSummary) -> Element {
    el("div")
        .class("card")
        .child(el("h3").text("Resumo do Estoque"))
        .child(
            el("div")
                .class("grid")
                .child(stat_card("Ferramentas", summary.total_tools.to_string()))
                .child(stat_card("Estoque Baixo", summary.low_stock.to_string()))
                .child(stat_card("Total de Itens", summary.total_quantity.to_string()))
                .child(stat_card("Média por Item", summary.average_quantity.to_string())),
        )
}

/// Query string for the current criteria, reused by export links.
pub fn query_string(query: &ToolQuery) -> String {
    format!(
        "q={}&status={}&sort={}",
        urlencoding::encode(&query.term),
        query.status.as_str(),
        query.sort.as_str()
    )
}

fn select<T: Copy + PartialEq>(name: &'static str, current: T, options: &[(T, &'static str, &'static str)]) -> Element {
    el("select").class("filter-select").attr("name", name).children(options.iter().map(|(v, value, label)| {
        el("option").attr("value", *value).flag("selected", *v == current).text(*label)
    }))
}

fn search_form(query: &ToolQuery) -> Element {
    let qs = query_string(query);
    el("div")
        .class("card")
        .child(el("h3").text("Buscar e Filtrar"))
        .child(
            el("form")
                .class("search-container")
                .attr("method", "get")
                .attr("action", Route::Stock.path())
                .child(
                    el("input")
                        .class("search-input")
                        .attr("type", "text")
                        .attr("name", "q")
                        .attr("placeholder", "Buscar por nome, descrição ou localização...")
                        .attr("value", query.term.as_str()),
                )
                .child(select(
                    "status",
                    query.status,
                    &[
                        (StockFilter::All, "all", "Todos os itens"),
                        (StockFilter::Low, "low", "Estoque baixo"),
                        (StockFilter::Ok, "ok", "Estoque OK"),
                    ],
                ))
                .child(select(
                    "sort",
                    query.sort,
                    &[
                        (ToolSort::Name, "name", "Ordenar por nome"),
                        (ToolSort::Quantity, "quantity", "Ordenar por quantidade"),
                        (ToolSort::Location, "location", "Ordenar por localização"),
                    ],
                ))
                .child(el("button").class("btn").attr("type", "submit").text("Aplicar")),
        )
        .child(
            el("div")
                .attr("style", "display:flex;gap:12px;flex-wrap:wrap;margin-top:16px;")
                .child(el("a").class("btn").attr("href", Route::ToolNew.path()).text("Nova Ferramenta"))
                .child(el("a").class("btn btn-secondary").attr("href", Route::StockReport.path()).text("Relatório"))
                .child(el("a").class("btn btn-success").attr("href", format!("{}?{qs}", Route::ExportCsv.path())).text("Exportar CSV"))
                .child(el("a").class("btn btn-success").attr("href", format!("{}?{qs}", Route::ExportXlsx.path())).text("Exportar Excel")),
        )
}

fn kv(label: &str, value: String, color: Option<&str>) -> Element {
    let value_el = el("span").text(value);
    let value_el = match color {
        Some(c) => value_el.attr("style", format!("color:{c};font-weight:700;")),
        None => value_el,
    };
    el("div")
        .attr("style", "display:flex;justify-content:space-between;margin:6px 0;")
        .child(el("span").class("note").text(label))
        .child(value_el)
}

pub fn tool_card(tool: &Tool) -> Element {
    let low = tool.status() == StockStatus::Low;
    el("div")
        .class("card")
        .attr("id", format!("tool-{}", tool.id))
        .child(
            el("div")
                .attr("style", "display:flex;justify-content:space-between;align-items:flex-start;")
                .child(el("h4").text(tool.name.as_str()))
                .child(el("div").class(if low { "status-badge warning" } else { "status-badge success" }).text(tool.status().label())),
        )
        .child(el("p").class("note").text(tool.description.clone().unwrap_or_else(|| "Sem descrição".into())))
        .child(
            el("div")
                .class("stats-card")
                .child(kv("Quantidade:", tool.quantity.to_string(), Some(if low { "var(--warning)" } else { "var(--success)" })))
                .child(kv("Mínimo:", tool.min_quantity.to_string(), None))
                .child(kv("Local:", tool.location.clone().unwrap_or_else(|| "Não informado".into()), None)),
        )
        .child(
            el("div")
                .attr("style", "display:flex;gap:8px;")
                .child(el("a").class("btn btn-secondary").attr("href", Route::ToolEdit(tool.id.clone()).path()).text("Editar"))
                .child(el("a").class("btn btn-danger").attr("href", Route::ToolDelete(tool.id.clone()).path()).text("Excluir")),
        )
}

/// Reload the page when the tool table changes.
const LIVE_SCRIPT: &str = "if(window.EventSource){var es=new EventSource('/admin/events');es.addEventListener('tool',function(){window.location.reload()});}";

/// Stock page: summary cards for the whole collection, the search form and
/// the filtered list.
pub fn stock_page(summary: &StockSummary, query: &ToolQuery, visible: &[Tool], total: usize) -> Node {
    let mut list = el("div")
        .class("card")
        .attr("id", "tools-list")
        .child(el("h3").text("Ferramentas em Estoque"))
        .child(el("p").class("note tools-count").text(format!("{} de {} ferramentas", visible.len(), total)));
    list = if visible.is_empty() {
        list.child(
            el("div")
                .attr("style", "text-align:center;padding:60px 20px;")
                .child(el("h4").text("Nenhuma ferramenta encontrada"))
                .child(el("p").class("note").text("Ajuste os filtros de busca ou adicione uma nova ferramenta.")),
        )
    } else {
        list.child(el("div").class("grid").children(visible.iter().map(tool_card)))
    };
    Node::Fragment(vec![
        summary_cards(summary).into(),
        search_form(query).into(),
        list.into(),
        el("script").child(super::html::raw(LIVE_SCRIPT)).into(),
    ])
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolFormValues {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub min_quantity: String,
    pub location: String,
}

impl From<&Tool> for ToolFormValues {
    fn from(t: &Tool) -> Self {
        Self {
            name: t.name.clone(),
            description: t.description.clone().unwrap_or_default(),
            quantity: t.quantity.to_string(),
            min_quantity: t.min_quantity.to_string(),
            location: t.location.clone().unwrap_or_default(),
        }
    }
}

pub fn tool_form(title: &str, action: &str, values: &ToolFormValues, error: Option<&str>) -> Node {
    let mut card = el("div").class("card modal").child(el("h3").class("modal-title").text(title));
    if let Some(msg) = error {
        card = card.child(super::layout::alert(msg));
    }
    let form = el("form")
        .class("form")
        .attr("method", "post")
        .attr("action", action)
        .child(el("input").attr("type", "text").attr("name", "name").attr("placeholder", "Nome da ferramenta").attr("value", values.name.as_str()).flag("required", true))
        .child(el("textarea").attr("name", "description").attr("placeholder", "Descrição (opcional)").attr("rows", "3").text(values.description.as_str()))
        .child(el("input").attr("type", "number").attr("name", "quantity").attr("placeholder", "Quantidade atual").attr("min", "0").attr("value", values.quantity.as_str()))
        .child(el("input").attr("type", "number").attr("name", "min_quantity").attr("placeholder", "Quantidade mínima").attr("min", "0").attr("value", values.min_quantity.as_str()))
        .child(el("input").attr("type", "text").attr("name", "location").attr("placeholder", "Localização (opcional)").attr("value", values.location.as_str()))
        .child(
            el("div")
                .attr("style", "display:flex;gap:12px;margin-top:20px;")
                .child(el("button").class("btn").attr("type", "submit").text("Salvar"))
                .child(el("a").class("btn btn-secondary").attr("href", Route::Stock.path()).text("Cancelar")),
        );
    card.child(form).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tool(name: &str, q: i64, min: i64) -> Tool {
        Tool { id: name.to_lowercase(), name: name.into(), description: None, quantity: q, min_quantity: min, location: None, updated_at: Utc::now() }
    }

    #[test]
    fn page_shows_counter_and_badges() {
        let tools = vec![tool("Drill", 2, 5), tool("Saw", 9, 1)];
        let summary = StockSummary::from_tools(&tools);
        let html = stock_page(&summary, &ToolQuery::default(), &tools[..1], tools.len()).render();
        assert!(html.contains("1 de 2 ferramentas"));
        assert!(html.contains("status-badge warning"));
        assert!(html.contains("Estoque Baixo"));
        assert!(html.contains("Não informado"));
        assert!(html.contains("Média por Item"));
    }

    #[test]
    fn empty_result_shows_hint() {
        let html = stock_page(&StockSummary::default(), &ToolQuery::default(), &[], 0).render();
        assert!(html.contains("Nenhuma ferramenta encontrada"));
    }

    #[test]
    fn criteria_survive_in_form_and_exports() {
        let query = ToolQuery::from_params(Some("serra circular"), Some("low"), Some("quantity"));
        let html = stock_page(&StockSummary::default(), &query, &[], 0).render();
        assert!(html.contains("value=\"serra circular\""));
        assert!(html.contains("<option value=\"low\" selected>"));
        assert!(html.contains("export.csv?q=serra%20circular&amp;status=low&amp;sort=quantity"));
    }
}
