use service::domain::Service;
use service::stats::ServiceSummary;

use super::html::{el, Element, Node};
use crate::nav::Route;

/// Values shown in the service form, either blank, from a stored record, or
/// echoed back after a failed submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceFormValues {
    pub name: String,
    pub description: String,
    pub execution_time_minutes: String,
    pub cost: String,
    pub is_public: bool,
    pub annotation: String,
    pub images: Vec<String>,
}

impl From<&Service> for ServiceFormValues {
    fn from(s: &Service) -> Self {
        Self {
            name: s.name.clone(),
            description: s.description.clone().unwrap_or_default(),
            execution_time_minutes: s.execution_time_minutes.map(|m| m.to_string()).unwrap_or_default(),
            cost: s.cost.map(|c| format!("{c:.2}")).unwrap_or_default(),
            is_public: s.is_public,
            annotation: s.annotation.as_ref().map(|a| a.display()).unwrap_or_default(),
            images: s.images.clone(),
        }
    }
}

/// `R$ 1.234,50`
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (int, frac) = (cents / 100, cents % 100);
    let digits = int.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac:02}")
}

fn stat(label: &str, value: usize) -> Element {
    el("div")
        .class("stats-card")
        .child(el("p").class("note").text(label))
        .child(el("h4").text(value.to_string()))
}

fn search_form(term: &str) -> Element {
    el("form")
        .attr("method", "get")
        .attr("action", Route::ServiceList.path())
        .attr("style", "display:flex;gap:8px;margin-top:12px;")
        .child(
            el("input")
                .attr("type", "search")
                .attr("name", "q")
                .attr("placeholder", "Buscar por nome ou descrição...")
                .attr("value", term),
        )
        .child(el("button").class("btn").attr("type", "submit").text("Buscar"))
}

/// Service list with counters for the listed services. `term` is the search
/// that produced `services` (empty for the full list).
pub fn service_list(services: &[Service], summary: ServiceSummary, term: &str) -> Node {
    let stats = el("div")
        .class("card")
        .child(el("h3").text("Serviços"))
        .child(
            el("div")
                .class("grid")
                .child(stat("Total", summary.total))
                .child(stat("Públicos", summary.public))
                .child(stat("Privados", summary.private)),
        )
        .child(el("a").class("btn").attr("href", Route::ServiceNew.path()).text("Cadastrar Serviço"))
        .child(search_form(term));

    let list = if services.is_empty() && !term.is_empty() {
        el("div")
            .class("card")
            .child(el("h4").text("Nenhum serviço encontrado"))
            .child(el("p").class("note").text(format!("Nada corresponde a \"{term}\".")))
    } else if services.is_empty() {
        el("div")
            .class("card")
            .child(el("h4").text("Nenhum serviço cadastrado"))
            .child(el("p").class("note").text("Use \"Cadastrar Serviço\" para adicionar o primeiro."))
    } else {
        el("div").class("grid").children(services.iter().map(service_card))
    };
    Node::Fragment(vec![stats.into(), list.into()])
}

fn service_card(s: &Service) -> Element {
    let mut card = el("div").class("card").attr("id", format!("service-{}", s.id));
    if let Some(cover) = s.cover() {
        card = card.child(el("img").class("img-cover").attr("src", cover).attr("alt", s.name.as_str()));
    }
    let badge = if s.is_public { ("success", "Público") } else { ("warning", "Privado") };
    card = card
        .child(
            el("div")
                .attr("style", "display:flex;justify-content:space-between;align-items:flex-start;")
                .child(el("h4").text(s.name.as_str()))
                .child(el("span").class(format!("status-badge {}", badge.0)).text(badge.1)),
        )
        .child(el("p").class("note").text(s.description.clone().unwrap_or_else(|| "Sem descrição".into())));

    let mut facts = el("ul").class("facts");
    if let Some(m) = s.execution_time_minutes {
        facts = facts.child(el("li").text(format!("Tempo: {m} min")));
    }
    if let Some(c) = s.cost {
        facts = facts.child(el("li").text(format!("Valor: {}", format_brl(c))));
    }
    if let Some(a) = &s.annotation {
        facts = facts.child(el("li").text(format!("Obs.: {}", a.display())));
    }
    if s.images.len() > 1 {
        facts = facts.child(el("li").text(format!("{} imagens", s.images.len())));
    }

    let toggle_label = if s.is_public { "Tornar privado" } else { "Tornar público" };
    let actions = el("div")
        .attr("style", "display:flex;gap:8px;flex-wrap:wrap;")
        .child(el("a").class("btn btn-secondary").attr("href", Route::ServiceEdit(s.id.clone()).path()).text("Editar"))
        .child(
            el("form")
                .attr("method", "post")
                .attr("action", visibility_path(&s.id))
                .child(el("input").attr("type", "hidden").attr("name", "public").attr("value", (!s.is_public).to_string()))
                .child(el("button").class("btn").attr("type", "submit").text(toggle_label)),
        )
        .child(el("a").class("btn btn-danger").attr("href", Route::ServiceDelete(s.id.clone()).path()).text("Excluir"));
    card.child(facts).child(actions)
}

pub fn visibility_path(id: &str) -> String {
    format!("/admin/services/{}/visibility", urlencoding::encode(id))
}

/// Create/edit form. Only the name is required.
pub fn service_form(title: &str, action: &str, values: &ServiceFormValues, error: Option<&str>) -> Node {
    let mut card = el("div").class("card").child(el("h3").text(title));
    if let Some(msg) = error {
        card = card.child(super::layout::alert(msg));
    }
    let field = |label: &str, input: Element| el("label").child(el("span").text(label)).child(input);

    let mut form = el("form")
        .class("form")
        .attr("method", "post")
        .attr("action", action)
        .attr("enctype", "multipart/form-data")
        .child(field("Nome *", el("input").attr("type", "text").attr("name", "name").attr("value", values.name.as_str()).flag("required", true)))
        .child(field("Descrição", el("textarea").attr("name", "description").attr("rows", "3").text(values.description.as_str())))
        .child(field(
            "Tempo de execução (min)",
            el("input").attr("type", "number").attr("name", "execution_time_minutes").attr("min", "0").attr("value", values.execution_time_minutes.as_str()),
        ))
        .child(field(
            "Valor cobrado (R$)",
            el("input").attr("type", "number").attr("name", "cost").attr("step", "0.01").attr("min", "0").attr("value", values.cost.as_str()),
        ))
        .child(
            el("label")
                .child(el("input").attr("type", "checkbox").attr("name", "is_public").attr("value", "true").flag("checked", values.is_public))
                .child(el("span").text(" Visível no catálogo público")),
        )
        .child(field("Observações", el("textarea").attr("name", "annotation").attr("rows", "3").text(values.annotation.as_str())))
        .child(field("Imagens", el("input").attr("type", "file").attr("name", "images").attr("accept", "image/*").flag("multiple", true)));

    if !values.images.is_empty() {
        form = form.child(
            el("div")
                .class("existing-images")
                .child(el("p").class("note").text("Imagens atuais (enviar novas substitui todas):"))
                .children(values.images.iter().map(|src| el("img").attr("src", src.as_str()).attr("style", "height:64px;margin-right:6px;border-radius:6px;"))),
        );
    }
    form = form.child(
        el("div")
            .attr("style", "display:flex;gap:12px;margin-top:20px;")
            .child(el("button").class("btn").attr("type", "submit").text("Salvar"))
            .child(el("a").class("btn btn-secondary").attr("href", Route::ServiceList.path()).text("Cancelar")),
    );
    card.child(form).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn svc(public: bool) -> Service {
        Service {
            id: "7".into(),
            name: "Retífica".into(),
            description: None,
            images: vec!["/uploads/a.png".into(), "/uploads/b.png".into()],
            image_url: Some("/uploads/a.png".into()),
            execution_time_minutes: Some(90),
            cost: Some(1234.5),
            is_public: public,
            annotation: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn currency_uses_brazilian_format() {
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
    }

    #[test]
    fn card_shows_cover_and_toggle() {
        let html = service_list(&[svc(false)], ServiceSummary { total: 1, public: 0, private: 1 }, "").render();
        assert!(html.contains("src=\"/uploads/a.png\""));
        assert!(html.contains("Tornar público"));
        assert!(html.contains("name=\"public\" value=\"true\""));
        assert!(html.contains("R$ 1.234,50"));
        assert!(html.contains("/admin/services/7/delete"));
    }

    #[test]
    fn empty_list_has_message() {
        let html = service_list(&[], ServiceSummary::default(), "").render();
        assert!(html.contains("Nenhum serviço cadastrado"));
    }

    #[test]
    fn search_term_is_echoed_with_its_own_empty_state() {
        let html = service_list(&[], ServiceSummary::default(), "pintura").render();
        assert!(html.contains("name=\"q\""));
        assert!(html.contains("value=\"pintura\""));
        assert!(html.contains("Nenhum serviço encontrado"));
        assert!(!html.contains("Nenhum serviço cadastrado"));
    }

    #[test]
    fn form_echoes_values_and_error() {
        let values = ServiceFormValues::from(&svc(true));
        let html = service_form("Editar Serviço", "/admin/services/7/edit", &values, Some("Informe o nome do serviço.")).render();
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("value=\"Retífica\""));
        assert!(html.contains("checked"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
    }
}
