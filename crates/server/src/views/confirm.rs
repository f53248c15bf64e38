use super::html::{el, Node};

/// Confirmation dialog guarding a destructive action. Confirming posts to
/// `action`; cancelling goes back to `cancel_href`.
pub fn confirm_delete(subject: &str, name: &str, action: &str, cancel_href: &str) -> Node {
    el("div")
        .class("card modal")
        .attr("role", "dialog")
        .attr("style", "text-align:center;")
        .child(el("h3").class("modal-title").text("Confirmar Exclusão"))
        .child(el("p").attr("style", "font-size:1.05rem;").text(format!("Tem certeza que deseja excluir {subject} \"{name}\"?")))
        .child(el("p").class("note").text("Esta ação não pode ser desfeita."))
        .child(
            el("div")
                .attr("style", "display:flex;gap:12px;justify-content:center;")
                .child(
                    el("form")
                        .attr("method", "post")
                        .attr("action", action)
                        .child(el("button").class("btn btn-danger").attr("type", "submit").text("Excluir")),
                )
                .child(el("a").class("btn btn-secondary").attr("href", cancel_href).text("Cancelar")),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_posts_to_action() {
        let html = confirm_delete("a ferramenta", "Drill", "/admin/tools/1/delete", "/admin/tools").render();
        assert!(html.contains("Tem certeza que deseja excluir a ferramenta &quot;Drill&quot;?"));
        assert!(html.contains("action=\"/admin/tools/1/delete\""));
        assert!(html.contains("href=\"/admin/tools\""));
    }
}
