use super::html::{el, fragment, raw, text, Node};
use super::toast::{self, Toast};
use crate::nav::Route;

const STYLE: &str = r#"
:root{--sec2:#1f3b73;--muted:#6b7280;--border:#e5e7eb;--success:#28a745;--warning:#e0a800;--danger:#dc3545}
*{box-sizing:border-box}body{margin:0;font-family:system-ui,sans-serif;background:#f5f6fa;color:#111}
.topbar{display:flex;justify-content:space-between;align-items:center;padding:12px 24px;background:var(--sec2);color:#fff}
.topbar a{color:#fff;text-decoration:none;margin-left:16px}
main{max-width:1200px;margin:24px auto;padding:0 16px}
.card{background:#fff;border:1px solid var(--border);border-radius:14px;padding:20px;margin-bottom:20px}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:20px}
.stats-card{background:#fafbff;border:1px solid var(--border);border-radius:12px;padding:16px}
.btn{display:inline-block;padding:8px 14px;border-radius:8px;border:0;background:var(--sec2);color:#fff;text-decoration:none;cursor:pointer}
.btn-secondary{background:#6c757d}.btn-danger{background:var(--danger)}.btn-success{background:var(--success)}
.status-badge{padding:4px 10px;border-radius:999px;font-size:.8rem}.status-badge.warning{background:#fff3cd}.status-badge.success{background:#d4edda}
.form{display:flex;flex-direction:column;gap:12px}.form input,.form textarea,.form select{padding:8px;border:1px solid var(--border);border-radius:8px}
.alert{padding:10px;border-radius:8px;background:#f8d7da;color:#842029}
.note{color:var(--muted)}
#toast-container{position:fixed;top:16px;right:16px;z-index:50}
.toast{padding:12px 16px;border-radius:10px;margin-bottom:8px;color:#fff;transition:opacity .3s}
.toast.success{background:var(--success)}.toast.error{background:var(--danger)}.toast.warning{background:var(--warning)}.toast.info{background:var(--sec2)}
.toast.slide-out{opacity:0}
.img-cover{width:100%;height:180px;object-fit:cover;border-radius:10px}
.carousel{position:relative}.carousel .img{width:100%;max-height:420px;object-fit:contain}
.nav{position:absolute;top:45%;font-size:2rem;text-decoration:none;color:#fff;background:rgba(0,0,0,.4);padding:0 10px;border-radius:6px}
.nav.prev{left:8px}.nav.next{right:8px}
.lightbox-backdrop{position:fixed;inset:0;background:rgba(0,0,0,.85);display:flex;align-items:center;justify-content:center}
.lightbox{position:relative}.lightbox-img{max-width:90vw;max-height:90vh}
"#;

/// Top menu shown on every page.
pub fn menu() -> Node {
    let items = [
        ("Serviços", Route::ServiceList),
        ("Cadastrar Serviço", Route::ServiceNew),
        ("Catálogo Público", Route::Catalog),
        ("Estoque", Route::Stock),
        ("Sair", Route::Logout),
    ];
    el("nav")
        .class("menu")
        .attr("role", "menu")
        .children(items.into_iter().map(|(label, route)| el("a").attr("href", route.path()).attr("role", "menuitem").text(label)))
        .into()
}

fn document(title: &str, header_title: &str, toast: Option<Toast>, content: Node) -> String {
    let head = el("head")
        .child(el("meta").attr("charset", "utf-8"))
        .child(el("meta").attr("name", "viewport").attr("content", "width=device-width, initial-scale=1"))
        .child(el("title").text(format!("{title} · VIPI Matrizes")))
        .child(el("style").child(raw(STYLE)));
    let body = el("body")
        .child(
            el("header")
                .class("topbar")
                .child(el("div").class("brand").child(el("strong").text(header_title)))
                .child(menu()),
        )
        .child(el("main").attr("id", "content").child(content))
        .child(toast::render(toast))
        .child(el("div").attr("id", "modal-container"));
    let html: Node = el("html").attr("lang", "pt-BR").child(head).child(body).into();
    fragment([raw("<!DOCTYPE html>"), html]).render()
}

pub fn admin_page(title: &str, toast: Option<Toast>, content: Node) -> String {
    document(title, "Painel Administrativo", toast, content)
}

pub fn stock_page(title: &str, toast: Option<Toast>, content: Node) -> String {
    document(title, "Estoque de Ferramentas", toast, content)
}

pub fn public_page(title: &str, content: Node) -> String {
    document(title, "Catálogo de Serviços", None, content)
}

/// Inline validation message shown above a form.
pub fn alert(message: &str) -> Node {
    el("div").class("alert").attr("role", "alert").child(text(message)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_lists_all_sections() {
        let text = menu().text_content();
        for label in ["Serviços", "Cadastrar Serviço", "Catálogo Público", "Estoque", "Sair"] {
            assert!(text.contains(label), "missing {label}");
        }
        assert!(menu().render().contains("href=\"/admin/tools\""));
    }

    #[test]
    fn document_is_complete() {
        let html = admin_page("Serviços", None, el("p").text("oi").into());
        assert!(html.starts_with("<!DOCTYPE html><html lang=\"pt-BR\">"));
        assert!(html.contains("<p>oi</p>"));
        assert!(html.ends_with("</html>"));
    }
}
