use service::domain::PublicService;

use super::gallery::{self, Gallery};
use super::html::{el, Element, Node};
use crate::nav::Route;

pub const LOAD_FAILED: &str = "Falha ao carregar os serviços.";

fn card(svc: &PublicService) -> Element {
    let mut a = el("a").class("card").attr("href", Route::CatalogDetail(svc.id.clone()).path());
    if let Some(cover) = svc.cover() {
        a = a.child(el("img").class("img-cover").attr("src", cover).attr("alt", svc.name.as_str()));
    }
    a.child(el("h3").text(svc.name.as_str()))
        .child(el("p").text(svc.description.clone().unwrap_or_default()))
}

/// Public grid. `Err` renders the load-failure note instead of cards.
pub fn catalog_grid(services: Result<&[PublicService], ()>) -> Node {
    let grid = el("div").class("grid").attr("id", "services-grid");
    match services {
        Ok(list) => grid.children(list.iter().map(card)).into(),
        Err(()) => grid.child(el("p").class("note").text(LOAD_FAILED)).into(),
    }
}

/// Detail view with the image gallery.
pub fn service_detail(svc: &PublicService, gallery_state: Gallery) -> Node {
    let base = Route::CatalogDetail(svc.id.clone()).path();
    let closed = Route::Catalog.path();
    let mut content = el("div").class("content");
    if !svc.images.is_empty() {
        content = content.child(gallery::render(gallery_state, &svc.images, &svc.name, &base, &closed));
    }
    if let Some(desc) = &svc.description {
        content = content.child(el("h4").text("Descrição")).child(el("p").text(desc.as_str()));
    }
    el("div")
        .class("card modal")
        .child(el("header").child(el("h3").text(svc.name.as_str())))
        .child(content)
        .child(el("footer").child(el("a").class("btn").attr("href", closed).text("Fechar")))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn public(images: Vec<&str>) -> PublicService {
        let images: Vec<String> = images.into_iter().map(Into::into).collect();
        PublicService {
            id: "3".into(),
            name: "Afiação".into(),
            description: Some("Afiação de matrizes".into()),
            image_url: images.first().cloned(),
            images,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn grid_links_cards_to_detail() {
        let list = [public(vec!["c.png"])];
        let html = catalog_grid(Ok(&list[..])).render();
        assert!(html.contains("href=\"/catalog/3\""));
        assert!(html.contains("src=\"c.png\""));
    }

    #[test]
    fn failure_shows_note() {
        assert!(catalog_grid(Err(())).render().contains(LOAD_FAILED));
    }

    #[test]
    fn detail_without_images_has_no_gallery() {
        let svc = public(vec![]);
        let html = service_detail(&svc, Gallery::from_query(0, None, None)).render();
        assert!(!html.contains("data-gallery"));
        assert!(html.contains("Afiação de matrizes"));
    }
}
