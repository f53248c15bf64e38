//! Image gallery: an inline carousel that can expand to a full-screen
//! lightbox. The state lives in the URL (`?img=<i>&view=lightbox`), every
//! transition is a link, and a small key handler follows those links.

use super::html::{el, raw, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryState {
    Closed,
    Inline(usize),
    Lightbox(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryKey {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl GalleryKey {
    pub fn parse(key: &str) -> Self {
        match key {
            "Escape" => GalleryKey::Escape,
            "ArrowLeft" => GalleryKey::ArrowLeft,
            "ArrowRight" => GalleryKey::ArrowRight,
            _ => GalleryKey::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gallery {
    len: usize,
    state: GalleryState,
}

impl Gallery {
    pub fn new(len: usize) -> Self {
        Self { len, state: GalleryState::Closed }
    }

    /// Restore from query values; an out-of-range index wraps.
    pub fn from_query(len: usize, index: Option<usize>, view: Option<&str>) -> Self {
        let mut g = Self::new(len);
        if len == 0 {
            return g;
        }
        let i = index.unwrap_or(0) % len;
        g.state = match view {
            Some("lightbox") => GalleryState::Lightbox(i),
            _ => GalleryState::Inline(i),
        };
        g
    }

    pub fn state(&self) -> GalleryState { self.state }

    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            GalleryState::Closed => None,
            GalleryState::Inline(i) | GalleryState::Lightbox(i) => Some(i),
        }
    }

    /// Show image `i` inline. No-op without images.
    pub fn open(self, i: usize) -> Self {
        if self.len == 0 {
            return self;
        }
        Self { state: GalleryState::Inline(i % self.len), ..self }
    }

    /// Inline viewer to lightbox at the same image.
    pub fn expand(self) -> Self {
        match self.state {
            GalleryState::Inline(i) => Self { state: GalleryState::Lightbox(i), ..self },
            _ => self,
        }
    }

    pub fn next(self) -> Self {
        self.step(1)
    }

    pub fn prev(self) -> Self {
        self.step(self.len.saturating_sub(1))
    }

    fn step(self, by: usize) -> Self {
        if self.len == 0 {
            return self;
        }
        let state = match self.state {
            GalleryState::Closed => GalleryState::Closed,
            GalleryState::Inline(i) => GalleryState::Inline((i + by) % self.len),
            GalleryState::Lightbox(i) => GalleryState::Lightbox((i + by) % self.len),
        };
        Self { state, ..self }
    }

    /// Lightbox closes back to inline; inline closes the viewer.
    pub fn close(self) -> Self {
        let state = match self.state {
            GalleryState::Lightbox(i) => GalleryState::Inline(i),
            _ => GalleryState::Closed,
        };
        Self { state, ..self }
    }

    pub fn on_key(self, key: GalleryKey) -> Self {
        match key {
            GalleryKey::Escape => self.close(),
            GalleryKey::ArrowLeft => self.prev(),
            GalleryKey::ArrowRight => self.next(),
            GalleryKey::Other => self,
        }
    }
}

/// Link target for a gallery state. `Closed` leaves the detail page.
pub fn href(state: GalleryState, base: &str, closed_href: &str) -> String {
    match state {
        GalleryState::Closed => closed_href.to_string(),
        GalleryState::Inline(i) => format!("{base}?img={i}"),
        GalleryState::Lightbox(i) => format!("{base}?img={i}&view=lightbox"),
    }
}

const KEY_SCRIPT: &str = "document.addEventListener('keydown',function(e){var g=document.querySelector('[data-gallery]');if(!g)return;var t={Escape:g.dataset.close,ArrowLeft:g.dataset.prev,ArrowRight:g.dataset.next}[e.key];if(t){window.location.href=t}});";

/// Render the current state. `base` is the detail page path.
pub fn render(gallery: Gallery, images: &[String], alt: &str, base: &str, closed_href: &str) -> Node {
    let Some(i) = gallery.index() else {
        return Node::Fragment(Vec::new());
    };
    let Some(src) = images.get(i) else {
        return Node::Fragment(Vec::new());
    };
    let link = |g: Gallery| href(g.state(), base, closed_href);
    let lightbox = matches!(gallery.state(), GalleryState::Lightbox(_));

    let image = el("img").class(if lightbox { "lightbox-img" } else { "img" }).attr("src", src.as_str()).attr("alt", alt);
    let image: Node = if lightbox { image.into() } else { el("a").attr("href", link(gallery.expand())).child(image).into() };

    let mut frame = el("div")
        .class(if lightbox { "lightbox" } else { "carousel" })
        .attr("data-gallery", "")
        .attr("data-prev", link(gallery.prev()))
        .attr("data-next", link(gallery.next()))
        .attr("data-close", link(gallery.close()))
        .child(el("div").class("frame").child(image));
    if gallery.len() > 1 {
        frame = frame
            .child(el("a").class("nav prev").attr("href", link(gallery.prev())).text("‹"))
            .child(el("a").class("nav next").attr("href", link(gallery.next())).text("›"))
            .child(el("p").class("note").text(format!("{} / {}", i + 1, gallery.len())));
    }
    if lightbox {
        frame = frame.child(el("a").class("btn btn-secondary").attr("href", link(gallery.close())).text("Fechar"));
    }
    let frame: Node = if lightbox { el("div").class("lightbox-backdrop").child(frame).into() } else { frame.into() };
    Node::Fragment(vec![frame, el("script").child(raw(KEY_SCRIPT)).into()])
}
