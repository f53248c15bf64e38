//! Minimal HTML node tree. Views build `Node`s; only `render` produces text.

const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "input", "meta", "link"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Trusted markup, emitted as is (inline scripts and styles).
    Raw(String),
    Fragment(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

pub fn el(tag: &'static str) -> Element {
    Element { tag, attrs: Vec::new(), children: Vec::new() }
}

pub fn text<S: Into<String>>(s: S) -> Node {
    Node::Text(s.into())
}

pub fn raw<S: Into<String>>(s: S) -> Node {
    Node::Raw(s.into())
}

pub fn fragment<I: IntoIterator<Item = Node>>(nodes: I) -> Node {
    Node::Fragment(nodes.into_iter().collect())
}

impl Element {
    pub fn attr<V: Into<String>>(mut self, name: &'static str, value: V) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Boolean attribute, present only when `on`.
    pub fn flag(self, name: &'static str, on: bool) -> Self {
        if on { self.attr(name, "") } else { self }
    }

    pub fn class<V: Into<String>>(self, value: V) -> Self {
        self.attr("class", value)
    }

    pub fn child<N: Into<Node>>(mut self, node: N) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text<S: Into<String>>(self, s: S) -> Self {
        self.child(Node::Text(s.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl Node {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&escape(t)),
            Node::Raw(r) => out.push_str(r),
            Node::Fragment(nodes) => nodes.iter().for_each(|n| n.write_to(out)),
            Node::Element(e) => {
                out.push('<');
                out.push_str(e.tag);
                for (k, v) in &e.attrs {
                    out.push(' ');
                    out.push_str(k);
                    if !v.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape(v));
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_TAGS.contains(&e.tag) {
                    return;
                }
                e.children.iter().for_each(|c| c.write_to(out));
                out.push_str("</");
                out.push_str(e.tag);
                out.push('>');
            }
        }
    }

    /// Concatenated text content, for assertions.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Raw(_) => String::new(),
            Node::Fragment(nodes) => nodes.iter().map(Node::text_content).collect(),
            Node::Element(e) => e.children.iter().map(Node::text_content).collect(),
        }
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_attributes_are_escaped() {
        let node: Node = el("a").attr("href", "/x?a=1&b=\"2\"").text("<b>Tom & Jerry</b>").into();
        assert_eq!(node.render(), "<a href=\"/x?a=1&amp;b=&quot;2&quot;\">&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</a>");
    }

    #[test]
    fn void_elements_have_no_close_tag() {
        let node: Node = el("img").attr("src", "a.png").flag("hidden", true).into();
        assert_eq!(node.render(), "<img src=\"a.png\" hidden>");
    }

    #[test]
    fn raw_is_not_escaped() {
        let node: Node = el("script").child(raw("if (a < b) {}")).into();
        assert_eq!(node.render(), "<script>if (a < b) {}</script>");
    }
}
