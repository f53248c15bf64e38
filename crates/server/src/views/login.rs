use super::html::{el, fragment, raw, text, Node};

pub const MISSING_CREDENTIALS: &str = "Informe e-mail e senha.";
pub const LOGIN_FAILED: &str = "Falha no login. Tente novamente.";

pub fn login_page(next: &str, email: &str, message: Option<&str>) -> String {
    let form = el("form")
        .class("form card")
        .attr("id", "loginForm")
        .attr("method", "post")
        .attr("action", "/login")
        .child(el("h3").text("Acesso administrativo"))
        .child(el("input").attr("type", "hidden").attr("name", "next").attr("value", next))
        .child(el("input").attr("type", "email").attr("id", "email").attr("name", "email").attr("placeholder", "E-mail").attr("value", email))
        .child(el("input").attr("type", "password").attr("id", "password").attr("name", "password").attr("placeholder", "Senha"))
        .child(el("button").class("btn").attr("type", "submit").text("Entrar"))
        .child(el("p").attr("id", "msg").attr("role", "status").child(text(message.unwrap_or_default())));
    let head = el("head")
        .child(el("meta").attr("charset", "utf-8"))
        .child(el("title").text("Login · VIPI Matrizes"));
    let body = el("body").child(el("main").attr("style", "max-width:420px;margin:80px auto;").child(form));
    let html: Node = el("html").attr("lang", "pt-BR").child(head).child(body).into();
    fragment([raw("<!DOCTYPE html>"), html]).render()
}
