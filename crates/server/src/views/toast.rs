use super::html::{el, raw, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: &'static str,
}

/// Codes carried in the `toast` query parameter after a redirect.
pub mod codes {
    pub const SERVICE_CREATED: &str = "service_created";
    pub const SERVICE_UPDATED: &str = "service_updated";
    pub const SERVICE_DELETED: &str = "service_deleted";
    pub const SERVICE_PUBLISHED: &str = "service_published";
    pub const SERVICE_HIDDEN: &str = "service_hidden";
    pub const SERVICE_SAVE_FAILED: &str = "service_save_failed";
    pub const SERVICE_DELETE_FAILED: &str = "service_delete_failed";
    pub const UPLOAD_FAILED: &str = "upload_failed";
    pub const TOOL_CREATED: &str = "tool_created";
    pub const TOOL_UPDATED: &str = "tool_updated";
    pub const TOOL_DELETED: &str = "tool_deleted";
    pub const TOOL_CREATE_FAILED: &str = "tool_create_failed";
    pub const TOOL_UPDATE_FAILED: &str = "tool_update_failed";
    pub const TOOL_DELETE_FAILED: &str = "tool_delete_failed";
    pub const EXPORT_FAILED: &str = "export_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const LOGGED_OUT: &str = "logged_out";
}

impl Toast {
    pub fn from_code(code: &str) -> Option<Toast> {
        use codes::*;
        use ToastKind::*;
        let (kind, message) = match code {
            SERVICE_CREATED => (Success, "Serviço cadastrado com sucesso!"),
            SERVICE_UPDATED => (Success, "Serviço atualizado com sucesso!"),
            SERVICE_DELETED => (Success, "Serviço excluído com sucesso!"),
            SERVICE_PUBLISHED => (Info, "Serviço agora está público."),
            SERVICE_HIDDEN => (Info, "Serviço agora está privado."),
            SERVICE_SAVE_FAILED => (Error, "Erro ao salvar serviço!"),
            SERVICE_DELETE_FAILED => (Error, "Erro ao excluir serviço!"),
            UPLOAD_FAILED => (Error, "Falha no envio das imagens. Nada foi salvo."),
            TOOL_CREATED => (Success, "Ferramenta adicionada com sucesso!"),
            TOOL_UPDATED => (Success, "Ferramenta atualizada com sucesso!"),
            TOOL_DELETED => (Success, "Ferramenta excluída com sucesso!"),
            TOOL_CREATE_FAILED => (Error, "Erro ao adicionar ferramenta!"),
            TOOL_UPDATE_FAILED => (Error, "Erro ao atualizar ferramenta!"),
            TOOL_DELETE_FAILED => (Error, "Erro ao excluir ferramenta!"),
            EXPORT_FAILED => (Error, "Erro ao gerar a exportação!"),
            NOT_FOUND => (Warning, "Registro não encontrado."),
            LOGGED_OUT => (Info, "Logout realizado com sucesso!"),
            _ => return None,
        };
        Some(Toast { kind, message })
    }

    pub fn error(message: &'static str) -> Toast {
        Toast { kind: ToastKind::Error, message }
    }
}

/// Dismisses every toast after three seconds.
const DISMISS_SCRIPT: &str = "setTimeout(function(){document.querySelectorAll('#toast-container .toast').forEach(function(t){t.classList.add('slide-out');setTimeout(function(){t.remove()},300)})},3000);";

pub fn render(toast: Option<Toast>) -> Node {
    let container = el("div").attr("id", "toast-container");
    match toast {
        None => container.into(),
        Some(t) => container
            .child(el("div").class(format!("toast {}", t.kind.class())).child(el("span").text(t.message)))
            .child(el("script").child(raw(DISMISS_SCRIPT)))
            .into(),
    }
}
