use std::time::Duration;

use dioxus::prelude::*;

use crate::util::generate_id;

const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(5);
const MAX_VISIBLE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            text: text.into(),
        }
    }
}

pub type Toasts = Signal<Vec<ToastMessage>>;

/// Queues a notification; the oldest one is dropped past [`MAX_VISIBLE`].
pub fn push_toast(mut toasts: Toasts, kind: ToastKind, message: impl Into<String>) {
    let text = message.into();
    match kind {
        ToastKind::Error => tracing::warn!(%text, "error toast"),
        _ => tracing::debug!(?kind, %text, "toast"),
    }
    toasts.with_mut(|entries| {
        if entries.len() >= MAX_VISIBLE {
            entries.remove(0);
        }
        entries.push(ToastMessage::new(kind, text));
    });
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Toasts>();
    let messages = toasts();

    if messages.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div {
            class: "pointer-events-none fixed right-4 top-20 z-50 flex flex-col gap-3",
            for message in messages {
                ToastCard { key: "{message.id}", message, toasts }
            }
        }
    }
}

#[component]
fn ToastCard(message: ToastMessage, toasts: Toasts) -> Element {
    let timer_id = message.id.clone();
    let _auto_dismiss = use_future(move || {
        let mut toasts = toasts;
        let id = timer_id.clone();
        async move {
            tokio::time::sleep(TOAST_AUTO_DISMISS).await;
            toasts.with_mut(|items| items.retain(|toast| toast.id != id));
        }
    });

    let theme = match message.kind {
        ToastKind::Info => "border-sky-500/40 bg-sky-950 text-sky-100",
        ToastKind::Success => "border-emerald-500/40 bg-emerald-950 text-emerald-100",
        ToastKind::Warning => "border-amber-500/40 bg-amber-950 text-amber-100",
        ToastKind::Error => "border-rose-500/40 bg-rose-950 text-rose-100",
    };
    let dismiss_id = message.id.clone();

    rsx! {
        div {
            class: "pointer-events-auto flex max-w-sm items-start gap-3 rounded-xl border px-4 py-3 shadow-lg {theme}",
            p { class: "flex-1 text-sm font-medium", "{message.text}" }
            button {
                class: "text-sm text-slate-400 hover:text-white",
                title: "Dismiss",
                onclick: move |_| {
                    let mut toasts = toasts;
                    toasts.with_mut(|items| items.retain(|toast| toast.id != dismiss_id));
                },
                "×"
            }
        }
    }
}
