use dioxus::prelude::*;

use crate::domain::Role;
use crate::ui::theme;

/// Headline number with a caption, used in the dashboard stat rows.
#[component]
pub fn KpiCard(
    title: String,
    value: String,
    description: Option<String>,
    role: Option<Role>,
    #[props(default)] tone: Option<&'static str>,
) -> Element {
    let value_class = tone.unwrap_or(theme::text_primary(role));
    rsx! {
        div {
            class: "{theme::panel_border(role)} p-4 shadow-sm",
            h3 { class: "{theme::LABEL}", "{title}" }
            p { class: "mt-2 text-2xl font-semibold {value_class}", "{value}" }
            if let Some(desc) = description {
                p { class: "mt-1 text-xs {theme::TEXT_MUTED}", "{desc}" }
            }
        }
    }
}
