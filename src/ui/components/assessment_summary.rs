use dioxus::prelude::*;

use crate::domain::{AssessmentSummary as Summary, PartOption, Role};
use crate::ui::theme;

/// Live valuation, repair cost and profit for the assessment in progress.
#[component]
pub fn AssessmentSummary(
    summary: Summary,
    device_name: Option<String>,
    parts: Vec<PartOption>,
    on_remove_part: EventHandler<String>,
) -> Element {
    let role = Some(Role::User);
    let (verdict, frame) = if device_name.is_none() {
        ("Select a device", "border-slate-700 bg-slate-900/40 text-slate-300")
    } else if summary.profit > 0.0 {
        ("Profitable", "border-emerald-500/40 bg-emerald-500/10 text-emerald-200")
    } else {
        ("Not profitable", "border-rose-500/40 bg-rose-500/10 text-rose-200")
    };

    rsx! {
        div {
            class: "{theme::panel_border(role)} p-5 space-y-4",
            h3 { class: "text-lg font-semibold {theme::text_primary(role)}", "Assessment Results" }
            if let Some(name) = device_name.as_ref() {
                p { class: "text-sm {theme::TEXT_MUTED}", "{name}" }
            }
            dl {
                class: "space-y-2 text-sm",
                div {
                    class: "flex justify-between",
                    dt { class: "{theme::TEXT_SECONDARY}", "Estimated value" }
                    dd { class: "font-semibold {theme::money_tone(summary.valuation as f64)}",
                        "{theme::format_whole_money(summary.valuation)}"
                    }
                }
                div {
                    class: "flex justify-between",
                    dt { class: "{theme::TEXT_SECONDARY}", "Repair cost" }
                    dd { class: "font-semibold text-rose-300", "{theme::format_money(summary.repair_cost)}" }
                }
                div {
                    class: "flex justify-between border-t border-slate-800 pt-2",
                    dt { class: "font-semibold {theme::TEXT_SECONDARY}", "Potential profit" }
                    dd { class: "text-lg font-bold {theme::money_tone(summary.profit)}",
                        "{theme::format_money(summary.profit)}"
                    }
                }
            }
            div {
                class: "rounded-xl border px-4 py-2 text-xs font-semibold uppercase tracking-wide {frame}",
                "{verdict}"
            }
            if !parts.is_empty() {
                div {
                    class: "space-y-2",
                    h4 { class: "{theme::LABEL}", "Selected parts" }
                    ul {
                        class: "space-y-1",
                        for part in parts {
                            SelectedPartRow { part, on_remove: on_remove_part }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SelectedPartRow(part: PartOption, on_remove: EventHandler<String>) -> Element {
    let name = part.name.clone();
    rsx! {
        li {
            class: "flex items-center justify-between gap-2 text-sm",
            span { class: "{theme::TEXT_SECONDARY}", "{part.name} " span { class: "{theme::TEXT_MUTED} capitalize", "({part.quality.label()})" } }
            span { class: "flex items-center gap-2",
                span { class: "{theme::TEXT_SECONDARY}", "{theme::format_money(part.price)}" }
                button {
                    class: "text-xs text-slate-500 hover:text-rose-300",
                    title: "Remove",
                    onclick: move |_| on_remove.call(name.clone()),
                    "×"
                }
            }
        }
    }
}
