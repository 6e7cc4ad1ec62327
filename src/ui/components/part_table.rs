use dioxus::prelude::*;

use super::badges::StockBadge;
use crate::domain::{Part, Role};
use crate::ui::theme;

const ROLE: Option<Role> = Some(Role::Admin);

#[component]
pub fn PartTable(
    parts: Vec<Part>,
    on_edit: EventHandler<Part>,
    on_delete: EventHandler<Part>,
) -> Element {
    let is_empty = parts.is_empty();
    rsx! {
        div {
            class: "{theme::panel_border(ROLE)} overflow-hidden",
            table {
                class: "min-w-full text-sm",
                thead {
                    class: "{theme::table_header(ROLE)} text-left tracking-wide",
                    tr {
                        th { class: "px-4 py-3 font-medium", "Part" }
                        th { class: "px-4 py-3 font-medium", "Category" }
                        th { class: "px-4 py-3 font-medium", "Budget" }
                        th { class: "px-4 py-3 font-medium", "Premium" }
                        th { class: "px-4 py-3 font-medium", "Refurbished" }
                        th { class: "px-4 py-3 font-medium", "Stock" }
                        th { class: "px-4 py-3" }
                    }
                }
                tbody {
                    class: "divide-y divide-slate-800",
                    for part in parts {
                        PartRow { key: "{part.id}", part, on_edit, on_delete }
                    }
                    if is_empty {
                        tr {
                            td {
                                class: "px-4 py-6 text-center {theme::TEXT_MUTED}",
                                colspan: "7",
                                "No parts in the catalog."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PartRow(part: Part, on_edit: EventHandler<Part>, on_delete: EventHandler<Part>) -> Element {
    let edited = part.clone();
    let deleted = part.clone();
    rsx! {
        tr {
            class: "hover:bg-slate-800/40",
            td { class: "px-4 py-3 font-medium {theme::TEXT_SECONDARY}", "{part.name}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{part.category}" }
            td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{theme::format_money(part.prices.budget)}" }
            td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{theme::format_money(part.prices.premium)}" }
            td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{theme::format_money(part.prices.refurbished)}" }
            td {
                class: "px-4 py-3",
                StockBadge { stock: part.stock, out_of_stock: part.out_of_stock }
            }
            td {
                class: "px-4 py-3 text-right",
                div {
                    class: "flex justify-end gap-2",
                    button {
                        class: "{theme::btn_small(ROLE)}",
                        onclick: move |_| on_edit.call(edited.clone()),
                        "Edit"
                    }
                    button {
                        class: "{theme::BTN_SMALL_DANGER}",
                        onclick: move |_| on_delete.call(deleted.clone()),
                        "Delete"
                    }
                }
            }
        }
    }
}
