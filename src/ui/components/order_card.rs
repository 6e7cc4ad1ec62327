use dioxus::prelude::*;

use super::badges::{PriorityBadge, StatusBadge};
use crate::domain::{Order, OrderItem, Role};
use crate::ui::theme;

const ROLE: Option<Role> = Some(Role::Warehouse);

/// One order in the fulfillment queue: pick list, address and the next
/// status action.
#[component]
pub fn OrderCard(
    order: Order,
    on_toggle_item: EventHandler<String>,
    on_advance: EventHandler<()>,
    on_details: EventHandler<()>,
) -> Element {
    let picked = order.picked_count();
    let total_items = order.items.len();
    let blocked_reason = order.can_advance().err().map(|err| err.to_string());
    let action = order.status.action_label();
    let editable = !order.status.is_terminal();

    rsx! {
        div {
            class: "{theme::panel_border(ROLE)} p-5 space-y-4",
            div {
                class: "flex flex-wrap items-start justify-between gap-3",
                div {
                    h3 { class: "text-lg font-semibold {theme::text_primary(ROLE)}", "{order.id}" }
                    p { class: "text-sm {theme::TEXT_SECONDARY}", "{order.customer_name}" }
                    p { class: "text-xs {theme::TEXT_MUTED}", "Ordered {order.order_date}" }
                }
                div {
                    class: "flex items-center gap-2",
                    StatusBadge { status: order.status }
                    PriorityBadge { priority: order.priority }
                    span { class: "font-semibold {theme::TEXT_SECONDARY}", "{theme::format_money(order.total_amount)}" }
                }
            }
            div {
                h4 { class: "{theme::LABEL}", "Items" }
                ul {
                    class: "mt-2 space-y-1",
                    for item in order.items.clone() {
                        PickRow { key: "{item.id}", item, editable, on_toggle: on_toggle_item }
                    }
                }
            }
            div {
                h4 { class: "{theme::LABEL}", "Shipping address" }
                p { class: "mt-1 text-sm {theme::TEXT_SECONDARY}", "{order.shipping_address}" }
            }
            div {
                class: "flex flex-wrap items-center justify-between gap-3 border-t border-slate-800 pt-3",
                span { class: "text-sm {theme::TEXT_MUTED}", "{picked}/{total_items} items picked" }
                div {
                    class: "flex gap-2",
                    button {
                        class: "{theme::btn_secondary(ROLE)}",
                        onclick: move |_| on_details.call(()),
                        "Details"
                    }
                    if let Some(label) = action {
                        button {
                            class: "{theme::btn_primary(ROLE)}",
                            disabled: blocked_reason.is_some(),
                            title: blocked_reason.clone().unwrap_or_default(),
                            onclick: move |_| on_advance.call(()),
                            "{label}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PickRow(item: OrderItem, editable: bool, on_toggle: EventHandler<String>) -> Element {
    let item_id = item.id.clone();
    let line_total = item.unit_price * item.quantity as f64;
    let text = if item.picked {
        "line-through text-slate-500"
    } else {
        theme::TEXT_SECONDARY
    };
    rsx! {
        li {
            class: "flex items-center justify-between gap-3 text-sm",
            label {
                class: "flex items-center gap-2 {text}",
                input {
                    r#type: "checkbox",
                    checked: item.picked,
                    disabled: !editable,
                    onchange: move |_| on_toggle.call(item_id.clone()),
                }
                "{item.part_name} "
                span { class: "capitalize {theme::TEXT_MUTED}", "({item.quality.label()}) × {item.quantity}" }
            }
            span { class: "{theme::TEXT_SECONDARY}", "{theme::format_money(line_total)}" }
        }
    }
}

/// Read-only breakdown shown from the Details button.
#[component]
pub fn OrderDetails(order: Order, on_close: EventHandler<()>) -> Element {
    let items_total = order.items_total();
    let mismatch = !order.total_matches_items();
    rsx! {
        div {
            class: "fixed inset-0 z-40 flex items-center justify-center bg-black/60",
            div {
                class: "w-full max-w-lg rounded-xl border border-slate-700 bg-slate-900 p-6 shadow-lg space-y-4",
                div {
                    class: "flex items-center justify-between",
                    h3 { class: "text-lg font-semibold {theme::text_primary(ROLE)}", "Order {order.id}" }
                    button { class: "text-slate-400 hover:text-white", onclick: move |_| on_close.call(()), "×" }
                }
                div {
                    class: "grid grid-cols-2 gap-4 text-sm",
                    div {
                        h4 { class: "{theme::LABEL}", "Customer" }
                        p { class: "{theme::TEXT_SECONDARY}", "{order.customer_name}" }
                        p { class: "{theme::TEXT_MUTED}", "{order.shipping_address}" }
                    }
                    div {
                        h4 { class: "{theme::LABEL}", "Summary" }
                        p { class: "{theme::TEXT_SECONDARY}", "Date: {order.order_date}" }
                        p { class: "{theme::TEXT_SECONDARY}", "Total: {theme::format_money(order.total_amount)}" }
                        p { class: "{theme::TEXT_MUTED}", "Items: {theme::format_money(items_total)}" }
                        if mismatch {
                            p { class: "text-xs text-amber-300", "Order total differs from its line items." }
                        }
                        div { class: "mt-1 flex gap-2",
                            StatusBadge { status: order.status }
                            PriorityBadge { priority: order.priority }
                        }
                    }
                }
                table {
                    class: "min-w-full text-sm",
                    thead {
                        class: "{theme::table_header(ROLE)} text-left",
                        tr {
                            th { class: "px-3 py-2", "Part" }
                            th { class: "px-3 py-2", "Quality" }
                            th { class: "px-3 py-2", "Qty" }
                            th { class: "px-3 py-2", "Price" }
                        }
                    }
                    tbody {
                        class: "divide-y divide-slate-800",
                        for item in order.items.clone() {
                            tr {
                                key: "{item.id}",
                                td { class: "px-3 py-2 {theme::TEXT_SECONDARY}", "{item.part_name}" }
                                td { class: "px-3 py-2 capitalize {theme::TEXT_MUTED}", "{item.quality.label()}" }
                                td { class: "px-3 py-2 {theme::TEXT_SECONDARY}", "{item.quantity}" }
                                td { class: "px-3 py-2 {theme::TEXT_SECONDARY}", "{theme::format_money(item.unit_price)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
