use dioxus::prelude::*;

use crate::domain::{Order, OrderFilter, OrderStatus, Role, StatusCounts};
use crate::infra::repository::{Repository, RepositoryError};
use crate::infra::services::Services;
use crate::ui::components::kpi_card::KpiCard;
use crate::ui::components::order_card::{OrderCard, OrderDetails};
use crate::ui::components::toast::{push_toast, ToastKind, Toasts};
use crate::ui::theme;

const ROLE: Option<Role> = Some(Role::Warehouse);

#[derive(Clone, Debug)]
enum OrderAction {
    Toggle { order_id: String, item_id: String, revision: u64 },
    Advance { order_id: String, revision: u64 },
}

#[component]
pub fn WarehouseDashboardPage() -> Element {
    let services = use_context::<Services>();
    let toasts = use_context::<Toasts>();

    let mut refresh = use_signal(|| 0u32);
    let mut search = use_signal(String::new);
    let mut status_filter = use_signal(|| None::<OrderStatus>);
    let mut details = use_signal(|| None::<String>);

    let orders = use_resource({
        let repo = services.orders.clone();
        move || {
            let repo = repo.clone();
            let _ = refresh();
            async move { repo.list(&OrderFilter::default()).await }
        }
    });

    let all_orders: Vec<Order> = match orders.read().clone() {
        Some(Ok(list)) => list,
        Some(Err(err)) => {
            tracing::warn!("failed to load orders: {err}");
            Vec::new()
        }
        None => Vec::new(),
    };
    let counts = StatusCounts::tally(&all_orders);
    let filter = OrderFilter {
        status: status_filter(),
        search: search(),
    };
    let visible: Vec<Order> = filter.apply(&all_orders).into_iter().cloned().collect();
    let detail_order = details().and_then(|id| all_orders.iter().find(|order| order.id == id).cloned());

    let run = {
        let services = services.clone();
        move |action: OrderAction| {
            let services = services.clone();
            spawn(async move {
                let result = match &action {
                    OrderAction::Toggle { order_id, item_id, revision } => {
                        services.toggle_item(order_id, item_id, *revision).await
                    }
                    OrderAction::Advance { order_id, revision } => {
                        services.advance_order(order_id, *revision).await
                    }
                };
                match (result, action) {
                    (Ok(order), OrderAction::Advance { .. }) => {
                        tracing::info!(order = %order.id, status = order.status.label(), "order advanced");
                        push_toast(
                            toasts,
                            ToastKind::Success,
                            format!("{} is now {}.", order.id, order.status.label()),
                        );
                    }
                    (Ok(_), OrderAction::Toggle { .. }) => {}
                    (Err(err @ RepositoryError::Conflict { .. }), _) => {
                        push_toast(toasts, ToastKind::Warning, format!("{err}. Reloaded the latest copy."));
                    }
                    (Err(err), _) => push_toast(toasts, ToastKind::Error, err.to_string()),
                }
                refresh.with_mut(|n| *n += 1);
            });
        }
    };

    rsx! {
        section {
            class: "space-y-6",
            div {
                h2 { class: "text-3xl font-bold", "Warehouse Dashboard" }
                p { class: "text-sm {theme::TEXT_MUTED}", "Pick, pack and ship incoming parts orders." }
            }

            div {
                class: "grid gap-4 sm:grid-cols-2 lg:grid-cols-4",
                for status in OrderStatus::ALL {
                    KpiCard {
                        key: "{status.label()}",
                        title: status_title(status),
                        value: counts.get(status).to_string(),
                        role: ROLE,
                    }
                }
            }

            div {
                class: "flex flex-wrap gap-3",
                input {
                    class: "{theme::input_class(ROLE)} max-w-sm",
                    r#type: "search",
                    placeholder: "Search by order id or customer",
                    value: "{search}",
                    oninput: move |evt| search.set(evt.value()),
                }
                select {
                    class: "{theme::input_class(ROLE)} max-w-xs",
                    onchange: move |evt| status_filter.set(OrderStatus::parse(&evt.value())),
                    option { value: "all", selected: status_filter().is_none(), "All statuses" }
                    for status in OrderStatus::ALL {
                        option {
                            value: "{status.label()}",
                            selected: status_filter() == Some(status),
                            "{status_title(status)}"
                        }
                    }
                }
            }

            if orders.read().is_none() {
                p { class: "text-sm {theme::TEXT_MUTED}", "Loading orders…" }
            } else if visible.is_empty() {
                div {
                    class: "{theme::panel_border(ROLE)} p-6 text-center text-sm {theme::TEXT_MUTED}",
                    "No orders match the current filters."
                }
            }

            div {
                class: "grid gap-4 xl:grid-cols-2",
                for order in visible {
                    OrderCard {
                        key: "{order.id}",
                        order: order.clone(),
                        on_toggle_item: {
                            let run = run.clone();
                            let (order_id, revision) = (order.id.clone(), order.revision);
                            move |item_id: String| {
                                run(OrderAction::Toggle { order_id: order_id.clone(), item_id, revision })
                            }
                        },
                        on_advance: {
                            let run = run.clone();
                            let (order_id, revision) = (order.id.clone(), order.revision);
                            move |_| run(OrderAction::Advance { order_id: order_id.clone(), revision })
                        },
                        on_details: {
                            let order_id = order.id.clone();
                            move |_| details.set(Some(order_id.clone()))
                        },
                    }
                }
            }

            if let Some(order) = detail_order {
                OrderDetails { order, on_close: move |_| details.set(None) }
            }
        }
    }
}

fn status_title(status: OrderStatus) -> String {
    let label = status.label();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_titles_are_capitalised() {
        assert_eq!(status_title(OrderStatus::Pending), "Pending");
        assert_eq!(status_title(OrderStatus::Delivered), "Delivered");
    }
}
