use dioxus::prelude::*;

use crate::domain::{OrderStatus, Priority, Role, Severity};

const PILL: &str = "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium capitalize";

#[component]
pub fn StatusBadge(status: OrderStatus) -> Element {
    let color = match status {
        OrderStatus::Pending => "bg-amber-500/10 text-amber-300 border-amber-500/40",
        OrderStatus::Processing => "bg-sky-500/10 text-sky-300 border-sky-500/40",
        OrderStatus::Shipped => "bg-violet-500/10 text-violet-300 border-violet-500/40",
        OrderStatus::Delivered => "bg-emerald-500/10 text-emerald-300 border-emerald-500/40",
    };

    rsx! {
        span { class: "{PILL} {color}", "{status.label()}" }
    }
}

#[component]
pub fn PriorityBadge(priority: Priority) -> Element {
    let color = match priority {
        Priority::High => "bg-rose-500/10 text-rose-300 border-rose-500/40",
        Priority::Medium => "bg-amber-500/10 text-amber-300 border-amber-500/40",
        Priority::Low => "bg-slate-700/40 text-slate-300 border-slate-600/60",
    };

    rsx! {
        span { class: "{PILL} {color}", "{priority.label()} priority" }
    }
}

#[component]
pub fn SeverityBadge(severity: Severity) -> Element {
    let color = match severity {
        Severity::High => "bg-rose-500/10 text-rose-300 border-rose-500/40",
        Severity::Medium => "bg-amber-500/10 text-amber-300 border-amber-500/40",
        Severity::Low => "bg-slate-700/40 text-slate-300 border-slate-600/60",
    };

    rsx! {
        span { class: "{PILL} {color}", "{severity.label()}" }
    }
}

#[component]
pub fn RoleBadge(role: Role) -> Element {
    let color = match role {
        Role::User => "bg-sky-500/10 text-sky-300 border-sky-500/40",
        Role::Admin => "bg-violet-500/10 text-violet-300 border-violet-500/40",
        Role::Warehouse => "bg-emerald-500/10 text-emerald-300 border-emerald-500/40",
    };

    rsx! {
        span { class: "{PILL} {color}", "{role.label()}" }
    }
}

/// Green "In stock (n)" or red "Out of stock".
#[component]
pub fn StockBadge(stock: u32, out_of_stock: bool) -> Element {
    if out_of_stock || stock == 0 {
        rsx! {
            span { class: "{PILL} bg-rose-500/10 text-rose-300 border-rose-500/40", "Out of stock" }
        }
    } else {
        rsx! {
            span { class: "{PILL} bg-emerald-500/10 text-emerald-300 border-emerald-500/40", "In stock ({stock})" }
        }
    }
}
