use std::time::{SystemTime, UNIX_EPOCH};

use dioxus::prelude::*;

use crate::app::persist_user_state;
use crate::domain::{
    summarize, AppState, AssessmentRecord, ConditionTier, DefectId, Device, DeviceId, Part,
    PartOption, PartSelection, QualityTier, Role,
};
use crate::infra::repository::{DeviceFilter, PartFilter, Repository};
use crate::infra::services::Services;
use crate::ui::components::assessment_summary::AssessmentSummary;
use crate::ui::components::badges::SeverityBadge;
use crate::ui::components::kpi_card::KpiCard;
use crate::ui::components::toast::{push_toast, ToastKind, Toasts};
use crate::ui::theme;

const ROLE: Option<Role> = Some(Role::User);

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Assessment,
    History,
    Settings,
}

#[component]
pub fn UserDashboardPage() -> Element {
    let mut tab = use_signal(|| Tab::Assessment);

    let tab_button = |target: Tab, label: &'static str| {
        let class = toggle_class(tab() == target);
        rsx! {
            button { class: "{class}", onclick: move |_| tab.set(target), "{label}" }
        }
    };

    rsx! {
        section { class: "space-y-6",
            div { class: "flex flex-wrap items-center justify-between gap-4",
                h2 { class: "text-3xl font-bold", "User Dashboard" }
                div { class: "flex gap-2",
                    {tab_button(Tab::Assessment, "Assessment")}
                    {tab_button(Tab::History, "History")}
                    {tab_button(Tab::Settings, "Settings")}
                }
            }
            match tab() {
                Tab::Assessment => rsx! { AssessmentTab {} },
                Tab::History => rsx! { HistoryTab {} },
                Tab::Settings => rsx! { SettingsTab {} },
            }
        }
    }
}

fn toggle_class(active: bool) -> &'static str {
    if active {
        theme::btn_active(ROLE)
    } else {
        theme::btn_inactive(ROLE)
    }
}

fn impact_label(cost_impact: f64) -> String {
    format!("-{:.0}%", cost_impact * 100.0)
}

fn defect_list(defects: &[String]) -> String {
    if defects.is_empty() {
        "None".to_string()
    } else {
        defects.join(", ")
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[component]
fn AssessmentTab() -> Element {
    let state = use_context::<Signal<AppState>>();
    let services = use_context::<Services>();
    let toasts = use_context::<Toasts>();

    let devices = use_resource({
        let repo = services.devices.clone();
        move || {
            let repo = repo.clone();
            async move { repo.list(&DeviceFilter::default()).await }
        }
    });
    let parts = use_resource({
        let repo = services.parts.clone();
        move || {
            let repo = repo.clone();
            async move { repo.list(&PartFilter::default()).await }
        }
    });

    let mut selected_device = use_signal(|| None::<DeviceId>);
    let mut selected_defects = use_signal(Vec::<DefectId>::new);
    let mut selection = use_signal(PartSelection::new);
    let mut condition = use_signal(|| state.with(|st| st.default_condition));
    let mut shipping_address = use_signal(String::new);
    let mut purchasing = use_signal(|| false);

    let device_list: Vec<Device> = match devices.read().clone() {
        Some(Ok(list)) => list,
        Some(Err(err)) => {
            tracing::warn!("failed to load devices: {err}");
            Vec::new()
        }
        None => Vec::new(),
    };
    let part_list: Vec<Part> = match parts.read().clone() {
        Some(Ok(list)) => list,
        _ => Vec::new(),
    };

    let device = selected_device()
        .and_then(|id| device_list.iter().find(|device| device.id == id).cloned());
    let summary = summarize(
        device.as_ref(),
        &selected_defects(),
        services.defects(),
        condition(),
        &selection(),
    );
    let defects = services.defects().to_vec();

    let reset = move || {
        selected_device.set(None);
        selected_defects.set(Vec::new());
        selection.with_mut(|sel| sel.clear());
    };

    let save_assessment = {
        let device = device.clone();
        let summary = summary.clone();
        let defects = defects.clone();
        let mut reset = reset;
        move |_| {
            let Some(device) = device.clone() else {
                push_toast(toasts, ToastKind::Warning, "Select a device first.");
                return;
            };
            let Some(owner) = state.with(|st| st.current_user().map(|user| user.id.clone())) else {
                return;
            };
            let defect_names = selected_defects()
                .iter()
                .filter_map(|id| defects.iter().find(|d| &d.id == id).map(|d| d.name.clone()))
                .collect();
            let record = AssessmentRecord {
                id: uuid::Uuid::new_v4().to_string(),
                owner_id: owner,
                device_id: device.id.clone(),
                device_name: device.display_name(),
                condition: condition(),
                defects: defect_names,
                parts: selection.with(|sel| sel.parts().to_vec()),
                valuation: summary.valuation,
                repair_cost: summary.repair_cost,
                profit: summary.profit,
                assessed_at: unix_now(),
            };
            let mut state = state;
            state.with_mut(|st| st.record_assessment(record));
            persist_user_state(&state);
            push_toast(toasts, ToastKind::Success, format!("Saved assessment for {}.", device.display_name()));
            reset();
        }
    };

    let purchase = {
        let services = services.clone();
        move |_| {
            if purchasing() {
                return;
            }
            let Some(customer) = state.with(|st| st.current_user().cloned()) else {
                return;
            };
            let services = services.clone();
            let parts = selection();
            let address = shipping_address();
            purchasing.set(true);
            spawn(async move {
                match services.purchase_parts(&customer, &parts, &address).await {
                    Ok(order) => {
                        push_toast(
                            toasts,
                            ToastKind::Success,
                            format!("Order {} submitted to the warehouse.", order.id),
                        );
                        selection.with_mut(|sel| sel.clear());
                    }
                    Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not place order: {err}")),
                }
                purchasing.set(false);
            });
        }
    };

    rsx! {
        div { class: "grid gap-6 lg:grid-cols-3",
            div { class: "space-y-6 lg:col-span-2",
                div { class: "{theme::panel_border(ROLE)} p-5 space-y-3",
                    h3 { class: "text-lg font-semibold {theme::text_primary(ROLE)}", "1. Select Device" }
                    if devices.read().is_none() {
                        p { class: "text-sm {theme::TEXT_MUTED}", "Loading devices…" }
                    }
                    div { class: "grid gap-3 sm:grid-cols-2",
                        for item in device_list {
                            DeviceOption {
                                key: "{item.id}",
                                selected: selected_device().as_deref() == Some(item.id.as_str()),
                                device: item,
                                on_select: move |id| selected_device.set(Some(id)),
                            }
                        }
                    }
                }
                div { class: "{theme::panel_border(ROLE)} p-5 space-y-3",
                    h3 { class: "text-lg font-semibold {theme::text_primary(ROLE)}", "2. Condition & Defects" }
                    div { class: "flex flex-wrap gap-2",
                        for tier in ConditionTier::ALL {
                            button {
                                class: "{toggle_class(condition() == tier)}",
                                onclick: move |_| condition.set(tier),
                                span { class: "capitalize", "{tier.label()}" }
                                span { class: "ml-1 text-xs {theme::TEXT_MUTED}", "×{tier.multiplier()}" }
                            }
                        }
                    }
                    ul { class: "grid gap-2 sm:grid-cols-2",
                        for defect in defects {
                            li { key: "{defect.id}",
                                label { class: "flex items-center justify-between gap-2 rounded-lg border border-slate-800 px-3 py-2 text-sm",
                                    span { class: "flex items-center gap-2",
                                        input {
                                            r#type: "checkbox",
                                            checked: selected_defects().contains(&defect.id),
                                            onchange: {
                                                let id = defect.id.clone();
                                                move |_| {
                                                    let id = id.clone();
                                                    selected_defects.with_mut(|ids| {
                                                        if let Some(pos) = ids.iter().position(|d| d == &id) {
                                                            ids.remove(pos);
                                                        } else {
                                                            ids.push(id);
                                                        }
                                                    });
                                                }
                                            },
                                        }
                                        span { class: "{theme::TEXT_SECONDARY}", "{defect.name}" }
                                    }
                                    span { class: "flex items-center gap-2",
                                        span { class: "text-xs {theme::TEXT_MUTED}", "{impact_label(defect.cost_impact)}" }
                                        SeverityBadge { severity: defect.severity }
                                    }
                                }
                            }
                        }
                    }
                }
                div { class: "{theme::panel_border(ROLE)} p-5 space-y-3",
                    h3 { class: "text-lg font-semibold {theme::text_primary(ROLE)}", "3. Repair Parts" }
                    div { class: "space-y-3",
                        for part in part_list {
                            PartOptions {
                                key: "{part.id}",
                                part,
                                selection: selection(),
                                on_pick: move |option| selection.with_mut(|sel| sel.select(option)),
                            }
                        }
                    }
                }
            }
            div { class: "space-y-4",
                AssessmentSummary {
                    summary,
                    device_name: device.as_ref().map(|d| d.display_name()),
                    parts: selection.with(|sel| sel.parts().to_vec()),
                    on_remove_part: move |name: String| {
                        selection.with_mut(|sel| {
                            sel.deselect(&name);
                        });
                    },
                }
                div { class: "{theme::panel_border(ROLE)} p-5 space-y-3",
                    button { class: "w-full {theme::btn_primary(ROLE)}", onclick: save_assessment, "Save Assessment" }
                    label { class: "block space-y-1",
                        span { class: "{theme::LABEL}", "Shipping address" }
                        input {
                            class: "{theme::input_class(ROLE)}",
                            r#type: "text",
                            placeholder: "Where should the parts go?",
                            value: "{shipping_address}",
                            oninput: move |evt| shipping_address.set(evt.value()),
                        }
                    }
                    button {
                        class: "w-full {theme::btn_secondary(ROLE)}",
                        disabled: purchasing() || selection.with(|sel| sel.is_empty()),
                        onclick: purchase,
                        if purchasing() { "Submitting…" } else { "Purchase Parts" }
                    }
                    button {
                        class: "w-full text-xs {theme::TEXT_MUTED} hover:text-white",
                        onclick: move |_| {
                            let mut reset = reset;
                            reset();
                        },
                        "Reset assessment"
                    }
                }
            }
        }
    }
}

#[component]
fn DeviceOption(device: Device, selected: bool, on_select: EventHandler<DeviceId>) -> Element {
    let id = device.id.clone();
    let class = if selected {
        "rounded-lg border border-sky-500 bg-sky-500/10 p-3 text-left"
    } else {
        "rounded-lg border border-slate-800 p-3 text-left hover:border-slate-600"
    };
    rsx! {
        button {
            class: "{class}",
            onclick: move |_| on_select.call(id.clone()),
            p { class: "font-medium {theme::TEXT_SECONDARY}", "{device.display_name()}" }
            p { class: "text-xs {theme::TEXT_MUTED}", "{device.category} · base {theme::format_money(device.base_price)}" }
        }
    }
}

#[component]
fn PartOptions(part: Part, selection: PartSelection, on_pick: EventHandler<PartOption>) -> Element {
    rsx! {
        div { class: "rounded-lg border border-slate-800 p-3",
            div { class: "flex items-center justify-between",
                p { class: "font-medium {theme::TEXT_SECONDARY}", "{part.name}" }
                if !part.is_available() {
                    span { class: "text-xs text-rose-300", "Out of stock" }
                }
            }
            div { class: "mt-2 grid gap-2 sm:grid-cols-3",
                for tier in QualityTier::ALL {
                    QualityButton {
                        option: part.option(tier),
                        selected: selection.is_selected(&part.name, tier),
                        on_pick,
                    }
                }
            }
        }
    }
}

#[component]
fn QualityButton(
    option: PartOption,
    selected: bool,
    on_pick: EventHandler<PartOption>,
) -> Element {
    let class = if selected {
        "rounded-lg border border-sky-500 bg-sky-500/10 px-3 py-2 text-sm"
    } else {
        "rounded-lg border border-slate-800 px-3 py-2 text-sm hover:border-slate-600 disabled:opacity-50"
    };
    let picked = option.clone();
    rsx! {
        button {
            class: "{class}",
            disabled: !option.available,
            onclick: move |_| on_pick.call(picked.clone()),
            span { class: "capitalize {theme::TEXT_SECONDARY}", "{option.quality.label()}" }
            span { class: "ml-2 font-semibold {theme::text_primary(ROLE)}", "{theme::format_money(option.price)}" }
        }
    }
}

#[component]
fn HistoryTab() -> Element {
    let state = use_context::<Signal<AppState>>();
    let (records, stats) = state.with(|st| match st.current_user() {
        Some(user) => (st.history_for(&user.id), st.stats_for(&user.id)),
        None => (Vec::new(), Default::default()),
    });

    rsx! {
        div { class: "space-y-6",
            div { class: "grid gap-4 sm:grid-cols-2 lg:grid-cols-4",
                KpiCard { title: "Assessments", value: stats.assessments.to_string(), role: ROLE }
                KpiCard { title: "Devices assessed", value: stats.devices_assessed.to_string(), role: ROLE }
                KpiCard { title: "Parts selected", value: stats.parts_selected.to_string(), role: ROLE }
                KpiCard {
                    title: "Total potential profit",
                    value: theme::format_money(stats.total_profit),
                    role: ROLE,
                    tone: theme::money_tone(stats.total_profit),
                }
            }
            div { class: "{theme::panel_border(ROLE)} overflow-hidden",
                table { class: "min-w-full text-sm",
                    thead { class: "{theme::table_header(ROLE)} text-left",
                        tr {
                            th { class: "px-4 py-3", "Device" }
                            th { class: "px-4 py-3", "Condition" }
                            th { class: "px-4 py-3", "Defects" }
                            th { class: "px-4 py-3", "Value" }
                            th { class: "px-4 py-3", "Repair" }
                            th { class: "px-4 py-3", "Profit" }
                        }
                    }
                    tbody { class: "divide-y divide-slate-800",
                        if records.is_empty() {
                            tr {
                                td {
                                    class: "px-4 py-6 text-center {theme::TEXT_MUTED}",
                                    colspan: "6",
                                    "Saved assessments show up here."
                                }
                            }
                        }
                        for record in records {
                            tr { key: "{record.id}",
                                td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{record.device_name}" }
                                td { class: "px-4 py-3 capitalize {theme::TEXT_MUTED}", "{record.condition.label()}" }
                                td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{defect_list(&record.defects)}" }
                                td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{theme::format_whole_money(record.valuation)}" }
                                td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{theme::format_money(record.repair_cost)}" }
                                td { class: "px-4 py-3 font-semibold {theme::money_tone(record.profit)}", "{theme::format_money(record.profit)}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SettingsTab() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Toasts>();
    let user = state.with(|st| st.current_user().cloned());
    let default_condition = state.with(|st| st.default_condition);

    rsx! {
        div { class: "grid gap-6 md:grid-cols-2",
            div { class: "{theme::panel_border(ROLE)} p-5 space-y-2",
                h3 { class: "text-lg font-semibold {theme::text_primary(ROLE)}", "Account" }
                if let Some(user) = user {
                    p { class: "{theme::TEXT_SECONDARY}", "{user.full_name}" }
                    p { class: "text-sm {theme::TEXT_MUTED}", "{user.email}" }
                    p { class: "text-sm capitalize {theme::TEXT_MUTED}", "Role: {user.role.label()}" }
                }
            }
            div { class: "{theme::panel_border(ROLE)} p-5 space-y-3",
                h3 { class: "text-lg font-semibold {theme::text_primary(ROLE)}", "Assessment defaults" }
                label { class: "block space-y-1",
                    span { class: "{theme::LABEL}", "Starting condition" }
                    select {
                        class: "{theme::input_class(ROLE)}",
                        value: "{default_condition.label()}",
                        onchange: move |evt| {
                            let picked = ConditionTier::ALL
                                .into_iter()
                                .find(|tier| tier.label() == evt.value());
                            if let Some(tier) = picked {
                                let mut state = state;
                                state.with_mut(|st| st.default_condition = tier);
                                persist_user_state(&state);
                                push_toast(toasts, ToastKind::Success, "Saved default condition.");
                            }
                        },
                        for tier in ConditionTier::ALL {
                            option { value: "{tier.label()}", selected: tier == default_condition, "{tier.label()}" }
                        }
                    }
                }
            }
        }
    }
}
