use std::collections::BTreeSet;

use dioxus::prelude::*;

use crate::domain::{AppState, Device, Part, PriceHistory, PriceItemType, Role};
use crate::infra::repository::{DeviceFilter, DeviceUpdate, PartFilter, PartUpdate, Repository};
use crate::infra::services::{NewDevice, NewPart, Services};
use crate::ui::components::device_table::DeviceTable;
use crate::ui::components::kpi_card::KpiCard;
use crate::ui::components::part_table::PartTable;
use crate::ui::components::price_editor::{DeviceCreator, DeviceEditor, PartCreator, PartEditor};
use crate::ui::components::toast::{push_toast, ToastKind, Toasts};
use crate::ui::theme;

const ROLE: Option<Role> = Some(Role::Admin);
const RECENT_CHANGES: usize = 20;

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Devices,
    Parts,
    History,
}

#[component]
pub fn AdminDashboardPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let services = use_context::<Services>();
    let toasts = use_context::<Toasts>();

    let mut tab = use_signal(|| Tab::Devices);
    let mut refresh = use_signal(|| 0u32);
    let mut editing_device = use_signal(|| None::<Device>);
    let mut editing_part = use_signal(|| None::<Part>);
    let mut adding_device = use_signal(|| false);
    let mut adding_part = use_signal(|| false);

    let devices = use_resource({
        let repo = services.devices.clone();
        move || {
            let repo = repo.clone();
            let _ = refresh();
            async move { repo.list(&DeviceFilter::all()).await }
        }
    });
    let parts = use_resource({
        let repo = services.parts.clone();
        move || {
            let repo = repo.clone();
            let _ = refresh();
            async move { repo.list(&PartFilter::default()).await }
        }
    });
    let history = use_resource({
        let services = services.clone();
        move || {
            let services = services.clone();
            let _ = refresh();
            async move { services.recent_price_changes(RECENT_CHANGES).await }
        }
    });

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
    let changes: Vec<PriceHistory> = match history.read().clone() {
        Some(Ok(list)) => list,
        _ => Vec::new(),
    };

    let device_count = device_list.len().to_string();
    let part_count = part_list.len().to_string();
    let categories = device_list
        .iter()
        .map(|device| device.category.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let low_stock = part_list.iter().filter(|part| !part.is_available()).count();
    let unavailable_tone = (low_stock > 0).then_some("text-amber-300");

    let save_device = {
        let services = services.clone();
        move |(id, update): (String, DeviceUpdate)| {
            let Some(admin) = state.with(|st| st.current_user().cloned()) else {
                return;
            };
            let services = services.clone();
            spawn(async move {
                match services.update_device(&id, update, &admin).await {
                    Ok(device) => {
                        push_toast(toasts, ToastKind::Success, format!("Updated {}.", device.display_name()));
                        editing_device.set(None);
                        refresh.with_mut(|n| *n += 1);
                    }
                    Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not update device: {err}")),
                }
            });
        }
    };

    let save_part = {
        let services = services.clone();
        move |(id, update): (String, PartUpdate)| {
            let Some(admin) = state.with(|st| st.current_user().cloned()) else {
                return;
            };
            let services = services.clone();
            spawn(async move {
                match services.update_part(&id, update, &admin).await {
                    Ok(part) => {
                        push_toast(toasts, ToastKind::Success, format!("Updated {}.", part.name));
                        editing_part.set(None);
                        refresh.with_mut(|n| *n += 1);
                    }
                    Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not update part: {err}")),
                }
            });
        }
    };

    let add_device = {
        let services = services.clone();
        move |new: NewDevice| {
            let Some(admin) = state.with(|st| st.current_user().cloned()) else {
                return;
            };
            let services = services.clone();
            spawn(async move {
                match services.add_device(new, &admin).await {
                    Ok(device) => {
                        push_toast(toasts, ToastKind::Success, format!("Added {}.", device.display_name()));
                        adding_device.set(false);
                        refresh.with_mut(|n| *n += 1);
                    }
                    Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not add device: {err}")),
                }
            });
        }
    };

    let add_part = {
        let services = services.clone();
        move |new: NewPart| {
            let Some(admin) = state.with(|st| st.current_user().cloned()) else {
                return;
            };
            let services = services.clone();
            spawn(async move {
                match services.add_part(new, &admin).await {
                    Ok(part) => {
                        push_toast(toasts, ToastKind::Success, format!("Added {}.", part.name));
                        adding_part.set(false);
                        refresh.with_mut(|n| *n += 1);
                    }
                    Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not add part: {err}")),
                }
            });
        }
    };

    let delete_device = {
        let services = services.clone();
        move |device: Device| {
            let Some(admin) = state.with(|st| st.current_user().cloned()) else {
                return;
            };
            let services = services.clone();
            spawn(async move {
                match services.remove_device(&device.id, &admin).await {
                    Ok(()) => push_toast(toasts, ToastKind::Success, format!("Removed {}.", device.display_name())),
                    Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not remove device: {err}")),
                }
                refresh.with_mut(|n| *n += 1);
            });
        }
    };

    let delete_part = {
        let services = services.clone();
        move |part: Part| {
            let Some(admin) = state.with(|st| st.current_user().cloned()) else {
                return;
            };
            let services = services.clone();
            spawn(async move {
                match services.remove_part(&part.id, &admin).await {
                    Ok(()) => push_toast(toasts, ToastKind::Success, format!("Removed {}.", part.name)),
                    Err(err) => push_toast(toasts, ToastKind::Error, format!("Could not remove part: {err}")),
                }
                refresh.with_mut(|n| *n += 1);
            });
        }
    };

    let tab_class = move |target: Tab| {
        if tab() == target {
            theme::btn_active(ROLE)
        } else {
            theme::btn_inactive(ROLE)
        }
    };

    rsx! {
        section {
            class: "space-y-6",
            div {
                class: "flex flex-wrap items-center justify-between gap-4",
                div {
                    h2 { class: "text-3xl font-bold", "Admin Dashboard" }
                    p { class: "text-sm {theme::TEXT_MUTED}", "Maintain device base prices and the parts catalog." }
                }
                div {
                    class: "flex gap-2",
                    button {
                        class: "{theme::btn_secondary(ROLE)}",
                        onclick: move |_| push_toast(toasts, ToastKind::Info, "Bulk upload is not available yet."),
                        "Bulk Upload"
                    }
                    button {
                        class: "{theme::btn_primary(ROLE)}",
                        onclick: move |_| push_toast(toasts, ToastKind::Info, "Export is not available yet."),
                        "Export Data"
                    }
                }
            }

            div {
                class: "grid gap-4 sm:grid-cols-2 lg:grid-cols-4",
                KpiCard { title: "Devices", value: device_count, role: ROLE }
                KpiCard { title: "Parts", value: part_count, role: ROLE }
                KpiCard { title: "Categories", value: categories.to_string(), role: ROLE }
                KpiCard {
                    title: "Unavailable parts",
                    value: low_stock.to_string(),
                    role: ROLE,
                    tone: unavailable_tone,
                }
            }

            div {
                class: "flex gap-2",
                button { class: "{tab_class(Tab::Devices)}", onclick: move |_| tab.set(Tab::Devices), "Device Pricing" }
                button { class: "{tab_class(Tab::Parts)}", onclick: move |_| tab.set(Tab::Parts), "Parts Management" }
                button { class: "{tab_class(Tab::History)}", onclick: move |_| tab.set(Tab::History), "Price History" }
            }

            match tab() {
                Tab::Devices => rsx! {
                    div {
                        class: "flex justify-end",
                        button {
                            class: "{theme::btn_primary(ROLE)}",
                            onclick: move |_| adding_device.set(true),
                            "Add Device"
                        }
                    }
                    DeviceTable {
                        devices: device_list,
                        on_edit: move |device| editing_device.set(Some(device)),
                        on_delete: delete_device.clone(),
                    }
                },
                Tab::Parts => rsx! {
                    div {
                        class: "flex justify-end",
                        button {
                            class: "{theme::btn_primary(ROLE)}",
                            onclick: move |_| adding_part.set(true),
                            "Add Part"
                        }
                    }
                    PartTable {
                        parts: part_list,
                        on_edit: move |part| editing_part.set(Some(part)),
                        on_delete: delete_part.clone(),
                    }
                },
                Tab::History => rsx! { PriceHistoryList { entries: changes } },
            }

            if let Some(device) = editing_device() {
                DeviceEditor {
                    key: "{device.id}",
                    device: device.clone(),
                    on_save: {
                        let save_device = save_device.clone();
                        move |update| save_device((device.id.clone(), update))
                    },
                    on_cancel: move |_| editing_device.set(None),
                }
            }
            if let Some(part) = editing_part() {
                PartEditor {
                    key: "{part.id}",
                    part: part.clone(),
                    on_save: {
                        let save_part = save_part.clone();
                        move |update| save_part((part.id.clone(), update))
                    },
                    on_cancel: move |_| editing_part.set(None),
                }
            }
            if adding_device() {
                DeviceCreator { on_save: add_device.clone(), on_cancel: move |_| adding_device.set(false) }
            }
            if adding_part() {
                PartCreator { on_save: add_part.clone(), on_cancel: move |_| adding_part.set(false) }
            }
        }
    }
}

#[component]
fn PriceHistoryList(entries: Vec<PriceHistory>) -> Element {
    if entries.is_empty() {
        return rsx! {
            div {
                class: "{theme::panel_border(ROLE)} p-6 text-center text-sm {theme::TEXT_MUTED}",
                "No price changes recorded yet."
            }
        };
    }

    rsx! {
        div {
            class: "{theme::panel_border(ROLE)} overflow-hidden",
            table {
                class: "min-w-full text-sm",
                thead {
                    class: "{theme::table_header(ROLE)} text-left",
                    tr {
                        th { class: "px-4 py-3", "Item" }
                        th { class: "px-4 py-3", "Type" }
                        th { class: "px-4 py-3", "Old" }
                        th { class: "px-4 py-3", "New" }
                        th { class: "px-4 py-3", "Change" }
                        th { class: "px-4 py-3", "By" }
                        th { class: "px-4 py-3", "When" }
                    }
                }
                tbody {
                    class: "divide-y divide-slate-800",
                    for entry in entries {
                        PriceHistoryRow { key: "{entry.id}", entry }
                    }
                }
            }
        }
    }
}

#[component]
fn PriceHistoryRow(entry: PriceHistory) -> Element {
    let delta = entry.new_price - entry.old_price;
    let kind = match entry.item_type {
        PriceItemType::Device => "device",
        PriceItemType::Part => "part",
    };
    let when = format!(
        "{} {:02}:{:02}",
        entry.changed_at.date(),
        entry.changed_at.hour(),
        entry.changed_at.minute()
    );
    rsx! {
        tr {
            td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{entry.label}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{kind}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{theme::format_money(entry.old_price)}" }
            td { class: "px-4 py-3 {theme::TEXT_SECONDARY}", "{theme::format_money(entry.new_price)}" }
            td { class: "px-4 py-3 font-semibold {theme::money_tone(delta)}", "{theme::format_money(delta)}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{entry.changed_by}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{when}" }
        }
    }
}
