use dioxus::prelude::*;

use crate::domain::{Device, Role};
use crate::ui::theme;

const ROLE: Option<Role> = Some(Role::Admin);

#[component]
pub fn DeviceTable(
    devices: Vec<Device>,
    on_edit: EventHandler<Device>,
    on_delete: EventHandler<Device>,
) -> Element {
    let is_empty = devices.is_empty();
    rsx! {
        div {
            class: "{theme::panel_border(ROLE)} overflow-hidden",
            table {
                class: "min-w-full text-sm",
                thead {
                    class: "{theme::table_header(ROLE)} text-left tracking-wide",
                    tr {
                        th { class: "px-4 py-3 font-medium", "Device" }
                        th { class: "px-4 py-3 font-medium", "Category" }
                        th { class: "px-4 py-3 font-medium", "Base price" }
                        th { class: "px-4 py-3 font-medium", "Last updated" }
                        th { class: "px-4 py-3" }
                    }
                }
                tbody {
                    class: "divide-y divide-slate-800",
                    for device in devices {
                        DeviceRow { key: "{device.id}", device, on_edit, on_delete }
                    }
                    if is_empty {
                        tr {
                            td {
                                class: "px-4 py-6 text-center {theme::TEXT_MUTED}",
                                colspan: "5",
                                "No devices in the catalog."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn DeviceRow(device: Device, on_edit: EventHandler<Device>, on_delete: EventHandler<Device>) -> Element {
    let edited = device.clone();
    let deleted = device.clone();
    let muted = if device.discontinued { "opacity-50" } else { "" };
    rsx! {
        tr {
            class: "hover:bg-slate-800/40 {muted}",
            td {
                class: "px-4 py-3",
                p { class: "font-medium {theme::TEXT_SECONDARY}", "{device.display_name()}" }
                if device.discontinued {
                    p { class: "text-xs text-rose-300", "Discontinued" }
                }
            }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{device.category}" }
            td { class: "px-4 py-3 font-semibold {theme::TEXT_SECONDARY}", "{theme::format_money(device.base_price)}" }
            td { class: "px-4 py-3 {theme::TEXT_MUTED}", "{device.last_updated}" }
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
