//! Shared service handles handed to the UI through context.

use std::collections::HashMap;
use std::sync::Arc;

use time::OffsetDateTime;

use crate::domain::{
    catalog, Defect, Device, Order, OrderItem, OrderStatus, Part, PartSelection, PriceHistory,
    PriceItemType, Priority, QualityTier, TierPrices, User,
};
use crate::infra::backend::{BackendClient, BackendError};
use crate::infra::identity::IdentityProvider;
use crate::infra::repository::{
    DeviceUpdate, MemoryRepository, OrderChange, OrderUpdate, PartUpdate, Repository,
    RepositoryError, Result,
};
use crate::util::generate_id;

/// Fields an admin fills in to add a device to the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDevice {
    pub brand: String,
    pub model: String,
    pub category: String,
    pub base_price: f64,
    pub release_year: Option<u16>,
}

/// Fields an admin fills in to add a part to the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPart {
    pub name: String,
    pub category: String,
    pub prices: TierPrices,
    pub stock: u32,
}

#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn IdentityProvider>,
    pub devices: MemoryRepository<Device>,
    pub parts: MemoryRepository<Part>,
    pub orders: MemoryRepository<Order>,
    pub price_history: MemoryRepository<PriceHistory>,
    defects: Arc<Vec<Defect>>,
    catalog_source: Option<BackendClient>,
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.identity, &other.identity) && Arc::ptr_eq(&self.defects, &other.defects)
    }
}

impl Services {
    /// Repositories seeded with the built-in catalog and sample orders.
    pub fn seeded(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            devices: MemoryRepository::seeded(catalog::devices()),
            parts: MemoryRepository::seeded(catalog::parts()),
            orders: MemoryRepository::seeded(catalog::orders()),
            price_history: MemoryRepository::default(),
            defects: Arc::new(catalog::defects()),
            catalog_source: None,
        }
    }

    /// Devices and parts are refreshed from `client` by [`Services::sync_catalog`].
    pub fn with_catalog_source(mut self, client: BackendClient) -> Self {
        self.catalog_source = Some(client);
        self
    }

    /// Replaces the seeded devices and parts with the hosted tables, then
    /// the price history and orders when those tables can be read.
    ///
    /// Returns `false` without touching anything when no backend is configured
    /// or a catalog table came back empty.
    pub async fn sync_catalog(&self) -> std::result::Result<bool, BackendError> {
        let Some(client) = &self.catalog_source else {
            return Ok(false);
        };
        let devices = client.fetch_devices(None).await?;
        let parts = client.fetch_parts(None).await?;
        if devices.is_empty() || parts.is_empty() {
            tracing::warn!(
                devices = devices.len(),
                parts = parts.len(),
                "hosted catalog incomplete, keeping built-in data"
            );
            return Ok(false);
        }
        tracing::info!(devices = devices.len(), parts = parts.len(), "loaded hosted catalog");
        let labels: HashMap<String, String> = devices
            .iter()
            .map(|device| (device.id.clone(), device.display_name()))
            .chain(parts.iter().map(|part| (part.id.clone(), part.name.clone())))
            .collect();
        let part_names: HashMap<String, String> = parts
            .iter()
            .map(|part| (part.id.clone(), part.name.clone()))
            .collect();
        self.devices.replace_all(devices).await;
        self.parts.replace_all(parts).await;

        match client.fetch_price_history(None, &labels).await {
            Ok(entries) => {
                tracing::info!(entries = entries.len(), "loaded hosted price history");
                self.price_history.replace_all(entries).await;
            }
            Err(err) => tracing::warn!("price history unavailable: {err}"),
        }
        match client.fetch_orders(None, &part_names).await {
            Ok(orders) if !orders.is_empty() => {
                tracing::info!(orders = orders.len(), "loaded hosted orders");
                self.orders.replace_all(orders).await;
            }
            Ok(_) => tracing::info!("no hosted orders, keeping sample orders"),
            Err(err) => tracing::warn!("orders unavailable: {err}"),
        }
        Ok(true)
    }

    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    /// Updates a device and logs a price change when the base price moved.
    pub async fn update_device(
        &self,
        id: &str,
        update: DeviceUpdate,
        changed_by: &User,
    ) -> Result<Device> {
        let (before, after) = self.devices.update_with_previous(id, update).await?;
        if before.base_price != after.base_price {
            self.log_price_change(
                PriceItemType::Device,
                &after.id,
                after.display_name(),
                before.base_price,
                after.base_price,
                changed_by,
            )
            .await?;
        }
        Ok(after)
    }

    /// Updates a part and logs one price change per tier that moved.
    pub async fn update_part(&self, id: &str, update: PartUpdate, changed_by: &User) -> Result<Part> {
        let (before, after) = self.parts.update_with_previous(id, update).await?;
        for tier in QualityTier::ALL {
            let (old, new) = (before.prices.get(tier), after.prices.get(tier));
            if old != new {
                self.log_price_change(
                    PriceItemType::Part,
                    &after.id,
                    format!("{} ({})", after.name, tier.label()),
                    old,
                    new,
                    changed_by,
                )
                .await?;
            }
        }
        Ok(after)
    }

    /// Adds a device and logs its opening price against zero.
    pub async fn add_device(&self, new: NewDevice, changed_by: &User) -> Result<Device> {
        let device = Device {
            id: uuid::Uuid::new_v4().to_string(),
            brand: new.brand.trim().to_string(),
            model: new.model.trim().to_string(),
            category: new.category.trim().to_string(),
            base_price: new.base_price,
            release_year: new.release_year,
            discontinued: false,
            last_updated: OffsetDateTime::now_utc().date(),
        };
        let device = self.devices.create(device).await?;
        tracing::info!(device = %device.display_name(), by = %changed_by.email, "added device");
        self.log_price_change(
            PriceItemType::Device,
            &device.id,
            device.display_name(),
            0.0,
            device.base_price,
            changed_by,
        )
        .await?;
        Ok(device)
    }

    /// Adds a part and logs each tier's opening price against zero.
    pub async fn add_part(&self, new: NewPart, changed_by: &User) -> Result<Part> {
        let part = Part {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            category: new.category.trim().to_string(),
            prices: new.prices,
            stock: new.stock,
            out_of_stock: new.stock == 0,
            last_updated: OffsetDateTime::now_utc().date(),
        };
        let part = self.parts.create(part).await?;
        tracing::info!(part = %part.name, by = %changed_by.email, "added part");
        for tier in QualityTier::ALL {
            self.log_price_change(
                PriceItemType::Part,
                &part.id,
                format!("{} ({})", part.name, tier.label()),
                0.0,
                part.prices.get(tier),
                changed_by,
            )
            .await?;
        }
        Ok(part)
    }

    /// Removes a device. Its price history stays.
    pub async fn remove_device(&self, id: &str, changed_by: &User) -> Result<()> {
        if !self.devices.delete(id).await? {
            return Err(not_found("device", id));
        }
        tracing::info!(device = id, by = %changed_by.email, "removed device");
        Ok(())
    }

    /// Removes a part. Its price history stays.
    pub async fn remove_part(&self, id: &str, changed_by: &User) -> Result<()> {
        if !self.parts.delete(id).await? {
            return Err(not_found("part", id));
        }
        tracing::info!(part = id, by = %changed_by.email, "removed part");
        Ok(())
    }

    /// Price changes, newest first.
    pub async fn recent_price_changes(&self, limit: usize) -> Result<Vec<PriceHistory>> {
        let mut entries = self.price_history.list(&Default::default()).await?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    pub async fn advance_order(&self, id: &str, expected_revision: u64) -> Result<Order> {
        self.orders
            .update(
                id,
                OrderUpdate {
                    expected_revision,
                    change: OrderChange::Advance,
                },
            )
            .await
    }

    pub async fn toggle_item(
        &self,
        order_id: &str,
        item_id: &str,
        expected_revision: u64,
    ) -> Result<Order> {
        self.orders
            .update(
                order_id,
                OrderUpdate {
                    expected_revision,
                    change: OrderChange::TogglePicked(item_id.to_string()),
                },
            )
            .await
    }

    /// Turns the selected parts into a pending order for `customer`.
    pub async fn purchase_parts(
        &self,
        customer: &User,
        selection: &PartSelection,
        shipping_address: &str,
    ) -> Result<Order> {
        if selection.is_empty() {
            return Err(RepositoryError::Invalid {
                field: "parts",
                reason: "select at least one part".to_string(),
            });
        }
        if shipping_address.trim().is_empty() {
            return Err(RepositoryError::Invalid {
                field: "shipping address",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(part) = selection.parts().iter().find(|part| !part.available) {
            return Err(RepositoryError::Invalid {
                field: "parts",
                reason: format!("{} is out of stock", part.name),
            });
        }

        let items = selection
            .parts()
            .iter()
            .map(|part| OrderItem {
                id: generate_id("item"),
                part_name: part.name.clone(),
                quality: part.quality,
                quantity: 1,
                unit_price: part.price,
                picked: false,
            })
            .collect();

        let order = Order {
            id: self.next_order_id().await,
            customer_name: customer.full_name.clone(),
            order_date: OffsetDateTime::now_utc().date(),
            status: OrderStatus::Pending,
            priority: Priority::Medium,
            items,
            total_amount: selection.total(),
            shipping_address: shipping_address.trim().to_string(),
            revision: 0,
        };
        let order = self.orders.create(order).await?;
        tracing::info!(order = %order.id, customer = %customer.email, total = order.total_amount, "placed parts order");
        Ok(order)
    }

    async fn next_order_id(&self) -> String {
        let mut sequence = self.orders.len().await + 1;
        loop {
            let candidate = format!("ORD-{sequence:03}");
            match self.orders.get_by_id(&candidate).await {
                Ok(None) => return candidate,
                _ => sequence += 1,
            }
        }
    }

    async fn log_price_change(
        &self,
        item_type: PriceItemType,
        item_id: &str,
        label: String,
        old_price: f64,
        new_price: f64,
        changed_by: &User,
    ) -> Result<()> {
        let entry = PriceHistory {
            id: uuid::Uuid::new_v4().to_string(),
            item_type,
            item_id: item_id.to_string(),
            label,
            old_price,
            new_price,
            changed_at: OffsetDateTime::now_utc(),
            changed_by: changed_by.email.clone(),
        };
        tracing::info!(item = %entry.label, old_price, new_price, by = %entry.changed_by, "price changed");
        self.price_history.create(entry).await?;
        Ok(())
    }
}

fn not_found(kind: &'static str, id: &str) -> RepositoryError {
    RepositoryError::NotFound {
        kind,
        id: id.to_string(),
    }
}
