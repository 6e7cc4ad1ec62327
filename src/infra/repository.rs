//! Data access layer for catalog and order records.
//!
//! A repository provides create, read, update, delete and filtered list
//! operations for one record type. The in-memory implementation is what the
//! app runs on; a hosted-table implementation only has to honour the same
//! trait.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::domain::{
    Device, Order, OrderFilter, Part, PriceHistory, PriceItemType, TransitionError,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: String },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("{kind} {id} was changed by someone else (expected revision {expected}, found {actual})")]
    Conflict {
        kind: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },
    #[error(transparent)]
    Workflow(#[from] TransitionError),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// A row type the in-memory repository can hold.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: &'static str;
    type Update: Send + Sync + 'static;
    type Filter: Send + Sync + Default + 'static;

    fn id(&self) -> &str;

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Applies `update` in place. Called on a scratch copy, so an error leaves
    /// the stored row untouched.
    fn apply(&mut self, update: Self::Update) -> Result<()>;

    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// CRUD contract shared by every storage backend.
#[async_trait]
pub trait Repository: Send + Sync {
    type Record: Send;
    type Update: Send;
    type Filter: Send + Sync;

    async fn create(&self, record: Self::Record) -> Result<Self::Record>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Self::Record>>;

    /// Matching records in insertion order.
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Record>>;

    async fn update(&self, id: &str, update: Self::Update) -> Result<Self::Record>;

    /// Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Shared, clonable in-memory table. Clones see the same rows.
pub struct MemoryRepository<R> {
    rows: Arc<Mutex<Vec<R>>>,
}

impl<R> Clone for MemoryRepository<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::seeded(Vec::new())
    }
}

impl<R: Record> MemoryRepository<R> {
    pub fn seeded(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Applies `update` and returns the row as it was before alongside the
    /// updated one, both read under the same lock.
    pub async fn update_with_previous(&self, id: &str, update: R::Update) -> Result<(R, R)> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| RepositoryError::NotFound {
                kind: R::KIND,
                id: id.to_string(),
            })?;

        let mut draft = row.clone();
        draft.apply(update)?;
        draft.validate()?;
        let previous = std::mem::replace(row, draft.clone());
        tracing::debug!(kind = R::KIND, id, "updated record");
        Ok((previous, draft))
    }

    pub async fn replace_all(&self, rows: Vec<R>) {
        let mut guard = self.rows.lock().await;
        tracing::debug!(kind = R::KIND, before = guard.len(), after = rows.len(), "replaced table");
        *guard = rows;
    }
}

#[async_trait]
impl<R: Record> Repository for MemoryRepository<R> {
    type Record = R;
    type Update = R::Update;
    type Filter = R::Filter;

    async fn create(&self, record: R) -> Result<R> {
        record.validate()?;
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|row| row.id() == record.id()) {
            return Err(RepositoryError::Duplicate {
                kind: R::KIND,
                id: record.id().to_string(),
            });
        }
        rows.push(record.clone());
        tracing::debug!(kind = R::KIND, id = record.id(), "created record");
        Ok(record)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<R>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn list(&self, filter: &R::Filter) -> Result<Vec<R>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|row| row.matches(filter)).cloned().collect())
    }

    async fn update(&self, id: &str, update: R::Update) -> Result<R> {
        let (_, updated) = self.update_with_previous(id, update).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        let removed = rows.len() != before;
        if removed {
            tracing::debug!(kind = R::KIND, id, "deleted record");
        }
        Ok(removed)
    }
}

fn today() -> time::Date {
    OffsetDateTime::now_utc().date()
}

fn check_price(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RepositoryError::Invalid {
            field,
            reason: format!("{value} is not a non-negative amount"),
        })
    }
}

fn check_present(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(RepositoryError::Invalid {
            field,
            reason: "must not be empty".to_string(),
        })
    } else {
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceUpdate {
    pub base_price: Option<f64>,
    pub discontinued: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceFilter {
    pub category: Option<String>,
    pub include_discontinued: bool,
}

impl DeviceFilter {
    pub fn all() -> Self {
        Self {
            category: None,
            include_discontinued: true,
        }
    }
}

impl Record for Device {
    const KIND: &'static str = "device";
    type Update = DeviceUpdate;
    type Filter = DeviceFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        check_present("device id", &self.id)?;
        check_present("model", &self.model)?;
        check_price("base price", self.base_price)
    }

    fn apply(&mut self, update: DeviceUpdate) -> Result<()> {
        if let Some(price) = update.base_price {
            check_price("base price", price)?;
            self.base_price = price;
        }
        if let Some(discontinued) = update.discontinued {
            self.discontinued = discontinued;
        }
        self.last_updated = today();
        Ok(())
    }

    fn matches(&self, filter: &DeviceFilter) -> bool {
        let category_ok = filter
            .category
            .as_ref()
            .map_or(true, |category| self.category.eq_ignore_ascii_case(category));
        category_ok && (filter.include_discontinued || !self.discontinued)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartUpdate {
    pub budget: Option<f64>,
    pub premium: Option<f64>,
    pub refurbished: Option<f64>,
    pub stock: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartFilter {
    pub name: Option<String>,
    pub available_only: bool,
}

impl Record for Part {
    const KIND: &'static str = "part";
    type Update = PartUpdate;
    type Filter = PartFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        check_present("part id", &self.id)?;
        check_present("part name", &self.name)?;
        check_price("budget price", self.prices.budget)?;
        check_price("premium price", self.prices.premium)?;
        check_price("refurbished price", self.prices.refurbished)
    }

    fn apply(&mut self, update: PartUpdate) -> Result<()> {
        if let Some(price) = update.budget {
            self.prices.budget = price;
        }
        if let Some(price) = update.premium {
            self.prices.premium = price;
        }
        if let Some(price) = update.refurbished {
            self.prices.refurbished = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
            self.out_of_stock = stock == 0;
        }
        self.last_updated = today();
        Ok(())
    }

    fn matches(&self, filter: &PartFilter) -> bool {
        let name_ok = filter
            .name
            .as_ref()
            .map_or(true, |name| self.name.eq_ignore_ascii_case(name));
        name_ok && (!filter.available_only || self.is_available())
    }
}

/// What a warehouse operator did to an order.
#[derive(Clone, Debug, PartialEq)]
pub enum OrderChange {
    Advance,
    TogglePicked(String),
}

/// An order change plus the revision the operator was looking at.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderUpdate {
    pub expected_revision: u64,
    pub change: OrderChange,
}

impl Record for Order {
    const KIND: &'static str = "order";
    type Update = OrderUpdate;
    type Filter = OrderFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        check_present("order id", &self.id)?;
        check_present("customer", &self.customer_name)?;
        if self.items.is_empty() {
            return Err(RepositoryError::Invalid {
                field: "items",
                reason: "an order needs at least one item".to_string(),
            });
        }
        Ok(())
    }

    fn apply(&mut self, update: OrderUpdate) -> Result<()> {
        if update.expected_revision != self.revision {
            return Err(RepositoryError::Conflict {
                kind: Self::KIND,
                id: self.id.clone(),
                expected: update.expected_revision,
                actual: self.revision,
            });
        }
        match update.change {
            OrderChange::Advance => {
                self.advance()?;
            }
            OrderChange::TogglePicked(item_id) => {
                self.toggle_picked(&item_id)?;
            }
        }
        self.revision += 1;
        Ok(())
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.matches(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceHistoryFilter {
    pub item_type: Option<PriceItemType>,
    pub item_id: Option<String>,
}

impl Record for PriceHistory {
    const KIND: &'static str = "price history entry";
    /// Entries are append-only.
    type Update = std::convert::Infallible;
    type Filter = PriceHistoryFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, update: Self::Update) -> Result<()> {
        match update {}
    }

    fn matches(&self, filter: &PriceHistoryFilter) -> bool {
        filter.item_type.map_or(true, |kind| kind == self.item_type)
            && filter
                .item_id
                .as_ref()
                .map_or(true, |id| id == &self.item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{catalog, OrderStatus};

    fn orders() -> MemoryRepository<Order> {
        MemoryRepository::seeded(catalog::orders())
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_and_filters() {
        let devices = MemoryRepository::seeded(catalog::devices());

        let all = devices.list(&DeviceFilter::all()).await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].model, "iPhone 14 Pro");

        let tablets = devices
            .list(&DeviceFilter {
                category: Some("tablet".to_string()),
                include_discontinued: false,
            })
            .await
            .unwrap();
        assert_eq!(tablets.len(), 1);
    }

    #[tokio::test]
    async fn negative_price_is_rejected_and_row_kept() {
        let devices = MemoryRepository::seeded(catalog::devices());

        let err = devices
            .update(
                "1",
                DeviceUpdate {
                    base_price: Some(-1.0),
                    discontinued: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Invalid { .. }));
        let device = devices.get_by_id("1").await.unwrap().unwrap();
        assert_eq!(device.base_price, 899.0);
    }

    #[tokio::test]
    async fn update_with_previous_returns_both_sides() {
        let devices = MemoryRepository::seeded(catalog::devices());
        let change = |price| DeviceUpdate {
            base_price: Some(price),
            discontinued: None,
        };

        let (before, after) = devices.update_with_previous("1", change(850.0)).await.unwrap();
        assert_eq!((before.base_price, after.base_price), (899.0, 850.0));

        let (before, _) = devices.update_with_previous("1", change(800.0)).await.unwrap();
        assert_eq!(before.base_price, 850.0);
    }

    #[tokio::test]
    async fn zero_stock_marks_part_out_of_stock() {
        let parts = MemoryRepository::seeded(catalog::parts());

        let part = parts
            .update(
                "4",
                PartUpdate {
                    stock: Some(0),
                    ..PartUpdate::default()
                },
            )
            .await
            .unwrap();

        assert!(part.out_of_stock);
        let available = parts
            .list(&PartFilter {
                name: None,
                available_only: true,
            })
            .await
            .unwrap();
        assert_eq!(available.len(), 3);
    }

    #[tokio::test]
    async fn duplicate_ids_are_refused() {
        let devices = MemoryRepository::seeded(catalog::devices());
        let copy = catalog::devices().remove(0);

        let err = devices.create(copy).await.unwrap_err();

        assert_eq!(
            err,
            RepositoryError::Duplicate {
                kind: "device",
                id: "1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn order_changes_bump_the_revision() {
        let orders = orders();

        let order = orders
            .update(
                "ORD-001",
                OrderUpdate {
                    expected_revision: 0,
                    change: OrderChange::Advance,
                },
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.revision, 1);
    }

    #[tokio::test]
    async fn stale_revision_is_a_conflict() {
        let orders = orders();
        let toggle = |revision| OrderUpdate {
            expected_revision: revision,
            change: OrderChange::TogglePicked("1".to_string()),
        };

        orders.update("ORD-001", toggle(0)).await.unwrap();
        let err = orders.update("ORD-001", toggle(0)).await.unwrap_err();

        assert_eq!(
            err,
            RepositoryError::Conflict {
                kind: "order",
                id: "ORD-001".to_string(),
                expected: 0,
                actual: 1,
            }
        );
        let stored = orders.get_by_id("ORD-001").await.unwrap().unwrap();
        assert!(stored.items[0].picked);
    }

    #[tokio::test]
    async fn rejected_transition_leaves_order_unchanged() {
        let orders = orders();
        orders
            .update(
                "ORD-001",
                OrderUpdate {
                    expected_revision: 0,
                    change: OrderChange::Advance,
                },
            )
            .await
            .unwrap();

        let err = orders
            .update(
                "ORD-001",
                OrderUpdate {
                    expected_revision: 1,
                    change: OrderChange::Advance,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RepositoryError::Workflow(TransitionError::UnpickedItems { remaining: 2 })
        );
        let stored = orders.get_by_id("ORD-001").await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Processing);
        assert_eq!(stored.revision, 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_went() {
        let orders = orders();
        assert!(orders.delete("ORD-002").await.unwrap());
        assert!(!orders.delete("ORD-002").await.unwrap());
        assert_eq!(orders.len().await, 2);
    }

    #[tokio::test]
    async fn missing_row_update_is_not_found() {
        let orders = orders();
        let err = orders
            .update(
                "ORD-404",
                OrderUpdate {
                    expected_revision: 0,
                    change: OrderChange::Advance,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { kind: "order", .. }));
    }
}
