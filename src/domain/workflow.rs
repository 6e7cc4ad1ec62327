//! Warehouse order lifecycle: pending → processing → shipped → delivered.

use thiserror::Error;

use super::entities::{Order, OrderStatus};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("order is already {}", .0.label())]
    Terminal(OrderStatus),
    #[error("{remaining} item(s) still need to be picked")]
    UnpickedItems { remaining: usize },
    #[error("order has no item {0}")]
    UnknownItem(String),
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Button caption for the operator action leaving this status.
    pub fn action_label(&self) -> Option<&'static str> {
        match self {
            OrderStatus::Pending => Some("Start Processing"),
            OrderStatus::Processing => Some("Mark as Shipped"),
            OrderStatus::Shipped => Some("Mark as Delivered"),
            OrderStatus::Delivered => None,
        }
    }
}

impl Order {
    pub fn picked_count(&self) -> usize {
        self.items.iter().filter(|item| item.picked).count()
    }

    pub fn all_picked(&self) -> bool {
        self.items.iter().all(|item| item.picked)
    }

    pub fn items_total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.unit_price * item.quantity as f64)
            .sum()
    }

    /// Whether the stored total agrees with its line items to the cent.
    pub fn total_matches_items(&self) -> bool {
        (self.items_total() - self.total_amount).abs() < 0.005
    }

    /// Status the order would move to, without changing it.
    pub fn can_advance(&self) -> Result<OrderStatus, TransitionError> {
        let next = self.status.next().ok_or(TransitionError::Terminal(self.status))?;
        if next == OrderStatus::Shipped && !self.all_picked() {
            return Err(TransitionError::UnpickedItems {
                remaining: self.items.len() - self.picked_count(),
            });
        }
        Ok(next)
    }

    /// Moves one step forward. On error the order is left untouched.
    pub fn advance(&mut self) -> Result<OrderStatus, TransitionError> {
        let next = self.can_advance()?;
        self.status = next;
        Ok(next)
    }

    /// Flips the picked bit of one item and returns its new value. Status is
    /// never changed here.
    pub fn toggle_picked(&mut self, item_id: &str) -> Result<bool, TransitionError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| TransitionError::UnknownItem(item_id.to_string()))?;
        item.picked = !item.picked;
        Ok(item.picked)
    }
}

/// Status filter plus free-text search, as used by the warehouse list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderFilter {
    /// `None` keeps every status.
    pub status: Option<OrderStatus>,
    pub search: String,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        let status_ok = self.status.map_or(true, |status| order.status == status);
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || order.customer_name.to_lowercase().contains(&needle)
            || order.id.to_lowercase().contains(&needle);
        status_ok && search_ok
    }

    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub shipped: usize,
    pub delivered: usize,
}

impl StatusCounts {
    pub fn tally(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut counts, order| {
            match order.status {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Processing => counts.processing += 1,
                OrderStatus::Shipped => counts.shipped += 1,
                OrderStatus::Delivered => counts.delivered += 1,
            }
            counts
        })
    }

    pub fn get(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Processing => self.processing,
            OrderStatus::Shipped => self.shipped,
            OrderStatus::Delivered => self.delivered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog;

    fn order(id: &str) -> Order {
        catalog::orders()
            .into_iter()
            .find(|order| order.id == id)
            .expect("seed order")
    }

    #[test]
    fn seed_totals_agree_with_line_items() {
        for order in catalog::orders() {
            assert!(order.total_matches_items(), "{}", order.id);
        }

        let mut order = order("ORD-001");
        order.items[1].quantity = 2;
        assert!((order.items_total() - 199.97).abs() < 1e-9);
        assert!(!order.total_matches_items());
    }

    #[test]
    fn pending_moves_to_processing_unconditionally() {
        let mut order = order("ORD-001");
        assert!(!order.all_picked());
        assert_eq!(order.advance(), Ok(OrderStatus::Processing));
    }

    #[test]
    fn shipping_waits_for_every_item() {
        let mut order = order("ORD-001");
        order.advance().unwrap();

        assert_eq!(
            order.advance(),
            Err(TransitionError::UnpickedItems { remaining: 2 })
        );
        assert_eq!(order.status, OrderStatus::Processing);

        order.toggle_picked("1").unwrap();
        assert_eq!(
            order.advance(),
            Err(TransitionError::UnpickedItems { remaining: 1 })
        );
        assert_eq!(order.status, OrderStatus::Processing);

        order.toggle_picked("2").unwrap();
        assert_eq!(order.advance(), Ok(OrderStatus::Shipped));
        assert_eq!(order.advance(), Ok(OrderStatus::Delivered));
    }

    #[test]
    fn delivered_is_terminal() {
        let mut order = order("ORD-003");
        order.advance().unwrap();
        let before = order.clone();

        assert_eq!(
            order.advance(),
            Err(TransitionError::Terminal(OrderStatus::Delivered))
        );
        assert_eq!(order, before);
        assert!(order.status.is_terminal());
        assert_eq!(order.status.action_label(), None);
    }

    #[test]
    fn toggling_flips_one_item_and_keeps_status() {
        let mut order = order("ORD-002");
        assert_eq!(order.toggle_picked("3"), Ok(false));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.picked_count(), 0);
        assert_eq!(order.toggle_picked("3"), Ok(true));
        assert_eq!(
            order.toggle_picked("nope"),
            Err(TransitionError::UnknownItem("nope".to_string()))
        );
    }

    #[test]
    fn filter_combines_status_and_search() {
        let orders = catalog::orders();

        let all = OrderFilter::default();
        assert_eq!(all.apply(&orders).len(), 3);

        let by_name = OrderFilter {
            status: None,
            search: "SARAH".to_string(),
        };
        let found = by_name.apply(&orders);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "ORD-002");

        let by_id = OrderFilter {
            status: Some(OrderStatus::Shipped),
            search: "ord-00".to_string(),
        };
        let found = by_id.apply(&orders);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "ORD-003");

        let mismatch = OrderFilter {
            status: Some(OrderStatus::Pending),
            search: "mike".to_string(),
        };
        assert!(mismatch.apply(&orders).is_empty());
    }

    #[test]
    fn counts_per_status() {
        let counts = StatusCounts::tally(&catalog::orders());
        assert_eq!(counts.get(OrderStatus::Pending), 1);
        assert_eq!(counts.get(OrderStatus::Processing), 1);
        assert_eq!(counts.get(OrderStatus::Shipped), 1);
        assert_eq!(counts.get(OrderStatus::Delivered), 0);
    }

    #[test]
    fn parse_ignores_case_and_rejects_all() {
        assert_eq!(OrderStatus::parse(" Shipped "), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("all"), None);
    }
}
