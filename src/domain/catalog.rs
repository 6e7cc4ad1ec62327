//! Seed data loaded into the in-memory repositories on startup.

use time::macros::date;

use super::entities::{
    Defect, Device, Order, OrderItem, OrderStatus, Part, Priority, QualityTier, Severity,
    TierPrices,
};

fn device(id: &str, brand: &str, model: &str, category: &str, base_price: f64) -> Device {
    Device {
        id: id.to_string(),
        brand: brand.to_string(),
        model: model.to_string(),
        category: category.to_string(),
        base_price,
        release_year: None,
        discontinued: false,
        last_updated: date!(2024 - 01 - 15),
    }
}

pub fn devices() -> Vec<Device> {
    vec![
        device("1", "Apple", "iPhone 14 Pro", "Smartphone", 899.0),
        device("2", "Apple", "iPhone 13", "Smartphone", 699.0),
        device("3", "Apple", "iPad Pro 12.9\"", "Tablet", 1099.0),
        device("4", "Apple", "MacBook Pro 14\"", "Laptop", 1999.0),
        device("5", "Samsung", "Galaxy S23 Ultra", "Smartphone", 1199.0),
    ]
}

fn defect(id: &str, name: &str, severity: Severity, cost_impact: f64) -> Defect {
    Defect {
        id: id.to_string(),
        name: name.to_string(),
        severity,
        cost_impact,
    }
}

pub fn defects() -> Vec<Defect> {
    vec![
        defect("1", "Cracked Screen", Severity::High, 0.4),
        defect("2", "Water Damage", Severity::High, 0.6),
        defect("3", "Broken Camera", Severity::Medium, 0.2),
        defect("4", "Battery Issues", Severity::Medium, 0.15),
        defect("5", "Scratches", Severity::Low, 0.05),
        defect("6", "Broken Home Button", Severity::Medium, 0.1),
    ]
}

fn part(id: &str, name: &str, category: &str, prices: [f64; 3], stock: u32) -> Part {
    let [budget, premium, refurbished] = prices;
    Part {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        prices: TierPrices {
            budget,
            premium,
            refurbished,
        },
        stock,
        out_of_stock: stock == 0,
        last_updated: date!(2024 - 01 - 15),
    }
}

pub fn parts() -> Vec<Part> {
    vec![
        part("1", "Screen Assembly", "Display", [89.99, 149.99, 119.99], 45),
        part("2", "Battery", "Power", [24.99, 39.99, 29.99], 120),
        part("3", "Camera Module", "Camera", [34.99, 59.99, 44.99], 67),
        part("4", "Logic Board", "Motherboard", [199.99, 299.99, 249.99], 12),
    ]
}

fn item(id: &str, part_name: &str, quality: QualityTier, unit_price: f64, picked: bool) -> OrderItem {
    OrderItem {
        id: id.to_string(),
        part_name: part_name.to_string(),
        quality,
        quantity: 1,
        unit_price,
        picked,
    }
}

pub fn orders() -> Vec<Order> {
    vec![
        Order {
            id: "ORD-001".to_string(),
            customer_name: "John Smith".to_string(),
            order_date: date!(2024 - 01 - 15),
            status: OrderStatus::Pending,
            priority: Priority::High,
            items: vec![
                item("1", "Screen Assembly", QualityTier::Premium, 149.99, false),
                item("2", "Battery", QualityTier::Budget, 24.99, false),
            ],
            total_amount: 174.98,
            shipping_address: "123 Main St, Anytown, USA 12345".to_string(),
            revision: 0,
        },
        Order {
            id: "ORD-002".to_string(),
            customer_name: "Sarah Johnson".to_string(),
            order_date: date!(2024 - 01 - 15),
            status: OrderStatus::Processing,
            priority: Priority::Medium,
            items: vec![item(
                "3",
                "Camera Module",
                QualityTier::Refurbished,
                44.99,
                true,
            )],
            total_amount: 44.99,
            shipping_address: "456 Oak Ave, Somewhere, USA 67890".to_string(),
            revision: 0,
        },
        Order {
            id: "ORD-003".to_string(),
            customer_name: "Mike Wilson".to_string(),
            order_date: date!(2024 - 01 - 14),
            status: OrderStatus::Shipped,
            priority: Priority::Low,
            items: vec![
                item("4", "Logic Board", QualityTier::Premium, 299.99, true),
                item("5", "Battery", QualityTier::Premium, 39.99, true),
            ],
            total_amount: 339.98,
            shipping_address: "789 Pine Rd, Elsewhere, USA 11111".to_string(),
            revision: 0,
        },
    ]
}
