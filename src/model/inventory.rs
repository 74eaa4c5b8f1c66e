//! Medicine inventory

use serde::{Deserialize, Serialize};

use super::common::RecordRef;
use super::member::push_opt;

/// Stock above this is "In Stock"; anything positive below is "Low Stock"
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// A stocked medicine or supply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub item_name: String,
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, rename = "schoolId")]
    pub school_id: Option<RecordRef>,
}

impl InventoryItem {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::for_stock(self.current_stock)
    }

    pub fn unit_label(&self) -> &str {
        self.unit.as_deref().unwrap_or("tablets")
    }

    /// Label used in medicine pickers
    pub fn picker_label(&self) -> String {
        format!("{} (Stock: {})", self.item_name, self.current_stock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn for_stock(stock: i64) -> Self {
        if stock > LOW_STOCK_THRESHOLD {
            StockStatus::InStock
        } else if stock > 0 {
            StockStatus::LowStock
        } else {
            StockStatus::OutOfStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

/// Create/update payload for an inventory item
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventoryPayload {
    pub item_name: String,
    pub current_stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    pub unit: String,
    #[serde(rename = "schoolId", skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}

/// Query parameters for `GET /api/v1/inventory`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryQuery {
    pub school_id: Option<String>,
    pub search: Option<String>,
    pub stock_status: Option<String>,
    pub expiry_before: Option<String>,
}

impl InventoryQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "schoolId", self.school_id.clone());
        push_opt(&mut pairs, "search", self.search.clone());
        push_opt(&mut pairs, "stockStatus", self.stock_status.clone());
        push_opt(&mut pairs, "expiryBefore", self.expiry_before.clone());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::for_stock(11), StockStatus::InStock);
        assert_eq!(StockStatus::for_stock(10), StockStatus::LowStock);
        assert_eq!(StockStatus::for_stock(1), StockStatus::LowStock);
        assert_eq!(StockStatus::for_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::for_stock(-2).label(), "Out of Stock");
    }

    #[test]
    fn test_item_deserializes_snake_case() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"_id":"i1","item_name":"Paracetamol","current_stock":24,"schoolId":"sch1"}"#,
        )
        .unwrap();
        assert_eq!(item.picker_label(), "Paracetamol (Stock: 24)");
        assert_eq!(item.unit_label(), "tablets");
        assert_eq!(item.school_id.unwrap().id(), "sch1");
    }
}
