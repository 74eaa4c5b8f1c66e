//! Inventory item form

use super::{non_empty, parse_date};
use crate::client::{ApiClient, Transport};
use crate::error::{ClientResult, ValidationErrors};
use crate::model::{InventoryItem, InventoryPayload};
use crate::services::inventory;
use crate::session::SessionStore;

pub const DEFAULT_UNIT: &str = "tablets";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryForm {
    pub item_name: String,
    pub current_stock: String,
    pub expiry_date: String,
    pub unit: String,
}

impl InventoryForm {
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            item_name: item.item_name.clone(),
            current_stock: item.current_stock.to_string(),
            expiry_date: item
                .expiry_date
                .as_deref()
                .and_then(parse_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            unit: item.unit.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.item_name.trim().is_empty() {
            errors.add("itemName", "Item name is required");
        }
        if self.current_stock.trim().parse::<u32>().is_err() {
            errors.add("currentStock", "Stock must be a whole number of zero or more");
        }
        if !self.expiry_date.trim().is_empty() && parse_date(&self.expiry_date).is_none() {
            errors.add("expiryDate", "Please enter a valid expiry date");
        }

        errors
    }

    pub fn to_payload(&self, school_id: Option<&str>) -> ClientResult<InventoryPayload> {
        self.validate().into_result(())?;
        Ok(InventoryPayload {
            item_name: self.item_name.trim().to_string(),
            current_stock: self.current_stock.trim().parse::<i64>().unwrap_or_default(),
            expiry_date: parse_date(&self.expiry_date).map(|d| d.format("%Y-%m-%d").to_string()),
            unit: non_empty(&self.unit).unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            school_id: school_id.and_then(non_empty),
        })
    }
}

/// Validate and save: create when `editing` is `None`, otherwise update
pub async fn save<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    form: &InventoryForm,
    school_id: Option<&str>,
    editing: Option<&str>,
) -> ClientResult<InventoryItem> {
    let payload = form.to_payload(school_id)?;
    match editing {
        Some(id) => inventory::update(client, id, &payload).await,
        None => inventory::create(client, &payload).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_defaults_to_tablets() {
        let form = InventoryForm {
            item_name: " Paracetamol 500mg ".into(),
            current_stock: "40".into(),
            ..InventoryForm::default()
        };
        let payload = form.to_payload(Some("sch1")).unwrap();
        assert_eq!(payload.item_name, "Paracetamol 500mg");
        assert_eq!(payload.unit, DEFAULT_UNIT);
        assert_eq!(payload.current_stock, 40);
        assert!(payload.expiry_date.is_none());
    }

    #[test]
    fn test_rejects_negative_or_fractional_stock() {
        for stock in ["-1", "2.5", "", "lots"] {
            let form = InventoryForm {
                item_name: "ORS".into(),
                current_stock: stock.into(),
                ..InventoryForm::default()
            };
            assert!(form.validate().contains("currentStock"), "accepted {:?}", stock);
        }
    }
}
