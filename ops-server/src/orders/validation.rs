//! New-order validation
//!
//! Turns a raw [`CreateOrderRequest`] into a [`NewOrder`], reporting every
//! failing field. The total is computed from the items when not supplied.

use rust_decimal::Decimal;
use shared::models::{CreateOrderRequest, Customer, OrderItem};

use crate::utils::validation::{
    FieldErrors, MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, Validated,
};

pub const MIN_PREP_TIME: i64 = 1;
pub const MAX_PREP_TIME: i64 = 120;
pub const MAX_ITEM_QUANTITY: i64 = 1000;
/// 1,000,000 per unit
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// 1,000,000,000 per order
pub const MAX_TOTAL_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Validated order contents, ready to be stamped with id and timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub customer: Customer,
    pub total_amount: Decimal,
    pub prep_time: i64,
}

pub fn validate_new_order(req: &CreateOrderRequest) -> Validated<NewOrder> {
    let mut errors = FieldErrors::new();

    if req.items.is_empty() {
        errors.push("items", "at least one item is required");
    }
    // Running sum of well-formed lines; `None` once it overflows
    let mut computed_total = Some(Decimal::ZERO);
    for (i, item) in req.items.iter().enumerate() {
        errors.required_text(&item.name, &format!("items[{i}].name"), MAX_NAME_LEN);
        let quantity_ok = (1..=MAX_ITEM_QUANTITY).contains(&item.quantity);
        if !quantity_ok {
            errors.push(
                format!("items[{i}].quantity"),
                format!("quantity must be between 1 and {MAX_ITEM_QUANTITY}"),
            );
        }
        if item.price < Decimal::ZERO {
            errors.push(format!("items[{i}].price"), "price must not be negative");
        } else if item.price > MAX_PRICE {
            errors.push(
                format!("items[{i}].price"),
                format!("price exceeds maximum allowed ({MAX_PRICE})"),
            );
        } else if quantity_ok {
            let line = item.price.checked_mul(Decimal::from(item.quantity));
            if line.is_none() {
                errors.push(format!("items[{i}].price"), "line total is out of range");
            }
            computed_total = computed_total
                .zip(line)
                .and_then(|(sum, line)| sum.checked_add(line));
        }
    }

    errors.required_text(&req.customer.name, "customer.name", MAX_NAME_LEN);
    errors.required_text(&req.customer.phone, "customer.phone", MAX_SHORT_TEXT_LEN);
    errors.required_text(&req.customer.address, "customer.address", MAX_ADDRESS_LEN);

    match req.prep_time {
        None => errors.push("prepTime", "prepTime is required"),
        Some(t) if !(MIN_PREP_TIME..=MAX_PREP_TIME).contains(&t) => errors.push(
            "prepTime",
            format!("prepTime must be between {MIN_PREP_TIME} and {MAX_PREP_TIME} minutes"),
        ),
        Some(_) => {}
    }

    match req.total_amount {
        Some(total) if total < Decimal::ZERO => {
            errors.push("totalAmount", "totalAmount must not be negative")
        }
        Some(total) if total > MAX_TOTAL_AMOUNT => errors.push(
            "totalAmount",
            format!("totalAmount exceeds maximum allowed ({MAX_TOTAL_AMOUNT})"),
        ),
        Some(_) => {}
        None => {
            if computed_total.is_none_or(|total| total > MAX_TOTAL_AMOUNT) {
                errors.push(
                    "totalAmount",
                    format!("order total exceeds maximum allowed ({MAX_TOTAL_AMOUNT})"),
                );
            }
        }
    }

    errors.finish(|| {
        let items: Vec<OrderItem> = req
            .items
            .iter()
            .map(|i| OrderItem {
                name: i.name.trim().to_string(),
                quantity: i.quantity as u32,
                price: i.price,
            })
            .collect();
        let total_amount = req
            .total_amount
            .or(computed_total)
            .unwrap_or(Decimal::ZERO);

        NewOrder {
            items,
            customer: Customer {
                name: req.customer.name.trim().to_string(),
                phone: req.customer.phone.trim().to_string(),
                address: req.customer.address.trim().to_string(),
            },
            total_amount,
            prep_time: req.prep_time.unwrap_or(MIN_PREP_TIME),
        }
    })
}
