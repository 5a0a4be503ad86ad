//! WebAssembly module for the Stock Ledger admin front-end
//!
//! Provides client-side computation for:
//! - Operation line amount preview
//! - Operation group totals preview
//! - Stock replay from a product's movement history
//! - Form field validation before submit

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::ledger::*;
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("stock ledger helpers loaded"));
}

fn js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(value).map_err(|e| format!("Invalid {}: {}", field, e))
}

/// History row as rendered by the product history endpoint
#[derive(Debug, Deserialize)]
struct HistoryRow {
    action: Action,
    quantity: i32,
}

fn checked_line(line: &LineItem) -> Result<(), String> {
    validate_quantity(line.quantity)
        .and(validate_price(line.price))
        .and(validate_discount(line.discount))
        .map_err(str::to_string)
}

fn line_amount_text(quantity: i32, price: &str, discount: &str) -> Result<String, String> {
    let line = LineItem {
        quantity,
        price: parse_decimal("price", price)?,
        discount: parse_decimal("discount", discount)?,
    };
    checked_line(&line)?;
    line.checked_amount()
        .map(|amount| amount.round_dp(2).to_string())
        .ok_or_else(|| "Amount is too large".to_string())
}

fn group_totals_json(lines_json: &str) -> Result<String, String> {
    let lines: Vec<LineItem> =
        serde_json::from_str(lines_json).map_err(|e| format!("Invalid lines JSON: {}", e))?;
    for line in &lines {
        checked_line(line)?;
    }
    let totals = checked_group_totals(&lines).ok_or_else(|| "Total is too large".to_string())?;
    serde_json::to_string(&totals).map_err(|e| e.to_string())
}

fn history_movements(history_json: &str) -> Result<Vec<Movement>, String> {
    let rows: Vec<HistoryRow> =
        serde_json::from_str(history_json).map_err(|e| format!("Invalid history JSON: {}", e))?;
    Ok(rows
        .into_iter()
        .map(|row| Movement::new(row.action, row.quantity))
        .collect())
}

fn check_field(field: &str, value: &str) -> Result<(), String> {
    let result = match field {
        "name" | "full_name" => validate_name(value),
        "phone" => validate_phone(value),
        "image" => validate_image_path(value),
        "quantity" => match value.trim().parse::<i32>() {
            Ok(quantity) => validate_quantity(quantity),
            Err(_) => Err("Quantity must be a whole number"),
        },
        "price" => validate_price(parse_decimal("price", value)?),
        "discount" => validate_discount(parse_decimal("discount", value)?),
        _ => Ok(()),
    };
    result.map_err(str::to_string)
}

/// Amount of one operation line, rounded for display
#[wasm_bindgen]
pub fn preview_line_amount(quantity: i32, price: &str, discount: &str) -> Result<String, JsValue> {
    line_amount_text(quantity, price, discount).map_err(js_error)
}

/// Totals of an operation group from a JSON array of `{quantity, price, discount}`
#[wasm_bindgen]
pub fn preview_group_totals(lines_json: &str) -> Result<String, JsValue> {
    group_totals_json(lines_json).map_err(js_error)
}

/// Remaining stock from a JSON array of `{action, quantity}` movements
#[wasm_bindgen]
pub fn replay_stock(history_json: &str) -> Result<i64, JsValue> {
    history_movements(history_json)
        .map(remaining_stock)
        .map_err(js_error)
}

/// Balance after each movement of a JSON history
#[wasm_bindgen]
pub fn replay_running_balance(history_json: &str) -> Result<Vec<i64>, JsValue> {
    history_movements(history_json)
        .map(running_balance)
        .map_err(js_error)
}

/// Validate a form field; returns the error message, if any
#[wasm_bindgen]
pub fn validate_form_field(field: &str, value: &str) -> Option<String> {
    check_field(field, value).err()
}

/// Display label of an action code in the given language (`en` or `ru`)
#[wasm_bindgen]
pub fn action_label(code: i16, language: &str) -> Option<String> {
    let language = match language {
        "en" => Language::English,
        _ => Language::Russian,
    };
    Action::try_from(code)
        .ok()
        .map(|action| action.label().get(language).to_string())
}
