//! `validator` hooks over the shared field rules

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

fn check(result: Result<(), &'static str>, code: &'static str) -> Result<(), ValidationError> {
    result.map_err(|message| {
        let mut err = ValidationError::new(code);
        err.message = Some(Cow::Borrowed(message));
        err
    })
}

pub fn name(value: &str) -> Result<(), ValidationError> {
    check(shared::validate_name(value), "name")
}

pub fn company_name(value: &str) -> Result<(), ValidationError> {
    check(shared::validate_company_name(value), "company_name")
}

pub fn phone(value: &str) -> Result<(), ValidationError> {
    check(shared::validate_phone(value), "phone")
}

pub fn image_path(value: &str) -> Result<(), ValidationError> {
    check(shared::validate_image_path(value), "image")
}

pub fn quantity(value: i32) -> Result<(), ValidationError> {
    check(shared::validate_quantity(value), "quantity")
}

pub fn price(value: &Decimal) -> Result<(), ValidationError> {
    check(shared::validate_price(*value), "price")
}

pub fn discount(value: &Decimal) -> Result<(), ValidationError> {
    check(shared::validate_discount(*value), "discount")
}
