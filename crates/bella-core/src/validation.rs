//! # Validation Module
//!
//! Input validation for the store's request types.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (CLI argument parsing)                             │
//! │  ├── Type validation (numbers, enums)                                  │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Business rule validation (empty cart, quantity > 0, ...)          │
//! │  └── Runs BEFORE any snapshot copy is mutated                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Snapshot invariants (`Snapshot::check_invariants`)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{CreateSaleRequest, CustomerUpdate, NewCustomer, NewProduct, Profile};
use crate::{MAX_INSTALLMENTS, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_PHONE_LEN: usize = 20;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a person or product name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_text(field, name, MAX_NAME_LEN)
}

/// Validates a phone number.
///
/// ## Rules
/// - Must not be empty
/// - Digits plus the usual separators only: `+ ( ) - .` and spaces
///
/// ## Example
/// ```rust
/// use bella_core::validation::validate_phone;
///
/// assert!(validate_phone("(11) 99999-0000").is_ok());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    validate_text("phone", phone, MAX_PHONE_LEN)?;

    let ok = phone
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '(' | ')' | '-' | '.' | ' '));
    if !ok {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits and + ( ) - . separators".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents (0 to MAX_PRICE_CENTS). Zero is allowed
/// (gifts, samples).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::must_not_be_negative("price"));
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stock level or threshold.
pub fn validate_stock(field: &str, units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::must_not_be_negative(field));
    }
    Ok(())
}

/// Validates the number of installments (1 to MAX_INSTALLMENTS).
///
/// ## Example
/// ```rust
/// use bella_core::validation::validate_installments_count;
///
/// assert!(validate_installments_count(1).is_ok());
/// assert!(validate_installments_count(12).is_ok());
/// assert!(validate_installments_count(0).is_err());
/// ```
pub fn validate_installments_count(count: u32) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::must_be_positive("installments"));
    }

    if count > MAX_INSTALLMENTS {
        return Err(ValidationError::OutOfRange {
            field: "installments".to_string(),
            min: 1,
            max: MAX_INSTALLMENTS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

pub fn validate_new_customer(request: &NewCustomer) -> ValidationResult<()> {
    validate_name("name", &request.name)?;
    validate_phone(&request.phone)
}

pub fn validate_customer_update(update: &CustomerUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_name("name", name)?;
    }
    if let Some(phone) = &update.phone {
        validate_phone(phone)?;
    }
    Ok(())
}

pub fn validate_new_product(request: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &request.name)?;
    validate_price_cents(request.price_cents)?;
    validate_stock("stock", request.stock)?;
    validate_stock("min stock", request.min_stock)
}

/// Validates the shape of a sale request.
///
/// Cart size and referential checks (does the customer / product
/// exist?) live in the ledger.
///
/// ## User Workflow
/// ```text
/// CreateSaleRequest
///      │
///      ├── items empty?              → Error: "items must not be empty"
///      ├── any quantity <= 0?        → Error: "quantity must be positive"
///      ├── installments == 0 or > 12 → Error
///      │
///      └── OK → ledger::plan_sale
/// ```
pub fn validate_sale_request(request: &CreateSaleRequest) -> ValidationResult<()> {
    if request.customer_id.trim().is_empty() {
        return Err(ValidationError::required("customer"));
    }

    if request.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for line in &request.items {
        if line.product_id.trim().is_empty() {
            return Err(ValidationError::required("product"));
        }
        validate_quantity(line.quantity)?;
    }

    validate_installments_count(request.installments_count)
}

pub fn validate_profile(profile: &Profile) -> ValidationResult<()> {
    validate_name("name", &profile.name)?;
    validate_name("business name", &profile.business_name)?;

    let currency = profile.currency.trim();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a 3-letter ISO 4217 code".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, SaleLine};

    fn sale_request(items: Vec<SaleLine>, installments: u32) -> CreateSaleRequest {
        CreateSaleRequest {
            customer_id: "c-1".to_string(),
            items,
            payment_method: PaymentMethod::Pix,
            installments_count: installments,
        }
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("11999990000").is_ok());
        assert!(validate_phone("+55 (11) 99999-0000").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("   ").is_err());
        assert!(validate_phone("11-abc").is_err());
        assert!(validate_phone(&"9".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let mut product = NewProduct {
            name: "Perfume Floral".to_string(),
            category: "Fragrâncias".to_string(),
            price_cents: 12990,
            stock: 5,
            min_stock: 2,
        };
        assert!(validate_new_product(&product).is_ok());

        product.price_cents = -1;
        assert!(validate_new_product(&product).is_err());

        product.price_cents = MAX_PRICE_CENTS;
        assert!(validate_new_product(&product).is_ok());

        product.price_cents = MAX_PRICE_CENTS + 1;
        assert!(matches!(
            validate_new_product(&product),
            Err(ValidationError::OutOfRange { .. })
        ));

        product.price_cents = 0;
        product.stock = -3;
        assert!(validate_new_product(&product).is_err());
    }

    #[test]
    fn test_validate_sale_request() {
        assert!(validate_sale_request(&sale_request(vec![SaleLine::new("p-1", 2)], 3)).is_ok());

        let empty = validate_sale_request(&sale_request(vec![], 1));
        assert!(matches!(empty, Err(ValidationError::Empty { .. })));

        let zero_qty = validate_sale_request(&sale_request(vec![SaleLine::new("p-1", 0)], 1));
        assert!(matches!(zero_qty, Err(ValidationError::MustBePositive { .. })));

        let zero_installments =
            validate_sale_request(&sale_request(vec![SaleLine::new("p-1", 1)], 0));
        assert!(zero_installments.is_err());

        let too_many = validate_sale_request(&sale_request(vec![SaleLine::new("p-1", 1)], 13));
        assert!(matches!(too_many, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_validate_customer_update_only_checks_present_fields() {
        assert!(validate_customer_update(&CustomerUpdate::default()).is_ok());
        let bad = CustomerUpdate {
            name: Some("  ".to_string()),
            phone: None,
        };
        assert!(validate_customer_update(&bad).is_err());
    }

    #[test]
    fn test_validate_profile_currency() {
        let mut profile = Profile::default();
        assert!(validate_profile(&profile).is_ok());

        profile.currency = "real".to_string();
        assert!(validate_profile(&profile).is_err());
    }
}
