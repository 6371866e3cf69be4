//! Input validation helpers
//!
//! Synchronous form checks run before anything is submitted to the API.
//! Text length limits follow what the backend accepts.

use chrono::NaiveDate;
use shared::LoginRequest;
use shared::models::{
    BranchCreate, BranchUpdate, ComboCreate, ComboUpdate, EmployeeCreate, EmployeeUpdate,
    MembershipCreate, MembershipUpdate, ProductCreate, ProductUpdate, Role, ServiceCreate,
    ServiceUpdate, TransactionCreate,
};

use crate::{ClientError, ClientResult};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: branch, service, product, combo, membership, employee
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, benefits
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, SKU, category
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Amount allowed where a total is compared against its items
const AMOUNT_EPSILON: f64 = 0.005;

// ── Field helpers ───────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(ClientError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: Option<&str>, field: &str, max_len: usize) -> ClientResult<()> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(ClientError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Minimal email shape check: `local@domain.tld`
pub fn validate_email(value: &str, field: &str) -> ClientResult<()> {
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    let valid = match value.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ClientError::validation(format!("{field} is not a valid email address")));
    }
    Ok(())
}

/// Password length and confirmation match
pub fn validate_password(password: &str, confirmation: &str) -> ClientResult<()> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ClientError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(ClientError::validation(format!(
            "Password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    if password != confirmation {
        return Err(ClientError::validation("Passwords do not match"));
    }
    Ok(())
}

/// Finite, non-negative amount
pub fn validate_amount(value: f64, field: &str) -> ClientResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ClientError::validation(format!("{field} must be a non-negative number")));
    }
    Ok(())
}

/// Value within `min..=max`
pub fn validate_range(value: f64, min: f64, max: f64, field: &str) -> ClientResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ClientError::validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

/// Percentage in 0..=100
pub fn validate_percent(value: f64, field: &str) -> ClientResult<()> {
    validate_range(value, 0.0, 100.0, field)
}

/// Start date not after end date
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ClientResult<()> {
    if start > end {
        return Err(ClientError::validation("Start date must not be after end date"));
    }
    Ok(())
}

fn validate_branch_refs(branch_ids: &[String]) -> ClientResult<()> {
    if branch_ids.is_empty() {
        return Err(ClientError::validation("Select at least one branch"));
    }
    if branch_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(ClientError::validation("Branch reference must not be empty"));
    }
    Ok(())
}

// ── Forms ───────────────────────────────────────────────────────────

pub fn validate_login(credentials: &LoginRequest) -> ClientResult<()> {
    validate_required_text(&credentials.email, "Email", MAX_EMAIL_LEN)?;
    validate_required_text(&credentials.password, "Password", MAX_PASSWORD_LEN)
}

pub fn validate_branch_create(payload: &BranchCreate) -> ClientResult<()> {
    validate_required_text(&payload.name, "Branch name", MAX_NAME_LEN)?;
    validate_required_text(&payload.address, "Address", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.phone, "Phone", MAX_SHORT_TEXT_LEN)?;
    validate_email(&payload.email, "Email")?;
    validate_optional_text(payload.manager_name.as_deref(), "Manager name", MAX_NAME_LEN)
}

pub fn validate_branch_update(payload: &BranchUpdate) -> ClientResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "Branch name", MAX_NAME_LEN)?;
    }
    if let Some(address) = &payload.address {
        validate_required_text(address, "Address", MAX_ADDRESS_LEN)?;
    }
    if let Some(phone) = &payload.phone {
        validate_required_text(phone, "Phone", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email, "Email")?;
    }
    validate_optional_text(payload.manager_name.as_deref(), "Manager name", MAX_NAME_LEN)
}

pub fn validate_service_create(payload: &ServiceCreate) -> ClientResult<()> {
    validate_required_text(&payload.name, "Service name", MAX_NAME_LEN)?;
    validate_optional_text(payload.description.as_deref(), "Description", MAX_NOTE_LEN)?;
    validate_required_text(&payload.category, "Category", MAX_SHORT_TEXT_LEN)?;
    validate_amount(payload.price, "Price")?;
    if payload.duration_minutes == 0 {
        return Err(ClientError::validation("Duration must be at least 1 minute"));
    }
    validate_branch_refs(&payload.branch_ids)
}

pub fn validate_service_update(payload: &ServiceUpdate) -> ClientResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "Service name", MAX_NAME_LEN)?;
    }
    validate_optional_text(payload.description.as_deref(), "Description", MAX_NOTE_LEN)?;
    if let Some(category) = &payload.category {
        validate_required_text(category, "Category", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_amount(price, "Price")?;
    }
    if payload.duration_minutes == Some(0) {
        return Err(ClientError::validation("Duration must be at least 1 minute"));
    }
    if let Some(branch_ids) = &payload.branch_ids {
        validate_branch_refs(branch_ids)?;
    }
    Ok(())
}

pub fn validate_product_create(payload: &ProductCreate) -> ClientResult<()> {
    validate_required_text(&payload.name, "Product name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "Category", MAX_SHORT_TEXT_LEN)?;
    validate_amount(payload.price, "Price")?;
    if payload.stock < 0 {
        return Err(ClientError::validation("Stock must not be negative"));
    }
    validate_required_text(&payload.branch_id, "Branch", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(payload.sku.as_deref(), "SKU", MAX_SHORT_TEXT_LEN)
}

pub fn validate_product_update(payload: &ProductUpdate) -> ClientResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "Product name", MAX_NAME_LEN)?;
    }
    if let Some(category) = &payload.category {
        validate_required_text(category, "Category", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_amount(price, "Price")?;
    }
    if payload.stock.is_some_and(|s| s < 0) {
        return Err(ClientError::validation("Stock must not be negative"));
    }
    validate_optional_text(payload.sku.as_deref(), "SKU", MAX_SHORT_TEXT_LEN)
}

pub fn validate_combo_create(payload: &ComboCreate) -> ClientResult<()> {
    validate_required_text(&payload.name, "Combo name", MAX_NAME_LEN)?;
    if payload.service_ids.is_empty() {
        return Err(ClientError::validation("A combo must include at least one service"));
    }
    validate_amount(payload.price, "Combo price")?;
    validate_branch_refs(&payload.branch_ids)
}

pub fn validate_combo_update(payload: &ComboUpdate) -> ClientResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "Combo name", MAX_NAME_LEN)?;
    }
    if payload.service_ids.as_ref().is_some_and(Vec::is_empty) {
        return Err(ClientError::validation("A combo must include at least one service"));
    }
    if let Some(price) = payload.price {
        validate_amount(price, "Combo price")?;
    }
    if let Some(branch_ids) = &payload.branch_ids {
        validate_branch_refs(branch_ids)?;
    }
    Ok(())
}

pub fn validate_membership_create(payload: &MembershipCreate) -> ClientResult<()> {
    validate_required_text(&payload.name, "Membership name", MAX_NAME_LEN)?;
    validate_optional_text(payload.customer_name.as_deref(), "Customer name", MAX_NAME_LEN)?;
    validate_percent(payload.discount_percent, "Discount")?;
    validate_amount(payload.price, "Price")?;
    validate_date_range(payload.valid_from, payload.valid_until)?;
    for benefit in &payload.benefits {
        validate_required_text(benefit, "Benefit", MAX_NOTE_LEN)?;
    }
    validate_branch_refs(&payload.branch_ids)
}

pub fn validate_membership_update(payload: &MembershipUpdate) -> ClientResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "Membership name", MAX_NAME_LEN)?;
    }
    validate_optional_text(payload.customer_name.as_deref(), "Customer name", MAX_NAME_LEN)?;
    if let Some(discount) = payload.discount_percent {
        validate_percent(discount, "Discount")?;
    }
    if let Some(price) = payload.price {
        validate_amount(price, "Price")?;
    }
    if let (Some(from), Some(until)) = (payload.valid_from, payload.valid_until) {
        validate_date_range(from, until)?;
    }
    if let Some(branch_ids) = &payload.branch_ids {
        validate_branch_refs(branch_ids)?;
    }
    Ok(())
}

pub fn validate_employee_create(payload: &EmployeeCreate) -> ClientResult<()> {
    validate_required_text(&payload.name, "Name", MAX_NAME_LEN)?;
    validate_email(&payload.email, "Email")?;
    validate_optional_text(payload.phone.as_deref(), "Phone", MAX_SHORT_TEXT_LEN)?;
    validate_password(&payload.password, &payload.confirm_password)?;
    validate_employee_branch(payload.role, payload.branch_id.as_deref())
}

pub fn validate_employee_update(payload: &EmployeeUpdate) -> ClientResult<()> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "Name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email, "Email")?;
    }
    validate_optional_text(payload.phone.as_deref(), "Phone", MAX_SHORT_TEXT_LEN)?;
    if let Some(password) = &payload.password {
        validate_password(password, payload.confirm_password.as_deref().unwrap_or_default())?;
    }
    if let Some(role) = payload.role {
        validate_employee_branch(role, payload.branch_id.as_deref())?;
    }
    Ok(())
}

/// Branch-scoped roles need a branch
fn validate_employee_branch(role: Role, branch_id: Option<&str>) -> ClientResult<()> {
    if role.is_branch_scoped() && branch_id.is_none_or(|b| b.trim().is_empty()) {
        return Err(ClientError::validation(format!(
            "A {} must be assigned to a branch",
            role.label()
        )));
    }
    Ok(())
}

pub fn validate_transaction_create(payload: &TransactionCreate) -> ClientResult<()> {
    validate_required_text(&payload.branch_id, "Branch", MAX_SHORT_TEXT_LEN)?;
    if payload.items.is_empty() {
        return Err(ClientError::validation("Add at least one item"));
    }
    for item in &payload.items {
        validate_required_text(&item.product_id, "Product", MAX_SHORT_TEXT_LEN)?;
        if item.quantity == 0 {
            return Err(ClientError::validation("Quantity must be at least 1"));
        }
        validate_amount(item.price, "Unit price")?;
    }
    validate_amount(payload.total, "Total")?;
    let expected: f64 = payload.items.iter().map(|i| i.line_total()).sum();
    if (expected - payload.total).abs() > AMOUNT_EPSILON {
        return Err(ClientError::validation(format!(
            "Total {:.2} does not match items ({:.2})",
            payload.total, expected
        )));
    }
    validate_optional_text(payload.customer.as_deref(), "Customer", MAX_NAME_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MembershipTier, TransactionItem};

    fn employee() -> EmployeeCreate {
        EmployeeCreate {
            name: "Hoa".into(),
            email: "hoa@lotus.spa".into(),
            phone: None,
            password: "secret123".into(),
            confirm_password: "secret123".into(),
            role: Role::Pos,
            branch_id: Some("b1".into()),
        }
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Spa One", "Name", 10).is_ok());
        assert!(validate_required_text("   ", "Name", 10).is_err());
        assert!(validate_required_text("abcdefghijk", "Name", 10).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("a@b.co", "Email").is_ok());
        assert!(validate_email("no-at-sign", "Email").is_err());
        assert!(validate_email("a@nodot", "Email").is_err());
        assert!(validate_email("a b@c.d", "Email").is_err());
        assert!(validate_email("@c.d", "Email").is_err());
    }

    #[test]
    fn test_password_confirmation_mismatch() {
        let err = validate_password("secret123", "secret124").unwrap_err();
        assert_eq!(err.user_message(), "Passwords do not match");
        assert!(validate_password("abc", "abc").is_err());
    }

    #[test]
    fn test_employee_needs_branch_unless_admin() {
        assert!(validate_employee_create(&employee()).is_ok());

        let mut payload = employee();
        payload.branch_id = None;
        assert!(validate_employee_create(&payload).is_err());

        payload.role = Role::Admin;
        assert!(validate_employee_create(&payload).is_ok());
    }

    #[test]
    fn test_employee_update_password_requires_confirmation() {
        let update = EmployeeUpdate {
            password: Some("newsecret".into()),
            ..Default::default()
        };
        assert!(validate_employee_update(&update).is_err());

        let update = EmployeeUpdate {
            password: Some("newsecret".into()),
            confirm_password: Some("newsecret".into()),
            ..Default::default()
        };
        assert!(validate_employee_update(&update).is_ok());
    }

    #[test]
    fn test_percent_range() {
        assert!(validate_percent(0.0, "Discount").is_ok());
        assert!(validate_percent(100.0, "Discount").is_ok());
        assert!(validate_percent(-1.0, "Discount").is_err());
        assert!(validate_percent(100.5, "Discount").is_err());
        assert!(validate_percent(f64::NAN, "Discount").is_err());
    }

    #[test]
    fn test_membership_dates() {
        let payload = MembershipCreate {
            name: "Gold".into(),
            customer_name: None,
            discount_percent: 10.0,
            price: 99.0,
            valid_from: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            tier: MembershipTier::Gold,
            benefits: vec![],
            branch_ids: vec!["b1".into()],
        };
        let err = validate_membership_create(&payload).unwrap_err();
        assert_eq!(err.user_message(), "Start date must not be after end date");
    }

    #[test]
    fn test_combo_requires_services() {
        let payload = ComboCreate {
            name: "Relax".into(),
            service_ids: vec![],
            price: 50.0,
            branch_ids: vec!["b1".into()],
        };
        assert!(validate_combo_create(&payload).is_err());
    }

    #[test]
    fn test_transaction_total_must_match_items() {
        let items = vec![TransactionItem { product_id: "p1".into(), quantity: 2, price: 5.0 }];
        let ok = TransactionCreate::from_items("b1", items.clone(), None);
        assert!(validate_transaction_create(&ok).is_ok());

        let bad = TransactionCreate { total: 11.0, ..ok };
        assert!(validate_transaction_create(&bad).is_err());

        let empty = TransactionCreate::from_items("b1", vec![], None);
        assert!(validate_transaction_create(&empty).is_err());
    }
}
