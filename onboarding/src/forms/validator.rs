use std::collections::BTreeMap;
use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::util::MinorUnits;

#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Value must be non-empty.
    Required,
    /// Value must be exactly `"true"` (checkbox consent).
    RequiredTrue,
    /// Value must match the (anchored) pattern.
    Pattern(Regex),
    Email,
    Min(Decimal),
    Max(Decimal),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("This field is required")]
    Required,
    #[error("You must accept to continue")]
    MustAccept,
    #[error("Invalid format")]
    Pattern,
    #[error("Enter a valid email address")]
    Email,
    #[error("Enter a number")]
    NotNumeric,
    #[error("Must be at least {0}")]
    BelowMin(Decimal),
    #[error("Must be at most {0}")]
    AboveMax(Decimal),
    #[error("Amount exceeds available balance")]
    ExceedsBalance,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rules: Vec<FieldRule>,
    pub default: String,
}

impl FieldSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rules: Vec::new(),
            default: String::new(),
        }
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.rule(FieldRule::Required)
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = value.into();
        self
    }
}

/// Evaluate `spec`'s rules against `value`, returning the first failure.
///
/// Like most form libraries, everything except `Required`/`RequiredTrue`
/// passes on an empty value.
pub fn validate_value(spec: &FieldSpec, value: &str) -> Option<FieldError> {
    let empty = value.trim().is_empty();

    for rule in &spec.rules {
        let failure = match rule {
            FieldRule::Required if empty => Some(FieldError::Required),
            FieldRule::Required => None,
            FieldRule::RequiredTrue if value != "true" => Some(FieldError::MustAccept),
            FieldRule::RequiredTrue => None,
            _ if empty => None,
            FieldRule::Pattern(pattern) if !pattern.is_match(value) => Some(FieldError::Pattern),
            FieldRule::Pattern(_) => None,
            FieldRule::Email if !email_pattern().is_match(value) => Some(FieldError::Email),
            FieldRule::Email => None,
            FieldRule::Min(min) => match Decimal::from_str(value.trim()) {
                Ok(number) if number < *min => Some(FieldError::BelowMin(*min)),
                Ok(_) => None,
                Err(_) => Some(FieldError::NotNumeric),
            },
            FieldRule::Max(max) => match Decimal::from_str(value.trim()) {
                Ok(number) if number > *max => Some(FieldError::AboveMax(*max)),
                Ok(_) => None,
                Err(_) => Some(FieldError::NotNumeric),
            },
        };

        if failure.is_some() {
            return failure;
        }
    }

    None
}

fn email_pattern() -> Regex {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
}

/// Cross-field rule for amounts that may not exceed a fetched balance.
/// Unknown balance never blocks.
pub fn exceeds_balance(amount: MinorUnits, balance: Option<MinorUnits>) -> Option<FieldError> {
    match balance {
        Some(balance) if amount > balance => Some(FieldError::ExceedsBalance),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormSpec {
    fields: Vec<FieldSpec>,
}

impl FormSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub valid: bool,
    pub touched: bool,
    pub error: Option<FieldError>,
}

/// Current values and validity of one form. Validity is always recomputed
/// from the value (plus any external cross-field error), never stored apart
/// from it.
#[derive(Debug, Clone)]
pub struct FormState {
    spec: FormSpec,
    fields: BTreeMap<&'static str, FieldState>,
    external: BTreeMap<&'static str, FieldError>,
}

impl FormState {
    pub fn new(spec: FormSpec) -> Self {
        let mut form = Self {
            spec,
            fields: BTreeMap::new(),
            external: BTreeMap::new(),
        };
        form.reset();
        form
    }

    pub fn reset(&mut self) {
        self.external.clear();
        self.fields = self
            .spec
            .fields()
            .iter()
            .map(|spec| {
                let error = validate_value(spec, &spec.default);
                (
                    spec.name,
                    FieldState {
                        value: spec.default.clone(),
                        valid: error.is_none(),
                        touched: false,
                        error,
                    },
                )
            })
            .collect();
    }

    /// Set a field's value, mark it touched and re-evaluate it.
    /// Returns `false` for a field the form does not define.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        let Some(spec) = self.spec.get(name) else {
            log::warn!("ignoring unknown form field: {}", name);
            return false;
        };
        let key = spec.name;

        if let Some(field) = self.fields.get_mut(key) {
            field.value = value.into();
            field.touched = true;
        }
        self.revalidate_field(key);
        true
    }

    pub fn set_flag(&mut self, name: &str, value: bool) -> bool {
        self.set(name, if value { "true" } else { "false" })
    }

    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn flag(&self, name: &str) -> bool {
        self.value(name) == "true"
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|f| f.valid)
    }

    pub fn mark_all_touched(&mut self) {
        for field in self.fields.values_mut() {
            field.touched = true;
        }
    }

    /// Attach or clear a cross-field error computed outside the form.
    pub fn set_external_error(&mut self, name: &str, error: Option<FieldError>) {
        let Some(key) = self.spec.get(name).map(|s| s.name) else {
            return;
        };
        match error {
            Some(error) => {
                self.external.insert(key, error);
            }
            None => {
                self.external.remove(key);
            }
        }
        self.revalidate_field(key);
    }

    pub fn revalidate(&mut self) {
        let names: Vec<&'static str> = self.spec.fields().iter().map(|f| f.name).collect();
        for name in names {
            self.revalidate_field(name);
        }
    }

    fn revalidate_field(&mut self, name: &'static str) {
        let Some(spec) = self.spec.get(name) else {
            return;
        };
        let Some(field) = self.fields.get_mut(name) else {
            return;
        };

        let error = validate_value(spec, &field.value).or_else(|| self.external.get(name).cloned());
        field.valid = error.is_none();
        field.error = error;
    }

    /// Every invalid field, in field-name order.
    pub fn errors(&self) -> Vec<(&'static str, FieldError)> {
        self.fields
            .iter()
            .filter_map(|(name, f)| f.error.clone().map(|e| (*name, e)))
            .collect()
    }

    /// Errors a UI should render: only fields the user has touched.
    pub fn visible_errors(&self) -> Vec<(&'static str, FieldError)> {
        self.fields
            .iter()
            .filter(|(_, f)| f.touched)
            .filter_map(|(name, f)| f.error.clone().map(|e| (*name, e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn pattern(p: &str) -> FieldRule {
        FieldRule::Pattern(Regex::new(p).unwrap())
    }

    #[test]
    fn required_and_pattern() {
        let spec = FieldSpec::new("ssnLast4").required().rule(pattern(r"^\d{4}$"));
        assert_eq!(validate_value(&spec, ""), Some(FieldError::Required));
        assert_eq!(validate_value(&spec, "12a4"), Some(FieldError::Pattern));
        assert_eq!(validate_value(&spec, "0000"), None);
    }

    #[test]
    fn optional_field_skips_rules_when_empty() {
        let spec = FieldSpec::new("line2").rule(pattern(r"^\d+$"));
        assert_eq!(validate_value(&spec, ""), None);
        assert_eq!(validate_value(&spec, "x"), Some(FieldError::Pattern));
    }

    #[test]
    fn numeric_bounds() {
        let spec = FieldSpec::new("amount")
            .required()
            .rule(FieldRule::Min(Decimal::new(1, 2)))
            .rule(FieldRule::Max(Decimal::new(1000, 0)));
        assert_eq!(
            validate_value(&spec, "0"),
            Some(FieldError::BelowMin(Decimal::new(1, 2)))
        );
        assert_eq!(
            validate_value(&spec, "1000.01"),
            Some(FieldError::AboveMax(Decimal::new(1000, 0)))
        );
        assert_eq!(validate_value(&spec, "ten"), Some(FieldError::NotNumeric));
        assert_eq!(validate_value(&spec, "25.10"), None);
    }

    #[test]
    fn consent_and_email() {
        let consent = FieldSpec::new("tosConsent").rule(FieldRule::RequiredTrue);
        assert_eq!(validate_value(&consent, "false"), Some(FieldError::MustAccept));
        assert_eq!(validate_value(&consent, "true"), None);

        let email = FieldSpec::new("email").required().rule(FieldRule::Email);
        assert_eq!(validate_value(&email, "jane@"), Some(FieldError::Email));
        assert_eq!(validate_value(&email, "jane@example.com"), None);
    }

    #[test]
    fn form_aggregates_field_validity() {
        let mut form = FormState::new(
            FormSpec::new()
                .field(FieldSpec::new("name").required())
                .field(FieldSpec::new("kind").required().default_value("checking")),
        );

        assert!(!form.is_valid());
        assert!(form.visible_errors().is_empty());
        assert!(!form.field("name").unwrap().touched);

        form.set("name", "Jane");
        assert!(form.is_valid());
        assert!(form.field("name").unwrap().touched);
        assert!(!form.set("unknown", "x"));

        form.set("kind", "");
        assert_eq!(form.visible_errors(), vec![("kind", FieldError::Required)]);
    }

    #[test]
    fn external_error_survives_revalidation_until_cleared() {
        let mut form = FormState::new(FormSpec::new().field(FieldSpec::new("amount").required()));
        form.set("amount", "50");
        form.set_external_error("amount", Some(FieldError::ExceedsBalance));
        form.revalidate();
        assert!(!form.is_valid());
        assert_eq!(form.field("amount").unwrap().error, Some(FieldError::ExceedsBalance));

        form.set_external_error("amount", None);
        assert!(form.is_valid());
    }

    #[test]
    fn balance_rule() {
        let balance = Some(MinorUnits::new(15000));
        assert_eq!(
            exceeds_balance(MinorUnits::new(15001), balance),
            Some(FieldError::ExceedsBalance)
        );
        assert_eq!(exceeds_balance(MinorUnits::new(15000), balance), None);
        assert_eq!(exceeds_balance(MinorUnits::new(1_000_000), None), None);
    }
}
