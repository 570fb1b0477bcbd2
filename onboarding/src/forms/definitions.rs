//! The concrete forms used by the pages.

use regex::Regex;
use rust_decimal::Decimal;

use super::validator::{FieldRule, FieldSpec, FormSpec, FormState};
use crate::bank_link::BankAccountDetails;
use crate::client::OnboardingProfile;

pub mod fields {
    pub const IP: &str = "ip";
    pub const TOS_CONSENT: &str = "tosConsent";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const ADDRESS_LINE1: &str = "addressLine1";
    pub const ADDRESS_LINE2: &str = "addressLine2";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const POSTAL_CODE: &str = "postalCode";
    pub const COUNTRY: &str = "country";
    pub const SSN_LAST4: &str = "ssnLast4";
    pub const DOB: &str = "dob";
    pub const ACCOUNT_ID: &str = "accountId";

    pub const ACCOUNT_HOLDER_NAME: &str = "accountHolderName";
    pub const ROUTING_NUMBER: &str = "routingNumber";
    pub const ACCOUNT_NUMBER: &str = "accountNumber";
    pub const ACCOUNT_TYPE: &str = "accountType";

    pub const AMOUNT: &str = "amount";
}

pub const ROUTING_NUMBER_LEN: usize = 9;

fn pattern(p: &str) -> FieldRule {
    FieldRule::Pattern(Regex::new(p).expect("form pattern is valid"))
}

/// Connect-account profile collected across the onboarding wizard.
pub fn profile_form() -> FormSpec {
    use fields::*;

    FormSpec::new()
        .field(FieldSpec::new(IP).required())
        .field(FieldSpec::new(TOS_CONSENT).rule(FieldRule::RequiredTrue).default_value("false"))
        .field(FieldSpec::new(FIRST_NAME).required())
        .field(FieldSpec::new(LAST_NAME).required())
        .field(FieldSpec::new(EMAIL).required().rule(FieldRule::Email))
        .field(FieldSpec::new(PHONE).required())
        .field(FieldSpec::new(ADDRESS_LINE1).required())
        .field(FieldSpec::new(ADDRESS_LINE2).required())
        .field(FieldSpec::new(CITY).required())
        .field(FieldSpec::new(STATE).required())
        .field(FieldSpec::new(POSTAL_CODE).required())
        .field(FieldSpec::new(COUNTRY).required().default_value("US"))
        .field(FieldSpec::new(SSN_LAST4).required().rule(pattern(r"^\d{4}$")))
        .field(FieldSpec::new(DOB).required().rule(pattern(r"^\d{4}-\d{2}-\d{2}$")))
        .field(FieldSpec::new(ACCOUNT_ID).required())
}

pub fn bank_details_form() -> FormSpec {
    use fields::*;

    FormSpec::new()
        .field(FieldSpec::new(ACCOUNT_HOLDER_NAME).required())
        .field(FieldSpec::new(ROUTING_NUMBER).required().rule(pattern(r"^[0-9]{9}$")))
        .field(FieldSpec::new(ACCOUNT_NUMBER).required())
        .field(FieldSpec::new(ACCOUNT_TYPE).required().default_value("checking"))
}

/// Single amount field in major units, at most two decimals, at least 0.01.
pub fn amount_form() -> FormSpec {
    FormSpec::new().field(
        FieldSpec::new(fields::AMOUNT)
            .required()
            .rule(pattern(r"^[0-9]+(\.[0-9]{1,2})?$"))
            .rule(FieldRule::Min(Decimal::new(1, 2))),
    )
}

pub fn profile_from_form(form: &FormState) -> OnboardingProfile {
    use fields::*;

    OnboardingProfile {
        ip: form.value(IP).to_string(),
        tos_consent: form.flag(TOS_CONSENT),
        first_name: form.value(FIRST_NAME).to_string(),
        last_name: form.value(LAST_NAME).to_string(),
        email: form.value(EMAIL).to_string(),
        phone: form.value(PHONE).to_string(),
        address_line1: form.value(ADDRESS_LINE1).to_string(),
        address_line2: form.value(ADDRESS_LINE2).to_string(),
        city: form.value(CITY).to_string(),
        state: form.value(STATE).to_string(),
        postal_code: form.value(POSTAL_CODE).to_string(),
        country: form.value(COUNTRY).to_string(),
        ssn_last4: form.value(SSN_LAST4).to_string(),
        dob: form.value(DOB).to_string(),
        account_id: form.value(ACCOUNT_ID).to_string(),
    }
}

/// Field/value pairs for every profile field except consent and account id,
/// which the wizard manages itself.
pub fn profile_entries(profile: &OnboardingProfile) -> Vec<(&'static str, String)> {
    use fields::*;

    vec![
        (IP, profile.ip.clone()),
        (FIRST_NAME, profile.first_name.clone()),
        (LAST_NAME, profile.last_name.clone()),
        (EMAIL, profile.email.clone()),
        (PHONE, profile.phone.clone()),
        (ADDRESS_LINE1, profile.address_line1.clone()),
        (ADDRESS_LINE2, profile.address_line2.clone()),
        (CITY, profile.city.clone()),
        (STATE, profile.state.clone()),
        (POSTAL_CODE, profile.postal_code.clone()),
        (COUNTRY, profile.country.clone()),
        (SSN_LAST4, profile.ssn_last4.clone()),
        (DOB, profile.dob.clone()),
    ]
}

pub fn bank_details_from_form(form: &FormState) -> BankAccountDetails {
    use fields::*;

    BankAccountDetails {
        account_holder_name: form.value(ACCOUNT_HOLDER_NAME).to_string(),
        routing_number: form.value(ROUTING_NUMBER).to_string(),
        account_number: form.value(ACCOUNT_NUMBER).to_string(),
        account_type: form.value(ACCOUNT_TYPE).to_string(),
        ..BankAccountDetails::default()
    }
}
