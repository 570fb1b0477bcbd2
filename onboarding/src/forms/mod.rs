pub mod definitions;
pub mod validator;

pub use definitions::{amount_form, bank_details_form, fields, profile_form, ROUTING_NUMBER_LEN};
pub use validator::{
    exceeds_balance, validate_value, FieldError, FieldRule, FieldSpec, FieldState, FormSpec,
    FormState,
};
