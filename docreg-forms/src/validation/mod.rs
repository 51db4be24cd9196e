//! Field validation for registry forms.
//!
//! Rules are pure checks on a field value (plus a read-only view of the
//! rest of the form). A [`FieldSpec`] chains rules in order and reports the
//! first failure, the same short-circuit the form pages use when they show
//! one message per field.
//!
//! # Example
//!
//! ```
//! use docreg_forms::FormSnapshot;
//! use docreg_forms::validation::FieldSpec;
//!
//! let email = FieldSpec::new("email")
//!     .required("Email é obrigatório")
//!     .email("Email deve ter um formato válido");
//!
//! let result = email.validate(&FormSnapshot::new().with("email", "ana"));
//! assert_eq!(result.message.as_deref(), Some("Email deve ter um formato válido"));
//! ```

mod cep;
mod cpf;
mod field;
mod password;
mod result;
mod rule;

pub use cep::{digits_only, is_valid_cep, mask_cep};
pub use cpf::{format_cpf, validate_cpf};
pub use field::FieldSpec;
pub use password::{PasswordChecks, PasswordStrength, StrengthLevel, password_strength};
pub use result::{FieldError, ValidationResult};
pub use rule::{Rule, RuleKind, parse_date};
