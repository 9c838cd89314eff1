//! Validation rules for signup, registration and profile forms
//!
//! Signup checks run in a fixed order and stop at the first failing step.
//! The password step and the registration form report every violated rule at
//! once so the user can fix them in one pass.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::Role;
use crate::core::db::models::Branch;

/// Symbols accepted by the password policy
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Admission years must be strictly after this one
pub const MIN_ADMISSION_YEAR: i32 = 2000;

/// Length of a phone number
pub const PHONE_DIGITS: usize = 10;

/// Longest name or email the `users` table stores
pub const MAX_FIELD_LENGTH: usize = 255;

/// Largest section number the `users` table stores
pub const MAX_SECTION: u32 = i32::MAX as u32;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

// ============================================================================
// Errors
// ============================================================================

/// A single violated rule. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName,
    NameTooLong,
    InvalidEmail,
    EmailTooLong,
    PasswordTooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSymbol,
    PasswordMismatch,
    EmailAlreadyExists,
    /// Roll number does not have the overall shape
    RollFormat,
    RollPrefix,
    RollYear { year: i32, current: i32 },
    RollSeparator,
    RollBranch { code: String },
    RollSequence,
    RollTaken,
    InvalidSection,
    InvalidPhone,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "Name is required"),
            ValidationError::NameTooLong => write!(
                f,
                "Name must be at most {} characters long",
                MAX_FIELD_LENGTH
            ),
            ValidationError::InvalidEmail => write!(f, "Invalid email format"),
            ValidationError::EmailTooLong => write!(
                f,
                "Email must be at most {} characters long",
                MAX_FIELD_LENGTH
            ),
            ValidationError::PasswordTooShort => write!(
                f,
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
            ValidationError::MissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            ValidationError::MissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            ValidationError::MissingDigit => {
                write!(f, "Password must contain at least one number")
            }
            ValidationError::MissingSymbol => write!(
                f,
                "Password must contain at least one special character ({})",
                PASSWORD_SYMBOLS
            ),
            ValidationError::PasswordMismatch => write!(f, "Passwords do not match"),
            ValidationError::EmailAlreadyExists => write!(f, "Email already exists"),
            ValidationError::RollFormat => write!(
                f,
                "Roll number must be 'S' followed by the admission year, an optional '00', a 2-digit branch code and a 3-digit sequence"
            ),
            ValidationError::RollPrefix => write!(f, "Roll number must start with 'S'"),
            ValidationError::RollYear { year, current } => write!(
                f,
                "Admission year {} must be after {} and before {}",
                year, MIN_ADMISSION_YEAR, current
            ),
            ValidationError::RollSeparator => {
                write!(f, "Roll number must have '00' after the admission year")
            }
            ValidationError::RollBranch { code } => {
                write!(f, "Branch code '{}' must be one of 10, 20 or 30", code)
            }
            ValidationError::RollSequence => {
                write!(f, "Roll sequence number must be greater than 000")
            }
            ValidationError::RollTaken => write!(f, "Roll number is already registered"),
            ValidationError::InvalidSection => write!(f, "Section must be a positive integer"),
            ValidationError::InvalidPhone => write!(
                f,
                "Phone number must be exactly {} digits",
                PHONE_DIGITS
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Join messages the way they are returned to the client
pub fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Signup
// ============================================================================

/// Raw signup form fields
#[derive(Debug, Clone, Default)]
pub struct SignupInput<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub phone: Option<&'a str>,
}

/// Role-dependent switches over the shared signup rule set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignupRules {
    /// Staff collect the phone number at signup
    pub require_phone: bool,
}

impl SignupRules {
    pub fn for_role(role: Role) -> Self {
        Self {
            require_phone: role.is_staff(),
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if email.chars().count() > MAX_FIELD_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    Ok(())
}

/// Check every password rule, returning all violations
pub fn validate_password(password: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(ValidationError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push(ValidationError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(ValidationError::MissingDigit);
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        errors.push(ValidationError::MissingSymbol);
    }

    errors
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() != PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Run the signup checks in order, stopping at the first failing step.
///
/// Email uniqueness is the last step and needs the credential store, so it
/// is checked by the caller.
pub fn validate_signup(input: &SignupInput<'_>, rules: SignupRules) -> Result<(), Vec<ValidationError>> {
    validate_name(input.name).map_err(|e| vec![e])?;
    validate_email(input.email).map_err(|e| vec![e])?;

    let password_errors = validate_password(input.password);
    if !password_errors.is_empty() {
        return Err(password_errors);
    }

    if input.password != input.confirm_password {
        return Err(vec![ValidationError::PasswordMismatch]);
    }

    if rules.require_phone {
        validate_phone(input.phone.unwrap_or_default()).map_err(|e| vec![e])?;
    }

    Ok(())
}

// ============================================================================
// Registration
// ============================================================================

/// A roll number that passed every clause of the grammar
#[derive(Debug, Clone, PartialEq)]
pub struct RollNumber {
    pub raw: String,
    pub year: i32,
    pub branch_code: String,
    pub sequence: u32,
}

impl RollNumber {
    pub fn branch(&self) -> Branch {
        Branch::from_code(&self.branch_code)
    }

    /// Years since admission
    pub fn ug(&self, current_year: i32) -> String {
        (current_year - self.year).to_string()
    }
}

/// Parse a roll number, reporting one error per violated clause.
///
/// Accepted forms are `S` + year + branch + sequence (`S202310045`) and the
/// same with a `00` separator after the year (`S20230010045`).
pub fn parse_roll(raw: &str, current_year: i32) -> Result<RollNumber, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !raw.starts_with('S') {
        errors.push(ValidationError::RollPrefix);
    }

    let body: String = raw.chars().skip(1).collect();
    let well_formed =
        (body.len() == 9 || body.len() == 11) && body.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        errors.push(ValidationError::RollFormat);
        return Err(errors);
    }

    // All ASCII digits past this point, so byte slicing is safe
    let year: i32 = body[0..4].parse().unwrap_or_default();
    if year <= MIN_ADMISSION_YEAR || year >= current_year {
        errors.push(ValidationError::RollYear {
            year,
            current: current_year,
        });
    }

    let rest = if body.len() == 11 {
        if &body[4..6] != "00" {
            errors.push(ValidationError::RollSeparator);
        }
        &body[6..]
    } else {
        &body[4..]
    };

    let branch_code = &rest[0..2];
    if Branch::from_code(branch_code) == Branch::Unknown {
        errors.push(ValidationError::RollBranch {
            code: branch_code.to_string(),
        });
    }

    let sequence: u32 = rest[2..5].parse().unwrap_or_default();
    if sequence == 0 {
        errors.push(ValidationError::RollSequence);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RollNumber {
        raw: raw.to_string(),
        year,
        branch_code: branch_code.to_string(),
        sequence,
    })
}

pub fn parse_section(raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<u32>() {
        Ok(section) if (1..=MAX_SECTION).contains(&section) => Ok(section),
        _ => Err(ValidationError::InvalidSection),
    }
}

/// Validated registration form
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub roll: RollNumber,
    pub section: u32,
    pub phone: String,
}

/// Validate the registration form, reporting every violated rule
pub fn validate_registration(
    roll: &str,
    section: &str,
    phone: &str,
    current_year: i32,
) -> Result<Registration, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let roll = parse_roll(roll.trim(), current_year)
        .map_err(|e| errors.extend(e))
        .ok();
    let section = parse_section(section).map_err(|e| errors.push(e)).ok();
    let phone = phone.trim();
    if let Err(e) = validate_phone(phone) {
        errors.push(e);
    }

    match (roll, section) {
        (Some(roll), Some(section)) if errors.is_empty() => Ok(Registration {
            roll,
            section,
            phone: phone.to_string(),
        }),
        _ => Err(errors),
    }
}

/// Validate the contact fields a student may change after registration
pub fn validate_contact(section: &str, phone: &str) -> Result<(u32, String), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let section = parse_section(section).map_err(|e| errors.push(e)).ok();
    let phone = phone.trim();
    if let Err(e) = validate_phone(phone) {
        errors.push(e);
    }

    match section {
        Some(section) if errors.is_empty() => Ok((section, phone.to_string())),
        _ => Err(errors),
    }
}
