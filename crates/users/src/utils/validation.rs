//! Input validation and normalization.
//!
//! Each `validate_*` function collects every field error before returning,
//! and hands back trimmed values ready for the repository.

use once_cell::sync::Lazy;
use regex::Regex;
use userdesk_database::{
    Address, AddressChanges, Company, CompanyChanges, Geo, GeoChanges, User, UserChanges,
};

use crate::types::{
    AddressInput, CompanyInput, GeoInput, LoginRequest, RegisterRequest, UpdateUserRequest,
    ValidationErrors,
};

pub const USERNAME_MAX_LEN: usize = 64;
pub const EMAIL_MAX_LEN: usize = 255;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 128;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$";

// Scheme is optional so bare hosts like `hildegard.org` pass.
const URL_PATTERN: &str =
    r"^(?i)(https?://)?([a-z0-9]([a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}(:\d{1,5})?([/?#]\S*)?$";

// Constant patterns; `static_patterns_compile` below forces both.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"));
static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(URL_PATTERN).expect("url pattern is valid"));

/// Lowercased, trimmed email used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= EMAIL_MAX_LEN && EMAIL_REGEX.is_match(email)
}

pub fn is_valid_url(url: &str) -> bool {
    url.len() <= 2048 && URL_REGEX.is_match(url)
}

/// A registration that passed validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: Option<Address>,
    pub company: Option<Company>,
}

/// An update that passed validation. The password is still plaintext.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub changes: UserChanges,
    pub password: Option<String>,
}

struct FieldCheck {
    errors: ValidationErrors,
}

impl FieldCheck {
    fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    /// Present and non-blank. Returns the trimmed value.
    fn required(&mut self, field: &str, value: Option<&String>, message: &str) -> Option<String> {
        match value.map(|v| v.trim()) {
            Some(trimmed) if !trimmed.is_empty() => Some(trimmed.to_string()),
            _ => {
                self.errors.push(field, message);
                None
            }
        }
    }

    /// Absent, or present and non-blank.
    fn optional(&mut self, field: &str, value: Option<&String>, message: &str) -> Option<String> {
        let trimmed = value?.trim();
        if trimmed.is_empty() {
            self.errors.push(field, message);
            return None;
        }
        Some(trimmed.to_string())
    }

    fn username(&mut self, value: String) -> Option<String> {
        if value.chars().count() > USERNAME_MAX_LEN {
            self.errors.push(
                "username",
                format!("Username must be at most {USERNAME_MAX_LEN} characters"),
            );
            return None;
        }
        if value.chars().any(char::is_whitespace) {
            self.errors.push("username", "Username cannot contain whitespace");
            return None;
        }
        Some(value)
    }

    fn email(&mut self, field: &str, value: Option<&String>, required: bool) -> Option<String> {
        let Some(raw) = value else {
            if required {
                self.errors.push(field, "Valid email is required");
            }
            return None;
        };
        let email = normalize_email(raw);
        if !is_valid_email(&email) {
            self.errors.push(field, "Valid email is required");
            return None;
        }
        Some(email)
    }

    fn password(&mut self, value: Option<&String>, required: bool) -> Option<String> {
        let Some(password) = value else {
            if required {
                self.errors.push(
                    "password",
                    format!("Password must be at least {PASSWORD_MIN_LEN} characters"),
                );
            }
            return None;
        };
        let length = password.chars().count();
        if length < PASSWORD_MIN_LEN {
            self.errors.push(
                "password",
                format!("Password must be at least {PASSWORD_MIN_LEN} characters"),
            );
            return None;
        }
        if length > PASSWORD_MAX_LEN {
            self.errors.push(
                "password",
                format!("Password must be at most {PASSWORD_MAX_LEN} characters"),
            );
            return None;
        }
        Some(password.clone())
    }

    fn website(&mut self, value: Option<&String>) -> Option<String> {
        let trimmed = value?.trim();
        if trimmed.is_empty() || !is_valid_url(trimmed) {
            self.errors.push("website", "Website must be a valid URL");
            return None;
        }
        Some(trimmed.to_string())
    }

    fn geo_changes(&mut self, input: &GeoInput, complete: bool) -> GeoChanges {
        let lat_msg = "Latitude cannot be empty";
        let lng_msg = "Longitude cannot be empty";
        if complete {
            GeoChanges {
                lat: self.required("address.geo.lat", input.lat.as_ref(), "Latitude is required"),
                lng: self.required("address.geo.lng", input.lng.as_ref(), "Longitude is required"),
            }
        } else {
            GeoChanges {
                lat: self.optional("address.geo.lat", input.lat.as_ref(), lat_msg),
                lng: self.optional("address.geo.lng", input.lng.as_ref(), lng_msg),
            }
        }
    }

    /// `complete` demands every field, as when the record is about to be created.
    fn address_changes(
        &mut self,
        input: &AddressInput,
        complete: bool,
        geo_complete: bool,
    ) -> AddressChanges {
        let fields = [
            ("address.street", &input.street, "Street"),
            ("address.suite", &input.suite, "Suite"),
            ("address.city", &input.city, "City"),
            ("address.zipcode", &input.zipcode, "Zipcode"),
        ];
        let mut values = fields.map(|(field, value, label)| {
            if complete {
                self.required(field, value.as_ref(), &format!("{label} is required"))
            } else {
                self.optional(field, value.as_ref(), &format!("{label} cannot be empty"))
            }
        });

        AddressChanges {
            street: values[0].take(),
            suite: values[1].take(),
            city: values[2].take(),
            zipcode: values[3].take(),
            geo: input
                .geo
                .as_ref()
                .map(|geo| self.geo_changes(geo, complete || geo_complete)),
        }
    }

    fn company_changes(&mut self, input: &CompanyInput, complete: bool) -> CompanyChanges {
        let fields = [
            ("company.name", &input.name, "Company name"),
            ("company.catchPhrase", &input.catch_phrase, "Catch phrase"),
            ("company.bs", &input.bs, "Company bs"),
        ];
        let mut values = fields.map(|(field, value, label)| {
            if complete {
                self.required(field, value.as_ref(), &format!("{label} is required"))
            } else {
                self.optional(field, value.as_ref(), &format!("{label} cannot be empty"))
            }
        });

        CompanyChanges {
            name: values[0].take(),
            catch_phrase: values[1].take(),
            bs: values[2].take(),
        }
    }
}

/// Check and normalize a registration payload.
pub fn validate_registration(request: &RegisterRequest) -> Result<Registration, ValidationErrors> {
    let mut check = FieldCheck::new();

    let name = check.required("name", request.name.as_ref(), "Name is required");
    let username = check
        .required("username", request.username.as_ref(), "Username is required")
        .and_then(|username| check.username(username));
    let email = check.email("email", request.email.as_ref(), true);
    let password = check.password(request.password.as_ref(), true);
    let phone = check.required("phone", request.phone.as_ref(), "Phone is required");
    let website = check.website(request.website.as_ref());

    let address = request
        .address
        .as_ref()
        .map(|input| check.address_changes(input, true, true));
    let company = request
        .company
        .as_ref()
        .map(|input| check.company_changes(input, true));

    let FieldCheck { errors } = check;
    if !errors.is_empty() {
        return Err(errors);
    }

    let (Some(name), Some(username), Some(email), Some(password), Some(phone)) =
        (name, username, email, password, phone)
    else {
        return Err(ValidationErrors::single("body", "Incomplete registration"));
    };

    let incomplete = || ValidationErrors::single("body", "Incomplete registration");
    let address = match address {
        Some(changes) => Some(changes.complete().ok_or_else(incomplete)?),
        None => None,
    };
    let company = match company {
        Some(changes) => Some(changes.complete().ok_or_else(incomplete)?),
        None => None,
    };

    Ok(Registration {
        name,
        username,
        email,
        password,
        phone,
        website,
        address,
        company,
    })
}

/// Check and normalize an update against the user it applies to.
///
/// Nested records the user does not have yet must be supplied in full.
pub fn validate_update(
    request: &UpdateUserRequest,
    existing: &User,
) -> Result<UserPatch, ValidationErrors> {
    let mut check = FieldCheck::new();

    let name = check.optional("name", request.name.as_ref(), "Name cannot be empty");
    let username = check
        .optional("username", request.username.as_ref(), "Username cannot be empty")
        .and_then(|username| check.username(username));
    let email = check.email("email", request.email.as_ref(), false);
    let password = check.password(request.password.as_ref(), false);
    let phone = check.optional("phone", request.phone.as_ref(), "Phone cannot be empty");
    let website = check.website(request.website.as_ref());

    let address = request.address.as_ref().map(|input| {
        let address_is_new = existing.address.is_none();
        let geo_is_new = existing
            .address
            .as_ref()
            .map_or(true, |address| address.geo.is_none());
        check.address_changes(input, address_is_new, geo_is_new)
    });
    let company = request
        .company
        .as_ref()
        .map(|input| check.company_changes(input, existing.company.is_none()));

    let FieldCheck { errors } = check;
    errors.finish(UserPatch {
        changes: UserChanges {
            name,
            username,
            email,
            phone,
            website,
            password_hash: None,
            address,
            company,
        },
        password,
    })
}

/// Check a login payload. Returns the normalized email and the password.
pub fn validate_login(request: &LoginRequest) -> Result<(String, String), ValidationErrors> {
    let mut check = FieldCheck::new();

    let email = check.email("email", request.email.as_ref(), true);
    let password = match request.password.as_ref() {
        Some(password) if !password.is_empty() => Some(password.clone()),
        _ => {
            check.errors.push("password", "Password is required");
            None
        }
    };

    let FieldCheck { errors } = check;
    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok((email, password)),
        _ => Err(errors),
    }
}
