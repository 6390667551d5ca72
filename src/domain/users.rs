//! Validation rules for user records.

use rubrica_api_types::{
    CreateUserRequest, FieldViolation, RecordId, UpdateUserRequest, User, UserProfile, UserRole,
};
use time::OffsetDateTime;

use super::error::DomainError;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const AGE_MAX: i32 = 120;
pub const BIO_MAX_CHARS: usize = 500;

/// A create payload that passed every field rule. Construction is the only
/// way in, so holding a draft means the data is storable.
#[derive(Debug, Clone)]
pub struct UserDraft {
    name: String,
    email: String,
    age: Option<i32>,
    roles: Vec<UserRole>,
    profile: UserProfile,
}

impl UserDraft {
    pub fn from_request(request: CreateUserRequest) -> Result<Self, DomainError> {
        let mut violations = Vec::new();

        let name = match request.name.as_deref().map(str::trim) {
            Some(name) => {
                check_name(name, &mut violations);
                name.to_string()
            }
            None => {
                violations.push(FieldViolation::new("name", "name is required"));
                String::new()
            }
        };

        let email = match request.email.as_deref().map(str::trim) {
            Some(email) => {
                let email = email.to_ascii_lowercase();
                check_email(&email, &mut violations);
                email
            }
            None => {
                violations.push(FieldViolation::new("email", "email is required"));
                String::new()
            }
        };

        if let Some(age) = request.age {
            check_age(age, &mut violations);
        }

        let roles = normalize_roles(request.roles);
        let profile = normalize_profile(request.profile.unwrap_or_default(), &mut violations);

        if !violations.is_empty() {
            return Err(DomainError::validation(violations));
        }

        Ok(Self {
            name,
            email,
            age: request.age,
            roles,
            profile,
        })
    }

    pub fn into_record(self, id: RecordId, now: OffsetDateTime) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
            is_active: true,
            roles: self.roles,
            profile: self.profile,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Partial update; only present fields are validated and applied.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
    is_active: Option<bool>,
    roles: Option<Vec<UserRole>>,
    profile: Option<UserProfile>,
}

impl UserPatch {
    pub fn from_request(request: UpdateUserRequest) -> Result<Self, DomainError> {
        let mut violations = Vec::new();

        let name = request.name.as_deref().map(str::trim).map(|name| {
            check_name(name, &mut violations);
            name.to_string()
        });

        let email = request.email.as_deref().map(str::trim).map(|email| {
            let email = email.to_ascii_lowercase();
            check_email(&email, &mut violations);
            email
        });

        if let Some(age) = request.age {
            check_age(age, &mut violations);
        }

        let roles = request.roles.map(|roles| {
            if roles.is_empty() {
                vec![UserRole::User]
            } else {
                roles
            }
        });

        let profile = request
            .profile
            .map(|profile| normalize_profile(profile, &mut violations));

        if !violations.is_empty() {
            return Err(DomainError::validation(violations));
        }

        Ok(Self {
            name,
            email,
            age: request.age,
            is_active: request.is_active,
            roles,
            profile,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.age.is_none()
            && self.is_active.is_none()
            && self.roles.is_none()
            && self.profile.is_none()
    }

    pub fn apply(self, user: &mut User, now: OffsetDateTime) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(age) = self.age {
            user.age = Some(age);
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        if let Some(roles) = self.roles {
            user.roles = roles;
        }
        if let Some(profile) = self.profile {
            user.profile = profile;
        }
        user.updated_at = now;
    }
}

fn check_name(name: &str, violations: &mut Vec<FieldViolation>) {
    let len = name.chars().count();
    if len < NAME_MIN_CHARS {
        violations.push(FieldViolation::new(
            "name",
            format!("name must be at least {NAME_MIN_CHARS} characters"),
        ));
    } else if len > NAME_MAX_CHARS {
        violations.push(FieldViolation::new(
            "name",
            format!("name cannot exceed {NAME_MAX_CHARS} characters"),
        ));
    }
}

fn check_email(email: &str, violations: &mut Vec<FieldViolation>) {
    if !is_valid_email(email) {
        violations.push(FieldViolation::new("email", "email must be a valid address"));
    }
}

fn check_age(age: i32, violations: &mut Vec<FieldViolation>) {
    if !(0..=AGE_MAX).contains(&age) {
        violations.push(FieldViolation::new(
            "age",
            format!("age must be between 0 and {AGE_MAX}"),
        ));
    }
}

fn normalize_roles(roles: Option<Vec<UserRole>>) -> Vec<UserRole> {
    match roles {
        Some(roles) if !roles.is_empty() => roles,
        _ => vec![UserRole::User],
    }
}

fn normalize_profile(
    profile: UserProfile,
    violations: &mut Vec<FieldViolation>,
) -> UserProfile {
    let bio = profile.bio.as_deref().map(str::trim).and_then(|bio| {
        if bio.chars().count() > BIO_MAX_CHARS {
            violations.push(FieldViolation::new(
                "profile.bio",
                format!("bio cannot exceed {BIO_MAX_CHARS} characters"),
            ));
        }
        (!bio.is_empty()).then(|| bio.to_string())
    });

    UserProfile {
        bio,
        avatar: non_empty_trimmed(profile.avatar),
        location: non_empty_trimmed(profile.location),
    }
}

fn non_empty_trimmed(value: Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).and_then(|value| {
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Structural check: one `@`, a non-empty local part, and a dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
