use std::fmt;
use std::str::FromStr;

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    /// Restaurant staff: manages tables, sees every reservation
    Owner,
    /// Guest: books, lists and cancels their own reservations
    Customer,
}

impl CallerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Customer => "customer",
        }
    }
}

impl FromStr for CallerRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "customer" => Ok(Self::Customer),
            other => Err(DomainError::Validation(format!("unknown role '{}'", other))),
        }
    }
}

impl fmt::Display for CallerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attached to a request.
///
/// Anonymous callers may browse availability and book under the email they
/// supply, but never see, cancel or manage anything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Caller {
    email: Option<String>,
    role: Option<CallerRole>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn owner(email: Option<String>) -> Self {
        Self {
            email,
            role: Some(CallerRole::Owner),
        }
    }

    pub fn customer(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            role: Some(CallerRole::Customer),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> Option<CallerRole> {
        self.role
    }

    /// The email a customer is confined to, `None` for everyone else
    pub fn customer_email(&self) -> Option<&str> {
        match self.role {
            Some(CallerRole::Customer) => self.email(),
            _ => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.role.is_none()
    }

    pub fn can_manage_tables(&self) -> bool {
        self.role == Some(CallerRole::Owner)
    }

    /// Whether the caller may see or cancel a reservation made under `email`
    pub fn owns(&self, email: &str) -> bool {
        match self.role {
            Some(CallerRole::Owner) => true,
            Some(CallerRole::Customer) => self
                .email()
                .is_some_and(|own| own.eq_ignore_ascii_case(email)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Owner".parse::<CallerRole>().unwrap(), CallerRole::Owner);
        assert_eq!(" customer ".parse::<CallerRole>().unwrap(), CallerRole::Customer);
        assert!("admin".parse::<CallerRole>().is_err());
    }

    #[test]
    fn customers_only_own_their_reservations() {
        let ana = Caller::customer("ana@example.com");
        assert!(ana.owns("ANA@example.com"));
        assert!(!ana.owns("bo@example.com"));
        assert!(!ana.can_manage_tables());

        assert!(Caller::owner(None).owns("bo@example.com"));
        assert!(Caller::owner(None).can_manage_tables());
    }

    #[test]
    fn anonymous_callers_have_no_owner_powers() {
        let anon = Caller::anonymous();
        assert!(anon.is_anonymous());
        assert!(!anon.can_manage_tables());
        assert!(!anon.owns("ana@example.com"));
        assert_eq!(anon.customer_email(), None);
    }
}
