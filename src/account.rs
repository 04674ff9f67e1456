//! Account record and identifier-field selection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The account attribute used to look up an account during login.
///
/// A deployment designates exactly one of these per account; validation
/// rules are fixed per variant rather than dispatched on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierField {
    Email,
    Username,
}

impl IdentifierField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }
}

impl std::fmt::Display for IdentifierField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored user account.
///
/// `salt` and `password_hash` are immutable once set; there is no
/// password-change operation in this crate. The session token embeds
/// `password_hash`, so an out-of-band credential change invalidates every
/// outstanding session for the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub identifier_field: IdentifierField,
    pub identifier: String,
    pub salt: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn identifier_field_serializes_lowercase() -> Result<()> {
        let value = serde_json::to_value(IdentifierField::Email)?;
        assert_eq!(value, serde_json::json!("email"));
        let decoded: IdentifierField = serde_json::from_value(serde_json::json!("username"))?;
        assert_eq!(decoded, IdentifierField::Username);
        Ok(())
    }

    #[test]
    fn account_round_trips_through_json() -> Result<()> {
        let account = Account {
            id: Uuid::new_v4(),
            identifier_field: IdentifierField::Username,
            identifier: "alice".to_string(),
            salt: "q3hXf9ZpL2mRw8Kd".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".to_string(),
        };
        let value = serde_json::to_value(&account)?;
        let field = value
            .get("identifier_field")
            .and_then(serde_json::Value::as_str)
            .context("missing identifier_field")?;
        assert_eq!(field, "username");
        let decoded: Account = serde_json::from_value(value)?;
        assert_eq!(decoded, account);
        Ok(())
    }
}
