//! Identity of the account issuing a report request.

use uuid::Uuid;

/// Caller identity resolved once, server-side, by the authentication layer.
///
/// The admin flag is never taken from request input. Non-admin callers are
/// always scoped to `account_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account_id: Uuid,
    pub is_admin: bool,
}

impl CallerIdentity {
    pub fn admin(account_id: Uuid) -> Self {
        Self {
            account_id,
            is_admin: true,
        }
    }

    pub fn account(account_id: Uuid) -> Self {
        Self {
            account_id,
            is_admin: false,
        }
    }

    /// Account every returned row must belong to, or `None` for admins.
    pub fn scope(&self) -> Option<Uuid> {
        (!self.is_admin).then_some(self.account_id)
    }
}
