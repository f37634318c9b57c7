use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::models::leads;
use crate::models::users::Role;

/// Reject the caller unless their role is one of `allowed`.
pub fn require_role(user: &AuthenticatedUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "This action requires one of the roles: {}",
            allowed
                .iter()
                .map(|r| format!("{r:?}"))
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

pub fn require_back_office(user: &AuthenticatedUser) -> Result<(), AppError> {
    require_role(user, &[Role::Admin, Role::Marketing])
}

pub fn require_admin(user: &AuthenticatedUser) -> Result<(), AppError> {
    require_role(user, &[Role::Admin])
}

/// Reassignment rule: Admin always; Marketing only for leads that already
/// have an owner; Sales never.
pub fn ensure_can_reassign(role: Role, lead: &leads::Model) -> Result<(), AppError> {
    match role {
        Role::Admin => Ok(()),
        Role::Marketing if lead.assigned_to_id.is_some() => Ok(()),
        Role::Marketing => Err(AppError::Forbidden(
            "Marketing cannot reassign an unassigned lead".to_string(),
        )),
        Role::Sales => Err(AppError::Forbidden(
            "Sales users cannot reassign leads".to_string(),
        )),
    }
}

/// Back office sees every lead; sales only the ones they own.
pub fn can_view_lead(user: &AuthenticatedUser, lead: &leads::Model) -> bool {
    user.role().is_back_office() || lead.assigned_to_id == Some(user.id())
}
