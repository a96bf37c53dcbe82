use async_graphql::Context;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::{Module, Role},
};

pub fn require_role(claims: &Claims, role: Role) -> AppResult<()> {
    if claims.role != role {
        log::debug!(
            "Denied {} '{}' an action reserved for {}s",
            claims.role,
            claims.username,
            role
        );
        return Err(AppError::Forbidden(format!(
            "Only {}s can perform this action",
            role
        )));
    }
    Ok(())
}

pub fn require_teacher(claims: &Claims) -> AppResult<()> {
    require_role(claims, Role::Teacher)
}

pub fn require_student(claims: &Claims) -> AppResult<()> {
    require_role(claims, Role::Student)
}

pub fn require_module_owner(claims: &Claims, module: &Module) -> AppResult<()> {
    require_teacher(claims)?;
    if !module.is_owned_by(&claims.sub) {
        return Err(AppError::Forbidden(
            "You can only manage your own modules".to_string(),
        ));
    }
    Ok(())
}

pub fn require_module_member(claims: &Claims, module: &Module) -> AppResult<()> {
    require_student(claims)?;
    if !module.has_student(&claims.sub) {
        return Err(AppError::Forbidden(
            "You are not assigned to this module".to_string(),
        ));
    }
    Ok(())
}

pub fn extract_claims_from_context(ctx: &Context<'_>) -> AppResult<Claims> {
    ctx.data::<Claims>()
        .cloned()
        .map_err(|_| AppError::Unauthorized("Authentication required".to_string()))
}
