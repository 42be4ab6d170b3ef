use crate::models::auth::{AuthenticatedUser, Permission, UserRole};
use crate::utils::errors::{forbidden_error, AppError};

/// Tabla estática de permisos por rol
pub fn role_permissions(role: UserRole) -> &'static [Permission] {
    match role {
        UserRole::Owner | UserRole::Manager => &[
            Permission::ViewOrders,
            Permission::CreateOrders,
            Permission::MoveOrders,
            Permission::ViewHistory,
        ],
        UserRole::Attendant => &[
            Permission::ViewOrders,
            Permission::CreateOrders,
            Permission::MoveOrders,
        ],
        UserRole::Washer => &[Permission::ViewOrders, Permission::MoveOrders],
    }
}

pub fn has_permission(user: &AuthenticatedUser, permission: Permission) -> bool {
    role_permissions(user.role).contains(&permission)
}

/// Verifica el permiso o devuelve Forbidden
pub fn require_permission(user: &AuthenticatedUser, permission: Permission) -> Result<(), AppError> {
    if has_permission(user, permission) {
        Ok(())
    } else {
        Err(forbidden_error(
            permission.as_str(),
            &format!("el rol '{}' no tiene este permiso", user.role.as_str()),
        ))
    }
}
