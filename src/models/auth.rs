use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles del equipo del lava-jato
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Owner,
    Manager,
    Attendant,
    Washer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Manager => "manager",
            UserRole::Attendant => "attendant",
            UserRole::Washer => "washer",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(UserRole::Owner),
            "manager" => Ok(UserRole::Manager),
            "attendant" => Ok(UserRole::Attendant),
            "washer" => Ok(UserRole::Washer),
            other => Err(other.to_string()),
        }
    }
}

/// Permisos sobre las órdenes de servicio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewOrders,
    CreateOrders,
    MoveOrders,
    ViewHistory,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewOrders => "orders:view",
            Permission::CreateOrders => "orders:create",
            Permission::MoveOrders => "orders:move",
            Permission::ViewHistory => "orders:history",
        }
    }
}

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,        // user_id
    pub company_id: String, // tenant
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub role: UserRole,
}
