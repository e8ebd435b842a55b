//! Statische Rollen-Berechtigungs-Matrix
//!
//! Die Matrix ist zur Compile-Zeit fest. Unbekannte Rollen und unbekannte
//! Berechtigungen ergeben immer `false`.

/// Namen aller Berechtigungen
pub mod berechtigungen {
    pub const CREATE_PRODUCTS: &str = "create_products";
    pub const READ_PRODUCTS: &str = "read_products";
    pub const UPDATE_PRODUCTS: &str = "update_products";
    pub const DELETE_PRODUCTS: &str = "delete_products";
    pub const READ_USERS: &str = "read_users";
    pub const CREATE_USERS: &str = "create_users";
    pub const UPDATE_USERS: &str = "update_users";
    pub const DELETE_USERS: &str = "delete_users";
    pub const CREATE_ADMINS: &str = "create_admins";
    pub const READ_ADMINS: &str = "read_admins";
    pub const UPDATE_ADMINS: &str = "update_admins";
    pub const DELETE_ADMINS: &str = "delete_admins";
    pub const READ_ORDERS: &str = "read_orders";
    pub const UPDATE_ORDERS: &str = "update_orders";

    /// Alle bekannten Berechtigungen
    pub const ALLE: &[&str] = &[
        CREATE_PRODUCTS,
        READ_PRODUCTS,
        UPDATE_PRODUCTS,
        DELETE_PRODUCTS,
        READ_USERS,
        CREATE_USERS,
        UPDATE_USERS,
        DELETE_USERS,
        CREATE_ADMINS,
        READ_ADMINS,
        UPDATE_ADMINS,
        DELETE_ADMINS,
        READ_ORDERS,
        UPDATE_ORDERS,
    ];
}

use berechtigungen::*;

const SUPER_ADMIN: &str = "super_admin";

const ADMIN_BERECHTIGUNGEN: &[&str] = &[
    CREATE_PRODUCTS,
    READ_PRODUCTS,
    UPDATE_PRODUCTS,
    DELETE_PRODUCTS,
    READ_USERS,
    CREATE_USERS,
    UPDATE_USERS,
    READ_ORDERS,
    UPDATE_ORDERS,
];

const SUPER_ADMIN_BERECHTIGUNGEN: &[&str] = &[
    CREATE_PRODUCTS,
    READ_PRODUCTS,
    UPDATE_PRODUCTS,
    DELETE_PRODUCTS,
    READ_USERS,
    CREATE_USERS,
    UPDATE_USERS,
    DELETE_USERS,
    CREATE_ADMINS,
    READ_ADMINS,
    UPDATE_ADMINS,
    DELETE_ADMINS,
    READ_ORDERS,
    UPDATE_ORDERS,
];

/// Rolle -> erlaubte Berechtigungen
const MATRIX: &[(&str, &[&str])] = &[
    ("admin", ADMIN_BERECHTIGUNGEN),
    (SUPER_ADMIN, SUPER_ADMIN_BERECHTIGUNGEN),
];

/// Berechtigungen einer Rolle; leer fuer unbekannte Rollen
pub fn berechtigungen_fuer(rolle: &str) -> &'static [&'static str] {
    MATRIX
        .iter()
        .find(|(r, _)| *r == rolle)
        .map(|(_, b)| *b)
        .unwrap_or(&[])
}

/// Prueft ob eine Rolle eine Berechtigung besitzt
pub fn darf_ausfuehren(rolle: &str, berechtigung: &str) -> bool {
    berechtigungen_fuer(rolle).contains(&berechtigung)
}

/// Exakter Vergleich mit der Rolle "super_admin"
pub fn ist_super_admin(rolle: &str) -> bool {
    rolle == SUPER_ADMIN
}
