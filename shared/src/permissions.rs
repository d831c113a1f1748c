//! Role-based permission catalog and the client-side permission lookup state
//!
//! Roles map to fixed sets of fine-grained capability strings. A user's
//! permission set is the union over their roles. The lookup state is loaded
//! once per session and every predicate denies while it is not loaded.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::UserPermissions;

/// Roles that count as administrators
pub const ADMIN_ROLES: [&str; 2] = ["admin", "super_admin"];

/// Fine-grained capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Dashboard
    ViewDashboard,

    // Products & inventory
    ViewProducts,
    CreateProducts,
    EditProducts,
    DeleteProducts,
    ViewProductCost,
    EditProductPrice,

    // Stock
    ViewStock,
    AdjustStock,
    ViewStockValue,
    ManageOpeningStock,

    // Sales
    CreateSale,
    ViewSales,
    DeleteSale,
    ApplyDiscount,
    ProcessReturn,

    // Purchases
    ViewPurchases,
    CreatePurchase,
    EditPurchase,
    DeletePurchase,
    ApprovePurchase,

    // Customers
    ViewCustomers,
    CreateCustomers,
    EditCustomers,
    DeleteCustomers,

    // Suppliers
    ViewSuppliers,
    CreateSuppliers,
    EditSuppliers,
    DeleteSuppliers,

    // Financial
    ViewReports,
    ViewFinancialReports,
    ManagePayments,
    ViewProfitLoss,

    // Users
    ViewUsers,
    CreateUsers,
    EditUsers,
    DeleteUsers,
    ManageRoles,

    // System
    ViewAuditLogs,
    ManageSettings,
    ImportData,
    ExportData,
    BackupDatabase,
}

impl Permission {
    pub const ALL: [Permission; 43] = [
        Permission::ViewDashboard,
        Permission::ViewProducts,
        Permission::CreateProducts,
        Permission::EditProducts,
        Permission::DeleteProducts,
        Permission::ViewProductCost,
        Permission::EditProductPrice,
        Permission::ViewStock,
        Permission::AdjustStock,
        Permission::ViewStockValue,
        Permission::ManageOpeningStock,
        Permission::CreateSale,
        Permission::ViewSales,
        Permission::DeleteSale,
        Permission::ApplyDiscount,
        Permission::ProcessReturn,
        Permission::ViewPurchases,
        Permission::CreatePurchase,
        Permission::EditPurchase,
        Permission::DeletePurchase,
        Permission::ApprovePurchase,
        Permission::ViewCustomers,
        Permission::CreateCustomers,
        Permission::EditCustomers,
        Permission::DeleteCustomers,
        Permission::ViewSuppliers,
        Permission::CreateSuppliers,
        Permission::EditSuppliers,
        Permission::DeleteSuppliers,
        Permission::ViewReports,
        Permission::ViewFinancialReports,
        Permission::ManagePayments,
        Permission::ViewProfitLoss,
        Permission::ViewUsers,
        Permission::CreateUsers,
        Permission::EditUsers,
        Permission::DeleteUsers,
        Permission::ManageRoles,
        Permission::ViewAuditLogs,
        Permission::ManageSettings,
        Permission::ImportData,
        Permission::ExportData,
        Permission::BackupDatabase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ViewProducts => "view_products",
            Permission::CreateProducts => "create_products",
            Permission::EditProducts => "edit_products",
            Permission::DeleteProducts => "delete_products",
            Permission::ViewProductCost => "view_product_cost",
            Permission::EditProductPrice => "edit_product_price",
            Permission::ViewStock => "view_stock",
            Permission::AdjustStock => "adjust_stock",
            Permission::ViewStockValue => "view_stock_value",
            Permission::ManageOpeningStock => "manage_opening_stock",
            Permission::CreateSale => "create_sale",
            Permission::ViewSales => "view_sales",
            Permission::DeleteSale => "delete_sale",
            Permission::ApplyDiscount => "apply_discount",
            Permission::ProcessReturn => "process_return",
            Permission::ViewPurchases => "view_purchases",
            Permission::CreatePurchase => "create_purchase",
            Permission::EditPurchase => "edit_purchase",
            Permission::DeletePurchase => "delete_purchase",
            Permission::ApprovePurchase => "approve_purchase",
            Permission::ViewCustomers => "view_customers",
            Permission::CreateCustomers => "create_customers",
            Permission::EditCustomers => "edit_customers",
            Permission::DeleteCustomers => "delete_customers",
            Permission::ViewSuppliers => "view_suppliers",
            Permission::CreateSuppliers => "create_suppliers",
            Permission::EditSuppliers => "edit_suppliers",
            Permission::DeleteSuppliers => "delete_suppliers",
            Permission::ViewReports => "view_reports",
            Permission::ViewFinancialReports => "view_financial_reports",
            Permission::ManagePayments => "manage_payments",
            Permission::ViewProfitLoss => "view_profit_loss",
            Permission::ViewUsers => "view_users",
            Permission::CreateUsers => "create_users",
            Permission::EditUsers => "edit_users",
            Permission::DeleteUsers => "delete_users",
            Permission::ManageRoles => "manage_roles",
            Permission::ViewAuditLogs => "view_audit_logs",
            Permission::ManageSettings => "manage_settings",
            Permission::ImportData => "import_data",
            Permission::ExportData => "export_data",
            Permission::BackupDatabase => "backup_database",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed permission set granted by a role name; unknown roles grant nothing.
pub fn role_permissions(role: &str) -> &'static [Permission] {
    use Permission::*;

    match role {
        "super_admin" => &Permission::ALL,
        "pharmacy_manager" => &[
            ViewDashboard,
            ViewProducts,
            CreateProducts,
            EditProducts,
            ViewProductCost,
            EditProductPrice,
            ViewStock,
            AdjustStock,
            ViewStockValue,
            ManageOpeningStock,
            CreateSale,
            ViewSales,
            ProcessReturn,
            ApplyDiscount,
            ViewPurchases,
            CreatePurchase,
            EditPurchase,
            ApprovePurchase,
            ViewCustomers,
            CreateCustomers,
            EditCustomers,
            ViewSuppliers,
            CreateSuppliers,
            EditSuppliers,
            ViewReports,
            ViewFinancialReports,
            ManagePayments,
            ViewProfitLoss,
            ViewAuditLogs,
            ExportData,
        ],
        "pharmacist" => &[
            ViewDashboard,
            ViewProducts,
            EditProducts,
            ViewStock,
            AdjustStock,
            CreateSale,
            ViewSales,
            ProcessReturn,
            ApplyDiscount,
            ViewCustomers,
            CreateCustomers,
            EditCustomers,
            ViewReports,
        ],
        "cashier" => &[
            ViewDashboard,
            ViewProducts,
            ViewStock,
            CreateSale,
            ViewSales,
            ViewCustomers,
            CreateCustomers,
        ],
        "stock_clerk" => &[
            ViewDashboard,
            ViewProducts,
            EditProducts,
            ViewStock,
            AdjustStock,
            ManageOpeningStock,
            ViewPurchases,
        ],
        "accountant" => &[
            ViewDashboard,
            ViewProducts,
            ViewStock,
            ViewStockValue,
            ViewSales,
            ViewPurchases,
            ViewCustomers,
            ViewSuppliers,
            ViewReports,
            ViewFinancialReports,
            ViewProfitLoss,
            ManagePayments,
            ViewAuditLogs,
            ExportData,
        ],
        "admin" => &[
            ViewDashboard,
            ViewProducts,
            CreateProducts,
            EditProducts,
            DeleteProducts,
            ViewProductCost,
            EditProductPrice,
            ViewStock,
            AdjustStock,
            ViewStockValue,
            CreateSale,
            ViewSales,
            DeleteSale,
            ApplyDiscount,
            ViewPurchases,
            CreatePurchase,
            EditPurchase,
            DeletePurchase,
            ViewCustomers,
            CreateCustomers,
            EditCustomers,
            DeleteCustomers,
            ViewSuppliers,
            CreateSuppliers,
            EditSuppliers,
            DeleteSuppliers,
            ViewReports,
            ViewFinancialReports,
            ViewUsers,
            CreateUsers,
            EditUsers,
            ManageSettings,
            ViewAuditLogs,
        ],
        _ => &[],
    }
}

/// Flattened, sorted, de-duplicated permission strings for a set of roles
pub fn permissions_for_roles<S: AsRef<str>>(roles: &[S]) -> Vec<String> {
    roles
        .iter()
        .flat_map(|role| role_permissions(role.as_ref()).iter())
        .map(|p| p.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Build the permission payload for a user from their role names
pub fn resolve_user_permissions(user_id: uuid::Uuid, roles: Vec<String>) -> UserPermissions {
    let permissions = permissions_for_roles(&roles);
    UserPermissions {
        user_id,
        roles,
        permissions,
    }
}

/// Lifecycle of a one-shot permission lookup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Loading,
    Loaded(UserPermissions),
    Failed,
}

impl PermissionState {
    pub fn new() -> Self {
        Self::Loading
    }

    /// Record the outcome of the single fetch.
    ///
    /// Only the first outcome is kept; later calls return `false` and leave
    /// the state untouched.
    pub fn resolve<E: fmt::Display>(&mut self, outcome: Result<UserPermissions, E>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = match outcome {
            Ok(permissions) => PermissionState::Loaded(permissions),
            Err(e) => {
                tracing::warn!("Error loading permissions: {}", e);
                PermissionState::Failed
            }
        };
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PermissionState::Loading)
    }

    pub fn permissions(&self) -> Option<&UserPermissions> {
        match self {
            PermissionState::Loaded(p) => Some(p),
            _ => None,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions()
            .is_some_and(|p| p.has_permission(permission))
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, perms: &[S]) -> bool {
        self.permissions()
            .is_some_and(|p| perms.iter().any(|perm| p.has_permission(perm.as_ref())))
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, perms: &[S]) -> bool {
        self.permissions()
            .is_some_and(|p| perms.iter().all(|perm| p.has_permission(perm.as_ref())))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.permissions().is_some_and(|p| p.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.permissions()
            .is_some_and(|p| ADMIN_ROLES.iter().any(|r| p.has_role(r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn loaded(roles: &[&str]) -> PermissionState {
        let mut state = PermissionState::new();
        let roles = roles.iter().map(|r| r.to_string()).collect();
        state.resolve::<String>(Ok(resolve_user_permissions(Uuid::nil(), roles)));
        state
    }

    #[test]
    fn test_super_admin_has_everything() {
        let perms = permissions_for_roles(&["super_admin"]);
        assert_eq!(perms.len(), Permission::ALL.len());
    }

    #[test]
    fn test_union_is_sorted_and_unique() {
        let perms = permissions_for_roles(&["cashier", "pharmacist", "cashier"]);
        let mut sorted = perms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(perms, sorted);
        assert!(perms.contains(&"process_return".to_string()));
    }

    #[test]
    fn test_unknown_role_grants_nothing() {
        assert!(permissions_for_roles(&["janitor"]).is_empty());
    }

    #[test]
    fn test_loading_denies_everything() {
        let state = PermissionState::new();
        assert!(state.is_loading());
        assert!(!state.has_permission("view_dashboard"));
        assert!(!state.has_all_permissions::<&str>(&[]));
        assert!(!state.is_admin());
    }

    #[test]
    fn test_failed_denies_everything() {
        let mut state = PermissionState::new();
        assert!(state.resolve::<&str>(Err("network down")));
        assert_eq!(state, PermissionState::Failed);
        assert!(!state.has_role("admin"));
        assert!(!state.has_any_permission(&["view_sales"]));
    }

    #[test]
    fn test_second_resolution_is_ignored() {
        let mut state = loaded(&["cashier"]);
        assert!(!state.resolve::<&str>(Err("late failure")));
        assert!(state.has_permission("create_sale"));
    }

    #[test]
    fn test_predicates() {
        let state = loaded(&["cashier"]);
        assert!(state.has_permission("create_sale"));
        assert!(!state.has_permission("delete_sale"));
        assert!(state.has_any_permission(&["delete_sale", "view_sales"]));
        assert!(!state.has_all_permissions(&["delete_sale", "view_sales"]));
        assert!(state.has_all_permissions(&["create_sale", "view_sales"]));
        assert!(state.has_role("cashier"));
        assert!(!state.is_admin());
    }

    #[test]
    fn test_is_admin_roles() {
        assert!(loaded(&["admin"]).is_admin());
        assert!(loaded(&["cashier", "super_admin"]).is_admin());
        assert!(!loaded(&["pharmacy_manager"]).is_admin());
    }
}
