//! Routes and navigation
//!
//! Every protected page, the roles allowed on it, and the menu each role
//! gets.

use shared::models::Role;

/// Login page path
pub const LOGIN_PATH: &str = "/login";

/// Protected pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    // Admin
    AdminDashboard,
    Branches,
    Employees,
    Services,
    Products,
    Combos,
    Memberships,
    Reports,
    // Branch manager
    ManagerDashboard,
    BranchEmployees,
    BranchServices,
    Inventory,
    BranchReports,
    // POS
    Billing,
    Transactions,
}

impl AppRoute {
    pub const ALL: [AppRoute; 15] = [
        AppRoute::AdminDashboard,
        AppRoute::Branches,
        AppRoute::Employees,
        AppRoute::Services,
        AppRoute::Products,
        AppRoute::Combos,
        AppRoute::Memberships,
        AppRoute::Reports,
        AppRoute::ManagerDashboard,
        AppRoute::BranchEmployees,
        AppRoute::BranchServices,
        AppRoute::Inventory,
        AppRoute::BranchReports,
        AppRoute::Billing,
        AppRoute::Transactions,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            AppRoute::AdminDashboard => "/admin/dashboard",
            AppRoute::Branches => "/admin/branches",
            AppRoute::Employees => "/admin/employees",
            AppRoute::Services => "/admin/services",
            AppRoute::Products => "/admin/products",
            AppRoute::Combos => "/admin/combos",
            AppRoute::Memberships => "/admin/memberships",
            AppRoute::Reports => "/admin/reports",
            AppRoute::ManagerDashboard => "/manager/dashboard",
            AppRoute::BranchEmployees => "/manager/employees",
            AppRoute::BranchServices => "/manager/services",
            AppRoute::Inventory => "/manager/inventory",
            AppRoute::BranchReports => "/manager/reports",
            AppRoute::Billing => "/pos/billing",
            AppRoute::Transactions => "/pos/transactions",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppRoute::AdminDashboard | AppRoute::ManagerDashboard => "Dashboard",
            AppRoute::Branches => "Branches",
            AppRoute::Employees | AppRoute::BranchEmployees => "Staff",
            AppRoute::Services | AppRoute::BranchServices => "Services",
            AppRoute::Products => "Products",
            AppRoute::Combos => "Combos",
            AppRoute::Memberships => "Memberships",
            AppRoute::Reports | AppRoute::BranchReports => "Reports",
            AppRoute::Inventory => "Inventory",
            AppRoute::Billing => "Billing",
            AppRoute::Transactions => "Transactions",
        }
    }

    /// Roles allowed on this page
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            AppRoute::AdminDashboard
            | AppRoute::Branches
            | AppRoute::Employees
            | AppRoute::Services
            | AppRoute::Products
            | AppRoute::Combos
            | AppRoute::Memberships
            | AppRoute::Reports => &[Role::Admin],
            AppRoute::ManagerDashboard
            | AppRoute::BranchEmployees
            | AppRoute::BranchServices
            | AppRoute::Inventory
            | AppRoute::BranchReports => &[Role::Manager],
            AppRoute::Billing => &[Role::Manager, Role::Pos],
            AppRoute::Transactions => &[Role::Admin, Role::Manager, Role::Pos],
        }
    }

    /// Resolve a path (query string and trailing slash ignored)
    pub fn from_path(path: &str) -> Option<AppRoute> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|r| r.path() == path)
    }
}

/// Landing page of a role
pub fn home_route(role: Role) -> AppRoute {
    match role {
        Role::Admin => AppRoute::AdminDashboard,
        Role::Manager => AppRoute::ManagerDashboard,
        Role::Pos => AppRoute::Billing,
    }
}

/// Menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub route: AppRoute,
    pub title: &'static str,
    pub path: &'static str,
}

impl From<AppRoute> for NavItem {
    fn from(route: AppRoute) -> Self {
        Self {
            route,
            title: route.title(),
            path: route.path(),
        }
    }
}

/// Menu for a role, in display order
pub fn navigation(role: Role) -> Vec<NavItem> {
    let routes: &[AppRoute] = match role {
        Role::Admin => &[
            AppRoute::AdminDashboard,
            AppRoute::Branches,
            AppRoute::Employees,
            AppRoute::Services,
            AppRoute::Products,
            AppRoute::Combos,
            AppRoute::Memberships,
            AppRoute::Transactions,
            AppRoute::Reports,
        ],
        Role::Manager => &[
            AppRoute::ManagerDashboard,
            AppRoute::BranchEmployees,
            AppRoute::BranchServices,
            AppRoute::Inventory,
            AppRoute::Billing,
            AppRoute::Transactions,
            AppRoute::BranchReports,
        ],
        Role::Pos => &[AppRoute::Billing, AppRoute::Transactions],
    };
    routes.iter().copied().map(NavItem::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(AppRoute::from_path("/admin/branches"), Some(AppRoute::Branches));
        assert_eq!(AppRoute::from_path("/admin/branches/"), Some(AppRoute::Branches));
        assert_eq!(AppRoute::from_path("/pos/billing?tab=cart"), Some(AppRoute::Billing));
        assert_eq!(AppRoute::from_path("/nowhere"), None);
        assert_eq!(AppRoute::from_path("/"), None);
    }

    #[test]
    fn test_paths_unique() {
        for (i, a) in AppRoute::ALL.iter().enumerate() {
            for b in &AppRoute::ALL[i + 1..] {
                assert_ne!(a.path(), b.path());
            }
        }
    }

    #[test]
    fn test_menu_only_lists_allowed_pages() {
        for role in Role::ALL {
            let items = navigation(role);
            assert!(!items.is_empty());
            assert_eq!(items[0].route, home_route(role));
            for item in items {
                assert!(item.route.allowed_roles().contains(&role), "{role} -> {}", item.path);
            }
        }
    }

    #[test]
    fn test_home_route_allowed_for_role() {
        for role in Role::ALL {
            assert!(home_route(role).allowed_roles().contains(&role));
        }
    }
}
