//! Branch scoping
//!
//! Admins see every record. Managers and POS operators see only records
//! associated with their own branch; a branch-scoped session without a
//! branch sees nothing.

use shared::Session;
use shared::models::{Combo, Employee, Membership, Product, Role, Service, Transaction};

/// A record associated with one or more branches
pub trait BranchScoped {
    fn belongs_to_branch(&self, branch_id: &str) -> bool;
}

impl BranchScoped for Product {
    fn belongs_to_branch(&self, branch_id: &str) -> bool {
        self.branch_id == branch_id
    }
}

impl BranchScoped for Transaction {
    fn belongs_to_branch(&self, branch_id: &str) -> bool {
        self.branch_id == branch_id
    }
}

impl BranchScoped for Employee {
    fn belongs_to_branch(&self, branch_id: &str) -> bool {
        self.branch_id.as_deref() == Some(branch_id)
    }
}

impl BranchScoped for Service {
    fn belongs_to_branch(&self, branch_id: &str) -> bool {
        self.branch_ids.iter().any(|b| b == branch_id)
    }
}

impl BranchScoped for Combo {
    fn belongs_to_branch(&self, branch_id: &str) -> bool {
        self.branch_ids.iter().any(|b| b == branch_id)
    }
}

impl BranchScoped for Membership {
    fn belongs_to_branch(&self, branch_id: &str) -> bool {
        self.branch_ids.iter().any(|b| b == branch_id)
    }
}

impl<T: BranchScoped + ?Sized> BranchScoped for &T {
    fn belongs_to_branch(&self, branch_id: &str) -> bool {
        (**self).belongs_to_branch(branch_id)
    }
}

/// Whether `session` may see `record`
pub fn can_see<T: BranchScoped + ?Sized>(session: &Session, record: &T) -> bool {
    match session.role() {
        Role::Admin => true,
        Role::Manager | Role::Pos => session
            .branch_id()
            .is_some_and(|branch| record.belongs_to_branch(branch)),
    }
}

/// Records visible to the session
pub fn visible_to<'a, T: BranchScoped>(records: &'a [T], session: &Session) -> Vec<&'a T> {
    records.iter().filter(|r| can_see(session, *r)).collect()
}

/// Drop records the session may not see
pub fn retain_visible<T: BranchScoped>(records: &mut Vec<T>, session: &Session) {
    let before = records.len();
    records.retain(|r| can_see(session, r));
    if records.len() != before {
        tracing::trace!(
            user_id = %session.user_id(),
            hidden = before - records.len(),
            "Filtered records outside session branch"
        );
    }
}

/// Records of a single branch
pub fn filter_by_branch<'a, T: BranchScoped>(records: &'a [T], branch_id: &str) -> Vec<&'a T> {
    records.iter().filter(|r| r.belongs_to_branch(branch_id)).collect()
}

/// The branch a query is allowed to target.
///
/// Admins may pick any branch (or none for all branches); everyone else is
/// pinned to their own branch regardless of what they asked for.
pub fn effective_branch<'a>(session: &'a Session, requested: Option<&'a str>) -> Option<&'a str> {
    match session.role() {
        Role::Admin => requested,
        Role::Manager | Role::Pos => session.branch_id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserInfo;

    fn session(role: Role, branch: Option<&str>) -> Session {
        Session {
            user: UserInfo {
                user_id: "u".into(),
                name: "U".into(),
                role,
                branch_id: branch.map(String::from),
            },
            token: "t".into(),
        }
    }

    fn service(id: &str, branches: &[&str]) -> Service {
        Service {
            id: id.into(),
            name: id.into(),
            description: None,
            category: "massage".into(),
            price: 40.0,
            duration_minutes: 60,
            branch_ids: branches.iter().map(|b| b.to_string()).collect(),
            is_active: true,
        }
    }

    fn employee(id: &str, branch: Option<&str>) -> Employee {
        Employee {
            id: id.into(),
            name: id.into(),
            email: format!("{id}@lotus.spa"),
            phone: None,
            role: Role::Pos,
            branch_id: branch.map(String::from),
            is_active: true,
        }
    }

    #[test]
    fn test_admin_sees_everything() {
        let services = vec![service("s1", &["b1"]), service("s2", &["b2"]), service("s3", &[])];
        let admin = session(Role::Admin, None);
        assert_eq!(visible_to(&services, &admin).len(), 3);
    }

    #[test]
    fn test_manager_sees_own_branch_only() {
        let services = vec![
            service("s1", &["b1"]),
            service("s2", &["b2"]),
            service("s3", &["b2", "b1"]),
        ];
        let manager = session(Role::Manager, Some("b1"));
        let ids: Vec<_> = visible_to(&services, &manager).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s3"]);
    }

    #[test]
    fn test_branchless_operator_sees_nothing() {
        let employees = vec![employee("e1", Some("b1")), employee("e2", None)];
        let pos = session(Role::Pos, None);
        assert!(visible_to(&employees, &pos).is_empty());
    }

    #[test]
    fn test_retain_visible() {
        let mut employees = vec![
            employee("e1", Some("b1")),
            employee("e2", Some("b2")),
            employee("e3", None),
        ];
        retain_visible(&mut employees, &session(Role::Pos, Some("b2")));
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].id, "e2");
    }

    #[test]
    fn test_effective_branch_pins_non_admin() {
        let manager = session(Role::Manager, Some("b1"));
        assert_eq!(effective_branch(&manager, Some("b2")), Some("b1"));
        assert_eq!(effective_branch(&manager, None), Some("b1"));

        let admin = session(Role::Admin, None);
        assert_eq!(effective_branch(&admin, Some("b2")), Some("b2"));
        assert_eq!(effective_branch(&admin, None), None);
    }
}
