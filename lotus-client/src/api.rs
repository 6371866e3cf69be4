//! Typed REST API
//!
//! CRUD over the backend collections on behalf of a session. Payloads are
//! validated before they are sent, and lists are narrowed to the session's
//! branch before they are returned.

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::Session;
use shared::models::{
    Branch, BranchCreate, BranchUpdate, Combo, ComboCreate, ComboUpdate, Employee, EmployeeCreate,
    EmployeeUpdate, Membership, MembershipCreate, MembershipUpdate, Product, ProductCreate,
    ProductUpdate, Service, ServiceCreate, ServiceUpdate, Transaction, TransactionCreate,
};

use crate::scope;
use crate::validation;
use crate::{ClientError, ClientResult, HttpClient};

/// A backend collection
pub trait Resource: DeserializeOwned + Send {
    /// Collection path, e.g. `"branches"`
    const PATH: &'static str;
    /// Human-readable name for messages
    const NAME: &'static str;

    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;

    fn validate_create(payload: &Self::Create) -> ClientResult<()>;
    fn validate_update(payload: &Self::Update) -> ClientResult<()>;

    /// Whether the session may see this record
    fn visible_to(&self, session: &Session) -> bool;

    /// Branches a new record is assigned to; `None` when only admins may
    /// create the record at all
    fn create_branches(payload: &Self::Create) -> Option<Vec<&str>>;

    /// Branches an update reassigns the record to; empty when unchanged
    fn update_branches(_payload: &Self::Update) -> Vec<&str> {
        Vec::new()
    }
}

/// Branch reference fields of a payload
trait BranchRefs {
    fn branch_refs(&self) -> Vec<&str>;
}

impl BranchRefs for String {
    fn branch_refs(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl BranchRefs for Vec<String> {
    fn branch_refs(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

impl<T: BranchRefs> BranchRefs for Option<T> {
    fn branch_refs(&self) -> Vec<&str> {
        self.as_ref().map(BranchRefs::branch_refs).unwrap_or_default()
    }
}

macro_rules! branch_scoped_resource {
    (
        $ty:ty, $path:literal, $name:literal, $create:ty, $update:ty, $vc:path, $vu:path,
        $create_field:ident $(, $update_field:ident)?
    ) => {
        impl Resource for $ty {
            const PATH: &'static str = $path;
            const NAME: &'static str = $name;

            type Create = $create;
            type Update = $update;

            fn validate_create(payload: &Self::Create) -> ClientResult<()> {
                $vc(payload)
            }

            fn validate_update(payload: &Self::Update) -> ClientResult<()> {
                $vu(payload)
            }

            fn visible_to(&self, session: &Session) -> bool {
                scope::can_see(session, self)
            }

            fn create_branches(payload: &Self::Create) -> Option<Vec<&str>> {
                Some(payload.$create_field.branch_refs())
            }

            $(
                fn update_branches(payload: &Self::Update) -> Vec<&str> {
                    payload.$update_field.branch_refs()
                }
            )?
        }
    };
}

branch_scoped_resource!(
    Service,
    "services",
    "Service",
    ServiceCreate,
    ServiceUpdate,
    validation::validate_service_create,
    validation::validate_service_update,
    branch_ids,
    branch_ids
);
branch_scoped_resource!(
    Product,
    "products",
    "Product",
    ProductCreate,
    ProductUpdate,
    validation::validate_product_create,
    validation::validate_product_update,
    branch_id
);
branch_scoped_resource!(
    Combo,
    "combos",
    "Combo",
    ComboCreate,
    ComboUpdate,
    validation::validate_combo_create,
    validation::validate_combo_update,
    branch_ids,
    branch_ids
);
branch_scoped_resource!(
    Membership,
    "memberships",
    "Membership",
    MembershipCreate,
    MembershipUpdate,
    validation::validate_membership_create,
    validation::validate_membership_update,
    branch_ids,
    branch_ids
);
branch_scoped_resource!(
    Employee,
    "employees",
    "Employee",
    EmployeeCreate,
    EmployeeUpdate,
    validation::validate_employee_create,
    validation::validate_employee_update,
    branch_id,
    branch_id
);

impl Resource for Branch {
    const PATH: &'static str = "branches";
    const NAME: &'static str = "Branch";

    type Create = BranchCreate;
    type Update = BranchUpdate;

    fn validate_create(payload: &Self::Create) -> ClientResult<()> {
        validation::validate_branch_create(payload)
    }

    fn validate_update(payload: &Self::Update) -> ClientResult<()> {
        validation::validate_branch_update(payload)
    }

    /// Non-admins only see their own branch
    fn visible_to(&self, session: &Session) -> bool {
        session.is_admin() || session.branch_id() == Some(self.id.as_str())
    }

    fn create_branches(_payload: &Self::Create) -> Option<Vec<&str>> {
        None
    }
}

/// API client bound to an authenticated session
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.http.base_url())
            .field("user_id", &self.session.user_id())
            .field("role", &self.session.role())
            .field("branch_id", &self.session.branch_id())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(http: HttpClient, session: Session) -> Self {
        let http = http.with_token(session.token.clone());
        Self { http, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn item_path<R: Resource>(id: &str) -> ClientResult<String> {
        if id.trim().is_empty() || id.contains('/') {
            return Err(ClientError::validation(format!("Invalid {} id", R::NAME)));
        }
        Ok(format!("{}/{}", R::PATH, id))
    }

    /// Non-admins may only assign records to their own branch.
    ///
    /// `None` marks an admin-only operation; an empty list on create leaves
    /// the record outside every branch and is refused as well.
    fn ensure_assignable(
        &self,
        name: &str,
        branches: Option<Vec<&str>>,
        allow_unchanged: bool,
    ) -> ClientResult<()> {
        if self.session.is_admin() {
            return Ok(());
        }
        let Some(branches) = branches else {
            return Err(ClientError::Forbidden(format!(
                "Only administrators can create a {}",
                name.to_lowercase()
            )));
        };
        let own = self.session.branch_id();
        let outside = if branches.is_empty() {
            !allow_unchanged
        } else {
            branches.iter().any(|b| Some(*b) != own)
        };
        if outside {
            tracing::debug!(
                user_id = %self.session.user_id(),
                resource = name,
                ?branches,
                "Refused assignment outside session branch"
            );
            return Err(ClientError::Forbidden(format!(
                "{name} can only be assigned to your own branch"
            )));
        }
        Ok(())
    }

    /// All records of a collection visible to the session
    pub async fn list<R: Resource>(&self) -> ClientResult<Vec<R>> {
        let mut records: Vec<R> = self.http.get(R::PATH).await?;
        records.retain(|r| r.visible_to(&self.session));
        tracing::debug!(resource = R::PATH, count = records.len(), "Listed records");
        Ok(records)
    }

    /// One record; records outside the session's branch read as not found
    pub async fn get<R: Resource>(&self, id: &str) -> ClientResult<R> {
        let record: R = self.http.get(&Self::item_path::<R>(id)?).await?;
        if !record.visible_to(&self.session) {
            return Err(ClientError::NotFound(format!("{} not found", R::NAME)));
        }
        Ok(record)
    }

    pub async fn create<R: Resource>(&self, payload: &R::Create) -> ClientResult<R> {
        R::validate_create(payload)?;
        self.ensure_assignable(R::NAME, R::create_branches(payload), false)?;
        let record: R = self.http.post(R::PATH, payload).await?;
        tracing::info!(resource = R::PATH, user_id = %self.session.user_id(), "Created record");
        Ok(record)
    }

    pub async fn update<R: Resource>(&self, id: &str, payload: &R::Update) -> ClientResult<R> {
        R::validate_update(payload)?;
        self.ensure_assignable(R::NAME, Some(R::update_branches(payload)), true)?;
        // Records outside the session's branch read as not found
        self.get::<R>(id).await?;
        let record: R = self.http.put(&Self::item_path::<R>(id)?, payload).await?;
        tracing::info!(resource = R::PATH, id = %id, "Updated record");
        Ok(record)
    }

    pub async fn delete<R: Resource>(&self, id: &str) -> ClientResult<()> {
        self.get::<R>(id).await?;
        self.http.delete(&Self::item_path::<R>(id)?).await?;
        tracing::info!(resource = R::PATH, id = %id, "Deleted record");
        Ok(())
    }

    // ========== Transactions (create/read only) ==========

    /// Transactions visible to the session
    pub async fn transactions(&self) -> ClientResult<Vec<Transaction>> {
        let mut records: Vec<Transaction> = self.http.get("transactions").await?;
        scope::retain_visible(&mut records, &self.session);
        Ok(records)
    }

    pub async fn transaction(&self, id: &str) -> ClientResult<Transaction> {
        if id.trim().is_empty() || id.contains('/') {
            return Err(ClientError::validation("Invalid transaction id"));
        }
        let record: Transaction = self.http.get(&format!("transactions/{id}")).await?;
        if !scope::can_see(&self.session, &record) {
            return Err(ClientError::NotFound("Transaction not found".into()));
        }
        Ok(record)
    }

    /// Record a sale at the session's branch
    pub async fn create_transaction(&self, payload: &TransactionCreate) -> ClientResult<Transaction> {
        validation::validate_transaction_create(payload)?;
        self.ensure_assignable("Sale", Some(payload.branch_id.branch_refs()), false)?;
        let record: Transaction = self.http.post("transactions", payload).await?;
        tracing::info!(
            transaction_id = %record.id,
            branch_id = %record.branch_id,
            total = record.total,
            "Recorded transaction"
        );
        Ok(record)
    }

    // ========== Convenience ==========

    pub async fn branches(&self) -> ClientResult<Vec<Branch>> {
        self.list().await
    }

    pub async fn services(&self) -> ClientResult<Vec<Service>> {
        self.list().await
    }

    pub async fn products(&self) -> ClientResult<Vec<Product>> {
        self.list().await
    }

    pub async fn combos(&self) -> ClientResult<Vec<Combo>> {
        self.list().await
    }

    pub async fn memberships(&self) -> ClientResult<Vec<Membership>> {
        self.list().await
    }

    pub async fn employees(&self) -> ClientResult<Vec<Employee>> {
        self.list().await
    }
}
