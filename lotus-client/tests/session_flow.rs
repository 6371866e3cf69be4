// lotus-client/tests/session_flow.rs
// Login, restart, gate and report end to end against a stub backend

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lotus_client::report::{ReportOptions, ReportQuery, build_report};
use lotus_client::{
    AccessDecision, AppRoute, AuthBackend, ClientError, ClientResult, FileStorage, LoginRequest,
    LoginResponse, Role, SessionStorage, SessionStore, UserInfo, check_route, post_login_redirect,
};
use shared::models::{Product, Transaction, TransactionItem};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct StubBackend {
    logout_fails: bool,
    logout_calls: Arc<AtomicUsize>,
}

fn user_for(email: &str) -> Option<UserInfo> {
    let (role, branch) = match email {
        "admin@lotus.spa" => (Role::Admin, None),
        "manager@lotus.spa" => (Role::Manager, Some("b1")),
        "pos@lotus.spa" => (Role::Pos, Some("b2")),
        _ => return None,
    };
    Some(UserInfo {
        user_id: email.split('@').next().unwrap_or_default().to_string(),
        name: email.to_string(),
        role,
        branch_id: branch.map(String::from),
    })
}

#[async_trait]
impl AuthBackend for StubBackend {
    async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse> {
        match user_for(&credentials.email) {
            Some(user) if credentials.password == "secret1" => Ok(LoginResponse {
                token: format!("token-{}", user.user_id),
                user,
            }),
            _ => Err(ClientError::Unauthorized("Invalid credentials".into())),
        }
    }

    async fn logout(&self, _token: &str) -> ClientResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails {
            Err(ClientError::Api {
                status: 500,
                message: "boom".into(),
            })
        } else {
            Ok(())
        }
    }

    async fn profile(&self, token: &str) -> ClientResult<UserInfo> {
        let id = token.trim_start_matches("token-");
        user_for(&format!("{id}@lotus.spa"))
            .ok_or_else(|| ClientError::Unauthorized("Token revoked".into()))
    }
}

fn store(dir: &TempDir, backend: StubBackend) -> SessionStore<StubBackend> {
    SessionStore::new(backend, FileStorage::new(dir.path()))
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut first = store(&dir, StubBackend::default());
    let session = first
        .login(LoginRequest::new("manager@lotus.spa", "secret1"))
        .await
        .unwrap();
    assert!(FileStorage::new(dir.path()).path_for("pos_session").exists());

    let mut second = store(&dir, StubBackend::default());
    assert_eq!(second.rehydrate(), Some(&session));
    assert_eq!(second.token(), Some("token-manager"));
}

#[tokio::test]
async fn test_failed_login_keeps_previous_session() {
    let dir = TempDir::new().unwrap();
    let mut store = store(&dir, StubBackend::default());
    let session = store
        .login(LoginRequest::new("pos@lotus.spa", "secret1"))
        .await
        .unwrap();

    let err = store
        .login(LoginRequest::new("admin@lotus.spa", "wrong-password"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Invalid credentials");
    assert_eq!(store.current(), Some(&session));
}

#[tokio::test]
async fn test_logout_clears_even_when_server_fails() {
    let dir = TempDir::new().unwrap();
    let backend = StubBackend {
        logout_fails: true,
        ..Default::default()
    };
    let calls = backend.logout_calls.clone();
    let mut store = store(&dir, backend);
    store
        .login(LoginRequest::new("admin@lotus.spa", "secret1"))
        .await
        .unwrap();

    store.logout().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!store.is_authenticated());
    assert_eq!(FileStorage::new(dir.path()).load("pos_session").unwrap(), None);

    // Nothing to restore after logout
    assert!(store.rehydrate().is_none());
}

#[tokio::test]
async fn test_corrupt_blob_starts_signed_out() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.save("pos_session", "{not json").unwrap();

    let mut store = store(&dir, StubBackend::default());
    assert!(store.rehydrate().is_none());
    assert_eq!(storage.load("pos_session").unwrap(), None);
}

#[tokio::test]
async fn test_gate_after_login() {
    let dir = TempDir::new().unwrap();
    let mut store = store(&dir, StubBackend::default());

    assert!(matches!(
        check_route(AppRoute::Inventory, store.current()),
        AccessDecision::RedirectToLogin { .. }
    ));

    let session = store
        .login(LoginRequest::new("pos@lotus.spa", "secret1"))
        .await
        .unwrap();
    assert!(check_route(AppRoute::Billing, Some(&session)).is_allowed());
    assert_eq!(
        check_route(AppRoute::Inventory, Some(&session)),
        AccessDecision::RedirectHome { path: "/pos/billing" }
    );
    assert_eq!(post_login_redirect(&session, Some("/admin/reports")), "/pos/billing");
}

#[tokio::test]
async fn test_report_never_leaks_other_branches() {
    let dir = TempDir::new().unwrap();
    let mut store = store(&dir, StubBackend::default());
    let session = store
        .login(LoginRequest::new("manager@lotus.spa", "secret1"))
        .await
        .unwrap();

    let day = chrono::NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
    let at = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
    let tx = |id: &str, branch: &str, total: f64| Transaction {
        id: id.into(),
        branch_id: branch.into(),
        timestamp: at,
        items: vec![TransactionItem {
            product_id: format!("p-{branch}"),
            quantity: 1,
            price: total,
        }],
        total,
        customer: None,
    };
    let transactions = vec![tx("t1", "b1", 30.0), tx("t2", "b2", 500.0), tx("t3", "b1", 20.0)];
    let products = vec![Product {
        id: "p-b2".into(),
        name: "Oil".into(),
        category: "retail".into(),
        price: 10.0,
        stock: 1,
        branch_id: "b2".into(),
        sku: None,
        is_active: true,
    }];

    let query = ReportQuery {
        branch_id: Some("b2".into()),
        ..Default::default()
    };
    let options = ReportOptions {
        today: day,
        ..Default::default()
    };
    let report = build_report(&session, &query, &transactions, &products, options);

    assert_eq!(report.branch_id.as_deref(), Some("b1"));
    assert_eq!(report.summary.transactions, 2);
    assert!((report.summary.revenue - 50.0).abs() < 1e-9);
    assert!(report.top_products.iter().all(|p| p.product_id == "p-b1"));
    assert_eq!(report.inventory.total_products, 0);
}
