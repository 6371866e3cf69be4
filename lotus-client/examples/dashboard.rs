// lotus-client/examples/dashboard.rs
// Sign in (or reuse the cached session) and print the dashboard figures

use lotus_client::report::{ReportOptions, ReportQuery, build_report};
use lotus_client::{ClientConfig, LoginRequest, SessionStore, logger, navigation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_logger();

    let config = ClientConfig::load();
    let mut store = SessionStore::open(&config)?;

    if !store.is_authenticated() {
        let args: Vec<String> = std::env::args().collect();
        if args.len() < 3 {
            println!("Usage: {} <email> <password> [branch_id]", args[0]);
            println!("  Example: {} admin@lotus.spa secret", args[0]);
            return Ok(());
        }
        if let Err(e) = store.login(LoginRequest::new(&args[1], &args[2])).await {
            tracing::error!("Login failed: {}", e.user_message());
            return Err(e.into());
        }
    }

    let api = store.api()?;
    let session = api.session();
    tracing::info!(user = %session.user.name, role = %session.role(), "Signed in");

    for item in navigation(session.role()) {
        tracing::info!("  {} -> {}", item.title, item.path);
    }

    let transactions = api.transactions().await?;
    let products = api.products().await?;

    let branch = std::env::args().nth(3);
    let query = ReportQuery::from_params(branch.as_deref(), None, None, None)?;
    let report = build_report(session, &query, &transactions, &products, ReportOptions::default());

    tracing::info!(
        revenue = report.summary.revenue,
        transactions = report.summary.transactions,
        average_ticket = report.summary.average_ticket,
        "Sales summary"
    );
    for point in &report.daily {
        tracing::info!("{}: {} sales, {:.2}", point.date, point.count, point.revenue);
    }
    for (rank, product) in report.top_products.iter().enumerate() {
        tracing::info!("#{} {} x{} = {:.2}", rank + 1, product.product_id, product.quantity, product.revenue);
    }
    if !report.inventory.low_stock.is_empty() {
        tracing::warn!("Low stock: {}", report.inventory.low_stock.join(", "));
    }

    Ok(())
}
