use affiliate_ops::accounts::{account_router, AccountDirectory, AccountsState};
use affiliate_ops::config::AppConfig;
use affiliate_ops::error::AppError;
use affiliate_ops::incentives::domain::{EvaluationInput, EvaluationReason};
use affiliate_ops::incentives::{
    catalog, incentive_router, IncentiveService, RuleRepository, TracingAuditSink,
};
use affiliate_ops::reports::{reports_router, ReportsState};
use affiliate_ops::sales::{sales_router, SalesLedger, SalesState};
use affiliate_ops::telemetry;
use affiliate_ops::accounts::domain::AccountId;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Affiliate Ops",
    about = "Run the affiliate performance and incentive service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Incentive engine utilities
    Incentive {
        #[command(subcommand)]
        command: IncentiveCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum IncentiveCommand {
    /// Evaluate one set of period aggregates against the starter catalog
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Nominal commission rate in percent (e.g. 6.5)
    #[arg(long)]
    commission_rate: f64,
    /// Total commission earned over the period, in whole IDR
    #[arg(long)]
    commission: i64,
    /// Total qualifying revenue over the period, in whole IDR
    #[arg(long)]
    revenue: i64,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Incentive {
            command: IncentiveCommand::Evaluate(args),
        } => run_evaluate(args),
    }
}

fn seeded_rules() -> Result<Arc<RuleRepository>, AppError> {
    let repository = Arc::new(RuleRepository::new());
    for draft in catalog::starter_rules() {
        repository
            .add(draft)
            .map_err(|err| AppError::Incentive(err.into()))?;
    }
    Ok(repository)
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let ops_state = OpsState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let directory = Arc::new(AccountDirectory::new());
    let ledger = Arc::new(SalesLedger::new());
    let rules = seeded_rules()?;
    let service = Arc::new(IncentiveService::new(rules, Arc::new(TracingAuditSink)));

    let ops_router: Router = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(ops_state);

    let app = Router::new()
        .merge(ops_router)
        .merge(account_router(AccountsState {
            directory: directory.clone(),
            ledger: ledger.clone(),
        }))
        .merge(sales_router(SalesState {
            directory: directory.clone(),
            ledger: ledger.clone(),
        }))
        .merge(incentive_router(service.clone()))
        .merge(reports_router(ReportsState {
            directory,
            ledger,
            service,
        }))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "affiliate ops service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let rules = seeded_rules()?;
    let service = IncentiveService::new(rules, Arc::new(TracingAuditSink));

    let rate_bps = (args.commission_rate * 100.0).round().max(0.0) as u32;
    let input = EvaluationInput {
        account_id: AccountId("cli".to_string()),
        commission_rate_bps: rate_bps,
        period_commission: args.commission,
        period_revenue: args.revenue,
    };

    let result = service.evaluate(input)?;

    println!("Incentive evaluation");
    println!(
        "Commission rate: {:.2}% | commission: {} IDR | revenue: {} IDR",
        args.commission_rate, args.commission, args.revenue
    );
    println!("Outcome: {}", result.reason.label());
    match (&result.matched_rule_id, result.matched_tier_index) {
        (Some(rule_id), Some(tier)) => {
            println!("Matched rule {rule_id}, tier {}", tier + 1);
        }
        (Some(rule_id), None) => {
            println!("Matched rule {rule_id}, no tier reached");
        }
        _ => println!("No rule band covers this commission rate"),
    }
    if result.reason == EvaluationReason::Eligible {
        println!("Payable incentive: {} IDR", result.incentive_amount);
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
