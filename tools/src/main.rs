//! boost-runner: headless runner for the upgrade eligibility engine.
//!
//! Usage:
//!   boost-runner --db boost.db --generate --seed 42
//!   boost-runner --db boost.db eligible device_id=OLT-010101 min_usage=60
//!   boost-runner --db boost.db topology OLT-010101
//!   boost-runner --db boost.db offer 100000001,100000002
//!   boost-runner --db boost.db --ipc-mode

use anyhow::Result;
use boost_core::{
    clock::{Clock, FixedClock, SystemClock},
    config::EngineConfig,
    engine::UpgradeEngine,
    error::EngineError,
    filter::FilterCriteria,
    seed::{DemoDataset, SeedPlan},
    store::BoostStore,
    view::{paginate, sorted_by, SortColumn, SortDirection, DEFAULT_PAGE_SIZE},
};
use chrono::NaiveDate;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Evaluate {
        #[serde(default)]
        criteria: FilterCriteria,
        #[serde(default)]
        page: Option<usize>,
        #[serde(default)]
        sort: Option<SortColumn>,
        #[serde(default)]
        direction: SortDirection,
    },
    Topology {
        device_id: String,
    },
    RecordOffer {
        customer_ids: Vec<String>,
    },
    Devices,
    Technologies,
    Customer {
        customer_id: String,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let generate = args.iter().any(|a| a == "--generate");
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let as_of = flag_value(&args, "--as-of")
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()?;

    let config = if std::path::Path::new(data_dir).exists() {
        EngineConfig::load(data_dir)?
    } else {
        log::warn!("data dir {data_dir} not found; using built-in defaults");
        EngineConfig::default_test()
    };
    let clock: Box<dyn Clock> = match as_of {
        Some(d) => Box::new(FixedClock(d)),
        None => Box::new(SystemClock),
    };

    let store = BoostStore::open(db)?;
    let engine = UpgradeEngine::build(store, config, clock)?;

    if generate || db == ":memory:" {
        let plan = SeedPlan::small(engine.today());
        let dataset = DemoDataset::generate(seed, &plan, &engine.config.standards);
        dataset.load_into(&engine.store, &engine.config.standards)?;
        if !ipc_mode {
            println!(
                "seeded {} edges and {} customers (seed {seed})",
                dataset.edges.len(),
                dataset.customers.len()
            );
        }
    }

    if ipc_mode {
        return run_ipc_loop(&engine);
    }

    let positional: Vec<&str> = positional_args(&args);
    match positional.as_slice() {
        [] => print_summary(&engine)?,
        ["eligible", pairs @ ..] => {
            let criteria = FilterCriteria::from_pairs(pairs.iter().filter_map(|p| p.split_once('=')))?;
            let report = engine.evaluate_eligibility(&criteria)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ["topology", device_id] => {
            let view = engine.fetch_topology(device_id)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        ["offer", ids] => {
            let ids: Vec<String> = ids.split(',').map(str::to_string).collect();
            let receipt = engine.record_offer(&ids)?;
            println!(
                "recorded {} of {} offers; breakdown: {}",
                receipt.recorded_count(),
                receipt.requested,
                serde_json::to_string(&receipt.channel_breakdown)?
            );
        }
        ["devices"] => println!("{}", serde_json::to_string_pretty(&engine.list_devices()?)?),
        ["technologies"] => println!("{}", serde_json::to_string_pretty(&engine.list_technologies()?)?),
        ["customer", id] => match engine.customer_details(id)? {
            Some(c) => println!("{}", serde_json::to_string_pretty(&c)?),
            None => println!("customer {id} not found"),
        },
        other => anyhow::bail!("unrecognized command: {other:?}"),
    }
    Ok(())
}

fn run_ipc_loop(engine: &UpgradeEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", failure(&e.to_string()))?;
                stdout.flush()?;
                continue;
            }
        };

        let response = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Evaluate { criteria, page, sort, direction } => {
                engine.evaluate_eligibility(&criteria).map(|report| {
                    let rows = match sort {
                        Some(column) => sorted_by(&report.results, column, direction),
                        None => report.results.iter().collect(),
                    };
                    let page = paginate(&rows, page.unwrap_or(1), DEFAULT_PAGE_SIZE);
                    serde_json::json!({
                        "success": true,
                        "count": report.count,
                        "page": page,
                        "exclusions": report.exclusions,
                    })
                })
            }
            IpcCommand::Topology { device_id } => engine
                .fetch_topology(&device_id)
                .and_then(|v| success(&v)),
            IpcCommand::RecordOffer { customer_ids } => engine
                .record_offer(&customer_ids)
                .map(|r| {
                    serde_json::json!({
                        "success": true,
                        "sent": r.recorded_count(),
                        "requested": r.requested,
                        "breakdown": r.channel_breakdown,
                    })
                }),
            IpcCommand::Devices => engine.list_devices().and_then(|d| success(&d)),
            IpcCommand::Technologies => engine.list_technologies().and_then(|t| success(&t)),
            IpcCommand::Customer { customer_id } => match engine.customer_details(&customer_id) {
                Ok(Some(c)) => success(&c),
                Ok(None) => Ok(failure("Customer not found")),
                Err(e) => Err(e),
            },
        };

        let line = response.unwrap_or_else(|e| {
            log::error!("ipc: {e}");
            failure(&e.to_string())
        });
        writeln!(stdout, "{line}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn success<T: serde::Serialize>(data: &T) -> Result<serde_json::Value, EngineError> {
    Ok(serde_json::json!({ "success": true, "data": serde_json::to_value(data)? }))
}

fn failure(message: &str) -> serde_json::Value {
    serde_json::json!({ "success": false, "message": message })
}

fn print_summary(engine: &UpgradeEngine) -> Result<()> {
    let report = engine.evaluate_eligibility(&FilterCriteria::default())?;

    println!("=== ELIGIBILITY SUMMARY ({}) ===", engine.today());
    println!("  customers:  {}", engine.store.customer_total()?);
    println!("  edges:      {}", engine.store.edge_total()?);
    println!("  eligible:   {}", report.count);
    for (rule, n) in &report.exclusions {
        println!("  excluded by {rule:<22} {n}");
    }

    println!();
    println!("=== TOP CANDIDATES ===");
    for r in report.results.iter().take(DEFAULT_PAGE_SIZE) {
        println!(
            "  {} | {} | access {:.1}% | usage {:.1}%{}",
            r.customer.customer_id,
            r.customer.device_id,
            r.access_rollup.avg_utilization_pct,
            r.customer.avg_usage_percentage,
            r.capacity_note
                .as_deref()
                .map(|n| format!(" | note: {n}"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Arguments that are neither flags nor flag values.
fn positional_args(args: &[String]) -> Vec<&str> {
    const VALUE_FLAGS: &[&str] = &["--db", "--data-dir", "--seed", "--as-of"];
    let mut out = Vec::new();
    let mut skip = true; // program name
    for a in args {
        if skip {
            skip = false;
            continue;
        }
        if VALUE_FLAGS.contains(&a.as_str()) {
            skip = true;
        } else if !a.starts_with("--") {
            out.push(a.as_str());
        }
    }
    out
}
