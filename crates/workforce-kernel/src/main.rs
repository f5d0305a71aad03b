use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use workforce_kernel::assets::AssetOverride;
use workforce_kernel::hierarchy::OrgNode;
use workforce_kernel::test_harness::{run_simulator, SimulatorConfig, TestHarness};
use workforce_kernel::{seed, *};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("workforce-kernel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Workforce kernel: reporting hierarchy, request workflow, payroll and assets")
        .arg_required_else_help(false)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the workforce simulator over the demo data set")
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Number of operations to simulate"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                ),
        )
        .subcommand(
            Command::new("stress")
                .about("Run stress test over a synthetic org")
                .arg(
                    Arg::new("employees")
                        .long("employees")
                        .default_value("10000")
                        .value_parser(value_parser!(usize))
                        .help("Number of employees to generate"),
                )
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .default_value("5000")
                        .value_parser(value_parser!(usize))
                        .help("Number of iterations"),
                ),
        )
        .subcommand(
            Command::new("org-chart")
                .about("Print the demo reporting tree")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("validate-log")
                .about("Replay a demo workflow and verify the audit chain"),
        )
        .subcommand(
            Command::new("report")
                .about("Summarize the demo data set")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        );

    let matches = cli.get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => WorkforceConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => WorkforceConfig::default(),
    };

    match matches.subcommand() {
        Some(("simulate", args)) => {
            let operations = args.get_one::<u64>("operations").copied().unwrap_or(10_000);
            let seed = args.get_one::<u64>("seed").copied().unwrap_or(42);
            let stop_on_violation = args.get_flag("stop-on-violation");

            println!("Running Workforce Simulator...");
            println!("Operations: {operations}");
            println!("Seed: {seed}");
            println!();

            let report = run_simulator(SimulatorConfig {
                seed,
                total_operations: operations,
                stop_on_first_violation: stop_on_violation,
                ..Default::default()
            });

            println!("{}", report.generate_text());

            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("stress", args)) => {
            let employees = args.get_one::<usize>("employees").copied().unwrap_or(10_000);
            let iterations = args.get_one::<usize>("iterations").copied().unwrap_or(5_000);

            println!("Running stress test...");
            println!("Employees: {employees}");
            println!("Iterations: {iterations}");
            println!();

            let report = TestHarness::run_stress_test(employees, iterations);

            println!("Stress Test Report:");
            println!("  Employees: {}", report.employees);
            println!("  Final Employees: {}", report.final_employees);
            println!("  Iterations: {}", report.iterations);
            println!("  Rejected Commands: {}", report.rejected_commands);
            println!("  Violations: {}", report.violations);
            println!("  Success: {}", report.success);

            std::process::exit(if report.success { 0 } else { 1 });
        }
        Some(("org-chart", args)) => {
            let handle = WorkforceHandle::from_store(seed::demo_store(), config);
            let chart = handle.org_chart();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                for root in &chart {
                    print_node(root, 0);
                }
            }
        }
        Some(("validate-log", _)) => {
            let handle = WorkforceHandle::from_store(seed::demo_store(), config);
            replay_demo_workflow(&handle)?;

            let events = handle.events();
            for event in &events {
                println!(
                    "{:<24} {:<8} {:?} {}",
                    event.action, event.subject, event.outcome, event.detail
                );
            }
            let verified = handle
                .verify_integrity()
                .context("audit chain verification failed")?;
            println!();
            println!("Log integrity: VALID ({verified} events)");
        }
        Some(("report", args)) => {
            let handle = WorkforceHandle::from_store(seed::demo_store(), config);
            let summary = handle.summary();

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Workforce Report");
                println!("================");
                println!();
                println!("Headcount: {}", summary.headcount);
                println!("  Onboarding: {}", summary.onboarding);
                println!("  On leave: {}", summary.on_leave);
                println!();
                println!("Pending requests:");
                for (kind, count) in &summary.pending_requests {
                    println!("  {kind}: {count}");
                }
                println!("Open tickets: {}", summary.open_tickets);
                println!();
                println!("Payroll totals:");
                for (currency, net) in &summary.payroll_totals {
                    println!("  {currency}: {net}");
                }
                println!();
                println!(
                    "Assets: {}/{} in use ({}%)",
                    summary.assets_in_use,
                    summary.assets_total,
                    summary.asset_utilisation()
                );
            }
        }
        _ => {}
    }

    Ok(())
}

fn print_node(node: &OrgNode, depth: usize) {
    println!(
        "{}{} ({:?}, {})",
        "  ".repeat(depth),
        node.employee.name,
        node.employee.role,
        node.employee.department
    );
    for report in &node.reports {
        print_node(report, depth + 1);
    }
}

/// A representative console session: HR triages the inbox, IT picks up a
/// ticket, and a few rule violations are attempted along the way.
fn replay_demo_workflow(handle: &WorkforceHandle) -> anyhow::Result<()> {
    handle.sign_in(&seed::DEMO_SIGNED_IN.into())?;

    handle.decide(&"r1".into(), Decision::Approved)?;
    handle.decide(&"r2".into(), Decision::Rejected)?;
    let _ = handle.decide(&"r2".into(), Decision::Approved);

    let _ = handle.reparent(&"2".into(), &"5".into());
    handle.reparent(&"5".into(), &"7".into())?;

    if let Some(anna) = handle.employee(&seed::DEMO_SIGNED_IN.into()) {
        let change = handle.submit_request(NewRequest::profile_change(
            &anna,
            ProfilePatch::default().address("Invalidenstraße 12, Berlin"),
        ))?;
        handle.decide(&change.id, Decision::Approved)?;
    }

    handle.sign_in(&"7".into())?;
    handle.move_ticket(&"r3".into(), RequestStatus::InProgress)?;
    handle.move_ticket(&"r4".into(), RequestStatus::Resolved)?;

    let _ = handle.assign_asset(&"a1".into(), &"6".into());
    handle.assign_asset(&"a4".into(), &"6".into())?;
    handle.override_asset_status(&"a3".into(), AssetOverride::Repair)?;

    handle.approve_payroll(&"6".into())?;
    handle.run_payroll();
    handle.sign_out();
    Ok(())
}
