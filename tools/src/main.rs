//! plan-runner: headless pipeline planner.
//!
//! Usage:
//!   plan-runner --target 100 --value 50000 --mode all --split 60,30,10
//!   plan-runner --target 40 --mode email --db plans.db --csv results.csv
//!   plan-runner --db plans.db --ipc-mode

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use pipeline_core::{
    channel::{Channel, ChannelMode, ChannelSplit},
    config::PlannerConfig,
    export,
    funnel::{FunnelOutput, Goal, OutboundExperience, PlanInput},
    gateway::WeekKey,
    icp::IcpProfile,
    planner::Planner,
    schedule::TargetKpi,
    store::PlanStore,
    types::PeriodMonths,
};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Calculate {
        input: PlanInput,
        #[serde(default)]
        go_live: Option<NaiveDate>,
        #[serde(default)]
        period_months: Option<PeriodMonths>,
    },
    GetMonth {
        offset: u32,
    },
    SetAchieved {
        kpi: TargetKpi,
        year: i32,
        month: u32,
        week: u32,
        achieved: i64,
    },
    ExportCsv {
        path: String,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");

    let config = match PlannerConfig::load(data_dir) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{e}; using built-in defaults");
            PlannerConfig::default()
        }
    };

    let store = if db == ":memory:" {
        PlanStore::in_memory()?
    } else {
        PlanStore::open(db)?
    };
    store.migrate()?;
    let planner = Planner::new(config, store);

    if ipc_mode {
        return run_ipc_loop(&planner);
    }

    let period = parse_arg(&args, "--period", planner.config.period_months)?;
    let go_live = match str_arg(&args, "--go-live") {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("--go-live expects YYYY-MM-DD, got {d}"))?,
        None => chrono::Local::now().date_naive(),
    };
    let input = build_input(&args, &planner.config, period)?;

    println!("Pipeline planner (plan-runner)");
    println!("  target SALs:  {}", input.goal.target_units);
    println!("  value / SAL:  {}", export::format_currency(input.goal.value_per_unit));
    println!("  mode:         {}", input.mode.name());
    println!("  period:       {period} months from {go_live}");
    println!("  db:           {db}");
    println!();

    let outcome = planner.calculate_and_save(&input, go_live, period)?;
    print_summary(&outcome.output);

    match (&outcome.campaign, &outcome.error) {
        (Some(c), _) => println!("\n  saved as '{}'", c.name),
        (None, Some(e)) => println!("\n  calculation completed but saving targets failed: {e}"),
        (None, None) => {}
    }

    let experience = if args.iter().any(|a| a == "--experimental") {
        OutboundExperience::Experimental
    } else {
        OutboundExperience::Proven
    };
    println!("  {}", experience.timeline_message());

    if let Some(path) = str_arg(&args, "--csv") {
        let file = File::create(path).with_context(|| format!("Cannot create {path}"))?;
        export::write_pipeline_csv(file, &outcome.output)?;
        println!("  wrote {path}");
    }

    if let Some(src) = str_arg(&args, "--icp-json") {
        let out_path = str_arg(&args, "--icp-csv").unwrap_or("icp-data.csv");
        export_icps(src, out_path)?;
        println!("  wrote {out_path}");
    }

    Ok(())
}

fn build_input(args: &[String], config: &PlannerConfig, period: PeriodMonths) -> Result<PlanInput> {
    if str_arg(args, "--target").is_none() {
        bail!("--target is required (number of SALs)");
    }
    let target = parse_arg(args, "--target", 0.0f64)?;
    let value = parse_arg(args, "--value", 0.0f64)?;

    let li_accounts = parse_arg(args, "--li-accounts", config.linkedin_accounts)?;
    let call_accounts = parse_arg(args, "--call-accounts", config.call_accounts)?;
    let li_capacity = Some(config.capacity.linkedin(li_accounts, period));
    let call_capacity = Some(config.capacity.call(call_accounts, period));

    let mode = match str_arg(args, "--mode").unwrap_or("all") {
        "email" => ChannelMode::Email,
        "linkedin" => ChannelMode::LinkedIn { capacity: li_capacity },
        "call" => ChannelMode::Call { capacity: call_capacity },
        "all" => ChannelMode::All {
            split: match str_arg(args, "--split") {
                Some(s) => parse_split(s)?,
                None => config.split,
            },
            linkedin_capacity: li_capacity,
            call_capacity,
        },
        other => bail!("Unknown --mode '{other}' (email|linkedin|call|all)"),
    };

    Ok(PlanInput {
        goal: Goal::new(target, value),
        mode,
        assumptions: config.assumptions.clone(),
    })
}

fn parse_split(s: &str) -> Result<ChannelSplit> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("--split expects linkedin,email,call percentages, got {s}"))?;
    match parts.as_slice() {
        [li, em, call] => Ok(ChannelSplit::new(*li, *em, *call)),
        _ => bail!("--split needs exactly three values, got {s}"),
    }
}

fn export_icps(src: &str, out_path: &str) -> Result<()> {
    let content =
        std::fs::read_to_string(src).with_context(|| format!("Cannot read {src}"))?;
    let raw: Vec<IcpProfile> = serde_json::from_str(&content)?;
    let profiles = raw
        .into_iter()
        .map(|p| {
            IcpProfile::new(&p.persona, &p.problem, &p.benefit, p.umbrella)
                .map(|v| v.with_seniority(p.seniority).with_social_group(&p.social_group))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let file = File::create(out_path).with_context(|| format!("Cannot create {out_path}"))?;
    export::write_icp_csv(file, &profiles)?;
    Ok(())
}

fn run_ipc_loop(planner: &Planner<PlanStore>) -> Result<()> {
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
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        if let IpcCommand::Quit = cmd {
            break;
        }

        let reply = match handle_command(planner, cmd) {
            Ok(v) => v,
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(planner: &Planner<PlanStore>, cmd: IpcCommand) -> Result<serde_json::Value> {
    let reply = match cmd {
        IpcCommand::Calculate { input, go_live, period_months } => {
            let go_live = go_live.unwrap_or_else(|| chrono::Local::now().date_naive());
            let period = period_months.unwrap_or(planner.config.period_months);
            let outcome = planner.calculate_and_save(&input, go_live, period)?;
            serde_json::json!({
                "output": outcome.output,
                "campaign": outcome.campaign,
                "save_error": outcome.error.map(|e| e.to_string()),
            })
        }
        IpcCommand::GetMonth { offset } => serde_json::to_value(planner.month_view(offset)?)?,
        IpcCommand::SetAchieved { kpi, year, month, week, achieved } => {
            planner.set_achieved(WeekKey { kpi, year, month, week }, achieved)?;
            serde_json::to_value(planner.month_view(0).map(|v| v.campaign)?)?
        }
        IpcCommand::ExportCsv { path } => {
            let Some(output) = planner.latest_output()? else {
                bail!("No saved calculation to export");
            };
            export::write_pipeline_csv(File::create(&path)?, &output)?;
            serde_json::json!({ "wrote": path })
        }
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(reply)
}

fn print_summary(out: &FunnelOutput) {
    let n = export::format_count;
    println!("=== FUNNEL ===");
    println!("  meetings to book:     {}", n(out.total_meetings));
    println!();
    println!("  LinkedIn  meetings {:>8} | positive {:>8} | replies {:>8} | requests {:>9}",
        n(out.linkedin.meetings), n(out.linkedin.positive_replies), n(out.linkedin.total_replies),
        n(out.linkedin.connection_requests));
    println!("  Email     meetings {:>8} | positive {:>8} | replies {:>8} | contacts {:>9}",
        n(out.email.meetings), n(out.email.positive_replies), n(out.email.total_replies),
        n(out.email.contacts));
    println!("  Call      meetings {:>8} | answered {:>8} | dials   {:>8}",
        n(out.call.meetings), n(out.call.total_responses), n(out.call.dials));
    println!();
    for ch in Channel::ALL {
        println!("  {:<9} TAM:        {}", ch.label(), n(out.tam(ch)));
    }
    println!("  total TAM:            {}", n(out.total_tam()));
    println!();
    println!("  LinkedIn capacity:    {}", out.capacity_status_linkedin);
    println!("  Call capacity:        {}", out.capacity_status_call);
    println!("  pipeline value:       {}", export::format_currency(out.pipeline_value));
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Missing flag gives `default`; a malformed value is an error.
fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> Result<T> {
    match str_arg(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{flag} expects a number, got '{raw}'")),
        None => Ok(default),
    }
}
