use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing_subscriber::{fmt, EnvFilter};

use backlogger::config::Config;
use backlogger::journal::Journal;
use backlogger::models::TradeInput;
use backlogger::session::{Session, SettingsInput};
use backlogger::store::JsonFileStore;

const USAGE: &str = "\
usage: backlogger <command>
  status
  start <strategy> <pair> [YYYY-MM-DD]
  trade <entry> <stop> <exit> [riskPct|-] [grade] [strategy mgmt risk plan stars] [notes...]
  next-day
  no-trade
  end-week
  reports
  settings <startingBalance> <baseRiskPct> [--reset]";

fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let store = JsonFileStore::from_config(&cfg);
    let mut journal = Journal::open(store, cfg);

    match command.as_str() {
        "status" => {}
        "start" => {
            let (Some(strategy), Some(pair)) = (args.get(1), args.get(2)) else {
                bail!("start needs <strategy> <pair>");
            };
            let date = args
                .get(3)
                .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
                .transpose()
                .context("date must be YYYY-MM-DD")?;
            match journal.start_challenge(strategy, pair, date)? {
                Some(c) => println!(
                    "Week {} • {} on {} • from {}",
                    c.week_id, c.strategy, c.pair, c.week_start
                ),
                None => println!("A challenge is already running (or labels were blank)."),
            }
        }
        "trade" => {
            let input = trade_input(&args[1..])?;
            match journal.record_trade(&input)? {
                Some(t) => println!(
                    "{} {} {:.2}R {:+.0} (grade {}, rules {})",
                    t.pair,
                    t.direction,
                    t.r_multiple,
                    t.pl,
                    t.grade,
                    if t.rules.all() { "followed" } else { "broken" }
                ),
                None => println!("No active challenge."),
            }
        }
        "next-day" => match journal.advance_day()? {
            Some(i) => println!("Now on day {} of 5", i + 1),
            None => println!("No active challenge."),
        },
        "no-trade" => {
            if !journal.mark_no_trade()? {
                println!("No active challenge.");
            }
        }
        "end-week" => match journal.end_week()? {
            Some(report) => report.print_summary(),
            None => println!("No active challenge."),
        },
        "reports" => {
            for report in &journal.session().reports {
                report.print_summary();
            }
            return Ok(());
        }
        "settings" => {
            let input = SettingsInput {
                starting_balance: args.get(1).cloned().unwrap_or_default(),
                base_risk_pct: args.get(2).cloned().unwrap_or_default(),
            };
            let reset = args.iter().any(|a| a == "--reset");
            let s = journal.save_settings(&input, reset)?;
            println!(
                "Settings: start ${:.0}, base risk {}%",
                s.starting_balance, s.base_risk_pct
            );
        }
        other => {
            println!("unknown command '{}'\n{}", other, USAGE);
            return Ok(());
        }
    }

    print_status(journal.session());
    Ok(())
}

fn trade_input(args: &[String]) -> Result<TradeInput> {
    if args.len() < 3 {
        bail!("trade needs <entry> <stop> <exit>");
    }
    let mut input = TradeInput::new(&args[0], &args[1], &args[2]);
    if let Some(risk) = args.get(3).filter(|r| r.as_str() != "-") {
        input.risk_pct = risk.clone();
    }
    if let Some(grade) = args.get(4) {
        input.grade = grade.clone();
    }
    if args.len() >= 9 {
        input.strategy_stars = args[5].clone();
        input.management_stars = args[6].clone();
        input.risk_stars = args[7].clone();
        input.plan_stars = args[8].clone();
    }
    if args.len() > 9 {
        input.notes = args[9..].join(" ");
    }
    Ok(input)
}

fn print_status(session: &Session) {
    let d = session.dashboard();

    println!("\n{}", "=".repeat(60));
    println!("  BACKLOGGER");
    println!("{}", "=".repeat(60));
    match &session.current_challenge {
        Some(c) => println!(
            "  Week {} • {} on {} • {} ({} trades today{})",
            c.week_id,
            c.strategy,
            c.pair,
            c.current_day().key,
            c.current_day().trades.len(),
            if c.current_day().no_trade { ", no-trade day" } else { "" }
        ),
        None => println!("  No active challenge"),
    }
    println!();
    println!("  ACCOUNT");
    println!("  ───────────────────────────────────");
    println!("  Balance:       ${:.0}", d.balance);
    println!("  Equity:        ${:.0}", d.equity);
    println!("  Daily PnL:     ${:+.0}", d.daily_pl);
    println!("  Week PnL:      ${:+.0}", d.weekly_pl);
    println!();
    println!("  PERFORMANCE");
    println!("  ───────────────────────────────────");
    println!("  Profit Factor: {}", d.profit_factor);
    println!("  Win Rate:      {:.2}%", d.win_rate_pct);
    println!("  Max DD:        ${:.0}", d.max_drawdown);
    println!("  MPI:           {}", d.mpi);
    println!(
        "  Level:         {} ({:.0}% to {})",
        d.level.name,
        d.level.progress_to_next * 100.0,
        d.level.next.unwrap_or("—")
    );
    println!();
    println!("  RECORDS");
    println!("  ───────────────────────────────────");
    for record in session.records() {
        println!("  {:<24} {}", record.label, record.value);
    }
    if !d.badges.is_empty() {
        println!();
        println!("  BADGES");
        println!("  ───────────────────────────────────");
        for label in &d.badges {
            println!("  • {}", label);
        }
    }
    println!("{}", "=".repeat(60));
}
