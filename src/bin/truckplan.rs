use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use truckplan::fixtures;
use truckplan::plan::calendar::{Calendar, MapCalendar, NoCalendar};
use truckplan::{plan, PlanInput};

/// Builds a multi-day truck-loading plan from CSV fixtures and prints it as JSON.
#[derive(Debug, Parser)]
struct Args {
    /// Directory containing containers.csv, trucks.csv, products.csv, orders.csv.
    #[arg(long)]
    data_dir: PathBuf,

    /// Optional CSV with `date,is_working_day` columns. Without it every day works.
    #[arg(long)]
    calendar_csv: Option<PathBuf>,

    #[arg(long, value_parser = parse_date)]
    start_date: NaiveDate,

    #[arg(long, default_value_t = 5)]
    days: u32,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let containers = fixtures::load_containers(&args.data_dir.join("containers.csv"))?;
    let trucks = fixtures::load_trucks(&args.data_dir.join("trucks.csv"))?;
    let products = fixtures::load_products(&args.data_dir.join("products.csv"))?;
    let orders = fixtures::load_orders(&args.data_dir.join("orders.csv"))?;

    let calendar: MapCalendar = match &args.calendar_csv {
        Some(path) => fixtures::load_calendar(path)?,
        None => MapCalendar::default(),
    };
    let calendar: &dyn Calendar = if args.calendar_csv.is_some() {
        &calendar
    } else {
        &NoCalendar
    };

    let result = plan(PlanInput {
        start_date: args.start_date,
        days: args.days,
        orders: &orders,
        products: &products,
        containers: &containers,
        trucks: &trucks,
        calendar,
    });

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
