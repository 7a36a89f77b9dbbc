//! CSV-based loaders for demo data and tests. Not part of the planning
//! core: production ingestion is out of scope (spec.md §3 Non-goals).

use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{
    Container, ContainerMap, Map as _, Order, Product, ProductId, ProductMap, Truck, TruckId,
    TruckMap,
};
use crate::plan::calendar::MapCalendar;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("reading {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("parsing time {value:?} in {path}")]
    BadTime { path: String, value: String },
}

fn read_rows<T>(path: &Path) -> anyhow::Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| FixtureError::Csv {
            path: path.display().to_string(),
            source,
        })?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.map_err(|source| FixtureError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_time(path: &Path, value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        FixtureError::BadTime {
            path: path.display().to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

fn parse_id_list(value: &str) -> Vec<TruckId> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i32>().ok())
        .map(TruckId)
        .collect()
}

fn parse_code_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_containers(path: &Path) -> anyhow::Result<ContainerMap> {
    Ok(read_rows::<Container>(path)?.into_iter().map(|c| (c.id, c)).collect())
}

pub fn load_orders(path: &Path) -> anyhow::Result<Vec<Order>> {
    read_rows::<Order>(path)
}

#[derive(Debug, Deserialize)]
struct TruckRow {
    id: i32,
    name: String,
    width: i64,
    depth: i64,
    height: i64,
    max_weight: i64,
    default_use: bool,
    arrival_day_offset: i64,
    #[serde(default)]
    priority_products: String,
    #[serde(default)]
    departure_time: String,
    #[serde(default)]
    arrival_time: String,
}

pub fn load_trucks(path: &Path) -> anyhow::Result<TruckMap> {
    let rows = read_rows::<TruckRow>(path)?;
    let mut trucks = TruckMap::default();
    for row in rows {
        let departure_time = (!row.departure_time.is_empty())
            .then(|| parse_time(path, &row.departure_time))
            .transpose()?;
        let arrival_time = (!row.arrival_time.is_empty())
            .then(|| parse_time(path, &row.arrival_time))
            .transpose()?;
        let truck = Truck {
            id: TruckId(row.id),
            name: row.name,
            width: row.width,
            depth: row.depth,
            height: row.height,
            max_weight: row.max_weight,
            default_use: row.default_use,
            arrival_day_offset: row.arrival_day_offset,
            priority_products: parse_code_list(&row.priority_products),
            departure_time,
            arrival_time,
        };
        trucks.insert(truck.id, truck);
    }
    Ok(trucks)
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    id: i32,
    product_code: String,
    capacity: u32,
    container_id: i32,
    #[serde(default)]
    used_truck_ids: String,
}

pub fn load_products(path: &Path) -> anyhow::Result<ProductMap> {
    let rows = read_rows::<ProductRow>(path)?;
    let mut products = ProductMap::default();
    for row in rows {
        let product = Product {
            id: ProductId(row.id),
            product_code: row.product_code,
            capacity: row.capacity,
            container_id: row.container_id.into(),
            used_truck_ids: parse_id_list(&row.used_truck_ids),
        };
        products.insert(product.id, product);
    }
    Ok(products)
}

#[derive(Debug, Deserialize)]
struct CalendarRow {
    date: chrono::NaiveDate,
    is_working_day: bool,
}

pub fn load_calendar(path: &Path) -> anyhow::Result<MapCalendar> {
    let rows = read_rows::<CalendarRow>(path)?;
    Ok(MapCalendar(
        rows.into_iter().map(|r| (r.date, r.is_working_day)).collect(),
    ))
}
