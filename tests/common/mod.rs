#![allow(dead_code)]
//! Shared input fixtures for the integration tests

use energy_projection_engine::relation::{DataType, Field, Relation, Value};
use energy_projection_engine::{MemoryStore, TableName};

pub struct Intensity {
    pub geography: &'static str,
    pub sector: &'static str,
    pub model_type: &'static str,
    pub intercept: Option<f64>,
    pub slope: Option<f64>,
}

pub fn energy_intensity(groups: &[Intensity]) -> Relation {
    let mut rows = Vec::new();
    for g in groups {
        for (parameter, value) in [("intercept", g.intercept), ("slope", g.slope)] {
            if let Some(v) = value {
                rows.push(vec![
                    g.geography.into(),
                    g.sector.into(),
                    parameter.into(),
                    g.model_type.into(),
                    "TJ".into(),
                    v.into(),
                ]);
            }
        }
    }
    Relation::from_rows(
        vec![
            Field::new("geography", DataType::Utf8),
            Field::new("sector", DataType::Utf8),
            Field::new("parameter", DataType::Utf8),
            Field::new("model_type", DataType::Utf8),
            Field::new("unit", DataType::Utf8),
            Field::new("value", DataType::Float64),
        ],
        rows,
    )
    .unwrap()
}

/// (geography, year, value) driver table such as GDP, HDI or population
pub fn driver(rows: &[(&str, i64, f64)]) -> Relation {
    Relation::from_rows(
        vec![
            Field::new("geography", DataType::Utf8),
            Field::new("year", DataType::Int64),
            Field::new("value", DataType::Float64),
        ],
        rows.iter()
            .map(|(g, y, v)| vec![(*g).into(), (*y).into(), (*v).into()])
            .collect(),
    )
    .unwrap()
}

/// (geography, sector, hour, value) load profile table
pub fn load_profiles(rows: &[(&str, &str, i64, f64)]) -> Relation {
    Relation::from_rows(
        vec![
            Field::new("geography", DataType::Utf8),
            Field::new("sector", DataType::Utf8),
            Field::new("hour", DataType::Int64),
            Field::new("value", DataType::Float64),
        ],
        rows.iter()
            .map(|(g, s, h, v)| vec![(*g).into(), (*s).into(), (*h).into(), (*v).into()])
            .collect(),
    )
    .unwrap()
}

pub fn standard_intensity() -> Vec<Intensity> {
    vec![
        Intensity { geography: "country_1", sector: "commercial", model_type: "exp", intercept: Some(0.1), slope: Some(0.2) },
        Intensity { geography: "country_1", sector: "industrial", model_type: "lin", intercept: Some(0.1), slope: Some(0.2) },
        Intensity { geography: "country_1", sector: "transportation", model_type: "lin", intercept: Some(0.5), slope: Some(0.5) },
        Intensity { geography: "country_1", sector: "residential", model_type: "exp", intercept: Some(0.01), slope: Some(0.02) },
        Intensity { geography: "country_1", sector: "agriculture", model_type: "lin", intercept: Some(1.0), slope: Some(1.0) },
        Intensity { geography: "country_2", sector: "commercial", model_type: "exp", intercept: Some(0.0), slope: Some(0.0) },
    ]
}

pub fn standard_profiles() -> Relation {
    load_profiles(&[
        ("country_1", "commercial", 0, 0.05),
        ("country_1", "commercial", 1, 0.95),
        ("country_1", "industrial", 0, 0.5),
        ("country_1", "industrial", 1, 0.5),
        ("country_1", "transportation", 0, 0.4),
        ("country_1", "transportation", 1, 0.6),
        ("country_1", "residential", 0, 0.3),
        ("country_1", "residential", 1, 0.7),
        ("country_1", "agriculture", 0, 1.0),
        ("country_2", "commercial", 0, 1.0),
    ])
}

/// Store holding the default input table names
pub fn store_with(intensity: &[Intensity]) -> MemoryStore {
    let store = MemoryStore::new();
    store.insert("energy_intensity", energy_intensity(intensity)).unwrap();
    store
        .insert("gdp", driver(&[("country_1", 2025, 1000.0), ("country_1", 2030, 2000.0), ("country_2", 2025, 5.0)]))
        .unwrap();
    store
        .insert("hdi", driver(&[("country_1", 2025, 0.7), ("country_1", 2030, 0.8)]))
        .unwrap();
    store
        .insert("population", driver(&[("country_1", 2025, 100.0), ("country_1", 2030, 110.0)]))
        .unwrap();
    store.insert("load_profiles", standard_profiles()).unwrap();
    store
}

pub fn standard_store() -> MemoryStore {
    store_with(&standard_intensity())
}

pub fn table(name: &str) -> TableName {
    TableName::new(name).unwrap()
}

/// Value of the output row with the given key
pub fn value_at(rel: &Relation, hour: i64, year: i64, sector: &str) -> Value {
    let names = rel.column_names();
    let idx = |c: &str| names.iter().position(|n| *n == c).unwrap();
    let (h, y, s, v) = (idx("hour"), idx("year"), idx("sector"), idx("value"));
    let matches: Vec<&Vec<Value>> = rel
        .rows()
        .iter()
        .filter(|r| r[h] == Value::from(hour) && r[y] == Value::from(year) && r[s] == Value::from(sector))
        .collect();
    assert_eq!(matches.len(), 1, "expected one row for ({hour}, {year}, {sector})");
    matches[0][v].clone()
}

pub fn approx_eq(actual: &Value, expected: f64) -> bool {
    actual
        .as_f64()
        .map(|a| (a - expected).abs() < 1e-9 * expected.abs().max(1.0))
        .unwrap_or(false)
}
