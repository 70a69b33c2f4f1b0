// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-series point and its InfluxDB line-protocol rendering.
//!
//! Line format: `measurement,tag=value field=value timestamp_ns`.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

/// One timestamped record in a measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    /// Tags, kept sorted by key as InfluxDB recommends.
    pub tags: BTreeMap<String, String>,
    /// Fields in insertion order.
    pub fields: Vec<(String, FieldValue)>,
    pub timestamp: DateTime<Utc>,
}

impl Point {
    pub fn new(measurement: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: Vec::new(),
            timestamp,
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Add a field. A repeated key replaces the earlier value.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    /// Look up a field by key.
    pub fn get_field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Render this point as one line of line protocol with a nanosecond
    /// timestamp.
    pub fn to_line(&self) -> Result<String, AppError> {
        if self.fields.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Point in '{}' has no fields",
                self.measurement
            )));
        }
        let nanos = self.timestamp.timestamp_nanos_opt().ok_or_else(|| {
            AppError::BadRequest(format!(
                "Timestamp {} out of nanosecond range",
                self.timestamp
            ))
        })?;

        let mut line = escape(&self.measurement, &[',', ' ']);
        for (key, value) in &self.tags {
            // Empty tag values are not allowed by the line protocol.
            if value.is_empty() {
                continue;
            }
            let _ = write!(
                line,
                ",{}={}",
                escape(key, &[',', '=', ' ']),
                escape(value, &[',', '=', ' '])
            );
        }

        for (i, (key, value)) in self.fields.iter().enumerate() {
            line.push(if i == 0 { ' ' } else { ',' });
            line.push_str(&escape(key, &[',', '=', ' ']));
            line.push('=');
            match value {
                FieldValue::Integer(n) => {
                    let _ = write!(line, "{n}i");
                }
                FieldValue::Float(f) => {
                    if !f.is_finite() {
                        return Err(AppError::BadRequest(format!(
                            "Field '{key}' has non-finite value {f}"
                        )));
                    }
                    let _ = write!(line, "{f}");
                }
                FieldValue::Bool(b) => line.push_str(if *b { "true" } else { "false" }),
                FieldValue::String(s) => {
                    line.push('"');
                    line.push_str(&escape(s, &['"', '\\']));
                    line.push('"');
                }
            }
        }

        let _ = write!(line, " {nanos}");
        Ok(line)
    }
}

/// Render points as a newline-separated line-protocol body.
pub fn to_line_protocol(points: &[Point]) -> Result<String, AppError> {
    let lines = points
        .iter()
        .map(Point::to_line)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
