//! In-memory filtering and sorting of fetched collections.
//!
//! All functions are pure: they take the full collection plus criteria and
//! return a new ordered sequence. Sorts are stable.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::domain::{Service, Tool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockFilter {
    #[default]
    All,
    /// quantity <= min_quantity
    Low,
    /// quantity > min_quantity
    Ok,
}

impl StockFilter {
    /// Unknown values fall back to `All`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "ok" => Self::Ok,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Low => "low",
            Self::Ok => "ok",
        }
    }

    pub fn matches(&self, tool: &Tool) -> bool {
        match self {
            Self::All => true,
            Self::Low => tool.is_low_stock(),
            Self::Ok => !tool.is_low_stock(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolSort {
    #[default]
    Name,
    /// Highest quantity first.
    Quantity,
    Location,
}

impl ToolSort {
    /// Unknown values fall back to `Name`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "quantity" => Self::Quantity,
            "location" => Self::Location,
            _ => Self::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Quantity => "quantity",
            Self::Location => "location",
        }
    }
}

/// Criteria for the stock list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolQuery {
    pub term: String,
    pub status: StockFilter,
    pub sort: ToolSort,
}

impl ToolQuery {
    /// Build from raw query-string values; missing or unknown values use defaults.
    pub fn from_params(term: Option<&str>, status: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            term: term.unwrap_or_default().to_string(),
            status: status.map(StockFilter::parse).unwrap_or_default(),
            sort: sort.map(ToolSort::parse).unwrap_or_default(),
        }
    }
}

/// Case-insensitive substring match over optional fields. Only the empty
/// term matches everything; whitespace is part of the needle.
pub fn matches_term(term: &str, fields: &[Option<&str>]) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn tool_matches(tool: &Tool, term: &str) -> bool {
    matches_term(term, &[Some(&tool.name), tool.description.as_deref(), tool.location.as_deref()])
}

pub fn service_matches(service: &Service, term: &str) -> bool {
    matches_term(term, &[Some(&service.name), service.description.as_deref()])
}

pub fn filter_tools(tools: &[Tool], query: &ToolQuery) -> Vec<Tool> {
    tools
        .iter()
        .filter(|t| tool_matches(t, &query.term) && query.status.matches(t))
        .cloned()
        .collect()
}

pub fn sort_tools(tools: &mut [Tool], sort: ToolSort) {
    match sort {
        ToolSort::Name => tools.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        ToolSort::Quantity => tools.sort_by(|a, b| b.quantity.cmp(&a.quantity)),
        ToolSort::Location => tools.sort_by(|a, b| {
            locale_cmp(a.location.as_deref().unwrap_or(""), b.location.as_deref().unwrap_or(""))
        }),
    }
}

/// Filter then sort.
pub fn apply_tool_query(tools: &[Tool], query: &ToolQuery) -> Vec<Tool> {
    let mut out = filter_tools(tools, query);
    sort_tools(&mut out, query.sort);
    out
}

pub fn search_services(services: &[Service], term: &str) -> Vec<Service> {
    services.iter().filter(|s| service_matches(s, term)).cloned().collect()
}

/// Multi-level collation close to what a browser's `localeCompare` gives for
/// Latin text: base letters first, then accents, then case (lowercase first).
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(&case_key(b)))
}

fn base_key(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

fn accent_key(s: &str) -> String {
    s.nfd().flat_map(char::to_lowercase).collect()
}

fn case_key(s: &str) -> Vec<bool> {
    s.chars().filter(|c| c.is_alphabetic()).map(char::is_uppercase).collect()
}
