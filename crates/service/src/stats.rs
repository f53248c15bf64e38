use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Service, Tool};

/// Summary figures for the stock page, report and spreadsheet KPIs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total_tools: usize,
    pub low_stock: usize,
    pub in_stock: usize,
    pub total_quantity: i64,
    /// total_quantity / total_tools rounded to the nearest unit; 0 when empty.
    pub average_quantity: i64,
    /// Distinct non-empty locations.
    pub locations: usize,
}

impl StockSummary {
    pub fn from_tools(tools: &[Tool]) -> Self {
        let total_tools = tools.len();
        let low_stock = tools.iter().filter(|t| t.is_low_stock()).count();
        let total_quantity: i64 = tools.iter().map(|t| t.quantity).sum();
        let average_quantity = if total_tools == 0 {
            0
        } else {
            (total_quantity as f64 / total_tools as f64).round() as i64
        };
        let locations = tools
            .iter()
            .filter_map(|t| t.location.as_deref())
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<HashSet<_>>()
            .len();
        Self {
            total_tools,
            low_stock,
            in_stock: total_tools - low_stock,
            total_quantity,
            average_quantity,
            locations,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub total: usize,
    pub public: usize,
    pub private: usize,
}

impl ServiceSummary {
    pub fn from_services(services: &[Service]) -> Self {
        let public = services.iter().filter(|s| s.is_public).count();
        Self { total: services.len(), public, private: services.len() - public }
    }
}
