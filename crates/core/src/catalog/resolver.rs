//! Read-only queries over the catalog filtered by tool availability.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::converter::ToolAvailability;

use super::rules::Catalog;
use super::types::{Category, ConversionRule};

/// A `(from, to)` pair as exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionPair {
    pub from: &'static str,
    pub to: &'static str,
}

/// Resolves requested conversions against the catalog, hiding rules whose
/// backend tool is unavailable in this process.
///
/// Both inputs are immutable after startup, so every query observes the
/// same snapshot for the lifetime of the process.
pub struct Resolver {
    catalog: Arc<Catalog>,
    availability: Arc<ToolAvailability>,
}

impl Resolver {
    pub fn new(catalog: Arc<Catalog>, availability: Arc<ToolAvailability>) -> Self {
        Self {
            catalog,
            availability,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn availability(&self) -> &ToolAvailability {
        &self.availability
    }

    /// Finds the rule for `(from, to)`, case-insensitively.
    ///
    /// A rule backed by an unavailable tool resolves to `None`: at this
    /// layer "tool missing" is indistinguishable from "no such
    /// conversion". The dispatcher reports a distinct error if
    /// availability disagrees at execution time.
    pub fn resolve(&self, from: &str, to: &str) -> Option<&ConversionRule> {
        self.catalog
            .find_rule(from, to)
            .filter(|rule| self.availability.is_available(rule.tool))
    }

    /// All available conversions, grouped by category.
    pub fn available_conversions(&self) -> BTreeMap<Category, Vec<ConversionPair>> {
        let mut grouped: BTreeMap<Category, Vec<ConversionPair>> = BTreeMap::new();
        for rule in self.available_rules() {
            grouped.entry(rule.category).or_default().push(ConversionPair {
                from: rule.from,
                to: rule.to,
            });
        }
        grouped
    }

    /// Distinct source formats across available rules, in catalog order.
    pub fn supported_input_formats(&self) -> Vec<&'static str> {
        let mut formats = Vec::new();
        for rule in self.available_rules() {
            if !formats.contains(&rule.from) {
                formats.push(rule.from);
            }
        }
        formats
    }

    /// Distinct target formats reachable from `input_format` across
    /// available rules. Empty for an unknown input format.
    pub fn possible_output_formats(&self, input_format: &str) -> Vec<&'static str> {
        let mut formats = Vec::new();
        for rule in self.available_rules() {
            if rule.from.eq_ignore_ascii_case(input_format) && !formats.contains(&rule.to) {
                formats.push(rule.to);
            }
        }
        formats
    }

    /// Category of the `(from, to)` pair, derived from the raw catalog.
    ///
    /// Availability is deliberately ignored here: this is a reporting
    /// lookup for a conversion that already executed.
    pub fn category_of(&self, from: &str, to: &str) -> Option<Category> {
        self.catalog.find_rule(from, to).map(|r| r.category)
    }

    fn available_rules(&self) -> impl Iterator<Item = &ConversionRule> {
        self.catalog
            .all_rules()
            .iter()
            .filter(|rule| self.availability.is_available(rule.tool))
    }
}
