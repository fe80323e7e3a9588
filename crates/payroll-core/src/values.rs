//! # Value Types Shared by Regulation Objects
//!
//! Loosely-typed attribute dictionaries and localization tables are explicit
//! map types here, so the derivation engine can merge them with a declared
//! strategy instead of copying opaque blobs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form attributes attached to a regulation object.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Culture code → translated text (e.g. `"de-CH" → "Ferien"`).
pub type Localizations = BTreeMap<String, String>;

/// Data type of a case field, collector, wage type or report parameter value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    String,
    Boolean,
    Integer,
    NumericBoolean,
    Decimal,
    DateTime,
    Date,
    Weekday,
    Month,
    Year,
    Money,
    Percent,
    Hour,
    Day,
    Distance,
    WebResource,
    Document,
    None,
}

/// Scope of a case field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueScope {
    /// Value applies to the case it was entered for.
    Local,
    /// Value is shared across divisions.
    Global,
}

/// How a case field value relates to time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeType {
    /// A single, time-independent value.
    #[default]
    Timeless,
    /// Occurs at one moment.
    Moment,
    /// Valid for a period, not scaled.
    Period,
    /// Valid for a period, scaled to the payroll period.
    CalendarPeriod,
    /// Scaled by calendar days.
    ScaledPeriod,
}

/// Scope of a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    /// Applies to all tenants.
    Global,
    /// Applies per country.
    National,
    /// Applies per company.
    Company,
    /// Applies per employee.
    #[default]
    Employee,
}

/// Cancellation behavior of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseCancellationType {
    /// The case cannot be cancelled.
    None,
    /// The case can be cancelled.
    Case,
}

/// Aggregation applied by a collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectMode {
    #[default]
    Summary,
    Minimum,
    Maximum,
    Average,
    Range,
    Count,
}

/// Script hook points a script provides functions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionType {
    CaseAvailable,
    CaseBuild,
    CaseValidate,
    CaseRelationBuild,
    CaseRelationValidate,
    CollectorStart,
    CollectorApply,
    CollectorEnd,
    WageTypeValue,
    WageTypeResult,
    ReportBuild,
    ReportStart,
    ReportEnd,
}
