//! Variable Catalog Module
//! The fixed, typed set of explorable variables. Replaces runtime
//! column-name lookups with an enum so query dispatch is exhaustive.

use std::fmt;
use std::str::FromStr;

use crate::data::schema::{cols, DAY_LEVELS, MONTH_LEVELS};
use crate::query::engine::QueryError;

/// Declared treatment of a variable at query time. Decided here, never by
/// inspecting values: `Number_of_Vehicles` is stored as a string in the
/// merged table but is still a numeric variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Categorical,
    Numeric,
}

/// Which choice list a selector draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Primary,
    Secondary,
    Summary,
}

/// One explorable variable of the merged table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    State,
    Month,
    Day,
    Region,
    Route,
    Weather,
    Distraction,
    Drug,
    NumberOfVehicles,
}

impl Variable {
    pub const PRIMARY: [Variable; 5] = [
        Variable::State,
        Variable::Month,
        Variable::Day,
        Variable::Region,
        Variable::Route,
    ];

    pub const SECONDARY: [Variable; 4] = [
        Variable::Weather,
        Variable::Distraction,
        Variable::Drug,
        Variable::NumberOfVehicles,
    ];

    /// Fixed choice list for a selector role. Summary shares the primary list.
    pub fn choices(role: Role) -> &'static [Variable] {
        match role {
            Role::Primary | Role::Summary => &Self::PRIMARY,
            Role::Secondary => &Self::SECONDARY,
        }
    }

    /// Column name in the merged table.
    pub fn column(&self) -> &'static str {
        match self {
            Variable::State => cols::STATE,
            Variable::Month => cols::MONTH,
            Variable::Day => cols::DAY,
            Variable::Region => cols::REGION,
            Variable::Route => cols::ROUTE,
            Variable::Weather => cols::WEATHER,
            Variable::Distraction => cols::DISTRACTION,
            Variable::Drug => cols::DRUG,
            Variable::NumberOfVehicles => cols::VEHICLES,
        }
    }

    /// Display label, also the accepted spelling for `FromStr`.
    pub fn label(&self) -> &'static str {
        self.column()
    }

    pub fn kind(&self) -> VarKind {
        match self {
            Variable::NumberOfVehicles => VarKind::Numeric,
            _ => VarKind::Categorical,
        }
    }

    /// Fixed presentation order for the variable's levels, where one
    /// exists. Everything else presents in observed/sorted order.
    pub fn level_order(&self) -> Option<&'static [&'static str]> {
        match self {
            Variable::Month => Some(&MONTH_LEVELS),
            Variable::Day => Some(&DAY_LEVELS),
            _ => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Variable {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "State" => Ok(Variable::State),
            "Month" => Ok(Variable::Month),
            "Day" => Ok(Variable::Day),
            "Region" => Ok(Variable::Region),
            "Route" => Ok(Variable::Route),
            "Weather" => Ok(Variable::Weather),
            "Distraction" => Ok(Variable::Distraction),
            "Drug" => Ok(Variable::Drug),
            "Number_of_Vehicles" => Ok(Variable::NumberOfVehicles),
            other => Err(QueryError::UnknownVariable(other.to_string())),
        }
    }
}
