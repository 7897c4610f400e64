//! Role-tagged column lookup.
//!
//! The five required value columns are fixed-position; every optional
//! column is located by its role tag instead of its index, so hosts can
//! reorder them freely. The scan runs once per dataset update and the rest
//! of the pipeline works off the typed table it produces.

use crate::table::{DataTable, ValueColumn};

/// Fixed positions of the required value columns.
pub const COL_FROM_LAT: usize = 0;
pub const COL_FROM_LNG: usize = 1;
pub const COL_TO_LAT: usize = 2;
pub const COL_TO_LNG: usize = 3;
pub const COL_PROGRESS: usize = 4;

/// Semantic tags a host can attach to optional value columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Tooltips,
    StateValue,
    StateValueMin1,
    StateValueMax1,
    StateValueMin2,
    StateValueMax2,
    StateValueMin3,
    StateValueMax3,
    ThicknessValue,
    ThicknessMin,
    ThicknessMax,
}

impl Role {
    pub fn tag(self) -> &'static str {
        match self {
            Role::Tooltips => "tooltips",
            Role::StateValue => "stateValue",
            Role::StateValueMin1 => "stateValueMin1",
            Role::StateValueMax1 => "stateValueMax1",
            Role::StateValueMin2 => "stateValueMin2",
            Role::StateValueMax2 => "stateValueMax2",
            Role::StateValueMin3 => "stateValueMin3",
            Role::StateValueMax3 => "stateValueMax3",
            Role::ThicknessValue => "thicknessValue",
            Role::ThicknessMin => "thicknessMin",
            Role::ThicknessMax => "thicknessMax",
        }
    }
}

const STATE_MIN_ROLES: [Role; 3] = [Role::StateValueMin1, Role::StateValueMin2, Role::StateValueMin3];
const STATE_MAX_ROLES: [Role; 3] = [Role::StateValueMax1, Role::StateValueMax2, Role::StateValueMax3];

/// Typed role -> column table, built once per dataset update.
///
/// Later columns win when a role is tagged twice, matching a linear scan.
#[derive(Debug)]
pub struct RoleColumns<'a> {
    pub tooltips: Vec<&'a ValueColumn>,
    pub state_value: Option<&'a ValueColumn>,
    pub state_min: [Option<&'a ValueColumn>; 3],
    pub state_max: [Option<&'a ValueColumn>; 3],
    pub thickness_value: Option<&'a ValueColumn>,
    pub thickness_min: Option<&'a ValueColumn>,
    pub thickness_max: Option<&'a ValueColumn>,
}

impl<'a> RoleColumns<'a> {
    pub fn scan(table: &'a DataTable) -> Self {
        let mut out = RoleColumns {
            tooltips: Vec::new(),
            state_value: None,
            state_min: [None; 3],
            state_max: [None; 3],
            thickness_value: None,
            thickness_min: None,
            thickness_max: None,
        };

        for column in &table.values {
            if column.source.has_role(Role::Tooltips.tag()) {
                out.tooltips.push(column);
            }
            if column.source.has_role(Role::StateValue.tag()) {
                out.state_value = Some(column);
            }
            for band in 0..3 {
                if column.source.has_role(STATE_MIN_ROLES[band].tag()) {
                    out.state_min[band] = Some(column);
                }
                if column.source.has_role(STATE_MAX_ROLES[band].tag()) {
                    out.state_max[band] = Some(column);
                }
            }
            if column.source.has_role(Role::ThicknessValue.tag()) {
                out.thickness_value = Some(column);
            }
            if column.source.has_role(Role::ThicknessMin.tag()) {
                out.thickness_min = Some(column);
            }
            if column.source.has_role(Role::ThicknessMax.tag()) {
                out.thickness_max = Some(column);
            }
        }

        out
    }
}
