//! Dataset to direction ingestion.
//!
//! One [`Direction`] per usable row; failures are local and silent. A
//! malformed dataset shape yields no directions at all, a bad row is
//! skipped individually, and nothing is ever surfaced as an error to the
//! end user.

use foundation::math::FromToLatLng;
use foundation::math::antimeridian;
use scene::graph::TooltipItem;

use crate::formatter::ValueFormatter;
use crate::roles::{
    COL_FROM_LAT, COL_FROM_LNG, COL_PROGRESS, COL_TO_LAT, COL_TO_LNG, Role, RoleColumns,
};
use crate::table::DataTable;

/// Category column positions for identity keys.
pub const CAT_MARKET: usize = 0;
pub const CAT_FROM_CODE: usize = 1;
pub const CAT_TO_CODE: usize = 2;

/// Optional state band bounds for one direction.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct StateBand {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One resolved route input row. Created fresh per dataset update and
/// discarded once the graph is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Direction {
    pub index: usize,
    pub market: String,
    pub from_code: String,
    pub to_code: String,
    pub latlng: FromToLatLng,
    /// Animation progress along the curve, clamped to [0, 1].
    pub progress: f64,
    pub state_value: Option<f64>,
    pub state_bands: [StateBand; 3],
    pub thickness_value: Option<f64>,
    pub thickness_min: Option<f64>,
    pub thickness_max: Option<f64>,
    pub tooltip: Vec<TooltipItem>,
}

/// Whole-dataset shape check.
///
/// All three identity columns and the five positional value columns must
/// exist, and the last positional slot must not have been consumed by a
/// tooltips-tagged column (which happens when a required field is unbound
/// and an optional one slid into its place).
pub fn table_shape_is_valid(table: &DataTable) -> bool {
    table.categories.len() > CAT_TO_CODE
        && table.values.len() > COL_PROGRESS
        && !table.values[COL_PROGRESS].source.has_role(Role::Tooltips.tag())
}

/// Builds one `Direction` per usable row, in row order.
pub fn parse_directions<F: ValueFormatter>(table: &DataTable, formatter: &F) -> Vec<Direction> {
    if !table_shape_is_valid(table) {
        return Vec::new();
    }

    let roles = RoleColumns::scan(table);
    let mut directions = Vec::new();

    for index in 0..table.row_count() {
        let market = table.category_text(CAT_MARKET, index);
        let from_code = table.category_text(CAT_FROM_CODE, index);
        let to_code = table.category_text(CAT_TO_CODE, index);
        if market.is_empty() || from_code.is_empty() || to_code.is_empty() {
            continue;
        }

        let Some(latlng) = antimeridian::resolve(
            table.values[COL_FROM_LAT].number_at(index),
            table.values[COL_FROM_LNG].number_at(index),
            table.values[COL_TO_LAT].number_at(index),
            table.values[COL_TO_LNG].number_at(index),
        ) else {
            continue;
        };

        let progress = table.values[COL_PROGRESS]
            .number_at(index)
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);

        let tooltip = roles
            .tooltips
            .iter()
            .map(|column| TooltipItem {
                label: column.source.display_name.clone(),
                value: formatter.format(column.value_at(index), column.source.format.as_deref()),
            })
            .collect();

        let state_bands = std::array::from_fn(|band| StateBand {
            min: roles.state_min[band].and_then(|c| c.number_at(index)),
            max: roles.state_max[band].and_then(|c| c.number_at(index)),
        });

        directions.push(Direction {
            index,
            market,
            from_code,
            to_code,
            latlng,
            progress,
            state_value: roles.state_value.and_then(|c| c.number_at(index)),
            state_bands,
            thickness_value: roles.thickness_value.and_then(|c| c.number_at(index)),
            thickness_min: roles.thickness_min.and_then(|c| c.number_at(index)),
            thickness_max: roles.thickness_max.and_then(|c| c.number_at(index)),
            tooltip,
        });
    }

    directions
}
