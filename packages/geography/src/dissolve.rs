//! Coarser-level geometry synthesis.
//!
//! When a level-1 or level-2 boundary source is missing, its units are
//! reconstructed by geometrically unioning the child units' polygons,
//! grouped by parent pcode and name.

use std::collections::BTreeMap;

use geo::BooleanOps;

use conflict_map_geography_models::{AdminLevel, AdminUnit};

use crate::standardize::BoundaryUnit;

/// Builds parent-level units by dissolving child geometries.
///
/// Children without a recorded parent pcode cannot be grouped and are
/// skipped with a warning. The resulting units inherit the children's
/// province ancestry (for districts built from LLGs) or become their own
/// province ancestor (for provinces built from districts).
#[must_use]
pub fn dissolve_to_parent(children: &[BoundaryUnit]) -> Vec<BoundaryUnit> {
    let Some(child_level) = children.first().map(|child| child.unit.level) else {
        return Vec::new();
    };
    let Some(parent_level) = child_level.parent() else {
        log::warn!("Cannot dissolve province units to a coarser level");
        return Vec::new();
    };

    struct Group<'a> {
        name: String,
        province_pcode: Option<String>,
        province_name: Option<String>,
        members: Vec<&'a BoundaryUnit>,
    }

    let mut groups: BTreeMap<String, Group<'_>> = BTreeMap::new();
    let mut skipped = 0_usize;

    for child in children {
        let Some(parent_pcode) = child.unit.parent_pcode.clone() else {
            skipped += 1;
            continue;
        };
        let group = groups.entry(parent_pcode.clone()).or_insert_with(|| Group {
            name: child
                .unit
                .parent_name
                .clone()
                .unwrap_or_else(|| parent_pcode.clone()),
            province_pcode: child.unit.province_pcode.clone(),
            province_name: child.unit.province_name.clone(),
            members: Vec::new(),
        });
        group.members.push(child);
    }

    if skipped > 0 {
        log::warn!("Dissolve skipped {skipped} {child_level} units with no parent pcode");
    }

    let mut parents = Vec::with_capacity(groups.len());
    for (pcode, group) in groups {
        let mut polygon = group.members[0].polygon.clone();
        for member in &group.members[1..] {
            polygon = polygon.union(&member.polygon);
        }

        let (province_pcode, province_name) = if parent_level == AdminLevel::Province {
            (Some(pcode.clone()), Some(group.name.clone()))
        } else {
            (group.province_pcode, group.province_name)
        };

        parents.push(BoundaryUnit {
            unit: AdminUnit {
                level: parent_level,
                pcode,
                name: group.name,
                parent_pcode: if parent_level == AdminLevel::Province {
                    None
                } else {
                    province_pcode.clone()
                },
                parent_name: if parent_level == AdminLevel::Province {
                    None
                } else {
                    province_name.clone()
                },
                province_pcode,
                province_name,
                synthesized_pcode: false,
            },
            polygon,
        });
    }

    log::info!(
        "Dissolved {} {child_level} units into {} {parent_level} units",
        children.len(),
        parents.len()
    );
    parents
}
