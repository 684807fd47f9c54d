// src/models/detail_group.rs
// DOCUMENTATION: Display groups derived from POI details
// PURPOSE: Collapse flat detail records into titled, positioned groups

use serde::Serialize;
use std::collections::BTreeMap;

use super::{Detail, DetailType};

/// Position assumed for details without one
pub const UNPOSITIONED: i32 = 9999;

/// Titled group of detail values ready for display
/// DOCUMENTATION: Derived on demand, never sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoiDetailGroup {
    pub title: String,
    pub values: Vec<String>,
    /// Position of the lowest-positioned detail of the group
    pub position: i32,
    pub detail_type: DetailType,
}

impl PoiDetailGroup {
    /// Group details by title
    /// DOCUMENTATION: Details without a title are skipped. Inside a group the
    /// details are ordered by position (missing position sorts as 9999) and the
    /// first one decides the group's position and type; a group whose first
    /// detail has no position or no type is dropped. Groups come back ordered by position
    /// (missing last) and then by title.
    pub fn group(details: &[Option<Detail>]) -> Vec<PoiDetailGroup> {
        let mut by_title: BTreeMap<&str, Vec<&Detail>> = BTreeMap::new();
        for detail in details.iter().flatten() {
            if let Some(title) = detail.title.as_deref() {
                by_title.entry(title).or_default().push(detail);
            }
        }

        let mut groups: Vec<PoiDetailGroup> = by_title
            .into_iter()
            .filter_map(|(title, mut members)| {
                members.sort_by_key(|d| d.position.unwrap_or(UNPOSITIONED));
                let first = members.first()?;
                let position = first.position?;
                let detail_type = first.detail_type?;
                Some(PoiDetailGroup {
                    title: title.to_string(),
                    position,
                    detail_type,
                    values: members.iter().map(|d| display_value(d)).collect(),
                })
            })
            .collect();

        groups.sort_by_key(|g| g.position);
        groups
    }
}

fn display_value(detail: &Detail) -> String {
    let value = detail.value.as_deref().unwrap_or_default();
    match detail.subtitle.as_deref() {
        Some(subtitle) => format!("{}: {}", subtitle, value),
        None => value.to_string(),
    }
}
