use anyhow::Result;
use std::collections::HashMap;

use crate::data::UserRecord;
use crate::registry::{PresentMember, UserRegistry};

const NAME_WIDTH: usize = 20;
const POINTS_WIDTH: usize = 6;

/// Renders the points table for the given members, highest score first.
///
/// Members without a registry record are skipped. Ties keep the order in which
/// members were passed in.
pub async fn render(registry: &UserRegistry, members: &[PresentMember]) -> Result<String> {
    let mut records: HashMap<String, UserRecord> = registry
        .list_all()
        .await?
        .into_iter()
        .map(|record| (record.user_id.clone(), record))
        .collect();

    // Removing as we go drops members listed by more than one guild.
    let mut rows: Vec<UserRecord> = members
        .iter()
        .filter_map(|member| records.remove(&member.user_id))
        .collect();

    rows.sort_by(|a, b| b.points.cmp(&a.points));
    Ok(format_table(&rows))
}

pub fn format_table(rows: &[UserRecord]) -> String {
    let mut table = format!(
        "`{:<name$} {:>points$}`\n",
        "User",
        "Points",
        name = NAME_WIDTH,
        points = POINTS_WIDTH
    );
    for row in rows {
        table.push_str(&format!(
            "`{:<name$}|{:>points$}`\n",
            row.display_name,
            row.points,
            name = NAME_WIDTH,
            points = POINTS_WIDTH
        ));
    }
    table
}
