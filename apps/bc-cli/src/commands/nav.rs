// nav.rs - `basecamp nav`: print the sidebar as it renders for a route.

use crate::nav::{resolve, NAVIGATION};

pub fn execute(route: &str, json: bool) -> anyhow::Result<()> {
    let rows = resolve(NAVIGATION, route);
    if json {
        return super::print_json(&rows);
    }

    for row in &rows {
        let marker = if row.active {
            ">"
        } else if row.expanded {
            "v"
        } else {
            " "
        };
        println!(
            "{} {}{:<24} {}",
            marker,
            "  ".repeat(row.depth),
            row.name,
            row.href.unwrap_or("")
        );
    }
    Ok(())
}
