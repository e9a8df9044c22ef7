// nav.rs - Admin sidebar, derived from the current route.
//
// The navigation tree is static. Which item is active and which groups
// are expanded is recomputed from the route on every call; nothing about
// the sidebar is stored, so it cannot disagree with the page being shown.

use serde::Serialize;

/// One entry in the static navigation tree.
#[derive(Debug)]
pub struct NavItem {
    pub name: &'static str,
    /// `None` for a group heading that only holds children.
    pub href: Option<&'static str>,
    /// Only an exact route match activates this item (the dashboard home,
    /// whose href prefixes every other route).
    pub exact: bool,
    pub children: &'static [NavItem],
}

const fn link(name: &'static str, href: &'static str) -> NavItem {
    NavItem {
        name,
        href: Some(href),
        exact: false,
        children: &[],
    }
}

const fn group(name: &'static str, children: &'static [NavItem]) -> NavItem {
    NavItem {
        name,
        href: None,
        exact: false,
        children,
    }
}

const CONTENT: &[NavItem] = &[
    link("Treks", "/dashboard/treks"),
    link("Expeditions", "/dashboard/expeditions"),
];

const BLOG: &[NavItem] = &[
    link("Posts", "/dashboard/blog"),
    link("Categories", "/dashboard/blog/categories"),
    link("Tags", "/dashboard/blog/tags"),
];

const INBOX: &[NavItem] = &[
    link("Leads", "/dashboard/leads"),
    link("Contacts", "/dashboard/contacts"),
    link("Email Logs", "/dashboard/email-logs"),
];

pub const NAVIGATION: &[NavItem] = &[
    NavItem {
        name: "Dashboard",
        href: Some("/dashboard"),
        exact: true,
        children: &[],
    },
    group("Content", CONTENT),
    group("Blog", BLOG),
    link("Media", "/dashboard/media"),
    group("Inbox", INBOX),
    link("Settings", "/dashboard/settings"),
];

/// A visible sidebar row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavRow {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<&'static str>,
    pub depth: usize,
    pub active: bool,
    pub expanded: bool,
}

/// Visible rows of `tree` for `route`.
///
/// The active item is the one whose href matches the route most
/// specifically: equal to it, or a prefix ending at a `/` boundary.
/// Groups on the path to the active item are expanded; other groups show
/// only their heading.
pub fn resolve(tree: &'static [NavItem], route: &str) -> Vec<NavRow> {
    let route = normalize(route);
    let mut best: Option<(usize, Vec<usize>)> = None;
    let mut path = Vec::new();
    find_active(tree, route, &mut path, &mut best);

    let active_path = best.map(|(_, path)| path).unwrap_or_default();
    let mut rows = Vec::new();
    push_rows(tree, &active_path, 0, &mut rows);
    rows
}

fn normalize(route: &str) -> &str {
    let route = route.split(['?', '#']).next().unwrap_or_default();
    match route.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn matches(item: &NavItem, route: &str) -> Option<usize> {
    let href = item.href?;
    let hit = route == href
        || (!item.exact
            && route
                .strip_prefix(href)
                .is_some_and(|rest| rest.starts_with('/')));
    hit.then_some(href.len())
}

fn find_active(
    items: &'static [NavItem],
    route: &str,
    path: &mut Vec<usize>,
    best: &mut Option<(usize, Vec<usize>)>,
) {
    for (i, item) in items.iter().enumerate() {
        path.push(i);
        if let Some(len) = matches(item, route) {
            if best.as_ref().map_or(true, |(best_len, _)| len > *best_len) {
                *best = Some((len, path.clone()));
            }
        }
        find_active(item.children, route, path, best);
        path.pop();
    }
}

fn push_rows(
    items: &'static [NavItem],
    active_path: &[usize],
    depth: usize,
    out: &mut Vec<NavRow>,
) {
    for (i, item) in items.iter().enumerate() {
        let on_path = active_path.first() == Some(&i);
        let active = on_path && active_path.len() == 1;
        let expanded = on_path && !item.children.is_empty() && active_path.len() > 1;

        out.push(NavRow {
            name: item.name,
            href: item.href,
            depth,
            active,
            expanded,
        });
        if expanded {
            push_rows(item.children, &active_path[1..], depth + 1, out);
        }
    }
}
