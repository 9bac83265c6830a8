//! Sidebar navigation tree.

use serde::Serialize;

use crate::domain::types::{AdminId, RouteId, RouteName};

/// A sidebar node. Nodes without a path are folders grouping `sub_routes`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SidebarRoute {
    pub id: Option<RouteId>,
    pub name: RouteName,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub order: i32,
    pub sub_routes: Vec<SidebarRoute>,
    pub assigned_admins: Vec<AdminId>,
}

impl SidebarRoute {
    pub fn is_folder(&self) -> bool {
        self.path.is_none()
    }

    /// Recursively orders siblings by `order`, then by name.
    pub fn sort_tree(routes: &mut [SidebarRoute]) {
        routes.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        for route in routes.iter_mut() {
            Self::sort_tree(&mut route.sub_routes);
        }
    }

    /// Flattens the tree depth-first, pairing every node with its depth.
    pub fn flatten(routes: &[SidebarRoute]) -> Vec<(usize, &SidebarRoute)> {
        fn walk<'a>(routes: &'a [SidebarRoute], depth: usize, out: &mut Vec<(usize, &'a SidebarRoute)>) {
            for route in routes {
                out.push((depth, route));
                walk(&route.sub_routes, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        walk(routes, 0, &mut out);
        out
    }
}

/// A new leaf route, optionally nested under a folder.
#[derive(Clone, Debug, PartialEq)]
pub struct NewRoute {
    pub name: RouteName,
    pub path: String,
    pub icon: Option<String>,
    pub order: i32,
    pub parent_id: Option<RouteId>,
    pub assigned_admins: Vec<AdminId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewFolder {
    pub name: RouteName,
    pub icon: Option<String>,
    pub order: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateRoute {
    pub name: RouteName,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub order: i32,
    pub assigned_admins: Vec<AdminId>,
}

fn fallback_leaf(name: &str, path: &str, icon: &str, order: i32) -> Option<SidebarRoute> {
    Some(SidebarRoute {
        id: None,
        name: RouteName::new(name).ok()?,
        path: Some(path.to_string()),
        icon: Some(icon.to_string()),
        order,
        sub_routes: Vec::new(),
        assigned_admins: Vec::new(),
    })
}

/// Static sidebar shown when the backend navigation cannot be loaded.
pub fn fallback_routes() -> Vec<SidebarRoute> {
    [
        fallback_leaf("Consultations", "/", "chat", 1),
        fallback_leaf("Puja bookings", "/pujas/bookings", "flower", 2),
        fallback_leaf("Puja editor", "/pujas/editor", "pencil", 3),
        fallback_leaf("Report orders", "/reports/orders", "file-text", 4),
        fallback_leaf("Report automation", "/reports/automation", "gear", 5),
        fallback_leaf("Slot blocking", "/slots", "calendar", 6),
        fallback_leaf("Astrologers", "/astrologers", "stars", 7),
    ]
    .into_iter()
    .flatten()
    .collect()
}
