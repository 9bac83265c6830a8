use serde::Serialize;

use crate::domain::admin::Admin;
use crate::domain::route::SidebarRoute;

/// Route tree row with its nesting depth.
#[derive(Debug, Serialize)]
pub struct RouteRow {
    pub depth: usize,
    pub route: SidebarRoute,
}

/// Data required to render the route management page.
pub struct RoutesPageData {
    pub rows: Vec<RouteRow>,
    /// Folders a new route may be placed in.
    pub folders: Vec<SidebarRoute>,
    pub admins: Vec<Admin>,
}
