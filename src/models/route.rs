use serde::{Deserialize, Serialize};

use crate::domain::route::{NewFolder, NewRoute, SidebarRoute, UpdateRoute};
use crate::domain::types::{AdminId, RouteId, RouteName, TypeConstraintError};
use crate::models::non_blank;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::route::SidebarRoute`].
pub struct SidebarRouteRecord {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub sub_routes: Vec<SidebarRouteRecord>,
    #[serde(default)]
    pub assigned_admins: Vec<String>,
}

impl TryFrom<SidebarRouteRecord> for SidebarRoute {
    type Error = TypeConstraintError;

    fn try_from(record: SidebarRouteRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: non_blank(record.id).map(RouteId::new).transpose()?,
            name: RouteName::new(record.name)?,
            path: non_blank(record.path),
            icon: non_blank(record.icon),
            order: record.order,
            sub_routes: record
                .sub_routes
                .into_iter()
                .map(SidebarRoute::try_from)
                .collect::<Result<_, _>>()?,
            assigned_admins: record
                .assigned_admins
                .into_iter()
                .map(AdminId::new)
                .collect::<Result<_, _>>()?,
        })
    }
}

fn admin_ids(ids: &[AdminId]) -> Vec<&str> {
    ids.iter().map(AdminId::as_str).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoutePayload<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub icon: Option<&'a str>,
    pub order: i32,
    pub parent_id: Option<&'a str>,
    pub assigned_admins: Vec<&'a str>,
}

impl<'a> From<&'a NewRoute> for CreateRoutePayload<'a> {
    fn from(route: &'a NewRoute) -> Self {
        Self {
            name: route.name.as_str(),
            path: &route.path,
            icon: route.icon.as_deref(),
            order: route.order,
            parent_id: route.parent_id.as_ref().map(RouteId::as_str),
            assigned_admins: admin_ids(&route.assigned_admins),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateFolderPayload<'a> {
    pub name: &'a str,
    pub icon: Option<&'a str>,
    pub order: i32,
}

impl<'a> From<&'a NewFolder> for CreateFolderPayload<'a> {
    fn from(folder: &'a NewFolder) -> Self {
        Self {
            name: folder.name.as_str(),
            icon: folder.icon.as_deref(),
            order: folder.order,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoutePayload<'a> {
    pub name: &'a str,
    pub path: Option<&'a str>,
    pub icon: Option<&'a str>,
    pub order: i32,
    pub assigned_admins: Vec<&'a str>,
}

impl<'a> From<&'a UpdateRoute> for UpdateRoutePayload<'a> {
    fn from(route: &'a UpdateRoute) -> Self {
        Self {
            name: route.name.as_str(),
            path: route.path.as_deref(),
            icon: route.icon.as_deref(),
            order: route.order,
            assigned_admins: admin_ids(&route.assigned_admins),
        }
    }
}
