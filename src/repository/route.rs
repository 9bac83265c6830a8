//! Sidebar navigation and route permissions.

use reqwest::Method;

use crate::domain::route::{NewFolder, NewRoute, SidebarRoute, UpdateRoute};
use crate::domain::types::RouteId;
use crate::models::route::{
    CreateFolderPayload, CreateRoutePayload, SidebarRouteRecord, UpdateRoutePayload,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ApiRepository, RouteReader, RouteWriter, convert_lenient};

impl RouteReader for ApiRepository {
    fn list_sidebar(&self) -> RepositoryResult<Vec<SidebarRoute>> {
        let records: Vec<SidebarRouteRecord> = self.fetch(self.get("/api/admin/sidebar"))?;
        let mut routes: Vec<SidebarRoute> = convert_lenient(records, "sidebar route");
        SidebarRoute::sort_tree(&mut routes);
        Ok(routes)
    }

    fn list_all_routes(&self) -> RepositoryResult<Vec<SidebarRoute>> {
        let records: Vec<SidebarRouteRecord> = self.fetch(self.get("/api/admin/sidebar/all"))?;
        let mut routes: Vec<SidebarRoute> = convert_lenient(records, "sidebar route");
        SidebarRoute::sort_tree(&mut routes);
        Ok(routes)
    }
}

impl RouteWriter for ApiRepository {
    fn create_route(&self, route: &NewRoute) -> RepositoryResult<()> {
        let request = self
            .request(Method::POST, "/api/admin/sidebar/create")
            .json(&CreateRoutePayload::from(route));
        self.execute(request)
    }

    fn create_folder(&self, folder: &NewFolder) -> RepositoryResult<()> {
        let request = self
            .request(Method::POST, "/api/admin/sidebar/create-folder")
            .json(&CreateFolderPayload::from(folder));
        self.execute(request)
    }

    fn update_route(&self, id: &RouteId, route: &UpdateRoute) -> RepositoryResult<()> {
        let request = self
            .request(Method::PUT, &format!("/api/admin/sidebar/{id}"))
            .json(&UpdateRoutePayload::from(route));
        self.execute(request)
    }

    fn delete_route(&self, id: &RouteId) -> RepositoryResult<()> {
        self.execute(self.request(Method::DELETE, &format!("/api/admin/sidebar/{id}")))
    }
}
