//! Sidebar route and folder management. Super admins only.

use crate::domain::route::{NewFolder, NewRoute, SidebarRoute, UpdateRoute};
use crate::domain::types::RouteId;
use crate::dto::navigation::{RouteRow, RoutesPageData};
use crate::forms::navigation::{CreateFolderForm, CreateRouteForm, UpdateRouteForm};
use crate::models::auth::AdminSession;
use crate::repository::{AdminReader, RouteReader, RouteWriter};
use crate::services::{ServiceResult, ensure_super_admin};

/// Loads the full route tree as indented rows, plus the choices needed by the
/// create and edit forms.
pub fn list_routes<R>(repo: &R, user: &AdminSession) -> ServiceResult<RoutesPageData>
where
    R: RouteReader + AdminReader + ?Sized,
{
    ensure_super_admin(user)?;

    let routes = repo.list_all_routes().map_err(|err| {
        log::error!("Failed to load routes: {err}");
        err
    })?;
    let admins = repo.list_admins().map_err(|err| {
        log::error!("Failed to load admins for route assignment: {err}");
        err
    })?;

    let rows = SidebarRoute::flatten(&routes)
        .into_iter()
        .map(|(depth, route)| RouteRow {
            depth,
            route: SidebarRoute {
                sub_routes: Vec::new(),
                ..route.clone()
            },
        })
        .collect();
    let folders = routes
        .iter()
        .filter(|route| route.is_folder() && route.id.is_some())
        .map(|route| SidebarRoute {
            sub_routes: Vec::new(),
            ..route.clone()
        })
        .collect();

    Ok(RoutesPageData {
        rows,
        folders,
        admins,
    })
}

pub fn create_route<R>(repo: &R, user: &AdminSession, form: CreateRouteForm) -> ServiceResult<()>
where
    R: RouteWriter + ?Sized,
{
    ensure_super_admin(user)?;
    let route = NewRoute::try_from(form)?;

    repo.create_route(&route).map_err(|err| {
        log::error!("Failed to create route {}: {err}", route.path);
        err
    })?;

    log::info!("Route {} created by {}", route.path, user.email);
    Ok(())
}

pub fn create_folder<R>(repo: &R, user: &AdminSession, form: CreateFolderForm) -> ServiceResult<()>
where
    R: RouteWriter + ?Sized,
{
    ensure_super_admin(user)?;
    let folder = NewFolder::try_from(form)?;

    repo.create_folder(&folder).map_err(|err| {
        log::error!("Failed to create folder {}: {err}", folder.name);
        err
    })?;

    log::info!("Folder {} created by {}", folder.name, user.email);
    Ok(())
}

pub fn update_route<R>(
    repo: &R,
    user: &AdminSession,
    route_id: &str,
    form: UpdateRouteForm,
) -> ServiceResult<()>
where
    R: RouteWriter + ?Sized,
{
    ensure_super_admin(user)?;
    let id = RouteId::new(route_id)?;
    let route = UpdateRoute::try_from(form)?;

    repo.update_route(&id, &route).map_err(|err| {
        log::error!("Failed to update route {id}: {err}");
        err
    })?;

    log::info!("Route {id} updated by {}", user.email);
    Ok(())
}

/// Deletes a route; the backend removes a folder's children with it.
pub fn delete_route<R>(repo: &R, user: &AdminSession, route_id: &str) -> ServiceResult<()>
where
    R: RouteWriter + ?Sized,
{
    ensure_super_admin(user)?;
    let id = RouteId::new(route_id)?;

    repo.delete_route(&id).map_err(|err| {
        log::error!("Failed to delete route {id}: {err}");
        err
    })?;

    log::info!("Route {id} deleted by {}", user.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::admin::AdminRole;
    use crate::domain::types::RouteName;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::fixtures::session;

    fn node(id: &str, path: Option<&str>, children: Vec<SidebarRoute>) -> SidebarRoute {
        SidebarRoute {
            id: Some(RouteId::new(id).unwrap()),
            name: RouteName::new(id).unwrap(),
            path: path.map(str::to_string),
            icon: None,
            order: 0,
            sub_routes: children,
            assigned_admins: Vec::new(),
        }
    }

    #[test]
    fn tree_becomes_indented_rows() {
        let mut repo = MockRepository::new();
        repo.expect_list_all_routes().returning(|| {
            Ok(vec![
                node("reports", None, vec![node("orders", Some("/reports/orders"), vec![])]),
                node("slots", Some("/slots"), vec![]),
            ])
        });
        repo.expect_list_admins().returning(|| Ok(vec![]));

        let data = list_routes(&repo, &session(AdminRole::SuperAdmin)).unwrap();

        let rows: Vec<(usize, &str)> = data
            .rows
            .iter()
            .map(|row| (row.depth, row.route.name.as_str()))
            .collect();
        assert_eq!(rows, vec![(0, "reports"), (1, "orders"), (0, "slots")]);
        assert_eq!(data.folders.len(), 1);
        assert!(data.folders[0].sub_routes.is_empty());
    }

    #[test]
    fn plain_admin_cannot_delete_routes() {
        let mut repo = MockRepository::new();
        repo.expect_delete_route().never();

        assert!(matches!(
            delete_route(&repo, &session(AdminRole::Admin), "r1"),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn relative_path_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_create_route().never();
        let form = CreateRouteForm {
            name: "Orders".to_string(),
            path: "reports/orders".to_string(),
            icon: None,
            order: 1,
            parent_id: None,
            assigned_admins: vec![],
        };

        assert!(matches!(
            create_route(&repo, &session(AdminRole::SuperAdmin), form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn folder_is_created() {
        let mut repo = MockRepository::new();
        repo.expect_create_folder()
            .withf(|folder| folder.name.as_str() == "Reports")
            .times(1)
            .returning(|_| Ok(()));
        let form = CreateFolderForm {
            name: "Reports".to_string(),
            icon: Some("folder".to_string()),
            order: 3,
        };

        assert!(create_folder(&repo, &session(AdminRole::SuperAdmin), form).is_ok());
    }
}
