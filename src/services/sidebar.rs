//! Sidebar navigation shown on every page.

use crate::domain::route::{SidebarRoute, fallback_routes};
use crate::repository::RouteReader;

/// Loads the operator's sidebar, falling back to the static navigation when
/// the backend cannot provide it.
pub fn load_sidebar<R>(repo: &R) -> Vec<SidebarRoute>
where
    R: RouteReader + ?Sized,
{
    match repo.list_sidebar() {
        Ok(routes) if !routes.is_empty() => routes,
        Ok(_) => fallback_routes(),
        Err(err) => {
            log::warn!("Failed to load sidebar, using fallback: {err}");
            fallback_routes()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RouteName;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    #[test]
    fn backend_failure_uses_fallback() {
        let mut repo = MockRepository::new();
        repo.expect_list_sidebar()
            .returning(|| Err(RepositoryError::ConnectionError("down".into())));

        assert_eq!(load_sidebar(&repo), fallback_routes());
    }

    #[test]
    fn backend_routes_are_used() {
        let mut repo = MockRepository::new();
        repo.expect_list_sidebar().returning(|| {
            Ok(vec![SidebarRoute {
                id: None,
                name: RouteName::new("Orders").unwrap(),
                path: Some("/reports/orders".to_string()),
                icon: None,
                order: 1,
                sub_routes: Vec::new(),
                assigned_admins: Vec::new(),
            }])
        });

        let routes = load_sidebar(&repo);

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].name.as_str(), "Orders");
    }
}
