use serde::Deserialize;

use crate::domain::route::{NewFolder, NewRoute, UpdateRoute};
use crate::domain::types::{AdminId, RouteId, RouteName};
use crate::forms::{FormError, optional_text};

fn admin_ids(raw: Vec<String>) -> Result<Vec<AdminId>, FormError> {
    raw.into_iter()
        .filter(|id| !id.trim().is_empty())
        .map(|id| AdminId::new(id).map_err(|_| FormError::InvalidId))
        .collect()
}

fn route_path(raw: &str) -> Result<String, FormError> {
    let path = raw.trim();
    if !path.starts_with('/') {
        return Err(FormError::Invalid("Path must start with /".to_string()));
    }
    Ok(path.to_string())
}

#[derive(Deserialize)]
/// New sidebar link; `assigned_admins` repeats per ticked admin.
pub struct CreateRouteForm {
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i32,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub assigned_admins: Vec<String>,
}

impl TryFrom<CreateRouteForm> for NewRoute {
    type Error = FormError;

    fn try_from(form: CreateRouteForm) -> Result<Self, Self::Error> {
        Ok(NewRoute {
            name: RouteName::new(form.name)?,
            path: route_path(&form.path)?,
            icon: optional_text(form.icon.as_deref()),
            order: form.order,
            parent_id: optional_text(form.parent_id.as_deref())
                .map(RouteId::new)
                .transpose()?,
            assigned_admins: admin_ids(form.assigned_admins)?,
        })
    }
}

#[derive(Deserialize)]
pub struct CreateFolderForm {
    pub name: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl TryFrom<CreateFolderForm> for NewFolder {
    type Error = FormError;

    fn try_from(form: CreateFolderForm) -> Result<Self, Self::Error> {
        Ok(NewFolder {
            name: RouteName::new(form.name)?,
            icon: optional_text(form.icon.as_deref()),
            order: form.order,
        })
    }
}

#[derive(Deserialize)]
/// Edit of an existing route or folder. A blank path keeps it a folder.
pub struct UpdateRouteForm {
    pub name: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub assigned_admins: Vec<String>,
}

impl TryFrom<UpdateRouteForm> for UpdateRoute {
    type Error = FormError;

    fn try_from(form: UpdateRouteForm) -> Result<Self, Self::Error> {
        Ok(UpdateRoute {
            name: RouteName::new(form.name)?,
            path: optional_text(form.path.as_deref())
                .map(|path| route_path(&path))
                .transpose()?,
            icon: optional_text(form.icon.as_deref()),
            order: form.order,
            assigned_admins: admin_ids(form.assigned_admins)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_route_parses_admins() {
        let form: CreateRouteForm = serde_html_form::from_str(
            "name=Orders&path=%2Freports%2Forders&order=2&parent_id=&assigned_admins=ad1&assigned_admins=ad2",
        )
        .unwrap();

        let route = NewRoute::try_from(form).unwrap();

        assert_eq!(route.path, "/reports/orders");
        assert_eq!(route.parent_id, None);
        assert_eq!(route.assigned_admins.len(), 2);
    }

    #[test]
    fn relative_path_is_rejected() {
        let form = CreateRouteForm {
            name: "Orders".to_string(),
            path: "reports".to_string(),
            icon: None,
            order: 0,
            parent_id: None,
            assigned_admins: Vec::new(),
        };
        assert!(NewRoute::try_from(form).is_err());
    }

    #[test]
    fn blank_path_keeps_folder() {
        let form = UpdateRouteForm {
            name: "Reports".to_string(),
            path: Some(" ".to_string()),
            icon: None,
            order: 1,
            assigned_admins: Vec::new(),
        };
        assert_eq!(UpdateRoute::try_from(form).unwrap().path, None);
    }
}
