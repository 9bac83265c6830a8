use crate::domain::admin::Admin;

/// Data required to render the admin accounts page.
pub struct AdminsPageData {
    pub admins: Vec<Admin>,
}
