use crate::models::role::{Role, ADMIN_DASHBOARD, DONOR_DASHBOARD, HOSPITAL_DASHBOARD};

/// Role ⇄ dashboard mapping shared by the profile and settings views.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleRouter;

impl RoleRouter {
    /// Current role by precedence: a non-empty `?role=` parameter, then the
    /// role cached in the session, then `Donor`. An unrecognized value at
    /// the winning level falls back to `Donor`, never to the next level.
    pub fn resolve_role(query_param: Option<&str>, cached: Option<&str>) -> Role {
        let chosen = [query_param, cached]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty());

        chosen.and_then(Role::parse).unwrap_or(Role::Donor)
    }

    /// Total over any input: unknown roles land on the donor dashboard.
    pub fn dashboard_path_for(role: &str) -> &'static str {
        Role::parse(role)
            .map(Role::dashboard_path)
            .unwrap_or(DONOR_DASHBOARD)
    }

    pub fn role_for_path(path: &str) -> Option<Role> {
        match path.trim_end_matches('/') {
            DONOR_DASHBOARD => Some(Role::Donor),
            HOSPITAL_DASHBOARD => Some(Role::HospitalStaff),
            ADMIN_DASHBOARD => Some(Role::Admin),
            _ => None,
        }
    }

    /// Link to a role-aware page (`/profile`, `/settings`) that remembers
    /// where the visitor came from.
    pub fn link_with_role(path: &str, role: Role) -> String {
        format!("{}?role={}", path, role.label().replace(' ', "%20"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn query_parameter_wins() {
        assert_eq!(RoleRouter::resolve_role(Some("Admin"), Some("Donor")), Role::Admin);
        assert_eq!(
            RoleRouter::resolve_role(Some("Hospital Staff"), None),
            Role::HospitalStaff
        );
    }

    #[test]
    fn cache_then_default() {
        assert_eq!(RoleRouter::resolve_role(None, Some("Admin")), Role::Admin);
        assert_eq!(RoleRouter::resolve_role(Some(""), Some("Hospital Staff")), Role::HospitalStaff);
        assert_eq!(RoleRouter::resolve_role(None, None), Role::Donor);
    }

    #[test]
    fn unknown_winner_falls_back_to_donor() {
        assert_eq!(RoleRouter::resolve_role(Some("Janitor"), Some("Admin")), Role::Donor);
        assert_eq!(RoleRouter::resolve_role(None, Some("???")), Role::Donor);
    }

    #[test]
    fn dashboard_paths_are_distinct_and_total() {
        let paths: HashSet<&str> = Role::ALL
            .iter()
            .map(|role| RoleRouter::dashboard_path_for(role.label()))
            .collect();
        assert_eq!(paths.len(), 3);

        for unknown in ["", "nurse", "ADMINISTRATOR!", "🩸"] {
            assert_eq!(RoleRouter::dashboard_path_for(unknown), "/donor-dashboard");
        }
    }

    #[test]
    fn paths_map_back_to_roles() {
        for role in Role::ALL {
            assert_eq!(RoleRouter::role_for_path(role.dashboard_path()), Some(role));
        }
        assert_eq!(RoleRouter::role_for_path("/settings"), None);
    }

    #[test]
    fn builds_role_links() {
        assert_eq!(
            RoleRouter::link_with_role("/profile", Role::HospitalStaff),
            "/profile?role=Hospital%20Staff"
        );
    }
}
