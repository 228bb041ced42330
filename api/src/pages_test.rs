use super::*;

#[test]
fn areas_match_whole_segments() {
    assert_eq!(Area::for_path("/login"), Some(Area::Login));
    assert_eq!(Area::for_path("/dashboard"), Some(Area::Admin));
    assert_eq!(Area::for_path("/dashboard/users"), Some(Area::Admin));
    assert_eq!(Area::for_path("/profile/withdrawals"), Some(Area::Partner));
    assert_eq!(Area::for_path("/dashboards"), None);
    assert_eq!(Area::for_path("/profiles/x"), None);
}

#[test]
fn ungated_paths_have_no_area() {
    assert_eq!(Area::for_path("/"), None);
    assert_eq!(Area::for_path("/not-found"), None);
    assert_eq!(Area::for_path("/api/partners"), None);
}

#[test]
fn required_roles() {
    assert_eq!(Area::Login.required_role(), None);
    assert_eq!(Area::Admin.required_role(), Some(Role::Admin));
    assert_eq!(Area::Partner.required_role(), Some(Role::Partner));
}

#[test]
fn home_per_role() {
    assert_eq!(home_for(Some(Role::Admin)), "/dashboard");
    assert_eq!(home_for(Some(Role::Partner)), "/profile");
    assert_eq!(home_for(None), "/login");
}
