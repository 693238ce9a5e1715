//! Screens of the admin and the guard deciding whether a navigation may proceed.

use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl Route {
    const fn screen(path: &'static str, name: &'static str) -> Self {
        Self { path, name, public: false, redirect: None }
    }

    const fn public(path: &'static str, name: &'static str) -> Self {
        Self { path, name, public: true, redirect: None }
    }

    /// Match a concrete path against this pattern; `:param` segments match anything non-empty.
    fn matches(&self, path: &str) -> bool {
        let want: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        let got: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        want.len() == got.len()
            && want.iter().zip(&got).all(|(w, g)| w.starts_with(':') || w == g)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "camelCase")]
pub enum NavigationDecision {
    Proceed,
    Redirect(String),
    NotFound,
}

#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self { Self::admin() }
}

impl RouteTable {
    /// The admin screens; everything but login and password recovery needs a session.
    pub fn admin() -> Self {
        let routes = vec![
            Route::public(LOGIN_PATH, "Login"),
            Route::public("/esqueci-senha", "ForgotPassword"),
            Route::public("/redefinir-senha/:token", "ResetPassword"),
            Route { redirect: Some("/direitos"), ..Route::screen(HOME_PATH, "Home") },
            Route::screen("/direitos", "Direitos"),
            Route::screen("/funcionalidades", "Funcionalidades"),
            Route::screen("/papeis", "Papeis"),
            Route::screen("/permissoes", "Permissoes"),
            Route::screen("/planos", "Planos"),
            Route::screen("/precos", "Precos"),
            Route::screen("/quotas", "Quotas"),
            Route::screen("/vincular-papeis-permissoes", "VincularPapeisPermissoes"),
            Route::screen("/agrupadores", "Agrupadores"),
            Route::screen("/vincular-func-permissoes", "VincularFuncPermissoes"),
        ];
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] { &self.routes }

    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.routes.iter().find(|r| r.matches(path))
    }

    /// Decide a navigation to `path` given whether a session exists.
    pub fn guard(&self, path: &str, authenticated: bool) -> NavigationDecision {
        let route = self.resolve(path);
        let public = route.is_some_and(|r| r.public);
        if !public && !authenticated {
            return NavigationDecision::Redirect(LOGIN_PATH.to_string());
        }
        match route {
            None => NavigationDecision::NotFound,
            Some(r) if authenticated && r.path == LOGIN_PATH => NavigationDecision::Redirect(HOME_PATH.to_string()),
            Some(Route { redirect: Some(to), .. }) => NavigationDecision::Redirect(to.to_string()),
            Some(_) => NavigationDecision::Proceed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect(to: &str) -> NavigationDecision { NavigationDecision::Redirect(to.into()) }

    #[test]
    fn anonymous_users_only_reach_public_screens() {
        let t = RouteTable::admin();
        assert_eq!(t.guard("/papeis", false), redirect("/login"));
        assert_eq!(t.guard("/", false), redirect("/login"));
        assert_eq!(t.guard("/nao-existe", false), redirect("/login"));
        assert_eq!(t.guard("/login", false), NavigationDecision::Proceed);
        assert_eq!(t.guard("/esqueci-senha", false), NavigationDecision::Proceed);
        assert_eq!(t.guard("/redefinir-senha/valid-token-1", false), NavigationDecision::Proceed);
        assert_eq!(t.guard("/redefinir-senha", false), redirect("/login"));
    }

    #[test]
    fn signed_in_users_skip_login() {
        let t = RouteTable::admin();
        assert_eq!(t.guard("/login", true), redirect("/"));
        assert_eq!(t.guard("/", true), redirect("/direitos"));
        assert_eq!(t.guard("/planos?page=2", true), NavigationDecision::Proceed);
        assert_eq!(t.guard("/vincular-func-permissoes/", true), NavigationDecision::Proceed);
        assert_eq!(t.guard("/nao-existe", true), NavigationDecision::NotFound);
    }
}
