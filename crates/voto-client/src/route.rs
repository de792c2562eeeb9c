//! Client-side locations

use std::fmt;

use crate::resource::ResourceKind;

/// A page of the admin client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    List(ResourceKind),
    New(ResourceKind),
    Edit(ResourceKind, u64),
    ElectionCandidates(u64),
    Results,
    ImportVoters,
}

impl Route {
    /// Only the login page is reachable without a token
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "/login"),
            Self::Dashboard => write!(f, "/dashboard"),
            Self::List(kind) => write!(f, "/{}", kind.path()),
            Self::New(kind) => write!(f, "/{}/novo", kind.path()),
            Self::Edit(kind, id) => write!(f, "/{}/editar/{}", kind.path(), id),
            Self::ElectionCandidates(id) => write!(f, "/eleicoes/{}/candidatos", id),
            Self::Results => write!(f, "/resultados"),
            Self::ImportVoters => write!(f, "/eleitores/importar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let routes = [
            (Route::Login, "/login"),
            (Route::Dashboard, "/dashboard"),
            (Route::List(ResourceKind::Urnas), "/urnas"),
            (Route::New(ResourceKind::Candidatos), "/candidatos/novo"),
            (Route::Edit(ResourceKind::Eleitores, 12), "/eleitores/editar/12"),
            (Route::ElectionCandidates(3), "/eleicoes/3/candidatos"),
            (Route::Results, "/resultados"),
            (Route::ImportVoters, "/eleitores/importar"),
        ];
        for (route, path) in routes {
            assert_eq!(route.to_string(), path);
        }
    }

    #[test]
    fn test_only_login_is_public() {
        assert!(!Route::Login.is_protected());
        assert!(Route::Dashboard.is_protected());
        assert!(Route::ImportVoters.is_protected());
    }
}
