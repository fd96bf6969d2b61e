/// URL slug for a state name: lowercase, whitespace runs collapsed to `-`.
pub fn state_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Map,
    StateDetail { slug: String },
    Login,
    Admin,
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Map,
            "/login" => Route::Login,
            "/admin" => Route::Admin,
            _ => match trimmed.strip_prefix("/state/") {
                Some(slug) if !slug.is_empty() && !slug.contains('/') => Route::StateDetail {
                    slug: slug.to_string(),
                },
                _ => Route::NotFound,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Map | Route::NotFound => "/".to_string(),
            Route::StateDetail { slug } => format!("/state/{slug}"),
            Route::Login => "/login".to_string(),
            Route::Admin => "/admin".to_string(),
        }
    }

    pub fn for_state(name: &str) -> Self {
        Route::StateDetail {
            slug: state_slug(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(state_slug("California"), "california");
        assert_eq!(state_slug("New  Hampshire"), "new-hampshire");
        assert_eq!(state_slug(" District of Columbia "), "district-of-columbia");
    }

    #[test]
    fn parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::Map);
        assert_eq!(Route::parse(""), Route::Map);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/admin/"), Route::Admin);
        assert_eq!(
            Route::parse("/state/new-york?tab=history"),
            Route::StateDetail {
                slug: "new-york".into()
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/state/"), Route::NotFound);
        assert_eq!(Route::parse("/state/a/b"), Route::NotFound);
        assert_eq!(Route::parse("/settings"), Route::NotFound);
    }

    #[test]
    fn for_state_builds_detail_path() {
        assert_eq!(Route::for_state("Rhode Island").path(), "/state/rhode-island");
    }
}
