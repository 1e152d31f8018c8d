//! Portal route table and navbar links

use serde::Serialize;

/// Page of a dataset section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSubpage {
    Main,
    Terms,
    Download,
    Beacon,
    Admin,
}

impl DatasetSubpage {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "terms" => Some(DatasetSubpage::Terms),
            "download" => Some(DatasetSubpage::Download),
            "beacon" => Some(DatasetSubpage::Beacon),
            "admin" => Some(DatasetSubpage::Admin),
            _ => None,
        }
    }

    /// Path segment, empty for the main page
    pub fn segment(&self) -> &'static str {
        match self {
            DatasetSubpage::Main => "",
            DatasetSubpage::Terms => "terms",
            DatasetSubpage::Download => "download",
            DatasetSubpage::Beacon => "beacon",
            DatasetSubpage::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "camelCase")]
pub enum Route {
    Home,
    DataBeacon,
    Dataset {
        dataset: String,
        version: Option<String>,
        page: DatasetSubpage,
    },
    /// Variant browser page; `link` is the sub-path after `browser/`, e.g. `gene/ENSG...`
    Browser {
        dataset: String,
        version: Option<String>,
        link: String,
    },
    NotFound,
}

impl Route {
    /// Maps a portal path to its route; unknown paths give `NotFound`
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let dataset = |ds: &str, version: Option<&str>, page: DatasetSubpage| Route::Dataset {
            dataset: ds.to_string(),
            version: version.map(str::to_string),
            page,
        };

        let browser = |ds: &str, version: Option<&str>, link: &[&str]| Route::Browser {
            dataset: ds.to_string(),
            version: version.map(str::to_string),
            link: link.join("/"),
        };

        match *segments.as_slice() {
            [] => Route::Home,
            ["dataBeacon"] => Route::DataBeacon,
            ["dataset", ds] => dataset(ds, None, DatasetSubpage::Main),
            ["dataset", ds, "browser", ref link @ ..] => browser(ds, None, link),
            ["dataset", ds, "version", v, "browser", ref link @ ..] => browser(ds, Some(v), link),
            ["dataset", ds, sub] => match DatasetSubpage::from_segment(sub) {
                Some(page) => dataset(ds, None, page),
                None => Route::NotFound,
            },
            ["dataset", ds, "version", v] => dataset(ds, Some(v), DatasetSubpage::Main),
            ["dataset", ds, "version", v, sub] => match DatasetSubpage::from_segment(sub) {
                // L'admin non è legato a una versione
                Some(DatasetSubpage::Admin) | None => Route::NotFound,
                Some(page) => dataset(ds, Some(v), page),
            },
            _ => Route::NotFound,
        }
    }

    /// View template rendered for this route
    pub fn template(&self) -> &'static str {
        match self {
            Route::Home => "home.html",
            Route::DataBeacon => "dataBeacon.html",
            Route::Dataset { page, .. } => match page {
                DatasetSubpage::Main => "dataset.html",
                DatasetSubpage::Terms => "dataset-terms.html",
                DatasetSubpage::Download => "dataset-download.html",
                DatasetSubpage::Beacon => "dataset-beacon.html",
                DatasetSubpage::Admin => "dataset-admin.html",
            },
            Route::Browser { .. } => "dataset-browser.html",
            Route::NotFound => "404.html",
        }
    }
}

/// Navbar link builder for a dataset page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinks {
    dataset: String,
    url_base: String,
}

impl NavLinks {
    pub fn new(dataset: &str, version: Option<&str>) -> Self {
        let mut url_base = format!("/dataset/{}", dataset);
        if let Some(version) = version.filter(|v| !v.is_empty()) {
            url_base.push_str("/version/");
            url_base.push_str(version);
        }
        Self {
            dataset: dataset.to_string(),
            url_base,
        }
    }

    pub fn url_base(&self) -> &str {
        &self.url_base
    }

    /// Link to `subpage`, pinned to `version` when given, else to the page's own version
    pub fn create_url(&self, subpage: DatasetSubpage, version: Option<&str>) -> String {
        if subpage == DatasetSubpage::Admin {
            return format!("/dataset/{}/admin", self.dataset);
        }
        match version.filter(|v| !v.is_empty()) {
            Some(version) => format!(
                "/dataset/{}/version/{}/{}",
                self.dataset,
                version,
                subpage.segment()
            ),
            None => format!("{}/{}", self.url_base, subpage.segment()),
        }
    }

    /// Link to a variant browser page, e.g. `gene/ENSG...` from a search hit
    pub fn browser_link(&self, link: &str) -> String {
        format!("/dataset/{}/browser/{}", self.dataset, link.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/dataBeacon/"), Route::DataBeacon);
        assert_eq!(
            Route::parse("/dataset/SweGen"),
            Route::Dataset {
                dataset: "SweGen".to_string(),
                version: None,
                page: DatasetSubpage::Main
            }
        );
        assert_eq!(
            Route::parse("/dataset/SweGen/version/20171025/download?x=1"),
            Route::Dataset {
                dataset: "SweGen".to_string(),
                version: Some("20171025".to_string()),
                page: DatasetSubpage::Download
            }
        );
        assert_eq!(
            Route::parse("/dataset/SweGen/admin").template(),
            "dataset-admin.html"
        );
    }

    #[test]
    fn test_unknown_routes() {
        assert_eq!(Route::parse("/dataset/SweGen/version/1/admin"), Route::NotFound);
        assert_eq!(Route::parse("/dataset/SweGen/nope"), Route::NotFound);
        assert_eq!(Route::parse("/somewhere/else"), Route::NotFound);
        assert_eq!(Route::parse("/nope").template(), "404.html");
    }

    #[test]
    fn test_templates() {
        assert_eq!(Route::Home.template(), "home.html");
        assert_eq!(
            Route::parse("/dataset/SweGen/version/2/beacon").template(),
            "dataset-beacon.html"
        );
        assert_eq!(Route::parse("/dataset/SweGen/terms").template(), "dataset-terms.html");
    }

    #[test]
    fn test_browser_routes() {
        assert_eq!(
            Route::parse("/dataset/SweGen/browser/gene/ENSG00000169174"),
            Route::Browser {
                dataset: "SweGen".to_string(),
                version: None,
                link: "gene/ENSG00000169174".to_string()
            }
        );
        assert_eq!(
            Route::parse("/dataset/SweGen/version/2/browser/region/22-100-200"),
            Route::Browser {
                dataset: "SweGen".to_string(),
                version: Some("2".to_string()),
                link: "region/22-100-200".to_string()
            }
        );
        assert_eq!(
            Route::parse("/dataset/SweGen/browser").template(),
            "dataset-browser.html"
        );

        let links = NavLinks::new("SweGen", Some("2"));
        let link = links.browser_link("transcript/ENST1");
        assert_eq!(link, "/dataset/SweGen/browser/transcript/ENST1");
        assert!(matches!(Route::parse(&link), Route::Browser { .. }));
    }

    #[test]
    fn test_create_url() {
        let links = NavLinks::new("SweGen", None);
        assert_eq!(links.url_base(), "/dataset/SweGen");
        assert_eq!(links.create_url(DatasetSubpage::Main, None), "/dataset/SweGen/");
        assert_eq!(
            links.create_url(DatasetSubpage::Download, None),
            "/dataset/SweGen/download"
        );
        assert_eq!(
            links.create_url(DatasetSubpage::Terms, Some("2")),
            "/dataset/SweGen/version/2/terms"
        );

        let pinned = NavLinks::new("SweGen", Some("1"));
        assert_eq!(
            pinned.create_url(DatasetSubpage::Beacon, None),
            "/dataset/SweGen/version/1/beacon"
        );
        assert_eq!(
            pinned.create_url(DatasetSubpage::Admin, Some("1")),
            "/dataset/SweGen/admin"
        );
    }
}
