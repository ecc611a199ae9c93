//! HTML pages served to package tooling and browsers.
//!
//! Rendering is a pure function of a value object, so pages can be produced
//! concurrently from any request task.

use std::fmt::Write;

use crate::error::RenderError;
use crate::mount::VcsKind;

/// Escape HTML special characters to prevent XSS attacks.
fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Values for the go-import/go-source metadata page.
#[derive(Debug, Clone)]
pub struct MetadataPage<'a> {
    /// Resolved externally visible host
    pub host: &'a str,

    /// Mount path, e.g. `/portmidi`
    pub path: &'a str,

    pub vcs: VcsKind,
    pub repo: &'a str,
    pub display: &'a str,

    /// Request remainder below the mount, as sent (percent-encoded)
    pub subpath: &'a str,

    /// Documentation site base URL without trailing slash
    pub docs_url: &'a str,
}

impl MetadataPage<'_> {
    /// `<host><path>`, the import path announced to tooling.
    pub fn import_path(&self) -> String {
        format!("{}{}", self.host, self.path)
    }

    /// Value of the `go-import` meta tag.
    pub fn go_import(&self) -> String {
        format!("{} {} {}", self.import_path(), self.vcs, self.repo)
    }

    /// Value of the `go-source` meta tag.
    pub fn go_source(&self) -> String {
        format!("{} {}", self.import_path(), self.display)
    }

    fn docs_link(&self) -> String {
        if self.subpath.is_empty() {
            format!("{}/{}", self.docs_url, self.import_path())
        } else {
            format!("{}/{}/{}", self.docs_url, self.import_path(), self.subpath)
        }
    }
}

/// Render the metadata page for a resolved mount.
pub fn render_metadata(page: &MetadataPage<'_>) -> Result<String, RenderError> {
    let go_import = html_escape(&page.go_import());
    let go_source = html_escape(&page.go_source());
    let docs = html_escape(&page.docs_link());

    let mut html = String::with_capacity(512);
    write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
<meta http-equiv="Content-Type" content="text/html; charset=utf-8"/>
<meta name="go-import" content="{go_import}">
<meta name="go-source" content="{go_source}">
<meta http-equiv="refresh" content="0; url={docs}">
</head>
<body>
Nothing to see here; <a href="{docs}">see the package documentation</a>.
</body>
</html>
"#
    )
    .map_err(|e| RenderError::new("metadata", e))?;

    Ok(html)
}

/// A wildcard rule as listed on the index page.
#[derive(Debug, Clone)]
pub struct IndexRule<'a> {
    /// Rule key, e.g. `/gh/{user}`
    pub pattern: String,

    /// Repository template, e.g. `https://github.com/{user}`
    pub repo: &'a str,
}

/// Values for the index page.
#[derive(Debug, Clone)]
pub struct IndexPage<'a> {
    pub host: &'a str,
    pub docs_url: &'a str,

    /// Static mount paths in sorted order
    pub paths: Vec<&'a str>,

    pub rules: Vec<IndexRule<'a>>,
}

/// Render the index page listing every mount.
pub fn render_index(page: &IndexPage<'_>) -> Result<String, RenderError> {
    let fail = |e| RenderError::new("index", e);
    let host = html_escape(page.host);

    let mut html = String::with_capacity(256 + page.paths.len() * 96);
    write!(html, "<!DOCTYPE html>\n<html>\n<h1>{host}</h1>\n<ul>\n").map_err(fail)?;
    for path in &page.paths {
        let import = html_escape(&format!("{}{}", page.host, path));
        writeln!(
            html,
            r#"<li><a href="{}/{import}">{import}</a></li>"#,
            html_escape(page.docs_url)
        )
        .map_err(fail)?;
    }
    html.push_str("</ul>\n");

    if !page.rules.is_empty() {
        html.push_str("<ul>\n");
        for rule in &page.rules {
            writeln!(
                html,
                "<li>{host}{} will clone repository {}</li>",
                html_escape(&rule.pattern),
                html_escape(rule.repo)
            )
            .map_err(fail)?;
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</html>\n");

    Ok(html)
}
