//! Gating and rendering of the script-dependent markup.

use crate::loader::LoadStatus;
use crate::view::ViewConfig;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use indoc::formatdoc;
use std::fmt::{Display, Formatter};

// ----------------------------------------------------------------------------
// Trusted Fragment
// ----------------------------------------------------------------------------

/// Markup that starts the genome browser: the `new Browser({...})` call with
/// the serialized [`BrowserConfig`](crate::view::BrowserConfig), followed by
/// the mount element.
///
/// [`TrustedFragment::browser`] is the only way to build one, so the
/// fragment's script only ever carries the serialized payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrustedFragment {
    html: String,
}

impl TrustedFragment {
    /// Render the browser fragment for a [`ViewConfig`].
    ///
    /// ```rust
    /// use dalliance::view::{TrustedFragment, ViewConfig};
    ///
    /// let fragment = TrustedFragment::browser(&ViewConfig::default())?;
    /// assert!(fragment.as_str().contains("new Browser("));
    /// assert!(fragment.as_str().contains(r#"<div id="svgHolder"></div>"#));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn browser(config: &ViewConfig) -> Result<Self, Report> {
        let payload = serde_json::to_string_pretty(&config.browser)
            .wrap_err(eyre!("Failed to serialize browser config: {:?}", config.browser))?;
        // Keep the payload from closing its own script element.
        let payload = payload.replace("</", "<\\/");
        let mount = escape(config.browser.mount_id());

        let html = formatdoc!(
            r#"
            <script language="javascript">
            new Browser({payload});
            </script>

            <div id="{mount}"></div>
            "#
        );
        Ok(TrustedFragment { html })
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }
}

impl Display for TrustedFragment {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.html)
    }
}

// ----------------------------------------------------------------------------
// Gate
// ----------------------------------------------------------------------------

/// Returns the dependent content only when the script is [`LoadStatus::Ready`].
///
/// ```rust
/// use dalliance::view::{gate, TrustedFragment, ViewConfig};
/// use dalliance::LoadStatus;
/// use strum::IntoEnumIterator;
///
/// let fragment = TrustedFragment::browser(&ViewConfig::default())?;
/// for status in LoadStatus::iter() {
///     assert_eq!(gate(status, &fragment).is_some(), status == LoadStatus::Ready);
/// }
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn gate(status: LoadStatus, fragment: &TrustedFragment) -> Option<&TrustedFragment> {
    (status == LoadStatus::Ready).then_some(fragment)
}

/// The file name of a script locator, for display.
///
/// ```rust
/// use dalliance::view::script_name;
///
/// assert_eq!(script_name("http://www.biodalliance.org/release-0.13/dalliance-compiled.js"), "dalliance-compiled.js");
/// assert_eq!(script_name("lib.js?v=2"), "lib.js");
/// ```
pub fn script_name(locator: &str) -> &str {
    let path = locator.split(['?', '#']).next().unwrap_or(locator);
    path.trim_end_matches('/').rsplit('/').next().filter(|name| !name.is_empty()).unwrap_or(locator)
}

/// Render the view: the script status line and the browser fragment.
///
/// Nothing is rendered unless the script is [`LoadStatus::Ready`].
pub fn render_view(status: LoadStatus, locator: &str, fragment: &TrustedFragment) -> String {
    let Some(fragment) = gate(status, fragment) else {
        return String::new();
    };
    let script = escape(script_name(locator));
    formatdoc!(
        r#"
        <div>
        <em>{script}</em> Script status: <b>{status}</b>
        {fragment}</div>
        "#
    )
}

/// Render a standalone HTML page around [`render_view`].
///
/// The script is referenced by its locator, or embedded when its `source` is
/// given.
///
/// ```rust
/// use dalliance::view::{render_page, TrustedFragment, ViewConfig};
/// use dalliance::LoadStatus;
///
/// let config = ViewConfig::default();
/// let fragment = TrustedFragment::browser(&config)?;
/// let page = render_page(LoadStatus::Ready, &config.script, &fragment, None);
/// assert!(page.contains(&format!(r#"<script src="{}"></script>"#, config.script)));
/// assert!(page.contains("Script status: <b>ready</b>"));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn render_page(
    status: LoadStatus,
    locator: &str,
    fragment: &TrustedFragment,
    source: Option<&str>,
) -> String {
    let script = match source {
        Some(source) => format!("<script>\n{}\n</script>", source.replace("</script", "<\\/script")),
        None => format!(r#"<script src="{}"></script>"#, escape(locator)),
    };
    let title = escape(script_name(locator));
    let view = render_view(status, locator, fragment);

    formatdoc!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
        <meta charset="utf-8">
        <title>{title}</title>
        {script}
        </head>
        <body>
        {view}</body>
        </html>
        "#
    )
}

/// Escape text for HTML element content and attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
