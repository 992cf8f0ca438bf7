use crate::loader::{closed_url, local_host, serve};
use crate::run::*;
use crate::view::ViewConfig;
use color_eyre::eyre::{Report, Result};
use tokio_test::block_on;

#[test]
fn status_tabulates_each_locator_once() -> Result<(), Report> {
    let ready = serve("200 OK", "function Browser() {}", 1);
    let failed = closed_url();
    let args = StatusArgs { config: None, script: vec![ready.clone(), failed.clone(), ready.clone()] };

    let table = block_on(status_with(&args, local_host()))?.to_string();
    let cells = |locator: &str| -> Vec<String> {
        let row = table.lines().find(|l| l.contains(locator)).unwrap_or_default();
        row.split('|').map(str::trim).filter(|c| !c.is_empty()).map(String::from).collect()
    };

    assert_eq!(cells(&ready), [ready.as_str(), "ready", "2"], "{table}");
    assert_eq!(cells(&failed), [failed.as_str(), "error", "1"], "{table}");
    assert_eq!(table.lines().filter(|l| l.contains("lib.js")).count(), 2);
    Ok(())
}

#[test]
fn render_writes_page_when_ready() -> Result<(), Report> {
    let url = serve("200 OK", "function Browser() {}", 1);
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("view.html");
    let args = RenderArgs { config: None, script: Some(url.clone()), output: Some(output.clone()), inline: true };

    block_on(render_with(&args, local_host()))?;

    let page = std::fs::read_to_string(&output)?;
    assert!(page.contains("function Browser() {}"));
    assert!(page.contains("Script status: <b>ready</b>"));
    assert!(page.contains(r#"<div id="svgHolder"></div>"#));
    Ok(())
}

#[test]
fn render_fails_when_script_errors() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("view.html");
    let args = RenderArgs { config: None, script: Some(closed_url()), output: Some(output.clone()), inline: false };

    let result = block_on(render_with(&args, local_host()));
    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn render_reads_config() -> Result<(), Report> {
    let url = serve("200 OK", "function Browser() {}", 1);
    let dir = tempfile::tempdir()?;

    let mut config = ViewConfig { script: url, ..Default::default() };
    config.browser.chr = "X".to_string();
    let config_path = dir.path().join("view.json");
    config.write(&config_path)?;

    let output = dir.path().join("view.html");
    let args = RenderArgs { config: Some(config_path), script: None, output: Some(output.clone()), inline: false };
    block_on(render_with(&args, local_host()))?;

    let page = std::fs::read_to_string(&output)?;
    assert!(page.contains(r#""chr": "X""#));
    assert!(page.contains(&format!(r#"<script src="{}"></script>"#, config.script)));
    Ok(())
}
