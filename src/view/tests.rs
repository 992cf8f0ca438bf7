use crate::loader::LoadStatus;
use crate::view::*;
use color_eyre::eyre::{Report, Result};
use strum::IntoEnumIterator;

#[test]
fn default_config_matches_hg19_view() -> Result<(), Report> {
    let config = BrowserConfig::default();
    let payload = serde_json::to_value(&config)?;

    assert_eq!(payload["chr"], "22");
    assert_eq!(payload["viewStart"], 30_700_000);
    assert_eq!(payload["viewEnd"], 30_900_000);
    assert_eq!(payload["coordSystem"]["ucscName"], "hg19");
    assert_eq!(payload["coordSystem"]["taxon"], 9606);

    let names: Vec<_> = config.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Genome", "Genes", "Repeats", "Conservation"]);

    assert_eq!(payload["sources"][0]["twoBitURI"], "//www.biodalliance.org/datasets/hg19.2bit");
    assert_eq!(payload["sources"][1]["collapseSuperGroups"], true);
    assert_eq!(payload["sources"][3]["noDownsample"], true);
    // Unset options are left out of the payload.
    assert!(payload["sources"][0].get("desc").is_none());
    assert!(payload.get("pageName").is_none());
    Ok(())
}

#[test]
fn invalid_configs_are_rejected() {
    let mut config = ViewConfig::default();
    config.script = " ".to_string();
    assert!(config.validate().is_err());

    let mut config = ViewConfig::default();
    config.browser.chr = String::new();
    assert!(config.validate().is_err());

    let mut config = ViewConfig::default();
    config.browser.sources.push(Source { name: "Empty".to_string(), ..Default::default() });
    assert!(config.validate().is_err());

    let mut config = ViewConfig::default();
    config.browser.page_name = Some("two words".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn read_rejects_invalid_file() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;

    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "{ not json")?;
    assert!(ViewConfig::read(&path).is_err());

    let mut config = ViewConfig::default();
    config.browser.view_end = 0;
    let path = dir.path().join("backwards.json");
    config.write(&path)?;
    assert!(ViewConfig::read(&path).is_err());

    assert!(ViewConfig::read(dir.path().join("missing.json")).is_err());
    Ok(())
}

#[test]
fn gate_only_opens_when_ready() -> Result<(), Report> {
    let config = ViewConfig::default();
    let fragment = TrustedFragment::browser(&config)?;

    for status in LoadStatus::iter() {
        let view = render_view(status, &config.script, &fragment);
        match status {
            LoadStatus::Ready => {
                assert!(view.contains("<em>dalliance-compiled.js</em> Script status: <b>ready</b>"));
                assert!(view.contains(fragment.as_str()));
            }
            _ => assert!(view.is_empty(), "{status} rendered: {view}"),
        }
    }
    Ok(())
}

#[test]
fn fragment_mounts_into_page_name() -> Result<(), Report> {
    let mut config = ViewConfig::default();
    config.browser.page_name = Some("genome".to_string());
    let fragment = TrustedFragment::browser(&config)?;

    assert!(fragment.as_str().contains(r#""pageName": "genome""#));
    assert!(fragment.as_str().contains(r#"<div id="genome"></div>"#));
    assert!(!fragment.as_str().contains("svgHolder"));
    Ok(())
}

#[test]
fn fragment_payload_cannot_close_script() -> Result<(), Report> {
    let mut config = ViewConfig::default();
    config.browser.sources[0].desc = Some("</script><script>alert(1)</script>".to_string());
    let fragment = TrustedFragment::browser(&config)?;

    assert_eq!(fragment.as_str().matches("</script>").count(), 1);
    assert!(fragment.as_str().contains(r#"<\/script><script>alert(1)<\/script>"#));
    Ok(())
}

#[test]
fn page_inlines_source() -> Result<(), Report> {
    let config = ViewConfig::default();
    let fragment = TrustedFragment::browser(&config)?;
    let source = "var Browser = function(){}; // </script>";

    let page = render_page(LoadStatus::Ready, &config.script, &fragment, Some(source));
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("var Browser = function(){}; // <\\/script>"));
    assert!(!page.contains(r#"<script src="#));
    assert!(page.contains("<title>dalliance-compiled.js</title>"));
    Ok(())
}

#[test]
fn script_name_is_escaped() -> Result<(), Report> {
    let config = ViewConfig::default();
    let fragment = TrustedFragment::browser(&config)?;

    let view = render_view(LoadStatus::Ready, "https://example.org/<b>.js", &fragment);
    assert!(view.contains("<em>&lt;b&gt;.js</em>"));
    Ok(())
}
