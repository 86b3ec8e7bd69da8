//! End-to-end runs over a throwaway site.

use site_rename::{Config, RedirectEntry, RenameError, engine, redirects};
use std::fs;
use tempfile::TempDir;

fn site(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, contents) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

const NAV: &str = r#"module.exports = {
  pathPrefix: "/docs/",
  siteMetadata: {
    subPages: [
      { title: "Setup", path: "/Guides/GettingStarted.md" },
      { title: "API", path: "/API_Reference/index.md#auth" },
    ],
  },
};
"#;

const REDIRECTS: &str = r#"{"total":2,"offset":0,"limit":2,"data":[
  {"Source":"/docs/MyPage","Destination":"/docs/elsewhere"},
  {"Source":"/docs/legacy","Destination":"/docs/API_Reference/"}
],":type":"sheet"}"#;

fn sample_site() -> TempDir {
    site(&[
        (
            "src/pages/index.md",
            "# Home\n\n[Start](./Guides/GettingStarted.md)\n[Page](MyPage)\n[API](API_Reference/index.md#auth)\n",
        ),
        ("src/pages/MyPage.md", "[Back](./index.md)\n"),
        (
            "src/pages/Guides/GettingStarted.md",
            "[Page](../MyPage.md) [Self](GettingStarted.md#top)\n",
        ),
        ("src/pages/API_Reference/index.md", "# API\n"),
        ("src/pages/config.md", "- pathPrefix:\n    - /docs/\n"),
        ("src/pages/redirects.json", REDIRECTS),
        ("gatsby-config.js", NAV),
    ])
}

#[test]
fn renames_files_and_rewrites_every_reference() {
    let dir = sample_site();
    let report = engine::run(&Config::new(dir.path())).unwrap();

    assert_eq!(report.diagnostics.renames, 3);

    assert!(dir.path().join("src/pages/my-page.md").is_file());
    assert!(dir.path().join("src/pages/guides/getting-started.md").is_file());
    assert!(dir.path().join("src/pages/api-reference/index.md").is_file());
    assert!(!dir.path().join("src/pages/Guides").exists());
    assert!(!dir.path().join("src/pages/API_Reference").exists());

    assert_eq!(
        read(&dir, "src/pages/index.md"),
        "# Home\n\n[Start](./guides/getting-started.md)\n[Page](my-page)\n[API](api-reference/index.md#auth)\n"
    );
    assert_eq!(
        read(&dir, "src/pages/guides/getting-started.md"),
        "[Page](../my-page.md) [Self](../guides/getting-started.md#top)\n"
    );
    assert_eq!(read(&dir, "src/pages/my-page.md"), "[Back](./index.md)\n");

    let nav = read(&dir, "gatsby-config.js");
    assert!(nav.contains(r#"path: "/guides/getting-started.md""#));
    assert!(nav.contains(r#"path: "/api-reference/index.md#auth""#));
}

#[test]
fn migrates_redirects_without_dropping_rules() {
    let dir = sample_site();
    engine::run(&Config::new(dir.path())).unwrap();

    let entries = redirects::read(&dir.path().join("src/pages/redirects.json")).unwrap();
    let expected = [
        RedirectEntry::new("/docs/MyPage", "/docs/elsewhere"),
        RedirectEntry::new("/docs/legacy", "/docs/api-reference/"),
        RedirectEntry::new("/docs/my-page", "/docs/elsewhere"),
        RedirectEntry::new("/docs/API_Reference/", "/docs/api-reference/"),
        RedirectEntry::new("/docs/Guides/GettingStarted", "/docs/guides/getting-started"),
        RedirectEntry::new("/docs/MyPage", "/docs/my-page"),
    ];
    assert_eq!(entries, expected);

    let raw = read(&dir, "src/pages/redirects.json");
    assert!(raw.starts_with(r#"{"total":6,"offset":0,"limit":6,"data":["#));
    assert!(raw.ends_with(r#"":type":"sheet"}"#));
}

#[test]
fn second_run_is_a_no_op() {
    let dir = sample_site();
    let config = Config::new(dir.path());
    engine::run(&config).unwrap();

    let before = read(&dir, "src/pages/redirects.json");
    let plan = engine::plan(&config).unwrap();
    assert!(plan.is_empty());
    plan.apply(&config).unwrap();
    assert_eq!(read(&dir, "src/pages/redirects.json"), before);
}

#[test]
fn conflicting_names_abort_before_any_change() {
    let dir = site(&[
        ("src/pages/index.md", "[a](MyPage.md) [b](my_page.md)"),
        ("src/pages/MyPage.md", "one"),
        ("src/pages/my_page.md", "two"),
    ]);

    let err = engine::run(&Config::new(dir.path())).unwrap_err();
    assert!(matches!(err, RenameError::Conflict { .. }));
    assert_eq!(read(&dir, "src/pages/index.md"), "[a](MyPage.md) [b](my_page.md)");
    assert!(dir.path().join("src/pages/MyPage.md").is_file());
    assert!(dir.path().join("src/pages/my_page.md").is_file());
}

#[test]
fn invalid_prefix_aborts_before_any_change() {
    let dir = site(&[
        ("src/pages/MyPage.md", ""),
        ("src/pages/config.md", "- pathPrefix:\n    - /\n"),
        ("src/pages/redirects.json", r#"{"data":[]}"#),
    ]);

    let err = engine::run(&Config::new(dir.path())).unwrap_err();
    assert!(err.to_string().contains("not allowed"));
    assert!(dir.path().join("src/pages/MyPage.md").is_file());
    assert!(!dir.path().join("src/pages/my-page.md").exists());
}
