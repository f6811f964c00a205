//! End-to-end tests for an assembled Mosaic instance

use mosaic::{Mosaic, MosaicSettings};
use rstest::*;
use std::fs;
use tempfile::TempDir;

struct Site {
	dir: TempDir,
	mosaic: Mosaic,
}

#[fixture]
fn site() -> Site {
	let dir = TempDir::new().unwrap();
	let root = dir.path();
	fs::create_dir_all(root.join("components/forms")).unwrap();
	fs::create_dir_all(root.join("pages/blog")).unwrap();

	fs::write(
		root.join("components/card.component"),
		"export Card = {\n\
		 \trender: `<div class=\"card\"><h2>{{ title }}</h2>{{ children | safe }}</div>`,\n\
		 \tstyles: `.card { border: 1px solid; }`,\n\
		 };\n",
	)
	.unwrap();
	fs::write(
		root.join("components/forms/button.component"),
		"export Button = {\n\
		 \trender: `<button class=\"btn-{{ size }}\">{{ children | safe }}</button>`,\n\
		 \tstyles: `.btn-large { font-size: 2rem; }`,\n\
		 };\n",
	)
	.unwrap();
	fs::write(root.join("components/footer.html"), "<footer>fin</footer>").unwrap();

	fs::write(
		root.join("pages/index.html"),
		"<html><head><title>Home</title></head><body><Card title=\"Hi\">x</Card></body></html>",
	)
	.unwrap();
	fs::write(
		root.join("pages/blog/post.html"),
		"<html><body><Button size=\"large\">Read</Button></body></html>",
	)
	.unwrap();
	fs::write(root.join("mosaic.toml"), "client_script = \"/static/mosaic.js\"\n").unwrap();

	let settings = MosaicSettings::from_file(root.join("mosaic.toml")).unwrap();
	let mosaic = Mosaic::from_settings(settings);
	Site { dir, mosaic }
}

#[rstest]
fn test_settings_file_resolves_relative_dirs(site: Site) {
	let settings = site.mosaic.settings();
	assert_eq!(settings.components_dir, site.dir.path().join("components"));
	assert_eq!(settings.pages_dir, site.dir.path().join("pages"));
	assert_eq!(settings.client_script.as_deref(), Some("/static/mosaic.js"));
}

#[rstest]
fn test_preload_counts_components_and_raw_files(site: Site) {
	let summary = site.mosaic.preload_summary().unwrap();
	assert_eq!(summary.loaded, 2);
	assert_eq!(summary.failed, 0);
	assert!(site.mosaic.registry().contains("Button"));
	assert!(site.mosaic.registry().contains("Card"));
}

#[rstest]
fn test_render_page_mounts_and_injects_head(site: Site) {
	let page = site.mosaic.render_page(
		"<html><head><title>T</title></head><body>\
		 <Card title=\"Welcome\"><Button size=\"large\">Go</Button></Card>\
		 <component src=\"footer.html\" />\
		 </body></html>",
	);

	assert_eq!(page.content_type, "text/html; charset=utf-8");
	let body = &page.body;
	assert!(body.contains(r#"<div class="card"><h2>Welcome</h2><button class="btn-large">Go</button></div>"#));
	assert!(body.contains("<footer>fin</footer>"));
	assert!(body.contains(".card { border: 1px solid; }"));
	assert!(body.contains(".btn-large { font-size: 2rem; }"));
	assert!(body.contains(r#"<script src="/static/mosaic.js" data-mosaic-client defer></script>"#));
	assert_eq!(body.matches("data-mosaic-styles").count(), 1);
	assert!(body.find("data-mosaic-styles").unwrap() < body.find("</head>").unwrap());
	assert!(!body.contains("<Card"));
	assert!(!body.contains("<Button"));
}

#[rstest]
fn test_mount_is_idempotent(site: Site) {
	let once = site.mosaic.mount("<html><body><Card title=\"A\">b</Card></body></html>");
	let twice = site.mosaic.mount(&once);
	assert_eq!(once, twice);
}

#[rstest]
fn test_unknown_component_is_reported(site: Site) {
	let report = site.mosaic.mount_with_report("<html><body><Missing /></body></html>");
	assert!(report.has_diagnostics());
	assert!(report.html.contains("<Missing />"));
	assert!(report.html.contains(r#"component "Missing" not found"#));
}

#[rstest]
fn test_pages_and_scan_components(site: Site) {
	let pages = site.mosaic.pages().unwrap();
	assert_eq!(pages.len(), 2);

	let sheet = site.mosaic.scan_components().unwrap();
	assert_eq!(sheet.len(), 2);
	assert!(sheet.contains("Card"));
	assert!(sheet.contains("Button"));
}

#[rstest]
fn test_invalidate_picks_up_rewritten_component(site: Site) {
	let path = site.dir.path().join("components/card.component");
	fs::write(&path, "export Card = { render: `<section>{{ title }}</section>` }").unwrap();
	site.mosaic.registry().invalidate_path(&path);

	// Fragments get the client script prepended
	let html = site.mosaic.mount("<Card title=\"New\" />");
	assert!(html.ends_with("<section>New</section>"));
}

#[cfg(feature = "dev")]
#[rstest]
fn test_hook_refresh_reloads_component(site: Site) {
	use mosaic::{Invalidation, WatchEvent};

	let path = site.dir.path().join("components/card.component");
	fs::write(&path, "export Card = { render: `<article>{{ title }}</article>` }").unwrap();

	let hook = site.mosaic.invalidation_hook();
	let change = hook.handle(&WatchEvent::Modified(path));
	assert!(matches!(change, Invalidation::Reloaded(ref name) if name.as_str() == "Card"));
	assert!(site.mosaic.mount("<Card title=\"Live\" />").ends_with("<article>Live</article>"));
}
