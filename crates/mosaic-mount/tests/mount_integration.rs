//! End-to-end mounting against component source files

use mosaic_components::{ComponentRegistry, RegistryConfig};
use mosaic_mount::{DiagnosticKind, MountOptions, Mounter, mount};
use rstest::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
	let path = dir.join(name);
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, content).unwrap();
}

#[fixture]
fn components() -> TempDir {
	let dir = TempDir::new().unwrap();
	write(
		dir.path(),
		"button.component",
		r#"export Button = {
	render: `<button class="btn btn-{{ size }}{% if disabled is defined %} disabled{% endif %}">{{ children | safe }}</button>`,
	styles: `.btn { padding: 0.5rem; }`,
};"#,
	);
	write(
		dir.path(),
		"card.component",
		r#"export Card = {
	render: `<article class="card"><h2>{{ data.title }}</h2>{{ children | safe }}</article>`,
	styles: `.card { border: 1px solid #ddd; }`,
};"#,
	);
	write(
		dir.path(),
		"layout/stack.component",
		"export Stack = { render: `<div class=\"stack\">{{ children | safe }}</div>` }",
	);
	write(dir.path(), "partials/footer.html", "<footer><Button size=\"s\">Top</Button></footer>");
	dir
}

fn mounter_for(dir: &TempDir) -> Mounter {
	let registry = ComponentRegistry::new(RegistryConfig::new(dir.path()));
	registry.preload(dir.path()).unwrap();
	Mounter::new(Arc::new(registry), MountOptions::default())
}

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
	<Stack>
		<Card data={"title": "First"}>
			<Button size="large" disabled>Go</Button>
		</Card>
		<Card data={"title": "Second"}>body</Card>
	</Stack>
	<component src="partials/footer.html" />
</body>
</html>"#;

#[rstest]
fn test_full_page(components: TempDir) {
	let report = mounter_for(&components).mount_with_report(PAGE);

	let expected = r#"<!DOCTYPE html>
<html lang="en"><head><style data-mosaic-styles>
.card { border: 1px solid #ddd; }
.btn { padding: 0.5rem; }
</style></head>
<body>
	<div class="stack"><article class="card"><h2>First</h2><button class="btn btn-large disabled">Go</button></article>
		<article class="card"><h2>Second</h2>body</article></div>
	<footer><button class="btn btn-s">Top</button></footer>
</body>
</html>"#;
	assert_eq!(report.html, expected);
	assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[rstest]
fn test_full_page_is_idempotent(components: TempDir) {
	let mounter = mounter_for(&components);
	let once = mounter.mount(PAGE);
	assert_eq!(mounter.mount(&once), once);
}

#[rstest]
fn test_render_is_pure(components: TempDir) {
	let mounter = mounter_for(&components);
	assert_eq!(mounter.mount(PAGE), mounter.mount(PAGE));
}

#[rstest]
fn test_broken_component_is_reported(components: TempDir) {
	write(components.path(), "broken.component", "export Broken = { styles: `.x{}` }");
	let registry = Arc::new(ComponentRegistry::new(RegistryConfig::new(components.path())));
	let mounter = Mounter::new(registry, MountOptions::default());

	let report = mounter.mount_with_report("<Broken /><Button size=\"m\">ok</Button>");
	assert_eq!(report.diagnostics.len(), 1);
	assert_eq!(report.diagnostics[0].kind, DiagnosticKind::ComponentLoadFailure);
	assert!(report.html.contains("<Broken />"));
	assert!(report.html.ends_with(r#"<button class="btn btn-m">ok</button>"#));
}

#[rstest]
fn test_invalidate_then_rewrite(components: TempDir) {
	let registry = Arc::new(ComponentRegistry::new(RegistryConfig::new(components.path())));
	let mounter = Mounter::new(Arc::clone(&registry), MountOptions::default());
	assert_eq!(
		mounter.mount("<Stack>a</Stack>"),
		r#"<div class="stack">a</div>"#
	);

	write(
		components.path(),
		"layout/stack.component",
		"export Stack = { render: `<section>{{ children | safe }}</section>`, styles: `section{}` }",
	);
	assert_eq!(
		mounter.mount("<Stack>a</Stack>"),
		r#"<div class="stack">a</div>"#
	);

	assert!(registry.invalidate("Stack"));
	assert_eq!(
		mounter.mount("<Stack>a</Stack>"),
		"<style data-mosaic-styles>\nsection{}\n</style><section>a</section>"
	);
}

#[rstest]
fn test_free_function_mount(components: TempDir) {
	let out = mount(r#"<Button size="xs">x</Button>"#, components.path());
	assert_eq!(
		out,
		"<style data-mosaic-styles>\n.btn { padding: 0.5rem; }\n</style><button class=\"btn btn-xs\">x</button>"
	);
}
