//! HTML pages.
//!
//! Templates are compiled into the binary and parsed once at startup.
//! Names ending in `.html` are autoescaped.

use std::sync::Arc;

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

pub type Templates = Arc<Tera>;

const TEMPLATES: [(&str, &str); 4] = [
	("base.html", include_str!("../templates/base.html")),
	("index.html", include_str!("../templates/index.html")),
	("post/new.html", include_str!("../templates/post/new.html")),
	("post/show.html", include_str!("../templates/post/show.html")),
];

/// Parses the bundled templates.
pub fn templates() -> Result<Tera, tera::Error> {
	let mut tera = Tera::default();

	tera.add_raw_templates(TEMPLATES)?;
	Ok(tera)
}

/// Renders `name` with the fields of `data` as its context.
pub fn page<T>(templates: &Tera, name: &str, data: &T) -> Result<Html<String>, tera::Error>
where
	T: Serialize,
{
	let context = Context::from_serialize(data)?;

	templates.render(name, &context).map(Html)
}
