//! Template engine setup and rendering.
//!
//! # Responsibilities
//! - Load user templates from the configured directory
//! - Fall back to the built-in `list`/`show`/`view` and `404` templates
//! - Render a `RenderResult` into HTML
//!
//! # Design Decisions
//! - Templates are loaded lazily and cached by the environment
//! - User templates shadow built-ins of the same name
//! - `.html` templates are auto-escaped

use minijinja::{context, path_loader, Environment};
use thiserror::Error;

use crate::config::TemplateConfig;
use crate::render::context::RenderResult;

const LIST_TEMPLATE: &str = include_str!("../../templates/couchdb/list.html");
const SHOW_TEMPLATE: &str = include_str!("../../templates/couchdb/show.html");
const VIEW_TEMPLATE: &str = include_str!("../../templates/couchdb/view.html");
const NOT_FOUND_TEMPLATE: &str = include_str!("../../templates/404.html");

/// Name of the template rendered for not-found responses.
pub const NOT_FOUND_TEMPLATE_NAME: &str = "404.html";

#[derive(Debug, Error)]
#[error("failed to render template '{template}': {source}")]
pub struct RenderError {
    pub template: String,
    #[source]
    pub source: minijinja::Error,
}

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new(config: &TemplateConfig) -> Self {
        let mut env = Environment::new();
        let namespace = config.namespace.clone();
        let user_templates = config.directory.clone().map(path_loader);

        env.set_loader(move |name: &str| {
            if let Some(load) = &user_templates {
                if let Some(source) = load(name)? {
                    return Ok(Some(source));
                }
            }
            Ok(builtin_template(&namespace, name).map(str::to_owned))
        });

        Self { env }
    }

    /// Render a successful upstream response.
    pub fn render(&self, result: &RenderResult) -> Result<String, RenderError> {
        self.render_named(&result.template_name, &result.context)
    }

    /// Render the standard not-found page for `path`.
    pub fn render_not_found(&self, path: &str) -> Result<String, RenderError> {
        self.render_named(NOT_FOUND_TEMPLATE_NAME, context! { path => path })
    }

    fn render_named<S: serde::Serialize>(&self, name: &str, ctx: S) -> Result<String, RenderError> {
        let wrap = |source: minijinja::Error| RenderError {
            template: name.to_string(),
            source,
        };
        let template = self.env.get_template(name).map_err(wrap)?;
        template.render(ctx).map_err(wrap)
    }
}

fn builtin_template(namespace: &str, name: &str) -> Option<&'static str> {
    if name == NOT_FOUND_TEMPLATE_NAME {
        return Some(NOT_FOUND_TEMPLATE);
    }
    let file = name.strip_prefix(namespace)?.strip_prefix('/')?;
    match file {
        "list.html" => Some(LIST_TEMPLATE),
        "show.html" => Some(SHOW_TEMPLATE),
        "view.html" => Some(VIEW_TEMPLATE),
        _ => None,
    }
}
