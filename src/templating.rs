use crate::AppState;
use crate::session::{COLOR_SCHEME_HINT, Visitor};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::{collections::HashMap, path::PathBuf, sync::Arc, time::SystemTime};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

const HEADER_TEMPLATE: &str = "_header.html.liquid";
const FOOTER_TEMPLATE: &str = "_footer.html.liquid";

pub struct TemplateEngine {
    template_dir: PathBuf,
    cache: Arc<RwLock<HashMap<String, CachedTemplate>>>,
}

struct CachedTemplate {
    content: String,
    modified: SystemTime,
}

impl TemplateEngine {
    pub fn new(template_dir: PathBuf) -> Self {
        Self {
            template_dir,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn load_template(&self, path: &str) -> Result<String, String> {
        let template_path = self.template_dir.join(path);

        let metadata = tokio::fs::metadata(&template_path)
            .await
            .map_err(|e| format!("Failed to get metadata for {}: {}", path, e))?;

        let modified = metadata
            .modified()
            .map_err(|e| format!("Failed to get modified time: {}", e))?;

        let mut cache = self.cache.write().await;

        if let Some(cached) = cache.get(path)
            && cached.modified >= modified
        {
            debug!("Using cached template for {}", path);
            return Ok(cached.content.clone());
        }

        info!("Loading template: {}", path);

        let content = tokio::fs::read_to_string(&template_path)
            .await
            .map_err(|e| format!("Failed to read template {}: {}", path, e))?;

        cache.insert(
            path.to_string(),
            CachedTemplate {
                content: content.clone(),
                modified,
            },
        );

        Ok(content)
    }

    fn render_source(source: &str, globals: &liquid::Object) -> Result<String, String> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| format!("Failed to create parser: {}", e))?;

        let template = parser
            .parse(source)
            .map_err(|e| format!("Failed to parse template: {}", e))?;

        template
            .render(globals)
            .map_err(|e| format!("Failed to render template: {}", e))
    }

    /// Shared partials see the page's globals. A missing partial renders empty.
    async fn render_partial(&self, name: &str, globals: &liquid::Object) -> String {
        let source = match self.load_template(name).await {
            Ok(source) => source,
            Err(e) => {
                error!("Failed to load {}: {}", name, e);
                return String::new();
            }
        };

        Self::render_source(&source, globals).unwrap_or_else(|e| {
            error!("Failed to render {}: {}", name, e);
            String::new()
        })
    }

    pub async fn render_template(
        &self,
        template_name: &str,
        globals: liquid::Object,
    ) -> Result<String, String> {
        let template_content = self.load_template(template_name).await?;

        let header = self.render_partial(HEADER_TEMPLATE, &globals).await;
        let footer = self.render_partial(FOOTER_TEMPLATE, &globals).await;

        let mut full_globals = globals;
        full_globals.insert(
            "header".into(),
            liquid::model::Value::Scalar(header.into()),
        );
        full_globals.insert(
            "footer".into(),
            liquid::model::Value::Scalar(footer.into()),
        );

        Self::render_source(&template_content, &full_globals)
    }
}

/// Globals every page gets: app name, visitor role and theme, asset URLs.
async fn page_globals(state: &AppState, visitor: &Visitor) -> liquid::Object {
    let style_url = state
        .static_handler
        .get_versioned_url("/static/style.css")
        .await;

    liquid::object!({
        "app_name": state.config.app.name.clone(),
        "role": visitor.role.as_str(),
        "is_authenticated": visitor.is_authenticated(),
        "is_admin": visitor.is_admin(),
        "theme": visitor.theme.as_str(),
        "theme_class": visitor.theme.html_class(),
        "style_url": style_url,
    })
}

/// Renders a full page and flushes the visitor's cookie changes with it.
pub async fn render_page(
    state: &AppState,
    visitor: Visitor,
    template: &str,
    globals: liquid::Object,
    status: StatusCode,
) -> Response {
    let mut all_globals = page_globals(state, &visitor).await;
    all_globals.extend(globals);

    match state
        .template_engine
        .render_template(template, all_globals)
        .await
    {
        Ok(html) => (
            status,
            visitor.jar.into_headers(),
            [("accept-ch", COLOR_SCHEME_HINT)],
            Html(html),
        )
            .into_response(),
        Err(e) => {
            error!("Template rendering error for {}: {}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

pub async fn render_error(
    state: &AppState,
    visitor: Visitor,
    status: StatusCode,
    message: &str,
) -> Response {
    let globals = liquid::object!({
        "status": status.as_u16(),
        "message": message,
    });
    render_page(state, visitor, "error.html.liquid", globals, status).await
}
