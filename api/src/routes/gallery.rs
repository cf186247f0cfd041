//! The gallery: an index of every discovered app.

use axum::{extract::State, response::Html, Extension};
use chrono::{DateTime, Utc};
use common::{app_url, discover_apps, escape_html, AppKind, AppRegistry, RequestContext};

use crate::state::GalleryState;

/// Display-only values taken from the request.
#[derive(Debug, Clone)]
pub struct GalleryContext {
    /// Render time shown in the footer.
    pub generated_at: DateTime<Utc>,
    /// Client address shown in the footer.
    pub client_ip: String,
}

impl GalleryContext {
    /// Context for the request being served.
    pub fn from_request(ctx: &RequestContext) -> Self {
        Self {
            generated_at: ctx.started_at,
            client_ip: ctx.client_ip_display(),
        }
    }
}

/// Sections in display order.
const SECTIONS: [(AppKind, &str, &str); 3] = [
    (AppKind::Tsx, "TSX Apps", "Compiled on request"),
    (AppKind::Folder, "Folder Apps", "Built apps with their own assets"),
    (AppKind::Html, "HTML Apps", "Standalone pages"),
];

/// `GET /apps` and `GET /apps/`
pub async fn gallery(
    State(state): State<GalleryState>,
    Extension(ctx): Extension<RequestContext>,
) -> Html<String> {
    let registry = discover_apps(&state.layout).await;
    tracing::debug!(
        request_id = %ctx.request_id,
        total = registry.total(),
        tsx = registry.tsx_apps.len(),
        folder = registry.folder_apps.len(),
        html = registry.html_apps.len(),
        "Rendering gallery"
    );
    Html(render_gallery(&registry, &GalleryContext::from_request(&ctx)))
}

/// Render the gallery page for `registry`.
///
/// Every app gets exactly one `href="/apps/{name}"` anchor; nothing else on
/// the page links under `/apps/`.
pub fn render_gallery(registry: &AppRegistry, ctx: &GalleryContext) -> String {
    let body = if registry.is_empty() {
        r#"<section class="empty">
      <h2>No apps yet</h2>
      <p>Drop a <code>.tsx</code> file into <code>public/apps/tsx</code>, an <code>.html</code> file into <code>public/apps/html</code>, or a folder with an <code>index.html</code> into <code>public/apps</code>.</p>
    </section>"#
            .to_string()
    } else {
        SECTIONS
            .iter()
            .map(|(kind, title, blurb)| render_section(registry, *kind, title, blurb))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let counts = SECTIONS
        .iter()
        .map(|(kind, _, _)| {
            format!(
                r#"<span class="count {kind}">{n} {kind}</span>"#,
                n = registry.apps(*kind).len()
            )
        })
        .collect::<Vec<_>>()
        .join("");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Vibe Apps</title>
  <style>
    body {{ font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; }}
    header, main, footer {{ max-width: 72rem; margin: 0 auto; padding: 1.5rem 2rem; }}
    h1 {{ margin: 0 0 0.5rem; }}
    .counts {{ display: flex; gap: 0.75rem; }}
    .count {{ background: #1e293b; border-radius: 999px; padding: 0.2rem 0.8rem; font-size: 0.85rem; }}
    section {{ margin-bottom: 2rem; }}
    .blurb {{ color: #94a3b8; margin-top: -0.5rem; }}
    .grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(14rem, 1fr)); gap: 1rem; list-style: none; padding: 0; }}
    .card {{ display: block; background: #1e293b; border: 1px solid #334155; border-radius: 0.75rem; padding: 1rem; color: inherit; text-decoration: none; }}
    .card:hover {{ border-color: #38bdf8; }}
    .kind {{ color: #38bdf8; font-size: 0.75rem; text-transform: uppercase; }}
    .empty {{ text-align: center; color: #94a3b8; padding: 4rem 0; }}
    footer {{ color: #64748b; font-size: 0.8rem; }}
  </style>
</head>
<body>
  <header>
    <h1>Vibe Apps</h1>
    <div class="counts">{counts}</div>
  </header>
  <main>
    {body}
  </main>
  <footer>
    Generated {generated} for {client_ip}
  </footer>
</body>
</html>
"#,
        generated = ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        client_ip = escape_html(&ctx.client_ip),
    )
}

fn render_section(registry: &AppRegistry, kind: AppKind, title: &str, blurb: &str) -> String {
    let apps = registry.apps(kind);
    if apps.is_empty() {
        return String::new();
    }

    let cards = apps
        .names()
        .map(|name| {
            let href = escape_html(&app_url(name));
            let name = escape_html(name);
            format!(
                r#"<li><a class="card" href="{href}"><span class="kind">{kind}</span><h3>{name}</h3></a></li>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");

    format!(
        r#"<section class="{kind}">
      <h2>{title} ({count})</h2>
      <p class="blurb">{blurb}</p>
      <ul class="grid">
        {cards}
      </ul>
    </section>"#,
        count = apps.len(),
    )
}
