//! HTML documents wrapping a compiled bundle, and the compile error page.
//!
//! The bundle keeps `react`, `react-dom` and `react/jsx-runtime` as bare
//! imports. The document loads the UMD builds from a CDN and installs an
//! import map pointing those specifiers at tiny `data:` modules that re-export
//! `window.React` / `window.ReactDOM`. The bundle itself is imported from a
//! `Blob` URL and its default export is mounted on `#root`.

use common::escape_html;
use serde_json::json;

const REACT_UMD: &str = "https://unpkg.com/react@18/umd/react.production.min.js";
const REACT_DOM_UMD: &str = "https://unpkg.com/react-dom@18/umd/react-dom.production.min.js";
const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const REACT_EXPORTS: &[&str] = &[
    "Children", "Component", "Fragment", "PureComponent", "StrictMode", "Suspense",
    "cloneElement", "createContext", "createElement", "createRef", "forwardRef",
    "isValidElement", "lazy", "memo", "startTransition", "useCallback", "useContext",
    "useDebugValue", "useDeferredValue", "useEffect", "useId", "useImperativeHandle",
    "useInsertionEffect", "useLayoutEffect", "useMemo", "useReducer", "useRef",
    "useState", "useSyncExternalStore", "useTransition", "version",
];

const REACT_DOM_EXPORTS: &[&str] = &[
    "createPortal", "createRoot", "findDOMNode", "flushSync", "hydrate", "hydrateRoot",
    "render", "unmountComponentAtNode", "version",
];

/// `jsx`/`jsxs`/`jsxDEV` on top of `React.createElement`; extra dev
/// arguments (static flag, source, owner) are ignored.
const JSX_RUNTIME_MODULE: &str = "const R = window.React;\
function jsx(type, props, key) {\
  const { children, ...rest } = props || {};\
  if (key !== undefined) rest.key = key;\
  if (children === undefined) return R.createElement(type, rest);\
  return Array.isArray(children) ? R.createElement(type, rest, ...children) : R.createElement(type, rest, children);\
}\
export { jsx, jsx as jsxs, jsx as jsxDEV };\
export const Fragment = R.Fragment;";

/// ES module source re-exporting `names` from a browser global.
fn global_reexport_module(global: &str, names: &[&str]) -> String {
    let mut module = format!("const G = window.{global};export default G;");
    for name in names {
        module.push_str(&format!("export const {name} = G.{name};"));
    }
    module
}

/// `data:` URL for a JS module, percent-encoding anything URL-significant.
fn js_data_url(source: &str) -> String {
    let mut url = String::from("data:text/javascript;charset=utf-8,");
    for byte in source.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => url.push(byte as char),
            b'-' | b'_' | b'.' | b'~' | b'(' | b')' | b'{' | b'}' | b';' | b',' | b'=' | b':'
            | b'[' | b']' | b'!' | b'*' | b'/' | b'+' | b'|' | b'?' | b'&' | b'<' | b'>' => {
                url.push(byte as char)
            }
            _ => url.push_str(&format!("%{byte:02X}")),
        }
    }
    url
}

/// Import map JSON for the React specifiers the bundle leaves external.
fn import_map() -> String {
    let react = js_data_url(&global_reexport_module("React", REACT_EXPORTS));
    let react_dom = js_data_url(&global_reexport_module("ReactDOM", REACT_DOM_EXPORTS));
    let jsx_runtime = js_data_url(JSX_RUNTIME_MODULE);

    json!({
        "imports": {
            "react": react,
            "react-dom": react_dom,
            "react-dom/client": react_dom,
            "react/jsx-runtime": jsx_runtime,
            "react/jsx-dev-runtime": jsx_runtime,
        }
    })
    .to_string()
}

/// JSON string literal safe to place inside a `<script>` element.
fn script_safe_json_string(text: &str) -> String {
    let json = serde_json::Value::String(text.to_string()).to_string();
    json.replace("</", "<\\/").replace("<!--", "<\\u0021--")
}

/// Full HTML document that runs `bundle` as the app called `app_name`.
pub fn render_document(app_name: &str, bundle: &str) -> String {
    let title = escape_html(app_name);
    let import_map = import_map().replace("</", "<\\/");
    let source = script_safe_json_string(bundle);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{title}</title>
  <script src="{REACT_UMD}" crossorigin></script>
  <script src="{REACT_DOM_UMD}" crossorigin></script>
  <script src="{TAILWIND_CDN}"></script>
  <script type="importmap">{import_map}</script>
  <style>html, body, #root {{ height: 100%; margin: 0; }}</style>
</head>
<body>
  <div id="root"></div>
  <script type="module">
    const source = {source};
    const url = URL.createObjectURL(new Blob([source], {{ type: "text/javascript" }}));
    const container = document.getElementById("root");
    try {{
      const mod = await import(url);
      const App = mod.default;
      if (!App) throw new Error("Module has no default export");
      const element = React.createElement(App);
      if (typeof ReactDOM.createRoot === "function") {{
        ReactDOM.createRoot(container).render(element);
      }} else {{
        ReactDOM.render(element, container);
      }}
    }} catch (err) {{
      console.error(err);
      const pre = document.createElement("pre");
      pre.style.cssText = "color:#b91c1c;padding:1rem;white-space:pre-wrap";
      pre.textContent = String((err && err.stack) || err);
      container.replaceChildren(pre);
    }} finally {{
      URL.revokeObjectURL(url);
    }}
  </script>
</body>
</html>
"#
    )
}

/// Styled error page for a failed compile. Served with status 500.
pub fn render_error_page(app_name: &str, error: &str) -> String {
    let name = escape_html(app_name);
    let error = escape_html(error);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Error compiling {name}</title>
  <style>
    body {{ font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; margin: 0; padding: 2rem; }}
    main {{ max-width: 60rem; margin: 0 auto; }}
    h1 {{ color: #f87171; }}
    pre {{ background: #1e293b; border: 1px solid #334155; border-radius: 0.5rem; padding: 1rem; overflow-x: auto; white-space: pre-wrap; }}
    a {{ color: #38bdf8; }}
  </style>
</head>
<body>
  <main>
    <h1>Compilation Error</h1>
    <p>The app <strong>{name}</strong> could not be compiled.</p>
    <pre>{error}</pre>
    <p><a href="/apps">&larr; Back to the gallery</a></p>
  </main>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let doc = render_document("calculator", "export default function App() {}");
        assert!(doc.contains("<title>calculator</title>"));
        assert!(doc.contains("<script type=\"module\">"));
        assert!(doc.contains("<script type=\"importmap\">"));
        assert!(doc.contains("<div id=\"root\"></div>"));
        assert!(doc.contains("ReactDOM.createRoot"));
        assert!(doc.contains("ReactDOM.render(element, container)"));
        assert!(doc.contains("\"react/jsx-runtime\":\"data:text/javascript"));
    }

    #[test]
    fn test_bundle_cannot_close_script_tag() {
        let doc = render_document("x", "const s = \"</script><script>alert(1)</script>\";export default s;");
        let module_start = doc.find("<script type=\"module\">").unwrap();
        let module_body = &doc[module_start..];
        // The only closing tag in the module block is the real one.
        let first_close = module_body.find("</script>").unwrap();
        assert!(module_body[..first_close].contains("<\\/script>"));
        assert!(module_body[..first_close].contains("URL.revokeObjectURL"));
    }

    #[test]
    fn test_data_urls_have_no_fragment_or_quote() {
        let url = js_data_url(&global_reexport_module("React", REACT_EXPORTS));
        assert!(url.starts_with("data:text/javascript;charset=utf-8,"));
        assert!(!url.contains('#'));
        assert!(!url.contains('"'));
        assert!(!url.contains(' '));
        assert!(url.contains("useState"));
    }

    #[test]
    fn test_error_page_escapes() {
        let page = render_error_page("<bad>", "Unexpected token <div>");
        assert!(page.contains("Compilation Error"));
        assert!(page.contains("&lt;bad&gt;"));
        assert!(page.contains("Unexpected token &lt;div&gt;"));
        assert!(page.contains("href=\"/apps\""));
    }
}
