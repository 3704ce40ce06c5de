//! The dashboard landing page.
//!
//! A static shell around the snapshot JSON: once as a script value the
//! dashboard can pick up, once as text behind a "View Source" toggle.

const VISITOR: &str = "Anon";

/// Render the index page around an already-serialized snapshot.
pub fn render_index(snapshot_json: &str) -> String {
    let script_value = escape_script(snapshot_json);
    let source = escape_html(snapshot_json);
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <title>Jetsam</title>
  <style>
    body {{ font-family: sans-serif; }}
    #snapshot {{ margin: 20px; padding: 20px; border: 1px solid #ccc; background-color: #f9f9f9; }}
  </style>
  <script>
    const model = {script_value};
    function onLoad() {{
      const snapshot = document.getElementById("snapshot");
      function toggleSource() {{
        snapshot.style.display = snapshot.style.display === "none" ? "block" : "none";
      }}
      toggleSource();
      document.getElementById("viewSource").addEventListener("click", toggleSource);
    }}
  </script>
</head>
<body onload="onLoad()">
  <h1>Hello, {VISITOR}</h1>
  <div>
    <button id="viewSource">View Source</button>
    <div id="snapshot"><pre>{source}</pre></div>
  </div>
</body>
</html>
"##
    )
}

// JSON is already a valid script expression; only a closing tag can break
// out of the element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
