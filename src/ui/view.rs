//! HTML and terminal renderings of [`UiState`].

use super::UiState;

const TITLE: &str = "Ai Image Generator";
const SUBTITLE: &str = "Generate images from text prompts";
const LOADING_TEXT: &str = "Running inference...";
const PLACEHOLDER: &str = "[SYSTEM]: Enter visual prompt...";

// Flips the page into its loading state while the form POST is in flight.
// Single quotes only: it is embedded in a double-quoted attribute.
const ON_SUBMIT: &str = "var b=this.querySelector('button');\
if(b.disabled)return false;\
b.disabled=true;b.textContent='PROCES...';\
document.querySelectorAll('.result').forEach(function(e){e.hidden=true});\
document.getElementById('pending').hidden=false;";

const STYLE: &str = r#"
body { margin: 0; min-height: 100vh; background: #0f172a; color: #e2e8f0; font-family: sans-serif; }
main { display: flex; flex-direction: column; align-items: center; padding: 24px 24px 128px; }
h1 { font-size: 2.25rem; background: linear-gradient(to right, #818cf8, #22d3ee); -webkit-background-clip: text; color: transparent; }
.subtitle, .hint { color: #64748b; font-family: monospace; font-size: 0.8rem; text-align: center; }
.stage { flex: 1; display: flex; flex-direction: column; align-items: center; justify-content: center; }
.spinner { width: 48px; height: 48px; border-radius: 50%; border-top: 2px solid #6366f1; border-bottom: 2px solid #6366f1; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.loading p { color: #818cf8; font-family: monospace; }
.thumb { width: 256px; height: 256px; object-fit: cover; border-radius: 12px; border: 2px solid #334155; cursor: zoom-in; }
.error { padding: 16px; background: rgba(127, 29, 29, 0.2); border: 1px solid rgba(239, 68, 68, 0.5); color: #f87171; border-radius: 8px; font-family: monospace; max-width: 28rem; }
#expand { display: none; }
.overlay { display: none; position: fixed; inset: 0; z-index: 50; align-items: center; justify-content: center; background: rgba(0, 0, 0, 0.9); padding: 16px; }
#expand:checked ~ .overlay { display: flex; }
.overlay img { max-width: 100%; max-height: 100%; border-radius: 8px; }
.overlay .close { position: absolute; top: 24px; right: 24px; color: #fff; font-size: 1.9rem; cursor: pointer; }
footer { position: fixed; bottom: 0; left: 0; width: 100%; padding: 24px; box-sizing: border-box; background: rgba(15, 23, 42, 0.8); border-top: 1px solid #1e293b; }
form { max-width: 48rem; margin: 0 auto; display: flex; gap: 12px; }
input[type=text] { flex: 1; background: #0f172a; border: 1px solid #334155; padding: 12px; border-radius: 8px; color: #e0e7ff; font-family: monospace; }
button { background: #4f46e5; color: #fff; font-weight: bold; padding: 12px 24px; border: 0; border-radius: 8px; cursor: pointer; }
button:disabled { background: #1e293b; color: #475569; }
"#;

/// Renders the full page for `state`, with `prompt` kept in the input box.
///
/// The expand toggle is a checkbox so it works without any round trip.
pub fn render_html(state: &UiState, prompt: &str) -> String {
    let mut stage = String::new();

    stage.push_str(&format!(
        r#"<div class="loading" id="pending"{}><div class="spinner"></div><p>{}</p></div>"#,
        if state.loading { "" } else { " hidden" },
        LOADING_TEXT
    ));

    if let (true, Some(image)) = (state.image_visible(), &state.image) {
        stage.push_str(&format!(
            r#"<div class="result"><label for="expand"><img class="thumb" src="{}" alt="Generated Result"></label><p class="hint">Click to expand</p></div>"#,
            escape_html(image)
        ));
    }

    if let Some(error) = &state.error {
        stage.push_str(&format!(
            r#"<div class="result error">{}</div>"#,
            escape_html(&error_line(error))
        ));
    }

    let overlay = match &state.image {
        Some(image) => format!(
            r#"<input type="checkbox" id="expand"{}><label for="expand" class="overlay"><img src="{}" alt="Expanded view"><span class="close">&times;</span></label>"#,
            if state.overlay_visible() { " checked" } else { "" },
            escape_html(image)
        ),
        None => String::new(),
    };

    let (disabled, label) = if state.loading {
        (" disabled", "PROCES...")
    } else {
        ("", "GENERATE")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<main>
<div><h1>{title}</h1><p class="subtitle">{subtitle}</p></div>
<section class="stage">{stage}</section>
{overlay}
</main>
<footer>
<form method="post" action="/" onsubmit="{on_submit}">
<input type="text" name="prompt" placeholder="{placeholder}" value="{prompt}">
<button type="submit"{disabled}>{label}</button>
</form>
</footer>
</body>
</html>
"#,
        title = TITLE,
        style = STYLE,
        subtitle = SUBTITLE,
        stage = stage,
        overlay = overlay,
        placeholder = escape_html(PLACEHOLDER),
        prompt = escape_html(prompt),
        disabled = disabled,
        label = label,
        on_submit = ON_SUBMIT,
    )
}

/// Renders `state` as terminal lines.
pub fn render_text(state: &UiState) -> String {
    let mut lines = Vec::new();

    if state.loading {
        lines.push(LOADING_TEXT.to_string());
    }
    if let (true, Some(image)) = (state.image_visible(), &state.image) {
        lines.push(format!("Image ready ({} chars of data URI)", image.len()));
    }
    if let Some(error) = &state.error {
        lines.push(error_line(error));
    }

    lines.join("\n")
}

fn error_line(message: &str) -> String {
    format!("> ERROR: {}", message)
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_image() -> UiState {
        UiState {
            image: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
            ..UiState::default()
        }
    }

    #[test]
    fn test_initial_page_has_form_and_no_panels() {
        let html = render_html(&UiState::default(), "");
        assert!(html.contains("<title>Ai Image Generator</title>"));
        assert!(html.contains(r#"name="prompt""#));
        assert!(html.contains(">GENERATE</button>"));
        assert!(html.contains(r#"<div class="loading" id="pending" hidden>"#));
        assert!(!html.contains(r#"class="result error""#));
        assert!(!html.contains("Generated Result"));
    }

    #[test]
    fn test_form_switches_to_loading_on_submit() {
        let html = render_html(&UiState::default(), "");
        let form = html
            .lines()
            .find(|line| line.starts_with("<form"))
            .unwrap();

        assert!(form.contains(r#"onsubmit=""#));
        assert!(form.contains("b.disabled=true"));
        assert!(form.contains("b.textContent='PROCES...'"));
        assert!(form.contains("getElementById('pending').hidden=false"));
        assert!(form.contains("if(b.disabled)return false"));
        // The handler must not terminate the attribute early.
        assert_eq!(form.matches('"').count(), 6);
    }

    #[test]
    fn test_loading_disables_button() {
        let state = UiState {
            loading: true,
            ..UiState::default()
        };
        let html = render_html(&state, "a red fox");
        assert!(html.contains(r#"<div class="loading" id="pending">"#));
        assert!(html.contains(r#"<button type="submit" disabled>PROCES...</button>"#));
        assert!(html.contains(r#"value="a red fox""#));
    }

    #[test]
    fn test_image_renders_data_uri() {
        let html = render_html(&with_image(), "a red fox");
        assert!(html.contains(r#"<img class="thumb" src="data:image/png;base64,iVBORw0KGgo=""#));
        assert!(html.contains("Click to expand"));
        assert!(html.contains(r#"<input type="checkbox" id="expand">"#));
    }

    #[test]
    fn test_expanded_overlay_starts_checked() {
        let state = UiState {
            expanded: true,
            ..with_image()
        };
        let html = render_html(&state, "");
        assert!(html.contains(r#"<input type="checkbox" id="expand" checked>"#));
        assert!(html.contains("Expanded view"));
    }

    #[test]
    fn test_image_hidden_while_loading() {
        let state = UiState {
            loading: true,
            ..with_image()
        };
        assert!(!render_html(&state, "").contains("Generated Result"));
    }

    #[test]
    fn test_error_is_escaped() {
        let state = UiState {
            error: Some("bad <input>".to_string()),
            ..UiState::default()
        };
        let html = render_html(&state, "\"quoted\"");
        assert!(html.contains("&gt; ERROR: bad &lt;input&gt;"));
        assert!(html.contains(r#"value="&quot;quoted&quot;""#));
    }

    #[test]
    fn test_render_text() {
        let state = UiState {
            error: Some("model loading".to_string()),
            ..UiState::default()
        };
        assert_eq!(render_text(&state), "> ERROR: model loading");

        let loading = UiState {
            loading: true,
            ..UiState::default()
        };
        assert_eq!(render_text(&loading), LOADING_TEXT);
        assert_eq!(render_text(&UiState::default()), "");
        assert!(render_text(&with_image()).starts_with("Image ready"));
    }
}
