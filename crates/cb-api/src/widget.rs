//! Embeddable chat widget snippet for deployed bots.

use cb_protocol::Bot;

/// Build the HTML/JS snippet that embeds a bot on a page.
///
/// Clicking the container prompts for a message, posts it to the chat
/// endpoint with the visitor's session cookie, and alerts the reply.
pub fn embed_snippet(bot: &Bot) -> String {
    let id = bot.id;
    let html_name = escape_html(&bot.name);
    let js_html_name = escape_js(&html_name);
    let js_name = escape_js(&bot.name);
    let comment_name = html_name.replace("--", "- -");

    format!(
        r#"<!-- {comment_name} Chatbot Embed -->
<script>
async function initChatbot(botId) {{
    const container = document.getElementById('chatbot-{id}');
    container.innerHTML = '<div style="padding:15px;border:1px solid #ddd;border-radius:8px;background:#f8f9fa;">🤖 <strong>{js_html_name}</strong> is ready!</div>';

    container.addEventListener('click', async () => {{
        const message = prompt('Talk to {js_name}:');
        if (message) {{
            try {{
                const response = await fetch("/api/v1/chat", {{
                    method: "POST",
                    credentials: "include",
                    headers: {{"Content-Type": "application/json"}},
                    body: JSON.stringify({{bot_id: botId, message: message}})
                }});
                const data = await response.json();
                alert('{js_name}: ' + data.response);
            }} catch (e) {{
                alert("Chatbot temporarily unavailable");
            }}
        }}
    }});
}}
initChatbot('{id}');
</script>
<div id="chatbot-{id}" style="cursor:pointer;padding:20px;border:2px dashed #007bff;border-radius:12px;text-align:center;font-size:16px;">
    Click to chat with {html_name}
</div>"#
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Escape for a single- or double-quoted JS string inside a `<script>` block.
fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            _ => out.push(c),
        }
    }
    out
}
