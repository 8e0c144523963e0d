// 该文件是 FlavorSnap （味拍） 项目的一部分。
// src/dashboard/page.rs - 面板页面
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use minijinja::{Environment, Value, context};
use pulldown_cmark::{Event, Parser, html};

use crate::dashboard::{DashboardView, INSTRUCTIONS, TITLE};

const PREVIEW_SIZE: u32 = 300;
const SPINNER_SIZE: u32 = 50;

// 以 .html 结尾的模板名会开启自动转义
const PAGE_NAME: &str = "dashboard.html";
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>FlavorSnap</title>
<style>
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }
.spinner { width: {{ spinner_size }}px; height: {{ spinner_size }}px; border: 6px solid #ddd;
  border-top-color: #0072b5; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
button { background: #0072b5; color: #fff; border: 0; padding: .4rem 1.2rem; border-radius: 4px; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<p>{{ instructions }}</p>
<form method="post" action="/classify" enctype="multipart/form-data" onsubmit="document.getElementById('spinner').hidden = false">
<input type="file" name="image" accept="image/*">
<button type="submit">Classify</button>
</form>
<div id="spinner" class="spinner"{% if not busy %} hidden{% endif %}></div>
{%- if preview_visible %}
<img id="preview" src="/preview?rev={{ preview_revision }}" width="{{ preview_size }}" height="{{ preview_size }}" alt="preview">
{%- endif %}
<div id="output">{{ output }}</div>
</body>
</html>
"#;

/// 输出区按 Markdown 渲染，原始 HTML 当作文本处理
fn render_markdown(text: &str) -> String {
  let events = Parser::new(text).map(|event| match event {
    Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
    other => other,
  });
  let mut rendered = String::new();
  html::push_html(&mut rendered, events);
  rendered
}

pub fn render_page(view: &DashboardView) -> Result<String, minijinja::Error> {
  let mut env = Environment::new();
  env.add_template(PAGE_NAME, PAGE_TEMPLATE)?;
  let page = env.get_template(PAGE_NAME)?;
  page.render(context! {
    title => TITLE,
    instructions => INSTRUCTIONS,
    spinner_size => SPINNER_SIZE,
    preview_size => PREVIEW_SIZE,
    busy => view.busy,
    preview_visible => view.preview_visible,
    preview_revision => view.preview_revision,
    output => Value::from_safe_string(render_markdown(&view.output)),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn view(output: &str, preview_visible: bool) -> DashboardView {
    DashboardView {
      busy: false,
      preview_visible,
      preview_revision: 3,
      output: output.to_string(),
    }
  }

  #[test]
  fn bold_markers_become_strong() {
    let html = render_markdown("✅ Identified as **Moi Moi**. Image saved!");
    assert_eq!(
      html.trim(),
      "<p>✅ Identified as <strong>Moi Moi</strong>. Image saved!</p>"
    );
  }

  #[test]
  fn error_text_is_markdown_but_not_raw_html() {
    let html = render_markdown("❌ Error: `decode` failed <script>alert(1)</script>");
    assert!(html.contains("<code>decode</code>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
  }

  #[test]
  fn preview_only_rendered_when_visible() {
    let hidden = render_page(&view("⚠️ Please upload an image first.", false)).unwrap();
    assert!(!hidden.contains("id=\"preview\""));
    assert!(hidden.contains("⚠️ Please upload an image first."));
    assert!(hidden.contains("class=\"spinner\" hidden"));

    let shown = render_page(&view("Upload an image of food 🍲", true)).unwrap();
    assert!(shown.contains("src=\"/preview?rev=3\""));
    assert!(shown.contains("<h1>🍽️ FlavorSnap</h1>"));
    assert!(shown.contains("width: 50px"));
  }

  #[test]
  fn spinner_visible_while_busy() {
    let busy = DashboardView {
      busy: true,
      ..view("🔍 Classifying...", true)
    };
    let html = render_page(&busy).unwrap();
    assert!(html.contains("<div id=\"spinner\" class=\"spinner\"></div>"));
  }
}
