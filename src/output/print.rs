// SPDX-License-Identifier: GPL-3.0-only

//! Printable A4 page for the generated image
//!
//! The page embeds the image as a data URL, prints itself once the image has
//! loaded and closes its window after printing. It is written to the cache
//! directory and handed to the system browser.

use crate::config::PrintSettings;
use crate::errors::OutputError;
use crate::fl;
use crate::i18n::LANGUAGE_LOADER;
use crate::media::EncodedImage;
use i18n_embed::LanguageLoader;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{error, info};

const PRINT_FILE_NAME: &str = "national-day-print.html";

/// Delay between image load and the print dialog
const PRINT_DELAY_MS: u32 = 500;

const STYLE: &str = r#"
    @page { size: A4; margin: 0; }
    body {
      font-family: 'Tajawal', sans-serif;
      background: white;
      margin: 0;
      padding: 0;
      height: 100vh;
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: center;
    }
    .container {
      width: 100%;
      height: 100%;
      max-width: 210mm;
      max-height: 297mm;
      padding: 10mm 15mm;
      box-sizing: border-box;
      display: flex;
      flex-direction: column;
      justify-content: space-between;
      align-items: center;
      text-align: center;
    }
    .header { width: 100%; border-bottom: 2px solid #8A1538; padding-bottom: 15px; margin-bottom: 10px; }
    .organization { color: #8A1538; font-size: 26px; font-weight: 800; margin-bottom: 8px; }
    .title { color: #333; font-size: 18px; font-weight: 700; }
    .subtitle { color: #555; font-size: 16px; margin-top: 4px; }
    .image-container {
      flex-grow: 1;
      display: flex;
      align-items: center;
      justify-content: center;
      width: 100%;
      overflow: hidden;
      padding: 10px 0;
    }
    img { max-width: 95%; max-height: 100%; object-fit: contain; border-radius: 8px; box-shadow: 0 4px 10px rgba(0,0,0,0.1); }
    .footer {
      width: 100%;
      border-top: 1px solid #8A1538;
      padding-top: 15px;
      color: #333;
      display: flex;
      flex-direction: column;
      gap: 12px;
    }
    .signatures { display: flex; justify-content: space-between; width: 100%; font-weight: 700; font-size: 14px; line-height: 1.4; }
    .signature { display: flex; flex-direction: column; }
    .vision { font-size: 14px; color: #555; font-weight: 800; margin-top: 5px; }
    .credits { font-size: 12px; color: #777; }
    @media print {
      body { -webkit-print-color-adjust: exact; }
      .container { height: 100vh; }
    }
"#;

/// Escape text for HTML element content and attribute values
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Language tag and writing direction of the active locale
fn document_language() -> (String, &'static str) {
    let language = LANGUAGE_LOADER.current_language();
    let tag = language.language.as_str().to_string();
    let dir = match tag.as_str() {
        "ar" | "he" | "fa" | "ur" => "rtl",
        _ => "ltr",
    };
    (tag, dir)
}

/// Render the print page
pub fn render_print_document(image: &EncodedImage, settings: &PrintSettings) -> String {
    let (lang, dir) = document_language();

    let mut signatures = String::new();
    let count = settings.signatories.len();
    for (index, signatory) in settings.signatories.iter().enumerate() {
        let align = match index {
            0 => "start",
            i if i + 1 == count => "end",
            _ => "center",
        };
        let _ = write!(
            signatures,
            "\n          <div class=\"signature\" style=\"text-align: {align};\">\
             <span>{}</span><span>{}</span></div>",
            escape_html(&signatory.role),
            escape_html(&signatory.name),
        );
    }

    let vision = settings
        .vision
        .as_deref()
        .map(|v| format!("\n        <div class=\"vision\">{}</div>", escape_html(v)))
        .unwrap_or_default();
    let credits = settings
        .credits
        .as_deref()
        .map(|c| format!("\n        <div class=\"credits\">{}</div>", escape_html(c)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html dir="{dir}" lang="{lang}">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <link href="https://fonts.googleapis.com/css2?family=Tajawal:wght@400;700;800&display=swap" rel="stylesheet">
  <style>{STYLE}</style>
</head>
<body>
  <div class="container">
    <div class="header">
      <div class="organization">{organization}</div>
      <div class="title">{heading}</div>
      <div class="subtitle">{subtitle}</div>
    </div>
    <div class="image-container">
      <img src="{src}" onload="setTimeout(function(){{ window.print(); }}, {PRINT_DELAY_MS});" />
    </div>
    <div class="footer">
      <div class="signatures">{signatures}
      </div>{vision}{credits}
    </div>
  </div>
  <script>
    window.onafterprint = function() {{ window.close(); }};
  </script>
</body>
</html>
"#,
        title = escape_html(&fl!("print-document-title")),
        organization = escape_html(&settings.organization),
        heading = escape_html(&fl!("print-heading")),
        subtitle = escape_html(&fl!("print-subtitle")),
        src = image.to_data_url(),
    )
}

/// Write the print page into `dir`
pub async fn write_print_document(
    image: &EncodedImage,
    settings: &PrintSettings,
    dir: &Path,
) -> Result<PathBuf, OutputError> {
    let html = render_print_document(image, settings);
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(PRINT_FILE_NAME);
    tokio::fs::write(&path, html).await?;
    Ok(path)
}

/// Render the page for `result` and open it with the system handler
pub async fn print(
    result: Option<&EncodedImage>,
    settings: &PrintSettings,
) -> Result<PathBuf, OutputError> {
    let image = result.ok_or(OutputError::NoResult)?;
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("photobooth");

    let path = write_print_document(image, settings, &dir).await?;
    match open::that_detached(&path) {
        Ok(()) => {
            info!(path = %path.display(), "Print page opened");
            Ok(path)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to open print page");
            Err(OutputError::Io(e.to_string()))
        }
    }
}
