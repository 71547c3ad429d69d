//! HTTP/1.0 responses for the three pages the bridge serves.

use std::fmt::Write as _;

use crate::models::OperationMode;

const HTML: &str = "text/html";
const HTML_UTF8: &str = "text/html; charset=utf-8";

const FORM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Cipher Bridge</title>
    <meta name="viewport" content="width=device-width, initial-scale=1" />
</head>
<body>
    <h1>Encrypt or Decrypt</h1>
    <form method="POST">
      <p>Enter <span style="font-weight:bold">either</span>:</p>
      <ul>
        <li>A 10-digit phone number (e.g. 1234567890) to encrypt</li>
        <li>A 32-hex-digit string (e.g. CA4BCB48C849C94ECE4A52D2D2D2D2D2) to decrypt</li>
      </ul>
      <label>
        Data:
        <input
          type="text"
          name="inputData"
          placeholder="10 digits or 32 hex chars"
          pattern="(^\d{10}$)|(^[0-9A-Fa-f]{32}$)"
          required />
      </label>
      <br/><br/>
      <button type="submit">Submit</button>
    </form>
</body>
</html>
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    InternalServerError,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::InternalServerError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: Status,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    /// Serialises status line, headers and body for the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.0 {} {}\r\nContent-Type: {}\r\n\r\n{}",
            self.status.code(),
            self.status.reason(),
            self.content_type,
            self.body
        )
        .into_bytes()
    }
}

pub fn form_page() -> HttpResponse {
    HttpResponse {
        status: Status::Ok,
        content_type: HTML,
        body: FORM_PAGE.to_string(),
    }
}

pub fn success_page(mode: OperationMode, input: &str, result: &str) -> HttpResponse {
    let (title, given, produced) = match mode {
        OperationMode::Encrypt => ("Encrypted!", "phone number", "ciphertext"),
        OperationMode::Decrypt => ("Decrypted!", "ciphertext", "phone number"),
    };

    let body = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
  </head>
  <body>
    <h1>{title}</h1>
    <p>Mode: {mode}</p>
    <p>Your {given} <strong>{input}</strong><br>
    &rarr; {produced}:</p>
    <pre>{result}</pre>
    <p><a href="/">Back</a></p>
  </body>
</html>
"#,
        mode = mode.as_str(),
        input = escape_html(input),
        result = escape_html(result),
    );

    HttpResponse {
        status: Status::Ok,
        content_type: HTML_UTF8,
        body,
    }
}

pub fn error_page(description: &str) -> HttpResponse {
    let body = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Server Error</title>
  </head>
  <body>
    <h1>500 Server Error</h1>
    <pre>{}</pre>
    <p><a href="/">Back</a></p>
  </body>
</html>
"#,
        escape_html(description)
    );

    HttpResponse {
        status: Status::InternalServerError,
        content_type: HTML_UTF8,
        body,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // Control characters other than whitespace would break the <pre>.
            c if c.is_control() && !c.is_whitespace() => {
                let _ = write!(out, "&#{};", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
