//! HTML page rendering.
//!
//! Pages are plain server-rendered HTML built with `format!`. The only
//! script on any page is the camera-capture helper on the gallery, which
//! draws the current video frame to a canvas, encodes it as a PNG data URL,
//! stops the camera tracks, and posts the result to `/photos/capture`.

/// Escape HTML special characters to prevent XSS attacks.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

// =============================================================================
// Shared Shell
// =============================================================================

const STYLES: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
    background: #fafafa;
    color: #1f2937;
}
.centered { display: flex; justify-content: center; align-items: center; min-height: 100vh; }
.card {
    width: 400px;
    padding: 24px;
    border-top: 2px solid #f97316;
    border-bottom: 2px solid #f97316;
    border-radius: 8px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.12);
    background: #fff;
}
.card h2 { font-weight: 700; margin-bottom: 20px; }
.card form { margin-bottom: 8px; }
.card input {
    display: block;
    width: 100%;
    padding: 8px;
    margin-bottom: 16px;
    font-size: 13px;
    border: none;
    border-radius: 6px;
    background: #e5e7eb;
}
button, .button {
    background: #f97316;
    color: #fff;
    border: none;
    border-radius: 6px;
    width: 100%;
    padding: 6px 12px;
    font-size: 14px;
    cursor: pointer;
}
.switch { display: flex; justify-content: space-between; font-size: 13px; }
.switch a { color: inherit; }
.switch a:hover { color: #f97316; }
.error { color: #dc2626; font-size: 13px; margin-top: 8px; }
.gallery { max-width: 960px; margin: 0 auto; padding: 24px; }
.gallery h1 { margin-bottom: 16px; }
.toolbar { display: flex; gap: 12px; align-items: center; margin-bottom: 24px; flex-wrap: wrap; }
.toolbar form { display: flex; gap: 8px; align-items: center; }
.toolbar button { width: auto; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; }
.photo { background: #fff; border-radius: 8px; overflow: hidden; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.12); }
.photo img { width: 100%; height: 180px; object-fit: cover; display: block; }
.photo .meta { display: flex; justify-content: space-between; align-items: center; padding: 8px; font-size: 12px; }
.photo .meta form { margin: 0; }
.photo .meta button { width: auto; background: #dc2626; font-size: 12px; padding: 4px 8px; }
.capture video { width: 100%; max-width: 480px; border-radius: 8px; margin-top: 12px; }
.empty { color: #6b7280; font-size: 14px; }
"#;

fn page_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{styles}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
        styles = STYLES,
        body = body,
    )
}

fn error_line(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, html_escape(message)),
        None => String::new(),
    }
}

// =============================================================================
// Auth Pages
// =============================================================================

/// Render the login page, optionally with an error string under the form.
pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<div class="centered">
  <div class="card">
    <h2>Log In</h2>
    <form method="post" action="/login">
      <input type="email" name="email" placeholder="Email" required>
      <input type="password" name="password" placeholder="Password" required>
      <button type="submit">Log In</button>
    </form>
    <div class="switch">
      <p>Don't have an account?</p>
      <a href="/signup">Sign Up</a>
    </div>
    {error}
  </div>
</div>"#,
        error = error_line(error),
    );
    page_shell("Log In", &body)
}

/// Render the signup page, optionally with a provider error under the form.
pub fn signup_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<div class="centered">
  <div class="card">
    <h2>Sign Up</h2>
    <form method="post" action="/signup">
      <input type="text" name="name" placeholder="Name" required>
      <input type="email" name="email" placeholder="Email" required>
      <input type="password" name="password" placeholder="Password" required>
      <button type="submit">Sign Up</button>
    </form>
    <div class="switch">
      <p>Already have an account?</p>
      <a href="/login">Log In</a>
    </div>
    {error}
  </div>
</div>"#,
        error = error_line(error),
    );
    page_shell("Sign Up", &body)
}

/// Render the email confirmation failure page.
///
/// Successful confirmations redirect straight to the login page, so the
/// only page ever rendered here carries an error.
pub fn confirm_error_page(message: &str) -> String {
    let body = format!(
        r#"<div class="centered">
  <div class="card">
    <h2>Email Confirmation</h2>
    <p class="error">{message}</p>
    <div class="switch">
      <p>Back to</p>
      <a href="/login">Log In</a>
    </div>
  </div>
</div>"#,
        message = html_escape(message),
    );
    page_shell("Email Confirmation", &body)
}

// =============================================================================
// Gallery Page
// =============================================================================

/// A photo ready for rendering: display name, public URL, delete action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryPhoto {
    pub name: String,
    pub url: String,
    pub delete_path: String,
}

const CAPTURE_SCRIPT: &str = r#"
let captureStream = null;
const video = document.getElementById('capture-video');

async function startCapture() {
    document.getElementById('capture-area').style.display = 'block';
    try {
        captureStream = await navigator.mediaDevices.getUserMedia({ video: true });
        video.srcObject = captureStream;
        video.play();
    } catch (err) {
        console.error('Error accessing camera:', err);
        stopCapture();
    }
}

function stopCapture() {
    if (captureStream) {
        captureStream.getTracks().forEach((track) => track.stop());
        captureStream = null;
    }
    document.getElementById('capture-area').style.display = 'none';
}

function capturePhoto() {
    if (!captureStream) return;
    const canvas = document.createElement('canvas');
    canvas.width = video.videoWidth;
    canvas.height = video.videoHeight;
    const ctx = canvas.getContext('2d');
    if (!ctx) return;
    ctx.drawImage(video, 0, 0);
    document.getElementById('data-url-input').value = canvas.toDataURL('image/png');
    stopCapture();
    document.getElementById('capture-form').submit();
}
"#;

/// Render the gallery page.
///
/// # Arguments
///
/// * `display_name` - Name to greet the user with
/// * `photos` - Photos to render, placeholder entries already filtered out
/// * `flash` - Optional error string shown above the grid
pub fn gallery_page(display_name: &str, photos: &[GalleryPhoto], flash: Option<&str>) -> String {
    let grid = if photos.is_empty() {
        r#"<p class="empty">No photos yet. Upload one or capture one with your camera.</p>"#
            .to_string()
    } else {
        let items: Vec<String> = photos
            .iter()
            .map(|photo| {
                format!(
                    r#"    <div class="photo">
      <img src="{url}" alt="{name}">
      <div class="meta">
        <span>{name}</span>
        <form method="post" action="{delete_path}">
          <button type="submit">Delete</button>
        </form>
      </div>
    </div>"#,
                    url = html_escape(&photo.url),
                    name = html_escape(&photo.name),
                    delete_path = html_escape(&photo.delete_path),
                )
            })
            .collect();
        format!("<div class=\"grid\">\n{}\n  </div>", items.join("\n"))
    };

    let body = format!(
        r#"<div class="gallery">
  <h1>Welcome, {display_name}!</h1>
  {flash}
  <div class="toolbar">
    <form method="post" action="/photos/upload" enctype="multipart/form-data">
      <input type="file" name="photo" accept="image/*" required>
      <button type="submit">Upload</button>
    </form>
    <button type="button" onclick="startCapture()">Capture Photo</button>
    <form method="post" action="/logout">
      <button type="submit">Log Out</button>
    </form>
  </div>
  <div id="capture-area" class="capture" style="display: none;">
    <video id="capture-video" autoplay playsinline></video>
    <div class="toolbar">
      <button type="button" onclick="capturePhoto()">Upload Capture</button>
      <button type="button" onclick="stopCapture()">Cancel</button>
    </div>
  </div>
  <form id="capture-form" method="post" action="/photos/capture" style="display: none;">
    <input type="hidden" id="data-url-input" name="data_url">
  </form>
  {grid}
</div>
<script>{script}</script>"#,
        display_name = html_escape(display_name),
        flash = error_line(flash),
        grid = grid,
        script = CAPTURE_SCRIPT,
    );
    page_shell("Photos", &body)
}

// =============================================================================
// Tests
// =============================================================================
