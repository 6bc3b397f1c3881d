//! Server-rendered share page and SVG thumbnails.
//!
//! These are intentionally thin: a single HTML page with Open Graph /
//! Twitter meta tags plus an embedded player, and three SVG thumbnail
//! variants for link previews. All interpolated user data goes through
//! `html_escape`.

use chrono::{DateTime, Utc};
use clipvault_core::models::Video;

use crate::constants::SHARE_PAGE_REFRESH_MS;

/// Minimal HTML/XML attribute escaping for user-controlled strings.
pub fn html_escape(input: &str) -> String {
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

fn format_expiry(expires_at: DateTime<Utc>) -> String {
    expires_at.format("%Y-%m-%d").to_string()
}

/// Share page: Open Graph / Twitter tags for rich link previews, embedded
/// player, and a reload timer that fires before the streaming URL expires.
pub fn render_share_page(video: &Video, stream_url: &str, base_url: &str) -> String {
    let title = html_escape(&video.original_name);
    let content_type = html_escape(&video.content_type);
    let url = html_escape(stream_url);
    let expires = format_expiry(video.expires_at);
    let share_url = format!("{}/api/videos/share/{}", base_url, video.id);
    let thumbnail_url = format!("{}/api/videos/thumbnail/{}", base_url, video.id);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">

    <!-- Open Graph meta tags for rich link previews -->
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="Watch this video - expires {expires}">
    <meta property="og:type" content="video.other">
    <meta property="og:url" content="{share_url}">
    <meta property="og:image" content="{thumbnail_url}">
    <meta property="og:video" content="{url}">
    <meta property="og:video:type" content="{content_type}">
    <meta property="og:video:width" content="1280">
    <meta property="og:video:height" content="720">

    <!-- Twitter Card meta tags -->
    <meta name="twitter:card" content="player">
    <meta name="twitter:title" content="{title}">
    <meta name="twitter:description" content="Watch this video - expires {expires}">
    <meta name="twitter:player" content="{share_url}">
    <meta name="twitter:player:width" content="1280">
    <meta name="twitter:player:height" content="720">

    <title>{title}</title>
    <style>
        body {{
            margin: 0;
            background: #000;
            display: flex;
            justify-content: center;
            align-items: center;
            min-height: 100vh;
            font-family: Arial, sans-serif;
        }}
        video {{
            max-width: 100%;
            max-height: 100vh;
            border-radius: 8px;
            box-shadow: 0 4px 20px rgba(0,0,0,0.3);
        }}
        .info {{
            position: fixed;
            top: 20px;
            left: 20px;
            background: rgba(0,0,0,0.8);
            color: white;
            padding: 10px 15px;
            border-radius: 5px;
            font-size: 14px;
            z-index: 1000;
        }}
        .expires {{
            position: fixed;
            bottom: 20px;
            right: 20px;
            background: rgba(255,0,0,0.8);
            color: white;
            padding: 10px 15px;
            border-radius: 5px;
            font-size: 14px;
            z-index: 1000;
        }}
        .video-container {{
            display: flex;
            justify-content: center;
            align-items: center;
            width: 100%;
            height: 100vh;
        }}
    </style>
</head>
<body>
    <div class="info">{title}</div>
    <div class="expires">Expires: {expires}</div>
    <div class="video-container">
        <video controls autoplay>
            <source src="{url}" type="{content_type}">
            Your browser does not support the video tag.
        </video>
    </div>
    <script>
        // Reload to pick up a fresh streaming URL before this one expires
        setTimeout(() => {{
            location.reload();
        }}, {refresh_ms});
    </script>
</body>
</html>"#,
        refresh_ms = SHARE_PAGE_REFRESH_MS,
    )
}

/// Thumbnail for an available video: play button plus title.
pub fn render_thumbnail(video: &Video) -> String {
    let title = html_escape(&video.original_name);
    format!(
        r##"<svg width="1200" height="630" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#1e293b;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#0f172a;stop-opacity:1" />
    </linearGradient>
  </defs>
  <rect width="1200" height="630" fill="url(#grad)"/>
  <rect x="100" y="100" width="1000" height="430" rx="20" fill="#1e293b" stroke="#3b82f6" stroke-width="3"/>
  <circle cx="600" cy="315" r="80" fill="#3b82f6"/>
  <polygon points="570,285 570,345 630,315" fill="white"/>
  <text x="600" y="450" font-family="Arial, sans-serif" font-size="32" fill="white" text-anchor="middle">{title}</text>
  <text x="600" y="480" font-family="Arial, sans-serif" font-size="18" fill="#94a3b8" text-anchor="middle">Click to play video</text>
</svg>"##
    )
}

/// Thumbnail shown once the video has passed its expiry.
pub fn render_expired_thumbnail() -> String {
    r##"<svg width="1200" height="630" xmlns="http://www.w3.org/2000/svg">
  <rect width="1200" height="630" fill="#dc2626"/>
  <text x="600" y="315" font-family="Arial, sans-serif" font-size="48" fill="white" text-anchor="middle">Video Expired</text>
</svg>"##
        .to_string()
}

/// Generic fallback thumbnail for unknown video ids.
pub fn render_default_thumbnail() -> String {
    r##"<svg width="1200" height="630" xmlns="http://www.w3.org/2000/svg">
  <rect width="1200" height="630" fill="#1a1a1a"/>
  <text x="600" y="315" font-family="Arial, sans-serif" font-size="48" fill="white" text-anchor="middle">Video Player</text>
  <circle cx="600" cy="200" r="60" fill="#3b82f6"/>
  <polygon points="580,180 580,220 620,200" fill="white"/>
</svg>"##
        .to_string()
}
