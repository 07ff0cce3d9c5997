//! The HTML page served at `/`.

use crate::config::ServerConfig;

/// Render the page that boots the client bundle.
///
/// `<base>` points at the mount prefix so the client's relative fetches
/// (`db/meta.json`, `edit/meta`, `app/...`) resolve under it.
pub fn render(config: &ServerConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<base href="{prefix}/">
<title>Rigid Timeline</title>
<script>window.rcrtMode = "{mode}";</script>
<script src="app/core.js"></script>
</head>
<body>
<script>startApp();</script>
</body>
</html>
"#,
        prefix = config.prefix,
        mode = config.mode(),
    )
}
