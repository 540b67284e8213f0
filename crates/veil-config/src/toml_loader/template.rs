//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Veil Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# title = "Veil"
# width = 1280           # 64-8192
# height = 720           # 64-8192
# vsync = true
# gl_debug = false

[blur]
# enabled = true
# radius = 30            # 1-62, odd values round up
# sigma = 15.0           # 0.1-100.0
# mask = "vertex"        # none, vertex, stencil

[background]
# primary = "#1e1e2e"
# secondary = "#cba6f7"
# cell_size = 48         # 4-512
# animation_speed = 0.5  # 0.0-10.0

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##
}
