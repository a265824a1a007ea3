mod common;
mod presets;
mod properties;
