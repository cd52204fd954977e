pub mod toml_loader;

pub use toml_loader::{
    load_section1_form, load_section_specs, parse_section1_form, parse_section_specs,
};
